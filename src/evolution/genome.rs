//! Force-vector genome
//!
//! A genome is a fixed-length list of integer 2-D forces. Agent `i` of a
//! generation plays its genes one per batch, so the list doubles as the
//! agent's flight plan.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered force vectors driving one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<IVec2>,
}

/// Draw one gene with both components uniform in `[-speed, speed]`
pub fn random_gene<R: Rng + ?Sized>(speed: i32, rng: &mut R) -> IVec2 {
    IVec2::new(
        rng.random_range(-speed..=speed),
        rng.random_range(-speed..=speed),
    )
}

/// Replace each gene with a fresh random one with probability `mutation_rate`
///
/// Returns the number of genes replaced.
pub fn mutate<R: Rng + ?Sized>(
    genes: &mut [IVec2],
    mutation_rate: f32,
    speed: i32,
    rng: &mut R,
) -> usize {
    let mut replaced = 0;
    for gene in genes.iter_mut() {
        if rng.random::<f32>() < mutation_rate {
            *gene = random_gene(speed, rng);
            replaced += 1;
        }
    }
    replaced
}

impl Genome {
    /// Random genome of `length` genes
    pub fn random<R: Rng + ?Sized>(length: usize, speed: i32, rng: &mut R) -> Self {
        debug_assert!(length >= 1 && speed >= 0);
        let genes = (0..length).map(|_| random_gene(speed, rng)).collect();
        Self { genes }
    }

    /// Wrap an explicit gene list
    pub fn from_genes(genes: Vec<IVec2>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[IVec2] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<IVec2> {
        self.genes.get(index).copied()
    }

    /// Single-point split without mutation
    ///
    /// Genes at indices `<= midpoint` come from `partner`, the rest from `self`.
    pub fn crossover_at(&self, partner: &Genome, midpoint: usize) -> Genome {
        debug_assert_eq!(self.len(), partner.len());
        let genes = self
            .genes
            .iter()
            .zip(&partner.genes)
            .enumerate()
            .map(|(i, (&own, &theirs))| if i > midpoint { own } else { theirs })
            .collect();
        Genome { genes }
    }

    /// Breed a child: random midpoint in `[0, len - 1]`, then mutation
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        partner: &Genome,
        mutation_rate: f32,
        speed: i32,
        rng: &mut R,
    ) -> Genome {
        let midpoint = rng.random_range(0..self.len());
        let mut child = self.crossover_at(partner, midpoint);
        mutate(&mut child.genes, mutation_rate, speed, rng);
        child
    }
}
