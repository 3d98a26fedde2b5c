//! Headless training loop
//!
//! Drives a `GenerationController` for a fixed number of generations, records
//! per-generation statistics, captures GIFs of selected generations and writes
//! a report at the end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::gif_capture::GifCapture;
use super::report::{CapturedGif, ReportGenerator};
use crate::evolution::{GenerationController, GenerationSummary};

/// Configuration for the training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of generations to run
    pub generations: u64,
    /// Capture a GIF every N generations (0 = only the last one)
    pub gif_capture_interval: u64,
    /// GIF viewport size
    pub gif_size: u16,
    /// GIF frames per second
    pub gif_fps: u16,
    /// Simulation frames per captured GIF frame
    pub frame_stride: usize,
    /// Output directory for reports
    pub output_dir: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            gif_capture_interval: 10,
            gif_size: 200,
            gif_fps: 25,
            frame_stride: 10,
            output_dir: "training_output".to_string(),
        }
    }
}

/// Statistics from one finished generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    pub generation: u64,
    /// Best fitness in this generation
    pub max_fitness: f32,
    pub average_fitness: f32,
    /// Best fitness of the run so far
    pub best_fitness: f32,
    pub target_hits: usize,
    pub wall_hits: usize,
    pub mutation_rate: f32,
    pub progress: bool,
}

impl From<&GenerationSummary> for TrainingStats {
    fn from(summary: &GenerationSummary) -> Self {
        Self {
            generation: summary.generation,
            max_fitness: summary.max_fitness,
            average_fitness: summary.average_fitness,
            best_fitness: summary.best_fitness,
            target_hits: summary.target_hits,
            wall_hits: summary.wall_hits,
            mutation_rate: summary.mutation_rate,
            progress: summary.progress,
        }
    }
}

/// Stop switch for a running training loop
///
/// Cloned handles share the flag; the loop checks it between frames.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    stop: Arc<AtomicBool>,
}

impl RunHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Main training loop state
pub struct TrainingRun {
    pub config: TrainingConfig,
    controller: GenerationController,
    /// Statistics history
    pub stats_history: Vec<TrainingStats>,
    gifs: Vec<CapturedGif>,
    report_gen: ReportGenerator,
    handle: RunHandle,
    show_progress: bool,
}

impl TrainingRun {
    pub fn new(config: TrainingConfig, controller: GenerationController) -> Self {
        let report_gen = ReportGenerator::new(&config.output_dir, controller.config());

        Self {
            config,
            controller,
            stats_history: Vec::new(),
            gifs: Vec::new(),
            report_gen,
            handle: RunHandle::default(),
            show_progress: true,
        }
    }

    /// Hide the progress bar (tests, piped output)
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Handle that stops the loop from another thread
    pub fn handle(&self) -> RunHandle {
        self.handle.clone()
    }

    pub fn controller(&self) -> &GenerationController {
        &self.controller
    }

    /// Create a progress bar style
    fn progress_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░")
    }

    fn should_capture(&self, generation: u64) -> bool {
        let last = generation + 1 == self.config.generations;
        let interval = self.config.gif_capture_interval;
        last || (interval > 0 && generation % interval == 0)
    }

    /// Run the full training loop
    pub fn run(&mut self) -> Result<()> {
        let pb = if self.show_progress {
            ProgressBar::new(self.config.generations)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(Self::progress_style());

        pb.println(format!(
            "Starting training: {} generations, {} population",
            self.config.generations,
            self.controller.config().population
        ));

        fs_create_dir(&self.config.output_dir)?;

        while (self.stats_history.len() as u64) < self.config.generations {
            let generation = self.controller.current_generation();
            let completed = self.run_one_generation(generation)?;
            let Some(stats) = completed else {
                pb.println("Training stopped");
                break;
            };

            pb.set_message(format!(
                "best={:.4} rate={:.2}",
                stats.best_fitness, stats.mutation_rate
            ));
            pb.inc(1);
            self.stats_history.push(stats);
        }

        self.report_gen
            .generate_final_report(&self.stats_history, &self.gifs)?;

        pb.finish_with_message("Training complete!");
        Ok(())
    }

    /// Tick through one generation, capturing frames when requested
    ///
    /// Returns `None` when the run handle stopped the loop mid-generation.
    fn run_one_generation(&mut self, generation: u64) -> Result<Option<TrainingStats>> {
        let mut capture = self.should_capture(generation).then(|| {
            GifCapture::new(
                self.config.gif_size,
                self.config.gif_fps,
                self.config.frame_stride,
            )
        });

        loop {
            if self.handle.is_stopped() {
                return Ok(None);
            }

            if let Some(gif) = capture.as_mut() {
                let population = self.controller.population();
                gif.offer(self.controller.environment(), || {
                    population.iter().map(|agent| agent.render_data()).collect()
                });
            }

            self.controller
                .tick()
                .with_context(|| format!("Breeding failed after generation {generation}"))?;

            if self.controller.is_generation_boundary() {
                break;
            }
        }

        let summary = self
            .controller
            .last_summary()
            .context("Generation ended without a summary")?;
        let stats = TrainingStats::from(summary);

        if let Some(gif) = capture {
            let file_name = format!("generation_{generation}.gif");
            let path = PathBuf::from(&self.config.output_dir).join(&file_name);
            match gif.save(&path) {
                Ok(()) => self.gifs.push(CapturedGif {
                    label: format!("Generation {generation}"),
                    generation,
                    file_name,
                }),
                Err(e) => log::warn!("Failed to save GIF for generation {}: {}", generation, e),
            }
        }

        Ok(Some(stats))
    }
}

fn fs_create_dir(dir: &str) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {dir}"))
}
