//! Static world geometry and collision queries

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::evolution::Agent;

/// Axis-aligned rectangle (walls and obstacles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap with the box `[min, max]`; touching edges do not count
    pub fn overlaps(&self, min: Vec2, max: Vec2) -> bool {
        let own_max = self.max();
        self.min.x < max.x && min.x < own_max.x && self.min.y < max.y && min.y < own_max.y
    }
}

/// Circular goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub center: Vec2,
    pub radius: f32,
}

/// Walls, obstacles, target and spawn point of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    bounds: Vec2,
    /// Boundary walls first, then random obstacles
    obstacles: Vec<Obstacle>,
    target: Target,
    spawn: Vec2,
}

impl Environment {
    pub fn new(bounds: Vec2, obstacles: Vec<Obstacle>, target: Target, spawn: Vec2) -> Self {
        Self {
            bounds,
            obstacles,
            target,
            spawn,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    /// Circle-circle overlap between the agent and the target
    pub fn collides_with_target(&self, agent: &Agent) -> bool {
        let reach = agent.radius + self.target.radius;
        agent.position.distance_squared(self.target.center) < reach * reach
    }

    /// Agent bounding box against every wall and obstacle
    pub fn collides_with_obstacle(&self, agent: &Agent) -> bool {
        let half = Vec2::splat(agent.radius);
        let min = agent.position - half;
        let max = agent.position + half;
        self.obstacles.iter().any(|o| o.overlaps(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::Genome;
    use glam::IVec2;

    fn agent_at(position: Vec2) -> Agent {
        Agent::new(Genome::from_genes(vec![IVec2::ZERO]), position, 20.0, 0.0)
    }

    fn arena() -> Environment {
        Environment::new(
            Vec2::new(200.0, 200.0),
            vec![Obstacle::new(0.0, 0.0, 200.0, 20.0)],
            Target {
                center: Vec2::new(100.0, 100.0),
                radius: 10.0,
            },
            Vec2::new(100.0, 180.0),
        )
    }

    #[test]
    fn test_target_collision() {
        let env = arena();
        assert!(env.collides_with_target(&agent_at(Vec2::new(100.0, 100.0))));
        assert!(env.collides_with_target(&agent_at(Vec2::new(129.0, 100.0))));
        assert!(!env.collides_with_target(&agent_at(Vec2::new(130.0, 100.0))));
        assert!(!env.collides_with_target(&agent_at(Vec2::new(150.0, 150.0))));
    }

    #[test]
    fn test_obstacle_collision() {
        let env = arena();
        // Box top edge at y = 19 reaches into the wall
        assert!(env.collides_with_obstacle(&agent_at(Vec2::new(100.0, 39.0))));
        // Touching at y = 20 is not a collision
        assert!(!env.collides_with_obstacle(&agent_at(Vec2::new(100.0, 40.0))));
        assert!(!env.collides_with_obstacle(&agent_at(Vec2::new(100.0, 150.0))));
    }

    #[test]
    fn test_obstacle_overlap() {
        let rect = Obstacle::new(10.0, 10.0, 10.0, 10.0);
        assert!(rect.overlaps(Vec2::new(0.0, 0.0), Vec2::new(11.0, 11.0)));
        assert!(rect.overlaps(Vec2::new(12.0, 12.0), Vec2::new(14.0, 14.0)));
        assert!(!rect.overlaps(Vec2::new(20.0, 0.0), Vec2::new(30.0, 30.0)));
        assert_eq!(rect.max(), Vec2::new(20.0, 20.0));
    }
}
