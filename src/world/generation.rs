//! Random world layout
//!
//! Four boundary walls plus `total_obstacles` bars scattered through the band
//! between the target row and the spawn row.

use glam::Vec2;
use rand::Rng;

use super::environment::{Environment, Obstacle, Target};
use crate::config::{
    RunConfig, OBSTACLE_BOTTOM_MARGIN, OBSTACLE_SIZE, OBSTACLE_TOP_MARGIN, WALL_THICKNESS,
};

/// Walls of thickness `WALL_THICKNESS` along each edge of `bounds`
pub fn boundary_walls(bounds: Vec2) -> [Obstacle; 4] {
    let (w, h, t) = (bounds.x, bounds.y, WALL_THICKNESS);
    [
        Obstacle::new(0.0, 0.0, t, h),
        Obstacle::new(w - t, 0.0, t, h),
        Obstacle::new(0.0, 0.0, w, t),
        Obstacle::new(0.0, h - t, w, t),
    ]
}

impl Environment {
    /// Build the world for a validated config
    pub fn generate<R: Rng + ?Sized>(config: &RunConfig, rng: &mut R) -> Self {
        let bounds = config.world_bounds;
        let mut obstacles = boundary_walls(bounds).to_vec();

        if config.total_obstacles > 0 {
            let x_range = 0.0..(bounds.x - OBSTACLE_SIZE.x);
            let y_range = OBSTACLE_TOP_MARGIN..(bounds.y - OBSTACLE_BOTTOM_MARGIN);
            for _ in 0..config.total_obstacles {
                let x = rng.random_range(x_range.clone()).floor();
                let y = rng.random_range(y_range.clone()).floor();
                obstacles.push(Obstacle::new(x, y, OBSTACLE_SIZE.x, OBSTACLE_SIZE.y));
            }
        }

        log::debug!(
            "Generated {}x{} world with {} obstacles",
            bounds.x,
            bounds.y,
            config.total_obstacles
        );

        Environment::new(
            bounds,
            obstacles,
            Target {
                center: config.target_position,
                radius: config.target_radius,
            },
            config.spawn_position,
        )
    }
}
