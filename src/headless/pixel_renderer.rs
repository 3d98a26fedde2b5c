//! CPU-based pixel buffer renderer for headless GIF capture
//!
//! Draws the environment and a population snapshot into an RGBA buffer,
//! scaled so the whole world fits the viewport.

use glam::Vec2;

use crate::evolution::{AgentRenderData, Collision};
use crate::world::Environment;

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const OBSTACLE: [u8; 4] = [0, 0, 0, 255];
const TARGET: [u8; 4] = [220, 0, 0, 255];
const AGENT_ALIVE: [u8; 4] = [0, 0, 220, 255];
const AGENT_HIT_TARGET: [u8; 4] = [0, 200, 0, 255];
const AGENT_CRASHED: [u8; 4] = [160, 160, 160, 255];

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the viewport in pixels
    pub width: usize,
    /// Height of the viewport in pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a new pixel renderer with given viewport size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// World units to pixels, uniform on both axes
    fn scale(&self, bounds: Vec2) -> f32 {
        (self.width as f32 / bounds.x).min(self.height as f32 / bounds.y)
    }

    /// Render the world and all agents
    pub fn render(&mut self, environment: &Environment, agents: &[AgentRenderData]) {
        let scale = self.scale(environment.bounds());

        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }

        for obstacle in environment.obstacles() {
            let min = obstacle.min * scale;
            let max = obstacle.max() * scale;
            self.fill_rect(min, max, OBSTACLE);
        }

        let target = environment.target();
        let center = target.center * scale;
        let radius = (target.radius * scale).max(2.0);
        self.draw_filled_circle(center.x as i32, center.y as i32, radius as i32, TARGET);

        for agent in agents {
            let color = match agent.collision {
                Some(Collision::Target) => AGENT_HIT_TARGET,
                Some(Collision::Obstacle) => AGENT_CRASHED,
                None => AGENT_ALIVE,
            };
            let pos = agent.position * scale;
            let radius = (agent.radius * scale * 0.5).max(1.0);
            self.draw_filled_circle(pos.x as i32, pos.y as i32, radius as i32, color);

            // Nose in the direction of travel
            if agent.alive {
                let nose = pos + Vec2::from_angle(agent.heading) * (radius + 1.0);
                self.set_pixel(nose.x as i32, nose.y as i32, color);
            }
        }
    }

    fn fill_rect(&mut self, min: Vec2, max: Vec2, color: [u8; 4]) {
        let x0 = min.x.max(0.0) as usize;
        let y0 = min.y.max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y * self.width + x) * 4;
                self.buffer[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }

    /// Draw a filled circle at screen coordinates
    fn draw_filled_circle(&mut self, cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as usize * self.width + x as usize) * 4;
            self.buffer[idx..idx + 4].copy_from_slice(&color);
        }
    }

    /// RGBA value at screen coordinates
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.buffer[idx],
            self.buffer[idx + 1],
            self.buffer[idx + 2],
            self.buffer[idx + 3],
        ]
    }

    /// Get the pixel buffer as RGB (without alpha) for GIF encoding
    pub fn get_rgb_buffer(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width * self.height * 3);
        for chunk in self.buffer.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
        }
        rgb
    }
}
