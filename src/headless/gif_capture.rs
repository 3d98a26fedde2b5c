//! Animated GIF of one generation's flight
//!
//! The capture owns its renderer and keeps every `stride`-th simulation frame
//! it is offered. The last kept frame is held longer so the loop visibly pauses
//! between replays.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use gif::{Encoder, Frame, Repeat};

use super::PixelRenderer;
use crate::evolution::AgentRenderData;
use crate::world::Environment;

/// Centiseconds the final frame stays on screen
const FINAL_FRAME_HOLD: u16 = 100;

pub struct GifCapture {
    renderer: PixelRenderer,
    /// Kept frames as RGB
    frames: Vec<Vec<u8>>,
    size: u16,
    /// Centiseconds per frame
    frame_delay: u16,
    stride: usize,
    offered: usize,
}

impl GifCapture {
    /// Square capture of `size` pixels keeping one frame in `stride`
    pub fn new(size: u16, fps: u16, stride: usize) -> Self {
        Self {
            renderer: PixelRenderer::new(size as usize, size as usize),
            frames: Vec::new(),
            size,
            frame_delay: if fps > 0 { (100 / fps).max(1) } else { 10 },
            stride: stride.max(1),
            offered: 0,
        }
    }

    /// Offer one simulation frame
    ///
    /// `agents` is only evaluated when the frame is kept. Returns whether it was.
    pub fn offer<F>(&mut self, environment: &Environment, agents: F) -> bool
    where
        F: FnOnce() -> Vec<AgentRenderData>,
    {
        let due = self.offered % self.stride == 0;
        self.offered += 1;
        if due {
            self.renderer.render(environment, &agents());
            self.frames.push(self.renderer.get_rgb_buffer());
        }
        due
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Encode the kept frames as a looping GIF
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let Some(last) = self.frames.len().checked_sub(1) else {
            anyhow::bail!("No frames to save");
        };

        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
        let mut encoder = Encoder::new(file, self.size, self.size, &[])
            .context("Failed to create GIF encoder")?;
        encoder
            .set_repeat(Repeat::Infinite)
            .context("Failed to set GIF repeat")?;

        for (i, rgb) in self.frames.iter().enumerate() {
            let mut frame = Frame::from_rgb(self.size, self.size, rgb);
            frame.delay = if i == last {
                FINAL_FRAME_HOLD
            } else {
                self.frame_delay
            };
            encoder
                .write_frame(&frame)
                .context("Failed to write GIF frame")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Target;
    use glam::Vec2;

    fn environment() -> Environment {
        Environment::new(
            Vec2::new(100.0, 100.0),
            Vec::new(),
            Target {
                center: Vec2::new(50.0, 10.0),
                radius: 5.0,
            },
            Vec2::new(50.0, 90.0),
        )
    }

    #[test]
    fn test_frame_delay_from_fps() {
        assert_eq!(GifCapture::new(8, 10, 1).frame_delay, 10);
        assert_eq!(GifCapture::new(8, 0, 1).frame_delay, 10);
        assert_eq!(GifCapture::new(8, 200, 1).frame_delay, 1);
    }

    #[test]
    fn test_offer_keeps_every_stride_frame() {
        let env = environment();
        let mut capture = GifCapture::new(16, 25, 3);
        let mut evaluated = 0;

        for _ in 0..7 {
            capture.offer(&env, || {
                evaluated += 1;
                Vec::new()
            });
        }

        // Frames 0, 3 and 6
        assert_eq!(capture.frame_count(), 3);
        assert_eq!(evaluated, 3);
    }

    #[test]
    fn test_save_requires_frames() {
        let dir = tempfile::tempdir().unwrap();
        let capture = GifCapture::new(8, 10, 1);
        assert!(capture.save(dir.path().join("empty.gif")).is_err());
    }

    #[test]
    fn test_save_writes_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.gif");
        let env = environment();
        let mut capture = GifCapture::new(8, 20, 1);
        capture.offer(&env, Vec::new);
        capture.offer(&env, Vec::new);

        capture.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
    }
}
