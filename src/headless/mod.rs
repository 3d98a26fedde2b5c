//! Headless training for rocket evolution
//!
//! This module provides infrastructure for running evolution without a window:
//! - Pixel buffer rendering for GIF capture
//! - The training loop with a stop handle and progress display
//! - HTML report generation with animated generation captures

mod gif_capture;
mod pixel_renderer;
mod report;
mod training_run;

pub use gif_capture::GifCapture;
pub use pixel_renderer::PixelRenderer;
pub use report::{CapturedGif, ReportGenerator};
pub use training_run::{RunHandle, TrainingConfig, TrainingRun, TrainingStats};
