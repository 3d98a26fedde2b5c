//! HTML report generation for training runs
//!
//! Writes `index.html` with a fitness chart and the captured generation GIFs,
//! plus `stats.ron` with the full per-generation history.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::training_run::TrainingStats;
use crate::config::RunConfig;

/// A GIF written during training
#[derive(Debug, Clone)]
pub struct CapturedGif {
    /// Label for this GIF (e.g., "Generation 10")
    pub label: String,
    pub generation: u64,
    /// File name relative to the output directory
    pub file_name: String,
}

/// Generates HTML reports for training runs
pub struct ReportGenerator {
    output_dir: PathBuf,
    run_config: RunConfig,
}

impl ReportGenerator {
    pub fn new(output_dir: impl AsRef<Path>, run_config: &RunConfig) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            run_config: run_config.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate the final HTML report and stats file
    pub fn generate_final_report(
        &self,
        stats_history: &[TrainingStats],
        gifs: &[CapturedGif],
    ) -> Result<()> {
        fs::create_dir_all(&self.output_dir).context("Failed to create output directory")?;

        let html = self.generate_html(stats_history, gifs);
        let path = self.output_dir.join("index.html");
        fs::write(&path, html).context("Failed to write report HTML")?;

        let ron = ron::ser::to_string_pretty(stats_history, ron::ser::PrettyConfig::default())
            .context("Failed to serialize stats history")?;
        fs::write(self.output_dir.join("stats.ron"), ron).context("Failed to write stats")?;

        log::info!("Report generated: {}", path.display());
        Ok(())
    }

    fn generate_html(&self, stats_history: &[TrainingStats], gifs: &[CapturedGif]) -> String {
        let config = &self.run_config;
        let best = stats_history
            .iter()
            .map(|s| s.best_fitness)
            .fold(0.0f32, f32::max);
        let target_hits: usize = stats_history.iter().map(|s| s.target_hits).sum();
        let first_hit = stats_history
            .iter()
            .find(|s| s.target_hits > 0)
            .map(|s| s.generation.to_string())
            .unwrap_or_else(|| "never".to_string());

        let gif_html: String = gifs
            .iter()
            .map(|gif| {
                format!(
                    r#"<figure><img src="{}" alt="{}"><figcaption>{}</figcaption></figure>"#,
                    gif.file_name, gif.label, gif.label
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Rocketry Training Report</title>
    <style>
        body {{ font-family: sans-serif; max-width: 1000px; margin: 0 auto; padding: 20px; background: #1a1a2e; color: #eee; }}
        h1, h2 {{ color: #4ecdc4; }}
        .stats {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 16px; }}
        .stat {{ background: #16213e; padding: 16px; border-radius: 8px; text-align: center; }}
        .value {{ font-size: 1.6em; color: #4ecdc4; }}
        figure {{ display: inline-block; margin: 8px; }}
    </style>
</head>
<body>
    <h1>Rocketry Training Report</h1>
    <p>Generated {generated_at}</p>
    <p>Population {population}, lifespan {lifespan}, speed {speed}, {obstacles} obstacles, seed {seed}</p>
    <div class="stats">
        <div class="stat"><div class="value">{generations}</div>Generations</div>
        <div class="stat"><div class="value">{best:.4}</div>Best fitness</div>
        <div class="stat"><div class="value">{target_hits}</div>Target hits</div>
        <div class="stat"><div class="value">{first_hit}</div>First hit (generation)</div>
    </div>
    <h2>Fitness</h2>
    {chart}
    <h2>Generations</h2>
    {gif_html}
</body>
</html>
"#,
            generated_at = chrono::Local::now().to_rfc3339(),
            population = config.population,
            lifespan = config.lifespan,
            speed = config.speed,
            obstacles = config.total_obstacles,
            seed = config
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "random".to_string()),
            generations = stats_history.len(),
            best = best,
            target_hits = target_hits,
            first_hit = first_hit,
            chart = self.generate_fitness_svg(stats_history),
            gif_html = gif_html,
        )
    }

    /// Generate SVG chart for fitness over time
    fn generate_fitness_svg(&self, stats_history: &[TrainingStats]) -> String {
        if stats_history.is_empty() {
            return "<p>No data</p>".to_string();
        }

        let width = 600;
        let height = 200;
        let padding = 40;

        let max_fitness = stats_history
            .iter()
            .map(|s| s.max_fitness)
            .fold(0.0f32, f32::max);
        let max_fitness = if max_fitness > 0.0 { max_fitness } else { 1.0 };

        let mut max_path = String::new();
        let mut avg_path = String::new();

        for (i, stats) in stats_history.iter().enumerate() {
            let x = padding as f32
                + (i as f32 / stats_history.len() as f32) * (width - 2 * padding) as f32;
            let y_max = height as f32
                - padding as f32
                - (stats.max_fitness / max_fitness) * (height - 2 * padding) as f32;
            let y_avg = height as f32
                - padding as f32
                - (stats.average_fitness / max_fitness) * (height - 2 * padding) as f32;

            let op = if i == 0 { "M" } else { " L" };
            max_path.push_str(&format!("{op}{x:.1},{y_max:.1}"));
            avg_path.push_str(&format!("{op}{x:.1},{y_avg:.1}"));
        }

        format!(
            r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}">
    <line x1="{padding}" y1="{padding}" x2="{padding}" y2="{y_bottom}" stroke="gray" stroke-width="1"/>
    <line x1="{padding}" y1="{y_bottom}" x2="{x_right}" y2="{y_bottom}" stroke="gray" stroke-width="1"/>
    <path d="{avg_path}" fill="none" stroke="gray" stroke-width="2"/>
    <path d="{max_path}" fill="none" stroke="cyan" stroke-width="2"/>
    <text x="{padding}" y="{label_y}" fill="gray" font-size="12">0</text>
    <text x="{padding}" y="{top_label}" fill="gray" font-size="12">{max_fitness:.3}</text>
    <text x="{mid_x}" y="{xlabel_y}" fill="gray" font-size="12" text-anchor="middle">Generation</text>
</svg>"#,
            y_bottom = height - padding,
            x_right = width - padding,
            label_y = height - padding + 15,
            top_label = padding - 5,
            mid_x = width / 2,
            xlabel_y = height - 5,
        )
    }
}
