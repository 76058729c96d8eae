use std::{
    fs::File,
    io::BufWriter,
    path::PathBuf,
};

use pipeline::Point;
use serde::Serialize;

use crate::RunError;

/// Display options for a scatter plot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlotOptions {
    pub x_label: String,
    pub y_label: String,
    pub height: u32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            x_label: "Input".to_string(),
            y_label: "Output".to_string(),
            height: 140,
        }
    }
}

/// One labeled point cloud of a plot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Series<'a> {
    pub label: &'a str,
    pub points: &'a [Point],
}

/// The rendering collaborator: consumes labeled point clouds for display.
/// Its effect is presentation only; no pipeline result depends on it.
pub trait ScatterRenderer {
    /// Renders one plot.
    ///
    /// # Errors
    /// Returns `RunError` when emitting the plot fails (e.g. I/O).
    fn render(
        &mut self,
        title: &str,
        series: &[Series<'_>],
        options: &PlotOptions,
    ) -> Result<(), RunError>;
}

/// Renders by summarizing each series through the logging facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl ScatterRenderer for LogRenderer {
    fn render(
        &mut self,
        title: &str,
        series: &[Series<'_>],
        options: &PlotOptions,
    ) -> Result<(), RunError> {
        for s in series {
            let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
            let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
            for p in s.points {
                x_min = x_min.min(p.x);
                x_max = x_max.max(p.x);
                y_min = y_min.min(p.y);
                y_max = y_max.max(p.y);
            }

            log::info!(
                "{title}: {}: {} point(s), {} [{x_min:.4}, {x_max:.4}], {} [{y_min:.4}, {y_max:.4}]",
                s.label,
                s.points.len(),
                options.x_label,
                options.y_label,
            );
        }

        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
struct PlotDocument<'a> {
    title: &'a str,
    options: &'a PlotOptions,
    series: &'a [Series<'a>],
}

/// Renders each plot as a JSON document next to `base`, numbered in render
/// order, for external plotting tools.
#[derive(Debug)]
pub struct JsonRenderer {
    base: PathBuf,
    seq: usize,
}

impl JsonRenderer {
    /// Creates a new `JsonRenderer` writing plot files derived from `base`
    /// (e.g. `clouds.json` becomes `clouds-000.json`, `clouds-001.json`, …).
    pub fn new(base: PathBuf) -> Self {
        Self { base, seq: 0 }
    }

    fn target(&self) -> PathBuf {
        let stem = self
            .base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "plot".to_string());
        self.base.with_file_name(format!("{stem}-{:03}.json", self.seq))
    }
}

impl ScatterRenderer for JsonRenderer {
    fn render(
        &mut self,
        title: &str,
        series: &[Series<'_>],
        options: &PlotOptions,
    ) -> Result<(), RunError> {
        let path = self.target();
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(
            BufWriter::new(file),
            &PlotDocument {
                title,
                options,
                series,
            },
        )?;

        log::info!("{title}: wrote {} series to {}", series.len(), path.display());
        self.seq += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_renderer_accepts_empty_series() {
        let options = PlotOptions::default();
        assert!(LogRenderer.render("empty", &[], &options).is_ok());
    }

    #[test]
    fn json_renderer_writes_numbered_parseable_documents() {
        let base = std::env::temp_dir().join(format!(
            "curve-fit-clouds-{}.json",
            std::process::id()
        ));
        let mut renderer = JsonRenderer::new(base.clone());
        let points = [Point { x: 1.0, y: 2.0 }, Point { x: 3.0, y: 4.0 }];
        let series = [Series {
            label: "Actual",
            points: &points,
        }];

        renderer
            .render("test plot", &series, &PlotOptions::default())
            .unwrap();

        let written = base.with_file_name(
            base.file_stem()
                .map(|s| format!("{}-000.json", s.to_string_lossy()))
                .unwrap(),
        );
        let text = std::fs::read_to_string(&written).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(doc["title"], "test plot");
        assert_eq!(doc["series"][0]["points"][1]["y"], 4.0);

        std::fs::remove_file(written).ok();
    }
}
