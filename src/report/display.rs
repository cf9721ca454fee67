use crate::errors::{EngineError, EngineResult};
use crate::risk::RiskStatistics;
use plotly::color::NamedColor;
use plotly::histogram::HistNorm;
use plotly::layout::{Shape, ShapeLine, ShapeType};
use plotly::{Histogram, Layout, Plot};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub bins: usize,
    /// Write the histogram as standalone HTML here
    pub save_path: Option<PathBuf>,
    /// Open the interactive viewer
    pub show: bool,
}

/// Density histogram of the loss vector. VaR and ES are drawn as red
/// vertical lines when both the statistics and the trial count are known.
pub fn build_histogram(
    losses: &[f64],
    bins: usize,
    stats: Option<&RiskStatistics>,
    trials: Option<usize>,
) -> Plot {
    let name = match trials {
        Some(n) => format!("portfolio loss (n = {n})"),
        None => "portfolio loss".to_string(),
    };

    let trace = Histogram::new(losses.to_vec())
        .name(name.as_str())
        .n_bins_x(bins)
        .hist_norm(HistNorm::ProbabilityDensity);

    let mut plot = Plot::new();
    plot.add_trace(trace);

    let mut layout = Layout::new();
    if let (Some(s), Some(_)) = (stats, trials) {
        layout.add_shape(marker_line(s.var));
        layout.add_shape(marker_line(s.es));
    }
    plot.set_layout(layout);
    plot
}

fn marker_line(x: f64) -> Shape {
    Shape::new()
        .shape_type(ShapeType::Line)
        .x_ref("x")
        .y_ref("paper")
        .x0(x)
        .x1(x)
        .y0(0.0)
        .y1(1.0)
        .line(ShapeLine::new().color(NamedColor::Red).width(2.0))
}

fn display_available() -> bool {
    cfg!(any(target_os = "macos", target_os = "windows"))
        || std::env::var_os("DISPLAY").is_some()
        || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// Save and/or show the histogram. Errors are returned, never panicked.
pub fn render(
    losses: &[f64],
    opts: &DisplayOptions,
    stats: Option<&RiskStatistics>,
) -> EngineResult<()> {
    let plot = build_histogram(losses, opts.bins, stats, Some(losses.len()));

    if let Some(path) = &opts.save_path {
        std::fs::write(path, plot.to_html())
            .map_err(|e| EngineError::Display(format!("write {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "histogram saved");
    }

    if opts.show {
        if !display_available() {
            return Err(EngineError::Display("no display environment".into()));
        }
        // The viewer launcher panics on I/O failure.
        panic::catch_unwind(AssertUnwindSafe(|| plot.show()))
            .map_err(|_| EngineError::Display("plot viewer failed".into()))?;
    }

    Ok(())
}

/// Like `render`, but a failure is only logged. Results computed before
/// this call are unaffected.
pub fn display(losses: &[f64], opts: &DisplayOptions, stats: Option<&RiskStatistics>) {
    if let Err(e) = render(losses, opts, stats) {
        tracing::warn!(error = %e, "unable to display");
    }
}
