//! Output formatting for route summaries and trace replay.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;

use georoute_lib::{
    PlaybackProgress, RenderMode, RouteSummary, SearchDirection, StepSnapshot, StepTrace,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl From<OutputFormat> for RenderMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => RenderMode::Plain,
            OutputFormat::Json => RenderMode::Json,
        }
    }
}

/// Render a route summary in the requested format.
pub fn render_summary(summary: &RouteSummary, format: OutputFormat) -> Result<String> {
    Ok(summary.render(format.into())?)
}

/// One replay line for a trace step.
///
/// ```text
/// [ 3/42   7.1%] fwd node 12 (37.551200,126.980000) d=1.250 visited=3 seen=1
/// ```
pub fn render_trace_step(
    snapshot: &StepSnapshot,
    progress: &PlaybackProgress,
    palette: &ColorPalette,
) -> String {
    let (side_color, side) = match snapshot.direction {
        Some(SearchDirection::Forward) => (palette.forward, "fwd"),
        Some(SearchDirection::Backward) => (palette.backward, "bwd"),
        None => (palette.gray, "   "),
    };
    let width = progress.total_steps.to_string().len();

    let mut line = String::new();
    let _ = write!(
        line,
        "{gray}[{:>width$}/{} {:>5.1}%]{reset} {side_color}{side}{reset} node {current}{}{reset} ({}) d={dist}{:.3}{reset} visited={} seen={}",
        progress.current_step,
        progress.total_steps,
        progress.percent,
        snapshot.node,
        snapshot.coordinate,
        snapshot.distance,
        snapshot.visited.len(),
        seen_count(snapshot),
        gray = palette.gray,
        reset = palette.reset,
        current = palette.current,
        dist = palette.distance,
    );
    line
}

/// Nodes with a tentative distance that are not yet visited.
fn seen_count(snapshot: &StepSnapshot) -> usize {
    snapshot
        .distances
        .iter()
        .filter(|(id, _)| snapshot.visited.binary_search(id).is_err())
        .count()
}

/// Replay a whole trace, one line per step, via an independent cursor.
pub fn render_trace(trace: &StepTrace, palette: &ColorPalette) -> String {
    let mut buffer = String::new();
    let mut cursor = trace.cursor();
    let Some(first) = cursor.current() else {
        return buffer;
    };

    let _ = writeln!(buffer, "{}", render_trace_step(first, &cursor.progress(), palette));
    while !cursor.is_at_end() {
        if let Some(snapshot) = cursor.next_step() {
            let _ = writeln!(
                buffer,
                "{}",
                render_trace_step(snapshot, &cursor.progress(), palette)
            );
        }
    }
    buffer
}
