//! Trace command handler: plan a route and replay its search.

use anyhow::{Context, Result};

use georoute_cli::args::RouteArgs;
use georoute_cli::output::{render_summary, render_trace, OutputFormat};
use georoute_cli::terminal::ColorPalette;
use georoute_lib::{route, RouteSummary};

/// Print every recorded search step followed by the route summary.
///
/// With `--format json` the step list is printed as a JSON array instead.
pub fn handle_trace_command(args: &RouteArgs, format: OutputFormat) -> Result<()> {
    let graph = args.load_graph()?;
    let request = args.to_request(true);
    let plan = route(&graph, &request).with_context(|| {
        format!(
            "failed to route from {} to {} with {}",
            args.from, args.to, args.algorithm
        )
    })?;
    let trace = plan.trace.clone().unwrap_or_default();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&trace)?);
        }
        OutputFormat::Text => {
            print!("{}", render_trace(&trace, &ColorPalette::detect()));
            let summary = RouteSummary::from_plan(&graph, &plan)?;
            println!("{}", render_summary(&summary, format)?);
        }
    }
    Ok(())
}
