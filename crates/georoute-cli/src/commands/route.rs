//! Route command handler.

use anyhow::{Context, Result};
use tracing::debug;

use georoute_cli::args::RouteArgs;
use georoute_cli::output::{render_summary, OutputFormat};
use georoute_lib::{route, RouteSummary};

/// Build the graph, plan the route and print its summary.
pub fn handle_route_command(args: &RouteArgs, format: OutputFormat) -> Result<()> {
    let graph = args.load_graph()?;
    debug!(nodes = graph.len(), edges = graph.edge_count(), "graph ready");

    let request = args.to_request(false);
    let plan = route(&graph, &request).with_context(|| {
        format!(
            "failed to route from {} to {} with {}",
            args.from, args.to, args.algorithm
        )
    })?;

    let summary = RouteSummary::from_plan(&graph, &plan)?;
    println!("{}", render_summary(&summary, format)?);
    Ok(())
}
