use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::distance::DistanceUnit;
use crate::error::Result;
use crate::graph::{NodeId, RoadGraph};
use crate::path::PathSegment;
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Plain,
    Json,
}

/// Snapped endpoint of a planned route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteEndpoint {
    pub node: NodeId,
    pub coordinate: Coordinate,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub unit: DistanceUnit,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub total_distance: f64,
    pub hops: usize,
    pub visited: usize,
    /// Route coordinates including edge shape points.
    pub path: Vec<Coordinate>,
    pub segments: Vec<PathSegment>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary using `graph` for units, segment
    /// weights and edge geometry.
    pub fn from_plan(graph: &RoadGraph, plan: &RoutePlan) -> Result<Self> {
        let endpoint = |node: NodeId| -> Result<RouteEndpoint> {
            let coordinate = graph
                .coordinate(node)
                .ok_or(crate::Error::UnknownNode { id: node })?;
            Ok(RouteEndpoint { node, coordinate })
        };

        Ok(Self {
            algorithm: plan.algorithm,
            unit: graph.unit(),
            start: endpoint(plan.start)?,
            goal: endpoint(plan.goal)?,
            total_distance: plan.total_cost(),
            hops: plan.hop_count(),
            visited: plan.visited,
            path: plan.path.expanded_geometry(graph),
            segments: plan.path.segments(graph),
        })
    }

    /// Render the summary using the requested mode.
    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::Plain => Ok(self.render_plain()),
            RenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({:.3} {}, {} hops, {} visited, algorithm: {})",
            self.start.coordinate,
            self.goal.coordinate,
            self.total_distance,
            self.unit,
            self.hops,
            self.visited,
            self.algorithm
        );
        for (index, segment) in self.segments.iter().enumerate() {
            let _ = writeln!(
                buffer,
                "{:>3}: {} -> {}  {:.3} {} {} ({:.0}°)",
                index + 1,
                segment.from,
                segment.to,
                segment.distance,
                self.unit,
                segment.heading,
                segment.bearing
            );
        }
        buffer
    }
}
