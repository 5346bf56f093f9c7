//! # Output Rendering
//!
//! Human and JSON views of enumeration results.

use quandle_core::{CayleyGraph, ExpansionReport, Outcome, QuandleError, canonical_checksum};
use serde_json::{Value, json};

/// Summary of a report: outcome, counts and counters.
#[must_use]
pub fn report_summary(report: &ExpansionReport) -> Value {
    let (outcome, limit, reached) = match report.outcome {
        Outcome::Complete => ("complete", None, None),
        Outcome::Inconclusive(exhausted) => (
            "inconclusive",
            Some(exhausted.limit.to_string()),
            Some(exhausted.reached),
        ),
    };

    json!({
        "outcome": outcome,
        "limit": limit,
        "reached": reached,
        "vertex_count": report.graph.vertex_count(),
        "edge_count": report.graph.edge_count(),
        "stats": report.stats,
    })
}

/// Full JSON view of a graph with consecutive vertex ids.
#[must_use]
pub fn graph_json(graph: &CayleyGraph) -> Value {
    let relabeled = graph.relabeled();
    json!({
        "generator_count": relabeled.generator_count(),
        "vertices": relabeled.vertices().map(|v| v.0).collect::<Vec<_>>(),
        "edges": relabeled
            .edges()
            .map(|e| json!([e.source.0, e.target.0, e.label.0]))
            .collect::<Vec<_>>(),
    })
}

/// Summary plus graph.
#[must_use]
pub fn report_json(report: &ExpansionReport) -> Value {
    let mut value = report_summary(report);
    if let Value::Object(map) = &mut value {
        map.insert("graph".to_string(), graph_json(&report.graph));
    }
    value
}

/// Invariant checks of a graph, as JSON.
#[must_use]
pub fn graph_checks(graph: &CayleyGraph) -> Value {
    json!({
        "vertex_count": graph.vertex_count(),
        "edge_count": graph.edge_count(),
        "functional": graph.is_functional(),
        "injective": graph.is_injective(),
        "total": graph.is_total(),
        "checksum": canonical_checksum(graph),
    })
}

/// One line per edge, `x -a-> y`, with consecutive vertex ids.
#[must_use]
pub fn graph_text(graph: &CayleyGraph) -> String {
    let relabeled = graph.relabeled();
    let mut out = String::new();
    for edge in relabeled.edges() {
        out.push_str(&format!(
            "{} -{}-> {}\n",
            edge.source,
            CayleyGraph::label_letter(edge.label),
            edge.target
        ));
    }
    out
}

/// Pretty JSON text.
pub fn pretty(value: &Value) -> Result<String, QuandleError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| QuandleError::SerializationError(e.to_string()))
}
