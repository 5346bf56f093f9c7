//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::{CommandStatus, RunArgs};
use quandle::config::{Overrides, PresentationFile, parse_order_arg, parse_relation_arg};
use quandle::files::{MAX_IMPORT_FILE_SIZE, read_bounded, write_output};
use quandle::progress::TracingObserver;
use quandle::render;
use quandle_core::{
    ExpansionReport, Expander, Outcome, QuandleError, canonical_checksum, compute_blake3_hash,
    export_canonical, import_canonical, report_from_bytes, report_to_bytes,
};
use std::path::Path;

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Enumerate a presentation and print or write the result.
pub fn cmd_run(json_mode: bool, args: &RunArgs) -> Result<CommandStatus, QuandleError> {
    let relations = args
        .relations
        .iter()
        .map(|text| parse_relation_arg(text))
        .collect::<Result<Vec<_>, _>>()?;
    let extra_secondary = args
        .secondary
        .iter()
        .map(|text| parse_relation_arg(text))
        .collect::<Result<Vec<_>, _>>()?;
    let generator_orders = args
        .generator_orders
        .as_deref()
        .map(parse_order_arg)
        .transpose()?;

    let overrides = Overrides {
        generators: args.generators,
        relations,
        extra_secondary,
        rack: args.rack,
        order: args.order,
        generator_orders,
        max_steps: args.max_steps,
        max_vertices: args.max_vertices,
        max_closure_passes: args.max_closure_passes,
    };

    let file = PresentationFile::resolve(args.file.as_deref(), &overrides)?;
    let presentation = file.to_presentation()?;
    let budget = file.to_budget()?;

    tracing::info!(
        generators = presentation.generator_count(),
        relations = presentation.relations().len(),
        structure = ?presentation.structure(),
        orders = ?presentation.orders(),
        "starting enumeration"
    );

    let mut observer = TracingObserver::new();
    let report = Expander::new(presentation)
        .with_budget(budget)?
        .run(&mut observer);

    write_run_output(json_mode, args, &report)?;

    Ok(match report.outcome {
        Outcome::Complete => CommandStatus::Success,
        Outcome::Inconclusive(_) => CommandStatus::Inconclusive,
    })
}

fn write_run_output(
    json_mode: bool,
    args: &RunArgs,
    report: &ExpansionReport,
) -> Result<(), QuandleError> {
    let data = match args.format.as_str() {
        "json" => render::pretty(&render::report_json(report))?.into_bytes(),
        "text" => render::graph_text(&report.graph).into_bytes(),
        "canonical" => {
            if !report.is_complete() {
                return Err(QuandleError::SerializationError(
                    "Canonical export needs a complete enumeration; use -t report for partial results"
                        .to_string(),
                ));
            }
            export_canonical(&report.graph)?
        }
        "report" => report_to_bytes(report)?,
        _ => {
            return Err(QuandleError::SerializationError(format!(
                "Unknown format: {}. Use: json, canonical, report, text",
                args.format
            )));
        }
    };

    match &args.output {
        Some(path) => {
            let written = write_output(path, &data)?;
            print_summary(json_mode, report)?;
            if !json_mode {
                println!("Wrote {} bytes to {:?}", data.len(), written);
            }
        }
        None if matches!(args.format.as_str(), "json" | "text") => {
            if !json_mode && args.format == "text" {
                print_summary(false, report)?;
                println!();
            }
            print!("{}", String::from_utf8_lossy(&data));
            if args.format == "json" {
                println!();
            }
        }
        None => {
            return Err(QuandleError::IoError(format!(
                "Format '{}' is binary; pass --output",
                args.format
            )));
        }
    }

    Ok(())
}

fn print_summary(json_mode: bool, report: &ExpansionReport) -> Result<(), QuandleError> {
    if json_mode {
        println!("{}", render::pretty(&render::report_summary(report))?);
        return Ok(());
    }

    println!("Quandle Enumeration");
    println!("===================");
    match report.outcome {
        Outcome::Complete => println!("Outcome:  complete"),
        Outcome::Inconclusive(exhausted) => println!("Outcome:  inconclusive ({})", exhausted),
    }
    println!("Vertices: {}", report.graph.vertex_count());
    println!("Edges:    {}", report.graph.edge_count());
    println!("Steps:    {}", report.stats.steps);
    println!("Peak:     {} vertices", report.stats.peak_vertices);
    Ok(())
}

// =============================================================================
// VALIDATE COMMAND
// =============================================================================

/// Check a presentation file.
pub fn cmd_validate(json_mode: bool, file: &Path) -> Result<CommandStatus, QuandleError> {
    let config = PresentationFile::load(file)?;
    let presentation = config.to_presentation()?;
    let budget = config.to_budget()?;
    let secondary = presentation.secondary_relations();

    if json_mode {
        let output = serde_json::json!({
            "valid": true,
            "generators": presentation.generator_count(),
            "structure": presentation.structure(),
            "orders": presentation.orders(),
            "relations": presentation.relations().len(),
            "extra_secondary": presentation.extra_secondary().len(),
            "secondary_relations": secondary.len(),
            "budget": budget,
        });
        println!("{}", render::pretty(&output)?);
        return Ok(CommandStatus::Success);
    }

    println!("Presentation OK: {:?}", file);
    println!("  Generators:          {}", presentation.generator_count());
    println!("  Structure:           {:?}", presentation.structure());
    println!("  Orders:              {:?}", presentation.orders());
    println!("  Relations:           {}", presentation.relations().len());
    println!("  Extra secondary:     {}", presentation.extra_secondary().len());
    println!("  Secondary relations: {}", secondary.len());
    if budget.is_unbounded() {
        println!("  Budget:              unbounded");
    } else {
        let show = |limit: Option<String>| limit.unwrap_or_else(|| "-".to_string());
        println!(
            "  Budget:              steps {}, vertices {}, closure passes {}",
            show(budget.max_steps.map(|v| v.to_string())),
            show(budget.max_vertices.map(|v| v.to_string())),
            show(budget.max_closure_passes.map(|v| v.to_string()))
        );
    }

    Ok(CommandStatus::Success)
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// Load an exported file and report its invariants.
pub fn cmd_inspect(
    json_mode: bool,
    input: &Path,
    format: &str,
) -> Result<CommandStatus, QuandleError> {
    let data = read_bounded(input, MAX_IMPORT_FILE_SIZE)?;

    let (graph, summary) = match format {
        "canonical" => (import_canonical(&data)?, None),
        "report" => {
            let report = report_from_bytes(&data)?;
            let summary = render::report_summary(&report);
            (report.graph, Some(summary))
        }
        _ => {
            return Err(QuandleError::SerializationError(format!(
                "Unknown format: {}. Use: canonical, report",
                format
            )));
        }
    };

    if json_mode {
        let output = serde_json::json!({
            "checks": render::graph_checks(&graph),
            "report": summary,
        });
        println!("{}", render::pretty(&output)?);
        return Ok(CommandStatus::Success);
    }

    println!("Inspecting {:?} ({})", input, format);
    if let Some(summary) = &summary {
        println!(
            "Outcome:     {}",
            summary["outcome"].as_str().unwrap_or("unknown")
        );
    }
    println!("Generators:  {}", graph.generator_count());
    println!("Vertices:    {}", graph.vertex_count());
    println!("Edges:       {}", graph.edge_count());
    println!("Functional:  {}", graph.is_functional());
    println!("Injective:   {}", graph.is_injective());
    println!("Total:       {}", graph.is_total());
    println!("Checksum:    {}", canonical_checksum(&graph));

    Ok(CommandStatus::Success)
}

// =============================================================================
// HASH COMMAND
// =============================================================================

/// Compute the BLAKE3 hash of a canonical export file.
pub fn cmd_hash(json_mode: bool, input: &Path) -> Result<CommandStatus, QuandleError> {
    let data = read_bounded(input, MAX_IMPORT_FILE_SIZE)?;

    // only hash files that decode as a canonical export
    let graph = import_canonical(&data)?;
    let hash = compute_blake3_hash(&data);
    let checksum = canonical_checksum(&graph);

    if json_mode {
        let output = serde_json::json!({
            "hash": hash,
            "algorithm": "BLAKE3",
            "vertex_count": graph.vertex_count(),
            "edge_count": graph.edge_count(),
            "checksum": checksum,
        });
        println!("{}", render::pretty(&output)?);
        return Ok(CommandStatus::Success);
    }

    println!("BLAKE3 Hash: {}", hash);
    println!(
        "Graph: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );
    println!("Checksum (XOR): {}", checksum);

    Ok(CommandStatus::Success)
}
