//! Inspect command handler.

use std::path::{Path, PathBuf};
use storyweave::{
    NormalizationTrace, ResolutionSource, StoryFormat, StoryGraph, TraceEvent, is_ending,
    load_story,
};

use super::InspectOutputFormat;

/// Handles the inspect command.
///
/// Exits with status 1 when the story cannot be loaded or has no readable
/// structure. Soft inconsistencies are reported but do not fail the command.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn handle_inspect_command(
    path: PathBuf,
    format: InspectOutputFormat,
    page_record: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting inspection");

    let raw = load_story(&path, StoryFormat::from_page_record_flag(page_record))?;
    let (graph, mut trace) = match StoryGraph::from_raw(&raw) {
        Ok(normalized) => normalized,
        Err(e) => {
            eprintln!("❌ {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let start = graph.start()?;
    trace.record_start(start.id(), start.rule);

    match format {
        InspectOutputFormat::Human => output_human(&path, &graph, &trace),
        InspectOutputFormat::Json => output_json(&graph, &trace)?,
    }

    Ok(())
}

/// Outputs the report in human-readable format.
fn output_human(path: &Path, graph: &StoryGraph, trace: &NormalizationTrace) {
    let issues = trace.inconsistency_count();
    let status_icon = if issues == 0 { "✅" } else { "⚠️" };

    println!("\n{} {}", status_icon, path.display());
    println!("{}", "─".repeat(80));
    println!(
        "  {} nodes, {} connections → {} pages",
        trace.node_count(),
        trace.connection_count(),
        trace.page_count()
    );
    if let Some((start, rule)) = trace.start_selection() {
        println!("  Start page: {} (by {})", start, rule);
    }

    println!("\nPages:");
    for page in graph.pages() {
        let marker = if is_ending(page) { " [ending]" } else { "" };
        println!(
            "\n  {} · {} · {}{}",
            page.id(),
            page.kind(),
            page.display_title(),
            marker
        );
        for (index, decision) in page.decisions().iter().enumerate() {
            let target = decision.target_id().as_deref().unwrap_or("(none)");
            println!("     {}. {} → {}", index + 1, decision.text(), target);
        }
        if page.image_count() > 0 {
            println!("     images: {}", page.image_count());
        }
    }

    let problems: Vec<String> = trace.events().iter().filter_map(describe_issue).collect();
    if problems.is_empty() {
        println!("\n  No issues found");
    } else {
        println!("\nIssues:");
        for (i, problem) in problems.iter().enumerate() {
            println!("  {}. {}", i + 1, problem);
        }
    }
}

/// One line for each event that marks an inconsistency in the input.
fn describe_issue(event: &TraceEvent) -> Option<String> {
    match event {
        TraceEvent::NodeSkipped { index, reason } => {
            Some(format!("node #{} skipped: {}", index, reason))
        }
        TraceEvent::DuplicatePage { id } => {
            Some(format!("page '{}' defined more than once; last one kept", id))
        }
        TraceEvent::DecisionResolved {
            page_id,
            index,
            text,
            source: ResolutionSource::Unresolved,
            ..
        } => Some(format!(
            "choice {} on '{}' (\"{}\") has no target",
            index + 1,
            page_id,
            text
        )),
        TraceEvent::DanglingTarget {
            page_id,
            index,
            target,
        } => Some(format!(
            "choice {} on '{}' points at missing page '{}'",
            index + 1,
            page_id,
            target
        )),
        TraceEvent::ConnectionUnused {
            connection_index,
            source_id,
            source_handle,
        } => Some(match source_handle {
            Some(handle) => format!(
                "connection #{} from '{}' handle {} never supplied a target",
                connection_index, source_id, handle
            ),
            None => format!(
                "connection #{} from '{}' never supplied a target",
                connection_index, source_id
            ),
        }),
        _ => None,
    }
}

/// Outputs the report in JSON format.
fn output_json(
    graph: &StoryGraph,
    trace: &NormalizationTrace,
) -> Result<(), Box<dyn std::error::Error>> {
    use serde_json::json;

    let output = json!({
        "pages": graph,
        "trace": trace,
        "inconsistencies": trace.inconsistency_count(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
