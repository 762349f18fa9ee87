//! Tests for start-page selection.

use serde_json::json;
use storyweave_core::{Page, RawStoryData};
use storyweave_narrative::{StartRule, StoryGraph};

fn graph(value: serde_json::Value) -> StoryGraph {
    let raw = RawStoryData::from_value(value).expect("Story data should parse");
    let (graph, _) = StoryGraph::from_raw(&raw).expect("Graph should build");
    graph
}

#[test]
fn test_page_number_one_wins() {
    let graph = graph(json!({
        "nodes": [
            { "id": "A", "type": "intro" },
            { "id": "B", "pageNumber": "1" },
            { "id": "C" }
        ]
    }));

    let start = graph.start().expect("Start page should exist");
    assert_eq!(start.id(), "B");
    assert_eq!(start.rule, StartRule::PageNumberOne);
}

#[test]
fn test_intro_when_no_page_one() {
    let graph = graph(json!({
        "nodes": [
            { "id": "A", "pageNumber": "2" },
            { "id": "B", "type": "intro" },
            { "id": "C", "type": "intro" }
        ]
    }));

    let start = graph.start().expect("Start page should exist");
    assert_eq!(start.id(), "B");
    assert_eq!(start.rule, StartRule::IntroType);
}

#[test]
fn test_first_page_as_fallback() {
    let graph = graph(json!({
        "nodes": [
            { "id": "A" },
            { "id": "B" },
            { "id": "C" }
        ]
    }));

    let start = graph.start().expect("Start page should exist");
    assert_eq!(start.id(), "A");
    assert_eq!(start.rule, StartRule::FirstPage);
}

#[test]
fn test_numeric_page_number_counts_only_as_string() {
    // A bare number is not a readable page number
    let graph = graph(json!({
        "nodes": [
            { "id": "A" },
            { "id": "B", "pageNumber": 1 }
        ]
    }));

    assert_eq!(graph.start().expect("Start page should exist").id(), "A");
}

#[test]
fn test_selection_uses_current_page_set() {
    let graph = StoryGraph::from_page_list(vec![
        Page::new("late", "").with_page_number(Some("1".to_string())),
        Page::new("early", "").with_kind("intro"),
    ])
    .expect("Graph should build");

    assert_eq!(graph.start().expect("Start page should exist").id(), "late");
}
