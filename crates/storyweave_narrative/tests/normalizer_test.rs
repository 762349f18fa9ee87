//! Tests for graph normalization.

use serde_json::{Value, json};
use storyweave_core::{EndingType, RawChoice, RawConnection, RawNode, RawStoryData};
use storyweave_narrative::{NormalizedStory, ResolutionSource, StoryGraph, TraceEvent, normalize};

fn normalize_json(value: Value) -> NormalizedStory {
    let raw = RawStoryData::from_value(value).expect("Story data should parse");
    normalize(&raw)
}

fn unused_connections(story: &NormalizedStory) -> Vec<usize> {
    story
        .trace()
        .events()
        .iter()
        .filter_map(|event| match event {
            TraceEvent::ConnectionUnused { connection_index, .. } => Some(*connection_index),
            _ => None,
        })
        .collect()
}

fn target<'a>(story: &'a NormalizedStory, page: &str, slot: usize) -> Option<&'a str> {
    story.pages()[page].decisions()[slot].target_id().as_deref()
}

#[test]
fn test_normalization_is_deterministic() {
    let raw = RawStoryData::from_value(json!({
        "nodes": [
            { "id": "a", "type": "intro", "content": "One", "decisions": [{ "text": "x" }, { "text": "y" }] },
            { "id": "b", "content": "Two", "images": ["b1.png", "b2.png"] },
            { "id": "c", "type": "goodEnding", "content": "Three" }
        ],
        "connections": [
            { "sourceId": "a", "targetId": "b", "sourceHandle": 0 },
            { "sourceId": "a", "targetId": "c", "sourceHandle": 1 }
        ]
    }))
    .expect("Story data should parse");

    let first = normalize(&raw);
    let second = normalize(&raw);

    assert!(first.pages().iter().eq(second.pages().iter()));
    assert_eq!(first.trace(), second.trace());
    let order: Vec<&str> = first.pages().keys().map(String::as_str).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn test_explicit_target_beats_connection() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Go", "targetId": "B" }] },
            { "id": "B" },
            { "id": "C" }
        ],
        "connections": [{ "sourceId": "A", "targetId": "C", "sourceHandle": 0 }]
    }));

    assert_eq!(target(&story, "A", 0), Some("B"));
    let sources: Vec<&ResolutionSource> = story
        .trace()
        .decisions_for("A")
        .filter_map(|event| match event {
            TraceEvent::DecisionResolved { source, .. } => Some(source),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec![&ResolutionSource::Explicit]);
}

#[test]
fn test_connection_fills_missing_target() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Go" }] },
            { "id": "X" }
        ],
        "connections": [{ "sourceId": "A", "targetId": "X", "sourceHandle": 0 }]
    }));

    assert_eq!(target(&story, "A", 0), Some("X"));
    assert!(story.trace().decisions_for("A").any(|event| matches!(
        event,
        TraceEvent::DecisionResolved {
            source: ResolutionSource::Connection { connection_index: 0 },
            ..
        }
    )));
}

#[test]
fn test_empty_explicit_target_falls_back_to_connection() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Go", "targetId": "" }] },
            { "id": "X" }
        ],
        "connections": [{ "sourceId": "A", "targetId": "X", "sourceHandle": 0 }]
    }));

    assert_eq!(target(&story, "A", 0), Some("X"));
}

#[test]
fn test_handle_selects_slot() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Left" }, { "text": "Right" }] },
            { "id": "L" },
            { "id": "R" }
        ],
        "connections": [
            { "sourceId": "A", "targetId": "R", "sourceHandle": 1 },
            { "sourceId": "A", "targetId": "L", "sourceHandle": 0 }
        ]
    }));

    assert_eq!(target(&story, "A", 0), Some("L"));
    assert_eq!(target(&story, "A", 1), Some("R"));
}

#[test]
fn test_handleless_connection_matches_every_slot() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "One" }, { "text": "Two" }] },
            { "id": "X" },
            { "id": "Y" }
        ],
        "connections": [
            { "sourceId": "A", "targetId": "X" },
            { "sourceId": "A", "targetId": "Y" }
        ]
    }));

    // First match in list order wins for each slot
    assert_eq!(target(&story, "A", 0), Some("X"));
    assert_eq!(target(&story, "A", 1), Some("X"));
}

#[test]
fn test_out_of_range_handle_is_ignored() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Only" }] },
            { "id": "B" }
        ],
        "connections": [{ "sourceId": "A", "targetId": "B", "sourceHandle": 3 }]
    }));

    assert_eq!(target(&story, "A", 0), None);
    assert!(story.trace().events().iter().any(|event| matches!(
        event,
        TraceEvent::ConnectionUnused {
            connection_index: 0,
            source_handle: Some(3),
            ..
        }
    )));
}

#[test]
fn test_direct_choices_ignore_connections() {
    let story = normalize_json(json!({
        "nodes": [
            {
                "id": "A",
                "choices": [
                    { "text": "Run", "nextPage": "B" },
                    { "text": "Hide" }
                ]
            },
            { "id": "B" },
            { "id": "C" }
        ],
        "connections": [
            { "sourceId": "A", "targetId": "C", "sourceHandle": 0 },
            { "sourceId": "A", "targetId": "C", "sourceHandle": 1 }
        ]
    }));

    assert_eq!(target(&story, "A", 0), Some("B"));
    assert_eq!(target(&story, "A", 1), None);
    // Connections never apply to direct-format nodes
    let unused = story
        .trace()
        .events()
        .iter()
        .filter(|event| matches!(event, TraceEvent::ConnectionUnused { .. }))
        .count();
    assert_eq!(unused, 2);
}

#[test]
fn test_decisions_win_over_choices() {
    let story = normalize_json(json!({
        "nodes": [
            {
                "id": "A",
                "decisions": [{ "text": "From decisions", "targetId": "B" }],
                "choices": [{ "text": "From choices", "nextPage": "B" }]
            },
            { "id": "B" }
        ]
    }));

    let decisions = story.pages()["A"].decisions();
    assert_eq!(decisions.len(), 1);
    assert_eq!(decisions[0].text(), "From decisions");
}

#[test]
fn test_dangling_target_is_cleared() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Into the void", "targetId": "ghost" }] }
        ]
    }));

    assert_eq!(target(&story, "A", 0), None);
    assert!(story.trace().events().contains(&TraceEvent::DanglingTarget {
        page_id: "A".to_string(),
        index: 0,
        target: "ghost".to_string(),
    }));
}

#[test]
fn test_images_are_coerced_to_strings() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "mixed", "images": ["a.png", 3, null, "b.png"] },
            { "id": "scalar", "images": "c.png" },
            { "id": "none" }
        ]
    }));

    assert_eq!(story.pages()["mixed"].images(), &vec!["a.png", "b.png"]);
    assert!(story.pages()["scalar"].images().is_empty());
    assert!(story.pages()["none"].images().is_empty());
}

#[test]
fn test_defaults_for_missing_fields() {
    let story = normalize_json(json!({ "nodes": [{ "id": "bare" }] }));
    let page = &story.pages()["bare"];

    assert_eq!(page.kind(), "story");
    assert_eq!(page.content(), "");
    assert_eq!(page.display_title(), "Untitled");
    assert!(page.decisions().is_empty());
    assert!(!*page.is_ending());
}

#[test]
fn test_ending_derived_from_type_tag() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "best", "type": "bestEnding" },
            { "id": "claimed", "type": "story", "isEnding": true, "endingType": "good" }
        ]
    }));

    let best = &story.pages()["best"];
    assert!(*best.is_ending());
    assert_eq!(best.ending_type(), &Some(EndingType::Best));

    let claimed = &story.pages()["claimed"];
    assert!(!*claimed.is_ending());
    assert_eq!(claimed.ending_type(), &None);
}

#[test]
fn test_duplicate_id_keeps_first_position_and_last_content() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "a", "content": "first" },
            { "id": "b" },
            { "id": "a", "content": "second" }
        ]
    }));

    let order: Vec<&str> = story.pages().keys().map(String::as_str).collect();
    assert_eq!(order, vec!["a", "b"]);
    assert_eq!(story.pages()["a"].content(), "second");
    assert!(story.trace().events().contains(&TraceEvent::DuplicatePage {
        id: "a".to_string()
    }));
    assert_eq!(*story.trace().page_count(), 2);
}

#[test]
fn test_unreadable_nodes_are_skipped_and_traced() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "kept" },
            "not a node",
            { "content": "no id" }
        ]
    }));

    assert_eq!(story.pages().len(), 1);
    assert_eq!(*story.trace().node_count(), 3);
    let skipped: Vec<usize> = story
        .trace()
        .events()
        .iter()
        .filter_map(|event| match event {
            TraceEvent::NodeSkipped { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![1, 2]);
}

#[test]
fn test_unknown_fields_are_preserved() {
    let story = normalize_json(json!({
        "nodes": [{ "id": "a", "position": { "x": 10, "y": 20 } }]
    }));

    assert_eq!(
        story.pages()["a"].extra().get("position"),
        Some(&json!({ "x": 10, "y": 20 }))
    );
}

#[test]
fn test_numeric_identifiers_become_strings() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": 1, "choices": [{ "text": "On", "nextPage": 2 }] },
            { "id": 2 }
        ]
    }));

    assert_eq!(target(&story, "1", 0), Some("2"));
}

#[test]
fn test_connection_behind_explicit_target_is_unused() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Go", "targetId": "B" }] },
            { "id": "B" },
            { "id": "C" }
        ],
        "connections": [{ "sourceId": "A", "targetId": "C", "sourceHandle": 0 }]
    }));

    assert_eq!(unused_connections(&story), vec![0]);
}

#[test]
fn test_shadowed_connection_is_unused() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "One" }, { "text": "Two" }] },
            { "id": "X" },
            { "id": "Y" },
            { "id": "Z" }
        ],
        "connections": [
            { "sourceId": "A", "targetId": "X", "sourceHandle": 0 },
            { "sourceId": "A", "targetId": "Y", "sourceHandle": 0 },
            { "sourceId": "A", "targetId": "Z" }
        ]
    }));

    assert_eq!(target(&story, "A", 0), Some("X"));
    assert_eq!(target(&story, "A", 1), Some("Z"));
    assert_eq!(unused_connections(&story), vec![1]);
}

#[test]
fn test_connections_that_fill_slots_are_not_reported() {
    let story = normalize_json(json!({
        "nodes": [
            { "id": "A", "decisions": [{ "text": "Left" }, { "text": "Right" }] },
            { "id": "L" },
            { "id": "R" }
        ],
        "connections": [
            { "sourceId": "A", "targetId": "L", "sourceHandle": 0 },
            { "sourceId": "A", "targetId": "R", "sourceHandle": 1 }
        ]
    }));

    assert!(unused_connections(&story).is_empty());
    assert_eq!(story.trace().inconsistency_count(), 0);
}

#[test]
fn test_typed_input_normalizes_like_json() {
    let raw = RawStoryData::new(
        vec![
            RawNode::new("dock")
                .with_kind("intro")
                .with_content("Boats bob.")
                .with_choices(vec![
                    RawChoice::new("Board", Some("ship")),
                    RawChoice::new("Stay", None),
                ]),
            RawNode::new("ship").with_kind("goodEnding"),
        ],
        vec![RawConnection::new("dock", "dock", Some(0))],
    );
    let (graph, trace) = StoryGraph::from_raw(&raw).expect("Graph should build");

    let dock = &graph.page_map()["dock"];
    assert_eq!(dock.decisions()[0].target_id().as_deref(), Some("ship"));
    assert_eq!(dock.decisions()[1].target_id(), &None);
    let order: Vec<&str> = graph.page_map().keys().map(String::as_str).collect();
    assert_eq!(order, vec!["dock", "ship"]);
    // Direct-format choices never consult connections
    assert!(trace.events().iter().any(|event| matches!(
        event,
        TraceEvent::ConnectionUnused {
            connection_index: 0,
            ..
        }
    )));
}
