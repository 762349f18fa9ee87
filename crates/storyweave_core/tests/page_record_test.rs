//! Tests for converting legacy page records into flow form.

use serde_json::json;
use storyweave_core::{ChoiceSource, RawConnection, RawDecision, RawStoryData};

#[test]
fn test_choices_become_decisions_and_connections() {
    let raw = RawStoryData::from_page_record(json!({
        "start": {
            "id": "start",
            "title": "Start",
            "content": "Pick one.",
            "choices": [
                { "text": "Door", "nextPage": "door" },
                { "text": "Window", "nextPage": "window" },
                { "text": "Wait" }
            ]
        },
        "door": { "id": "door", "content": "Open." }
    }))
    .expect("Page record should convert");

    assert_eq!(
        raw.connections(),
        &vec![RawConnection::new("start", "door", Some(0))]
    );

    let ChoiceSource::Decisions(decisions) = raw.nodes()[0].choice_source() else {
        panic!("Expected decisions");
    };
    assert_eq!(
        decisions,
        &vec![
            RawDecision::new("Door", Some("door")),
            RawDecision::new("Window", None),
            RawDecision::new("Wait", None),
        ]
    );
}

#[test]
fn test_record_key_fills_missing_id() {
    let raw = RawStoryData::from_page_record(json!({
        "hall": { "content": "Echoes." }
    }))
    .expect("Page record should convert");

    assert_eq!(raw.nodes()[0].id(), "hall");
    assert_eq!(raw.nodes()[0].kind().as_deref(), Some("story"));
}

#[test]
fn test_ending_types_map_to_tags() {
    let raw = RawStoryData::from_page_record(json!({
        "a": { "isEnding": true, "endingType": "best" },
        "b": { "isEnding": true, "endingType": "good" },
        "c": { "isEnding": true, "endingType": "bad" },
        "d": { "isEnding": true, "endingType": "strange" },
        "e": { "isEnding": true },
        "f": { "endingType": "best" }
    }))
    .expect("Page record should convert");

    let tags: Vec<&str> = raw
        .nodes()
        .iter()
        .map(|node| node.kind().as_deref().unwrap_or_default())
        .collect();
    assert_eq!(
        tags,
        vec!["bestEnding", "goodEnding", "badEnding", "badEnding", "badEnding", "story"]
    );
}

#[test]
fn test_images_are_kept_in_order() {
    let raw = RawStoryData::from_page_record(json!({
        "a": { "images": ["one.png", 2, "three.png"] }
    }))
    .expect("Page record should convert");

    assert_eq!(
        raw.nodes()[0].images(),
        &Some(json!(["one.png", "three.png"]))
    );
}

#[test]
fn test_non_object_record_is_rejected() {
    assert!(RawStoryData::from_page_record(json!(["a", "b"])).is_err());
}
