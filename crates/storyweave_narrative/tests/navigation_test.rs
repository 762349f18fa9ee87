//! Tests for reader position and history bookkeeping.

use storyweave_core::Page;
use storyweave_narrative::{NavigationState, StoryGraph, TransitionKind};

fn graph() -> StoryGraph {
    StoryGraph::from_page_list(vec![
        Page::new("start", "").with_page_number(Some("1".to_string())),
        Page::new("hall", ""),
        Page::new("vault", ""),
    ])
    .expect("Graph should build")
}

fn assert_invariant(state: &NavigationState) {
    assert!(!state.history().is_empty());
    assert_eq!(state.history().last(), Some(state.position()));
}

#[test]
fn test_new_state_is_at_start() {
    let state = NavigationState::new("start");
    assert_eq!(state.position(), "start");
    assert_eq!(state.history(), &vec!["start"]);
    assert!(!state.can_go_back());
    assert_invariant(&state);
}

#[test]
fn test_advance_and_back_keep_invariant() {
    let graph = graph();
    let mut state = NavigationState::new("start");

    let record = state
        .apply(&graph, &TransitionKind::Advance("hall".to_string()))
        .expect("Advance should apply");
    assert_eq!(record.from(), "start");
    assert_eq!(record.to(), "hall");
    assert_eq!(*record.history_len(), 2);
    assert_invariant(&state);

    state
        .apply(&graph, &TransitionKind::Advance("vault".to_string()))
        .expect("Advance should apply");
    state
        .apply(&graph, &TransitionKind::Back)
        .expect("Back should apply");
    assert_eq!(state.position(), "hall");
    assert_eq!(state.history(), &vec!["start", "hall"]);
    assert_invariant(&state);
}

#[test]
fn test_back_at_start_changes_nothing() {
    let graph = graph();
    let mut state = NavigationState::new("start");

    assert!(!state.pop());
    let record = state
        .apply(&graph, &TransitionKind::Back)
        .expect("Back should apply");
    assert_eq!(record.to(), "start");
    assert_eq!(state.history(), &vec!["start"]);
}

#[test]
fn test_restart_forgets_history() {
    let graph = graph();
    let mut state = NavigationState::new("start");
    state.push("hall");
    state.push("vault");

    state
        .apply(&graph, &TransitionKind::Restart)
        .expect("Restart should apply");
    assert_eq!(state.position(), "start");
    assert_eq!(state.history(), &vec!["start"]);
    assert!(!state.can_go_back());
}

#[test]
fn test_revisiting_a_page_is_recorded() {
    let mut state = NavigationState::new("start");
    state.push("hall");
    state.push("start");
    state.push("hall");

    assert_eq!(state.history(), &vec!["start", "hall", "start", "hall"]);
    assert_invariant(&state);
}

#[test]
fn test_image_cycle_wraps() {
    let mut state = NavigationState::new("start");

    assert_eq!(state.next_image(3), 1);
    assert_eq!(state.next_image(3), 2);
    assert_eq!(state.next_image(3), 0);
}

#[test]
fn test_image_cycle_needs_more_than_one_image() {
    let mut state = NavigationState::new("start");

    assert_eq!(state.next_image(1), 0);
    assert_eq!(state.next_image(0), 0);
}

#[test]
fn test_moving_resets_image_index() {
    let mut state = NavigationState::new("start");
    state.next_image(4);
    state.next_image(4);
    assert_eq!(*state.image_index(), 2);

    state.push("hall");
    assert_eq!(*state.image_index(), 0);

    state.next_image(2);
    state.pop();
    assert_eq!(*state.image_index(), 0);
}

#[test]
fn test_set_image_index_rejects_out_of_range() {
    let mut state = NavigationState::new("start");

    assert!(state.set_image_index(2, 3));
    assert_eq!(*state.image_index(), 2);
    assert!(!state.set_image_index(3, 3));
    assert_eq!(*state.image_index(), 2);
}
