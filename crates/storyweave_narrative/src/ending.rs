//! Ending classification and the choice controls a page presents.

use serde::Serialize;
use storyweave_core::{Decision, EndingType, Page};

/// Whether a page is terminal.
///
/// True when the page was marked as an ending or carries one of the ending
/// type tags.
///
/// # Examples
///
/// ```
/// use storyweave_core::Page;
/// use storyweave_narrative::is_ending;
///
/// assert!(is_ending(&Page::new("end", "").with_kind("badEnding")));
/// assert!(!is_ending(&Page::new("mid", "")));
/// ```
pub fn is_ending(page: &Page) -> bool {
    *page.is_ending() || EndingType::from_type_tag(page.kind()).is_some()
}

/// Whether a decision should be rendered at all.
pub fn is_visible_choice(decision: &Decision, hidden_text: &str) -> bool {
    !decision.text().is_empty() && decision.text() != hidden_text
}

/// Decisions that survive filtering, paired with their original slot index.
pub fn visible_decisions<'a>(
    page: &'a Page,
    hidden_text: &'a str,
) -> impl Iterator<Item = (usize, &'a Decision)> {
    page.decisions()
        .iter()
        .enumerate()
        .filter(move |(_, decision)| is_visible_choice(decision, hidden_text))
}

/// One rendered choice button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    /// Slot index in the page's decision list
    pub index: usize,
    /// Button label
    pub text: String,
    /// Page the choice leads to
    pub target: Option<String>,
    /// False for dead-end choices
    pub enabled: bool,
}

/// What a page offers the reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "choices", rename_all = "snake_case")]
pub enum PageControls {
    /// Ordered choice buttons
    Choices(Vec<ChoiceView>),
    /// A single restart action; endings never show choices
    Restart,
    /// A non-ending page with nothing to choose
    EndOfBranch,
}

/// Computes the controls for a page.
pub fn controls(page: &Page, hidden_text: &str) -> PageControls {
    if is_ending(page) {
        return PageControls::Restart;
    }

    let choices: Vec<ChoiceView> = visible_decisions(page, hidden_text)
        .map(|(index, decision)| ChoiceView {
            index,
            text: decision.text().clone(),
            target: decision.target_id().clone(),
            enabled: decision.is_enabled(),
        })
        .collect();

    if choices.is_empty() {
        PageControls::EndOfBranch
    } else {
        PageControls::Choices(choices)
    }
}
