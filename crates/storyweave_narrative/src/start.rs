//! Start-page selection.

use indexmap::IndexMap;
use serde::Serialize;
use storyweave_core::{INTRO, Page};

/// Which rule picked the start page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum StartRule {
    /// The page numbered `"1"`
    #[display("page number 1")]
    PageNumberOne,
    /// The first page tagged `"intro"`
    #[display("intro page")]
    IntroType,
    /// The first page in authored order
    #[display("first page")]
    FirstPage,
}

/// A chosen start page and the rule that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartSelection<'a> {
    /// The page to begin on
    pub page: &'a Page,
    /// Why it was chosen
    pub rule: StartRule,
}

impl StartSelection<'_> {
    /// Identifier of the chosen page.
    pub fn id(&self) -> &str {
        self.page.id()
    }
}

/// Picks the page a reader starts on.
///
/// Priority: the page numbered `"1"`, then the first `"intro"` page, then the
/// first page in authored order. Returns `None` only for an empty map.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use storyweave_core::Page;
/// use storyweave_narrative::{StartRule, select_start};
///
/// let mut pages = IndexMap::new();
/// pages.insert("a".to_string(), Page::new("a", "").with_page_number(Some("2".into())));
/// pages.insert("b".to_string(), Page::new("b", "").with_kind("intro"));
///
/// let start = select_start(&pages).expect("non-empty");
/// assert_eq!(start.id(), "b");
/// assert_eq!(start.rule, StartRule::IntroType);
/// ```
pub fn select_start(pages: &IndexMap<String, Page>) -> Option<StartSelection<'_>> {
    if let Some(page) = pages
        .values()
        .find(|page| page.page_number().as_deref() == Some("1"))
    {
        return Some(StartSelection {
            page,
            rule: StartRule::PageNumberOne,
        });
    }

    if let Some(page) = pages.values().find(|page| page.kind() == INTRO) {
        return Some(StartSelection {
            page,
            rule: StartRule::IntroType,
        });
    }

    pages.values().next().map(|page| StartSelection {
        page,
        rule: StartRule::FirstPage,
    })
}
