//! Read-only snapshot of the reader for rendering.

use serde::Serialize;
use storyreel_core::ids::PageId;
use storyreel_graph::domain::page::{Page, PageKind};
use storyreel_navigation::domain::navigator::{ScrollCommand, ViewPhase};
use storyreel_navigation::domain::viewport::Viewport;
use storyreel_session::domain::state::NarrativeState;

/// Shown in place of the choice list when a choice page has none.
pub const NO_CHOICES_NOTICE: &str = "No choices available";

/// Shown in place of a panel whose asset reference is blank.
pub const MISSING_CONTENT_NOTICE: &str = "This panel could not be loaded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub index: usize,
    pub label: String,
}

/// Everything a view layer needs to draw the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderView {
    pub page: PageId,
    pub kind: PageKind,
    pub content: String,
    pub choices: Vec<ChoiceView>,
    /// Fallback text for content errors; `None` when the page is whole.
    pub notice: Option<String>,
    pub locked: bool,
    pub playing: bool,
    pub phase: ViewPhase,
    pub scroll: ScrollCommand,
    pub viewport: Viewport,
    pub state: NarrativeState,
}

impl ReaderView {
    pub(crate) fn build(
        page: &Page,
        phase: ViewPhase,
        scroll: ScrollCommand,
        viewport: Viewport,
        playing: bool,
        state: NarrativeState,
    ) -> Self {
        let notice = if page.content.is_blank() {
            Some(MISSING_CONTENT_NOTICE.to_owned())
        } else if page.is_choice() && page.choices.is_empty() {
            Some(NO_CHOICES_NOTICE.to_owned())
        } else {
            None
        };
        Self {
            page: page.id,
            kind: page.kind,
            content: page.content.as_str().to_owned(),
            choices: page
                .choices
                .iter()
                .enumerate()
                .map(|(index, choice)| ChoiceView {
                    index,
                    label: choice.label.clone(),
                })
                .collect(),
            notice,
            locked: page.is_choice(),
            playing,
            phase,
            scroll,
            viewport,
            state,
        }
    }
}
