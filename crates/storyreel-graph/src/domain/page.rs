//! Pages and choices.
//!
//! Catalogs use one canonical shape: a choice names only its target page,
//! and branch sequencing (`branch`, `postBranch`) lives on the page the
//! choice leads to. Catalogs that put branch metadata on a choice are
//! rejected at parse time.

use serde::{Deserialize, Serialize};
use storyreel_core::ids::PageId;

/// What a page displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// A plain panel.
    Image,
    /// A panel that presents choices and blocks forward scrolling.
    Choice,
}

/// Opaque reference to a displayable asset. The reader never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(pub String);

impl AssetRef {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Morale change applied when a choice is picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceEffect {
    /// Signed delta added to the morale counter.
    #[serde(default)]
    pub morale: i64,
}

/// One option presented on a choice page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Choice {
    /// Display text.
    pub label: String,
    /// The page resolved as the immediate consequence of this choice.
    pub next_page: PageId,
    /// Morale delta.
    #[serde(default)]
    pub effect: ChoiceEffect,
    /// Delta for the Keruka bond counter.
    #[serde(default)]
    pub keruka_bond_effect: i64,
    /// Delta for the Kehinde bond counter.
    #[serde(default)]
    pub kehinde_bond_effect: i64,
}

impl Choice {
    /// Creates a choice with a morale effect and no bond effects.
    #[must_use]
    pub fn new(label: impl Into<String>, next_page: PageId, morale: i64) -> Self {
        Self {
            label: label.into(),
            next_page,
            effect: ChoiceEffect { morale },
            keruka_bond_effect: 0,
            kehinde_bond_effect: 0,
        }
    }

    /// Sets the bond deltas.
    #[must_use]
    pub fn with_bonds(mut self, keruka: i64, kehinde: i64) -> Self {
        self.keruka_bond_effect = keruka;
        self.kehinde_bond_effect = kehinde;
        self
    }
}

/// The atomic narrative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Page {
    /// Unique, stable page id.
    pub id: PageId,
    /// Image or choice.
    #[serde(alias = "type")]
    pub kind: PageKind,
    /// Asset shown for this page.
    pub content: AssetRef,
    /// Options offered on a choice page. Empty for image pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Page to land on once this page's branch sequence has played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_branch: Option<PageId>,
    /// Pages shown one at a time, without input, when a choice leads here.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branch: Vec<PageId>,
}

impl Page {
    /// Creates an image page.
    #[must_use]
    pub fn image(id: u32, content: impl Into<String>) -> Self {
        Self {
            id: PageId(id),
            kind: PageKind::Image,
            content: AssetRef(content.into()),
            choices: Vec::new(),
            post_branch: None,
            branch: Vec::new(),
        }
    }

    /// Creates a choice page.
    #[must_use]
    pub fn choice(id: u32, content: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            kind: PageKind::Choice,
            choices,
            ..Self::image(id, content)
        }
    }

    /// Attaches a branch sequence and its rejoin page.
    #[must_use]
    pub fn with_branch(mut self, branch: &[u32], post_branch: Option<u32>) -> Self {
        self.branch = branch.iter().copied().map(PageId).collect();
        self.post_branch = post_branch.map(PageId);
        self
    }

    #[must_use]
    pub fn is_choice(&self) -> bool {
        self.kind == PageKind::Choice
    }

    #[must_use]
    pub fn has_branch(&self) -> bool {
        !self.branch.is_empty()
    }
}
