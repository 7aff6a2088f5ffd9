//! Load-time integrity findings.

use storyreel_core::error::DomainError;
use storyreel_core::ids::PageId;
use thiserror::Error;

/// A single problem found by `PageGraph::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityIssue {
    #[error("page {page}: choice {label:?} targets missing page {target}")]
    DanglingChoiceTarget {
        page: PageId,
        label: String,
        target: PageId,
    },

    #[error("page {page}: branch step targets missing page {target}")]
    DanglingBranchStep { page: PageId, target: PageId },

    #[error("page {page}: postBranch targets missing page {target}")]
    DanglingPostBranch { page: PageId, target: PageId },

    #[error("page {page}: branch sequence visits page {repeated} more than once")]
    RepeatedBranchStep { page: PageId, repeated: PageId },

    #[error("page {page}: choice page offers no choices")]
    EmptyChoices { page: PageId },

    #[error("page {page}: image page carries choices")]
    ChoicesOnImagePage { page: PageId },

    #[error("page {page}: content reference is empty")]
    MissingContent { page: PageId },
}

impl IntegrityIssue {
    /// Content problems are rendered as a visible fallback; everything else
    /// breaks traversal.
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyChoices { .. } | Self::ChoicesOnImagePage { .. } | Self::MissingContent { .. }
        )
    }

    /// The page the finding is attached to.
    #[must_use]
    pub fn page(&self) -> PageId {
        match self {
            Self::DanglingChoiceTarget { page, .. }
            | Self::DanglingBranchStep { page, .. }
            | Self::DanglingPostBranch { page, .. }
            | Self::RepeatedBranchStep { page, .. }
            | Self::EmptyChoices { page }
            | Self::ChoicesOnImagePage { page }
            | Self::MissingContent { page } => *page,
        }
    }
}

impl From<IntegrityIssue> for DomainError {
    fn from(issue: IntegrityIssue) -> Self {
        let message = issue.to_string();
        match issue {
            IntegrityIssue::DanglingChoiceTarget {
                page,
                label,
                target,
            } => Self::GraphIntegrity {
                missing: target,
                referrer: format!("choice {label:?} on page {page}"),
            },
            IntegrityIssue::DanglingBranchStep { page, target } => Self::GraphIntegrity {
                missing: target,
                referrer: format!("branch of page {page}"),
            },
            IntegrityIssue::DanglingPostBranch { page, target } => Self::GraphIntegrity {
                missing: target,
                referrer: format!("postBranch of page {page}"),
            },
            IntegrityIssue::RepeatedBranchStep { .. } => Self::Validation(message),
            IntegrityIssue::EmptyChoices { .. }
            | IntegrityIssue::ChoicesOnImagePage { .. }
            | IntegrityIssue::MissingContent { .. } => Self::Content(message),
        }
    }
}
