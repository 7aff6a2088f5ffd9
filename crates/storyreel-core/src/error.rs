//! Domain error types.

use thiserror::Error;

use crate::ids::PageId;

/// Top-level error type shared by every reader component.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A lookup asked for a page id the graph does not contain.
    #[error("page not found: {0}")]
    PageNotFound(PageId),

    /// A page reference inside the graph points at a page that does not exist.
    #[error("graph integrity error: {referrer} references missing page {missing}")]
    GraphIntegrity {
        /// The id that could not be resolved.
        missing: PageId,
        /// Human-readable description of where the reference lives.
        referrer: String,
    },

    /// Displayable content is malformed (empty choices, missing asset).
    #[error("content error: {0}")]
    Content(String),

    /// Reading from the persistent store failed.
    #[error("persistence read error: {0}")]
    PersistenceRead(String),

    /// Writing to the persistent store failed.
    #[error("persistence write error: {0}")]
    PersistenceWrite(String),

    /// A request was rejected by domain rules.
    #[error("validation error: {0}")]
    Validation(String),

    /// A platform collaborator (audio, runtime) failed.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for failures the reader is expected to shrug off with a
    /// warning rather than abort the current transition.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::PersistenceRead(_)
                | Self::PersistenceWrite(_)
                | Self::Content(_)
                | Self::Infrastructure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_integrity_message_names_both_ends() {
        let err = DomainError::GraphIntegrity {
            missing: PageId(42),
            referrer: "choice \"Fight\" on page 3".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "graph integrity error: choice \"Fight\" on page 3 references missing page 42"
        );
    }

    #[test]
    fn test_soft_errors_exclude_integrity_and_validation() {
        assert!(DomainError::PersistenceWrite("disk full".into()).is_soft());
        assert!(DomainError::Content("no choices".into()).is_soft());
        assert!(!DomainError::PageNotFound(PageId(1)).is_soft());
        assert!(!DomainError::Validation("bad".into()).is_soft());
    }
}
