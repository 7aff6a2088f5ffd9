//! The page graph.

use std::collections::{HashMap, HashSet};

use storyreel_core::error::DomainError;
use storyreel_core::ids::PageId;

use super::integrity::IntegrityIssue;
use super::page::{Page, PageKind};

/// Immutable page graph, kept in catalog order.
///
/// Catalog order defines the physical layout: the page at position `n`
/// (1-based) is the `n`-th panel of the scroll view. The graph as a whole may
/// contain back-edges; only branch sequences are required to be free of
/// repeats.
#[derive(Debug, Clone)]
pub struct PageGraph {
    pages: Vec<Page>,
    positions: HashMap<PageId, usize>,
}

impl PageGraph {
    /// Builds a graph from catalog pages.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the catalog is empty or two pages
    /// share an id.
    pub fn from_pages(pages: Vec<Page>) -> Result<Self, DomainError> {
        if pages.is_empty() {
            return Err(DomainError::Validation("catalog contains no pages".into()));
        }
        let mut positions = HashMap::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            if positions.insert(page.id, index).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate page id {} in catalog",
                    page.id
                )));
            }
        }
        Ok(Self { pages, positions })
    }

    /// Looks up a page by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the id is not in the graph.
    pub fn get_page(&self, id: PageId) -> Result<&Page, DomainError> {
        self.positions
            .get(&id)
            .map(|&index| &self.pages[index])
            .ok_or(DomainError::PageNotFound(id))
    }

    #[must_use]
    pub fn contains(&self, id: PageId) -> bool {
        self.positions.contains_key(&id)
    }

    /// All pages in catalog order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always `false`; construction rejects empty catalogs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The first page in catalog order, where a fresh reader starts.
    #[must_use]
    pub fn first_page(&self) -> &Page {
        &self.pages[0]
    }

    /// 1-based physical position of a page.
    #[must_use]
    pub fn position_of(&self, id: PageId) -> Option<usize> {
        self.positions.get(&id).map(|index| index + 1)
    }

    /// The page at a 1-based physical position.
    #[must_use]
    pub fn page_at(&self, position: usize) -> Option<&Page> {
        position.checked_sub(1).and_then(|index| self.pages.get(index))
    }

    /// Checks every reference and content rule, returning all findings.
    #[must_use]
    pub fn validate(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();
        for page in &self.pages {
            if page.content.is_blank() {
                issues.push(IntegrityIssue::MissingContent { page: page.id });
            }
            match page.kind {
                PageKind::Choice if page.choices.is_empty() => {
                    issues.push(IntegrityIssue::EmptyChoices { page: page.id });
                }
                PageKind::Image if !page.choices.is_empty() => {
                    issues.push(IntegrityIssue::ChoicesOnImagePage { page: page.id });
                }
                _ => {}
            }
            for choice in &page.choices {
                if !self.contains(choice.next_page) {
                    issues.push(IntegrityIssue::DanglingChoiceTarget {
                        page: page.id,
                        label: choice.label.clone(),
                        target: choice.next_page,
                    });
                }
            }
            self.validate_branch(page, &mut issues);
        }
        issues
    }

    fn validate_branch(&self, page: &Page, issues: &mut Vec<IntegrityIssue>) {
        let mut seen = HashSet::new();
        for &step in &page.branch {
            if !self.contains(step) {
                issues.push(IntegrityIssue::DanglingBranchStep {
                    page: page.id,
                    target: step,
                });
            }
            if !seen.insert(step) {
                issues.push(IntegrityIssue::RepeatedBranchStep {
                    page: page.id,
                    repeated: step,
                });
            }
        }
        if let Some(post) = page.post_branch {
            if !self.contains(post) {
                issues.push(IntegrityIssue::DanglingPostBranch {
                    page: page.id,
                    target: post,
                });
            } else if seen.contains(&post) {
                issues.push(IntegrityIssue::RepeatedBranchStep {
                    page: page.id,
                    repeated: post,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::Choice;

    fn small_graph() -> PageGraph {
        PageGraph::from_pages(vec![
            Page::image(1, "a.jpg"),
            Page::choice(
                2,
                "b.jpg",
                vec![Choice::new("Left", PageId(3), 1), Choice::new("Right", PageId(1), -1)],
            ),
            Page::image(3, "c.jpg").with_branch(&[3, 4], Some(1)),
            Page::image(4, "d.jpg"),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_page_returns_every_catalog_page() {
        let graph = small_graph();

        for page in graph.pages() {
            assert_eq!(graph.get_page(page.id).unwrap(), page);
        }
    }

    #[test]
    fn test_get_page_reports_missing_id() {
        let graph = small_graph();

        match graph.get_page(PageId(99)) {
            Err(DomainError::PageNotFound(id)) => assert_eq!(id, PageId(99)),
            other => panic!("expected PageNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_from_pages_rejects_duplicate_ids() {
        let result = PageGraph::from_pages(vec![Page::image(1, "a.jpg"), Page::image(1, "b.jpg")]);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_from_pages_rejects_empty_catalog() {
        assert!(PageGraph::from_pages(Vec::new()).is_err());
    }

    #[test]
    fn test_positions_are_one_based_and_inverse() {
        let graph = small_graph();

        for position in 1..=graph.len() {
            let page = graph.page_at(position).unwrap();
            assert_eq!(graph.position_of(page.id), Some(position));
        }
        assert!(graph.page_at(0).is_none());
        assert!(graph.page_at(graph.len() + 1).is_none());
    }

    #[test]
    fn test_back_edges_are_legal() {
        // "Right" returns to page 1, which precedes the choice page.
        assert!(small_graph().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let graph = PageGraph::from_pages(vec![
            Page::choice(1, "a.jpg", vec![Choice::new("Go", PageId(9), 0)]),
            Page::image(2, "b.jpg").with_branch(&[2, 8], Some(7)),
        ])
        .unwrap();

        let issues = graph.validate();

        assert_eq!(
            issues,
            vec![
                IntegrityIssue::DanglingChoiceTarget {
                    page: PageId(1),
                    label: "Go".to_owned(),
                    target: PageId(9),
                },
                IntegrityIssue::DanglingBranchStep {
                    page: PageId(2),
                    target: PageId(8),
                },
                IntegrityIssue::DanglingPostBranch {
                    page: PageId(2),
                    target: PageId(7),
                },
            ]
        );
        assert!(issues.iter().all(|issue| !issue.is_content_error()));
    }

    #[test]
    fn test_validate_reports_content_errors() {
        let graph = PageGraph::from_pages(vec![
            Page::choice(1, "a.jpg", Vec::new()),
            Page::image(2, "  "),
        ])
        .unwrap();

        let issues = graph.validate();

        assert!(issues.contains(&IntegrityIssue::EmptyChoices { page: PageId(1) }));
        assert!(issues.contains(&IntegrityIssue::MissingContent { page: PageId(2) }));
        assert!(issues.iter().all(IntegrityIssue::is_content_error));
    }

    #[test]
    fn test_validate_reports_revisited_branch_steps() {
        let graph = PageGraph::from_pages(vec![
            Page::image(1, "a.jpg").with_branch(&[1, 2, 1], Some(2)),
            Page::image(2, "b.jpg"),
        ])
        .unwrap();

        let issues = graph.validate();

        assert!(issues.contains(&IntegrityIssue::RepeatedBranchStep {
            page: PageId(1),
            repeated: PageId(1),
        }));
        assert!(issues.contains(&IntegrityIssue::RepeatedBranchStep {
            page: PageId(1),
            repeated: PageId(2),
        }));
    }
}
