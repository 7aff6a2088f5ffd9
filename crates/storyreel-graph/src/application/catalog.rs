//! Catalog providers and checked graph loading.
//!
//! A catalog document is a YAML or JSON object with an optional `title` and
//! an ordered `pages` list in canonical page shape.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use storyreel_core::error::DomainError;
use tracing::{error, info, warn};

use crate::domain::graph::PageGraph;
use crate::domain::integrity::IntegrityIssue;
use crate::domain::page::Page;

/// Supplies the static page list. Ids must be unique.
pub trait CatalogProvider: Send + Sync {
    /// Returns every page in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Content` if the catalog cannot be read or parsed.
    fn get_all_pages(&self) -> Result<Vec<Page>, DomainError>;
}

/// Serialization format of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    pages: Vec<Page>,
}

/// Parses a catalog document.
///
/// # Errors
///
/// Returns `DomainError::Content` if the document does not match the
/// canonical page shape.
pub fn parse_catalog(source: &str, format: CatalogFormat) -> Result<Vec<Page>, DomainError> {
    let document: CatalogDocument = match format {
        CatalogFormat::Yaml => serde_yaml::from_str(source)
            .map_err(|e| DomainError::Content(format!("invalid catalog: {e}")))?,
        CatalogFormat::Json => serde_json::from_str(source)
            .map_err(|e| DomainError::Content(format!("invalid catalog: {e}")))?,
    };
    Ok(document.pages)
}

/// A catalog held in memory.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    pages: Vec<Page>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Parses a catalog document held in a string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Content` if parsing fails.
    pub fn parse(source: &str, format: CatalogFormat) -> Result<Self, DomainError> {
        parse_catalog(source, format).map(Self::new)
    }
}

impl CatalogProvider for StaticCatalog {
    fn get_all_pages(&self) -> Result<Vec<Page>, DomainError> {
        Ok(self.pages.clone())
    }
}

/// A catalog read from disk on every call.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogProvider for FileCatalog {
    fn get_all_pages(&self) -> Result<Vec<Page>, DomainError> {
        let source = std::fs::read_to_string(&self.path).map_err(|e| {
            DomainError::Content(format!("cannot read catalog {}: {e}", self.path.display()))
        })?;
        parse_catalog(&source, CatalogFormat::from_path(&self.path))
    }
}

/// A loaded graph together with its validation findings.
#[derive(Debug, Clone)]
pub struct CatalogReport {
    pub graph: PageGraph,
    pub issues: Vec<IntegrityIssue>,
}

impl CatalogReport {
    /// `true` if any finding breaks traversal (as opposed to content notices).
    #[must_use]
    pub fn has_integrity_errors(&self) -> bool {
        self.issues.iter().any(|issue| !issue.is_content_error())
    }
}

/// Loads and validates the graph supplied by `provider`, logging every
/// finding.
///
/// # Errors
///
/// Returns `DomainError` if the catalog cannot be read or has duplicate ids.
pub fn load_graph(provider: &dyn CatalogProvider) -> Result<CatalogReport, DomainError> {
    let graph = PageGraph::from_pages(provider.get_all_pages()?)?;
    let issues = graph.validate();
    for issue in &issues {
        if issue.is_content_error() {
            warn!(page = %issue.page(), "{issue}");
        } else {
            error!(page = %issue.page(), "{issue}");
        }
    }
    info!(
        pages = graph.len(),
        issues = issues.len(),
        "page graph loaded"
    );
    Ok(CatalogReport { graph, issues })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_core::ids::PageId;

    #[test]
    fn test_parse_json_catalog_with_type_field() {
        let source = r#"{
            "pages": [
                {"id": 1, "type": "image", "content": "one.jpg", "postBranch": 2},
                {"id": 2, "type": "choice", "content": "two.jpg",
                 "choices": [{"label": "Back", "nextPage": 1, "effect": {"morale": -1},
                              "kerukaBondEffect": 2}]}
            ]
        }"#;

        let pages = parse_catalog(source, CatalogFormat::Json).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].post_branch, Some(PageId(2)));
        assert_eq!(pages[1].choices[0].keruka_bond_effect, 2);
        assert_eq!(pages[1].choices[0].kehinde_bond_effect, 0);
    }

    #[test]
    fn test_parse_rejects_branch_on_choice_record() {
        let source = "
pages:
  - id: 3
    kind: choice
    content: page3.jpg
    choices:
      - { label: Fight, nextPage: 4, effect: { morale: 3 }, branch: [4, 7], postBranch: 10 }
  - { id: 4, kind: image, content: fight.jpg }
";

        let result = parse_catalog(source, CatalogFormat::Yaml);

        match result {
            Err(DomainError::Content(message)) => assert!(message.contains("branch")),
            other => panic!("expected Content error, got {other:?}"),
        }
    }

    #[test]
    fn test_format_detected_from_extension() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("story.JSON")),
            CatalogFormat::Json
        );
        assert_eq!(
            CatalogFormat::from_path(Path::new("story.yaml")),
            CatalogFormat::Yaml
        );
    }

    #[test]
    fn test_file_catalog_reports_missing_file_as_content_error() {
        let catalog = FileCatalog::new("/nonexistent/storyreel/catalog.yaml");

        assert!(matches!(
            catalog.get_all_pages(),
            Err(DomainError::Content(_))
        ));
    }

    #[test]
    fn test_load_graph_separates_content_from_integrity_findings() {
        let catalog = StaticCatalog::new(vec![
            Page::choice(1, "a.jpg", Vec::new()),
            Page::image(2, "b.jpg"),
        ]);

        let report = load_graph(&catalog).unwrap();

        assert_eq!(report.issues.len(), 1);
        assert!(!report.has_integrity_errors());
    }
}
