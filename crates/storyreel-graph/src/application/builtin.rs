//! The built-in forest story, shipped with the reader.

use storyreel_core::error::DomainError;

use super::catalog::{CatalogFormat, CatalogProvider, StaticCatalog};
use crate::domain::graph::PageGraph;

/// Source of the built-in catalog.
pub const FOREST_CATALOG_YAML: &str = include_str!("../../catalog/forest.yaml");

/// Parses the built-in catalog.
///
/// # Errors
///
/// Returns `DomainError::Content` if the bundled document fails to parse.
pub fn forest_catalog() -> Result<StaticCatalog, DomainError> {
    StaticCatalog::parse(FOREST_CATALOG_YAML, CatalogFormat::Yaml)
}

/// Builds the page graph of the built-in catalog.
///
/// # Errors
///
/// Returns `DomainError` if the bundled document fails to parse.
pub fn forest_graph() -> Result<PageGraph, DomainError> {
    let catalog = forest_catalog()?;
    PageGraph::from_pages(catalog.get_all_pages()?)
}
