//! Immutable view of the metadata catalog.

use serde::{Deserialize, Serialize};

/// A filterable metadata field of the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataField {
    Author,
    Source,
}

impl MetadataField {
    pub const ALL: [MetadataField; 2] = [MetadataField::Author, MetadataField::Source];

    /// Payload key in the vector index.
    pub fn index_key(&self) -> &'static str {
        match self {
            MetadataField::Author => "author",
            MetadataField::Source => "source",
        }
    }

    /// Column in the metadata store.
    pub fn column(&self) -> &'static str {
        match self {
            MetadataField::Author => "authors",
            MetadataField::Source => "sources",
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.index_key())
    }
}

/// Distinct authors and source titles at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    authors: Vec<String>,
    sources: Vec<String>,
}

impl CatalogSnapshot {
    pub fn new(authors: Vec<String>, sources: Vec<String>) -> Self {
        Self { authors, sources }
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn candidates(&self, field: MetadataField) -> &[String] {
        match field {
            MetadataField::Author => &self.authors,
            MetadataField::Source => &self.sources,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.sources.is_empty()
    }
}
