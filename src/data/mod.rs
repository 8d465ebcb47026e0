//! Queries and the documents ranked under them

mod loader;

pub use loader::{read_letor, read_letor_file};

use crate::error::{LtrError, Result};

/// A document judged for one query
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    features: Vec<f64>,
    label: f64,
    position: usize,
}

impl Document {
    pub fn new(features: Vec<f64>, label: f64, position: usize) -> Self {
        Document { features, label, position }
    }

    pub fn features(&self) -> &[f64] {
        &self.features
    }

    /// Relevance grade
    pub fn label(&self) -> f64 {
        self.label
    }

    /// Position of the document in its query as loaded
    pub fn position(&self) -> usize {
        self.position
    }
}

/// A query and its documents, in load order
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    id: String,
    documents: Vec<Document>,
}

impl Query {
    pub fn new(id: impl Into<String>, documents: Vec<Document>) -> Self {
        Query { id: id.into(), documents }
    }

    /// Build a query from `(features, label)` pairs, numbering positions in order
    pub fn from_labeled(id: impl Into<String>, docs: Vec<(Vec<f64>, f64)>) -> Self {
        let documents = docs.into_iter()
            .enumerate()
            .map(|(position, (features, label))| Document::new(features, label, position))
            .collect();
        Query::new(id, documents)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Feature length of the first document, 0 for an empty query
    pub fn feature_len(&self) -> usize {
        self.documents.first().map_or(0, |doc| doc.features.len())
    }
}

/// Check that every document of every query has `expected` features
pub fn check_feature_len(queries: &[Query], expected: usize) -> Result<()> {
    for doc in queries.iter().flat_map(|q| q.documents()) {
        if doc.features.len() != expected {
            return Err(LtrError::DimensionMismatch { expected, actual: doc.features.len() });
        }
    }
    Ok(())
}
