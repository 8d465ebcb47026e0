//! Scoring models built on a [`Network`]

mod mlp;
mod sortnet;

pub use mlp::MlpRanker;
pub use sortnet::SortNetRanker;

use crate::data::Document;
use crate::error::Result;
use crate::model::Model;
use crate::Network;

/// Common trait for rankers
pub trait Ranker {
    /// Name recorded in saved models
    fn name(&self) -> &'static str;

    /// Number of features per document
    fn feature_len(&self) -> usize;

    /// Scalar relevance score of one document, higher is better
    fn predict(&mut self, features: &[f64]) -> Result<f64>;

    /// Scores used to order the documents of one query.
    ///
    /// Defaults to [`predict`](Self::predict) for each document.
    fn score_documents(&mut self, documents: &[Document]) -> Result<Vec<f64>> {
        documents.iter().map(|doc| self.predict(doc.features())).collect()
    }

    fn network(&self) -> &Network;

    fn network_mut(&mut self) -> &mut Network;

    /// Apply accumulated gradients
    fn update_weights(&mut self, learning_rate: f64, regularization_rate: f64) {
        self.network_mut().update_weights(learning_rate, regularization_rate);
    }

    fn to_model(&self) -> Model {
        self.network().to_model(self.name())
    }
}
