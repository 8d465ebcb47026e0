//! Rank-quality metrics

use crate::data::{Document, Query};
use crate::error::Result;
use crate::ranker::Ranker;
use std::cmp::Ordering;

/// Documents of `query` ordered from highest to lowest predicted score.
///
/// The query itself is left untouched; equal scores keep their load order.
pub fn sort_p<'q, R: Ranker + ?Sized>(ranker: &mut R, query: &'q Query) -> Result<Vec<&'q Document>> {
    let scores = ranker.score_documents(query.documents())?;
    let mut ranked: Vec<(&Document, f64)> = query.documents().iter().zip(scores).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    Ok(ranked.into_iter().map(|(doc, _)| doc).collect())
}

/// Discounted cumulative gain of the first `k` labels, in ranked order
pub fn dcg_at_k(labels: &[f64], k: usize) -> f64 {
    labels.iter()
        .take(k)
        .enumerate()
        .map(|(i, &label)| (2f64.powf(label) - 1.0) / ((i + 2) as f64).log2())
        .sum()
}

/// NDCG@k of labels in ranked order; 0 when no document is relevant
pub fn ndcg_at_k(labels: &[f64], k: usize) -> f64 {
    let mut ideal = labels.to_vec();
    ideal.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let ideal_dcg = dcg_at_k(&ideal, k);
    if ideal_dcg <= 0.0 {
        return 0.0;
    }
    dcg_at_k(labels, k) / ideal_dcg
}

/// NDCG@k of the ranker's ordering, averaged over `queries`
pub fn ndcg_avg<R: Ranker + ?Sized>(ranker: &mut R, queries: &[Query], k: usize) -> Result<f64> {
    if queries.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for query in queries {
        let labels: Vec<f64> = sort_p(ranker, query)?.iter().map(|doc| doc.label()).collect();
        total += ndcg_at_k(&labels, k);
    }
    Ok(total / queries.len() as f64)
}
