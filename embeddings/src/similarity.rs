//! Similarity computation for embeddings.

use ordered_float::OrderedFloat;
use scripture_protocol::Passage;

use crate::EmbeddingRecord;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two embeddings, failing on a
/// dimension mismatch.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors (or a zero vector)
/// - -1.0 means opposite vectors
pub fn checked_cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// Cosine similarity that scores mismatched dimensions as 0.0.
///
/// Mismatches are not logged here; callers report them once per query
/// with [`count_dimension_mismatches`].
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    checked_cosine_similarity(a, b).unwrap_or(0.0)
}

/// Number of records whose embedding length differs from `query`.
pub fn count_dimension_mismatches(query: &[f64], records: &[EmbeddingRecord]) -> usize {
    records
        .iter()
        .filter(|record| record.embedding.len() != query.len())
        .count()
}

/// A scored passage, produced per query and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    /// The matched passage.
    pub passage: Passage,

    /// Cosine similarity to the query.
    pub score: f64,

    /// Zero-based position after ranking.
    pub rank: usize,
}

/// Score every record against `query` and sort by descending score.
///
/// The sort is stable, so equal scores keep their cache order.
pub fn rank_records(query: &[f64], records: &[EmbeddingRecord]) -> Vec<SimilarityResult> {
    let mut scored: Vec<(OrderedFloat<f64>, &EmbeddingRecord)> = records
        .iter()
        .map(|record| (OrderedFloat(cosine_similarity(query, &record.embedding)), record))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(rank, (score, record))| SimilarityResult {
            passage: record.passage.clone(),
            score: score.0,
            rank,
        })
        .collect()
}
