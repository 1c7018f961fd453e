//! In-memory nearest-neighbor index over chunk embeddings.

#[cfg(test)]
mod tests;

use anyhow::{Result, anyhow};
use instant_distance::{Builder, HnswMap, Search};
use tracing::debug;

/// Embedding vector normalized to unit length.
///
/// With unit vectors, Euclidean distance and cosine similarity are
/// interchangeable: `cos = 1 - d^2 / 2`.
#[derive(Debug, Clone, PartialEq)]
struct EmbeddedPoint(Vec<f32>);

impl instant_distance::Point for EmbeddedPoint {
    fn distance(&self, other: &Self) -> f32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f32>()
            .sqrt()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id: usize,
    /// Cosine similarity in [-1, 1]
    pub score: f32,
}

/// HNSW index mapping embeddings back to chunk ids.
pub struct ChunkIndex {
    map: HnswMap<EmbeddedPoint, usize>,
    dimension: usize,
}

impl ChunkIndex {
    /// Build an index from `(chunk_id, embedding)` pairs.
    ///
    /// All embeddings must share one dimension and have nonzero magnitude.
    #[inline]
    pub fn build(entries: Vec<(usize, Vec<f32>)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(anyhow!("Cannot build an index from zero embeddings"));
        }

        let dimension = entries[0].1.len();
        if dimension == 0 {
            return Err(anyhow!("Embeddings must not be empty"));
        }

        let mut points = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        for (chunk_id, embedding) in entries {
            if embedding.len() != dimension {
                return Err(anyhow!(
                    "Embedding for chunk {} has dimension {}, expected {}",
                    chunk_id,
                    embedding.len(),
                    dimension
                ));
            }
            let normalized = normalize(&embedding)
                .ok_or_else(|| anyhow!("Embedding for chunk {} has zero magnitude", chunk_id))?;
            points.push(EmbeddedPoint(normalized));
            values.push(chunk_id);
        }

        let len = points.len();
        let map = Builder::default().build(points, values);

        debug!("Built HNSW index over {} embeddings (dim {})", len, dimension);

        Ok(Self { map, dimension })
    }

    /// Return the `k` chunks most similar to the query embedding, best first.
    #[inline]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if query.len() != self.dimension {
            return Err(anyhow!(
                "Query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            ));
        }

        let Some(normalized) = normalize(query) else {
            return Err(anyhow!("Query embedding has zero magnitude"));
        };

        let query_point = EmbeddedPoint(normalized);
        let mut search = Search::default();

        let results = self
            .map
            .search(&query_point, &mut search)
            .take(k)
            .map(|item| ScoredChunk {
                chunk_id: *item.value,
                score: cosine_from_distance(item.distance),
            })
            .collect();

        Ok(results)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn normalize(vector: &[f32]) -> Option<Vec<f32>> {
    let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude <= f32::EPSILON {
        return None;
    }
    Some(vector.iter().map(|v| v / magnitude).collect())
}

fn cosine_from_distance(distance: f32) -> f32 {
    (1.0 - distance.powi(2) / 2.0).clamp(-1.0, 1.0)
}
