use lq_core::domain::Segment;
use lq_core::error::AppError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::embeddings::Embedder;

pub mod chunking;
mod similarity;

pub use chunking::split_into_chunks;

/// Default citation chunk size, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// A citation-sized span of a segment returned for one query, ranked by
/// similarity. Transient; discarded after the caller consumes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub segment: Segment,
    pub similarity_rank: u32,
    pub score: f32,
    pub text: String,
}

#[derive(Debug, Clone)]
struct IndexedChunk {
    chunk_id: String,
    segment_id: u32,
    ordinal: u32,
    text: String,
    vector: Vec<f32>,
    norm: f32,
}

/// In-memory similarity index over segment chunks.
///
/// A `SectionIndex` only exists after a successful `build`, so querying an
/// unbuilt index is unrepresentable. Built values are immutable; `retrieve`
/// takes `&self` and holds no interior mutability, so concurrent queries are
/// safe.
#[derive(Debug, Clone)]
pub struct SectionIndex {
    model: String,
    dims: Option<u32>,
    segments: Vec<Segment>,
    chunks: Vec<IndexedChunk>,
}

impl SectionIndex {
    /// Embed every citation chunk of every segment. An empty corpus builds an
    /// empty, queryable index; embedding failures propagate to the caller.
    pub fn build(
        segments: &[Segment],
        embedder: &dyn Embedder,
        model: &str,
        chunk_size: usize,
    ) -> Result<Self, AppError> {
        let mut chunks: Vec<IndexedChunk> = Vec::new();
        let mut dims: Option<u32> = None;

        for segment in segments {
            for (ordinal, text) in split_into_chunks(&segment.text, chunk_size)
                .into_iter()
                .enumerate()
            {
                let vector = embedder.embed(model, &text).map_err(|e| {
                    AppError::new("AI_INDEX_BUILD_FAILED", "Failed to embed citation chunk")
                        .with_details(format!(
                            "segment_id={}; ordinal={ordinal}; cause={e}",
                            segment.id
                        ))
                        .with_retryable(e.retryable)
                })?;
                let this_dims = vector.len() as u32;
                match dims {
                    Some(d) if d != this_dims => {
                        return Err(AppError::new(
                            "AI_INDEX_BUILD_FAILED",
                            "Embedding dimension mismatch across chunks",
                        )
                        .with_details(format!(
                            "expected={d}; got={this_dims}; segment_id={}",
                            segment.id
                        )));
                    }
                    Some(_) => {}
                    None => dims = Some(this_dims),
                }

                let norm = similarity::l2_norm(&vector);
                chunks.push(IndexedChunk {
                    chunk_id: chunk_id(segment.id, ordinal as u32, &text),
                    segment_id: segment.id,
                    ordinal: ordinal as u32,
                    text,
                    vector,
                    norm,
                });
            }
        }

        Ok(Self {
            model: model.to_string(),
            dims,
            segments: segments.to_vec(),
            chunks,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Rank chunks by cosine similarity to the query embedding and return at
    /// most `k`, ties broken by ascending segment id then chunk ordinal.
    pub fn retrieve(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: u32,
    ) -> Result<Vec<RetrievedChunk>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::new(
                "AI_RETRIEVAL_INVALID",
                "Query must not be empty",
            ));
        }
        if k == 0 {
            return Err(AppError::new(
                "AI_RETRIEVAL_INVALID",
                "Retrieval fan-out k must be at least 1",
            ));
        }
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }
        let dims = match self.dims {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };

        let qv = embedder.embed(&self.model, query)?;
        if qv.len() as u32 != dims {
            return Err(AppError::new(
                "AI_RETRIEVAL_FAILED",
                "Query embedding dims do not match index dims",
            )
            .with_details(format!("index_dims={dims}; query_dims={}", qv.len())));
        }
        let qnorm = similarity::l2_norm(&qv);
        if qnorm == 0.0 {
            return Err(AppError::new(
                "AI_RETRIEVAL_FAILED",
                "Query embedding norm is zero",
            ));
        }

        let mut scored: Vec<(usize, f32)> = Vec::new();
        for (i, chunk) in self.chunks.iter().enumerate() {
            if chunk.norm == 0.0 {
                continue;
            }
            let score = similarity::cosine_similarity(&qv, &chunk.vector, qnorm, chunk.norm);
            scored.push((i, score));
        }

        scored.sort_by(|a, b| {
            let ca = &self.chunks[a.0];
            let cb = &self.chunks[b.0];
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ca.segment_id.cmp(&cb.segment_id))
                .then(ca.ordinal.cmp(&cb.ordinal))
        });
        scored.truncate(k as usize);

        let mut out = Vec::with_capacity(scored.len());
        for (rank, (i, score)) in scored.into_iter().enumerate() {
            let chunk = &self.chunks[i];
            let segment = self
                .segments
                .iter()
                .find(|s| s.id == chunk.segment_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::new("AI_RETRIEVAL_FAILED", "Chunk references a missing segment")
                        .with_details(format!("chunk_id={}", chunk.chunk_id))
                })?;
            out.push(RetrievedChunk {
                segment,
                similarity_rank: rank as u32 + 1,
                score,
                text: chunk.text.clone(),
            });
        }
        Ok(out)
    }
}

/// Stable chunk identity over segment id, ordinal, and text.
fn chunk_id(segment_id: u32, ordinal: u32, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(segment_id.to_be_bytes());
    hasher.update(ordinal.to_be_bytes());
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
