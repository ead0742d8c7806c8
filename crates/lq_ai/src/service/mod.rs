use lq_core::domain::{ConversationTurn, Segment, SegmentSummary};
use lq_core::error::AppError;
use lq_core::store::SegmentStore;
use serde::{Deserialize, Serialize};

use crate::answer::{self, AnswerResult};
use crate::condense;
use crate::embeddings::Embedder;
use crate::index::{SectionIndex, DEFAULT_CHUNK_SIZE};
use crate::llm::Llm;

/// Process-wide query configuration. All knobs are fixed at build time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryConfig {
    /// Retrieval fan-out; at least 1.
    pub top_k: u32,
    /// Citation chunk size in characters.
    pub citation_chunk_size: usize,
    /// Rolling-memory budget for history condensation, in estimated tokens.
    pub history_token_budget: u32,
    pub embed_model: String,
    pub chat_model: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            citation_chunk_size: DEFAULT_CHUNK_SIZE,
            history_token_budget: condense::DEFAULT_TOKEN_BUDGET,
            embed_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4".to_string(),
        }
    }
}

/// Entry point for the query core. Owns the built index, the segment store,
/// and the capability clients; constructed once at startup and shared
/// read-only across requests.
pub struct QueryService {
    config: QueryConfig,
    index: SectionIndex,
    store: SegmentStore,
    embedder: Box<dyn Embedder + Send + Sync>,
    llm: Box<dyn Llm + Send + Sync>,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryService {
    /// Build the index over `segments` and assemble the service. Building
    /// must succeed before any query is served; embedding failures propagate.
    pub fn build(
        segments: Vec<Segment>,
        embedder: Box<dyn Embedder + Send + Sync>,
        llm: Box<dyn Llm + Send + Sync>,
        config: QueryConfig,
    ) -> Result<Self, AppError> {
        if config.top_k == 0 {
            return Err(AppError::new(
                "AI_CONFIG_INVALID",
                "top_k must be at least 1",
            ));
        }
        if config.citation_chunk_size == 0 {
            return Err(AppError::new(
                "AI_CONFIG_INVALID",
                "citation_chunk_size must be at least 1",
            ));
        }

        let index = SectionIndex::build(
            &segments,
            embedder.as_ref(),
            &config.embed_model,
            config.citation_chunk_size,
        )?;

        Ok(Self {
            config,
            index,
            store: SegmentStore::new(segments),
            embedder,
            llm,
        })
    }

    /// Answer a bare query: retrieve, then synthesize with citations.
    pub fn query(&self, q: &str) -> Result<AnswerResult, AppError> {
        let chunks = self
            .index
            .retrieve(self.embedder.as_ref(), q, self.config.top_k)?;
        answer::synthesize(self.llm.as_ref(), &self.config.chat_model, q, &chunks)
    }

    /// Answer a query carrying conversational context. Condensation changes
    /// only the text fed to retrieval; the result still reports the caller's
    /// original query. Empty history is identical to `query`.
    pub fn query_with_history(
        &self,
        q: &str,
        prior_turns: &[ConversationTurn],
    ) -> Result<AnswerResult, AppError> {
        if prior_turns.is_empty() {
            return self.query(q);
        }

        let condensed = condense::condense(
            self.llm.as_ref(),
            &self.config.chat_model,
            prior_turns,
            q,
            self.config.history_token_budget,
        )?;
        let chunks = self
            .index
            .retrieve(self.embedder.as_ref(), &condensed, self.config.top_k)?;
        let result = answer::synthesize(
            self.llm.as_ref(),
            &self.config.chat_model,
            &condensed,
            &chunks,
        )?;

        Ok(AnswerResult {
            query: q.to_string(),
            ..result
        })
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn segments(&self) -> Vec<SegmentSummary> {
        self.store.list()
    }

    pub fn segment(&self, id: u32) -> Result<&Segment, AppError> {
        self.store.get(id)
    }

    pub fn segment_by_number(&self, section_number: &str) -> Result<&Segment, AppError> {
        self.store.get_by_section(section_number)
    }
}
