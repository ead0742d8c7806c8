use lq_core::domain::Segment;
use lq_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::index::RetrievedChunk;
use crate::llm::Llm;

pub(crate) mod prompts;

/// Citation source used when a chunk carries no resolvable section label.
pub const UNKNOWN_SECTION: &str = "Unknown Section";

/// One verifiable citation: `text` is always a verbatim chunk span.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Citation {
    pub source: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerResult {
    pub query: String,
    pub response: String,
    pub citations: Vec<Citation>,
}

/// Generate an answer grounded in the retrieved chunks, with one citation per
/// chunk the model referenced.
///
/// Chunks are presented as numbered sources and the model is instructed to
/// cite inline as `[n]`. Citations come back in the order the model first
/// referenced each source; when the output carries no recognizable markers,
/// fall back to one citation per retrieved chunk in retrieval-rank order.
/// Empty `chunks` still produces a well-formed result with no citations.
pub fn synthesize(
    llm: &dyn Llm,
    model: &str,
    query: &str,
    chunks: &[RetrievedChunk],
) -> Result<AnswerResult, AppError> {
    if chunks.is_empty() {
        let response = llm.generate(model, &prompts::ungrounded_answer_prompt(query))?;
        return Ok(AnswerResult {
            query: query.to_string(),
            response,
            citations: Vec::new(),
        });
    }

    let source_blocks = build_source_blocks(chunks);
    let response = llm.generate(model, &prompts::grounded_answer_prompt(query, &source_blocks))?;

    let mut cited = extract_cited_source_numbers(&response);
    // Out-of-range markers are model noise, not citations.
    cited.retain(|n| *n >= 1 && *n <= chunks.len());

    let citations = if cited.is_empty() {
        chunks.iter().map(citation_for_chunk).collect()
    } else {
        cited
            .into_iter()
            .map(|n| citation_for_chunk(&chunks[n - 1]))
            .collect()
    };

    Ok(AnswerResult {
        query: query.to_string(),
        response,
        citations,
    })
}

pub fn citation_for_chunk(chunk: &RetrievedChunk) -> Citation {
    Citation {
        source: citation_source(&chunk.segment),
        text: chunk.text.clone(),
    }
}

pub fn citation_source(segment: &Segment) -> String {
    let label = segment.section_label.trim();
    if label.is_empty() {
        UNKNOWN_SECTION.to_string()
    } else {
        label.to_string()
    }
}

fn build_source_blocks(chunks: &[RetrievedChunk]) -> String {
    let mut blocks = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        blocks.push(format!(
            "Source {}: {}\n{}",
            i + 1,
            citation_source(&chunk.segment),
            chunk.text
        ));
    }
    blocks.join("\n\n---\n\n")
}

/// Parse `[n]` markers, keeping the order of first reference.
fn extract_cited_source_numbers(response: &str) -> Vec<usize> {
    let bytes = response.as_bytes();
    let mut out: Vec<usize> = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b']' {
                if let Ok(n) = response[start..end].parse::<usize>() {
                    if !out.contains(&n) {
                        out.push(n);
                    }
                }
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }
    out
}
