pub fn grounded_answer_prompt(query: &str, source_blocks: &str) -> String {
    // Keep the contract explicit:
    // - Answer ONLY from the numbered sources.
    // - Cite inline as [n] for every claim taken from source n.
    format!(
        r#"You are answering a question about a legal corpus using only the numbered sources below.

Rules (non-negotiable):
1) Base the answer ONLY on the provided sources. Do not invent legal provisions.
2) Every claim drawn from a source MUST carry an inline citation marker in the form [n], where n is the source number.
3) If the sources do not answer the question, say so plainly and cite nothing.
4) Quote legal terminology exactly as written in the sources.

Question:
{query}

Sources:
{source_blocks}

Output:
- Return plain text only, no markup.
- Include inline [n] citation markers as specified.
"#
    )
}

pub fn ungrounded_answer_prompt(query: &str) -> String {
    format!(
        r#"You are answering a question about a legal corpus, but no source passages were retrieved for it.

Rules:
1) Answer from general context only if you can do so responsibly; otherwise decline.
2) State clearly that no corpus passages support the answer.

Question:
{query}

Output:
- Return plain text only, no markup.
"#
    )
}

pub fn condense_question_prompt(transcript: &str, follow_up: &str) -> String {
    format!(
        r#"Given the conversation below and a follow-up message, rewrite the follow-up as a single self-contained question.

Rules:
1) Resolve pronouns and ellipsis against the conversation.
2) Preserve the asker's intent; do not answer the question.
3) Return only the rewritten question, nothing else.

Conversation:
{transcript}

Follow-up message:
{follow_up}
"#
    )
}
