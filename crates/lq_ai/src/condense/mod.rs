use std::collections::VecDeque;

use lq_core::domain::{ConversationTurn, TurnRole};
use lq_core::error::AppError;

use crate::answer::prompts;
use crate::llm::Llm;

/// Default rolling-memory budget, in estimated tokens.
pub const DEFAULT_TOKEN_BUDGET: u32 = 3000;

/// Rough token estimate: four characters per token.
fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() as u32).div_ceil(4).max(1)
}

/// Token-budgeted rolling memory over conversation turns.
///
/// Constructed fresh per condensation call; the condenser holds no cross-call
/// state. When the budget is exceeded the oldest turns are evicted first, and
/// the newest turn is never evicted.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    budget: u32,
    used: u32,
    turns: VecDeque<(TurnRole, String)>,
}

impl ChatMemory {
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            used: 0,
            turns: VecDeque::new(),
        }
    }

    /// Record a turn. Roles other than user/assistant are ignored.
    pub fn push(&mut self, turn: &ConversationTurn) {
        match turn.role {
            TurnRole::User | TurnRole::Assistant => {}
            TurnRole::Other => return,
        }
        self.used += estimate_tokens(&turn.content);
        self.turns.push_back((turn.role, turn.content.clone()));

        while self.used > self.budget && self.turns.len() > 1 {
            if let Some((_, evicted)) = self.turns.pop_front() {
                self.used -= estimate_tokens(&evicted);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn transcript(&self) -> String {
        let mut lines = Vec::with_capacity(self.turns.len());
        for (role, content) in &self.turns {
            let speaker = match role {
                TurnRole::User => "User",
                TurnRole::Assistant => "Assistant",
                TurnRole::Other => continue,
            };
            lines.push(format!("{speaker}: {content}"));
        }
        lines.join("\n")
    }
}

/// Fold prior turns into a single self-contained query.
///
/// With no usable history this is a pure passthrough: no memory is built and
/// the model is never called. Otherwise the turns are replayed into a fresh
/// memory and the model rewrites the utterance against that transcript.
/// Condensation changes only the query text fed to retrieval.
pub fn condense(
    llm: &dyn Llm,
    model: &str,
    prior_turns: &[ConversationTurn],
    new_utterance: &str,
    token_budget: u32,
) -> Result<String, AppError> {
    if prior_turns.is_empty() {
        return Ok(new_utterance.to_string());
    }

    let mut memory = ChatMemory::new(token_budget);
    for turn in prior_turns {
        memory.push(turn);
    }
    if memory.is_empty() {
        return Ok(new_utterance.to_string());
    }

    let prompt = prompts::condense_question_prompt(&memory.transcript(), new_utterance);
    let rewritten = llm.generate(model, &prompt)?;
    let rewritten = rewritten.trim();
    if rewritten.is_empty() {
        // A blank rewrite would make retrieval reject the query outright.
        return Ok(new_utterance.to_string());
    }
    Ok(rewritten.to_string())
}
