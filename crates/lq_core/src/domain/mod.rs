use serde::{Deserialize, Serialize};

/// One addressable unit of the source legal text.
///
/// Notes:
/// - `id` is a dense, zero-based index over non-empty segments in document order.
/// - `section_label` is `"<main_section_title> <section_number>"` and is the value
///   cited back to callers; a blank label surfaces as "Unknown Section" at
///   citation time rather than an empty field.
/// - Segments are immutable once created; re-segmenting the same input must
///   reproduce the same ordered output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Segment {
    pub id: u32,
    pub section_number: String,
    pub main_section_title: String,
    pub section_label: String,
    pub text: String,
}

/// Listing view of a segment: metadata plus a short text preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentSummary {
    pub id: u32,
    pub section_number: String,
    pub main_section_title: String,
    pub section_label: String,
    pub preview: String,
}

/// Speaker role of a conversation turn. Roles other than user/assistant are
/// accepted on the wire but ignored by history condensation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One prior conversation turn. The core consumes these read-only; ownership
/// and persistence belong to the conversation-management collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Non-fatal issue observed while processing input text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
