use crate::domain::{Segment, SegmentSummary};
use crate::error::AppError;

/// Preview length for segment listings, in characters.
const PREVIEW_CHARS: usize = 200;

/// In-memory, read-only store over the segments produced at load time.
/// Lookups by id or section number surface a typed not-found error.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn list(&self) -> Vec<SegmentSummary> {
        self.segments
            .iter()
            .map(|s| SegmentSummary {
                id: s.id,
                section_number: s.section_number.clone(),
                main_section_title: s.main_section_title.clone(),
                section_label: s.section_label.clone(),
                preview: preview_text(&s.text),
            })
            .collect()
    }

    pub fn get(&self, id: u32) -> Result<&Segment, AppError> {
        self.segments.get(id as usize).ok_or_else(|| {
            AppError::new("SEGMENT_NOT_FOUND", "No segment with the requested id")
                .with_details(format!("id={id}"))
        })
    }

    pub fn get_by_section(&self, section_number: &str) -> Result<&Segment, AppError> {
        self.segments
            .iter()
            .find(|s| s.section_number == section_number)
            .ok_or_else(|| {
                AppError::new(
                    "SEGMENT_NOT_FOUND",
                    "No segment with the requested section number",
                )
                .with_details(format!("section_number={section_number}"))
            })
    }
}

fn preview_text(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    out.push_str("...");
    out
}
