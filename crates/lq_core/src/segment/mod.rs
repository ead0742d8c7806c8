use std::collections::BTreeMap;

use regex::Regex;

use crate::domain::{Segment, ValidationWarning};
use crate::normalize::{self, CorrectionOutcome, TextCorrector};

/// Top-level section numbers are probed in `[1, SECTION_SCAN_LIMIT)`.
const SECTION_SCAN_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationReport {
    pub segments: Vec<Segment>,
    pub warnings: Vec<ValidationWarning>,
}

/// Segment a raw legal document without the optional correction pass.
pub fn segment_text(raw: &str) -> Vec<Segment> {
    segment_text_with_report(raw, None).segments
}

/// Segment a raw legal document into ordered, addressable sections.
///
/// A document with no numbered sections yields an empty segment list plus a
/// warning; it is never an error. Identical input always reproduces the same
/// ordered output, which index rebuilds rely on.
pub fn segment_text_with_report(
    raw: &str,
    corrector: Option<&dyn TextCorrector>,
) -> SegmentationReport {
    let mut warnings = Vec::new();

    let body = strip_document_boundaries(raw);
    let titles = extract_section_titles(body);

    // Subsection markers ("2.3." or "2.3.1." followed by whitespace) delimit
    // segment bodies. A single top-level number is a header, not a marker.
    let marker = Regex::new(r"(\d+\.\d+(?:\.\d+)*)\.\s+").expect("valid regex");
    // Lookahead artifact: the next top-level header bleeding into this body.
    let trailing_header = Regex::new(r"\d+\.\s+[A-Z][a-z]+\s*$").expect("valid regex");

    let mut hits: Vec<(String, usize, usize)> = Vec::new();
    for caps in marker.captures_iter(body) {
        let (whole, number) = match (caps.get(0), caps.get(1)) {
            (Some(w), Some(n)) => (w, n),
            _ => continue,
        };
        hits.push((number.as_str().to_string(), whole.start(), whole.end()));
    }

    if hits.is_empty() {
        warnings.push(ValidationWarning::new(
            "SEGMENT_NO_SECTIONS",
            "No numbered subsections found in document text",
        ));
        return SegmentationReport {
            segments: Vec::new(),
            warnings,
        };
    }

    let mut segments = Vec::new();
    for (i, (section_number, _start, end)) in hits.iter().enumerate() {
        let body_end = hits.get(i + 1).map(|h| h.1).unwrap_or(body.len());
        let raw_body = &body[*end..body_end];

        let stripped = trailing_header.replace(raw_body.trim(), "");
        let normalized = normalize::normalize(&stripped, corrector);
        if let CorrectionOutcome::Degraded(e) = &normalized.correction {
            warnings.push(
                ValidationWarning::new(
                    "NORMALIZE_CORRECTION_DEGRADED",
                    "Correction pass degraded to rule-cleaned text",
                )
                .with_details(format!("section={section_number}; cause={e}")),
            );
        }

        // Empty segments must never enter the corpus.
        if normalized.text.is_empty() {
            continue;
        }

        let main_section_title = resolve_main_title(section_number, &titles);
        segments.push(Segment {
            id: segments.len() as u32,
            section_label: format!("{main_section_title} {section_number}"),
            section_number: section_number.clone(),
            main_section_title,
            text: normalized.text,
        });
    }

    SegmentationReport { segments, warnings }
}

/// Drop the preamble before the first top-level "1. " marker and the trailing
/// "Citations:" block. Both are document-format boundaries, not content.
fn strip_document_boundaries(raw: &str) -> &str {
    let first_section = Regex::new(r"1\.\s").expect("valid regex");
    let start = first_section.find(raw).map(|m| m.start()).unwrap_or(0);
    let body = &raw[start..];

    match body.find("Citations:") {
        Some(end) => &body[..end],
        None => body,
    }
}

/// Capture titles for top-level sections by probing for
/// "n. <Capitalized word>" immediately followed by the "n.1." marker.
///
/// The pattern tolerates the inconsistent whitespace PDF extraction leaves
/// between a title and the first subsection marker. It is a heuristic to be
/// tuned against the target corpus; numbers with no match stay unset and fall
/// back to a synthesized "Section n" label.
fn extract_section_titles(text: &str) -> BTreeMap<u32, String> {
    let mut titles = BTreeMap::new();
    for n in 1..SECTION_SCAN_LIMIT {
        let pattern = format!(r"{n}\.\s+([A-Z][a-z]+)\s*{n}\.1\.");
        let re = Regex::new(&pattern).expect("valid regex");
        if let Some(caps) = re.captures(text) {
            if let Some(title) = caps.get(1) {
                titles.insert(n, title.as_str().to_string());
            }
        }
    }
    titles
}

fn resolve_main_title(section_number: &str, titles: &BTreeMap<u32, String>) -> String {
    let main = section_number.split('.').next().unwrap_or(section_number);
    match main.parse::<u32>().ok().and_then(|n| titles.get(&n)) {
        Some(title) => title.clone(),
        None => format!("Section {main}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_numbered_sections_yields_empty_report() {
        let report = segment_text_with_report("Preamble with no sections at all.", None);
        assert!(report.segments.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.code == "SEGMENT_NO_SECTIONS"));
    }

    #[test]
    fn subsection_without_body_is_dropped() {
        let segments = segment_text("1. Laws 1.1. A real body here. 1.2. ");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].section_number, "1.1");
    }

    #[test]
    fn resolves_title_fallback_for_uncaptured_sections() {
        // Section 2 has no "2. <Title> 2.1." header run, so the label falls back.
        let segments = segment_text("1. Laws 1.1. First body. 2.4. Orphan body.");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].main_section_title, "Laws");
        assert_eq!(segments[1].main_section_title, "Section 2");
        assert_eq!(segments[1].section_label, "Section 2 2.4");
    }

    #[test]
    fn ids_are_dense_and_zero_based_over_survivors() {
        let segments =
            segment_text("1. Laws 1.1. First. 1.2.  1.3. Third body here. 2.1. Fourth.");
        let ids: Vec<u32> = segments.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(segments[1].section_number, "1.3");
    }
}
