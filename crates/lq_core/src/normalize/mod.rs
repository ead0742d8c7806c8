use crate::error::AppError;

mod spacing;

pub use spacing::clean_spacing;

/// Minimum rule-cleaned length worth sending to the correction capability.
const CORRECTION_MIN_CHARS: usize = 10;

/// External text-correction capability (typically LLM-backed, wired in by the
/// AI crate). Implementations fix spacing/OCR artifacts without paraphrasing.
pub trait TextCorrector {
    fn correct(&self, text: &str) -> Result<String, AppError>;
}

/// Outcome of the optional correction pass. Degradation is observable but
/// never propagates: the rule-cleaned text is always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionOutcome {
    /// Correction capability ran and its output was accepted.
    Applied,
    /// No corrector configured, or the text was too short to bother.
    Skipped,
    /// Corrector failed or returned nothing; rule-cleaned text used instead.
    Degraded(AppError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub correction: CorrectionOutcome,
}

/// Two-stage normalization: deterministic spacing rules, then an optional
/// correction pass that degrades to the rule-cleaned text on any failure.
pub fn normalize(text: &str, corrector: Option<&dyn TextCorrector>) -> Normalized {
    let cleaned = clean_spacing(text);

    let corrector = match corrector {
        Some(c) if cleaned.chars().count() >= CORRECTION_MIN_CHARS => c,
        _ => {
            return Normalized {
                text: cleaned,
                correction: CorrectionOutcome::Skipped,
            }
        }
    };

    match corrector.correct(&cleaned) {
        Ok(corrected) if !corrected.trim().is_empty() => Normalized {
            text: corrected.trim().to_string(),
            correction: CorrectionOutcome::Applied,
        },
        Ok(_) => Normalized {
            text: cleaned,
            correction: CorrectionOutcome::Degraded(AppError::new(
                "NORMALIZE_CORRECTION_EMPTY",
                "Correction capability returned empty text",
            )),
        },
        Err(e) => Normalized {
            text: cleaned,
            correction: CorrectionOutcome::Degraded(e),
        },
    }
}
