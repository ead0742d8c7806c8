use lq_core::error::AppError;
use lq_core::normalize::TextCorrector;

use crate::llm::Llm;

/// LLM-backed implementation of the normalizer's correction seam. The
/// normalizer owns the degrade-on-failure policy; this type only issues the
/// request and returns the raw output.
pub struct LlmCorrector<L: Llm> {
    llm: L,
    model: String,
}

impl<L: Llm> LlmCorrector<L> {
    pub fn new(llm: L, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }
}

impl<L: Llm> TextCorrector for LlmCorrector<L> {
    fn correct(&self, text: &str) -> Result<String, AppError> {
        let prompt = format!(
            "Fix spacing and OCR extraction errors in the following legal text. \
             Preserve all legal terminology verbatim. Do not paraphrase, add, or \
             remove content. Return only the corrected text.\n\n{text}"
        );
        self.llm.generate(&self.model, &prompt)
    }
}
