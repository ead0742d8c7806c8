use lq_core::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Shared OpenAI connection settings. The API key is injected by the caller;
/// the core never reads the environment itself.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint (proxy or compatible
    /// local server).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AppError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AppError::new(
                "AI_CONFIG_INVALID",
                "OpenAI API key must not be empty",
            ));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(AppError::new(
                "AI_CONFIG_INVALID",
                "OpenAI base URL must be http(s)",
            )
            .with_details(format!("base_url={base_url}")));
        }

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}
