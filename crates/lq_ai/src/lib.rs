pub mod answer;
pub mod condense;
pub mod correction;
pub mod embeddings;
pub mod index;
pub mod llm;
pub mod openai;
pub mod service;

#[cfg(test)]
mod tests {
    use super::openai::OpenAiClient;

    #[test]
    fn rejects_blank_api_keys() {
        assert!(OpenAiClient::new("sk-test").is_ok());
        assert!(OpenAiClient::new("").is_err());
        assert!(OpenAiClient::new("   ").is_err());
    }

    #[test]
    fn validates_and_trims_base_urls() {
        let client = OpenAiClient::with_base_url("sk-test", "http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");

        assert!(OpenAiClient::with_base_url("sk-test", "ftp://example.com").is_err());
    }
}
