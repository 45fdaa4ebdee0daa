//! OpenAI Embedding Provider
//!
//! Implements the `EmbeddingProvider` port using OpenAI's embedding API.
//! Supports text-embedding-3-small, text-embedding-3-large, and ada-002.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use mcb_domain::error::{Error, Result};
use mcb_domain::ports::EmbeddingProvider;
use mcb_domain::value_objects::Embedding;

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OPENAI_ADA, EMBEDDING_DIMENSION_OPENAI_LARGE,
    EMBEDDING_DIMENSION_OPENAI_SMALL,
};
use crate::embedding::helpers::constructor;
use crate::utils::HttpResponseUtils;

/// OpenAI embedding provider.
///
/// Receives its HTTP client via constructor injection (explicit DI, no
/// service locator).
///
/// ## Example
///
/// ```rust,no_run
/// use mcb_providers::embedding::OpenAIEmbeddingProvider;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Client::builder()
///         .timeout(Duration::from_secs(30))
///         .build()?;
///     let provider = OpenAIEmbeddingProvider::new(
///         "sk-your-api-key".to_string(),
///         None,
///         "text-embedding-3-small".to_string(),
///         Duration::from_secs(30),
///         client,
///     );
///     Ok(())
/// }
/// ```
pub struct OpenAIEmbeddingProvider {
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAIEmbeddingProvider {
    /// Create a new OpenAI embedding provider.
    ///
    /// # Arguments
    /// * `api_key` - OpenAI API key
    /// * `base_url` - Optional custom base URL (defaults to OpenAI's API)
    /// * `model` - Model name (e.g. `"text-embedding-3-small"`)
    /// * `timeout` - Request timeout duration
    /// * `http_client` - Reqwest HTTP client used for API requests
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        let api_key = constructor::validate_api_key(&api_key);
        let base_url = constructor::validate_url(base_url);

        Self {
            api_key,
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or("https://api.openai.com/v1")
    }

    async fn fetch_embeddings(&self, texts: &[String]) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "input": texts,
            "model": self.model,
            "encoding_format": "float"
        });

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url()))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    Error::embedder_unavailable(format!(
                        "{} {:?}",
                        crate::constants::ERROR_MSG_REQUEST_TIMEOUT,
                        self.timeout
                    ))
                } else {
                    Error::embedding(format!("HTTP request failed: {e}"))
                }
            })?;

        HttpResponseUtils::check_and_parse(response, "OpenAI").await
    }

    fn parse_embedding(&self, index: usize, item: &serde_json::Value) -> Result<Embedding> {
        let embedding_vec = item["embedding"]
            .as_array()
            .ok_or_else(|| Error::embedding(format!("invalid embedding format for text {index}")))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect::<Vec<f32>>();

        Ok(Embedding {
            vector: embedding_vec,
            model: self.model.clone(),
            dimensions: self.dimensions(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response_data = self.fetch_embeddings(texts).await?;

        let data = response_data["data"]
            .as_array()
            .ok_or_else(|| Error::embedding("invalid response format: missing data array"))?;

        if data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "response data count mismatch: expected {}, got {}",
                texts.len(),
                data.len()
            )));
        }

        data.iter()
            .enumerate()
            .map(|(i, item)| self.parse_embedding(i, item))
            .collect()
    }

    fn dimensions(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => EMBEDDING_DIMENSION_OPENAI_LARGE,
            "text-embedding-ada-002" => EMBEDDING_DIMENSION_OPENAI_ADA,
            _ => EMBEDDING_DIMENSION_OPENAI_SMALL,
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(model: &str) -> OpenAIEmbeddingProvider {
        OpenAIEmbeddingProvider::new(
            "sk-test".to_string(),
            None,
            model.to_string(),
            Duration::from_secs(5),
            Client::new(),
        )
    }

    #[test]
    fn dimensions_match_model_name() {
        assert_eq!(
            provider("text-embedding-3-small").dimensions(),
            EMBEDDING_DIMENSION_OPENAI_SMALL
        );
        assert_eq!(
            provider("text-embedding-3-large").dimensions(),
            EMBEDDING_DIMENSION_OPENAI_LARGE
        );
        assert_eq!(
            provider("text-embedding-ada-002").dimensions(),
            EMBEDDING_DIMENSION_OPENAI_ADA
        );
    }

    #[tokio::test]
    async fn empty_batch_short_circuits_without_a_request() {
        let p = provider("text-embedding-3-small");
        assert!(p.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[test]
    fn base_url_defaults_to_openai_api() {
        assert_eq!(provider("text-embedding-3-small").base_url(), "https://api.openai.com/v1");
    }
}
