//! # Embedding Provider
//!
//! Blocking client for OpenAI-compatible `/embeddings` endpoints. The call is
//! the only step of a semantic search that waits on the network; it is
//! bounded by the configured timeout and never retried here.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::{ProviderError, ProviderResult};

/// Turns text into a fixed-length vector.
pub trait EmbeddingProvider {
    /// Embeds one text.
    ///
    /// # Errors
    ///
    /// Any failure, including an empty or wrongly sized vector, is a
    /// `ProviderError`.
    fn embed(&self, text: &str) -> ProviderResult<Vec<f32>>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// OpenAI embeddings client.
pub struct OpenAiEmbeddings {
    client: Client,
    config: EmbeddingConfig,
    api_key: String,
}

impl OpenAiEmbeddings {
    /// Builds the HTTP client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Config` if validation fails or the client
    /// cannot be constructed.
    pub fn new(config: EmbeddingConfig) -> ProviderResult<Self> {
        config.validate()?;

        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ProviderError::Config("missing API key".into()))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!("{}/embeddings", self.config.endpoint.trim_end_matches('/'))
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

impl EmbeddingProvider for OpenAiEmbeddings {
    fn embed(&self, text: &str) -> ProviderResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: [text],
        };

        debug!(model = %self.config.model, chars = text.len(), "requesting embedding");
        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_embedding(&body, self.config.dimensions)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Extracts the first embedding from a successful response body.
pub(crate) fn parse_embedding(body: &str, dimensions: usize) -> ProviderResult<Vec<f32>> {
    let response: EmbeddingResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let embedding = response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(ProviderError::EmptyResponse)?;

    if embedding.len() != dimensions {
        return Err(ProviderError::InvalidDimensions {
            expected: dimensions,
            actual: embedding.len(),
        });
    }

    Ok(embedding)
}

/// Error message from an OpenAI error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_first_embedding() {
        let body = r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.5,-0.25,1.0]}],"model":"text-embedding-3-small","usage":{"prompt_tokens":3,"total_tokens":3}}"#;
        assert_eq!(parse_embedding(body, 3).unwrap(), vec![0.5, -0.25, 1.0]);
    }

    #[test]
    fn parse_rejects_empty_data() {
        assert!(matches!(
            parse_embedding(r#"{"data":[]}"#, 3),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            parse_embedding(r#"{"data":[{"embedding":[]}]}"#, 3),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn parse_rejects_wrong_dimensions() {
        assert!(matches!(
            parse_embedding(r#"{"data":[{"embedding":[1.0,2.0]}]}"#, 3),
            Err(ProviderError::InvalidDimensions {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn parse_rejects_malformed_body() {
        assert!(matches!(
            parse_embedding("<html>", 3),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_message_prefers_api_error() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message(" bad gateway \n"), "bad gateway");
    }

    #[test]
    fn new_requires_valid_config() {
        assert!(matches!(
            OpenAiEmbeddings::new(EmbeddingConfig::new()),
            Err(ProviderError::Config(_))
        ));
    }

    #[test]
    fn url_joins_endpoint() {
        let client = OpenAiEmbeddings::new(
            EmbeddingConfig::new()
                .with_endpoint("http://localhost:8080/v1/")
                .with_api_key("sk-test"),
        )
        .unwrap();
        assert_eq!(client.url(), "http://localhost:8080/v1/embeddings");
        assert_eq!(client.model_name(), "text-embedding-3-small");
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        // Bind then drop a listener so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = OpenAiEmbeddings::new(
            EmbeddingConfig::new()
                .with_endpoint(format!("http://127.0.0.1:{port}/v1"))
                .with_api_key("sk-test")
                .with_timeout_secs(5),
        )
        .unwrap();

        let err = client.embed("a heist movie").unwrap_err();
        assert!(err.is_retryable(), "unexpected error: {err:?}");
    }
}
