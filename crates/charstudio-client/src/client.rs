//! HTTP client for the `generateContent` endpoint.

use crate::protocol::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Transport and API-level failures.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never completed (network, DNS, CORS, timeout).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the raw body when it was
        /// not parseable.
        message: String,
    },

    /// A 2xx response carried no parseable body.
    #[error("empty or unparseable response body")]
    EmptyResponse,

    /// Inline image data failed to decode.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Client for a `generateContent`-style image model API.
///
/// On wasm32 `reqwest` rides the browser `fetch` API, so the same
/// client works in the browser and in native tests.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client against the default endpoint and model.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_BASE_URL, DEFAULT_MODEL, api_key)
    }

    /// Create a client against a specific endpoint and model.
    #[must_use]
    pub fn with_endpoint(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// The model name requests are sent to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST a generation request and parse the response.
    ///
    /// # Errors
    ///
    /// [`ClientError::Http`] if the round trip fails,
    /// [`ClientError::Api`] on a non-success status, and
    /// [`ClientError::EmptyResponse`] if a success body does not parse.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClientError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model,
        );
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map_or(body, |parsed| parsed.error.message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|_| ClientError::EmptyResponse)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_and_model() {
        let client = GeminiClient::new("k");
        assert_eq!(client.model(), DEFAULT_MODEL);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn custom_endpoint_is_kept() {
        let client = GeminiClient::with_endpoint("http://localhost:8080/v1", "test-model", "k");
        assert_eq!(client.base_url, "http://localhost:8080/v1");
        assert_eq!(client.model(), "test-model");
    }

    #[test]
    fn api_error_body_parses_nested_message() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "quota exceeded");
    }
}
