use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{GenerationRequest, InferenceBackend};
use crate::app_config::InferenceConfig;
use crate::errors::InferenceError;

/// Client for a model-serving process exposing `/generate` and `/health`
#[derive(Debug, Clone)]
pub struct HttpInferenceBackend {
    /// Base URL of the model server
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
}

/// Body sent to `/generate`
#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    model_path: String,
    inputs: &'a str,
    parameters: GenerateParameters<'a>,
}

#[derive(Debug, Serialize)]
struct GenerateParameters<'a> {
    max_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    forced_bos_token: Option<&'a str>,
}

/// Answer of `/generate`
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(alias = "generated_text", alias = "translation_text")]
    text: String,
}

/// Error body of the model server
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "detail", alias = "message")]
    error: String,
}

impl HttpInferenceBackend {
    /// Create a client from the inference configuration
    pub fn new(config: &InferenceConfig) -> Result<Self, InferenceError> {
        let endpoint = if config.endpoint.starts_with("http://") || config.endpoint.starts_with("https://") {
            config.endpoint.clone()
        } else {
            format!("http://{}", config.endpoint)
        };
        let mut base_url = Url::parse(&endpoint)
            .map_err(|e| InferenceError::RequestFailed(format!("Invalid endpoint '{}': {}", config.endpoint, e)))?;
        // Url::join drops the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| InferenceError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, InferenceError> {
        self.base_url
            .join(path)
            .map_err(|e| InferenceError::RequestFailed(format!("Invalid URL for '{}': {}", path, e)))
    }

    fn map_send_error(error: reqwest::Error) -> InferenceError {
        if error.is_connect() || error.is_timeout() {
            InferenceError::ConnectionError(error.to_string())
        } else {
            InferenceError::RequestFailed(error.to_string())
        }
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError> {
        let url = self.url("generate")?;
        let body = GenerateBody {
            model: &request.model_key,
            model_path: request.model_path.to_string_lossy().into_owned(),
            inputs: &request.text,
            parameters: GenerateParameters {
                max_length: request.max_length,
                forced_bos_token: request.forced_target_tag.as_deref(),
            },
        };

        debug!("POST {} for model {}", url, request.model_key);
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| InferenceError::RequestFailed(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&response_text)
                .map(|body| body.error)
                .unwrap_or(response_text);
            error!("Model server error for {}: {} - {}", request.model_key, status, message);
            return Err(InferenceError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            InferenceError::ParseError(format!(
                "{} (first 200 chars: {})",
                e,
                response_text.chars().take(200).collect::<String>()
            ))
        })?;

        if parsed.text.trim().is_empty() {
            return Err(InferenceError::EmptyOutput(request.model_key));
        }
        Ok(parsed.text)
    }

    async fn test_connection(&self) -> Result<(), InferenceError> {
        let response = self
            .client
            .get(self.url("health")?)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(InferenceError::ApiError {
                status_code: response.status().as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }
}
