/*!
 * Inference backends.
 *
 * The routing layer never runs models itself. It hands a fully prepared
 * generation request to an `InferenceBackend`:
 * - `http`: client for a model-serving process
 * - `mock`: deterministic in-process backend for tests and dry runs
 * - `serialized`: wrapper allowing one in-flight call per model
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;

use crate::errors::InferenceError;

pub mod http;
pub mod mock;
pub mod serialized;

/// One generation call for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model key
    pub model_key: String,

    /// Resolved location of the model files
    pub model_path: PathBuf,

    /// Input text, already carrying any prompt prefix
    pub text: String,

    /// Language tag the first output token is forced to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_target_tag: Option<String>,

    /// Maximum generated length in tokens
    pub max_length: u32,
}

impl GenerationRequest {
    pub fn new(model_key: impl Into<String>, model_path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            model_key: model_key.into(),
            model_path: model_path.into(),
            text: text.into(),
            forced_target_tag: None,
            max_length: 512,
        }
    }

    pub fn forced_target_tag(mut self, tag: impl Into<String>) -> Self {
        self.forced_target_tag = Some(tag.into());
        self
    }

    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }
}

/// Common trait for all inference backends
///
/// Implementations must report failures as errors; an empty string is never
/// a successful generation.
#[async_trait]
pub trait InferenceBackend: Send + Sync + Debug {
    /// Run one generation and return the decoded text
    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError>;

    /// Check that the backend can be reached
    async fn test_connection(&self) -> Result<(), InferenceError>;
}
