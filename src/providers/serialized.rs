/*!
 * Per-model serialization of inference calls.
 *
 * A loaded model instance handles at most one generation at a time. Calls to
 * different models still run concurrently.
 */

use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::{GenerationRequest, InferenceBackend};
use crate::errors::InferenceError;

/// Wraps a backend with one single-permit semaphore per model key
#[derive(Debug)]
pub struct SerializedBackend {
    inner: Arc<dyn InferenceBackend>,
    permits: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl SerializedBackend {
    pub fn new(inner: Arc<dyn InferenceBackend>) -> Self {
        Self {
            inner,
            permits: Mutex::new(HashMap::new()),
        }
    }

    fn semaphore_for(&self, model_key: &str) -> Arc<Semaphore> {
        let mut permits = self.permits.lock();
        Arc::clone(
            permits
                .entry(model_key.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(1))),
        )
    }
}

#[async_trait]
impl InferenceBackend for SerializedBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError> {
        let semaphore = self.semaphore_for(&request.model_key);
        let _permit = semaphore
            .acquire_owned()
            .await
            .map_err(|e| InferenceError::ModelUnavailable(format!("{}: {}", request.model_key, e)))?;
        debug!("Acquired inference slot for {}", request.model_key);
        self.inner.generate(request).await
    }

    async fn test_connection(&self) -> Result<(), InferenceError> {
        self.inner.test_connection().await
    }
}
