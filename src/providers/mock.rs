/*!
 * Mock inference backend for testing.
 *
 * Each model key can be given its own behavior:
 * - `MockBehavior::Working` - renders `[MODEL_KEY] input`
 * - `MockBehavior::Failing` - always fails with an API error
 * - `MockBehavior::Slow` - succeeds after a delay
 * - `MockBehavior::Empty` - returns blank output, reported as an error
 *
 * Every request is recorded so tests can assert which models were called.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{GenerationRequest, InferenceBackend};
use crate::errors::InferenceError;

/// Behavior mode for one model of the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Succeeds after `delay_ms`
    Slow { delay_ms: u64 },
    /// Returns an empty string
    Empty,
}

#[derive(Debug, Default)]
struct MockState {
    behaviors: HashMap<String, MockBehavior>,
    calls: Vec<GenerationRequest>,
}

/// Mock backend; clones share behaviors and the call log
#[derive(Debug, Clone)]
pub struct MockInferenceBackend {
    default_behavior: MockBehavior,
    state: Arc<Mutex<MockState>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl Default for MockInferenceBackend {
    fn default() -> Self {
        Self::working()
    }
}

impl MockInferenceBackend {
    /// Create a mock whose models behave as `default_behavior` unless overridden
    pub fn new(default_behavior: MockBehavior) -> Self {
        Self {
            default_behavior,
            state: Arc::new(Mutex::new(MockState::default())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock where every model succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock where every model fails
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Override the behavior of one model
    pub fn with_model(self, model_key: &str, behavior: MockBehavior) -> Self {
        self.set_behavior(model_key, behavior);
        self
    }

    pub fn set_behavior(&self, model_key: &str, behavior: MockBehavior) {
        self.state
            .lock()
            .behaviors
            .insert(model_key.to_string(), behavior);
    }

    /// Deterministic rendering of a successful generation
    pub fn render(model_key: &str, text: &str) -> String {
        format!("[{}] {}", model_key, text)
    }

    /// All recorded requests in arrival order
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.state.lock().calls.clone()
    }

    /// Recorded requests for one model
    pub fn calls_for(&self, model_key: &str) -> Vec<GenerationRequest> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.model_key == model_key)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Highest number of simultaneous generate calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, model_key: &str) -> MockBehavior {
        self.state
            .lock()
            .behaviors
            .get(model_key)
            .copied()
            .unwrap_or(self.default_behavior)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl InferenceBackend for MockInferenceBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<String, InferenceError> {
        let behavior = self.behavior_for(&request.model_key);
        self.state.lock().calls.push(request.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        match behavior {
            MockBehavior::Working => Ok(Self::render(&request.model_key, &request.text)),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(Self::render(&request.model_key, &request.text))
            }
            MockBehavior::Failing => Err(InferenceError::ApiError {
                status_code: 500,
                message: format!("Simulated failure of {}", request.model_key),
            }),
            MockBehavior::Empty => Err(InferenceError::EmptyOutput(request.model_key)),
        }
    }

    async fn test_connection(&self) -> Result<(), InferenceError> {
        match self.default_behavior {
            MockBehavior::Failing => Err(InferenceError::ConnectionError(
                "Simulated unreachable backend".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
