use serde::{Deserialize, Serialize};

use crate::errors::RoutingError;

/// A successful engine translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineTranslation {
    /// Engine id
    pub engine: String,
    /// Translated text
    pub text: String,
    /// Static confidence declared by the engine
    pub confidence: f64,
    /// Wall-clock time of the engine call in milliseconds
    pub latency_ms: f64,
    /// Model key, or the pivot chain label
    pub model: String,
}

/// A failed engine translation, or a request-level diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineFailure {
    /// Engine id; absent for request-level failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Human readable message
    pub error: String,
    /// Structured cause
    #[serde(skip)]
    pub cause: Option<RoutingError>,
}

impl EngineFailure {
    pub fn new(engine: Option<&str>, cause: RoutingError) -> Self {
        Self {
            engine: engine.map(str::to_string),
            error: cause.to_string(),
            cause: Some(cause),
        }
    }
}

/// Per-engine result of a multi-engine request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationOutcome {
    Success(EngineTranslation),
    Failure(EngineFailure),
}

impl TranslationOutcome {
    pub fn failure(engine: Option<&str>, cause: RoutingError) -> Self {
        Self::Failure(EngineFailure::new(engine, cause))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn engine(&self) -> Option<&str> {
        match self {
            Self::Success(success) => Some(&success.engine),
            Self::Failure(failure) => failure.engine.as_deref(),
        }
    }

    pub fn as_success(&self) -> Option<&EngineTranslation> {
        match self {
            Self::Success(success) => Some(success),
            Self::Failure(_) => None,
        }
    }

    pub fn as_failure(&self) -> Option<&EngineFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
