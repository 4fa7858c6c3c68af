/*!
 * Error types for the mtroute application.
 *
 * This module contains custom error types for the different layers of the
 * routing service, using the thiserror crate for ergonomic error definitions.
 * Routing failures are plain values so that one engine's failure can be
 * stored next to another engine's success.
 */

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling the inference layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// The request could not be sent or completed
    #[error("Inference request failed: {0}")]
    RequestFailed(String),

    /// The inference server answered with something we could not decode
    #[error("Failed to parse inference response: {0}")]
    ParseError(String),

    /// Error returned by the inference server itself
    #[error("Inference server responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the server
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The model produced no text
    #[error("Model returned empty output: {0}")]
    EmptyOutput(String),

    /// The model cannot be loaded by the inference layer
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Which leg of a pivot chain failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PivotStage {
    /// Source language into the pivot language
    FirstLeg,
    /// Pivot language into the target language
    SecondLeg,
}

impl PivotStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstLeg => "first-leg",
            Self::SecondLeg => "second-leg",
        }
    }
}

impl fmt::Display for PivotStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while resolving and executing a translation route
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// Model key is not registered or its backing path is absent
    #[error("Model '{0}' not found or its files are missing")]
    ModelNotFound(String),

    /// Engine id is not part of the engine table
    #[error("Unknown engine: {0}")]
    UnknownEngine(String),

    /// A tag-forcing model has no tag for the requested target language
    #[error("Model '{model}' requires a target language tag, none found for '{language}'")]
    MissingLanguageTag {
        /// Model key
        model: String,
        /// Requested target language
        language: String,
    },

    /// The inference call itself failed
    #[error("Translation failed with model '{model}': {reason}")]
    TranslationFailed {
        /// Model key
        model: String,
        /// Underlying failure
        reason: String,
    },

    /// One leg of a pivot chain failed
    #[error("Pivot translation failed at {stage}: {reason}")]
    PivotFailed {
        /// Failing leg
        stage: PivotStage,
        /// Underlying failure
        reason: String,
    },

    /// Every candidate model of the best-effort path failed
    #[error("All models exhausted for {pair}: {last_error}")]
    AllModelsExhausted {
        /// Pair key, e.g. `en-fr`
        pair: String,
        /// Message of the last candidate failure
        last_error: String,
    },

    /// None of the requested engines can serve the pair
    #[error(
        "No valid engines were selected or available for {pair}. Requested: [{}]. Available: [{}]",
        .requested.join(", "),
        .available.join(", ")
    )]
    NoValidEngines {
        /// Pair key
        pair: String,
        /// Engines the caller asked for
        requested: Vec<String>,
        /// Engines that can serve the pair
        available: Vec<String>,
    },

    /// The engine supports the pair but declares no model for it
    #[error("No model mapping found for engine '{engine}' and pair '{pair}'")]
    NoModelMapping {
        /// Engine id
        engine: String,
        /// Pair key
        pair: String,
    },
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A structural rule of the catalog is violated
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// An engine, pair route or default route names an undeclared model
    #[error("{owner} references undeclared model '{model}'")]
    UnknownModelReference {
        /// Where the reference was found
        owner: String,
        /// The missing model key
        model: String,
    },

    /// Reading or writing the configuration file failed
    #[error("Configuration file error: {0}")]
    Io(String),

    /// The configuration file is not valid JSON for this schema
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the inference layer
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    /// Error from routing
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// Error from configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
