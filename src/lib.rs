/*!
 * # mtroute - multi-engine machine translation routing
 *
 * A Rust library that routes translation requests across a catalog of local
 * neural translation models.
 *
 * ## Features
 *
 * - Fixed registry of model keys resolved against a model cache directory
 * - Per-pair candidate models with language tag and prompt overrides
 * - Engines backed by a direct model or a two-leg pivot chain
 * - Concurrent multi-engine dispatch with per-engine failure isolation
 * - Default-route and best-effort single-request translation
 * - Startup validation of every routing table
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: Model registry, language-pair resolver and engine table
 * - `translation`: Routing and translation:
 *   - `translation::single`: One model, one text
 *   - `translation::pivot`: Chains through an intermediate language
 *   - `translation::orchestrator`: Multi-engine dispatch
 * - `providers`: Inference backends (HTTP, mock, per-model serialization)
 * - `app_controller`: Main application controller
 * - `language_utils`: Language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use catalog::{Catalog, CatalogConfig};
pub use errors::{AppError, ConfigError, InferenceError, RoutingError};
pub use language_utils::LanguagePair;
pub use providers::InferenceBackend;
pub use translation::{MultiEngineOrchestrator, TranslationOutcome};
