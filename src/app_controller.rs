use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::catalog::Catalog;
use crate::language_utils::LanguagePair;
use crate::providers::http::HttpInferenceBackend;
use crate::providers::serialized::SerializedBackend;
use crate::providers::InferenceBackend;
use crate::translation::{MultiEngineOrchestrator, SingleEngineTranslator, TranslationOutcome};

// @module: Application controller wiring the routing services together

/// Number of engines used for triple output
pub const TRIPLE_OUTPUT_ENGINES: usize = 3;

/// A list of texts to translate into a list of target languages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub source_language: String,
    pub target_languages: Vec<String>,
    pub texts: Vec<String>,
}

/// Result of one text along the default route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Translated { text: String, model: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub source_text: String,
    pub target_language: String,
    /// Uppercase pair label, e.g. `EN-FR`
    pub pair_label: String,
    pub outcome: RouteOutcome,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
    pub translated: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub key: String,
    pub path: String,
    pub family: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub id: String,
    pub name: String,
    pub confidence: f64,
    pub available_pairs: Vec<String>,
    pub unavailable_pairs: Vec<String>,
}

/// Snapshot of backend, model and engine health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub backend_reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_error: Option<String>,
    pub models: Vec<ModelStatus>,
    pub engines: Vec<EngineStatus>,
}

/// Main application controller
///
/// Owns every routing service, built once from a [`Config`].
#[derive(Debug, Clone)]
pub struct Controller {
    config: Config,
    catalog: Arc<Catalog>,
    backend: Arc<dyn InferenceBackend>,
    orchestrator: MultiEngineOrchestrator,
}

impl Controller {
    // @method: Create a controller talking to the configured HTTP backend
    pub fn with_config(config: Config) -> Result<Self> {
        let http = HttpInferenceBackend::new(&config.inference)
            .context("Failed to create inference backend")?;
        Self::with_backend(config, Arc::new(http))
    }

    /// Create a controller around an existing backend
    pub fn with_backend(config: Config, backend: Arc<dyn InferenceBackend>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let catalog = Arc::new(
            Catalog::from_config(&config.catalog, &config.model_cache_dir)
                .context("Failed to build model catalog")?,
        );

        let backend: Arc<dyn InferenceBackend> = if config.inference.serialize_per_model {
            Arc::new(SerializedBackend::new(backend))
        } else {
            backend
        };

        let single = Arc::new(
            SingleEngineTranslator::new(Arc::clone(&catalog), Arc::clone(&backend))
                .with_max_length(config.inference.max_length),
        );
        let orchestrator = MultiEngineOrchestrator::new(Arc::clone(&catalog), single);

        info!(
            "Loaded {} models, {} engines from {:?}",
            catalog.registry().models().len(),
            catalog.engines().engines().len(),
            config.model_cache_dir
        );

        Ok(Self {
            config,
            catalog,
            backend,
            orchestrator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn orchestrator(&self) -> &MultiEngineOrchestrator {
        &self.orchestrator
    }

    /// Engines that can currently serve the pair
    pub fn available_engines(&self, source_language: &str, target_language: &str) -> Vec<String> {
        self.catalog
            .available_engines(&LanguagePair::new(source_language, target_language))
    }

    pub async fn translate_multi_engine(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        engines: &[String],
    ) -> Vec<TranslationOutcome> {
        self.orchestrator
            .translate_multi_engine(text, source_language, target_language, engines)
            .await
    }

    /// Up to three engines in the pair's preferred order
    pub async fn translate_triple(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Vec<TranslationOutcome> {
        self.orchestrator
            .translate_preferred(text, source_language, target_language, TRIPLE_OUTPUT_ENGINES)
            .await
    }

    /// Translate every text into every target language along the default route
    ///
    /// A failing entry never aborts the rest of the batch.
    pub async fn translate_batch(&self, request: &BatchRequest) -> BatchReport {
        let mut entries = Vec::with_capacity(request.texts.len() * request.target_languages.len());

        for target_language in &request.target_languages {
            let pair = LanguagePair::new(&request.source_language, target_language);
            for text in &request.texts {
                let start = Instant::now();
                let result = self
                    .orchestrator
                    .translate_default(text, &request.source_language, target_language)
                    .await;

                let outcome = match result {
                    Ok(route) => RouteOutcome::Translated {
                        text: route.text,
                        model: route.model,
                    },
                    Err(e) => {
                        warn!("Batch entry failed for {}: {}", pair, e);
                        RouteOutcome::Failed { error: e.to_string() }
                    }
                };

                entries.push(BatchEntry {
                    source_text: text.clone(),
                    target_language: pair.target.clone(),
                    pair_label: pair.label(),
                    outcome,
                    latency_ms: start.elapsed().as_secs_f64() * 1000.0,
                });
            }
        }

        let translated = entries
            .iter()
            .filter(|e| matches!(e.outcome, RouteOutcome::Translated { .. }))
            .count();
        let failed = entries.len() - translated;
        info!("Batch finished: {} translated, {} failed", translated, failed);

        BatchReport {
            entries,
            translated,
            failed,
        }
    }

    /// Probe the backend and report model and engine availability
    pub async fn status(&self) -> ServiceStatus {
        let backend_error = match self.backend.test_connection().await {
            Ok(()) => None,
            Err(e) => {
                warn!("Inference backend is unreachable: {}", e);
                Some(e.to_string())
            }
        };

        let registry = self.catalog.registry();
        let models = registry
            .models()
            .iter()
            .map(|model| ModelStatus {
                key: model.key.clone(),
                path: registry
                    .path_for(&model.key)
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                family: model.family().to_string(),
                available: registry.is_available(&model.key),
            })
            .collect();

        let engines = self
            .catalog
            .engines()
            .engines()
            .iter()
            .map(|engine| {
                let (available_pairs, unavailable_pairs): (Vec<String>, Vec<String>) = engine
                    .supported_pairs
                    .iter()
                    .cloned()
                    .partition(|key| {
                        key.parse::<LanguagePair>()
                            .is_ok_and(|pair| engine.can_serve(&pair, registry))
                    });
                debug!("Engine {} serves {:?}", engine.id, available_pairs);
                EngineStatus {
                    id: engine.id.clone(),
                    name: engine.name.clone(),
                    confidence: engine.confidence,
                    available_pairs,
                    unavailable_pairs,
                }
            })
            .collect();

        ServiceStatus {
            backend_reachable: backend_error.is_none(),
            backend_error,
            models,
            engines,
        }
    }
}
