/*!
 * Single-engine translation: one model, one text.
 *
 * The model family decides the invocation shape:
 * - prompted models get a `translate {SRC} to {TGT}: ` style prefix
 * - forced-target models get a target language tag
 * - sequence-to-sequence models get the text as is
 */

use log::{debug, error, info, warn};
use std::sync::Arc;

use super::formatting::detokenize_japanese;
use crate::catalog::{Catalog, ModelFamily};
use crate::errors::RoutingError;
use crate::language_utils::{LanguagePair, is_japanese, language_name, nllb_tag};
use crate::providers::{GenerationRequest, InferenceBackend};

/// Result of the best-effort path
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackTranslation {
    /// Translated text
    pub text: String,
    /// Candidate that produced it
    pub model: String,
    /// Candidates that failed before it, with their errors
    pub failed_attempts: Vec<(String, RoutingError)>,
}

/// Translates with one model through the inference backend
#[derive(Debug, Clone)]
pub struct SingleEngineTranslator {
    catalog: Arc<Catalog>,
    backend: Arc<dyn InferenceBackend>,
    max_length: u32,
}

impl SingleEngineTranslator {
    pub fn new(catalog: Arc<Catalog>, backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            catalog,
            backend,
            max_length: 512,
        }
    }

    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Build the generation request for `model_key` without running it
    pub fn prepare(
        &self,
        text: &str,
        model_key: &str,
        pair: &LanguagePair,
        tag_or_prefix: Option<&str>,
    ) -> Result<GenerationRequest, RoutingError> {
        let registry = self.catalog.registry();
        let path = registry.resolve_path(model_key)?;
        let descriptor = registry
            .descriptor(model_key)
            .ok_or_else(|| RoutingError::ModelNotFound(model_key.to_string()))?;

        let request = match descriptor.family() {
            ModelFamily::Prompted => {
                let prefix = tag_or_prefix
                    .or(descriptor.prompt_prefix.as_deref())
                    .map(str::to_string)
                    .unwrap_or_else(|| {
                        format!(
                            "translate {} to {}: ",
                            language_name(&pair.source),
                            language_name(&pair.target)
                        )
                    });
                debug!("Prompt for {}: '{}'", model_key, prefix);
                GenerationRequest::new(model_key, path, format!("{}{}", prefix, text))
            }
            ModelFamily::ForcedTarget => {
                let tag = tag_or_prefix
                    .or(descriptor.target_language_tag.as_deref())
                    .or_else(|| nllb_tag(&pair.target))
                    .filter(|tag| !tag.trim().is_empty())
                    .ok_or_else(|| RoutingError::MissingLanguageTag {
                        model: model_key.to_string(),
                        language: pair.target.clone(),
                    })?;
                GenerationRequest::new(model_key, path, text).forced_target_tag(tag)
            }
            ModelFamily::Seq2Seq => GenerationRequest::new(model_key, path, text),
        };

        Ok(request.max_length(self.max_length))
    }

    /// Translate `text` with one model
    pub async fn translate(
        &self,
        text: &str,
        model_key: &str,
        pair: &LanguagePair,
        tag_or_prefix: Option<&str>,
    ) -> Result<String, RoutingError> {
        let request = self.prepare(text, model_key, pair, tag_or_prefix)?;

        let output = self.backend.generate(request).await.map_err(|e| {
            warn!("Translation failed for model {}: {}", model_key, e);
            RoutingError::TranslationFailed {
                model: model_key.to_string(),
                reason: e.to_string(),
            }
        })?;

        if is_japanese(&pair.target) {
            Ok(detokenize_japanese(&output))
        } else {
            Ok(output)
        }
    }

    /// Try the pair's candidates in declaration order until one succeeds
    pub async fn translate_with_fallback(
        &self,
        text: &str,
        pair: &LanguagePair,
    ) -> Result<FallbackTranslation, RoutingError> {
        let mut failed_attempts = Vec::new();

        for candidate in self.catalog.resolver().candidates_for(pair) {
            info!("Attempting translation with {} for {}...", candidate.model, pair);
            match self
                .translate(text, &candidate.model, pair, candidate.tag.as_deref())
                .await
            {
                Ok(translated) => {
                    return Ok(FallbackTranslation {
                        text: translated,
                        model: candidate.model.clone(),
                        failed_attempts,
                    });
                }
                Err(e) => {
                    warn!("Translation with {} failed: {}", candidate.model, e);
                    failed_attempts.push((candidate.model.clone(), e));
                }
            }
        }

        let last_error = failed_attempts
            .last()
            .map(|(_, e)| e.to_string())
            .unwrap_or_else(|| "no candidate models configured".to_string());
        error!("All configured models failed for {}. No translation available.", pair);
        Err(RoutingError::AllModelsExhausted {
            pair: pair.key(),
            last_error,
        })
    }
}
