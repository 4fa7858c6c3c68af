/*!
 * Multi-engine orchestrator.
 *
 * Resolves which engines can serve a pair, dispatches all of them
 * concurrently and collects one outcome per engine. The output keeps the
 * order of the resolved engine list, not completion order.
 */

use futures::future::join_all;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::outcome::{EngineTranslation, TranslationOutcome};
use super::pivot::PivotTranslator;
use super::single::SingleEngineTranslator;
use crate::catalog::{Catalog, DefaultRoute, EngineConfig};
use crate::errors::RoutingError;
use crate::language_utils::LanguagePair;

/// Result of a single-request translation along the default route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTranslation {
    pub text: String,
    /// Model key or pivot chain label
    pub model: String,
    pub latency_ms: f64,
}

#[derive(Debug, Clone)]
pub struct MultiEngineOrchestrator {
    catalog: Arc<Catalog>,
    single: Arc<SingleEngineTranslator>,
    pivot: PivotTranslator,
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

impl MultiEngineOrchestrator {
    pub fn new(catalog: Arc<Catalog>, single: Arc<SingleEngineTranslator>) -> Self {
        let pivot = PivotTranslator::new(Arc::clone(&single));
        Self {
            catalog,
            single,
            pivot,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn single(&self) -> &SingleEngineTranslator {
        &self.single
    }

    pub fn pivot(&self) -> &PivotTranslator {
        &self.pivot
    }

    /// Requested engines that can serve the pair, in request order
    ///
    /// An empty request selects every available engine.
    pub fn resolve_engines(&self, pair: &LanguagePair, requested: &[String]) -> Result<Vec<String>, RoutingError> {
        let available = self.catalog.available_engines(pair);

        let valid: Vec<String> = if requested.is_empty() {
            available.clone()
        } else {
            let mut seen = HashSet::new();
            requested
                .iter()
                .map(|engine| engine.trim())
                .filter(|engine| seen.insert(*engine))
                .filter(|engine| available.iter().any(|a| a == engine))
                .map(str::to_string)
                .collect()
        };

        if valid.is_empty() {
            return Err(RoutingError::NoValidEngines {
                pair: pair.key(),
                requested: requested.to_vec(),
                available,
            });
        }
        Ok(valid)
    }

    /// Produce text and model label for one engine
    async fn run_engine(
        &self,
        text: &str,
        pair: &LanguagePair,
        engine: &EngineConfig,
    ) -> Result<(String, String), RoutingError> {
        match engine.pivot_strategy.as_ref().filter(|s| s.applies_to_pair(pair)) {
            Some(strategy) => {
                let translated = self.pivot.translate_via_pivot(text, pair, strategy).await?;
                Ok((translated, strategy.model_label()))
            }
            None => {
                let model = engine.direct_model(pair).ok_or_else(|| RoutingError::NoModelMapping {
                    engine: engine.id.clone(),
                    pair: pair.key(),
                })?;
                let tag = self.catalog.resolver().override_for(pair, model);
                let translated = self.single.translate(text, model, pair, tag).await?;
                Ok((translated, model.to_string()))
            }
        }
    }

    /// Translate with one engine; failures are returned as an outcome
    pub async fn translate_with_engine(&self, text: &str, pair: &LanguagePair, engine_id: &str) -> TranslationOutcome {
        let engine = match self.catalog.engines().engine_for(engine_id) {
            Ok(engine) => engine,
            Err(e) => return TranslationOutcome::failure(Some(engine_id), e),
        };

        debug!("Dispatching {} for {}", engine_id, pair);
        let start = Instant::now();
        match self.run_engine(text.trim(), pair, engine).await {
            Ok((translated, model)) => TranslationOutcome::Success(EngineTranslation {
                engine: engine.id.clone(),
                text: translated,
                confidence: engine.confidence,
                latency_ms: elapsed_ms(start),
                model,
            }),
            Err(e) => {
                warn!("Engine {} failed for {}: {}", engine_id, pair, e);
                TranslationOutcome::failure(Some(engine_id), e)
            }
        }
    }

    /// Translate with every valid engine concurrently
    pub async fn translate_multi_engine(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        requested: &[String],
    ) -> Vec<TranslationOutcome> {
        let pair = LanguagePair::new(source_language, target_language);
        let request_id = Uuid::new_v4();

        let valid = match self.resolve_engines(&pair, requested) {
            Ok(valid) => valid,
            Err(e) => {
                warn!("[{}] {}", request_id, e);
                return vec![TranslationOutcome::failure(None, e)];
            }
        };

        info!("[{}] Translating {} with engines: {}", request_id, pair, valid.join(", "));
        let tasks = valid
            .iter()
            .map(|engine_id| self.translate_with_engine(text, &pair, engine_id));
        let outcomes = join_all(tasks).await;

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            "[{}] {} of {} engines succeeded for {}",
            request_id,
            succeeded,
            outcomes.len(),
            pair
        );
        outcomes
    }

    /// Translate with up to `limit` available engines in the pair's preferred order
    pub async fn translate_preferred(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        limit: usize,
    ) -> Vec<TranslationOutcome> {
        let pair = LanguagePair::new(source_language, target_language);
        match self
            .catalog
            .engines()
            .preferred_engines(&pair, self.catalog.registry(), limit)
        {
            Ok(engines) => {
                self.translate_multi_engine(text, source_language, target_language, &engines)
                    .await
            }
            Err(e) => vec![TranslationOutcome::failure(None, e)],
        }
    }

    /// Translate along the pair's default route, or best effort when it has none
    pub async fn translate_default(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<RouteTranslation, RoutingError> {
        let pair = LanguagePair::new(source_language, target_language);
        let text = text.trim();
        let start = Instant::now();

        let (translated, model) = match self.catalog.resolver().default_route(&pair) {
            Some(DefaultRoute::Direct { model }) => {
                let tag = self.catalog.resolver().override_for(&pair, model);
                let translated = self.single.translate(text, model, &pair, tag).await?;
                (translated, model.clone())
            }
            Some(DefaultRoute::Pivot { engine }) => {
                let engine = self.catalog.engines().engine_for(engine)?;
                let strategy = engine
                    .pivot_strategy
                    .as_ref()
                    .filter(|s| s.applies_to_pair(&pair))
                    .ok_or_else(|| RoutingError::NoModelMapping {
                        engine: engine.id.clone(),
                        pair: pair.key(),
                    })?;
                let translated = self.pivot.translate_via_pivot(text, &pair, strategy).await?;
                (translated, strategy.model_label())
            }
            None => {
                let fallback = self.single.translate_with_fallback(text, &pair).await?;
                (fallback.text, fallback.model)
            }
        };

        Ok(RouteTranslation {
            text: translated,
            model,
            latency_ms: elapsed_ms(start),
        })
    }
}
