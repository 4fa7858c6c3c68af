/*!
 * Engine configuration table.
 *
 * An engine is a caller-selectable translation strategy: a set of supported
 * pairs, a direct model per pair, an optional pivot chain and a declared
 * confidence score.
 */

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::models::ModelRegistry;
use crate::errors::RoutingError;
use crate::language_utils::LanguagePair;

/// Two-model chain through an intermediate language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotStrategy {
    /// Intermediate language code
    pub pivot_language: String,

    /// Source-to-pivot model, then pivot-to-target model
    pub via_models: [String; 2],

    /// Pair keys routed through the pivot
    pub applies_to: BTreeSet<String>,
}

impl PivotStrategy {
    pub fn first_model(&self) -> &str {
        &self.via_models[0]
    }

    pub fn second_model(&self) -> &str {
        &self.via_models[1]
    }

    pub fn applies_to_pair(&self, pair: &LanguagePair) -> bool {
        self.applies_to.contains(&pair.key())
    }

    /// Label reported for results produced by this chain
    pub fn model_label(&self) -> String {
        format!("{} + {} (Pivot)", self.first_model(), self.second_model())
    }
}

/// Declaration of one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine id, e.g. `opus_fast`
    pub id: String,

    /// Human readable name
    pub name: String,

    /// Pair keys the engine advertises
    pub supported_pairs: BTreeSet<String>,

    /// Direct model key per pair key
    #[serde(default)]
    pub model_mapping: BTreeMap<String, String>,

    /// Optional pivot chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_strategy: Option<PivotStrategy>,

    /// Static confidence in [0, 1]
    pub confidence: f64,
}

impl EngineConfig {
    pub fn supports(&self, pair: &LanguagePair) -> bool {
        self.supported_pairs.contains(&pair.key())
    }

    pub fn direct_model(&self, pair: &LanguagePair) -> Option<&str> {
        self.model_mapping.get(&pair.key()).map(String::as_str)
    }

    /// True iff a pivot strategy exists and covers the pair
    pub fn is_pivot_required(&self, pair: &LanguagePair) -> bool {
        self.pivot_strategy
            .as_ref()
            .is_some_and(|strategy| strategy.applies_to_pair(pair))
    }

    /// Whether the models this engine needs for `pair` are all present
    pub fn can_serve(&self, pair: &LanguagePair, registry: &ModelRegistry) -> bool {
        if !self.supports(pair) {
            return false;
        }
        match &self.pivot_strategy {
            Some(strategy) if strategy.applies_to_pair(pair) => {
                registry.is_available(strategy.first_model())
                    && registry.is_available(strategy.second_model())
            }
            _ => self
                .direct_model(pair)
                .is_some_and(|model| registry.is_available(model)),
        }
    }

    /// Label of the model(s) that serve the pair
    pub fn model_label(&self, pair: &LanguagePair) -> Option<String> {
        match &self.pivot_strategy {
            Some(strategy) if strategy.applies_to_pair(pair) => Some(strategy.model_label()),
            _ => self.direct_model(pair).map(str::to_string),
        }
    }
}

/// Engines in declaration order
#[derive(Debug, Clone, Default)]
pub struct EngineTable {
    engines: Vec<EngineConfig>,
    preferences: BTreeMap<String, Vec<String>>,
}

impl EngineTable {
    pub fn new(engines: Vec<EngineConfig>, preferences: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            engines,
            preferences,
        }
    }

    pub fn engines(&self) -> &[EngineConfig] {
        &self.engines
    }

    pub fn engine_ids(&self) -> Vec<String> {
        self.engines.iter().map(|engine| engine.id.clone()).collect()
    }

    pub fn engine_for(&self, engine_id: &str) -> Result<&EngineConfig, RoutingError> {
        self.engines
            .iter()
            .find(|engine| engine.id == engine_id)
            .ok_or_else(|| RoutingError::UnknownEngine(engine_id.to_string()))
    }

    /// Engines able to produce output for the pair right now
    pub fn available_engines(&self, pair: &LanguagePair, registry: &ModelRegistry) -> Vec<String> {
        self.engines
            .iter()
            .filter(|engine| engine.can_serve(pair, registry))
            .map(|engine| engine.id.clone())
            .collect()
    }

    /// Available engines ordered by the pair's preference list, truncated to `limit`
    pub fn preferred_engines(
        &self,
        pair: &LanguagePair,
        registry: &ModelRegistry,
        limit: usize,
    ) -> Result<Vec<String>, RoutingError> {
        let available = self.available_engines(pair, registry);
        let preference = self
            .preferences
            .get(&pair.key())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut ranked: Vec<(usize, usize, String)> = available
            .iter()
            .enumerate()
            .map(|(position, engine)| {
                let rank = preference
                    .iter()
                    .position(|preferred| preferred == engine)
                    .unwrap_or(usize::MAX);
                (rank, position, engine.clone())
            })
            .collect();
        ranked.sort();

        let selected: Vec<String> = ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, engine)| engine)
            .collect();

        if selected.is_empty() {
            return Err(RoutingError::NoValidEngines {
                pair: pair.key(),
                requested: preference.to_vec(),
                available,
            });
        }
        Ok(selected)
    }
}
