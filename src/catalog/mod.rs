/*!
 * Routing catalog: model registry, language-pair routes and engine table.
 *
 * - `models`: model keys, paths and invocation families
 * - `language_pairs`: ordered candidate models per pair
 * - `engines`: engine declarations, pivot strategies and availability
 * - `defaults`: the built-in tables
 *
 * A `Catalog` is validated once when it is built and is read-only afterwards,
 * so it can be shared behind an `Arc` by any number of concurrent requests.
 */

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::language_utils::LanguagePair;

pub mod defaults;
pub mod engines;
pub mod language_pairs;
pub mod models;

pub use self::engines::{EngineConfig, EngineTable, PivotStrategy};
pub use self::language_pairs::{DefaultRoute, LanguagePairResolver, LanguagePairRoute, PairCandidate};
pub use self::models::{ModelDescriptor, ModelFamily, ModelRegistry};

/// Serializable form of the routing tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Registered models
    #[serde(default = "defaults::default_models")]
    pub models: Vec<ModelDescriptor>,

    /// Candidate models per pair
    #[serde(default = "defaults::default_language_pairs")]
    pub language_pairs: Vec<LanguagePairRoute>,

    /// Engines in availability order
    #[serde(default = "defaults::default_engines")]
    pub engines: Vec<EngineConfig>,

    /// Preferred engine order per pair key
    #[serde(default = "defaults::default_engine_preferences")]
    pub engine_preferences: BTreeMap<String, Vec<String>>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            models: defaults::default_models(),
            language_pairs: defaults::default_language_pairs(),
            engines: defaults::default_engines(),
            engine_preferences: defaults::default_engine_preferences(),
        }
    }
}

fn parse_pair(owner: &str, key: &str) -> Result<LanguagePair, ConfigError> {
    let pair: LanguagePair = key
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} has malformed pair key '{}'", owner, key)))?;
    if pair.key() != key {
        return Err(ConfigError::Invalid(format!(
            "{} pair key '{}' must be written as '{}'",
            owner,
            key,
            pair.key()
        )));
    }
    Ok(pair)
}

impl CatalogConfig {
    /// Check the structural rules of the tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut declared = HashSet::new();
        for model in &self.models {
            if model.key.trim().is_empty() || model.path.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "model '{}' needs a non-empty key and path",
                    model.key
                )));
            }
            if !declared.insert(model.key.as_str()) {
                return Err(ConfigError::Invalid(format!("model '{}' declared twice", model.key)));
            }
            let family = model.family();
            if model.prompt_prefix.is_some() && family != ModelFamily::Prompted {
                return Err(ConfigError::Invalid(format!(
                    "model '{}' is {} and cannot carry a prompt prefix",
                    model.key, family
                )));
            }
            if model.target_language_tag.is_some() && family != ModelFamily::ForcedTarget {
                return Err(ConfigError::Invalid(format!(
                    "model '{}' is {} and cannot carry a target language tag",
                    model.key, family
                )));
            }
        }

        let check_model = |owner: String, model: &str| {
            if declared.contains(model) {
                Ok(())
            } else {
                Err(ConfigError::UnknownModelReference {
                    owner,
                    model: model.to_string(),
                })
            }
        };

        let mut engine_ids = HashSet::new();
        for engine in &self.engines {
            let owner = format!("engine '{}'", engine.id);
            if !engine_ids.insert(engine.id.as_str()) {
                return Err(ConfigError::Invalid(format!("{} declared twice", owner)));
            }
            if !(0.0..=1.0).contains(&engine.confidence) {
                return Err(ConfigError::Invalid(format!(
                    "{} confidence {} is outside [0, 1]",
                    owner, engine.confidence
                )));
            }
            for (pair_key, model) in &engine.model_mapping {
                parse_pair(&owner, pair_key)?;
                check_model(owner.clone(), model)?;
            }
            if let Some(strategy) = &engine.pivot_strategy {
                for model in &strategy.via_models {
                    check_model(format!("{} pivot strategy", engine.id), model)?;
                }
                for pair_key in &strategy.applies_to {
                    parse_pair(&owner, pair_key)?;
                    if engine.model_mapping.contains_key(pair_key) {
                        return Err(ConfigError::Invalid(format!(
                            "{} routes '{}' both directly and through its pivot",
                            owner, pair_key
                        )));
                    }
                }
            }
            for pair_key in &engine.supported_pairs {
                let pair = parse_pair(&owner, pair_key)?;
                if engine.direct_model(&pair).is_none() && !engine.is_pivot_required(&pair) {
                    return Err(ConfigError::Invalid(format!(
                        "{} supports '{}' without a model mapping or pivot",
                        owner, pair_key
                    )));
                }
            }
        }

        for route in &self.language_pairs {
            let owner = format!("language pair '{}'", route.pair);
            let pair = parse_pair(&owner, &route.pair)?;
            for candidate in &route.candidates {
                check_model(owner.clone(), &candidate.model)?;
            }
            match &route.default {
                Some(DefaultRoute::Direct { model }) => check_model(owner.clone(), model)?,
                Some(DefaultRoute::Pivot { engine }) => {
                    let pivots = self
                        .engines
                        .iter()
                        .find(|e| &e.id == engine)
                        .is_some_and(|e| e.is_pivot_required(&pair));
                    if !pivots {
                        return Err(ConfigError::Invalid(format!(
                            "{} defaults to engine '{}' which has no pivot for it",
                            owner, engine
                        )));
                    }
                }
                None => {}
            }
        }

        for (pair_key, engines) in &self.engine_preferences {
            parse_pair("engine preferences", pair_key)?;
            if let Some(unknown) = engines.iter().find(|e| !engine_ids.contains(e.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "engine preferences for '{}' name unknown engine '{}'",
                    pair_key, unknown
                )));
            }
        }

        Ok(())
    }
}

/// Validated, immutable routing tables
#[derive(Debug, Clone)]
pub struct Catalog {
    registry: ModelRegistry,
    resolver: LanguagePairResolver,
    engines: EngineTable,
}

impl Catalog {
    /// Validate `config` and build the lookup structures
    pub fn from_config(config: &CatalogConfig, model_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        config.validate()?;

        let catalog = Self {
            registry: ModelRegistry::new(model_root, config.models.clone()),
            resolver: LanguagePairResolver::new(config.language_pairs.clone()),
            engines: EngineTable::new(config.engines.clone(), config.engine_preferences.clone()),
        };

        for key in catalog.missing_models() {
            warn!(
                "Model '{}' has no files at {:?}; engines depending on it are unavailable",
                key,
                catalog.registry.path_for(&key).unwrap_or_default()
            );
        }

        Ok(catalog)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &LanguagePairResolver {
        &self.resolver
    }

    pub fn engines(&self) -> &EngineTable {
        &self.engines
    }

    /// Engines able to serve the pair with the models present on disk
    pub fn available_engines(&self, pair: &LanguagePair) -> Vec<String> {
        self.engines.available_engines(pair, &self.registry)
    }

    /// Declared models whose files are absent
    pub fn missing_models(&self) -> Vec<String> {
        self.registry
            .models()
            .iter()
            .filter(|model| !self.registry.is_available(&model.key))
            .map(|model| model.key.clone())
            .collect()
    }
}
