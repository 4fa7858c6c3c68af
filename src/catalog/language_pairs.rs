/*!
 * Language-pair routes.
 *
 * Each route lists candidate models for one pair in fallback order, with the
 * tag or prompt prefix to use for that model on that pair.
 */

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::language_utils::LanguagePair;

/// One candidate model of a pair route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCandidate {
    /// Model key
    pub model: String,

    /// Pair specific tag (NLLB) or prompt prefix (T5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl PairCandidate {
    pub fn new(model: impl Into<String>, tag: Option<&str>) -> Self {
        Self {
            model: model.into(),
            tag: tag.map(str::to_string),
        }
    }
}

/// Route used by single-request translation when no engine is named
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultRoute {
    /// Translate with one model
    Direct { model: String },
    /// Use the pivot strategy of an engine
    Pivot { engine: String },
}

/// Candidates for one pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePairRoute {
    /// Pair key, `src-tgt`
    pub pair: String,

    /// Candidates in fallback order
    #[serde(default)]
    pub candidates: Vec<PairCandidate>,

    /// Single-request default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultRoute>,
}

/// Lookup of pair routes by normalized pair key
#[derive(Debug, Clone, Default)]
pub struct LanguagePairResolver {
    routes: HashMap<String, LanguagePairRoute>,
}

impl LanguagePairResolver {
    pub fn new(routes: Vec<LanguagePairRoute>) -> Self {
        let mut by_key = HashMap::with_capacity(routes.len());
        for route in routes {
            let key = route
                .pair
                .parse::<LanguagePair>()
                .map(|pair| pair.key())
                .unwrap_or_else(|_| route.pair.to_lowercase());
            by_key.entry(key).or_insert(route);
        }
        Self { routes: by_key }
    }

    pub fn route(&self, pair: &LanguagePair) -> Option<&LanguagePairRoute> {
        self.routes.get(&pair.key())
    }

    /// Candidate models for the pair in fallback order, possibly empty
    pub fn candidates_for(&self, pair: &LanguagePair) -> &[PairCandidate] {
        self.route(pair)
            .map(|route| route.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// Pair specific tag or prefix declared for `model`
    pub fn override_for(&self, pair: &LanguagePair, model: &str) -> Option<&str> {
        self.candidates_for(pair)
            .iter()
            .find(|candidate| candidate.model == model)
            .and_then(|candidate| candidate.tag.as_deref())
    }

    pub fn default_route(&self, pair: &LanguagePair) -> Option<&DefaultRoute> {
        self.route(pair).and_then(|route| route.default.as_ref())
    }
}
