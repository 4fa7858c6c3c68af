/*!
 * Built-in catalog: the models, pair routes and engines shipped by default.
 */

use std::collections::{BTreeMap, BTreeSet};

use super::engines::{EngineConfig, PivotStrategy};
use super::language_pairs::{DefaultRoute, LanguagePairRoute, PairCandidate};
use super::models::ModelDescriptor;

const ALL_PAIRS: [&str; 5] = ["en-fr", "fr-en", "en-jp", "jp-en", "jp-fr"];

fn pairs(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|key| key.to_string()).collect()
}

fn mapping(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(pair, model)| (pair.to_string(), model.to_string()))
        .collect()
}

pub fn default_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new("HELSINKI_EN_FR", "Helsinki-NLP_opus-mt-en-fr"),
        ModelDescriptor::new("HELSINKI_FR_EN", "Helsinki-NLP_opus-mt-fr-en"),
        ModelDescriptor::new("HELSINKI_EN_JP", "Helsinki-NLP_opus-mt-en-jap"),
        ModelDescriptor::new("OPUS_JA_EN", "opus-mt-ja-en"),
        ModelDescriptor::new("ELAN_JA_EN", "Mitsua/elan-mt-bt-ja-en"),
        ModelDescriptor::new("T5_MULTILINGUAL", "google-t5_t5-base"),
        ModelDescriptor::new("NLLB_200", "nllb-200-distilled-600M"),
    ]
}

pub fn default_language_pairs() -> Vec<LanguagePairRoute> {
    let direct = |model: &str| {
        Some(DefaultRoute::Direct {
            model: model.to_string(),
        })
    };

    vec![
        LanguagePairRoute {
            pair: "en-fr".to_string(),
            candidates: vec![
                PairCandidate::new("HELSINKI_EN_FR", None),
                PairCandidate::new("NLLB_200", Some("fra_Latn")),
                PairCandidate::new("T5_MULTILINGUAL", Some("translate English to French: ")),
            ],
            default: direct("HELSINKI_EN_FR"),
        },
        LanguagePairRoute {
            pair: "fr-en".to_string(),
            candidates: vec![
                PairCandidate::new("HELSINKI_FR_EN", None),
                PairCandidate::new("NLLB_200", Some("eng_Latn")),
                PairCandidate::new("T5_MULTILINGUAL", Some("translate French to English: ")),
            ],
            default: direct("HELSINKI_FR_EN"),
        },
        LanguagePairRoute {
            pair: "en-jp".to_string(),
            candidates: vec![
                PairCandidate::new("HELSINKI_EN_JP", None),
                PairCandidate::new("NLLB_200", Some("jpn_Jpan")),
                PairCandidate::new("T5_MULTILINGUAL", Some("translate English to Japanese: ")),
            ],
            default: direct("HELSINKI_EN_JP"),
        },
        LanguagePairRoute {
            pair: "jp-en".to_string(),
            candidates: vec![
                PairCandidate::new("OPUS_JA_EN", None),
                PairCandidate::new("ELAN_JA_EN", None),
                PairCandidate::new("NLLB_200", Some("eng_Latn")),
                PairCandidate::new("T5_MULTILINGUAL", Some("translate Japanese to English: ")),
            ],
            default: direct("ELAN_JA_EN"),
        },
        LanguagePairRoute {
            pair: "jp-fr".to_string(),
            candidates: vec![
                PairCandidate::new("NLLB_200", Some("fra_Latn")),
                PairCandidate::new("T5_MULTILINGUAL", Some("translate Japanese to French: ")),
            ],
            default: Some(DefaultRoute::Pivot {
                engine: "elan_quality".to_string(),
            }),
        },
    ]
}

pub fn default_engines() -> Vec<EngineConfig> {
    vec![
        EngineConfig {
            id: "opus_fast".to_string(),
            name: "Helsinki OPUS".to_string(),
            supported_pairs: pairs(&ALL_PAIRS),
            model_mapping: mapping(&[
                ("en-fr", "HELSINKI_EN_FR"),
                ("fr-en", "HELSINKI_FR_EN"),
                ("en-jp", "HELSINKI_EN_JP"),
                ("jp-en", "OPUS_JA_EN"),
            ]),
            pivot_strategy: Some(PivotStrategy {
                pivot_language: "en".to_string(),
                via_models: ["OPUS_JA_EN".to_string(), "HELSINKI_EN_FR".to_string()],
                applies_to: pairs(&["jp-fr"]),
            }),
            confidence: 0.80,
        },
        EngineConfig {
            id: "elan_quality".to_string(),
            name: "ELAN Specialist".to_string(),
            supported_pairs: pairs(&["jp-en", "jp-fr"]),
            model_mapping: mapping(&[("jp-en", "ELAN_JA_EN")]),
            pivot_strategy: Some(PivotStrategy {
                pivot_language: "en".to_string(),
                via_models: ["ELAN_JA_EN".to_string(), "HELSINKI_EN_FR".to_string()],
                applies_to: pairs(&["jp-fr"]),
            }),
            confidence: 0.90,
        },
        EngineConfig {
            id: "t5_versatile".to_string(),
            name: "mT5 Versatile".to_string(),
            supported_pairs: pairs(&ALL_PAIRS),
            model_mapping: ALL_PAIRS
                .iter()
                .map(|pair| (pair.to_string(), "T5_MULTILINGUAL".to_string()))
                .collect(),
            pivot_strategy: None,
            confidence: 0.85,
        },
        EngineConfig {
            id: "nllb_multilingual".to_string(),
            name: "NLLB Multilingual".to_string(),
            supported_pairs: pairs(&ALL_PAIRS),
            model_mapping: ALL_PAIRS
                .iter()
                .map(|pair| (pair.to_string(), "NLLB_200".to_string()))
                .collect(),
            pivot_strategy: None,
            confidence: 0.92,
        },
    ]
}

/// Preferred engine order per pair for triple-output requests
pub fn default_engine_preferences() -> BTreeMap<String, Vec<String>> {
    let order = |engines: &[&str]| engines.iter().map(|e| e.to_string()).collect::<Vec<_>>();
    let mut preferences = BTreeMap::new();
    preferences.insert(
        "en-jp".to_string(),
        order(&["opus_fast", "t5_versatile", "nllb_multilingual", "elan_quality"]),
    );
    preferences.insert(
        "jp-en".to_string(),
        order(&["opus_fast", "elan_quality", "t5_versatile", "nllb_multilingual"]),
    );
    preferences.insert(
        "en-fr".to_string(),
        order(&["opus_fast", "t5_versatile", "nllb_multilingual", "elan_quality"]),
    );
    preferences.insert(
        "fr-en".to_string(),
        order(&["opus_fast", "t5_versatile", "nllb_multilingual", "elan_quality"]),
    );
    preferences.insert(
        "jp-fr".to_string(),
        order(&["opus_fast", "elan_quality", "t5_versatile", "nllb_multilingual"]),
    );
    preferences
}
