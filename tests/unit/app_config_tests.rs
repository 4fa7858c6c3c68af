/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use mtroute::app_config::{Config, LogLevel, MODEL_CACHE_DIR_ENV};
use mtroute::catalog::CatalogConfig;
use mtroute::errors::ConfigError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaultConfig_shouldCarryBuiltInCatalog() {
    let config = Config::default();
    assert_eq!(config.catalog.models.len(), 7);
    assert_eq!(config.catalog.engines.len(), 4);
    assert_eq!(config.catalog.language_pairs.len(), 5);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.inference.endpoint, "http://localhost:8008");
    assert!(config.validate().is_ok());
}

#[test]
fn test_fromFile_withMissingFile_shouldReturnIoError() {
    let dir = TempDir::new().unwrap();
    let result = Config::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_fromFile_withCustomEngineTable_shouldLoadIt() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{
            "model_cache_dir": "/srv/models",
            "catalog": {
                "models": [{ "key": "HELSINKI_EN_FR", "path": "opus-mt-en-fr" }],
                "language_pairs": [],
                "engines": [{
                    "id": "solo",
                    "name": "Solo",
                    "supported_pairs": ["en-fr"],
                    "model_mapping": { "en-fr": "HELSINKI_EN_FR" },
                    "confidence": 0.5
                }],
                "engine_preferences": {}
            }
        }"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.model_cache_dir, PathBuf::from("/srv/models"));
    assert_eq!(config.catalog.engines[0].id, "solo");
    assert!(config.catalog.engines[0].pivot_strategy.is_none());
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_validate_withConfidenceOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.catalog.engines[0].confidence = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_withUndeclaredCandidateModel_shouldFail() {
    let mut config = Config::default();
    config.catalog.language_pairs[0].candidates[0].model = "GHOST".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnknownModelReference { .. })
    ));
}

#[test]
fn test_validate_withPairRoutedDirectAndByPivot_shouldFail() {
    let mut catalog = CatalogConfig::default();
    let opus = catalog.engines.iter_mut().find(|e| e.id == "opus_fast").unwrap();
    opus.model_mapping
        .insert("jp-fr".to_string(), "OPUS_JA_EN".to_string());
    assert!(matches!(catalog.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_withNonCanonicalPairKey_shouldFail() {
    let mut catalog = CatalogConfig::default();
    catalog.language_pairs[0].pair = "EN-FR".to_string();
    assert!(matches!(catalog.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_validate_withSupportedPairWithoutModel_shouldFail() {
    let mut catalog = CatalogConfig::default();
    let t5 = catalog.engines.iter_mut().find(|e| e.id == "t5_versatile").unwrap();
    t5.model_mapping.remove("en-fr");
    assert!(matches!(catalog.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_applyEnvOverrides_shouldReplaceModelCacheDir() {
    let mut config = Config::default();
    // SAFETY: this is the only test touching this variable
    unsafe { std::env::set_var(MODEL_CACHE_DIR_ENV, "/tmp/mtroute-models") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var(MODEL_CACHE_DIR_ENV) };
    assert_eq!(config.model_cache_dir, PathBuf::from("/tmp/mtroute-models"));
}
