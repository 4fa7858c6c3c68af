/*!
 * Integration tests for the application controller
 */

use anyhow::Result;
use mtroute::app_controller::{BatchRequest, RouteOutcome};
use mtroute::providers::mock::{MockBehavior, MockInferenceBackend};
use mtroute::Controller;

use crate::common::{self, ModelFixture};

#[test]
fn test_withBackend_withInvalidCatalog_shouldFail() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let mut config = fixture.config();
    config.catalog.engines[0].confidence = -0.1;
    let backend = std::sync::Arc::new(MockInferenceBackend::working());
    assert!(Controller::with_backend(config, backend).is_err());
    Ok(())
}

#[test]
fn test_withConfig_shouldBuildHttpBackedController() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = Controller::with_config(fixture.config())?;
    assert_eq!(
        controller.available_engines("en", "fr"),
        common::engines(&["opus_fast", "t5_versatile", "nllb_multilingual"])
    );
    Ok(())
}

#[test]
fn test_translateMultiEngine_fromSyncContext_shouldComplete() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = tokio_test::block_on(controller.translate_multi_engine(
        "Bonjour",
        "fr",
        "en",
        &common::engines(&["opus_fast"]),
    ));
    assert_eq!(outcomes[0].as_success().map(|s| s.model.as_str()), Some("HELSINKI_FR_EN"));
    Ok(())
}

#[tokio::test]
async fn test_translateBatch_shouldTranslateEveryTextIntoEveryTarget() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let report = controller
        .translate_batch(&BatchRequest {
            source_language: "jp".to_string(),
            target_languages: vec!["en".to_string(), "fr".to_string()],
            texts: vec!["こんにちは".to_string(), "ありがとう".to_string()],
        })
        .await;

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.translated, 4);
    assert_eq!(report.failed, 0);

    let labels: Vec<&str> = report.entries.iter().map(|e| e.pair_label.as_str()).collect();
    assert_eq!(labels, vec!["JP-EN", "JP-EN", "JP-FR", "JP-FR"]);
    assert_eq!(
        report.entries[2].outcome,
        RouteOutcome::Translated {
            text: "[HELSINKI_EN_FR] [ELAN_JA_EN] こんにちは".to_string(),
            model: "ELAN_JA_EN + HELSINKI_EN_FR (Pivot)".to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_translateBatch_withFailingModel_shouldContinueBatch() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::working().with_model("HELSINKI_EN_FR", MockBehavior::Failing);
    let controller = common::controller(&fixture, &backend)?;

    let report = controller
        .translate_batch(&BatchRequest {
            source_language: "en".to_string(),
            target_languages: vec!["fr".to_string(), "jp".to_string()],
            texts: vec!["Hello".to_string()],
        })
        .await;

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.failed, 1);
    assert!(matches!(report.entries[0].outcome, RouteOutcome::Failed { .. }));
    assert!(matches!(report.entries[1].outcome, RouteOutcome::Translated { .. }));
    Ok(())
}

#[tokio::test]
async fn test_translateTriple_shouldReturnThreeOutcomes() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = controller.translate_triple("Hello", "en", "jp").await;
    let engines: Vec<Option<&str>> = outcomes.iter().map(|o| o.engine()).collect();
    assert_eq!(
        engines,
        vec![Some("opus_fast"), Some("t5_versatile"), Some("nllb_multilingual")]
    );
    Ok(())
}

#[tokio::test]
async fn test_status_shouldReportModelsAndEngines() -> Result<()> {
    let fixture = ModelFixture::without(&["HELSINKI_EN_FR"])?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let status = controller.status().await;
    assert!(status.backend_reachable);
    assert_eq!(status.backend_error, None);
    assert_eq!(status.models.len(), 7);

    let en_fr = status.models.iter().find(|m| m.key == "HELSINKI_EN_FR").unwrap();
    assert!(!en_fr.available);
    assert!(status.models.iter().filter(|m| m.key != "HELSINKI_EN_FR").all(|m| m.available));

    let elan = status.engines.iter().find(|e| e.id == "elan_quality").unwrap();
    assert_eq!(elan.available_pairs, vec!["jp-en".to_string()]);
    assert_eq!(elan.unavailable_pairs, vec!["jp-fr".to_string()]);

    let opus = status.engines.iter().find(|e| e.id == "opus_fast").unwrap();
    assert!(opus.unavailable_pairs.contains(&"en-fr".to_string()));
    assert!(opus.unavailable_pairs.contains(&"jp-fr".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_status_withUnreachableBackend_shouldReportError() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::failing())?;

    let status = controller.status().await;
    assert!(!status.backend_reachable);
    assert!(status.backend_error.is_some());
    Ok(())
}
