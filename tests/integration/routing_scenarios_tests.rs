/*!
 * End-to-end routing scenarios through the controller
 */

use anyhow::Result;
use mtroute::providers::mock::{MockBehavior, MockInferenceBackend};

use crate::common::{self, ModelFixture};

#[tokio::test]
async fn test_directEngine_enFr_shouldReportModelAndConfidence() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = controller
        .translate_multi_engine("Hello", "en", "fr", &common::engines(&["opus_fast"]))
        .await;

    assert_eq!(outcomes.len(), 1);
    let success = outcomes[0].as_success().expect("opus_fast should succeed");
    assert_eq!(success.engine, "opus_fast");
    assert_eq!(success.model, "HELSINKI_EN_FR");
    assert_eq!(success.text, "[HELSINKI_EN_FR] Hello");
    assert_eq!(success.confidence, 0.80);
    assert!(success.latency_ms >= 0.0);
    Ok(())
}

#[tokio::test]
async fn test_pivotEngine_jpFr_shouldChainElanThroughHelsinki() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::working();
    let controller = common::controller(&fixture, &backend)?;

    let outcomes = controller
        .translate_multi_engine("Hello", "jp", "fr", &common::engines(&["elan_quality"]))
        .await;

    assert_eq!(outcomes.len(), 1);
    let success = outcomes[0].as_success().expect("elan_quality should succeed");
    assert_eq!(success.model, "ELAN_JA_EN + HELSINKI_EN_FR (Pivot)");
    let intermediate = MockInferenceBackend::render("ELAN_JA_EN", "Hello");
    assert_eq!(success.text, MockInferenceBackend::render("HELSINKI_EN_FR", &intermediate));
    assert_eq!(success.confidence, 0.90);
    Ok(())
}

#[tokio::test]
async fn test_pivotEngine_withFirstLegFailing_shouldNotCallSecondModel() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::working().with_model("ELAN_JA_EN", MockBehavior::Failing);
    let controller = common::controller(&fixture, &backend)?;

    let outcomes = controller
        .translate_multi_engine("Hello", "jp", "fr", &common::engines(&["elan_quality"]))
        .await;

    assert_eq!(outcomes.len(), 1);
    let failure = outcomes[0].as_failure().expect("pivot should fail");
    assert!(failure.error.contains("first-leg"));
    assert!(backend.calls_for("HELSINKI_EN_FR").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_requestedEngines_withMissingModel_shouldExcludeUnavailableEngine() -> Result<()> {
    let fixture = ModelFixture::without(&["HELSINKI_EN_JP"])?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = controller
        .translate_multi_engine(
            "Hello",
            "en",
            "jp",
            &common::engines(&["opus_fast", "t5_versatile"]),
        )
        .await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].engine(), Some("t5_versatile"));
    assert!(outcomes[0].is_success());
    Ok(())
}

#[tokio::test]
async fn test_noRequestedEngines_enFr_shouldUseEveryAvailableEngine() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = controller.translate_multi_engine("Hello", "en", "fr", &[]).await;

    let engines: Vec<Option<&str>> = outcomes.iter().map(|o| o.engine()).collect();
    assert_eq!(
        engines,
        vec![Some("opus_fast"), Some("t5_versatile"), Some("nllb_multilingual")]
    );
    assert!(outcomes.iter().all(|o| o.is_success()));

    let t5 = outcomes[1].as_success().unwrap();
    assert_eq!(t5.text, "[T5_MULTILINGUAL] translate English to French: Hello");
    Ok(())
}

#[tokio::test]
async fn test_japaneseTarget_shouldDetokenizeEveryEngine() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let controller = common::controller(&fixture, &MockInferenceBackend::working())?;

    let outcomes = controller
        .translate_multi_engine("猫 が 好き です", "en", "jp", &common::engines(&["nllb_multilingual"]))
        .await;
    let success = outcomes[0].as_success().unwrap();
    assert_eq!(success.text, "[NLLB_200] 猫が好きです");
    Ok(())
}
