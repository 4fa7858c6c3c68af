/*!
 * Tests for the single-engine translator and the best-effort path
 */

use anyhow::Result;
use mtroute::errors::RoutingError;
use mtroute::language_utils::LanguagePair;
use mtroute::providers::mock::{MockBehavior, MockInferenceBackend};

use crate::common::{self, ModelFixture};

#[test]
fn test_prepare_withSeq2SeqModel_shouldPassTextUnchanged() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;

    let request = translator.prepare("Hello", "HELSINKI_EN_FR", &LanguagePair::new("en", "fr"), None)?;
    assert_eq!(request.text, "Hello");
    assert_eq!(request.forced_target_tag, None);
    assert_eq!(request.model_path, fixture.root().join("Helsinki-NLP_opus-mt-en-fr"));
    assert_eq!(request.max_length, 512);
    Ok(())
}

#[test]
fn test_prepare_withPromptedModel_shouldPrependPrefix() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;
    let en_fr = LanguagePair::new("en", "fr");

    let request = translator.prepare("Hello", "T5_MULTILINGUAL", &en_fr, Some("translate English to French: "))?;
    assert_eq!(request.text, "translate English to French: Hello");

    // Without an override the prefix is built from the language names
    let request = translator.prepare("Hello", "T5_MULTILINGUAL", &LanguagePair::new("en", "de"), None)?;
    assert_eq!(request.text, "translate English to German: Hello");
    Ok(())
}

#[test]
fn test_prepare_withForcedTargetModel_shouldResolveTag() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;

    let request = translator.prepare("Hello", "NLLB_200", &LanguagePair::new("en", "jp"), Some("jpn_Jpan"))?;
    assert_eq!(request.forced_target_tag.as_deref(), Some("jpn_Jpan"));
    assert_eq!(request.text, "Hello");

    let request = translator.prepare("Bonjour", "NLLB_200", &LanguagePair::new("fr", "en"), None)?;
    assert_eq!(request.forced_target_tag.as_deref(), Some("eng_Latn"));
    Ok(())
}

#[test]
fn test_prepare_withForcedTargetModelAndUnknownTarget_shouldReturnMissingLanguageTag() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;

    let result = translator.prepare("Hello", "NLLB_200", &LanguagePair::new("en", "de"), None);
    assert_eq!(
        result.err(),
        Some(RoutingError::MissingLanguageTag {
            model: "NLLB_200".to_string(),
            language: "de".to_string(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_translate_withMissingModelFiles_shouldReturnModelNotFoundWithoutCallingBackend() -> Result<()> {
    let fixture = ModelFixture::without(&["HELSINKI_EN_FR"])?;
    let backend = MockInferenceBackend::working();
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate("Hello", "HELSINKI_EN_FR", &LanguagePair::new("en", "fr"), None)
        .await;
    assert_eq!(result, Err(RoutingError::ModelNotFound("HELSINKI_EN_FR".to_string())));
    assert_eq!(backend.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_translate_withFailingBackend_shouldReturnTranslationFailed() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::failing();
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate("Hello", "HELSINKI_EN_FR", &LanguagePair::new("en", "fr"), None)
        .await;
    match result {
        Err(RoutingError::TranslationFailed { model, reason }) => {
            assert_eq!(model, "HELSINKI_EN_FR");
            assert!(reason.contains("Simulated failure"));
        }
        other => panic!("Expected TranslationFailed, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_translate_withEmptyOutput_shouldReturnTranslationFailed() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::new(MockBehavior::Empty);
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate("Hello", "HELSINKI_EN_FR", &LanguagePair::new("en", "fr"), None)
        .await;
    assert!(matches!(result, Err(RoutingError::TranslationFailed { .. })));
    Ok(())
}

#[tokio::test]
async fn test_translate_withJapaneseTarget_shouldDetokenizeOutput() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;

    let text = translator
        .translate("こ ん に ち は", "HELSINKI_EN_JP", &LanguagePair::new("en", "jp"), None)
        .await?;
    assert_eq!(text, "[HELSINKI_EN_JP] こんにちは");
    Ok(())
}

#[tokio::test]
async fn test_translateWithFallback_withFirstCandidateFailing_shouldUseNext() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::working().with_model("HELSINKI_EN_FR", MockBehavior::Failing);
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate_with_fallback("Hello", &LanguagePair::new("en", "fr"))
        .await?;
    assert_eq!(result.model, "NLLB_200");
    assert_eq!(result.text, "[NLLB_200] Hello");
    assert_eq!(result.failed_attempts.len(), 1);
    assert_eq!(result.failed_attempts[0].0, "HELSINKI_EN_FR");

    // The candidate's tag override is applied
    let nllb_calls = backend.calls_for("NLLB_200");
    assert_eq!(nllb_calls[0].forced_target_tag.as_deref(), Some("fra_Latn"));
    Ok(())
}

#[tokio::test]
async fn test_translateWithFallback_withMissingFirstModel_shouldSkipIt() -> Result<()> {
    let fixture = ModelFixture::without(&["HELSINKI_EN_FR", "NLLB_200"])?;
    let backend = MockInferenceBackend::working();
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate_with_fallback("Hello", &LanguagePair::new("en", "fr"))
        .await?;
    assert_eq!(result.model, "T5_MULTILINGUAL");
    assert_eq!(result.text, "[T5_MULTILINGUAL] translate English to French: Hello");
    assert_eq!(backend.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_translateWithFallback_withAllCandidatesFailing_shouldReturnAllModelsExhausted() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let backend = MockInferenceBackend::failing();
    let translator = common::single_translator(&fixture, &backend)?;

    let result = translator
        .translate_with_fallback("Hello", &LanguagePair::new("en", "fr"))
        .await;
    match result {
        Err(RoutingError::AllModelsExhausted { pair, last_error }) => {
            assert_eq!(pair, "en-fr");
            assert!(last_error.contains("T5_MULTILINGUAL"));
        }
        other => panic!("Expected AllModelsExhausted, got {:?}", other),
    }
    assert_eq!(backend.call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_translateWithFallback_withNoCandidates_shouldReturnAllModelsExhausted() -> Result<()> {
    let fixture = ModelFixture::new()?;
    let translator = common::single_translator(&fixture, &MockInferenceBackend::working())?;

    let result = translator
        .translate_with_fallback("Hallo", &LanguagePair::new("de", "en"))
        .await;
    assert!(matches!(result, Err(RoutingError::AllModelsExhausted { .. })));
    Ok(())
}
