/*!
 * Pivot translation through an intermediate language.
 *
 * The chain is all-or-nothing: a failed first leg stops the chain, and no
 * intermediate text is ever reported as a result.
 */

use log::{debug, warn};
use std::sync::Arc;

use super::single::SingleEngineTranslator;
use crate::catalog::PivotStrategy;
use crate::errors::{PivotStage, RoutingError};
use crate::language_utils::LanguagePair;

#[derive(Debug, Clone)]
pub struct PivotTranslator {
    single: Arc<SingleEngineTranslator>,
}

impl PivotTranslator {
    pub fn new(single: Arc<SingleEngineTranslator>) -> Self {
        Self { single }
    }

    /// Translate `text` along `strategy.via_models`
    pub async fn translate_via_pivot(
        &self,
        text: &str,
        pair: &LanguagePair,
        strategy: &PivotStrategy,
    ) -> Result<String, RoutingError> {
        let resolver = self.single.catalog().resolver();
        let first_pair = pair.to_pivot(&strategy.pivot_language);
        let second_pair = pair.from_pivot(&strategy.pivot_language);

        let first_model = strategy.first_model();
        let intermediate = self
            .single
            .translate(
                text.trim(),
                first_model,
                &first_pair,
                resolver.override_for(&first_pair, first_model),
            )
            .await
            .map_err(|e| Self::leg_failed(PivotStage::FirstLeg, e))?;
        debug!("Pivot {} -> {} produced '{}'", first_pair, first_model, intermediate);

        let second_model = strategy.second_model();
        self.single
            .translate(
                intermediate.trim(),
                second_model,
                &second_pair,
                resolver.override_for(&second_pair, second_model),
            )
            .await
            .map_err(|e| Self::leg_failed(PivotStage::SecondLeg, e))
    }

    fn leg_failed(stage: PivotStage, error: RoutingError) -> RoutingError {
        warn!("Pivot {} failed: {}", stage, error);
        RoutingError::PivotFailed {
            stage,
            reason: error.to_string(),
        }
    }
}
