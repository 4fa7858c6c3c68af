/*!
 * Translation routing.
 *
 * This module turns a text and a language pair into one or more model
 * translations. It is split into several submodules:
 *
 * - `single`: one model, one text, with family-specific invocation
 * - `pivot`: two-leg chains through an intermediate language
 * - `orchestrator`: concurrent multi-engine dispatch
 * - `outcome`: per-engine result records
 * - `formatting`: output clean-up for Japanese targets
 */

pub use self::orchestrator::{MultiEngineOrchestrator, RouteTranslation};
pub use self::outcome::{EngineFailure, EngineTranslation, TranslationOutcome};
pub use self::pivot::PivotTranslator;
pub use self::single::{FallbackTranslation, SingleEngineTranslator};

pub mod formatting;
pub mod orchestrator;
pub mod outcome;
pub mod pivot;
pub mod single;
