use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use isolang::Language;
use serde::{Deserialize, Serialize};

/// Language utilities for the short codes used by the routing tables
///
/// The tables key language pairs by short lowercase codes such as `en`, `fr`
/// and `jp`. Callers may also send ISO 639-2 or WMT style codes (`eng`,
/// `fra`, `jpn`) which are folded onto the short form here.
/// Normalize a language code to the short form used for table lookups
pub fn normalize_code(code: &str) -> String {
    let normalized = code.trim().to_lowercase();
    match normalized.as_str() {
        "eng" => "en".to_string(),
        "fra" | "fre" => "fr".to_string(),
        "ja" | "jpn" => "jp".to_string(),
        _ => normalized,
    }
}

/// Get the English name of a language, used to build T5 prompts
pub fn language_name(code: &str) -> String {
    let normalized = normalize_code(code);
    match normalized.as_str() {
        "en" => return "English".to_string(),
        "fr" => return "French".to_string(),
        "jp" => return "Japanese".to_string(),
        _ => {}
    }

    let lang = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    // Unknown codes are passed through verbatim
    lang.map(|l| l.to_name().to_string())
        .unwrap_or_else(|| code.trim().to_string())
}

/// Get the NLLB-200 language tag for a language code
pub fn nllb_tag(code: &str) -> Option<&'static str> {
    match normalize_code(code).as_str() {
        "en" => Some("eng_Latn"),
        "fr" => Some("fra_Latn"),
        "jp" => Some("jpn_Jpan"),
        _ => None,
    }
}

/// Check whether a code designates Japanese
pub fn is_japanese(code: &str) -> bool {
    normalize_code(code) == "jp"
}

/// A directed source/target language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Normalized source code
    pub source: String,
    /// Normalized target code
    pub target: String,
}

impl LanguagePair {
    /// Create a pair, normalizing both codes
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: normalize_code(source),
            target: normalize_code(target),
        }
    }

    /// Lowercase lookup key, e.g. `en-fr`
    pub fn key(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }

    /// Uppercase pair label, e.g. `EN-FR`
    pub fn label(&self) -> String {
        self.key().to_uppercase()
    }

    /// The pair going from `source` into `pivot`
    pub fn to_pivot(&self, pivot: &str) -> Self {
        Self::new(&self.source, pivot)
    }

    /// The pair going from `pivot` into `target`
    pub fn from_pivot(&self, pivot: &str) -> Self {
        Self::new(pivot, &self.target)
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for LanguagePair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (source, target) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid language pair: {}", s))?;
        if source.trim().is_empty() || target.trim().is_empty() || target.contains('-') {
            return Err(anyhow!("Invalid language pair: {}", s));
        }
        Ok(Self::new(source, target))
    }
}
