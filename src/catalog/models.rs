/*!
 * Model registry.
 *
 * Maps model keys such as `HELSINKI_EN_FR` to a path below the model cache
 * directory, together with the invocation family of the model.
 */

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::RoutingError;

/// How a model has to be invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// T5 style: a textual task prefix is prepended to the input
    Prompted,
    /// NLLB style: the first generated token is forced to a language tag
    ForcedTarget,
    /// Marian/OPUS/ELAN style: plain encode, generate, decode
    Seq2Seq,
}

impl ModelFamily {
    /// Derive the family from the naming convention of a model key
    pub fn from_key(key: &str) -> Self {
        let key = key.to_uppercase();
        if key.starts_with("T5") || key.starts_with("MT5") {
            Self::Prompted
        } else if key.starts_with("NLLB") {
            Self::ForcedTarget
        } else {
            Self::Seq2Seq
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Prompted => "prompted generation",
            Self::ForcedTarget => "forced-target generation",
            Self::Seq2Seq => "sequence-to-sequence",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A registered model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model key
    pub key: String,

    /// Directory (relative to the model cache dir) or hub id
    pub path: String,

    /// Default task prefix for prompted models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,

    /// Default target tag for forced-target models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language_tag: Option<String>,

    /// Explicit family; derived from the key when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<ModelFamily>,
}

impl ModelDescriptor {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            prompt_prefix: None,
            target_language_tag: None,
            family: None,
        }
    }

    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = Some(prefix.into());
        self
    }

    pub fn with_target_language_tag(mut self, tag: impl Into<String>) -> Self {
        self.target_language_tag = Some(tag.into());
        self
    }

    /// Invocation family of this model
    pub fn family(&self) -> ModelFamily {
        self.family.unwrap_or_else(|| ModelFamily::from_key(&self.key))
    }
}

/// Read-only lookup of model descriptors and their files
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    root: PathBuf,
    models: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Build a registry; the first declaration of a key wins
    pub fn new(root: impl Into<PathBuf>, models: Vec<ModelDescriptor>) -> Self {
        let mut index = HashMap::with_capacity(models.len());
        for (position, model) in models.iter().enumerate() {
            index.entry(model.key.clone()).or_insert(position);
        }
        Self {
            root: root.into(),
            models,
            index,
        }
    }

    /// Model cache directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All descriptors in declaration order
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Whether the key is declared, regardless of its files
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn descriptor(&self, key: &str) -> Option<&ModelDescriptor> {
        self.index.get(key).map(|&position| &self.models[position])
    }

    /// Location of the model files, whether or not they exist
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.descriptor(key).map(|model| self.root.join(&model.path))
    }

    /// Resolve a model key to an existing path
    pub fn resolve_path(&self, key: &str) -> Result<PathBuf, RoutingError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| RoutingError::ModelNotFound(key.to_string()))?;
        if !path.exists() {
            debug!("Model '{}' declared but missing at {:?}", key, path);
            return Err(RoutingError::ModelNotFound(key.to_string()));
        }
        Ok(path)
    }

    /// Whether the model is declared and present on disk
    pub fn is_available(&self, key: &str) -> bool {
        self.resolve_path(key).is_ok()
    }
}
