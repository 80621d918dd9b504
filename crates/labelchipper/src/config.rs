//! # Dataset Label Configs
//!
//! JSON description of a dataset's label set:
//!
//! ```json
//! {
//!   "labels": ["positive", "neutral", "negative"],
//!   "prompt_label_mapping": {"positive": "positiv", "negative": "negativ"},
//!   "first_label_token_mapping": {"positiv": "pos", "neutral": "neut", "negativ": "neg"}
//! }
//! ```
//!
//! * `prompt_label_mapping` maps canonical labels to their surface forms;
//!   labels without an entry are their own surface form.
//! * `first_label_token_mapping` is either an object (a first-token index,
//!   keyed by surface form) or a boolean (no index; prefix matching).

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    LCResult,
    LabelError,
    alloc::sync::Arc,
    extractor::{LabelExtractor, ResolverOptions},
    vocab::{FirstTokenIndex, FirstTokenMapping, LabelVocabulary},
};

/// The `first_label_token_mapping` field of a [`LabelConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FirstTokenMappingConfig {
    /// No index.
    Flag(bool),

    /// Surface form to first sub-token.
    Index(BTreeMap<String, String>),
}

impl Default for FirstTokenMappingConfig {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// A dataset's label configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// The canonical labels, in canonical order.
    pub labels: Vec<String>,

    /// Canonical label to surface form.
    #[serde(default)]
    pub prompt_label_mapping: BTreeMap<String, String>,

    /// The optional first-token index.
    #[serde(default)]
    pub first_label_token_mapping: FirstTokenMappingConfig,
}

impl LabelConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> LCResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> LCResult<Self> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Build the label vocabulary.
    ///
    /// ## Returns
    /// The vocabulary; or `LabelError::UnknownLabel` if the prompt mapping
    /// names a label not in `labels`, or any vocabulary construction error.
    pub fn build_vocab(&self) -> LCResult<LabelVocabulary> {
        let mut surface_forms: BTreeMap<String, &String> = self
            .prompt_label_mapping
            .iter()
            .map(|(label, surface_form)| (label.to_lowercase(), surface_form))
            .collect();

        let entries = self
            .labels
            .iter()
            .map(|label| {
                let surface_form = surface_forms
                    .remove(&label.to_lowercase())
                    .unwrap_or(label);
                (label.clone(), surface_form.clone())
            })
            .collect::<Vec<_>>();

        if let Some(unknown) = surface_forms.keys().next() {
            return Err(LabelError::UnknownLabel(unknown.clone()));
        }
        LabelVocabulary::new(entries)
    }

    /// Build the first-token mapping.
    pub fn first_token_mapping(&self) -> FirstTokenMapping {
        match &self.first_label_token_mapping {
            FirstTokenMappingConfig::Flag(_) => FirstTokenMapping::PrefixMatch,
            FirstTokenMappingConfig::Index(map) => FirstTokenMapping::Index(
                map.iter()
                    .map(|(k, v)| (k.as_str(), v.clone()))
                    .collect::<FirstTokenIndex>(),
            ),
        }
    }

    /// Build a [`LabelExtractor`] for this config.
    pub fn build_extractor(
        &self,
        options: ResolverOptions,
    ) -> LCResult<LabelExtractor> {
        let vocab = Arc::new(self.build_vocab()?);
        options.build(vocab, &self.first_token_mapping())
    }
}
