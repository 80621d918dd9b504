//! # First-Token Index
//!
//! When the tokenizer's decomposition of each label is known, the first
//! sub-token of each surface form can be matched exactly, rather than
//! prefix-matching the surface forms.

use crate::{
    LCResult,
    LabelError,
    types::{LCHashMap, hash_map_new},
    vocab::LabelVocabulary,
};

/// Map from lowercased surface forms to the first sub-token of their tokenization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FirstTokenIndex {
    map: LCHashMap<String, String>,
}

impl<S, T> FromIterator<(S, T)> for FirstTokenIndex
where
    S: AsRef<str>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (surface_form, token) in iter {
            index.insert(surface_form.as_ref(), token);
        }
        index
    }
}

impl FirstTokenIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { map: hash_map_new() }
    }

    /// Add an entry to the index.
    ///
    /// ## Arguments
    /// * `surface_form` - The label surface form; lowercased on insert.
    /// * `first_token` - The first sub-token of the surface form.
    pub fn insert(
        &mut self,
        surface_form: &str,
        first_token: impl Into<String>,
    ) {
        self.map
            .insert(surface_form.to_lowercase(), first_token.into());
    }

    /// Get the first token for a surface form; case-insensitive.
    pub fn get(
        &self,
        surface_form: &str,
    ) -> Option<&str> {
        self.map
            .get(&surface_form.to_lowercase())
            .map(String::as_str)
    }

    /// Get the number of entries in the index.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Check that the index covers every label in the vocabulary.
    ///
    /// ## Returns
    /// `LabelError::MissingFirstToken` for the first uncovered surface form.
    pub fn validate(
        &self,
        vocab: &LabelVocabulary,
    ) -> LCResult<()> {
        match vocab
            .lowercase_surface_forms()
            .find(|sf| !self.map.contains_key(*sf))
        {
            Some(missing) => Err(LabelError::MissingFirstToken {
                surface_form: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// How generated tokens are matched against label surface forms.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FirstTokenMapping {
    /// No tokenizer mapping; match surface-form prefixes.
    #[default]
    PrefixMatch,

    /// Match full surface forms, or their indexed first tokens, exactly.
    Index(FirstTokenIndex),
}

impl From<FirstTokenIndex> for FirstTokenMapping {
    fn from(index: FirstTokenIndex) -> Self {
        Self::Index(index)
    }
}

impl FirstTokenMapping {
    /// Get the index, if any.
    pub fn index(&self) -> Option<&FirstTokenIndex> {
        match self {
            Self::PrefixMatch => None,
            Self::Index(index) => Some(index),
        }
    }

    /// Check that the mapping is consistent with the vocabulary.
    pub fn validate(
        &self,
        vocab: &LabelVocabulary,
    ) -> LCResult<()> {
        match self {
            Self::PrefixMatch => Ok(()),
            Self::Index(index) => index.validate(vocab),
        }
    }
}
