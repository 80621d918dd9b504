//! # Label Vocabulary

use crate::{
    LCResult,
    LabelError,
    types::{LCHashMap, LabelId, hash_map_new},
};

/// A single vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LabelEntry {
    /// The canonical label name.
    label: String,

    /// The prompt-rendered surface form.
    surface_form: String,

    /// The lowercased surface form.
    lowercase_surface_form: String,
}

/// The closed, ordered set of canonical labels for a dataset,
/// and their (localized, prompt-rendered) surface forms.
///
/// Each canonical label has exactly one surface form; surface forms
/// are unique under case-insensitive comparison.
///
/// [`LabelId`]s are indices into the canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVocabulary {
    entries: Vec<LabelEntry>,
    label_index: LCHashMap<String, LabelId>,
    surface_index: LCHashMap<String, LabelId>,
}

impl LabelVocabulary {
    /// Build a vocabulary from `(label, surface_form)` pairs in canonical order.
    ///
    /// ## Arguments
    /// * `entries` - The labels and their surface forms.
    ///
    /// ## Returns
    /// A new `LabelVocabulary`, or an error if the vocabulary is empty,
    /// a label repeats, or two surface forms collide after lowercasing.
    pub fn new<I, L, S>(entries: I) -> LCResult<Self>
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: Into<String>,
    {
        let mut vocab = Self {
            entries: Vec::new(),
            label_index: hash_map_new(),
            surface_index: hash_map_new(),
        };
        for (label, surface_form) in entries {
            vocab.push(label.into(), surface_form.into())?;
        }

        if vocab.entries.is_empty() {
            return Err(LabelError::EmptyVocabulary);
        }
        Ok(vocab)
    }

    /// Build a vocabulary where each label is its own surface form.
    pub fn from_labels<I, L>(labels: I) -> LCResult<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(labels.into_iter().map(|l| {
            let l: String = l.into();
            (l.clone(), l)
        }))
    }

    fn push(
        &mut self,
        label: String,
        surface_form: String,
    ) -> LCResult<()> {
        let id = self.entries.len();

        let label_key = label.to_lowercase();
        if self.label_index.contains_key(&label_key) {
            return Err(LabelError::DuplicateLabel(label));
        }

        let lowercase_surface_form = surface_form.to_lowercase();
        if let Some(&other) = self.surface_index.get(&lowercase_surface_form) {
            return Err(LabelError::DuplicateSurfaceForm {
                first: self.entries[other].label.clone(),
                second: label,
                surface_form: lowercase_surface_form,
            });
        }

        self.label_index.insert(label_key, id);
        self.surface_index.insert(lowercase_surface_form.clone(), id);
        self.entries.push(LabelEntry {
            label,
            surface_form,
            lowercase_surface_form,
        });
        Ok(())
    }

    /// Get the number of labels in the vocabulary.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the vocabulary is empty.
    ///
    /// Construction rejects empty vocabularies, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The label used when a generation cannot be resolved.
    ///
    /// This is the first label in canonical order.
    pub fn default_label(&self) -> LabelId {
        0
    }

    /// Get the canonical name of a label.
    pub fn label(
        &self,
        id: LabelId,
    ) -> Option<&str> {
        self.entries.get(id).map(|e| e.label.as_str())
    }

    /// Get the surface form of a label.
    pub fn surface_form(
        &self,
        id: LabelId,
    ) -> Option<&str> {
        self.entries.get(id).map(|e| e.surface_form.as_str())
    }

    /// Get the lowercased surface form of a label.
    pub fn lowercase_surface_form(
        &self,
        id: LabelId,
    ) -> Option<&str> {
        self.entries
            .get(id)
            .map(|e| e.lowercase_surface_form.as_str())
    }

    /// Look up a label by canonical name; case-insensitive.
    pub fn lookup_label(
        &self,
        label: &str,
    ) -> Option<LabelId> {
        self.label_index.get(&label.to_lowercase()).copied()
    }

    /// Look up a label by surface form; case-insensitive.
    pub fn lookup_surface_form(
        &self,
        surface_form: &str,
    ) -> Option<LabelId> {
        self.surface_index
            .get(&surface_form.to_lowercase())
            .copied()
    }

    /// Iterate over `(id, label, surface_form)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &str, &str)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, e)| (id, e.label.as_str(), e.surface_form.as_str()))
    }

    /// Iterate over the lowercased surface forms in canonical order.
    pub fn lowercase_surface_forms(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .map(|e| e.lowercase_surface_form.as_str())
    }
}
