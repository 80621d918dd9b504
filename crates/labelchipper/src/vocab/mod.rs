//! # Label Vocabularies
//!
//! The read-only label tables shared by every resolver:
//! * [`LabelVocabulary`] - canonical labels and their surface forms.
//! * [`FirstTokenMapping`] - optional first-sub-token index for exact matching.

mod first_token;
mod label_vocab;

#[doc(inline)]
pub use first_token::{FirstTokenIndex, FirstTokenMapping};
#[doc(inline)]
pub use label_vocab::LabelVocabulary;
