//! # `labelchipper` Label Resolution for Generative Benchmarks
//!
//! Generative models answer classification prompts with free-form text.
//! `labelchipper` resolves that output to exactly one label from a closed,
//! ordered label vocabulary, so it can be scored like a classifier.
//!
//! See:
//! * [`vocab`] for label vocabularies and first-token indexes.
//! * [`resolvers`] for the logprob and edit-distance resolution strategies.
//! * [`LabelExtractor`] to dispatch generation batches to a resolver.
//! * [`metrics`] to score resolved labels against references.
//!
//! ## Resolution
//!
//! When the model output carries ranked per-step token log-probabilities,
//! labels are resolved by greedy prefix matching over the ranked tokens;
//! see [`resolvers::LogprobLabelResolver`]. Otherwise, each decoded
//! sequence resolves to the surface form at the smallest edit distance;
//! see [`resolvers::EditDistanceLabelResolver`].
//!
//! Unparseable generations resolve to the vocabulary's first label, and are
//! reported once per distinct message through a [`DiagnosticLog`].
//!
//! ## Crate Features
#![doc = document_features::document_features!()]
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use labelchipper::{
//!     DiagnosticLog,
//!     GenerationOutput,
//!     LabelExtractor,
//!     vocab::{FirstTokenMapping, LabelVocabulary},
//! };
//!
//! let vocab = Arc::new(LabelVocabulary::new([("yes", "ja"), ("no", "nej")])?);
//! let extractor = LabelExtractor::new(vocab, &FirstTokenMapping::PrefixMatch)?;
//! let diagnostics = DiagnosticLog::new();
//!
//! let output = GenerationOutput::scored(
//!     vec!["Ja".to_string()],
//!     vec![vec![vec![("J".to_string(), -0.05), ("N".to_string(), -3.1)]]],
//! )?;
//! assert_eq!(extractor.extract_labels(&output, &diagnostics)?, vec![0]);
//!
//! let output = GenerationOutput::text_only(["nejj"]);
//! assert_eq!(extractor.extract_label_names(&output, &diagnostics)?, vec!["nej"]);
//! # Ok::<(), labelchipper::LabelError>(())
//! ```
#![warn(missing_docs, unused)]

extern crate alloc;

#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(feature = "config")]
pub mod config;

pub mod diagnostics;
pub mod errors;
pub mod extractor;
pub mod generation;
pub mod metrics;
pub mod normalize;
pub mod resolvers;
pub mod types;
pub mod vocab;

#[cfg(feature = "config")]
#[doc(inline)]
pub use config::LabelConfig;
#[doc(inline)]
pub use diagnostics::DiagnosticLog;
#[doc(inline)]
pub use errors::{LCResult, LabelError};
#[doc(inline)]
pub use extractor::{LabelExtractor, ResolverOptions};
#[doc(inline)]
pub use generation::GenerationOutput;
#[doc(inline)]
pub use types::{LabelId, LogprobSample};
