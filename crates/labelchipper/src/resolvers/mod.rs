//! # Label Resolvers
//!
//! Strategies for turning generation output into labels:
//! * [`LogprobLabelResolver`] - per-step ranked tokens, by prefix matching.
//! * [`EditDistanceLabelResolver`] - decoded text, by nearest surface form.

mod edit_distance;
mod label_resolver;
mod logprob;

#[doc(inline)]
pub use edit_distance::{EditDistanceLabelResolver, levenshtein_distance};
pub(crate) use label_resolver::check_sample_count;
#[doc(inline)]
pub use label_resolver::LabelResolver;
#[doc(inline)]
pub use logprob::{LogprobLabelResolver, StepMatch};
