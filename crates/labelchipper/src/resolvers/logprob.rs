//! # Logprob Label Resolver
//!
//! Resolves scored generations using only the tokens the model ranked,
//! without requiring the model to have generated a full label.
//!
//! For each decoding step, the ranked tokens are normalized and matched
//! against the normalized label surface forms (by prefix, or against a
//! [`FirstTokenIndex`](crate::vocab::FirstTokenIndex)):
//! * a single matching label resolves the sample;
//! * no matching label moves on to the next ranked token of the step;
//! * several matching labels at the first step are carried forward,
//!   and concatenated with the tokens of the next step;
//! * several matching labels at a later step force a deterministic pick.
//!
//! The first step is the first one with any non-empty normalized token;
//! leading whitespace or punctuation steps are skipped.
//!
//! Concatenation is restricted to the first step: later steps were
//! generated conditioned on the model's own greedy continuation, not on
//! the ambiguous candidate.
//!
//! Samples where no step resolves map to the vocabulary's default label.

use log::Level;

use crate::{
    LCResult,
    alloc::sync::Arc,
    diagnostics::DiagnosticLog,
    normalize::normalize_label_text,
    resolvers::LabelResolver,
    types::{LabelId, LogprobSample},
    vocab::{FirstTokenMapping, LabelVocabulary},
};

/// The result of matching one candidate text against the label set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepMatch {
    /// Exactly one label matches.
    Resolved(LabelId),

    /// More than one label matches; in canonical order.
    Ambiguous(Vec<LabelId>),

    /// No label matches.
    NoMatch,
}

#[derive(Debug, Clone)]
struct MatchTarget {
    /// The normalized surface form.
    text: String,

    /// The normalized first token, when matching against an index.
    first_token: Option<String>,
}

/// Resolves per-step ranked token candidates to labels.
#[derive(Debug, Clone)]
pub struct LogprobLabelResolver {
    vocab: Arc<LabelVocabulary>,
    targets: Vec<MatchTarget>,
    exact: bool,
}

impl LogprobLabelResolver {
    /// Create a new resolver.
    ///
    /// ## Arguments
    /// * `vocab` - The label vocabulary.
    /// * `mapping` - How tokens are matched against the surface forms.
    ///
    /// ## Returns
    /// The resolver, or `LabelError::MissingFirstToken` if the mapping's index
    /// does not cover the vocabulary.
    pub fn new(
        vocab: Arc<LabelVocabulary>,
        mapping: &FirstTokenMapping,
    ) -> LCResult<Self> {
        mapping.validate(&vocab)?;

        let index = mapping.index();
        let targets = vocab
            .lowercase_surface_forms()
            .map(|surface_form| MatchTarget {
                text: normalize_label_text(surface_form),
                first_token: index
                    .and_then(|index| index.get(surface_form))
                    .map(normalize_label_text),
            })
            .collect();

        Ok(Self {
            vocab,
            targets,
            exact: index.is_some(),
        })
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &Arc<LabelVocabulary> {
        &self.vocab
    }

    /// Match a (normalized) candidate text against the label set.
    ///
    /// ## Arguments
    /// * `candidate_text` - The accumulated text to match.
    ///
    /// ## Returns
    /// The matching labels.
    pub fn match_text(
        &self,
        candidate_text: &str,
    ) -> StepMatch {
        let mut matches: Vec<LabelId> = self
            .targets
            .iter()
            .enumerate()
            .filter(|(_, target)| self.target_matches(target, candidate_text))
            .map(|(id, _)| id)
            .collect();

        match matches.len() {
            0 => StepMatch::NoMatch,
            1 => StepMatch::Resolved(matches.swap_remove(0)),
            _ => StepMatch::Ambiguous(matches),
        }
    }

    fn target_matches(
        &self,
        target: &MatchTarget,
        candidate_text: &str,
    ) -> bool {
        if self.exact {
            target.text == candidate_text || target.first_token.as_deref() == Some(candidate_text)
        } else {
            target.text.starts_with(candidate_text)
        }
    }

    /// Pick one label from an ambiguous set.
    ///
    /// The lexicographically smallest normalized surface form wins;
    /// canonical order breaks any remaining tie.
    pub fn forced_pick(
        &self,
        ambiguous: &[LabelId],
    ) -> LabelId {
        ambiguous
            .iter()
            .copied()
            .min_by(|&a, &b| {
                self.targets[a]
                    .text
                    .cmp(&self.targets[b].text)
                    .then(a.cmp(&b))
            })
            .unwrap_or(self.vocab.default_label())
    }

    /// Scan the steps of a sample for a resolution.
    ///
    /// ## Returns
    /// `None` if no step resolves the sample.
    pub fn scan_sample(
        &self,
        sample: &LogprobSample,
        diagnostics: &DiagnosticLog,
    ) -> Option<LabelId> {
        let mut accumulator = String::new();
        // Steps with no non-empty tokens do not count as the first step.
        let mut first_step = true;

        for step in sample {
            let tokens = step
                .iter()
                .map(|(token, _logprob)| normalize_label_text(token))
                .filter(|token| !token.is_empty());

            let mut contributed = false;
            for token in tokens {
                contributed = true;
                let candidate_text = format!("{accumulator}{token}");

                match self.match_text(&candidate_text) {
                    StepMatch::Resolved(id) => return Some(id),
                    StepMatch::NoMatch => {
                        log::trace!(
                            "no candidate label for generated text {candidate_text:?}; ignored"
                        );
                    }
                    StepMatch::Ambiguous(ids) if first_step => {
                        log::trace!(
                            "generated text {candidate_text:?} matches {} labels; \
                             concatenating with the next step",
                            ids.len()
                        );
                        accumulator = candidate_text;
                        break;
                    }
                    StepMatch::Ambiguous(ids) => {
                        let pick = self.forced_pick(&ids);
                        diagnostics.log_once(
                            Level::Warn,
                            format!(
                                "Multiple candidate labels found for the generated label \
                                 {candidate_text:?}: {:?}. Since this is not the first \
                                 generated token, it cannot be concatenated with the next \
                                 one; using {:?} as the output label.",
                                self.surface_forms(&ids),
                                self.surface_form(pick),
                            ),
                        );
                        return Some(pick);
                    }
                }
            }
            if contributed {
                first_step = false;
            }
        }

        None
    }

    fn surface_form(
        &self,
        id: LabelId,
    ) -> &str {
        self.vocab.lowercase_surface_form(id).unwrap_or_default()
    }

    fn surface_forms(
        &self,
        ids: &[LabelId],
    ) -> Vec<&str> {
        ids.iter().map(|&id| self.surface_form(id)).collect()
    }
}

impl LabelResolver for LogprobLabelResolver {
    type Sample = LogprobSample;

    fn name(&self) -> &'static str {
        "LogprobLabelResolver"
    }

    fn resolve_sample(
        &self,
        sample: &Self::Sample,
        diagnostics: &DiagnosticLog,
    ) -> LabelId {
        if let Some(id) = self.scan_sample(sample, diagnostics) {
            return id;
        }

        let fallback = self.vocab.default_label();
        let message = if sample.is_empty() {
            format!(
                "The model outputted an empty string, so no candidate labels could be \
                 determined. Using {:?} as the output label.",
                self.surface_form(fallback)
            )
        } else {
            log::trace!("no candidate label in sample {sample:?}");
            format!(
                "Could not find a candidate label for any of the generated labels. \
                 Using {:?} as the output label.",
                self.surface_form(fallback)
            )
        };
        diagnostics.log_once(Level::Debug, message);

        fallback
    }
}
