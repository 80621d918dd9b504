//! # Label Extraction
//!
//! [`LabelExtractor`] dispatches each batch of generation output to the
//! logprob resolver when per-step scores are present, and to the
//! edit-distance resolver otherwise.

use crate::{
    LCResult,
    alloc::sync::Arc,
    diagnostics::DiagnosticLog,
    generation::GenerationOutput,
    resolvers::{
        EditDistanceLabelResolver,
        LabelResolver,
        LogprobLabelResolver,
        check_sample_count,
    },
    types::{LabelId, LogprobSample},
    vocab::{FirstTokenMapping, LabelVocabulary},
};

/// Options for configuring a [`LabelExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolverOptions {
    /// Should batches be resolved in parallel?
    ///
    /// Enabling parallelism will request a threaded implementation.
    pub parallel: bool,
}

impl ResolverOptions {
    /// Gets the configured parallelism value.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Sets the configured parallelism value.
    ///
    /// Enabling parallelism will request a threaded implementation.
    pub fn set_parallel(
        &mut self,
        parallel: bool,
    ) {
        self.parallel = parallel;
    }

    /// Sets the configured parallelism value.
    ///
    /// Enabling parallelism will request a threaded implementation.
    pub fn with_parallel(
        mut self,
        parallel: bool,
    ) -> Self {
        self.set_parallel(parallel);
        self
    }

    /// Build a [`LabelExtractor`] for the given vocab.
    ///
    /// ## Arguments
    /// * `vocab` - The label vocabulary.
    /// * `mapping` - How generated tokens are matched against surface forms.
    ///
    /// ## Returns
    /// The extractor, or `LabelError::MissingFirstToken` if the mapping
    /// is inconsistent with the vocabulary.
    pub fn build(
        &self,
        vocab: Arc<LabelVocabulary>,
        mapping: &FirstTokenMapping,
    ) -> LCResult<LabelExtractor> {
        let logprob = LogprobLabelResolver::new(vocab.clone(), mapping)?;
        let edit = EditDistanceLabelResolver::new(vocab.clone());

        #[allow(unused_mut)]
        let mut logprob: Arc<dyn LabelResolver<Sample = LogprobSample>> = Arc::new(logprob);
        #[allow(unused_mut)]
        let mut edit: Arc<dyn LabelResolver<Sample = String>> = Arc::new(edit);

        #[cfg(feature = "rayon")]
        if self.parallel {
            use crate::rayon::ParallelRayonResolver;
            logprob = Arc::new(ParallelRayonResolver::new(logprob));
            edit = Arc::new(ParallelRayonResolver::new(edit));
        }

        Ok(LabelExtractor {
            vocab,
            logprob,
            edit,
        })
    }
}

/// Routes generation output to the matching resolver.
#[derive(Clone)]
pub struct LabelExtractor {
    vocab: Arc<LabelVocabulary>,
    logprob: Arc<dyn LabelResolver<Sample = LogprobSample>>,
    edit: Arc<dyn LabelResolver<Sample = String>>,
}

impl core::fmt::Debug for LabelExtractor {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("LabelExtractor")
            .field("vocab", &self.vocab)
            .field("logprob", &self.logprob.name())
            .field("edit", &self.edit.name())
            .finish()
    }
}

impl LabelExtractor {
    /// Build a sequential extractor.
    ///
    /// See [`ResolverOptions::build`].
    pub fn new(
        vocab: Arc<LabelVocabulary>,
        mapping: &FirstTokenMapping,
    ) -> LCResult<Self> {
        ResolverOptions::default().build(vocab, mapping)
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &Arc<LabelVocabulary> {
        &self.vocab
    }

    /// Resolve every sample of a batch to a label.
    ///
    /// ## Arguments
    /// * `output` - The generation output for the batch.
    /// * `diagnostics` - The deduplicating diagnostic sink.
    ///
    /// ## Returns
    /// One label per sample, in input order; or
    /// `LabelError::SampleCountMismatch` if the output is malformed.
    pub fn extract_labels(
        &self,
        output: &GenerationOutput,
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<LabelId>> {
        output.validate()?;

        match output {
            GenerationOutput::Scored { scores, .. } => {
                self.logprob.resolve_batch(scores, diagnostics)
            }
            GenerationOutput::TextOnly { sequences } => {
                self.edit.resolve_batch(sequences, diagnostics)
            }
        }
    }

    /// Resolve a batch which must hold exactly `expected` samples.
    ///
    /// ## Arguments
    /// * `output` - The generation output for the batch.
    /// * `expected` - The batch's expected sample count.
    /// * `diagnostics` - The deduplicating diagnostic sink.
    ///
    /// ## Returns
    /// One label per sample, in input order; or
    /// `LabelError::SampleCountMismatch` if the output does not hold
    /// `expected` samples.
    pub fn extract_batch_labels(
        &self,
        output: &GenerationOutput,
        expected: usize,
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<LabelId>> {
        check_sample_count("LabelExtractor", expected, output.len())?;
        self.extract_labels(output, diagnostics)
    }

    /// Resolve every sample of a batch to a label surface form.
    ///
    /// See [`extract_labels`](Self::extract_labels).
    pub fn extract_label_names(
        &self,
        output: &GenerationOutput,
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<String>> {
        Ok(self
            .extract_labels(output, diagnostics)?
            .into_iter()
            .map(|id| {
                self.vocab
                    .surface_form(id)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        LabelError,
        types::{check_is_send, check_is_sync},
        vocab::FirstTokenIndex,
    };

    fn yes_no() -> Arc<LabelVocabulary> {
        Arc::new(LabelVocabulary::new([("yes", "Ja"), ("no", "Nej")]).unwrap())
    }

    #[test]
    fn test_dispatch_on_scores() {
        let extractor = LabelExtractor::new(yes_no(), &FirstTokenMapping::PrefixMatch).unwrap();
        check_is_send(&extractor);
        check_is_sync(&extractor);
        let diagnostics = DiagnosticLog::new();

        // The sequences disagree with the scores; the scores win.
        let scored = GenerationOutput::scored(
            vec!["Ja".to_string(), "Ja".to_string()],
            vec![
                vec![vec![("N".to_string(), -0.2), ("J".to_string(), -1.2)]],
                vec![vec![("j".to_string(), -0.1)]],
            ],
        )
        .unwrap();
        assert_eq!(
            extractor.extract_labels(&scored, &diagnostics).unwrap(),
            vec![1, 0]
        );

        let text = GenerationOutput::text_only(["nej tak", "JA", "jaa"]);
        assert_eq!(
            extractor.extract_labels(&text, &diagnostics).unwrap(),
            vec![1, 0, 0]
        );
        assert_eq!(
            extractor.extract_label_names(&text, &diagnostics).unwrap(),
            vec!["Nej", "Ja", "Ja"]
        );
    }

    #[test]
    fn test_malformed_output() {
        let extractor = LabelExtractor::new(yes_no(), &FirstTokenMapping::PrefixMatch).unwrap();
        let diagnostics = DiagnosticLog::new();

        let bad = GenerationOutput::Scored {
            sequences: vec!["ja".to_string()],
            scores: vec![],
        };
        assert!(matches!(
            extractor.extract_labels(&bad, &diagnostics),
            Err(LabelError::SampleCountMismatch { .. })
        ));
    }

    #[test]
    fn test_expected_batch_size() {
        let extractor = LabelExtractor::new(yes_no(), &FirstTokenMapping::PrefixMatch).unwrap();
        let diagnostics = DiagnosticLog::new();

        let text = GenerationOutput::text_only(["ja", "nej"]);
        assert_eq!(
            extractor
                .extract_batch_labels(&text, 2, &diagnostics)
                .unwrap(),
            vec![0, 1]
        );
        match extractor.extract_batch_labels(&text, 3, &diagnostics) {
            Err(LabelError::SampleCountMismatch {
                component,
                expected,
                actual,
            }) => {
                assert_eq!(component, "LabelExtractor");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_index() {
        let index: FirstTokenIndex = [("ja", "ja")].into_iter().collect();
        assert!(matches!(
            LabelExtractor::new(yes_no(), &index.into()),
            Err(LabelError::MissingFirstToken { .. })
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_options() {
        let options = ResolverOptions::default().with_parallel(true);
        assert!(options.parallel());

        let extractor = options
            .build(yes_no(), &FirstTokenMapping::PrefixMatch)
            .unwrap();
        let diagnostics = DiagnosticLog::new();

        let text = GenerationOutput::text_only(["nej"; 64]);
        assert_eq!(
            extractor.extract_labels(&text, &diagnostics).unwrap(),
            vec![1; 64]
        );
    }
}
