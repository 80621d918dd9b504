//! # Parallel Resolver

use crate::{
    LCResult,
    diagnostics::DiagnosticLog,
    resolvers::{LabelResolver, check_sample_count},
    types::LabelId,
};

/// Batch-Level Parallel Resolver Wrapper.
///
/// Samples are independent, so batches are resolved with ``rayon``;
/// the output order matches the input order.
#[derive(Debug, Clone)]
pub struct ParallelRayonResolver<R: LabelResolver> {
    /// Wrapped resolver.
    pub inner: R,
}

impl<R: LabelResolver> ParallelRayonResolver<R> {
    /// Create a new parallel resolver.
    ///
    /// ## Arguments
    /// * `inner` - The resolver to wrap.
    ///
    /// ## Returns
    /// A new `ParallelRayonResolver` instance.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: LabelResolver> LabelResolver for ParallelRayonResolver<R> {
    type Sample = R::Sample;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn resolve_sample(
        &self,
        sample: &Self::Sample,
        diagnostics: &DiagnosticLog,
    ) -> LabelId {
        self.inner.resolve_sample(sample, diagnostics)
    }

    fn resolve_batch(
        &self,
        batch: &[Self::Sample],
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<LabelId>> {
        use rayon::prelude::*;

        let labels: Vec<LabelId> = batch
            .par_iter()
            .map(|sample| self.inner.resolve_sample(sample, diagnostics))
            .collect();

        check_sample_count(self.name(), batch.len(), labels.len())?;
        Ok(labels)
    }
}
