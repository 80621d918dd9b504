//! # Label Resolver Trait

use crate::{
    LCResult,
    LabelError,
    alloc::sync::Arc,
    diagnostics::DiagnosticLog,
    types::LabelId,
};

/// Resolves generation samples to exactly one label each.
pub trait LabelResolver: Send + Sync {
    /// The per-sample generation type this resolver consumes.
    type Sample: Sync;

    /// A short name for diagnostics and errors.
    fn name(&self) -> &'static str;

    /// Resolve one sample.
    ///
    /// Unresolvable samples are mapped to a deterministic fallback label,
    /// and reported through `diagnostics`.
    ///
    /// ## Arguments
    /// * `sample` - The generation sample.
    /// * `diagnostics` - The deduplicating diagnostic sink.
    ///
    /// ## Returns
    /// The resolved label.
    fn resolve_sample(
        &self,
        sample: &Self::Sample,
        diagnostics: &DiagnosticLog,
    ) -> LabelId;

    /// Resolve a batch of samples, in order.
    ///
    /// ## Arguments
    /// * `batch` - The generation samples.
    /// * `diagnostics` - The deduplicating diagnostic sink.
    ///
    /// ## Returns
    /// One label per sample, in input order.
    fn resolve_batch(
        &self,
        batch: &[Self::Sample],
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<LabelId>> {
        let labels: Vec<LabelId> = batch
            .iter()
            .map(|sample| self.resolve_sample(sample, diagnostics))
            .collect();

        check_sample_count(self.name(), batch.len(), labels.len())?;
        Ok(labels)
    }
}

impl<R> LabelResolver for Arc<R>
where
    R: LabelResolver + ?Sized,
{
    type Sample = R::Sample;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resolve_sample(
        &self,
        sample: &Self::Sample,
        diagnostics: &DiagnosticLog,
    ) -> LabelId {
        (**self).resolve_sample(sample, diagnostics)
    }

    fn resolve_batch(
        &self,
        batch: &[Self::Sample],
        diagnostics: &DiagnosticLog,
    ) -> LCResult<Vec<LabelId>> {
        (**self).resolve_batch(batch, diagnostics)
    }
}

/// Check the structural one-label-per-sample invariant.
pub(crate) fn check_sample_count(
    component: &'static str,
    expected: usize,
    actual: usize,
) -> LCResult<()> {
    if expected != actual {
        return Err(LabelError::SampleCountMismatch {
            component,
            expected,
            actual,
        });
    }
    Ok(())
}
