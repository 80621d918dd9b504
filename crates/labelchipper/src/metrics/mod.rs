//! # Metric Computation
//!
//! Maps model outputs and references onto canonical label ids,
//! and computes named classification statistics over them.
//!
//! Model outputs may be resolved label surface forms, label ids,
//! or per-class logits (reduced by argmax).

mod classification;

use std::collections::BTreeMap;

#[doc(inline)]
pub use classification::{ClassificationMetric, ConfusionMatrix};

use crate::{
    LCResult,
    LabelError,
    types::LabelId,
    vocab::LabelVocabulary,
};

/// The raw model outputs for an evaluation split.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutputs {
    /// Resolved label surface forms; matched case-insensitively.
    Labels(Vec<String>),

    /// Label ids.
    LabelIds(Vec<LabelId>),

    /// Per-class scores, one row per sample.
    Logits(Vec<Vec<f64>>),
}

/// The reference labels for an evaluation split.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceLabels {
    /// Canonical label names; matched case-insensitively.
    Labels(Vec<String>),

    /// Label ids.
    LabelIds(Vec<LabelId>),
}

/// A named statistic to compute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricConfig {
    /// The name the score is reported under.
    pub name: String,

    /// The statistic.
    pub metric: ClassificationMetric,
}

impl From<ClassificationMetric> for MetricConfig {
    fn from(metric: ClassificationMetric) -> Self {
        Self {
            name: metric.name().to_string(),
            metric,
        }
    }
}

/// Options for [`compute_metrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricOptions {
    /// Is this the primary worker of a distributed evaluation?
    ///
    /// Non-primary workers compute no scores.
    pub primary: bool,
}

impl Default for MetricOptions {
    fn default() -> Self {
        Self { primary: true }
    }
}

/// Named metric scores.
pub type MetricResults = BTreeMap<String, f64>;

/// Fail if any logit row contains NaN values.
pub fn check_no_nan_values(logits: &[Vec<f64>]) -> LCResult<()> {
    match logits.iter().position(|row| row.iter().any(|v| v.is_nan())) {
        Some(row) => Err(LabelError::NanModelOutput {
            row,
            values: logits[row].clone(),
        }),
        None => Ok(()),
    }
}

/// Map model outputs onto label ids.
///
/// ## Arguments
/// * `outputs` - The model outputs.
/// * `vocab` - The label vocabulary.
///
/// ## Returns
/// The predicted label ids; or an error for NaN logits, empty logit rows,
/// or unknown labels.
pub fn prediction_ids(
    outputs: &ModelOutputs,
    vocab: &LabelVocabulary,
) -> LCResult<Vec<LabelId>> {
    match outputs {
        ModelOutputs::Labels(labels) => labels
            .iter()
            .map(|label| {
                vocab
                    .lookup_surface_form(label)
                    .ok_or_else(|| LabelError::UnknownLabel(label.clone()))
            })
            .collect(),
        ModelOutputs::LabelIds(ids) => check_ids(ids, vocab),
        ModelOutputs::Logits(logits) => {
            check_no_nan_values(logits)?;
            let ids = logits
                .iter()
                .enumerate()
                .map(|(row, scores)| {
                    argmax(scores)
                        .ok_or_else(|| LabelError::Parse(format!("logit row {row} is empty")))
                })
                .collect::<LCResult<Vec<_>>>()?;
            check_ids(&ids, vocab)
        }
    }
}

/// Map references onto label ids.
pub fn reference_ids(
    references: &ReferenceLabels,
    vocab: &LabelVocabulary,
) -> LCResult<Vec<LabelId>> {
    match references {
        ReferenceLabels::Labels(labels) => labels
            .iter()
            .map(|label| {
                vocab
                    .lookup_label(label)
                    .ok_or_else(|| LabelError::UnknownLabel(label.clone()))
            })
            .collect(),
        ReferenceLabels::LabelIds(ids) => check_ids(ids, vocab),
    }
}

/// Compute the configured metrics.
///
/// ## Arguments
/// * `outputs` - The model outputs.
/// * `references` - The reference labels.
/// * `vocab` - The label vocabulary.
/// * `metrics` - The statistics to compute.
/// * `options` - Metric options.
///
/// ## Returns
/// The named scores. Non-primary workers yield no scores.
pub fn compute_metrics(
    outputs: &ModelOutputs,
    references: &ReferenceLabels,
    vocab: &LabelVocabulary,
    metrics: &[MetricConfig],
    options: MetricOptions,
) -> LCResult<MetricResults> {
    let predictions = prediction_ids(outputs, vocab)?;
    let references = reference_ids(references, vocab)?;
    let matrix = ConfusionMatrix::from_pairs(vocab.len(), &predictions, &references)?;

    let mut results = MetricResults::new();
    for cfg in metrics {
        match score(cfg.metric, &matrix, options) {
            Some(value) => {
                results.insert(cfg.name.clone(), value);
            }
            None => log::debug!("{}: no score on a non-primary worker", cfg.name),
        }
    }
    Ok(results)
}

fn score(
    metric: ClassificationMetric,
    matrix: &ConfusionMatrix,
    options: MetricOptions,
) -> Option<f64> {
    if !options.primary {
        return None;
    }
    Some(metric.compute(matrix))
}

fn argmax(scores: &[f64]) -> Option<LabelId> {
    let mut best: Option<(LabelId, f64)> = None;
    for (idx, &value) in scores.iter().enumerate() {
        match best {
            Some((_, b)) if value <= b => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

fn check_ids(
    ids: &[LabelId],
    vocab: &LabelVocabulary,
) -> LCResult<Vec<LabelId>> {
    if let Some(&id) = ids.iter().find(|&&id| id >= vocab.len()) {
        return Err(LabelError::UnknownLabel(format!("label id {id}")));
    }
    Ok(ids.to_vec())
}
