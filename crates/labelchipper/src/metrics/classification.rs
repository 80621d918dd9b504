//! # Classification Statistics
//!
//! Statistics over paired `(prediction, reference)` label ids.

use core::{fmt, str::FromStr};

use crate::{
    LCResult,
    LabelError,
    types::LabelId,
};

/// A supported classification statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum ClassificationMetric {
    /// Fraction of predictions equal to their reference.
    Accuracy,

    /// Unweighted mean of per-class F1 scores.
    MacroF1,

    /// Multi-class Matthews correlation coefficient.
    Mcc,
}

impl ClassificationMetric {
    /// All supported metrics.
    pub const ALL: [ClassificationMetric; 3] = [Self::Accuracy, Self::MacroF1, Self::Mcc];

    /// The canonical name of the metric.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::MacroF1 => "macro-f1",
            Self::Mcc => "mcc",
        }
    }

    /// Compute the statistic over a confusion matrix.
    pub fn compute(
        &self,
        matrix: &ConfusionMatrix,
    ) -> f64 {
        match self {
            Self::Accuracy => matrix.accuracy(),
            Self::MacroF1 => matrix.macro_f1(),
            Self::Mcc => matrix.mcc(),
        }
    }
}

impl fmt::Display for ClassificationMetric {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassificationMetric {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == key)
            .ok_or_else(|| LabelError::Parse(format!("unknown metric {s:?}")))
    }
}

/// A square confusion matrix; rows are references, columns are predictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    num_labels: usize,
    counts: Vec<usize>,
}

impl ConfusionMatrix {
    /// Create an empty matrix over `num_labels` labels.
    pub fn new(num_labels: usize) -> Self {
        Self {
            num_labels,
            counts: vec![0; num_labels * num_labels],
        }
    }

    /// Build a matrix from paired predictions and references.
    ///
    /// ## Arguments
    /// * `num_labels` - The size of the label vocabulary.
    /// * `predictions` - The predicted label ids.
    /// * `references` - The reference label ids.
    ///
    /// ## Returns
    /// The matrix; or an error if the sequences differ in length,
    /// or an id is out of range.
    pub fn from_pairs(
        num_labels: usize,
        predictions: &[LabelId],
        references: &[LabelId],
    ) -> LCResult<Self> {
        if predictions.len() != references.len() {
            return Err(LabelError::LengthMismatch {
                left: predictions.len(),
                right: references.len(),
            });
        }

        let mut matrix = Self::new(num_labels);
        for (&prediction, &reference) in predictions.iter().zip(references) {
            matrix.add(reference, prediction)?;
        }
        Ok(matrix)
    }

    /// Record one `(reference, prediction)` pair.
    pub fn add(
        &mut self,
        reference: LabelId,
        prediction: LabelId,
    ) -> LCResult<()> {
        for id in [reference, prediction] {
            if id >= self.num_labels {
                return Err(LabelError::UnknownLabel(format!("label id {id}")));
            }
        }
        self.counts[reference * self.num_labels + prediction] += 1;
        Ok(())
    }

    /// The number of labels.
    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    /// The count of `(reference, prediction)` pairs.
    pub fn count(
        &self,
        reference: LabelId,
        prediction: LabelId,
    ) -> usize {
        self.counts[reference * self.num_labels + prediction]
    }

    /// The total number of pairs.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The number of correct predictions.
    pub fn correct(&self) -> usize {
        (0..self.num_labels).map(|k| self.count(k, k)).sum()
    }

    /// The number of references with label `k`.
    pub fn reference_count(
        &self,
        k: LabelId,
    ) -> usize {
        (0..self.num_labels).map(|p| self.count(k, p)).sum()
    }

    /// The number of predictions with label `k`.
    pub fn prediction_count(
        &self,
        k: LabelId,
    ) -> usize {
        (0..self.num_labels).map(|r| self.count(r, k)).sum()
    }

    /// Fraction of correct predictions; `0.0` when empty.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.correct() as f64 / total as f64
    }

    /// Mean F1 over the labels present in the references or predictions.
    ///
    /// Labels with no true positives score `0.0`.
    pub fn macro_f1(&self) -> f64 {
        let mut sum = 0.0;
        let mut present = 0usize;

        for k in 0..self.num_labels {
            let tp = self.count(k, k);
            let fp = self.prediction_count(k) - tp;
            let fn_ = self.reference_count(k) - tp;

            if tp + fp + fn_ == 0 {
                continue;
            }
            present += 1;
            sum += (2 * tp) as f64 / (2 * tp + fp + fn_) as f64;
        }

        if present == 0 {
            return 0.0;
        }
        sum / present as f64
    }

    /// Multi-class Matthews correlation coefficient (the `R_K` statistic).
    ///
    /// Degenerate matrices (a single predicted or reference class) score `0.0`.
    pub fn mcc(&self) -> f64 {
        let s = self.total() as f64;
        let c = self.correct() as f64;

        let mut pt = 0.0;
        let mut pp = 0.0;
        let mut tt = 0.0;
        for k in 0..self.num_labels {
            let p = self.prediction_count(k) as f64;
            let t = self.reference_count(k) as f64;
            pt += p * t;
            pp += p * p;
            tt += t * t;
        }

        let denominator = ((s * s - pp) * (s * s - tt)).sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        (c * s - pt) / denominator
    }
}
