//! # Error Types

/// Errors from labelchipper operations.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// The first-token index has no entry for a vocabulary label.
    #[error(
        "first-token index has no entry for label surface form {surface_form:?}; \
         the index must cover every vocabulary label"
    )]
    MissingFirstToken {
        /// The (lowercased) surface form with no first-token entry.
        surface_form: String,
    },

    /// The number of resolved labels does not match the number of samples.
    #[error("{component}: expected {expected} samples, got {actual}")]
    SampleCountMismatch {
        /// The component which detected the mismatch.
        component: &'static str,

        /// The expected sample count.
        expected: usize,

        /// The observed sample count.
        actual: usize,
    },

    /// Two labels share a surface form after lowercasing.
    #[error("labels {first:?} and {second:?} share the surface form {surface_form:?}")]
    DuplicateSurfaceForm {
        /// The first canonical label.
        first: String,

        /// The second canonical label.
        second: String,

        /// The shared (lowercased) surface form.
        surface_form: String,
    },

    /// A canonical label appears more than once.
    #[error("duplicate canonical label {0:?}")]
    DuplicateLabel(String),

    /// The vocabulary has no labels.
    #[error("label vocabulary is empty")]
    EmptyVocabulary,

    /// A label was not found in the vocabulary.
    #[error("unknown label {0:?}")]
    UnknownLabel(String),

    /// Model outputs contained NaN values.
    #[error("model output row {row} contains NaN values: {values:?}")]
    NanModelOutput {
        /// The index of the offending row.
        row: usize,

        /// The offending row.
        values: Vec<f64>,
    },

    /// Paired sequences have different lengths.
    #[error("length mismatch: {left} predictions vs {right} references")]
    LengthMismatch {
        /// The left-hand length.
        left: usize,

        /// The right-hand length.
        right: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (json, label lists, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(feature = "config")]
impl From<serde_json::Error> for LabelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for labelchipper operations.
pub type LCResult<T> = core::result::Result<T, LabelError>;
