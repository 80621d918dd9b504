//! # Generation Output

use crate::{
    LCResult,
    resolvers::check_sample_count,
    types::LogprobSample,
};

/// The raw output of a generative model for one batch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(tag = "kind", rename_all = "snake_case"))]
pub enum GenerationOutput {
    /// Decoded text only; no per-token scores.
    TextOnly {
        /// The decoded sequences.
        sequences: Vec<String>,
    },

    /// Decoded text, with ranked per-step token log-probabilities.
    Scored {
        /// The decoded sequences.
        sequences: Vec<String>,

        /// The per-step ranked candidates, one entry per sequence.
        scores: Vec<LogprobSample>,
    },
}

impl GenerationOutput {
    /// Build a text-only output.
    pub fn text_only<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TextOnly {
            sequences: sequences.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a scored output.
    ///
    /// ## Returns
    /// The output, or `LabelError::SampleCountMismatch` if the scores
    /// and sequences differ in length.
    pub fn scored(
        sequences: Vec<String>,
        scores: Vec<LogprobSample>,
    ) -> LCResult<Self> {
        let output = Self::Scored { sequences, scores };
        output.validate()?;
        Ok(output)
    }

    /// Check the structural invariants of the output.
    pub fn validate(&self) -> LCResult<()> {
        match self {
            Self::TextOnly { .. } => Ok(()),
            Self::Scored { sequences, scores } => {
                check_sample_count("GenerationOutput", sequences.len(), scores.len())
            }
        }
    }

    /// The number of samples in the batch.
    pub fn len(&self) -> usize {
        self.sequences().len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The decoded sequences.
    pub fn sequences(&self) -> &[String] {
        match self {
            Self::TextOnly { sequences } => sequences,
            Self::Scored { sequences, .. } => sequences,
        }
    }

    /// The per-step scores, if present.
    pub fn scores(&self) -> Option<&[LogprobSample]> {
        match self {
            Self::TextOnly { .. } => None,
            Self::Scored { scores, .. } => Some(scores),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabelError;

    #[test]
    fn test_text_only() {
        let output = GenerationOutput::text_only(["yes", "no"]);
        assert_eq!(output.len(), 2);
        assert!(!output.is_empty());
        assert!(output.scores().is_none());
        assert!(output.validate().is_ok());
    }

    #[test]
    fn test_scored_validation() {
        let scores: Vec<LogprobSample> = vec![vec![vec![("yes".to_string(), -0.1)]]];
        let output = GenerationOutput::scored(vec!["yes".to_string()], scores.clone()).unwrap();
        assert_eq!(output.scores().unwrap().len(), 1);

        assert!(matches!(
            GenerationOutput::scored(vec!["yes".to_string(), "no".to_string()], scores),
            Err(LabelError::SampleCountMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_serde_shape() {
        let json = r#"{"kind": "scored", "sequences": ["ja"], "scores": [[[["ja", -0.01], ["nej", -4.2]]]]}"#;
        let output: GenerationOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.scores().unwrap()[0][0][1].0, "nej");

        let json = r#"{"kind": "text_only", "sequences": ["ja", "nej"]}"#;
        let output: GenerationOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output, GenerationOutput::text_only(["ja", "nej"]));
    }
}
