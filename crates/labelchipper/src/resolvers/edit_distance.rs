//! # Edit-Distance Label Resolver
//!
//! Fallback resolution for text-only generation output: each decoded
//! sequence resolves to the label whose surface form is nearest by
//! Levenshtein distance.

use crate::{
    alloc::sync::Arc,
    diagnostics::DiagnosticLog,
    resolvers::LabelResolver,
    types::LabelId,
    vocab::LabelVocabulary,
};

/// Levenshtein distance between two strings, over `char`s.
///
/// Wagner-Fischer with two rolling rows.
pub fn levenshtein_distance(
    a: &str,
    b: &str,
) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        core::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Resolves decoded text to the nearest label surface form.
///
/// Comparison is case-insensitive; ties resolve to the first label
/// in canonical order.
#[derive(Debug, Clone)]
pub struct EditDistanceLabelResolver {
    vocab: Arc<LabelVocabulary>,
}

impl EditDistanceLabelResolver {
    /// Create a new resolver over the vocabulary.
    pub fn new(vocab: Arc<LabelVocabulary>) -> Self {
        Self { vocab }
    }

    /// Get the vocabulary.
    pub fn vocab(&self) -> &Arc<LabelVocabulary> {
        &self.vocab
    }

    /// Find the closest label to the text.
    ///
    /// ## Arguments
    /// * `text` - The decoded generation.
    ///
    /// ## Returns
    /// The label with the minimum edit distance, and that distance.
    pub fn closest_label(
        &self,
        text: &str,
    ) -> (LabelId, usize) {
        let text = text.to_lowercase();

        let mut best = (self.vocab.default_label(), usize::MAX);
        for (id, candidate) in self.vocab.lowercase_surface_forms().enumerate() {
            let distance = levenshtein_distance(&text, candidate);
            // Strict: earlier labels win ties.
            if distance < best.1 {
                best = (id, distance);
            }
        }
        best
    }
}

impl LabelResolver for EditDistanceLabelResolver {
    type Sample = String;

    fn name(&self) -> &'static str {
        "EditDistanceLabelResolver"
    }

    fn resolve_sample(
        &self,
        sample: &Self::Sample,
        _diagnostics: &DiagnosticLog,
    ) -> LabelId {
        let (id, distance) = self.closest_label(sample);
        log::trace!("resolved {sample:?} to label {id} at edit distance {distance}");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> EditDistanceLabelResolver {
        EditDistanceLabelResolver::new(Arc::new(
            LabelVocabulary::from_labels(["yes", "no"]).unwrap(),
        ))
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("noo", "no"), 1);
        assert_eq!(levenshtein_distance("noo", "yes"), 3);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
        // chars, not bytes.
        assert_eq!(levenshtein_distance("købt", "kobt"), 1);
    }

    #[test]
    fn test_closest_label() {
        let resolver = yes_no();
        assert_eq!(resolver.closest_label("noo"), (1, 1));
        assert_eq!(resolver.closest_label("yes"), (0, 0));
        assert_eq!(resolver.closest_label("YES"), (0, 0));
    }

    #[test]
    fn test_ties_prefer_canonical_order() {
        let resolver = yes_no();
        // "" is at distance 3 from "yes" and 2 from "no".
        assert_eq!(resolver.closest_label(""), (1, 2));

        let resolver = EditDistanceLabelResolver::new(Arc::new(
            LabelVocabulary::from_labels(["ab", "ba"]).unwrap(),
        ));
        // distance 1 from both.
        assert_eq!(resolver.closest_label("a").0, 0);
    }

    #[test]
    fn test_resolve_batch() {
        let resolver = yes_no();
        let diagnostics = DiagnosticLog::new();
        let batch: Vec<String> = ["No.", "Yes!", "nope", "y"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            resolver.resolve_batch(&batch, &diagnostics).unwrap(),
            vec![1, 0, 1, 0]
        );
        assert!(diagnostics.is_empty());
    }
}
