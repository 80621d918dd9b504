#![allow(missing_docs)]

use std::sync::Arc;

use labelchipper::{
    DiagnosticLog,
    GenerationOutput,
    LabelExtractor,
    LogprobSample,
    resolvers::{EditDistanceLabelResolver, LabelResolver, LogprobLabelResolver},
    vocab::{FirstTokenIndex, FirstTokenMapping, LabelVocabulary},
};
use proptest::prelude::*;

fn step(tokens: &[(&str, f64)]) -> Vec<(String, f64)> {
    tokens.iter().map(|(t, lp)| (t.to_string(), *lp)).collect()
}

fn yes_no() -> Arc<LabelVocabulary> {
    Arc::new(LabelVocabulary::new([("0", "yes"), ("1", "no")]).unwrap())
}

fn sentiment() -> Arc<LabelVocabulary> {
    Arc::new(
        LabelVocabulary::new([
            ("positive", "positiv"),
            ("neutral", "neutral"),
            ("negative", "negativ"),
        ])
        .unwrap(),
    )
}

#[test]
fn yes_no_prefix_scenario() {
    let extractor = LabelExtractor::new(yes_no(), &FirstTokenMapping::PrefixMatch).unwrap();
    let diagnostics = DiagnosticLog::new();

    let output = GenerationOutput::scored(
        vec!["yes".to_string()],
        vec![vec![step(&[("y", -0.05), ("n", -0.2)])]],
    )
    .unwrap();
    assert_eq!(
        extractor.extract_labels(&output, &diagnostics).unwrap(),
        vec![0]
    );
}

#[test]
fn yes_no_edit_distance_scenario() {
    let extractor = LabelExtractor::new(yes_no(), &FirstTokenMapping::PrefixMatch).unwrap();
    let diagnostics = DiagnosticLog::new();

    let output = GenerationOutput::text_only(["noo"]);
    assert_eq!(
        extractor.extract_labels(&output, &diagnostics).unwrap(),
        vec![1]
    );
    assert_eq!(
        extractor.extract_label_names(&output, &diagnostics).unwrap(),
        vec!["no"]
    );
}

#[test]
fn multi_token_concatenation_only_at_first_step() {
    let diagnostics = DiagnosticLog::new();

    // A lone label resolves on its first token.
    let vocab = Arc::new(LabelVocabulary::new([("A", "foobar")]).unwrap());
    let resolver = LogprobLabelResolver::new(vocab, &FirstTokenMapping::PrefixMatch).unwrap();
    let sample = vec![step(&[("foo", -0.1)]), step(&[("bar", -0.1)])];
    assert_eq!(resolver.resolve_sample(&sample, &diagnostics), 0);

    // Shared prefixes are disambiguated by the next step.
    let vocab = Arc::new(LabelVocabulary::new([("B", "foobaz"), ("A", "foobar")]).unwrap());
    let resolver = LogprobLabelResolver::new(vocab, &FirstTokenMapping::PrefixMatch).unwrap();
    assert_eq!(resolver.resolve_sample(&sample, &diagnostics), 1);
    assert!(diagnostics.is_empty());

    // No concatenation past the second step; "foob" + "a" is never formed.
    let vocab = Arc::new(
        LabelVocabulary::new([("B", "foobaz"), ("A", "foobar"), ("C", "fooqux")]).unwrap(),
    );
    let resolver = LogprobLabelResolver::new(vocab, &FirstTokenMapping::PrefixMatch).unwrap();
    let sample = vec![
        step(&[("foo", -0.1)]),
        step(&[("b", -0.1)]),
        step(&[("ar", -0.1)]),
    ];
    assert_eq!(resolver.resolve_sample(&sample, &diagnostics), 1);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn first_token_index_resolution() {
    let vocab = sentiment();
    let index: FirstTokenIndex = [("positiv", "pos"), ("neutral", "neu"), ("negativ", "neg")]
        .into_iter()
        .collect();
    let extractor = LabelExtractor::new(vocab, &index.into()).unwrap();
    let diagnostics = DiagnosticLog::new();

    let output = GenerationOutput::scored(
        vec!["".to_string(); 3],
        vec![
            vec![step(&[(" Neg", -0.3), (" Pos", -1.2)])],
            vec![step(&[("ne", -0.3), ("neu", -1.0)])],
            vec![step(&[("Sure", -0.1)]), step(&[("positiv", -0.4)])],
        ],
    )
    .unwrap();
    assert_eq!(
        extractor.extract_labels(&output, &diagnostics).unwrap(),
        vec![2, 1, 0]
    );
}

#[test]
fn unparseable_output_defaults_to_first_label() {
    let extractor = LabelExtractor::new(sentiment(), &FirstTokenMapping::PrefixMatch).unwrap();
    let diagnostics = DiagnosticLog::new();

    let garbage: LogprobSample = vec![step(&[("42", -0.1), ("!!", -0.3)]), step(&[("x", -0.2)])];
    let output = GenerationOutput::scored(
        vec!["".to_string(); 4],
        vec![garbage.clone(), vec![], garbage, vec![]],
    )
    .unwrap();

    assert_eq!(
        extractor.extract_labels(&output, &diagnostics).unwrap(),
        vec![0, 0, 0, 0]
    );
    // One message for the garbage sample; one for the empty samples.
    assert_eq!(diagnostics.len(), 2);
}

#[cfg(feature = "rayon")]
#[test]
fn parallel_extraction_preserves_order() {
    use labelchipper::{LabelId, ResolverOptions};

    let extractor = ResolverOptions::default()
        .with_parallel(true)
        .build(sentiment(), &FirstTokenMapping::PrefixMatch)
        .unwrap();
    let diagnostics = DiagnosticLog::new();

    let words = ["positiv", "neutral", "negativ"];
    let sequences: Vec<String> = (0..300).map(|i| words[i % 3].to_uppercase()).collect();
    let output = GenerationOutput::text_only(sequences);

    let labels = extractor.extract_labels(&output, &diagnostics).unwrap();
    let expected: Vec<LabelId> = (0..300).map(|i| i % 3).collect();
    assert_eq!(labels, expected);
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pos".to_string()),
        Just("neg".to_string()),
        Just("ne".to_string()),
        Just("n".to_string()),
        Just(" ".to_string()),
        "[a-z]{0,4}",
        "[ .!0-9]{0,3}",
    ]
}

fn sample_strategy() -> impl Strategy<Value = LogprobSample> {
    prop::collection::vec(
        prop::collection::vec((token_strategy(), -10.0f64..0.0), 0..4),
        0..4,
    )
}

proptest! {
    #[test]
    fn output_length_matches_input(
        samples in prop::collection::vec(sample_strategy(), 0..16)
    ) {
        let vocab = sentiment();
        let extractor = LabelExtractor::new(vocab.clone(), &FirstTokenMapping::PrefixMatch).unwrap();
        let diagnostics = DiagnosticLog::new();

        let output = GenerationOutput::scored(
            vec![String::new(); samples.len()],
            samples.clone(),
        ).unwrap();
        let labels = extractor.extract_labels(&output, &diagnostics).unwrap();
        prop_assert_eq!(labels.len(), samples.len());
        prop_assert!(labels.iter().all(|&id| id < vocab.len()));

        // Per-sample resolution agrees with batch resolution.
        let resolver = LogprobLabelResolver::new(vocab, &FirstTokenMapping::PrefixMatch).unwrap();
        for (sample, &label) in samples.iter().zip(&labels) {
            prop_assert_eq!(resolver.resolve_sample(sample, &diagnostics), label);
        }
    }

    #[test]
    fn unique_first_token_wins_regardless_of_later_steps(
        label in 0usize..3,
        rest in prop::collection::vec(
            prop::collection::vec((token_strategy(), -10.0f64..0.0), 0..4),
            0..4,
        ),
    ) {
        let resolver =
            LogprobLabelResolver::new(sentiment(), &FirstTokenMapping::PrefixMatch).unwrap();
        let diagnostics = DiagnosticLog::new();

        let first = ["posi", "neu", "neg"][label];
        let mut sample: LogprobSample = vec![vec![(first.to_string(), -0.01)]];
        sample.extend(rest);

        prop_assert_eq!(resolver.resolve_sample(&sample, &diagnostics), label);
    }

    #[test]
    fn edit_distance_ignores_case(text in "[a-zA-Z ]{0,12}") {
        let resolver = EditDistanceLabelResolver::new(sentiment());
        prop_assert_eq!(
            resolver.closest_label(&text.to_uppercase()),
            resolver.closest_label(&text.to_lowercase())
        );
    }

    #[test]
    fn edit_distance_exact_match_wins(label in 0usize..3, upper in any::<bool>()) {
        let vocab = sentiment();
        let resolver = EditDistanceLabelResolver::new(vocab.clone());

        let text = vocab.surface_form(label).unwrap();
        let text = if upper { text.to_uppercase() } else { text.to_string() };
        prop_assert_eq!(resolver.closest_label(&text), (label, 0));
    }
}
