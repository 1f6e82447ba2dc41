use proptest::prelude::*;
use signlang_gesture_model::TopCandidate;
use signlang_stream_engine::accumulator::{ObserveOutcome, SequenceAccumulator};

fn observation() -> impl Strategy<Value = Option<TopCandidate>> {
    prop_oneof![
        1 => Just(None),
        4 => (prop::sample::select(vec!["A", "B", "C", "L", "Y"]), 0.0f32..=1.0f32)
            .prop_map(|(label, score)| TopCandidate::normalized(label, score)),
    ]
}

proptest! {
    #[test]
    fn no_two_adjacent_symbols_are_equal(observations in prop::collection::vec(observation(), 0..200)) {
        let mut acc = SequenceAccumulator::with_defaults();
        for candidate in &observations {
            acc.observe(candidate.as_ref());
        }
        let word = acc.current();
        for pair in word.symbols().windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
    }

    #[test]
    fn low_confidence_never_mutates(
        prefix in prop::collection::vec(observation(), 0..50),
        label in "[A-Z]{1,3}",
        score in 0.0f32..0.9f32,
    ) {
        let mut acc = SequenceAccumulator::with_defaults();
        for candidate in &prefix {
            acc.observe(candidate.as_ref());
        }
        let before = acc.current();
        let candidate = TopCandidate::normalized(&label, score).unwrap();
        prop_assert_eq!(acc.observe(Some(&candidate)), ObserveOutcome::BelowThreshold);
        prop_assert_eq!(acc.current(), before);
    }

    #[test]
    fn absent_never_mutates(prefix in prop::collection::vec(observation(), 0..50)) {
        let mut acc = SequenceAccumulator::with_defaults();
        for candidate in &prefix {
            acc.observe(candidate.as_ref());
        }
        let before = acc.current();
        prop_assert_eq!(acc.observe(None), ObserveOutcome::Absent);
        prop_assert_eq!(acc.current(), before);
    }

    #[test]
    fn reset_always_empties(observations in prop::collection::vec(observation(), 0..100)) {
        let mut acc = SequenceAccumulator::with_defaults();
        for candidate in &observations {
            acc.observe(candidate.as_ref());
        }
        acc.reset();
        prop_assert!(acc.current().is_empty());
        prop_assert_eq!(acc.current().joined(), "");
    }

    #[test]
    fn accepted_symbols_are_a_subsequence_of_confident_labels(
        observations in prop::collection::vec(observation(), 0..100),
    ) {
        let mut acc = SequenceAccumulator::with_defaults();
        let mut confident = Vec::new();
        for candidate in &observations {
            if let Some(top) = candidate {
                if top.confidence >= 0.9 {
                    confident.push(top.label.clone());
                }
            }
            acc.observe(candidate.as_ref());
        }
        let mut expected: Vec<String> = confident;
        expected.dedup();
        let word = acc.current();
        prop_assert_eq!(word.symbols(), expected.as_slice());
    }
}
