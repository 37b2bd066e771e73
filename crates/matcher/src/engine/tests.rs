use super::*;

/// Asserts that blocks partition both sequences in order.
fn assert_partitions(blocks: &[AlignmentBlock], input_len: usize, reference_len: usize) {
    let (mut i, mut j) = (0, 0);
    for block in blocks {
        assert_eq!(block.input.start, i, "gap or overlap in input at {block:?}");
        assert_eq!(block.reference.start, j, "gap or overlap in reference at {block:?}");
        match block.op {
            Opcode::Equal => assert_eq!(block.input.len(), block.reference.len()),
            Opcode::Replace => {
                assert!(!block.input.is_empty() && !block.reference.is_empty())
            }
            Opcode::Delete => assert!(block.reference.is_empty() && !block.input.is_empty()),
            Opcode::Insert => assert!(block.input.is_empty() && !block.reference.is_empty()),
        }
        i = block.input.end;
        j = block.reference.end;
    }
    assert_eq!(i, input_len);
    assert_eq!(j, reference_len);
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

#[test]
fn identical_sequences_score_one_with_single_equal_block() {
    let input = words("the cat sat on the mat");
    let blocks = align(&input, &input);
    assert_eq!(similarity_ratio(&input, &input), 1.0);
    assert_eq!(
        blocks,
        vec![AlignmentBlock::new(Opcode::Equal, 0..6, 0..6)]
    );
}

#[test]
fn disjoint_sequences_score_zero() {
    let a = words("good morning");
    let b = words("bonjour tout le monde");
    assert_eq!(similarity_ratio(&a, &b), 0.0);
    let blocks = align(&a, &b);
    assert_eq!(
        blocks,
        vec![AlignmentBlock::new(Opcode::Replace, 0..2, 0..4)]
    );
}

#[test]
fn nearest_reference_picks_exact_match() {
    let (index, ratio) = find_nearest_reference(
        &["hello", "world"],
        &[vec!["hello", "world"], vec!["goodbye"]],
    );
    assert_eq!(index, 0);
    assert_eq!(ratio, 1.0);
}

#[test]
fn reordering_references_changes_index_not_ratio() {
    let input = words("i would like a coffee");
    let refs_a = vec![words("i want coffee"), words("i would like a coffee please")];
    let refs_b = vec![words("i would like a coffee please"), words("i want coffee")];

    let (index_a, ratio_a) = find_nearest_reference(&input, &refs_a);
    let (index_b, ratio_b) = find_nearest_reference(&input, &refs_b);

    assert_eq!(index_a, 1);
    assert_eq!(index_b, 0);
    assert_eq!(ratio_a, ratio_b);
}

#[test]
fn ties_go_to_first_reference() {
    let input = words("a b");
    let refs = vec![words("a c"), words("c b"), words("a b c d e f")];
    let (index, ratio) = find_nearest_reference(&input, &refs);
    assert_eq!(index, 0);
    assert_eq!(ratio, 0.5);
}

#[test]
fn empty_references_fail_gracefully() {
    let refs: Vec<Vec<&str>> = Vec::new();
    assert_eq!(find_nearest_reference(&words("anything"), &refs), (0, 0.0));
    assert_eq!(
        find_matching_blocks(&words("anything"), &refs, 0),
        Err(MatchError::ReferenceOutOfRange { index: 0, len: 0 })
    );
}

#[test]
fn ratio_uses_lcs_over_total_length() {
    // LCS("i am here", "i was here") = 2, total = 6
    let ratio = similarity_ratio(&words("i am here"), &words("i was here"));
    assert!((ratio - 4.0 / 6.0).abs() < 1e-12);
}

#[test]
fn both_empty_is_a_perfect_match() {
    let empty: Vec<&str> = Vec::new();
    assert_eq!(similarity_ratio(&empty, &empty), 1.0);
    assert!(align(&empty, &empty).is_empty());
}

#[test]
fn blocks_describe_each_kind_of_edit() {
    let input = words("yesterday i go to the big shop");
    let reference = words("yesterday i went to the shop today");
    let blocks = find_matching_blocks(&input, &[reference.clone()], 0).expect("blocks");

    assert_partitions(&blocks, input.len(), reference.len());
    assert_eq!(
        blocks,
        vec![
            AlignmentBlock::new(Opcode::Equal, 0..2, 0..2),
            AlignmentBlock::new(Opcode::Replace, 2..3, 2..3),
            AlignmentBlock::new(Opcode::Equal, 3..5, 3..5),
            AlignmentBlock::new(Opcode::Delete, 5..6, 5..5),
            AlignmentBlock::new(Opcode::Equal, 6..7, 5..6),
            AlignmentBlock::new(Opcode::Insert, 7..7, 6..7),
        ]
    );
}

#[test]
fn blocks_partition_assorted_pairs() {
    let cases = [
        ("", "one two"),
        ("one two", ""),
        ("a b c d", "d c b a"),
        ("a a a b", "a b b b"),
        ("x y z", "x q y r z s"),
        ("the the the", "the"),
    ];
    for (a, b) in cases {
        let a = words(a);
        let b = words(b);
        let blocks = align(&a, &b);
        assert_partitions(&blocks, a.len(), b.len());

        // Equal blocks account for exactly the LCS length.
        let equal: usize = blocks
            .iter()
            .filter(|blk| blk.op == Opcode::Equal)
            .map(|blk| blk.input.len())
            .sum();
        let expected = similarity_ratio(&a, &b) * (a.len() + b.len()) as f64 / 2.0;
        assert_eq!(equal as f64, expected.round());
    }
}

#[test]
fn matcher_normalizes_case_and_punctuation() {
    let matcher = Matcher::new(MatchConfig::default()).expect("matcher");
    let result = matcher
        .match_attempt("hello, WORLD", &["Goodbye.", "Hello world!"])
        .expect("match");

    assert_eq!(result.reference_index, 1);
    assert_eq!(result.ratio, 1.0);
    assert!(result.passed);
    assert!(result.is_exact());
    assert_eq!(result.mistakes(), 0);
    assert_eq!(result.input[1].surface, "WORLD");
    assert_eq!(result.reference[0].surface, "Hello");
}

#[test]
fn matcher_requires_references() {
    let matcher = Matcher::new(MatchConfig::default()).expect("matcher");
    let refs: [&str; 0] = [];
    assert_eq!(
        matcher.match_attempt("anything", &refs),
        Err(MatchError::NoReferences)
    );
}

#[test]
fn blank_attempt_scores_zero() {
    let matcher = Matcher::new(MatchConfig::default()).expect("matcher");
    let result = matcher.match_attempt("  ?? ", &["good night"]).expect("match");
    assert_eq!(result.ratio, 0.0);
    assert!(!result.passed);
    assert!(result.input.is_empty());
    assert_eq!(
        result.blocks,
        vec![AlignmentBlock::new(Opcode::Insert, 0..0, 0..2)]
    );
}

#[test]
fn pass_ratio_decides_passed_flag() {
    let strict = Matcher::new(MatchConfig {
        pass_ratio: 1.0,
        ..MatchConfig::default()
    })
    .expect("matcher");
    let lenient = Matcher::new(MatchConfig {
        pass_ratio: 0.5,
        ..MatchConfig::default()
    })
    .expect("matcher");

    let refs = ["I have two brothers"];
    let attempt = "I have three brothers";
    assert!(!strict.match_attempt(attempt, &refs).expect("match").passed);
    assert!(lenient.match_attempt(attempt, &refs).expect("match").passed);
}

#[test]
fn invalid_config_rejected_at_construction() {
    let err = Matcher::new(MatchConfig {
        pass_ratio: 2.0,
        ..MatchConfig::default()
    })
    .expect_err("invalid");
    assert!(matches!(err, MatchError::InvalidConfig(_)));
}

#[test]
fn result_keeps_original_texts_for_display() {
    let matcher = Matcher::new(MatchConfig::default()).expect("matcher");
    let refs = ["It is late", "It's late!"];
    let result = matcher.match_attempt("it's  LATE", &refs).expect("match");

    assert_eq!(result.reference_index, 1);
    assert_eq!(result.input_text, "it's  LATE");
    assert_eq!(result.reference_text, "It's late!");
    for token in &result.reference {
        assert_eq!(&result.reference_text[token.start..token.end], token.surface);
    }
}
