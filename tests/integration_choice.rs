use kosakata::choice::{ChoicePuzzle, Direction};
use kosakata::deck::WordPair;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn deck() -> Vec<WordPair> {
    vec![
        WordPair::new("cat", "kucing"),
        WordPair::new("dog", "anjing"),
        WordPair::new("bird", "burung"),
        WordPair::new("fish", "ikan"),
    ]
}

#[test]
fn options_come_from_the_deck_with_no_repeats() {
    let translations: HashSet<&str> = ["kucing", "anjing", "burung", "ikan"].into();

    for seed in 0..30 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut puzzle =
            ChoicePuzzle::new(deck(), Direction::EnglishToIndonesian, &mut rng).unwrap();

        loop {
            let question = &puzzle.question;
            assert_eq!(question.options.len(), 4);
            assert_eq!(question.options.iter().filter(|o| o.is_correct).count(), 1);

            let texts: Vec<&str> = question.options.iter().map(|o| o.text.as_str()).collect();
            for text in &texts {
                assert!(translations.contains(text), "distractor outside deck: {}", text);
            }
            let unique: HashSet<&&str> = texts.iter().collect();
            assert_eq!(unique.len(), 4);

            puzzle.answer(0);
            if !puzzle.advance(&mut rng) {
                break;
            }
        }
    }
}

#[test]
fn full_traversal_asks_each_pair_once() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut puzzle = ChoicePuzzle::new(deck(), Direction::EnglishToIndonesian, &mut rng).unwrap();

    let mut prompts = Vec::new();
    loop {
        prompts.push(puzzle.question.prompt.clone());
        let correct = puzzle
            .question
            .options
            .iter()
            .position(|o| o.is_correct)
            .unwrap();
        puzzle.answer(correct);
        if !puzzle.advance(&mut rng) {
            break;
        }
    }

    assert!(puzzle.is_complete());
    assert_eq!(puzzle.score, 4);
    let expected: HashSet<String> = ["cat", "dog", "bird", "fish"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(prompts.iter().cloned().collect::<HashSet<_>>(), expected);
}

#[test]
fn toggle_mid_session_keeps_place_and_score() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut puzzle = ChoicePuzzle::new(deck(), Direction::EnglishToIndonesian, &mut rng).unwrap();

    let correct = puzzle
        .question
        .options
        .iter()
        .position(|o| o.is_correct)
        .unwrap();
    puzzle.answer(correct);
    puzzle.advance(&mut rng);

    puzzle.toggle_direction(&mut rng);
    assert_eq!(puzzle.direction, Direction::IndonesianToEnglish);
    assert_eq!(puzzle.current_index, 1);
    assert_eq!(puzzle.score, 1);

    // Prompt is now Indonesian, options English.
    let english: HashSet<&str> = ["cat", "dog", "bird", "fish"].into();
    for option in &puzzle.question.options {
        assert!(english.contains(option.text.as_str()));
    }
}

#[test]
fn duplicate_translations_keep_exactly_one_correct_flag() {
    // Two pairs share the translation text; the flag, not the text,
    // identifies the right answer.
    let deck = vec![
        WordPair::new("street", "jalan"),
        WordPair::new("road", "jalan"),
        WordPair::new("house", "rumah"),
        WordPair::new("water", "air"),
    ];
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = ChoicePuzzle::new(deck.clone(), Direction::EnglishToIndonesian, &mut rng)
            .unwrap();
        assert_eq!(
            puzzle.question.options.iter().filter(|o| o.is_correct).count(),
            1
        );
    }
}
