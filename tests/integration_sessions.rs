use kosakata::choice::Direction;
use kosakata::deck::{Card, DeckStore, FileDeckStore, WordPair};
use kosakata::error::GameError;
use kosakata::matching::SelectOutcome;
use kosakata::progress::{GameKind, ProgressDb, ProgressStore};
use assert_matches::assert_matches;
use kosakata::session::{ChoiceSession, ClozeSession, MatchingSession, StudySession};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn store_with_card(dir: &std::path::Path, n: usize) -> FileDeckStore {
    let store = FileDeckStore::with_path(dir.join("decks.json"));
    let card = Card {
        id: "fruit".into(),
        name: "Fruit".into(),
        target_days: 3,
        word_pairs: (0..n)
            .map(|i| WordPair::new(&format!("fruit{}", i), &format!("buah{}", i)))
            .collect(),
    };
    store.save(&[card]).unwrap();
    store
}

#[test]
fn matching_game_over_a_file_backed_deck() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_card(dir.path(), 3);
    let mut rng = StdRng::seed_from_u64(1);

    let mut session = MatchingSession::start(&store, "fruit", &mut rng).unwrap();
    for i in 0..3 {
        session.click(&format!("en-{}", i));
        let outcome = session.click(&format!("id-{}", i));
        assert!(matches!(outcome, SelectOutcome::Matched { .. }));
    }
    assert!(session.puzzle.is_complete());

    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    session.log_result(&db).unwrap();
    let recent = db.recent_results(5).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].game, GameKind::Matching);
    assert_eq!(recent[0].card_id, "fruit");
    assert_eq!(recent[0].accuracy, 100.0);
}

#[test]
fn unknown_card_surfaces_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_card(dir.path(), 3);
    let mut rng = StdRng::seed_from_u64(2);

    assert_matches!(
        MatchingSession::start(&store, "veggies", &mut rng),
        Err(GameError::NotFound(_))
    );
    assert_matches!(
        ChoiceSession::start(&store, "veggies", Direction::EnglishToIndonesian, &mut rng),
        Err(GameError::NotFound(_))
    );
}

#[test]
fn corrupt_pair_data_aborts_session_construction() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileDeckStore::with_path(dir.path().join("decks.json"));
    store
        .save(&[Card {
            id: "broken".into(),
            name: "Broken".into(),
            target_days: 1,
            word_pairs: vec![WordPair::new("ok", "baik"), WordPair::new("", "kosong")],
        }])
        .unwrap();

    let mut rng = StdRng::seed_from_u64(3);
    assert_matches!(
        MatchingSession::start(&store, "broken", &mut rng),
        Err(GameError::Data(_))
    );
}

#[test]
fn choice_session_end_to_end_with_results_log() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_card(dir.path(), 5);
    let mut rng = StdRng::seed_from_u64(4);

    let mut session =
        ChoiceSession::start(&store, "fruit", Direction::EnglishToIndonesian, &mut rng).unwrap();
    loop {
        let correct = session
            .puzzle
            .question
            .options
            .iter()
            .position(|o| o.is_correct)
            .unwrap();
        // Answer wrong on purpose for the first question only.
        let pick = if session.puzzle.current_index == 0 {
            (correct + 1) % session.puzzle.question.options.len()
        } else {
            correct
        };
        session.answer(pick);
        if !session.puzzle.advance(&mut rng) {
            break;
        }
    }
    assert!(session.puzzle.is_complete());
    assert_eq!(session.puzzle.score, 4);

    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    session.log_result(&db).unwrap();
    assert_eq!(db.recent_results(1).unwrap()[0].accuracy, 80.0);
}

#[test]
fn cloze_session_logs_final_check() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let text = "setiap pagi saya membaca buku bahasa indonesia sambil minum kopi hangat";
    let mut session = ClozeSession::start("fruit", text, &mut rng).unwrap();

    let blanks: Vec<usize> = session
        .puzzle
        .tokens
        .iter()
        .filter(|t| t.hidden)
        .map(|t| t.index)
        .collect();
    for &slot in &blanks {
        let word = session.puzzle.tokens[slot].original_word.clone();
        let id = session
            .puzzle
            .pool
            .iter()
            .find(|w| w.word == word)
            .unwrap()
            .id
            .clone();
        session.place(&id, slot);
    }
    let report = session.check();
    assert!(report.complete);

    let db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    session.log_result(&db).unwrap();
    let logged = &db.recent_results(1).unwrap()[0];
    assert_eq!(logged.game, GameKind::Cloze);
    assert_eq!(logged.score, logged.total);
}

#[test]
fn study_session_saves_learned_percentage() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_with_card(dir.path(), 4);

    let mut study = StudySession::start(&store, "fruit").unwrap();
    study.session.mark_learned(true);
    while study.session.next() {
        study.session.mark_learned(true);
    }
    // Un-learn the last one.
    study.session.mark_learned(false);

    let mut db = ProgressDb::with_path(dir.path().join("progress.db")).unwrap();
    let pct = study.finish(&mut db).unwrap();
    assert_eq!(pct, 75.0);
    assert_eq!(db.latest_progress("fruit").unwrap(), Some(75.0));

    let mut csv = Vec::new();
    db.export_results_csv(&mut csv).unwrap();
    assert!(String::from_utf8(csv).unwrap().starts_with("date,game,card"));
}
