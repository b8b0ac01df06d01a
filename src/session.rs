use crate::choice::{AnswerOutcome, ChoicePuzzle, Direction};
use crate::cloze::{CheckReport, ClozePuzzle};
use crate::deck::WordPairSource;
use crate::error::GameError;
use crate::flashcard::FlashcardSession;
use crate::matching::{MatchingPuzzle, SelectOutcome};
use crate::progress::{GameKind, GameResult, ProgressDb, ProgressStore};
use crate::util::percentage;
use chrono::Local;
use rand::Rng;

/// Per-game orchestration: validates input before any engine is built,
/// forwards UI events to the engine's transitions, and reports completion
/// so the caller can raise the celebration and log the result. The games
/// never write learned progress back; only the flashcard flow does.

#[derive(Debug)]
pub struct MatchingSession {
    pub card_id: String,
    pub puzzle: MatchingPuzzle,
    pub started: bool,
}

impl MatchingSession {
    pub fn start<R: Rng>(
        source: &dyn WordPairSource,
        card_id: &str,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let pairs = source.word_pairs(card_id)?;
        if pairs.is_empty() {
            return Err(GameError::Validation(format!(
                "card '{}' has no word pairs",
                card_id
            )));
        }
        Ok(Self {
            card_id: card_id.to_string(),
            puzzle: MatchingPuzzle::new(pairs, rng)?,
            started: false,
        })
    }

    pub fn click(&mut self, item_id: &str) -> SelectOutcome {
        self.started = true;
        self.puzzle.select(item_id)
    }

    pub fn restart<R: Rng>(&mut self, rng: &mut R) {
        self.started = false;
        self.puzzle.reset(rng);
    }

    pub fn result(&self) -> GameResult {
        GameResult {
            game: GameKind::Matching,
            card_id: self.card_id.clone(),
            score: self.puzzle.correct_matches,
            total: self.puzzle.total_pairs(),
            accuracy: self.puzzle.accuracy(),
            elapsed_secs: self.puzzle.elapsed_seconds(),
            timestamp: Local::now(),
        }
    }

    pub fn log_result(&self, db: &ProgressDb) -> Result<(), GameError> {
        db.record_game_result(&self.result())
    }
}

#[derive(Debug)]
pub struct ChoiceSession {
    pub card_id: String,
    pub puzzle: ChoicePuzzle,
    pub started: bool,
}

impl ChoiceSession {
    pub fn start<R: Rng>(
        source: &dyn WordPairSource,
        card_id: &str,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let pairs = source.word_pairs(card_id)?;
        if pairs.is_empty() {
            return Err(GameError::Validation(format!(
                "card '{}' has no word pairs",
                card_id
            )));
        }
        Ok(Self {
            card_id: card_id.to_string(),
            puzzle: ChoicePuzzle::new(pairs, direction, rng)?,
            started: false,
        })
    }

    pub fn answer(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        self.started = true;
        self.puzzle.answer(option_index)
    }

    pub fn result(&self) -> GameResult {
        GameResult {
            game: GameKind::Choice,
            card_id: self.card_id.clone(),
            score: self.puzzle.score,
            total: self.puzzle.total_questions(),
            accuracy: percentage(self.puzzle.score, self.puzzle.total_questions()),
            elapsed_secs: 0.0,
            timestamp: Local::now(),
        }
    }

    pub fn log_result(&self, db: &ProgressDb) -> Result<(), GameError> {
        db.record_game_result(&self.result())
    }
}

pub struct ClozeSession {
    pub card_id: String,
    pub puzzle: ClozePuzzle,
    pub started: bool,
    pub last_report: Option<CheckReport>,
}

impl ClozeSession {
    pub fn start<R: Rng>(card_id: &str, raw_text: &str, rng: &mut R) -> Result<Self, GameError> {
        Ok(Self {
            card_id: card_id.to_string(),
            puzzle: ClozePuzzle::new(raw_text, rng)?,
            started: false,
            last_report: None,
        })
    }

    pub fn place(&mut self, word_id: &str, token_index: usize) -> bool {
        self.started = true;
        self.puzzle.place_word(word_id, token_index)
    }

    pub fn check(&mut self) -> CheckReport {
        let report = self.puzzle.check_answers();
        self.last_report = Some(report);
        report
    }

    pub fn result(&self) -> GameResult {
        let (score, total) = match self.last_report {
            Some(report) => (report.correct_count, report.total_hidden),
            None => (0, self.puzzle.hidden_count()),
        };
        GameResult {
            game: GameKind::Cloze,
            card_id: self.card_id.clone(),
            score,
            total,
            accuracy: percentage(score, total),
            elapsed_secs: 0.0,
            timestamp: Local::now(),
        }
    }

    pub fn log_result(&self, db: &ProgressDb) -> Result<(), GameError> {
        db.record_game_result(&self.result())
    }
}

/// Flashcard study over a card, ending with a progress save. This is the
/// single path that persists learned flags.
pub struct StudySession {
    pub session: FlashcardSession,
}

impl StudySession {
    pub fn start(source: &dyn WordPairSource, card_id: &str) -> Result<Self, GameError> {
        let pairs = source.word_pairs(card_id)?;
        if pairs.is_empty() {
            return Err(GameError::Validation(format!(
                "card '{}' has no word pairs",
                card_id
            )));
        }
        Ok(Self {
            session: FlashcardSession::new(card_id, pairs)?,
        })
    }

    /// Persist the learned flags; returns the card's new percentage.
    pub fn finish(&self, store: &mut dyn ProgressStore) -> Result<f64, GameError> {
        store.save_progress(&self.session.card_id, &self.session.pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, StaticDeckSource, WordPair};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source(n: usize) -> StaticDeckSource {
        StaticDeckSource {
            cards: vec![Card {
                id: "animals".into(),
                name: "Animals".into(),
                target_days: 5,
                word_pairs: (0..n)
                    .map(|i| WordPair::new(&format!("en{}", i), &format!("id{}", i)))
                    .collect(),
            }],
        }
    }

    #[test]
    fn missing_card_never_builds_a_puzzle() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = MatchingSession::start(&source(3), "nope", &mut rng);
        assert!(matches!(result, Err(GameError::NotFound(_))));
    }

    #[test]
    fn empty_card_is_rejected_before_building() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = MatchingSession::start(&source(0), "animals", &mut rng);
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn matching_session_logs_result_on_completion() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = MatchingSession::start(&source(2), "animals", &mut rng).unwrap();
        assert!(!session.started);

        session.click("en-0");
        session.click("id-0");
        session.click("en-1");
        let outcome = session.click("id-1");
        assert_eq!(outcome, SelectOutcome::Matched { complete: true });
        assert!(session.started);

        let db = ProgressDb::in_memory().unwrap();
        session.log_result(&db).unwrap();
        let recent = db.recent_results(1).unwrap();
        assert_eq!(recent[0].game, GameKind::Matching);
        assert_eq!(recent[0].score, 2);
        assert_eq!(recent[0].accuracy, 100.0);
    }

    #[test]
    fn choice_session_result_reports_score_share() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session =
            ChoiceSession::start(&source(4), "animals", Direction::EnglishToIndonesian, &mut rng)
                .unwrap();

        loop {
            let correct = session
                .puzzle
                .question
                .options
                .iter()
                .position(|o| o.is_correct)
                .unwrap();
            session.answer(correct);
            if !session.puzzle.advance(&mut rng) {
                break;
            }
        }

        let result = session.result();
        assert_eq!(result.score, 4);
        assert_eq!(result.total, 4);
        assert_eq!(result.accuracy, 100.0);
    }

    #[test]
    fn cloze_session_tracks_last_check() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = "belajar bahasa baru membutuhkan waktu latihan dan kesabaran setiap hari";
        let mut session = ClozeSession::start("animals", text, &mut rng).unwrap();

        assert_eq!(session.result().score, 0);
        let report = session.check();
        assert_eq!(report.correct_count, 0);
        assert_eq!(session.result().total, session.puzzle.hidden_count());
    }

    #[test]
    fn study_session_saves_progress() {
        let study_source = source(4);
        let mut study = StudySession::start(&study_source, "animals").unwrap();
        study.session.mark_learned(true);
        study.session.next();
        study.session.mark_learned(true);

        let mut db = ProgressDb::in_memory().unwrap();
        let pct = study.finish(&mut db).unwrap();
        assert_eq!(pct, 50.0);
        assert_eq!(db.latest_progress("animals").unwrap(), Some(50.0));
    }
}
