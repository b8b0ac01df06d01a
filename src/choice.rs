use crate::deck::WordPair;
use crate::error::GameError;
use crate::shuffle::shuffle;
use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;

/// Which language the prompt is shown in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Direction {
    EnglishToIndonesian,
    IndonesianToEnglish,
}

impl Direction {
    pub fn toggled(&self) -> Self {
        match self {
            Direction::EnglishToIndonesian => Direction::IndonesianToEnglish,
            Direction::IndonesianToEnglish => Direction::EnglishToIndonesian,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub text: String,
    pub is_correct: bool,
}

/// One on-screen question: a prompt plus shuffled options, exactly one of
/// which is correct. Regenerated whenever the index or direction changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceQuestion {
    pub prompt: String,
    pub options: Vec<ChoiceOption>,
    pub direction: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub score: usize,
}

/// State machine for the multiple-choice translation game.
///
/// Pair order is shuffled once per session; each pair yields one question.
/// Decks of 2 or 3 pairs produce questions with fewer than 4 options
/// instead of failing (see DESIGN.md).
#[derive(Debug)]
pub struct ChoicePuzzle {
    pairs: Vec<WordPair>,
    pub current_index: usize,
    pub direction: Direction,
    pub score: usize,
    pub answered: bool,
    pub question: ChoiceQuestion,
}

const MAX_DISTRACTORS: usize = 3;

impl ChoicePuzzle {
    pub fn new<R: Rng>(
        pairs: Vec<WordPair>,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if pairs.len() < 2 {
            return Err(GameError::Validation(
                "multiple choice needs at least 2 word pairs".into(),
            ));
        }

        let pairs = shuffle(&pairs, rng);
        let question = generate_question(&pairs, 0, direction, rng);
        Ok(Self {
            pairs,
            current_index: 0,
            direction,
            score: 0,
            answered: false,
            question,
        })
    }

    /// Answer the current question. One shot: once answered, further input
    /// is rejected until `advance` moves on.
    pub fn answer(&mut self, option_index: usize) -> Option<AnswerOutcome> {
        if self.answered {
            return None;
        }
        let option = self.question.options.get(option_index)?;
        let correct = option.is_correct;
        self.answered = true;
        if correct {
            self.score += 1;
        }
        Some(AnswerOutcome {
            correct,
            score: self.score,
        })
    }

    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.pairs.len()
    }

    /// Move to the next question and regenerate its options. Returns false
    /// at the end of the sequence.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_index += 1;
        self.answered = false;
        self.question = generate_question(&self.pairs, self.current_index, self.direction, rng);
        true
    }

    /// Flip the translation direction and regenerate the current question
    /// without touching index or score.
    pub fn toggle_direction<R: Rng>(&mut self, rng: &mut R) {
        self.direction = self.direction.toggled();
        self.question = generate_question(&self.pairs, self.current_index, self.direction, rng);
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.pairs = shuffle(&self.pairs, rng);
        self.current_index = 0;
        self.score = 0;
        self.answered = false;
        self.question = generate_question(&self.pairs, 0, self.direction, rng);
    }

    pub fn is_complete(&self) -> bool {
        self.answered && !self.has_next()
    }

    pub fn total_questions(&self) -> usize {
        self.pairs.len()
    }
}

/// Build the question for `index`: the pair's own translation plus up to
/// three distractors sampled without replacement from the other pairs,
/// shuffled once so the correct option lands anywhere.
fn generate_question<R: Rng>(
    pairs: &[WordPair],
    index: usize,
    direction: Direction,
    rng: &mut R,
) -> ChoiceQuestion {
    let target = &pairs[index];
    let (prompt, answer) = match direction {
        Direction::EnglishToIndonesian => (target.english.clone(), target.indonesian.clone()),
        Direction::IndonesianToEnglish => (target.indonesian.clone(), target.english.clone()),
    };

    let pool: Vec<&WordPair> = pairs
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, p)| p)
        .collect();
    let distractors = pool.choose_multiple(rng, MAX_DISTRACTORS.min(pool.len()));

    let mut options = vec![ChoiceOption {
        text: answer,
        is_correct: true,
    }];
    options.extend(distractors.map(|p| ChoiceOption {
        text: match direction {
            Direction::EnglishToIndonesian => p.indonesian.clone(),
            Direction::IndonesianToEnglish => p.english.clone(),
        },
        is_correct: false,
    }));

    ChoiceQuestion {
        prompt,
        options: shuffle(&options, rng),
        direction,
    }
}
