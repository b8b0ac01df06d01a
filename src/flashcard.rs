use crate::deck::WordPair;
use crate::error::GameError;
use crate::util::percentage;

/// Flashcard traversal over one card's pairs. The only flow that mutates
/// the `learned` flags; the games read pairs but never write them back.
#[derive(Debug)]
pub struct FlashcardSession {
    pub card_id: String,
    pub pairs: Vec<WordPair>,
    pub current_index: usize,
    pub revealed: bool,
}

impl FlashcardSession {
    pub fn new(card_id: &str, pairs: Vec<WordPair>) -> Result<Self, GameError> {
        if pairs.is_empty() {
            return Err(GameError::Validation(
                "cannot study an empty card".into(),
            ));
        }
        Ok(Self {
            card_id: card_id.to_string(),
            pairs,
            current_index: 0,
            revealed: false,
        })
    }

    pub fn current(&self) -> &WordPair {
        &self.pairs[self.current_index]
    }

    /// Show or hide the translation side of the current card.
    pub fn flip(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn mark_learned(&mut self, learned: bool) {
        self.pairs[self.current_index].learned = learned;
    }

    /// Move to the next pair; false once the last pair is showing.
    pub fn next(&mut self) -> bool {
        if self.current_index + 1 < self.pairs.len() {
            self.current_index += 1;
            self.revealed = false;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            self.revealed = false;
            true
        } else {
            false
        }
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.pairs.len()
    }

    pub fn learned_percentage(&self) -> f64 {
        let learned = self.pairs.iter().filter(|p| p.learned).count();
        percentage(learned, self.pairs.len())
    }
}
