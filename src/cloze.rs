use crate::error::GameError;
use crate::shuffle::shuffle;
use rand::Rng;

/// Minimum token count for a feasible puzzle.
const MIN_WORD_COUNT: usize = 10;
/// Only words longer than this many characters can be hidden.
const MIN_HIDDEN_WORD_LEN: usize = 2;
/// At least this many words are hidden, eligible pool permitting.
const MIN_HIDDEN: usize = 3;

/// One word of the source text, in original order. Hidden tokens start empty
/// and are filled by dragging pool words in; visible tokens never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClozeToken {
    pub index: usize,
    pub original_word: String,
    pub hidden: bool,
    pub placed: Option<DraggableWord>,
    pub locked: bool,
}

impl ClozeToken {
    /// The word currently showing in this position, if any.
    pub fn current_word(&self) -> Option<&str> {
        if self.hidden {
            self.placed.as_ref().map(|w| w.word.as_str())
        } else {
            Some(&self.original_word)
        }
    }
}

/// A word available to drop into a blank. Identity is ephemeral: entries
/// returning to the pool get a fresh id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggableWord {
    pub id: String,
    pub word: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub correct_count: usize,
    pub total_hidden: usize,
    pub complete: bool,
}

/// State machine for the drag-and-drop fill-in-the-blank game.
#[derive(Debug)]
pub struct ClozePuzzle {
    pub tokens: Vec<ClozeToken>,
    pub pool: Vec<DraggableWord>,
    next_word_id: usize,
}

impl ClozePuzzle {
    pub fn new<R: Rng>(raw_text: &str, rng: &mut R) -> Result<Self, GameError> {
        let words: Vec<&str> = raw_text.split_whitespace().collect();
        if words.len() < MIN_WORD_COUNT {
            return Err(GameError::Validation(format!(
                "text must contain at least {} words, got {}",
                MIN_WORD_COUNT,
                words.len()
            )));
        }

        let hidden_indices = select_hidden_indices(&words, rng);

        let tokens: Vec<ClozeToken> = words
            .iter()
            .enumerate()
            .map(|(index, word)| ClozeToken {
                index,
                original_word: word.to_string(),
                hidden: hidden_indices.contains(&index),
                placed: None,
                locked: false,
            })
            .collect();

        let mut next_word_id = 0;
        let pool_words: Vec<DraggableWord> = hidden_indices
            .iter()
            .map(|&i| {
                let entry = DraggableWord {
                    id: format!("w-{}", next_word_id),
                    word: words[i].to_string(),
                };
                next_word_id += 1;
                entry
            })
            .collect();

        Ok(Self {
            tokens,
            pool: shuffle(&pool_words, rng),
            next_word_id,
        })
    }

    /// Discard all state and rebuild from (the same or new) text.
    pub fn reset<R: Rng>(&mut self, raw_text: &str, rng: &mut R) -> Result<(), GameError> {
        *self = Self::new(raw_text, rng)?;
        Ok(())
    }

    /// Drop the pool or already-placed word `word_id` onto the blank at
    /// `token_index`. Invalid targets are no-ops. Whatever occupied the
    /// target beforehand returns to the pool; a word dragged from another
    /// blank moves rather than duplicates.
    pub fn place_word(&mut self, word_id: &str, token_index: usize) -> bool {
        let valid_target = self
            .tokens
            .get(token_index)
            .map(|t| t.hidden && !t.locked)
            .unwrap_or(false);
        if !valid_target {
            return false;
        }

        let dragged = match self.take_word(word_id) {
            Some(word) => word,
            None => return false,
        };

        if let Some(evicted) = self.tokens[token_index].placed.take() {
            let entry = self.fresh_entry(evicted.word);
            self.pool.push(entry);
        }
        self.tokens[token_index].placed = Some(dragged);
        true
    }

    /// Remove the word from wherever it currently lives: the pool, or an
    /// unlocked blank.
    fn take_word(&mut self, word_id: &str) -> Option<DraggableWord> {
        if let Some(pos) = self.pool.iter().position(|w| w.id == word_id) {
            return Some(self.pool.remove(pos));
        }
        self.tokens
            .iter_mut()
            .find(|t| {
                !t.locked
                    && t.placed
                        .as_ref()
                        .map(|w| w.id == word_id)
                        .unwrap_or(false)
            })
            .and_then(|t| t.placed.take())
    }

    /// Score the blanks: correct fills lock in place, wrong fills are
    /// cleared back to the pool for another try.
    pub fn check_answers(&mut self) -> CheckReport {
        let mut returned: Vec<DraggableWord> = Vec::new();

        for token in self.tokens.iter_mut().filter(|t| t.hidden) {
            if token.locked {
                continue;
            }
            match token.placed.take() {
                Some(word) if word.word == token.original_word => {
                    token.placed = Some(word);
                    token.locked = true;
                }
                Some(word) => returned.push(word),
                None => {}
            }
        }
        for word in returned {
            let entry = self.fresh_entry(word.word);
            self.pool.push(entry);
        }

        let correct_count = self.tokens.iter().filter(|t| t.locked).count();
        let total_hidden = self.hidden_count();
        CheckReport {
            correct_count,
            total_hidden,
            complete: correct_count == total_hidden,
        }
    }

    pub fn hidden_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.hidden).count()
    }

    pub fn is_complete(&self) -> bool {
        self.tokens.iter().filter(|t| t.hidden).all(|t| t.locked)
    }

    fn fresh_entry(&mut self, word: String) -> DraggableWord {
        let entry = DraggableWord {
            id: format!("w-{}", self.next_word_id),
            word,
        };
        self.next_word_id += 1;
        entry
    }
}

/// Pick which token indices to hide. Eligible words are longer than two
/// characters; each chosen index blacklists its immediate neighbors so no
/// two blanks are adjacent. Sampling repeats until the target count is
/// reached or no candidates remain.
fn select_hidden_indices<R: Rng>(words: &[&str], rng: &mut R) -> Vec<usize> {
    let eligible: Vec<usize> = words
        .iter()
        .enumerate()
        .filter(|(_, w)| w.chars().count() > MIN_HIDDEN_WORD_LEN)
        .map(|(i, _)| i)
        .collect();

    let fraction = if words.len() > 6 { 0.4 } else { 0.3 };
    let target = ((words.len() as f64 * fraction).floor() as usize)
        .max(MIN_HIDDEN)
        .min(eligible.len());

    let mut candidates = eligible;
    let mut hidden = Vec::new();
    while hidden.len() < target && !candidates.is_empty() {
        let pick = candidates[rng.gen_range(0..candidates.len())];
        hidden.push(pick);
        candidates.retain(|&i| i + 1 != pick && i != pick && i != pick + 1);
    }
    hidden.sort_unstable();
    hidden
}
