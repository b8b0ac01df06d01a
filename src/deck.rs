use crate::error::GameError;
use crate::util::percentage;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static DECK_DIR: Dir = include_dir!("src/decks");

/// One English/Indonesian vocabulary entry belonging to a card.
///
/// Identity is positional within the card's list; only the flashcard flow
/// mutates `learned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub english: String,
    pub indonesian: String,
    #[serde(default)]
    pub learned: bool,
}

impl WordPair {
    pub fn new(english: &str, indonesian: &str) -> Self {
        Self {
            english: english.to_string(),
            indonesian: indonesian.to_string(),
            learned: false,
        }
    }
}

/// A named collection of word pairs with a target-completion-day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub target_days: u32,
    pub word_pairs: Vec<WordPair>,
}

impl Card {
    /// Share of pairs marked learned, rounded to one decimal.
    pub fn learned_percentage(&self) -> f64 {
        let learned = self.word_pairs.iter().filter(|p| p.learned).count();
        percentage(learned, self.word_pairs.len())
    }
}

/// Reject malformed upstream data before any puzzle is built from it.
pub fn validate_pairs(pairs: &[WordPair]) -> Result<(), GameError> {
    for (i, pair) in pairs.iter().enumerate() {
        if pair.english.trim().is_empty() || pair.indonesian.trim().is_empty() {
            return Err(GameError::Data(format!(
                "word pair {} has an empty side",
                i
            )));
        }
    }
    Ok(())
}

/// Cards shipped with the binary so it is usable before any deck file exists.
pub fn starter_cards() -> Vec<Card> {
    DECK_DIR
        .files()
        .filter_map(|file| file.contents_utf8())
        .filter_map(|json| serde_json::from_str::<Card>(json).ok())
        .collect()
}

/// Source of the word pairs a game session is built from.
pub trait WordPairSource {
    fn word_pairs(&self, card_id: &str) -> Result<Vec<WordPair>, GameError>;
}

pub trait DeckStore {
    fn load(&self) -> Vec<Card>;
    fn save(&self, cards: &[Card]) -> Result<(), GameError>;
}

/// JSON-file-backed deck store; falls back to the embedded starter deck
/// when no file exists yet.
#[derive(Debug, Clone)]
pub struct FileDeckStore {
    path: PathBuf,
}

impl FileDeckStore {
    pub fn new() -> Self {
        let path = crate::app_dirs::AppDirs::decks_path()
            .unwrap_or_else(|| PathBuf::from("kosakata_decks.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileDeckStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckStore for FileDeckStore {
    fn load(&self) -> Vec<Card> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cards) = serde_json::from_slice::<Vec<Card>>(&bytes) {
                return cards;
            }
        }
        starter_cards()
    }

    fn save(&self, cards: &[Card]) -> Result<(), GameError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cards).unwrap_or_default();
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl WordPairSource for FileDeckStore {
    fn word_pairs(&self, card_id: &str) -> Result<Vec<WordPair>, GameError> {
        let cards = self.load();
        let card = cards
            .into_iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| GameError::NotFound(format!("card '{}'", card_id)))?;
        validate_pairs(&card.word_pairs)?;
        Ok(card.word_pairs)
    }
}

/// In-memory source for tests and pre-loaded sessions.
#[derive(Debug, Clone)]
pub struct StaticDeckSource {
    pub cards: Vec<Card>,
}

impl WordPairSource for StaticDeckSource {
    fn word_pairs(&self, card_id: &str) -> Result<Vec<WordPair>, GameError> {
        let card = self
            .cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| GameError::NotFound(format!("card '{}'", card_id)))?;
        validate_pairs(&card.word_pairs)?;
        Ok(card.word_pairs.clone())
    }
}
