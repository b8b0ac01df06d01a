use crate::deck::WordPair;
use crate::error::GameError;
use crate::shuffle::shuffle;
use crate::util::round1;
use rand::Rng;
use std::collections::HashSet;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    English,
    Indonesian,
}

/// One clickable bubble in a column. Two items share `pair_index` iff they
/// come from the same word pair; identity is the `id`, never the text, so
/// duplicate translation text cannot confuse match resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchItem {
    pub id: String,
    pub text: String,
    pub side: Side,
    pub pair_index: usize,
}

/// Result of a single click, reported back to the session for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Click on an already-resolved item; nothing changed.
    Ignored,
    Selected,
    /// Second click on the selected item toggles it off; no attempt counted.
    Deselected,
    Matched { complete: bool },
    Mismatched,
}

/// State machine for the bubble-matching game.
#[derive(Debug)]
pub struct MatchingPuzzle {
    pub english_column: Vec<MatchItem>,
    pub indonesian_column: Vec<MatchItem>,
    pub selected: Option<MatchItem>,
    pub matched: HashSet<usize>,
    pub incorrect: HashSet<usize>,
    pub attempts: usize,
    pub correct_matches: usize,
    pub started_at: SystemTime,
    pub finished_at: Option<SystemTime>,
    pairs: Vec<WordPair>,
}

impl MatchingPuzzle {
    pub fn new<R: Rng>(pairs: Vec<WordPair>, rng: &mut R) -> Result<Self, GameError> {
        if pairs.is_empty() {
            return Err(GameError::Validation(
                "cannot build a matching puzzle from an empty card".into(),
            ));
        }

        let (english_column, indonesian_column) = Self::build_columns(&pairs, rng);
        Ok(Self {
            english_column,
            indonesian_column,
            selected: None,
            matched: HashSet::new(),
            incorrect: HashSet::new(),
            attempts: 0,
            correct_matches: 0,
            started_at: SystemTime::now(),
            finished_at: None,
            pairs,
        })
    }

    /// The columns are shuffled independently so rows never line up
    /// with their translation by construction.
    fn build_columns<R: Rng>(
        pairs: &[WordPair],
        rng: &mut R,
    ) -> (Vec<MatchItem>, Vec<MatchItem>) {
        let english: Vec<MatchItem> = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| MatchItem {
                id: format!("en-{}", i),
                text: p.english.clone(),
                side: Side::English,
                pair_index: i,
            })
            .collect();
        let indonesian: Vec<MatchItem> = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| MatchItem {
                id: format!("id-{}", i),
                text: p.indonesian.clone(),
                side: Side::Indonesian,
                pair_index: i,
            })
            .collect();

        (shuffle(&english, rng), shuffle(&indonesian, rng))
    }

    pub fn item(&self, id: &str) -> Option<&MatchItem> {
        self.english_column
            .iter()
            .chain(self.indonesian_column.iter())
            .find(|item| item.id == id)
    }

    /// Process a click on the item with the given id.
    pub fn select(&mut self, id: &str) -> SelectOutcome {
        let item = match self.item(id) {
            Some(item) => item.clone(),
            None => return SelectOutcome::Ignored,
        };

        // Resolved items are disabled.
        if self.matched.contains(&item.pair_index) || self.incorrect.contains(&item.pair_index) {
            return SelectOutcome::Ignored;
        }

        let previous = match self.selected.take() {
            None => {
                self.selected = Some(item);
                return SelectOutcome::Selected;
            }
            Some(prev) => prev,
        };

        if previous.id == item.id {
            return SelectOutcome::Deselected;
        }

        self.attempts += 1;
        if previous.pair_index == item.pair_index && previous.side != item.side {
            self.matched.insert(item.pair_index);
            self.incorrect.remove(&item.pair_index);
            self.correct_matches += 1;
            let complete = self.is_complete();
            if complete && self.finished_at.is_none() {
                self.finished_at = Some(SystemTime::now());
            }
            SelectOutcome::Matched { complete }
        } else {
            self.incorrect.insert(previous.pair_index);
            self.incorrect.insert(item.pair_index);
            SelectOutcome::Mismatched
        }
    }

    /// Reshuffle both columns and start over with fresh stats.
    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        let (english, indonesian) = Self::build_columns(&self.pairs, rng);
        self.english_column = english;
        self.indonesian_column = indonesian;
        self.selected = None;
        self.matched.clear();
        self.incorrect.clear();
        self.attempts = 0;
        self.correct_matches = 0;
        self.started_at = SystemTime::now();
        self.finished_at = None;
    }

    pub fn is_complete(&self) -> bool {
        self.matched.len() == self.pairs.len()
    }

    pub fn total_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn accuracy(&self) -> f64 {
        match self.attempts {
            0 => 0.0,
            n => round1(self.correct_matches as f64 / n as f64 * 100.0),
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self.finished_at {
            Some(end) => end
                .duration_since(self.started_at)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
            None => 0.0,
        }
    }
}
