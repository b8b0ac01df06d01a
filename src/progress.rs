use crate::app_dirs::AppDirs;
use crate::deck::WordPair;
use crate::error::GameError;
use crate::util::percentage;
use chrono::{DateTime, Local};
use itertools::Itertools;
use rusqlite::{params, Connection};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which game produced a result row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum GameKind {
    Matching,
    Choice,
    Cloze,
}

/// One finished game session, appended to the results log.
#[derive(Debug, Clone)]
pub struct GameResult {
    pub game: GameKind,
    pub card_id: String,
    pub score: usize,
    pub total: usize,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Local>,
}

/// Sink for learned-progress updates; returns the card's new percentage.
pub trait ProgressStore {
    fn save_progress(&mut self, card_id: &str, pairs: &[WordPair]) -> Result<f64, GameError>;
    fn latest_progress(&self, card_id: &str) -> Result<Option<f64>, GameError>;
}

/// SQLite-backed progress and results store.
#[derive(Debug)]
pub struct ProgressDb {
    conn: Connection,
}

impl ProgressDb {
    /// Open (or create) the database under the state directory.
    pub fn new() -> Result<Self, GameError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("kosakata_progress.db"));
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::open(Connection::open(&db_path)?)
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open(Connection::open(path.as_ref())?)
    }

    /// Private database for tests.
    pub fn in_memory() -> Result<Self, GameError> {
        Self::open(Connection::open_in_memory()?)
    }

    fn open(conn: Connection) -> Result<Self, GameError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS card_progress (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                card_id TEXT NOT NULL,
                learned_words INTEGER NOT NULL,
                total_words INTEGER NOT NULL,
                percentage REAL NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS game_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game TEXT NOT NULL,
                card_id TEXT NOT NULL,
                score INTEGER NOT NULL,
                total INTEGER NOT NULL,
                accuracy REAL NOT NULL,
                elapsed_secs REAL NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_card_progress_card ON card_progress(card_id)",
            [],
        )?;
        Ok(ProgressDb { conn })
    }

    pub fn record_game_result(&self, result: &GameResult) -> Result<(), GameError> {
        self.conn.execute(
            r#"
            INSERT INTO game_results (game, card_id, score, total, accuracy, elapsed_secs, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                result.game.to_string(),
                result.card_id,
                result.score as i64,
                result.total as i64,
                result.accuracy,
                result.elapsed_secs,
                result.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn recent_results(&self, limit: usize) -> Result<Vec<GameResult>, GameError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT game, card_id, score, total, accuracy, elapsed_secs, timestamp
            FROM game_results ORDER BY id DESC LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let game: String = row.get(0)?;
            let timestamp: String = row.get(6)?;
            Ok(GameResult {
                game: match game.as_str() {
                    "Matching" => GameKind::Matching,
                    "Choice" => GameKind::Choice,
                    _ => GameKind::Cloze,
                },
                card_id: row.get(1)?,
                score: row.get::<_, i64>(2)? as usize,
                total: row.get::<_, i64>(3)? as usize,
                accuracy: row.get(4)?,
                elapsed_secs: row.get(5)?,
                timestamp: DateTime::parse_from_rfc3339(&timestamp)
                    .map(|dt| dt.with_timezone(&Local))
                    .unwrap_or_else(|_| Local::now()),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Latest stored percentage per card, best first.
    pub fn card_summaries(&self) -> Result<Vec<(String, f64)>, GameError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT card_id, percentage FROM card_progress
            WHERE id IN (SELECT MAX(id) FROM card_progress GROUP BY card_id)
            "#,
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;
        let summaries = rows
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal))
            .collect();
        Ok(summaries)
    }

    /// Dump the results log as CSV.
    pub fn export_results_csv<W: Write>(&self, writer: W) -> Result<(), GameError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "date",
            "game",
            "card",
            "score",
            "total",
            "accuracy",
            "elapsed_secs",
        ])
        .map_err(|e| GameError::Data(e.to_string()))?;

        let mut stmt = self.conn.prepare(
            "SELECT timestamp, game, card_id, score, total, accuracy, elapsed_secs FROM game_results ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
            ))
        })?;
        for row in rows {
            let (ts, game, card, score, total, accuracy, elapsed) = row?;
            csv.write_record([
                ts,
                game,
                card,
                score.to_string(),
                total.to_string(),
                format!("{:.1}", accuracy),
                format!("{:.2}", elapsed),
            ])
            .map_err(|e| GameError::Data(e.to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl ProgressStore for ProgressDb {
    fn save_progress(&mut self, card_id: &str, pairs: &[WordPair]) -> Result<f64, GameError> {
        let learned = pairs.iter().filter(|p| p.learned).count();
        let pct = percentage(learned, pairs.len());
        self.conn.execute(
            r#"
            INSERT INTO card_progress (card_id, learned_words, total_words, percentage, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                card_id,
                learned as i64,
                pairs.len() as i64,
                pct,
                Local::now().to_rfc3339(),
            ],
        )?;
        Ok(pct)
    }

    fn latest_progress(&self, card_id: &str) -> Result<Option<f64>, GameError> {
        let mut stmt = self.conn.prepare(
            "SELECT percentage FROM card_progress WHERE card_id = ?1 ORDER BY id DESC LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![card_id], |row| row.get::<_, f64>(0))?;
        match rows.next() {
            Some(pct) => Ok(Some(pct?)),
            None => Ok(None),
        }
    }
}
