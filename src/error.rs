use std::fmt;
use std::io;

/// Error taxonomy for puzzle construction and persistence.
///
/// Normal game-play inputs (wrong match, wrong drop, wrong answer) are
/// regular state transitions and never surface here.
#[derive(Debug)]
pub enum GameError {
    /// A precondition failed before a puzzle could be built (empty deck,
    /// cloze text under the minimum word count).
    Validation(String),
    /// Upstream deck data is malformed (e.g. a word pair with an empty side).
    Data(String),
    /// The requested card does not exist.
    NotFound(String),
    Io(io::Error),
    Db(rusqlite::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Validation(msg) => write!(f, "validation failed: {}", msg),
            GameError::Data(msg) => write!(f, "bad card data: {}", msg),
            GameError::NotFound(what) => write!(f, "not found: {}", what),
            GameError::Io(e) => write!(f, "io error: {}", e),
            GameError::Db(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            GameError::Db(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        GameError::Io(e)
    }
}

impl From<rusqlite::Error> for GameError {
    fn from(e: rusqlite::Error) -> Self {
        GameError::Db(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let err = GameError::Validation("need at least 10 words".into());
        assert_eq!(err.to_string(), "validation failed: need at least 10 words");

        let err = GameError::NotFound("card 'animals'".into());
        assert_eq!(err.to_string(), "not found: card 'animals'");
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let err: GameError = io_err.into();
        assert!(matches!(err, GameError::Io(_)));
    }
}
