use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("progress.db"))
    }

    pub fn decks_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("decks.json"))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kosakata").map(|pd| pd.config_dir().join("config.json"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("kosakata"),
            )
        } else {
            ProjectDirs::from("", "", "kosakata").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
