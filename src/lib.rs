// Library surface for the puzzle engines, session controllers, and stores.
// The binary in main.rs is a thin line-oriented front end over these.
pub mod app_dirs;
pub mod celebration;
pub mod choice;
pub mod cloze;
pub mod config;
pub mod deck;
pub mod error;
pub mod flashcard;
pub mod matching;
pub mod progress;
pub mod session;
pub mod shuffle;
pub mod util;
