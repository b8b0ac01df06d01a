use clap::{Parser, Subcommand};
use kosakata::celebration::CelebrationAnimation;
use kosakata::choice::Direction;
use kosakata::cloze::ClozeToken;
use kosakata::config::{Config, ConfigStore, FileConfigStore};
use kosakata::deck::{DeckStore, FileDeckStore};
use kosakata::matching::SelectOutcome;
use kosakata::progress::{ProgressDb, ProgressStore};
use kosakata::session::{ChoiceSession, ClozeSession, MatchingSession, StudySession};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// terminal vocabulary trainer for English/Indonesian word pairs
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Study English/Indonesian word cards as flashcards and reinforce them with three games: bubble matching, multiple-choice translation, and fill-in-the-blank."
)]
struct Cli {
    /// card to play (see `cards` for the list)
    #[clap(short, long, default_value = "starter")]
    card: String,

    /// seed the random generator for reproducible puzzles
    #[clap(long)]
    seed: Option<u64>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list available cards with their learned progress
    Cards,
    /// study flashcards and save learned progress
    Flashcards,
    /// play the bubble-matching game
    Matching,
    /// play the multiple-choice translation game
    Choice {
        /// prompt language; defaults to the configured direction
        #[clap(long, value_enum)]
        direction: Option<Direction>,
    },
    /// play fill-in-the-blank over free text (at least 10 words)
    Cloze {
        /// the text to build blanks from
        text: String,
    },
    /// show recent game results
    Results,
    /// dump the results log as CSV to stdout
    Export,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let decks = FileDeckStore::new();
    let config = FileConfigStore::new().load();

    match cli.command {
        Command::Cards => run_cards(&decks),
        Command::Flashcards => run_flashcards(&decks, &cli.card),
        Command::Matching => run_matching(&decks, &cli.card, &config, &mut rng),
        Command::Choice { direction } => {
            let direction = direction.unwrap_or_else(|| config.direction());
            run_choice(&decks, &cli.card, direction, &config, &mut rng)
        }
        Command::Cloze { text } => run_cloze(&cli.card, &text, &config, &mut rng),
        Command::Results => run_results(),
        Command::Export => run_export(),
    }
}

fn run_cards(decks: &FileDeckStore) -> Result<(), Box<dyn Error>> {
    let db = ProgressDb::new().ok();
    for card in decks.load() {
        let saved = db
            .as_ref()
            .and_then(|db| db.latest_progress(&card.id).ok().flatten());
        let pct = saved.unwrap_or_else(|| card.learned_percentage());
        println!(
            "{:<12} {:<24} {:>3} pairs  {:>5.1}% learned  ({} day target)",
            card.id,
            card.name,
            card.word_pairs.len(),
            pct,
            card.target_days
        );
    }
    Ok(())
}

fn run_flashcards(decks: &FileDeckStore, card_id: &str) -> Result<(), Box<dyn Error>> {
    let mut study = StudySession::start(decks, card_id)?;
    println!("Flashcards for '{}'. [enter] flip, y/n learned, b back, q quit.", card_id);

    loop {
        let pair = study.session.current();
        let front = format!(
            "[{}/{}] {}",
            study.session.current_index + 1,
            study.session.pairs.len(),
            pair.english
        );
        if study.session.revealed {
            println!("{}  ->  {}", front, pair.indonesian);
        } else {
            println!("{}", front);
        }

        match prompt("> ")?.as_str() {
            "" => study.session.flip(),
            "y" => {
                study.session.mark_learned(true);
                if !study.session.next() {
                    break;
                }
            }
            "n" => {
                study.session.mark_learned(false);
                if !study.session.next() {
                    break;
                }
            }
            "b" => {
                study.session.previous();
            }
            "q" => break,
            _ => println!("unknown input"),
        }
    }

    let mut db = ProgressDb::new()?;
    let pct = study.finish(&mut db)?;
    println!("Saved: {:.1}% of '{}' learned.", pct, card_id);
    Ok(())
}

fn run_matching<R: Rng>(
    decks: &FileDeckStore,
    card_id: &str,
    config: &Config,
    rng: &mut R,
) -> Result<(), Box<dyn Error>> {
    let mut session = MatchingSession::start(decks, card_id, rng)?;
    println!("Match each English word with its translation.");
    println!("Type an item id (e.g. en-2, then id-0), r to reshuffle, q to quit.");

    loop {
        print_columns(&session);
        let input = prompt("> ")?;
        match input.as_str() {
            "q" => return Ok(()),
            "r" => {
                session.restart(rng);
                continue;
            }
            id => match session.click(id) {
                SelectOutcome::Ignored => println!("(no effect)"),
                SelectOutcome::Selected => {}
                SelectOutcome::Deselected => println!("deselected"),
                SelectOutcome::Mismatched => println!("not a pair!"),
                SelectOutcome::Matched { complete } => {
                    println!("matched!");
                    if complete {
                        break;
                    }
                }
            },
        }
    }

    println!(
        "Done! {} pairs in {:.1}s, accuracy {:.1}%.",
        session.puzzle.total_pairs(),
        session.puzzle.elapsed_seconds(),
        session.puzzle.accuracy()
    );
    celebrate(config, rng);
    session.log_result(&ProgressDb::new()?)?;
    Ok(())
}

fn print_columns(session: &MatchingSession) {
    let puzzle = &session.puzzle;
    println!();
    for (left, right) in puzzle
        .english_column
        .iter()
        .zip(puzzle.indonesian_column.iter())
    {
        let mark = |pair_index: usize| {
            if puzzle.matched.contains(&pair_index) {
                "✓"
            } else if puzzle.incorrect.contains(&pair_index) {
                "✗"
            } else {
                " "
            }
        };
        println!(
            "  {:<6} {:<14} {}    {:<6} {:<14} {}",
            left.id,
            left.text,
            mark(left.pair_index),
            right.id,
            right.text,
            mark(right.pair_index)
        );
    }
}

fn run_choice<R: Rng>(
    decks: &FileDeckStore,
    card_id: &str,
    direction: Direction,
    config: &Config,
    rng: &mut R,
) -> Result<(), Box<dyn Error>> {
    let mut session = ChoiceSession::start(decks, card_id, direction, rng)?;
    println!("Pick the right translation ({}).", direction);
    println!("Enter the option number, t to flip direction, q to quit.");

    loop {
        let question = &session.puzzle.question;
        println!(
            "\n[{}/{}] {}",
            session.puzzle.current_index + 1,
            session.puzzle.total_questions(),
            question.prompt
        );
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option.text);
        }

        let input = prompt("> ")?;
        match input.as_str() {
            "q" => return Ok(()),
            "t" => {
                session.puzzle.toggle_direction(rng);
                continue;
            }
            n => {
                let Some(index) = n.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
                    println!("unknown input");
                    continue;
                };
                let Some(outcome) = session.answer(index) else {
                    continue;
                };
                if outcome.correct {
                    println!("correct!");
                } else {
                    println!("wrong");
                }
                std::thread::sleep(Duration::from_millis(config.auto_advance_ms));
                if !session.puzzle.advance(rng) {
                    break;
                }
            }
        }
    }

    println!(
        "Done! {}/{} correct.",
        session.puzzle.score,
        session.puzzle.total_questions()
    );
    celebrate(config, rng);
    session.log_result(&ProgressDb::new()?)?;
    Ok(())
}

fn run_cloze<R: Rng>(
    card_id: &str,
    text: &str,
    config: &Config,
    rng: &mut R,
) -> Result<(), Box<dyn Error>> {
    let mut session = ClozeSession::start(card_id, text, rng)?;
    println!("Fill the blanks. `<word-id> <blank-number>` places a word, c checks, q quits.");

    loop {
        print_cloze(&session);
        let input = prompt("> ")?;
        match input.as_str() {
            "q" => return Ok(()),
            "c" => {
                let report = session.check();
                println!("{}/{} correct", report.correct_count, report.total_hidden);
                if report.complete {
                    break;
                }
            }
            placement => {
                let mut parts = placement.split_whitespace();
                let (Some(word_id), Some(slot)) = (parts.next(), parts.next()) else {
                    println!("unknown input");
                    continue;
                };
                let Ok(token_index) = slot.parse::<usize>() else {
                    println!("unknown input");
                    continue;
                };
                if !session.place(word_id, token_index) {
                    println!("(no effect)");
                }
            }
        }
    }

    println!("Done! All {} blanks filled.", session.puzzle.hidden_count());
    celebrate(config, rng);
    session.log_result(&ProgressDb::new()?)?;
    Ok(())
}

fn print_cloze(session: &ClozeSession) {
    let rendered: Vec<String> = session
        .puzzle
        .tokens
        .iter()
        .map(|token: &ClozeToken| match token.current_word() {
            Some(word) if token.locked => format!("[{}]", word),
            Some(word) => word.to_string(),
            None => format!("__({})", token.index),
        })
        .collect();
    println!("\n{}", rendered.join(" "));

    let pool: Vec<String> = session
        .puzzle
        .pool
        .iter()
        .map(|w| format!("{}={}", w.id, w.word))
        .collect();
    println!("pool: {}", pool.join("  "));
}

fn run_results() -> Result<(), Box<dyn Error>> {
    let db = ProgressDb::new()?;
    for result in db.recent_results(20)? {
        println!(
            "{}  {:<8} {:<12} {}/{} ({:.1}%)",
            result.timestamp.format("%Y-%m-%d %H:%M"),
            result.game,
            result.card_id,
            result.score,
            result.total,
            result.accuracy
        );
    }
    Ok(())
}

fn run_export() -> Result<(), Box<dyn Error>> {
    let db = ProgressDb::new()?;
    db.export_results_csv(io::stdout().lock())?;
    Ok(())
}

fn celebrate<R: Rng>(config: &Config, rng: &mut R) {
    if !config.celebrate {
        return;
    }
    let mut animation = CelebrationAnimation::start(60, 8, rng);
    while animation.is_active() {
        for line in animation.frame() {
            println!("{}", line);
        }
        animation.update(0.3);
        std::thread::sleep(Duration::from_millis(60));
    }
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
