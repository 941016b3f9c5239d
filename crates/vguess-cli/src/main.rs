use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use vguess_application::{GameUseCase, GuessOutcome, RecordStore};
use vguess_core::character::{NumericMode, Roster};
use vguess_core::config::GameConfig;
use vguess_core::session::Phase;
use vguess_core::share;
use vguess_infrastructure::{ConfigService, CsvRosterSource, JsonSnapshotRepository};

mod helper;
mod render;

use helper::CliHelper;

const CANDIDATE_LIMIT: usize = 20;

#[derive(Parser)]
#[command(name = "vguess")]
#[command(about = "VGUESS - find the hidden VTuber from attribute clues", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster CSV file
    #[arg(long)]
    source: Option<PathBuf>,

    /// Roster snapshot file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Delay before a correct guess is confirmed, in milliseconds
    #[arg(long)]
    win_delay_ms: Option<u64>,

    /// Treat unparseable numbers as unknown instead of rejecting the row
    #[arg(long)]
    lenient: bool,

    /// Discard the stored snapshot and re-ingest the source
    #[arg(long)]
    reset_snapshot: bool,
}

impl Cli {
    /// Command line flags take precedence over the config file.
    fn apply(&self, config: &mut GameConfig) {
        if let Some(source) = &self.source {
            config.source_path = source.clone();
        }
        if let Some(snapshot) = &self.snapshot {
            config.snapshot_path = Some(snapshot.clone());
        }
        if let Some(delay) = self.win_delay_ms {
            config.win_delay_ms = delay;
        }
        if self.lenient {
            config.numeric_mode = NumericMode::Lenient;
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

type LineEditor = Editor<CliHelper, DefaultHistory>;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vguess=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn roster_names(roster: &Roster) -> Vec<String> {
    roster.iter().map(|r| r.display_name()).collect()
}

fn print_help() {
    println!("{}", "Type a name (or part of one) to guess.".bright_black());
    println!("{}", "  /list [text]    list characters matching text".bright_black());
    println!("{}", "  /history        show every guess of this round".bright_black());
    println!("{}", "  /restart        start a new round".bright_black());
    println!("{}", "  /reload         re-ingest the roster source".bright_black());
    println!("{}", "  /consume        never draw the current target again".bright_black());
    println!("{}", "  /share          print a share code for the target".bright_black());
    println!("{}", "  /decode <code>  show the character behind a share code".bright_black());
    println!("{}", "  /quit           exit".bright_black());
}

/// Prints the victory banner once the deferred win check succeeds.
fn spawn_win_watcher(game: Arc<GameUseCase>) -> JoinHandle<()> {
    let mut phase = game.subscribe();
    tokio::spawn(async move {
        while phase.changed().await.is_ok() {
            let won = *phase.borrow_and_update() == Phase::Won;
            if !won {
                continue;
            }
            let name = game
                .session()
                .await
                .target()
                .map(|t| t.display_name())
                .unwrap_or_default();
            println!();
            println!("{}", format!("Victory! It was {}.", name).bright_green().bold());
            println!(
                "{}",
                "Type /restart for a new round or /consume to retire this character.".bright_black()
            );
        }
    })
}

async fn guess(game: &GameUseCase, text: &str) -> Result<()> {
    let Some(record) = game.resolve(text).await else {
        game.set_search_text(text).await;
        let candidates = game.candidates().await;
        println!("{}", format!("No unique match for '{}'.", text).yellow());
        render::print_candidates(&candidates, CANDIDATE_LIMIT);
        return Ok(());
    };

    match game.submit_guess(record.id).await? {
        GuessOutcome::Compared(row) => render::print_row(&row),
        GuessOutcome::NoTarget => println!(
            "{}",
            format!("Recorded {}, but this round has no target.", record.display_name()).yellow()
        ),
        GuessOutcome::AlreadyWon => {
            println!("{}", "Already won. Type /restart to play again.".bright_black())
        }
    }
    Ok(())
}

async fn handle_line(game: &GameUseCase, rl: &mut LineEditor, line: &str) -> Result<Flow> {
    let (command, argument) = match line.split_once(' ') {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };

    match command {
        "/quit" | "/exit" | "quit" | "exit" => return Ok(Flow::Quit),
        "/help" => print_help(),
        "/list" => {
            game.set_search_text(argument).await;
            render::print_candidates(&game.candidates().await, CANDIDATE_LIMIT);
        }
        "/history" => {
            let rows = game.history().await;
            if rows.is_empty() {
                println!("{}", "No guesses yet.".bright_black());
            }
            for row in &rows {
                render::print_row(row);
            }
        }
        "/restart" => {
            if game.restart().await {
                println!("{}", "New round started.".bright_green());
            } else {
                println!("{}", "No target left to draw; this round cannot be won.".yellow());
            }
        }
        "/reload" => {
            let outcome = game.reload().await;
            render::print_load(&outcome);
            if let Some(helper) = rl.helper_mut() {
                helper.set_names(roster_names(&outcome.roster));
            }
        }
        "/consume" => {
            game.mark_target_consumed().await?;
            println!("{}", "Current target will not be drawn again.".bright_green());
        }
        "/share" => match game.target_share_code().await? {
            Some(code) => println!("{}", code),
            None => println!("{}", "This round has no target.".yellow()),
        },
        "/decode" => {
            let record = share::decode_record(argument)?;
            println!("{}", record.display_name().bright_magenta());
        }
        _ if command.starts_with('/') => {
            println!("{}", format!("Unknown command: {}", command).bright_black());
        }
        _ => guess(game, line).await?,
    }

    Ok(Flow::Continue)
}

/// The entry point for the VGUESS terminal game.
///
/// Resolves configuration, loads the roster (snapshot first), and runs a
/// rustyline REPL where each line is a guess or a slash command.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // ===== Configuration =====
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::default_location()?,
    };
    let mut config = config_service.load()?;
    cli.apply(&mut config);

    // ===== Backend Initialization =====
    let snapshot = match &config.snapshot_path {
        Some(path) => JsonSnapshotRepository::new(path.clone()),
        None => JsonSnapshotRepository::default_location()?,
    };
    tracing::debug!("Snapshot at {:?}, source at {:?}", snapshot.path(), config.source_path);

    let store = RecordStore::new(
        Arc::new(snapshot),
        Arc::new(CsvRosterSource::new(config.source_path.clone())),
        config.numeric_mode,
    );
    let game = Arc::new(GameUseCase::new(Arc::new(store), config.win_delay()));

    let outcome = if cli.reset_snapshot {
        game.reload().await
    } else {
        game.start().await
    };
    render::print_load(&outcome);
    if !game.session().await.can_win() {
        println!("{}", "No target available; this round cannot be won.".yellow());
    }

    let watcher = spawn_win_watcher(game.clone());

    // ===== REPL Setup =====
    let mut rl: LineEditor = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(roster_names(&outcome.roster))));

    println!("{}", "=== VGUESS ===".bright_magenta().bold());
    print_help();
    println!();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match handle_line(&game, &mut rl, trimmed).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    println!("{}", "Goodbye!".bright_green());
    watcher.abort();
    Ok(())
}
