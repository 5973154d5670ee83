//! Reversi: play and compare Othello strategies from the command line.
//!
//! ## Usage
//!
//! - `reversi play --black human --white minimax` - Play one game, printing each turn
//! - `reversi series --games 20 --black greedy --white random` - Headless series with a summary
//! - `reversi eval` - Show the evaluation breakdown of the start position

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use reversi_engine::board::{Board, Color, Pos};
use reversi_engine::config::MinimaxConfig;
use reversi_engine::constants::{DEFAULT_DEPTH, DEFAULT_SIZE};
use reversi_engine::eval::Evaluator;
use reversi_engine::game::{Game, SeriesStats, Turn};
use reversi_engine::strategy::{HumanInput, Strategy, StrategyKind};

/// Reversi: an Othello engine with minimax alpha-beta search
#[derive(Parser)]
#[command(name = "reversi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log search decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print the board after every turn
    Play(MatchArgs),
    /// Play a series of headless games and print win statistics
    Series {
        #[command(flatten)]
        args: MatchArgs,
        /// Number of games
        #[arg(short, long, default_value_t = 20)]
        games: usize,
    },
    /// Print the evaluation breakdown of the starting position
    Eval {
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Seat {
    Human,
    Random,
    Greedy,
    Minimax,
}

#[derive(Args, Clone)]
struct MatchArgs {
    /// Strategy for Black (moves first)
    #[arg(long, value_enum, default_value = "minimax")]
    black: Seat,
    /// Strategy for White
    #[arg(long, value_enum, default_value = "greedy")]
    white: Seat,
    /// Board size (even, >= 4)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Minimax search depth in plies
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,
    /// Per-move time budget for minimax in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,
    /// Worker threads for minimax root moves
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Seed for random players
    #[arg(long)]
    seed: Option<u64>,
}

impl MatchArgs {
    fn minimax_config(&self) -> MinimaxConfig {
        let mut config = MinimaxConfig::new(self.depth).with_threads(self.threads);
        if let Some(ms) = self.time_ms {
            config = config.with_time_budget(Duration::from_millis(ms));
        }
        config
    }

    fn strategy(&self, seat: Seat, seed: Option<u64>) -> Result<Strategy> {
        let kind = match seat {
            Seat::Human => return Ok(Strategy::Human(HumanInput::new(read_human_move))),
            Seat::Random => StrategyKind::Random,
            Seat::Greedy => StrategyKind::Greedy,
            Seat::Minimax => StrategyKind::Minimax,
        };
        Strategy::from_kind(kind, &self.minimax_config(), seed)
            .with_context(|| format!("invalid {seat:?} configuration"))
    }

    fn game(&self, round: u64) -> Result<Game> {
        let board = Board::with_size(self.size).context("invalid board")?;
        // Distinct streams per seat and per game, reproducible from one seed
        let seed = |offset: u64| self.seed.map(|s| s.wrapping_add(round * 2 + offset));
        let black = self.strategy(self.black, seed(0))?;
        let white = self.strategy(self.white, seed(1))?;
        Ok(Game::new(board, black, white))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Some(Commands::Play(args)) => run_play(&args),
        Some(Commands::Series { args, games }) => run_series(&args, games),
        Some(Commands::Eval { size }) => run_eval(size),
        None => run_play(&MatchArgs {
            black: Seat::Minimax,
            white: Seat::Greedy,
            size: DEFAULT_SIZE,
            depth: DEFAULT_DEPTH,
            time_ms: None,
            threads: 1,
            seed: None,
        }),
    }
}

fn run_play(args: &MatchArgs) -> Result<()> {
    let mut game = args.game(0)?;
    println!(
        "Black: {}  White: {}\n",
        game.strategy(Color::Black).name(),
        game.strategy(Color::White).name()
    );
    println!("{}", game.board());

    loop {
        match game.step().context("game aborted")? {
            Turn::Moved(capture) => {
                let (black, white) = game.board().score();
                println!(
                    "{} plays {} flipping {}  (Black {black} - White {white})",
                    capture.color,
                    capture.pos,
                    capture.flip_count()
                );
                println!("{}", game.board());
            }
            Turn::Passed(color) => println!("{color} passes (no legal moves)\n"),
            Turn::Finished(outcome) => {
                let (black, white) = game.board().score();
                println!("=== GAME OVER ===");
                println!("Final score - Black: {black}, White: {white}");
                println!("{outcome}");
                return Ok(());
            }
        }
    }
}

fn run_series(args: &MatchArgs, games: usize) -> Result<()> {
    let mut stats = SeriesStats::default();
    for round in 0..games {
        let mut game = args.game(round as u64)?;
        let record = game
            .play()
            .with_context(|| format!("game {} aborted", round + 1))?;
        info!(
            "game {}: {} ({}-{}) in {:?}",
            round + 1,
            record.outcome,
            record.black,
            record.white,
            record.duration
        );
        stats.record(&record);
    }
    println!("{stats}");
    Ok(())
}

fn run_eval(size: usize) -> Result<()> {
    let board = Board::with_size(size).context("invalid board")?;
    let eval = Evaluator::default().for_size(size);
    let phases = eval.weights();
    println!("{board}");
    println!(
        "phases: early below {:.0}% filled, late from {:.0}%\n",
        phases.early_until * 100.0,
        phases.late_from * 100.0
    );
    for color in [Color::Black, Color::White] {
        println!("--- {color} ---");
        println!("{}\n", eval.breakdown(&board, color));
    }
    Ok(())
}

/// Prompt on stdout and read `a1`-style moves from stdin until a legal one arrives.
/// End of input yields `None`.
fn read_human_move(board: &Board, color: Color) -> Option<Pos> {
    let legal = board.legal_moves(color);
    let listed: Vec<String> = legal.iter().map(Pos::to_string).collect();
    println!("{color} to move. Legal moves: {}", listed.join(" "));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("Enter move: ");
        io::stdout().flush().ok()?;
        let line = lines.next()?.ok()?;
        match line.trim().parse::<Pos>() {
            Ok(pos) if legal.contains(&pos) => return Some(pos),
            Ok(pos) => println!("{pos} is not a legal move. Try again."),
            Err(err) => println!("{err}. Enter a column letter and row number, e.g. d3."),
        }
    }
}
