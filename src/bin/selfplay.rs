use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

use game_2048::engine::{Board, Direction, Tile};
use game_2048::session::{GameState, Session};

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Play many random-policy 2048 games in parallel and report stats")]
struct Args {
    /// Number of games to play
    #[arg(short = 'g', long, default_value_t = 256)]
    games: u64,

    /// Board side length (4-6)
    #[arg(short = 'n', long, default_value_t = 4)]
    size: usize,

    /// Base seed; game i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Per-game: stop after this many accepted moves
    #[arg(long, default_value_t = 100_000)]
    max_moves: u64,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy)]
struct GameReport {
    state: GameState,
    score: u64,
    highest_tile: Tile,
    moves: u64,
}

fn play_one(size: usize, seed: u64, max_moves: u64) -> GameReport {
    let mut session = Session::with_seed(size, seed);
    session.start_new_game();
    let mut policy = StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15);
    let mut moves = 0;
    while session.state() == GameState::Started && moves < max_moves {
        let dir = Direction::ALL[policy.gen_range(0..Direction::ALL.len())];
        if session.apply(dir).moved {
            moves += 1;
        }
    }
    GameReport {
        state: session.state(),
        score: session.score(),
        highest_tile: session.board().highest_tile(),
        moves,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if !Board::is_valid_side(args.size) {
        bail!("board size must be 4, 5 or 6, got {}", args.size);
    }

    let start = Instant::now();
    let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new(args.games) };
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})")?
            .progress_chars("=>-"),
    );
    let reports: Vec<GameReport> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let r = play_one(args.size, args.seed.wrapping_add(i), args.max_moves);
            pb.inc(1);
            r
        })
        .collect();
    pb.finish_and_clear();

    let games = reports.len().max(1) as f64;
    let won = reports.iter().filter(|r| r.state == GameState::Won).count();
    let over = reports.iter().filter(|r| r.state == GameState::Over).count();
    let total_moves: u64 = reports.iter().map(|r| r.moves).sum();
    let mean_score = reports.iter().map(|r| r.score as f64).sum::<f64>() / games;
    let best = reports.iter().map(|r| r.score).max().unwrap_or(0);
    let highest = reports.iter().map(|r| r.highest_tile).max().unwrap_or(0);
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);

    info!("played {} games on {}x{} in {elapsed:.2}s", reports.len(), args.size, args.size);
    println!(
        "games: {} | won: {} | over: {} | capped: {} | mean score: {:.1} | best score: {} | highest tile: {} | moves/sec: {:.1}",
        reports.len(),
        won,
        over,
        reports.len() - won - over,
        mean_score,
        best,
        highest,
        total_moves as f64 / elapsed
    );
    Ok(())
}
