use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use game_2048::config::Config;
use game_2048::engine::Direction;
use game_2048::serialization::encode_tiles;
use game_2048::session::{GameState, Session};
use game_2048::store::SaveStore;
use game_2048::view::{replay, MirrorView};

#[derive(Parser, Debug)]
#[command(name = "game-2048", version, about = "Play 2048 in the terminal on a 4x4, 5x5 or 6x6 board")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Board side length (4-6); overrides the config file
    #[arg(short = 'n', long, value_name = "N")]
    size: Option<usize>,
    /// RNG seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for save files
    #[arg(long, value_name = "DIR")]
    save_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Play interactively (default)
    Play,
    /// Print the saved board as `a,b;c,d` text plus scores
    Export,
    /// Drop the saved game, keeping the best score
    Reset,
}

enum Input {
    Move(Direction),
    NewGame,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.to_ascii_lowercase().as_str() {
        "a" | "h" | "left" => Some(Input::Move(Direction::Left)),
        "w" | "k" | "up" => Some(Input::Move(Direction::Up)),
        "d" | "l" | "right" => Some(Input::Move(Direction::Right)),
        "s" | "j" | "down" => Some(Input::Move(Direction::Down)),
        "n" | "new" => Some(Input::NewGame),
        "q" | "quit" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml(path).with_context(|| format!("reading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(size) = cli.size {
        config.board_size = size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(dir) = cli.save_dir {
        config.save_dir = dir;
    }
    config.validate()?;

    let store = SaveStore::new(&config.save_dir);
    let side = config.board_size;
    match cli.cmd.unwrap_or(Command::Play) {
        Command::Play => play(&config, &store)?,
        Command::Export => match store.load(side)? {
            Some(snapshot) if !snapshot.is_blank() => {
                println!("{}", encode_tiles(&snapshot.tiles));
                println!("score: {} | best: {}", snapshot.score, snapshot.best_score);
            }
            Some(snapshot) => println!("no game in progress for {side}x{side} | best: {}", snapshot.best_score),
            None => println!("no save for {side}x{side}"),
        },
        Command::Reset => {
            store.reset(side)?;
            info!("cleared {side}x{side} save in {}", store.dir().display());
        }
    }
    Ok(())
}

fn play(config: &Config, store: &SaveStore) -> Result<()> {
    let mut session = Session::from_config(config);
    let restored = store.restore(&mut session);
    info!("{restored:?} {0}x{0} game from {1}", session.side(), store.dir().display());

    let mut view = MirrorView::new(session.side());
    session.render(&mut view);
    print_frame(&session, &view)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match parse_input(line.trim()) {
            Some(Input::Quit) => break,
            Some(Input::NewGame) => {
                session.start_new_game();
                session.render(&mut view);
            }
            Some(Input::Move(direction)) => {
                let outcome = session.apply(direction);
                if !outcome.moved {
                    println!("nothing moved");
                    continue;
                }
                replay(&outcome, &mut view);
                session.settle();
            }
            None => {
                println!("moves: w/a/s/d, h/j/k/l or up/down/left/right | n: new game | q: quit");
                continue;
            }
        }
        store.persist(&session)?;
        print_frame(&session, &view)?;
    }
    store.persist(&session)?;
    Ok(())
}

fn print_frame(session: &Session, view: &MirrorView) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_frame(&mut out, session, view)?;
    out.flush()
}

fn write_frame<W: Write>(out: &mut W, session: &Session, view: &MirrorView) -> io::Result<()> {
    writeln!(out, "{view}")?;
    writeln!(out, "score: {} | best: {}", session.score(), session.best_score())?;
    match session.state() {
        GameState::Won => writeln!(out, "You reached 2048! Press n for a new game.")?,
        GameState::Over => writeln!(out, "No moves left. Press n for a new game.")?,
        GameState::Started | GameState::NotStarted => {}
    }
    write!(out, "> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_2048::serialization::Snapshot;

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn frame_for(rows: Vec<Vec<u32>>) -> String {
        let mut session = Session::with_seed(4, 1);
        session.load_from_snapshot(&Snapshot { tiles: rows, score: 12, best_score: 40 });
        let mut view = MirrorView::new(4);
        session.render(&mut view);
        let mut buf = Vec::new();
        write_frame(&mut buf, &session, &view).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn frame_shows_scores_and_prompt() {
        let text = frame_for(vec![vec![2, 4, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]]);
        assert!(text.contains("score: 12 | best: 40"));
        assert!(text.ends_with("> "));
        assert!(!text.contains("No moves left"));

        let locked = frame_for(vec![vec![2, 4, 2, 4], vec![4, 2, 4, 2], vec![2, 4, 2, 4], vec![4, 2, 4, 2]]);
        assert!(locked.contains("No moves left"));
    }

    #[test]
    fn frame_write_errors_propagate() {
        let session = Session::with_seed(4, 1);
        let view = MirrorView::new(4);
        let err = write_frame(&mut Closed, &session, &view).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn parses_moves_and_commands() {
        assert!(matches!(parse_input("a"), Some(Input::Move(Direction::Left))));
        assert!(matches!(parse_input("UP"), Some(Input::Move(Direction::Up))));
        assert!(matches!(parse_input("l"), Some(Input::Move(Direction::Right))));
        assert!(matches!(parse_input("j"), Some(Input::Move(Direction::Down))));
        assert!(matches!(parse_input("n"), Some(Input::NewGame)));
        assert!(matches!(parse_input("quit"), Some(Input::Quit)));
        assert!(parse_input("x").is_none());
    }
}
