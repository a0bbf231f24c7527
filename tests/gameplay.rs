use game_2048::engine::{Board, Direction, TileOp, MAX_SIDE, MIN_SIDE, SPAWN_TILE, WIN_TILE};
use game_2048::serialization::{decode_tiles, encode_tiles, Snapshot};
use game_2048::session::{GameState, MoveOutcome, Restored, Session};
use game_2048::store::SaveStore;
use game_2048::view::{replay, MirrorView};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tempfile::TempDir;

fn assert_tiles_valid(board: &Board) {
    for (cell, value) in board.tiles() {
        assert!(value >= 2 && value.is_power_of_two(), "{value} at {cell:?}");
    }
}

#[test]
fn random_games_keep_every_invariant() {
    for side in MIN_SIDE..=MAX_SIDE {
        for seed in 0..6u64 {
            let mut session = Session::with_seed(side, seed);
            session.start_new_game();
            let mut view = MirrorView::new(side);
            session.render(&mut view);
            let mut policy = StdRng::seed_from_u64(seed + 1000);
            let mut score = 0;
            for _ in 0..2_000 {
                if session.state() != GameState::Started {
                    break;
                }
                let before = session.board().clone();
                let dir = Direction::ALL[policy.gen_range(0..4)];
                let out = session.apply(dir);
                if !out.moved {
                    assert_eq!(out, MoveOutcome::idle());
                    assert_eq!(session.board(), &before);
                    // Same direction again is still a no-op.
                    assert!(!session.apply(dir).moved);
                    continue;
                }
                score += out.score_delta;
                assert_eq!(session.score(), score);
                assert!(session.best_score() >= session.score());

                let merged: u64 = out
                    .ops
                    .iter()
                    .filter_map(|op| match op {
                        TileOp::Merge { value, .. } => Some(u64::from(*value)),
                        TileOp::Slide { .. } => None,
                    })
                    .sum();
                assert_eq!(merged, out.score_delta);
                assert_eq!(out.merged, merged > 0);
                let reached = out.ops.iter().any(|op| matches!(op, TileOp::Merge { value, .. } if *value >= WIN_TILE));
                assert_eq!(out.won, reached);
                assert_eq!(out.over, session.state() == GameState::Over);
                assert_eq!(out.over, session.board().is_over());
                if !out.won {
                    assert_eq!(out.spawned.map(|(_, v)| v), Some(SPAWN_TILE));
                }

                replay(&out, &mut view);
                assert_eq!(view.board(), session.board());
                assert_tiles_valid(session.board());
            }
        }
    }
}

#[test]
fn over_games_reject_all_input() {
    let mut session = Session::with_seed(4, 3);
    session.start_new_game();
    let mut policy = StdRng::seed_from_u64(77);
    while session.state() == GameState::Started {
        session.apply(Direction::ALL[policy.gen_range(0..4)]);
    }
    let frozen = session.to_snapshot();
    for dir in Direction::ALL {
        assert_eq!(session.apply(dir), MoveOutcome::idle());
    }
    assert_eq!(session.to_snapshot(), frozen);
    session.start_new_game();
    assert_eq!(session.state(), GameState::Started);
    assert_eq!(session.best_score(), frozen.best_score);
}

#[test]
fn delimited_export_imports_back() {
    let mut session = Session::with_seed(5, 8);
    session.start_new_game();
    for dir in Direction::ALL {
        session.apply(dir);
    }
    let snap = session.to_snapshot();
    let text = encode_tiles(&snap.tiles);
    let imported = Snapshot { tiles: decode_tiles(&text).unwrap(), ..snap.clone() };
    let mut other = Session::with_seed(5, 9);
    assert_eq!(other.load_from_snapshot(&imported), Restored::Resumed);
    assert_eq!(other.to_snapshot(), snap);
}

#[test]
fn save_store_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let store = SaveStore::new(tmp.path());
    let mut session = Session::with_seed(6, 12);
    assert_eq!(store.restore(&mut session), Restored::Fresh);
    for dir in [Direction::Down, Direction::Right, Direction::Up] {
        session.apply(dir);
        store.persist(&session).unwrap();
    }

    let mut resumed = Session::with_seed(6, 13);
    assert_eq!(store.restore(&mut resumed), Restored::Resumed);
    assert_eq!(resumed.board(), session.board());
    assert_eq!(resumed.score(), session.score());
    assert_eq!(resumed.best_score(), session.best_score());

    // A different size has its own, empty slot.
    let mut small = Session::with_seed(4, 14);
    assert_eq!(store.restore(&mut small), Restored::Fresh);
}
