//! On-disk save store: one checksummed snapshot file per board size.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::serialization::{decode_snapshot, encode_snapshot, Snapshot, SnapshotError};
use crate::session::{GameState, Restored, Session};

const EXTENSION: &str = "g2s";

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        SaveStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the save for boards of `side`.
    pub fn path_for(&self, side: usize) -> PathBuf {
        self.dir.join(format!("save-{side}.{EXTENSION}"))
    }

    pub fn save(&self, side: usize, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let bytes = encode_snapshot(snapshot)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(side), bytes)?;
        Ok(())
    }

    /// Read the save for `side`; `Ok(None)` when nothing was saved yet.
    pub fn load(&self, side: usize) -> Result<Option<Snapshot>, SnapshotError> {
        match fs::read(self.path_for(side)) {
            Ok(bytes) => Ok(Some(decode_snapshot(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save `session` after a turn. A finished game is stored as cleared so it
    /// is never resumed; the best score survives either way.
    pub fn persist(&self, session: &Session) -> Result<(), SnapshotError> {
        let snapshot = match session.state() {
            GameState::Started => session.to_snapshot(),
            _ => Snapshot::cleared(session.best_score()),
        };
        debug!("saving {}x{} game to {}", session.side(), session.side(), self.path_for(session.side()).display());
        self.save(session.side(), &snapshot)
    }

    /// Drop the game in progress for `side`, keeping the stored best score.
    pub fn reset(&self, side: usize) -> Result<(), SnapshotError> {
        let best_score = match self.load(side) {
            Ok(Some(s)) => s.best_score,
            Ok(None) => 0,
            Err(e) => {
                warn!("unreadable save {}: {e}", self.path_for(side).display());
                0
            }
        };
        self.save(side, &Snapshot::cleared(best_score))
    }

    /// Initialise `session` from disk, starting a new game when there is no
    /// usable save.
    pub fn restore(&self, session: &mut Session) -> Restored {
        match self.load(session.side()) {
            Ok(Some(snapshot)) => session.load_from_snapshot(&snapshot),
            Ok(None) => {
                session.start_new_game();
                Restored::Fresh
            }
            Err(e) => {
                warn!("ignoring save {}: {e}", self.path_for(session.side()).display());
                session.start_new_game();
                Restored::Fresh
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;
    use tempfile::TempDir;

    #[test]
    fn missing_save_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path().join("nested"));
        assert!(store.load(4).unwrap().is_none());
    }

    #[test]
    fn persist_and_restore() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path());
        let mut s = Session::with_seed(4, 17);
        assert_eq!(store.restore(&mut s), Restored::Fresh);
        for dir in Direction::ALL {
            s.apply(dir);
        }
        store.persist(&s).unwrap();

        let mut t = Session::with_seed(4, 18);
        assert_eq!(store.restore(&mut t), Restored::Resumed);
        assert_eq!(t.to_snapshot(), s.to_snapshot());
    }

    #[test]
    fn sizes_are_saved_separately() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path());
        let mut four = Session::with_seed(4, 1);
        four.start_new_game();
        store.persist(&four).unwrap();
        assert!(store.load(5).unwrap().is_none());
        assert_eq!(store.load(4).unwrap().unwrap().tiles.len(), 4);
        assert_ne!(store.path_for(4), store.path_for(5));
    }

    #[test]
    fn finished_game_is_cleared() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path());
        let mut s = Session::with_seed(4, 2);
        s.load_from_snapshot(&Snapshot {
            tiles: vec![vec![1024, 1024, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]],
            score: 10,
            best_score: 10,
        });
        assert!(s.apply(Direction::Left).won);
        store.persist(&s).unwrap();
        let saved = store.load(4).unwrap().unwrap();
        assert!(saved.is_blank());
        assert_eq!(saved.best_score, 2058);

        let mut t = Session::with_seed(4, 3);
        assert_eq!(store.restore(&mut t), Restored::Fresh);
        assert_eq!(t.best_score(), 2058);
    }

    #[test]
    fn corrupt_file_falls_back_to_new_game() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path());
        fs::write(store.path_for(4), b"not a save file").unwrap();
        assert!(store.load(4).is_err());
        let mut s = Session::with_seed(4, 4);
        assert_eq!(store.restore(&mut s), Restored::Fresh);
        assert_eq!(s.state(), GameState::Started);
        assert_eq!(s.board().count_empty(), 14);
    }

    #[test]
    fn reset_keeps_best_score() {
        let tmp = TempDir::new().unwrap();
        let store = SaveStore::new(tmp.path());
        store
            .save(5, &Snapshot { tiles: vec![vec![2; 5]; 5], score: 300, best_score: 500 })
            .unwrap();
        store.reset(5).unwrap();
        let saved = store.load(5).unwrap().unwrap();
        assert!(saved.is_blank());
        assert_eq!(saved.score, 0);
        assert_eq!(saved.best_score, 500);
    }
}
