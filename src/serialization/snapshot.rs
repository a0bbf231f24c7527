use std::io;

use serde::{Deserialize, Serialize};

use crate::engine::Tile;

const MAGIC: &[u8; 4] = b"G2S1"; // ASCII magic
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1;
const CHECKSUM_LEN: usize = 4;

/// Persistable game state for one board size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Row-major tile values, 0 for empty. Empty when there is no game to resume.
    pub tiles: Vec<Vec<Tile>>,
    pub score: u64,
    pub best_score: u64,
}

impl Snapshot {
    /// A save with no game in progress that still remembers the best score.
    pub fn cleared(best_score: u64) -> Self {
        Snapshot { tiles: Vec::new(), score: 0, best_score }
    }

    /// True when there is no tile to resume from.
    pub fn is_blank(&self) -> bool {
        self.tiles.iter().flatten().all(|&v| v == 0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("invalid magic or version")]
    MagicOrVersion,
    #[error("checksum mismatch")]
    Checksum,
    #[error("file too short or malformed")]
    Malformed,
    #[error("unsupported board side {0}")]
    Side(usize),
    #[error("board is not {expected}x{expected}")]
    Shape { expected: usize },
    #[error("invalid tile value {0}")]
    Tile(u32),
    #[error("invalid number {0:?} in delimited board")]
    Parse(String),
    #[error("no saved board")]
    Empty,
}

/// Encode a snapshot as magic + version + postcard payload + CRC32C trailer.
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>, SnapshotError> {
    let payload = postcard::to_allocvec(snapshot)?;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&payload);
    let checksum = crc32c::crc32c(&buf);
    buf.extend_from_slice(&checksum.to_le_bytes());
    Ok(buf)
}

/// Decode bytes produced by [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    if bytes.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(SnapshotError::Malformed);
    }
    // Validate checksum first so a torn write never reaches postcard.
    let (content, trailer) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let file_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if file_crc != crc32c::crc32c(content) {
        return Err(SnapshotError::Checksum);
    }
    if &content[..4] != MAGIC || content[4] != VERSION {
        return Err(SnapshotError::MagicOrVersion);
    }
    Ok(postcard::from_bytes(&content[HEADER_LEN..])?)
}
