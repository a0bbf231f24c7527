//! Serialization surfaces for saved games.
//!
//! A [`Snapshot`] carries the logical state that survives a restart: the tile
//! grid (0 = empty), the current score and the best score. Two encodings are
//! provided:
//!
//! - a checksummed postcard container used by the on-disk save store, and
//! - the delimited text form (`2,0,0,0;0,4,0,0;...`) used for export/import.

mod delimited;
mod snapshot;

pub use delimited::{decode_tiles, encode_tiles, COLUMN_DELIMITER, ROW_DELIMITER};
pub use snapshot::{decode_snapshot, encode_snapshot, Snapshot, SnapshotError};
