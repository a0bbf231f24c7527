use crate::engine::Tile;

use super::SnapshotError;

pub const ROW_DELIMITER: &str = ";";
pub const COLUMN_DELIMITER: &str = ",";

/// Render tile rows as `a,b,c;d,e,f`.
pub fn encode_tiles(tiles: &[Vec<Tile>]) -> String {
    tiles
        .iter()
        .map(|row| row.iter().map(Tile::to_string).collect::<Vec<_>>().join(COLUMN_DELIMITER))
        .collect::<Vec<_>>()
        .join(ROW_DELIMITER)
}

/// Parse the output of [`encode_tiles`].
///
/// Only numbers are checked here; the board shape and tile values are
/// validated by `Board::from_rows`. A blank string means "no save".
pub fn decode_tiles(raw: &str) -> Result<Vec<Vec<Tile>>, SnapshotError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(SnapshotError::Empty);
    }
    raw.split(ROW_DELIMITER)
        .map(|row| {
            row.split(COLUMN_DELIMITER)
                .map(|s| s.trim().parse::<Tile>().map_err(|_| SnapshotError::Parse(s.to_string())))
                .collect()
        })
        .collect()
}
