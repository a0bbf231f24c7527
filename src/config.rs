use std::path::{Path, PathBuf};

use crate::engine::Board;

/// Session settings, usually loaded from a TOML file.
///
/// ```toml
/// board_size = 5
/// seed = 42
/// save_dir = "saves"
/// await_settle = true
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Board side length, 4 to 6.
    #[serde(default = "defaults::board_size")]
    pub board_size: usize,

    /// Fixed RNG seed for reproducible spawns. Omit for entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Directory holding one save file per board size.
    #[serde(default = "defaults::save_dir")]
    pub save_dir: PathBuf,

    /// Hold further input after each turn until the view reports it settled.
    #[serde(default)]
    pub await_settle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: defaults::board_size(),
            seed: None,
            save_dir: defaults::save_dir(),
            await_settle: false,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("board_size must be 4, 5 or 6, got {0}")]
    BoardSize(usize),
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Board::is_valid_side(self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        Ok(())
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn board_size() -> usize {
        4
    }

    pub fn save_dir() -> PathBuf {
        PathBuf::from(".game-2048")
    }
}
