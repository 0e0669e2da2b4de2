//! Saving and loading the current game.
//!
//! The file is JSON holding the board and the move counter:
//!
//! ```json
//! { "tiles": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, null], "moves": 0 }
//! ```
//!
//! Nothing here checks the board; `Game::restore` does that before trusting it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::puzzle::Cell;

/// File name used under the data directory when no path is configured.
pub const STATE_FILE: &str = "state.json";

/// Board and move counter as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub tiles: Vec<Cell>,
    pub moves: u64,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read saved game '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse saved game '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode saved game: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write saved game '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Default location of the saved game.
///
/// Uses the platform data directory via `dirs::data_dir()`, falling back to
/// the current directory.
pub fn default_path() -> PathBuf {
    let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.join("slide-puzzle").join(STATE_FILE)
}

/// Loads a saved game. A missing file is not an error and yields `None`.
pub fn load(path: &Path) -> Result<Option<SavedGame>, PersistenceError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let saved = serde_json::from_str(&content).map_err(|e| PersistenceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), "loaded saved game");
    Ok(Some(saved))
}

/// Writes the saved game, creating parent directories as needed.
pub fn save(path: &Path, saved: &SavedGame) -> Result<(), PersistenceError> {
    let write_error = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    let json = serde_json::to_string(saved)?;
    fs::write(path, json).map_err(write_error)?;

    debug!(path = %path.display(), moves = saved.moves, "saved game");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(STATE_FILE);
        let mut tiles: Vec<Cell> = (1..=14).map(Some).collect();
        tiles.extend([None, Some(15)]);
        let saved = SavedGame { tiles, moves: 12 };

        save(&path, &saved).unwrap();
        assert_eq!(load(&path).unwrap(), Some(saved));
    }

    #[test]
    fn test_reads_null_for_empty_cell() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, r#"{"tiles":[3,1,null,2],"moves":4}"#).unwrap();

        let saved = load(&path).unwrap().unwrap();
        assert_eq!(saved.tiles, vec![Some(3), Some(1), None, Some(2)]);
        assert_eq!(saved.moves, 4);
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "not json").unwrap();

        assert!(matches!(load(&path), Err(PersistenceError::Parse { .. })));
    }
}
