//! Save file storage: pretty RON on the local filesystem.
//!
//! Errors are typed and returned; deciding what a failure *means* (keep old state,
//! fall back to defaults) is the `GameManager`'s job, not this module's.

use std::fmt;
use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::PlayerSaveData;

const GAME_DIR: &str = "aliens-vs-cowboys";
const SAVE_FILE: &str = "savefile.ron";

#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "save file I/O failed: {e}"),
            SaveError::Parse(e) => write!(f, "save file is corrupted: {e}"),
            SaveError::Serialize(e) => write!(f, "could not serialize save data: {e}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Parse(e) => Some(e),
            SaveError::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SaveError {
    fn from(e: ron::error::SpannedError) -> Self {
        SaveError::Parse(e)
    }
}

impl From<ron::Error> for SaveError {
    fn from(e: ron::Error) -> Self {
        SaveError::Serialize(e)
    }
}

/// `<data dir>/aliens-vs-cowboys/savefile.ron`, or `savefile.ron` in the working
/// directory when the platform has no data dir.
pub fn default_save_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(GAME_DIR).join(SAVE_FILE))
        .unwrap_or_else(|| PathBuf::from(SAVE_FILE))
}

/// `Ok(None)` when no save exists yet.
pub fn read(path: &Path) -> Result<Option<PlayerSaveData>, SaveError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let data = ron::from_str::<PlayerSaveData>(&contents)?;
    Ok(Some(data))
}

pub fn write(path: &Path, data: &PlayerSaveData) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let serialized = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())?;
    std::fs::write(path, serialized)?;
    debug!("Wrote save data to {}", path.display());
    Ok(())
}
