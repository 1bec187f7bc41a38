use super::types::UserState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Get the default state file path (~/.config/fantasy-mvp/state.json)
pub fn get_state_path() -> PathBuf {
    crate::config::get_config_dir().join("state.json")
}

/// Load user state from a JSON file
///
/// Never fails: a missing file gives the defaults, an unreadable or corrupt
/// file gives the defaults with a warning.
pub fn load_user_state(path: &Path) -> UserState {
    if !path.exists() {
        return UserState::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read state file at {}: {}", path.display(), e);
            return UserState::default();
        }
    };

    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => UserState::from_value(&value),
        Err(e) => {
            warn!("Corrupt state file at {} ({}), using defaults", path.display(), e);
            UserState::default()
        }
    }
}

/// Save user state to a JSON file atomically
///
/// Creates the parent directory if it doesn't exist.
pub fn save_user_state(path: &Path, state: &UserState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize user state")?;

    file.commit().context("Failed to save user state")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{PositionFilter, YearFilter};
    use crate::scoring::{Preset, ScoringConfig};
    use crate::stats::Position;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_user_state(&dir.path().join("state.json"));
        assert_eq!(state, UserState::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = UserState {
            scoring_config: Preset::HalfPpr.partial().merge_onto(&ScoringConfig::default()),
            position_filter: PositionFilter::Only(Position::TE),
            year_filter: YearFilter::Decade(1980),
        };
        save_user_state(&path, &state).unwrap();

        assert_eq!(load_user_state(&path), state);
    }

    #[test]
    fn test_corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_user_state(&path), UserState::default());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut state = UserState::default();
        save_user_state(&path, &state).unwrap();
        state.year_filter = YearFilter::All;
        save_user_state(&path, &state).unwrap();

        assert_eq!(load_user_state(&path).year_filter, YearFilter::All);
    }
}
