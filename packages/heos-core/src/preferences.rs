//! Persisted "last selected player" preference.
//!
//! The reconciler reads the preference once per roster load and writes it
//! whenever the user explicitly selects a player.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::PlayerId;

const PREFERENCES_FILE: &str = "preferences.json";
const PREFERENCES_TMP_FILE: &str = "preferences.json.tmp";

/// Errors that can occur while persisting preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenient Result alias for preference operations.
pub type PreferenceResult<T> = Result<T, PreferenceError>;

/// Key-value store for the active player preference.
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored active player id, if any.
    fn active_player(&self) -> Option<PlayerId>;

    /// Records `id` as the active player.
    fn set_active_player(&self, id: &PlayerId) -> PreferenceResult<()>;
}

/// On-disk shape of the preference file.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    active_player_pid: Option<String>,
}

/// Preference store backed by a JSON file in the app data directory.
pub struct FilePreferenceStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    /// Creates a store that keeps its file in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the preference file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    /// Loads the stored preferences, falling back to defaults when the file is
    /// missing or unreadable.
    fn load(dir: &Path) -> StoredPreferences {
        match std::fs::read_to_string(dir.join(PREFERENCES_FILE)) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("[Preferences] Ignoring unreadable preference file: {}", e);
                StoredPreferences::default()
            }),
            Err(_) => StoredPreferences::default(),
        }
    }

    /// Writes the preferences via temp file + rename.
    fn save(dir: &Path, prefs: &StoredPreferences) -> PreferenceResult<()> {
        std::fs::create_dir_all(dir)?;
        let temp_path = dir.join(PREFERENCES_TMP_FILE);
        std::fs::write(&temp_path, serde_json::to_string_pretty(prefs)?)?;
        std::fs::rename(&temp_path, dir.join(PREFERENCES_FILE))?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn active_player(&self) -> Option<PlayerId> {
        let _guard = self.lock.lock();
        Self::load(&self.dir)
            .active_player_pid
            .filter(|pid| !pid.is_empty())
            .map(PlayerId::new)
    }

    fn set_active_player(&self, id: &PlayerId) -> PreferenceResult<()> {
        let _guard = self.lock.lock();
        let mut prefs = Self::load(&self.dir);
        if prefs.active_player_pid.as_deref() == Some(id.as_str()) {
            return Ok(());
        }
        prefs.active_player_pid = Some(id.to_string());
        Self::save(&self.dir, &prefs)
    }
}

/// In-memory store for tests or when no data directory is configured.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    active: Mutex<Option<PlayerId>>,
}

impl MemoryPreferenceStore {
    /// Creates a store pre-seeded with `active`.
    pub fn with_active(active: PlayerId) -> Self {
        Self {
            active: Mutex::new(Some(active)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn active_player(&self) -> Option<PlayerId> {
        self.active.lock().clone()
    }

    fn set_active_player(&self, id: &PlayerId) -> PreferenceResult<()> {
        *self.active.lock() = Some(id.clone());
        Ok(())
    }
}
