//! Application settings with whole-file persistence. A missing or corrupt
//! settings file falls back to defaults instead of failing startup.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::shared::errors::StorageError;
use crate::shared::paths::{self, ensure_parent_dir};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    /// Gate for the routing surface: everything except auth/sign-out
    /// redirects when this is false.
    #[serde(default)]
    pub authenticated: bool,
}

fn default_theme() -> String {
    "light".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            notifications_enabled: true,
            authenticated: false,
        }
    }
}

fn load_settings_from_file(path: &Path) -> Result<AppSettings, StorageError> {
    let contents = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&contents)?;
    Ok(settings)
}

/// Settings container: current values under a lock, persisted on update.
pub struct SettingsStore {
    settings: Mutex<AppSettings>,
    path: PathBuf,
}

impl SettingsStore {
    /// Open the settings at the given path. Missing or unreadable files are
    /// not errors; defaults apply.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = if path.exists() {
            load_settings_from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(target: "settings", "Could not load settings, using defaults: {}", e);
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };
        Self {
            settings: Mutex::new(settings),
            path,
        }
    }

    pub fn open_default() -> Self {
        Self::load(paths::data_file("settings"))
    }

    pub fn current(&self) -> AppSettings {
        self.lock().clone()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.lock().notifications_enabled
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().authenticated
    }

    /// Apply a change and persist it.
    pub fn update(&self, op: impl FnOnce(&mut AppSettings)) -> Result<(), StorageError> {
        let mut settings = self.lock();
        op(&mut settings);
        self.save(&settings)
    }

    /// Back to defaults, persisted.
    pub fn reset(&self) -> Result<(), StorageError> {
        let mut settings = self.lock();
        *settings = AppSettings::default();
        self.save(&settings)
    }

    fn lock(&self) -> MutexGuard<'_, AppSettings> {
        self.settings.lock().unwrap()
    }

    fn save(&self, settings: &AppSettings) -> Result<(), StorageError> {
        ensure_parent_dir(&self.path)?;
        let contents = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));
        let settings = store.current();
        assert_eq!(settings.theme, "light");
        assert!(settings.notifications_enabled);
        assert!(!settings.authenticated);
    }

    #[test]
    fn defaults_apply_when_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SettingsStore::load(&path);
        assert!(store.notifications_enabled());
    }

    #[test]
    fn updates_persist_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(&path);
        store
            .update(|s| {
                s.notifications_enabled = false;
                s.authenticated = true;
            })
            .unwrap();

        let reloaded = SettingsStore::load(&path);
        assert!(!reloaded.notifications_enabled());
        assert!(reloaded.is_authenticated());
    }

    #[test]
    fn settings_serialize_with_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(&path);
        store.update(|_| {}).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("notificationsEnabled"));
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("settings.json"));
        store.update(|s| s.theme = "dark".to_string()).unwrap();
        store.reset().unwrap();
        assert_eq!(store.current().theme, "light");
    }
}
