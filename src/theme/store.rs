// src/theme/store.rs
// =============================================================================
// A tiny file-backed key-value store holding the theme preference.
//
// File format: a flat JSON object of string keys to string values, e.g.
//   {"theme": "light"}
// Keys other than "theme" are preserved when the file is rewritten.
//
// Rust concepts:
// - BTreeMap: a sorted map, so the file is written in a stable key order
// - Match guards on errors: NotFound is handled differently from the rest
// - ? with #[from]: io::Error and serde_json::Error become ThemeError
// =============================================================================

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use super::Theme;

pub const THEME_KEY: &str = "theme";

// Everything that can go wrong reading or writing the preference
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown theme '{0}' (expected 'dark' or 'light')")]
    Unknown(String),
}

pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved theme.
    ///
    /// A missing file, an unreadable file or an unknown value all fall back
    /// to the default theme; only the latter two are worth a warning.
    pub fn load(&self) -> Theme {
        // Three layers can fail: reading the file, parsing JSON, parsing the value
        match self.read_entries() {
            Ok(entries) => match entries.get(THEME_KEY) {
                Some(value) => value.parse().unwrap_or_else(|e: ThemeError| {
                    warn!(path = %self.path.display(), error = %e, "ignoring saved theme");
                    Theme::default()
                }),
                None => Theme::default(),
            },
            // First run: no file yet, nothing worth warning about
            Err(ThemeError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Theme::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read preferences");
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        // Start over if the existing file is unreadable rather than refusing to save
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(_) => BTreeMap::new(),
        };
        entries.insert(THEME_KEY.to_string(), theme.as_str().to_string());

        // "prefs.json" has an empty parent; create_dir_all("") would fail
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Flips the saved theme and returns the new one.
    pub fn toggle(&self) -> Result<Theme, ThemeError> {
        let theme = self.load().toggled();
        self.save(theme)?;
        Ok(theme)
    }

    // Raw file -> map; each ? converts its error into a ThemeError variant
    fn read_entries(&self) -> Result<BTreeMap<String, String>, ThemeError> {
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does load() never fail?
//    - A broken preference file shouldn't stop the catalog from rendering
//    - The default theme is always a valid answer
//
// 2. Why does save() return Result then?
//    - The user explicitly asked to change something
//    - If it can't be written, they should hear about it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_defaults_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("nested/prefs.json"));

        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert_eq!(ThemeStore::new(store.path()).load(), Theme::Light);
        assert_eq!(store.toggle().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_other_keys_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"menu": "open", "theme": "dark"}"#).unwrap();

        ThemeStore::new(&path).save(Theme::Light).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.get("menu").map(String::as_str), Some("open"));
        assert_eq!(entries.get("theme").map(String::as_str), Some("light"));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(ThemeStore::new(&path).load(), Theme::Dark);

        std::fs::write(&path, r#"{"theme": "sepia"}"#).unwrap();
        assert_eq!(ThemeStore::new(&path).load(), Theme::Dark);
    }
}
