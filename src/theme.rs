//! UI theme preference.
//!
//! The preference is a single-line text file holding `Light` or `Dark`.
//! Persistence is best-effort: an unreadable or absent file falls back to
//! the dark theme and write failures are swallowed. The manager is
//! constructed explicitly with its file path and notifies registered
//! observers on change; there is no global instance.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::debug;

/// Default preference file name.
pub const THEME_SETTINGS_FILE: &str = "theme_settings.txt";

/// UI color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Theme, ()> {
        match s {
            "Light" => Ok(Theme::Light),
            "Dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}

/// Observer invoked with `(previous, new)` on every theme change.
pub type ThemeListener = Box<dyn Fn(Theme, Theme) + Send>;

/// Holds the current theme and its persistence path.
pub struct ThemeManager {
    current: Theme,
    settings_path: PathBuf,
    listeners: Vec<ThemeListener>,
}

impl ThemeManager {
    /// Load the preference from `settings_path`, defaulting to dark when
    /// the file is absent or unreadable.
    pub fn new<P: AsRef<Path>>(settings_path: P) -> Self {
        let settings_path = settings_path.as_ref().to_path_buf();
        ThemeManager {
            current: load_theme(&settings_path),
            settings_path,
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current.is_dark()
    }

    /// Register an observer for theme changes.
    pub fn on_theme_changed<F>(&mut self, listener: F)
    where
        F: Fn(Theme, Theme) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Switch themes. A no-op when the theme is already active; otherwise
    /// notifies observers and persists best-effort.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current == theme {
            return;
        }
        let previous = self.current;
        self.current = theme;

        for listener in &self.listeners {
            listener(previous, theme);
        }

        if let Err(e) = fs::write(&self.settings_path, theme.as_str()) {
            debug!(
                "cannot persist theme preference to {}: {}",
                self.settings_path.display(),
                e
            );
        }
    }
}

impl fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeManager")
            .field("current", &self.current)
            .field("settings_path", &self.settings_path)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn load_theme(path: &Path) -> Theme {
    match fs::read_to_string(path) {
        Ok(contents) => contents.trim().parse().unwrap_or_default(),
        Err(_) => Theme::default(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_absent_file_defaults_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ThemeManager::new(dir.path().join("theme_settings.txt"));
        assert_eq!(manager.current(), Theme::Dark);
        assert!(manager.is_dark());
    }

    #[test]
    fn test_garbage_file_defaults_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(THEME_SETTINGS_FILE);
        fs::write(&path, "Solarized\n").unwrap();

        let manager = ThemeManager::new(&path);
        assert_eq!(manager.current(), Theme::Dark);
    }

    #[test]
    fn test_persisted_value_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(THEME_SETTINGS_FILE);

        let mut manager = ThemeManager::new(&path);
        manager.set_theme(Theme::Light);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Light");

        let reloaded = ThemeManager::new(&path);
        assert_eq!(reloaded.current(), Theme::Light);
    }

    #[test]
    fn test_trailing_whitespace_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(THEME_SETTINGS_FILE);
        fs::write(&path, "Light\n").unwrap();

        assert_eq!(ThemeManager::new(&path).current(), Theme::Light);
    }

    #[test]
    fn test_observers_receive_previous_and_new() {
        let dir = tempfile::tempdir().unwrap();
        let mut manager = ThemeManager::new(dir.path().join(THEME_SETTINGS_FILE));

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        manager.on_theme_changed(move |prev, new| {
            assert_eq!(prev, Theme::Dark);
            assert_eq!(new, Theme::Light);
            seen.fetch_add(1, Ordering::SeqCst);
        });

        manager.set_theme(Theme::Light);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // setting the active theme again is a no-op
        manager.set_theme(Theme::Light);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory path cannot be written as a file
        let mut manager = ThemeManager::new(dir.path());
        manager.set_theme(Theme::Light);
        // the change still takes effect in memory
        assert_eq!(manager.current(), Theme::Light);
    }
}
