//! UI settings passed explicitly to whatever renders the site.
//!
//! Settings are read from a [`Store`] once and handed down; nothing reads
//! them from global state.

use crate::storage::{StorageError, Store};
use std::{fmt, str::FromStr};

pub const THEME_KEY: &str = "theme";
pub const SOUND_KEY: &str = "sound";
pub const LOADED_KEY: &str = "hasLoaded";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme `{other}`, expected `dark` or `light`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub theme: Theme,
    /// Interaction sounds; off unless the user opts in.
    pub sound: bool,
}

impl Settings {
    /// Read settings, falling back to defaults for missing or invalid values.
    pub fn load(store: &impl Store) -> Self {
        let theme = store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let sound = store
            .get(SOUND_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        Self { theme, sound }
    }

    pub fn save(&self, store: &impl Store) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.theme.as_str())?;
        store.set(SOUND_KEY, if self.sound { "true" } else { "false" })
    }
}

/// Whether this is the first page of the session, marking the session as loaded.
pub fn first_visit(session: &impl Store) -> Result<bool, StorageError> {
    if session.get(LOADED_KEY).is_some() {
        return Ok(false);
    }
    session.set(LOADED_KEY, "true")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStore;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("Light".parse::<Theme>().is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::load(&SessionStore::default());
        assert_eq!(settings.theme, Theme::Dark);
        assert!(!settings.sound);
    }

    #[test]
    fn test_settings_roundtrip_and_invalid_values() {
        let store = SessionStore::default();
        Settings {
            theme: Theme::Light,
            sound: true,
        }
        .save(&store)
        .unwrap();
        assert_eq!(
            Settings::load(&store),
            Settings {
                theme: Theme::Light,
                sound: true
            }
        );

        store.set(THEME_KEY, "sepia").unwrap();
        store.set(SOUND_KEY, "loud").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_first_visit_once_per_session() {
        let session = SessionStore::default();
        assert!(first_visit(&session).unwrap());
        assert!(!first_visit(&session).unwrap());
        assert!(!first_visit(&session).unwrap());
    }
}
