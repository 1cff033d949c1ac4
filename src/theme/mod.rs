// src/theme/mod.rs
// =============================================================================
// The page's one persisted preference: dark or light theme.
//
// The preference lives in a small JSON key-value file (the "theme" key).
// It is read once at startup and written back whenever it is toggled.
//
// Rust concepts:
// - #[default] on an enum variant: what Theme::default() returns
// - FromStr: lets us write "light".parse::<Theme>()
// - Display: lets us write println!("{}", theme)
// =============================================================================

mod store;

pub use store::{ThemeError, ThemeStore, THEME_KEY};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    // Takes self by value: Theme is Copy, so this doesn't consume anything
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Forgiving about case and surrounding spaces ("Light ", "DARK")
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why implement FromStr instead of a parse_theme() function?
//    - It plugs into str::parse, which every Rust reader already knows
//    - The error type (ThemeError) travels with it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
