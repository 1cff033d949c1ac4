// src/carousel/gesture.rs
// =============================================================================
// User input a card reacts to, independent of where it came from.
//
// A page would produce these from mouse, focus and keyboard events; the CLI
// produces them from typed commands. The card only ever sees a Gesture.
//
// Rust concepts:
// - Copy enums: small values passed around by value, no borrowing needed
// - Option<Self>: "this key maps to a gesture, or it doesn't"
// =============================================================================

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Primary click on the card
    Activate,
    HoverEnter,
    HoverLeave,
    FocusEnter,
    FocusLeave,
    ArrowLeft,
    ArrowRight,
    /// The dedicated pause toggle (spacebar)
    Space,
}

impl Gesture {
    /// Maps a keyboard key name to a gesture, if the card handles that key.
    pub fn from_key(key: &str) -> Option<Self> {
        // Names as browsers report them, plus older aliases
        match key {
            "ArrowLeft" | "Left" => Some(Gesture::ArrowLeft),
            "ArrowRight" | "Right" => Some(Gesture::ArrowRight),
            " " | "Space" | "Spacebar" => Some(Gesture::Space),
            _ => None, // every other key is left alone
        }
    }
}

/// What the host should do with the original event afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureOutcome {
    /// Keys the card consumed must not also scroll the page
    pub default_prevented: bool,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[derive(Default)] on GestureOutcome?
//    - GestureOutcome::default() gives default_prevented = false
//    - Most gestures use that; only keys the card consumes set it to true
// -----------------------------------------------------------------------------
