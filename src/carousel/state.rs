// src/carousel/state.rs
// =============================================================================
// The per-card state record and what the card currently displays.
//
// Lifecycle:
//   Loading  -> Empty           (probe found nothing; terminal)
//   Loading  -> Active          (probe found at least one image)
//   Active is Playing or Paused depending on the pause flags and the timer
//
// Everything here is synchronous and timer-free. Spawning and cancelling the
// autoplay task lives in card.rs, which owns this record behind a Mutex.
//
// Rust concepts:
// - Enums with data: Thumbnail::Image carries its path and alt text
// - pub(super): visible to the carousel module, hidden from everyone else
// - rem_euclid: modulo that is never negative
// - #[serde(tag = "kind")]: enum variants serialize as {"kind": "..."}
// =============================================================================

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::probe::ProbedImage;

pub const LOADING_HINT: &str = "Images loading…";
pub const EMPTY_HINT: &str = "No images available";

/// What the thumbnail region shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Thumbnail {
    /// Placeholder while the probe is running
    Loading,
    /// Placeholder when the probe found nothing
    NoImage,
    Image { path: String, alt: String },
}

// The visible parts of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub name: String,
    pub thumbnail: Thumbnail,
    /// Previous/next buttons; only shown with more than one image
    pub controls_visible: bool,
    // Omitted from JSON entirely when there is no hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Empty,
    Active,
}

/// Externally visible state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselStatus {
    Loading,
    Empty,
    Playing,
    Paused,
}

impl CarouselStatus {
    // Same spelling as the serde output, for data-* attributes
    pub fn as_str(self) -> &'static str {
        match self {
            CarouselStatus::Loading => "loading",
            CarouselStatus::Empty => "empty",
            CarouselStatus::Playing => "playing",
            CarouselStatus::Paused => "paused",
        }
    }
}

/// Two independent reasons to pause.
///
/// `explicit` is set by click/space toggles and `set_paused`; `hover` is set
/// while the pointer or focus is on the card. The card is paused if either
/// is set, so leaving the card never undoes an explicit pause.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PauseFlags {
    pub explicit: bool,
    pub hover: bool,
}

impl PauseFlags {
    pub fn is_paused(self) -> bool {
        self.explicit || self.hover
    }
}

#[derive(Debug)]
pub struct CarouselState {
    pub(super) images: Vec<ProbedImage>,
    // Always < images.len() once images is non-empty
    pub(super) current_index: usize,
    pub(super) pause: PauseFlags,
    pub(super) phase: Phase,
    pub(super) view: CardView,
    /// Running autoplay task, if any
    pub(super) timer: Option<JoinHandle<()>>,
    pub(super) disposed: bool,
}

impl CarouselState {
    pub fn new(name: &str) -> Self {
        // Every card starts out showing the loading placeholder
        Self {
            images: Vec::new(),
            current_index: 0,
            pause: PauseFlags::default(),
            phase: Phase::Loading,
            view: CardView {
                name: name.to_string(),
                thumbnail: Thumbnail::Loading,
                controls_visible: false,
                hint: Some(LOADING_HINT.to_string()),
            },
            timer: None,
            disposed: false,
        }
    }

    /// Moves out of Loading. Returns true when autoplay should start.
    ///
    /// Only the first completion counts; a disposed card ignores it.
    pub(super) fn complete(&mut self, images: Vec<ProbedImage>) -> bool {
        if self.phase != Phase::Loading || self.disposed {
            return false;
        }

        // Nothing found: show the "no image" placeholder and stay put forever
        if images.is_empty() {
            self.phase = Phase::Empty;
            self.view.thumbnail = Thumbnail::NoImage;
            self.view.controls_visible = false;
            self.view.hint = Some(EMPTY_HINT.to_string());
            return false;
        }

        // The prober leaves alt text blank; the product name fills it in
        let name = self.view.name.clone();
        self.images = images
            .into_iter()
            .map(|mut image| {
                if image.alt_text.is_empty() {
                    image.alt_text = name.clone();
                }
                image
            })
            .collect();
        self.phase = Phase::Active;
        self.view.controls_visible = self.images.len() > 1;
        self.view.hint = None;
        self.show_image(0);

        // A single image has nothing to cycle through
        self.images.len() > 1
    }

    /// Shows image `index`, wrapping around in both directions.
    pub fn show_image(&mut self, index: i64) {
        if self.images.is_empty() {
            return;
        }

        // rem_euclid keeps the result in 0..len even for negative input:
        //   -1.rem_euclid(3) == 2, while -1 % 3 == -1
        let len = self.images.len() as i64;
        self.current_index = index.rem_euclid(len) as usize;

        let image = &self.images[self.current_index];
        self.view.thumbnail = Thumbnail::Image {
            path: image.path.clone(),
            alt: image.alt_text.clone(),
        };
    }

    pub fn next(&mut self) {
        self.show_image(self.current_index as i64 + 1);
    }

    pub fn previous(&mut self) {
        self.show_image(self.current_index as i64 - 1);
    }

    // One autoplay tick; a no-op while paused
    pub(super) fn tick(&mut self) {
        if !self.pause.is_paused() {
            self.next();
        }
    }

    // A handle whose task already ended (aborted or finished) doesn't count
    pub(super) fn is_autoplaying(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn status(&self) -> CarouselStatus {
        match self.phase {
            Phase::Loading => CarouselStatus::Loading,
            Phase::Empty => CarouselStatus::Empty,
            // Match guards: the first arm whose condition holds wins
            Phase::Active if self.is_autoplaying() && !self.pause.is_paused() => {
                CarouselStatus::Playing
            }
            Phase::Active => CarouselStatus::Paused,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the state separate from the timer code?
//    - Every rule about indices and placeholders can be tested without a
//      runtime or a clock
//    - card.rs only has to worry about locking and tasks
//
// 2. Why i64 for show_image?
//    - previous() on index 0 asks for -1
//    - usize can't be negative, so the wrap needs a signed type first
//
// 3. What is is_some_and?
//    - Option::is_some_and(f) is true when the Option is Some and f says so
//    - Here: "there is a timer and it is still running"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn images(n: usize) -> Vec<ProbedImage> {
        (1..=n)
            .map(|i| ProbedImage::new(format!("Images/Products/mug/{}.jpg", i)))
            .collect()
    }

    #[test]
    fn test_new_card_shows_loading_placeholder() {
        let state = CarouselState::new("Mug");
        assert_eq!(state.view.thumbnail, Thumbnail::Loading);
        assert_eq!(state.view.hint.as_deref(), Some(LOADING_HINT));
        assert_eq!(state.status(), CarouselStatus::Loading);
    }

    #[test]
    fn test_wraparound_for_any_index() {
        let mut state = CarouselState::new("Mug");
        state.complete(images(3));

        for (requested, expected) in [(0, 0), (2, 2), (3, 0), (7, 1), (-1, 2), (-3, 0), (-7, 2)] {
            state.show_image(requested);
            assert_eq!(state.current_index, expected, "show_image({})", requested);
        }
    }

    #[test]
    fn test_show_image_on_empty_card_is_noop() {
        let mut state = CarouselState::new("Mug");
        state.complete(Vec::new());
        state.show_image(5);
        state.next();
        assert_eq!(state.current_index, 0);
        assert_eq!(state.view.thumbnail, Thumbnail::NoImage);
        assert_eq!(state.view.hint.as_deref(), Some(EMPTY_HINT));
        assert_eq!(state.status(), CarouselStatus::Empty);
    }

    #[test]
    fn test_alt_text_is_filled_with_product_name() {
        let mut state = CarouselState::new("Stoneware Mug");
        state.complete(images(2));
        assert_eq!(
            state.view.thumbnail,
            Thumbnail::Image {
                path: "Images/Products/mug/1.jpg".into(),
                alt: "Stoneware Mug".into(),
            }
        );
        assert!(state.view.hint.is_none());
    }

    #[test]
    fn test_only_first_completion_counts() {
        let mut state = CarouselState::new("Mug");
        assert!(state.complete(images(2)));
        assert!(!state.complete(Vec::new()));
        assert_eq!(state.phase, Phase::Active);
    }

    #[test]
    fn test_tick_respects_either_pause_reason() {
        let mut state = CarouselState::new("Mug");
        state.complete(images(3));

        state.pause.hover = true;
        state.tick();
        assert_eq!(state.current_index, 0);

        state.pause = PauseFlags { explicit: true, hover: false };
        state.tick();
        assert_eq!(state.current_index, 0);

        state.pause = PauseFlags::default();
        state.tick();
        assert_eq!(state.current_index, 1);
    }
}
