// src/carousel/mod.rs
// =============================================================================
// One image carousel per product card.
//
// Submodules:
// - state: the per-card record (images, index, pause flags, view)
// - card: the shared handle, autoplay timer and gesture handling
// - gesture: input events a card understands
//
// Rust concepts:
// - Private submodules with pub use: CarouselState stays internal while
//   Carousel and its view types are the public face
// =============================================================================

mod card;
mod gesture;
mod state;

pub use card::{CardId, CardSnapshot, Carousel, AUTOPLAY_INTERVAL};
pub use gesture::{Gesture, GestureOutcome};
pub use state::{CardView, CarouselStatus, Thumbnail, EMPTY_HINT, LOADING_HINT};
