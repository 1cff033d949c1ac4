// src/lib.rs
// =============================================================================
// Library root: everything the CLI in main.rs is built from.
//
// Modules:
// - probe:    discovers a product folder's numbered images by trying to load them
// - carousel: per-card image cycling state, autoplay timer and gestures
// - catalog:  product list loading, the card grid and its HTML rendering
// - theme:    the persisted dark/light preference
// - cli:      command-line definitions
//
// Rust concepts:
// - lib.rs + main.rs: one package, a library and a binary built from it
// - pub mod: makes each module reachable as catalog_carousel::<module>
// =============================================================================

pub mod carousel;
pub mod catalog;
pub mod cli;
pub mod probe;
pub mod theme;
