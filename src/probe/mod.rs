// src/probe/mod.rs
// =============================================================================
// This module discovers which numbered images exist for a product folder.
//
// There is no directory listing to ask, so we guess: for index 1, 2, 3...
// we try every candidate extension and see which loads succeed. A run of
// consecutive misses (or hitting the index ceiling) ends the search.
//
// Submodules:
// - loader: the ImageLoader seam plus HTTP and local-directory loaders
// - prober: the bounded probe loop itself
//
// Rust concepts:
// - mod: declares a submodule (loader.rs, prober.rs)
// - pub use: re-exports so callers write probe::Prober, not probe::prober::Prober
// =============================================================================

mod loader;
mod prober;

pub use loader::{DirLoader, HttpLoader, ImageLoader, ImageSource};
pub use prober::{
    image_path, is_valid_folder, ProbeOptions, ProbeReport, ProbedImage, Prober,
    DEFAULT_EXTENSIONS, DEFAULT_MAX_INDEX, DEFAULT_MISS_LIMIT, IMAGE_ROOT,
};

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why keep loader and prober apart?
//    - The loop doesn't care whether images live on a server or on disk
//    - Each part can be tested on its own
// -----------------------------------------------------------------------------
