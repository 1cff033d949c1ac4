// src/catalog/mod.rs
// =============================================================================
// The product catalog and the grid of cards built from it.
//
// Submodules:
// - product: the Product record and the embedded fallback list
// - loader: remote JSON fetch with fallback to the embedded list
// - container: one carousel card per product, each probing its own images
// - render: HTML output for the grid
//
// Rust concepts:
// - pub use: the rest of the crate imports catalog::Container, not the
//   submodule path
// =============================================================================

mod container;
mod loader;
mod product;
mod render;

pub use container::{Card, Container, EMPTY_CATALOG_NOTICE};
pub use loader::{CatalogError, CatalogLoad, CatalogLoader, CatalogSource};
pub use product::{embedded_products, Product};
pub use render::{render_container, render_page, LOADING_PLACEHOLDER, NO_IMAGE_PLACEHOLDER};

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How do the pieces fit together?
//    - CatalogLoader::load() gives a Vec<Product>
//    - Container::populate() turns it into cards and starts their probes
//    - render_container() turns the cards into HTML
// -----------------------------------------------------------------------------
