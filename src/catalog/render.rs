// src/catalog/render.rs
// =============================================================================
// Renders the product grid to HTML with maud.
//
// Each card has:
// - a thumbnail region (current image, or a loading / no-image placeholder)
// - previous/next buttons, carrying `hidden` when there is at most one image
// - the product name
// - a hint line ("Images loading…", "No images available", or empty)
//
// The markup carries the card state in data-* attributes so a page script
// (or a test) can pick it up without re-probing.
//
// Rust concepts:
// - Macros: maud's html! checks the markup at compile time
// - Markup: the rendered HTML, escaped unless marked PreEscaped
// - @if / @for / @match: control flow inside a template
// =============================================================================

use maud::{html, Markup, DOCTYPE};

use super::container::{Card, Container};
use crate::carousel::Thumbnail;
use crate::theme::Theme;

pub const LOADING_PLACEHOLDER: &str = "Images/placeholder-loading.svg";
pub const NO_IMAGE_PLACEHOLDER: &str = "Images/placeholder-none.svg";

/// Renders just the grid element.
pub fn render_container(container: &Container, theme: Theme) -> Markup {
    html! {
        div.product-grid id="product-grid" data-theme=(theme.as_str()) {
            // An empty catalog shows the notice and nothing else
            @if let Some(notice) = container.notice() {
                p.catalog-notice { (notice) }
            }
            @for card in container.cards() {
                (render_card(card))
            }
        }
    }
}

/// Renders a complete standalone page around the grid.
pub fn render_page(container: &Container, theme: Theme, title: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" data-theme=(theme.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                main {
                    h1 { (title) }
                    (render_container(container, theme))
                }
            }
        }
    }
}

fn render_card(card: &Card) -> Markup {
    // Take one consistent copy; autoplay may be ticking while we render
    let snapshot = card.carousel.snapshot();
    let view = &snapshot.view;
    let hidden = !view.controls_visible;

    html! {
        // tabindex makes the card focusable, so arrow keys can reach it
        article.product-card
            tabindex="0"
            data-card-id=(card.carousel.id().0)
            data-product-id=(card.product.id)
            data-folder=(card.product.folder)
            data-status=(snapshot.status.as_str())
            data-index=(snapshot.current_index)
            data-count=(snapshot.image_count)
        {
            div.product-thumb {
                @match &view.thumbnail {
                    // Decorative while loading, so no alt text
                    Thumbnail::Loading => {
                        img.placeholder src=(LOADING_PLACEHOLDER) alt="";
                    }
                    Thumbnail::NoImage => {
                        img.placeholder src=(NO_IMAGE_PLACEHOLDER) alt=(view.name);
                    }
                    Thumbnail::Image { path, alt } => {
                        img src=(path) alt=(alt) loading="lazy";
                    }
                }
                // hidden[cond] emits the bare `hidden` attribute only when cond is true
                button.carousel-prev type="button" aria-label="Previous image" hidden[hidden] { "‹" }
                button.carousel-next type="button" aria-label="Next image" hidden[hidden] { "›" }
            }
            h3.product-name { (view.name) }
            p.product-hint {
                @if let Some(hint) = &view.hint {
                    (hint)
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why maud instead of format!()?
//    - Every (value) is HTML-escaped, so a product called "<b>" stays text
//    - Unbalanced tags are a compile error, not a broken page
//
// 2. What is Markup?
//    - A wrapper around String that is known to be safe HTML
//    - into_string() gives the String back for writing out
// -----------------------------------------------------------------------------
