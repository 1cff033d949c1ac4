// src/catalog/container.rs
// =============================================================================
// The product grid: one card per product, or a notice when there is nothing
// to show.
//
// populate() clears the grid (disposing every old card), creates the new
// cards in their Loading state and spawns one probe task per card. The cards
// settle independently as their probes finish; settle() waits for all of
// them.
//
// Rust concepts:
// - JoinSet: a group of spawned tasks that can be awaited or aborted together
// - async move: the spawned future takes ownership of its captured values
// - Drop: cleanup that runs automatically when the container goes away
// =============================================================================

use tokio::task::JoinSet;
use tracing::warn;

use super::product::Product;
use crate::carousel::{CardId, Carousel};
use crate::probe::Prober;

pub const EMPTY_CATALOG_NOTICE: &str = "Unable to load products right now.";

/// A product and the carousel showing it.
#[derive(Debug, Clone)]
pub struct Card {
    pub product: Product,
    pub carousel: Carousel,
}

#[derive(Default)]
pub struct Container {
    cards: Vec<Card>,
    // Some only when the product list was empty
    notice: Option<String>,
    // One task per card still probing
    probes: JoinSet<()>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the grid contents with one card per product.
    ///
    /// Must be called from within a tokio runtime: each card's probe runs as
    /// its own task.
    pub fn populate(&mut self, products: &[Product], prober: &Prober) {
        // Old cards go first, timers and all
        self.clear();

        if products.is_empty() {
            self.notice = Some(EMPTY_CATALOG_NOTICE.to_string());
            return;
        }

        for (position, product) in products.iter().enumerate() {
            // The card's id is its position in the grid
            let carousel = Carousel::new(CardId(position), &product.name);

            // The task needs its own copies: a card handle, a prober and the
            // folder name. `async move` then moves them into the task.
            let handle = carousel.clone();
            let prober = prober.clone();
            let folder = product.folder.clone();
            self.probes.spawn(async move {
                let images = prober.probe(&folder).await;
                handle.on_probe_complete(images);
            });

            // The card is visible right away, still showing its placeholder
            self.cards.push(Card {
                product: product.clone(),
                carousel,
            });
        }
    }

    /// Waits until every card's probe has completed.
    pub async fn settle(&mut self) {
        // join_next() yields tasks in completion order, None once all are done
        while let Some(result) = self.probes.join_next().await {
            if let Err(e) = result {
                // Cancelled tasks are expected after clear(); panics are not
                if e.is_panic() {
                    warn!(error = %e, "probe task panicked");
                }
            }
        }
    }

    /// Removes every card, cancelling their timers and pending probes.
    pub fn clear(&mut self) {
        self.probes.abort_all();
        // drain(..) empties the Vec while handing us each card by value
        for card in self.cards.drain(..) {
            card.carousel.dispose();
        }
        self.notice = None;
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Carousel> {
        self.cards.get(id.0).map(|card| &card.carousel)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// Dropping the grid tears down every card the same way clear() does
impl Drop for Container {
    fn drop(&mut self) {
        self.clear();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why one task per card instead of probing in a loop?
//    - Cards settle independently; a slow folder doesn't hold up the rest
//    - Each card fills itself in as soon as its own probe is done
//
// 2. Why JoinSet rather than a Vec<JoinHandle>?
//    - abort_all() cancels every outstanding probe in one call
//    - join_next() collects results without caring about order
//
// 3. Why clone the prober for every task?
//    - tokio::spawn needs 'static futures that own their data
//    - Prober is an Arc plus small options, so a clone is cheap
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{CarouselStatus, Thumbnail, LOADING_HINT};
    use crate::catalog::product::embedded_products;
    use crate::probe::{image_path, ImageLoader, ProbeOptions};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Arc;

    struct FolderLoader {
        present: HashSet<String>,
    }

    #[async_trait]
    impl ImageLoader for FolderLoader {
        async fn load(&self, path: &str) -> bool {
            self.present.contains(path)
        }
    }

    fn prober(paths: Vec<String>) -> Prober {
        let loader = Arc::new(FolderLoader {
            present: paths.into_iter().collect(),
        });
        Prober::new(loader, ProbeOptions::default())
    }

    #[tokio::test]
    async fn test_embedded_catalog_renders_21_loading_cards() {
        let mut container = Container::new();
        container.populate(&embedded_products(), &prober(Vec::new()));

        // Probe tasks haven't had a chance to run yet
        assert_eq!(container.len(), 21);
        assert!(container.notice().is_none());
        for card in container.cards() {
            let view = card.carousel.view();
            assert_eq!(view.thumbnail, Thumbnail::Loading);
            assert_eq!(view.hint.as_deref(), Some(LOADING_HINT));
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_shows_only_notice() {
        let mut container = Container::new();
        container.populate(&[], &prober(Vec::new()));

        assert!(container.is_empty());
        assert_eq!(container.notice(), Some(EMPTY_CATALOG_NOTICE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cards_settle_independently() {
        let products = vec![
            Product::new(1, "Lamp", "lamp"),
            Product::new(2, "Mug", "mug"),
            Product::new(3, "Vase", "vase"),
        ];
        let paths = vec![
            image_path("lamp", 1, "jpg"),
            image_path("lamp", 2, "png"),
            image_path("mug", 1, "webp"),
        ];

        let mut container = Container::new();
        container.populate(&products, &prober(paths));
        container.settle().await;

        let lamp = container.card(CardId(0)).unwrap();
        assert_eq!(lamp.status(), CarouselStatus::Playing);
        assert!(lamp.view().controls_visible);
        lamp.previous();
        assert_eq!(lamp.current_index(), 1);

        let mug = container.card(CardId(1)).unwrap();
        assert_eq!(mug.status(), CarouselStatus::Paused);
        assert!(!mug.view().controls_visible);

        let vase = container.card(CardId(2)).unwrap();
        assert_eq!(vase.status(), CarouselStatus::Empty);
        assert_eq!(vase.view().thumbnail, Thumbnail::NoImage);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repopulate_disposes_old_cards() {
        let paths = vec![image_path("lamp", 1, "jpg"), image_path("lamp", 2, "jpg")];
        let prober = prober(paths);

        let mut container = Container::new();
        container.populate(&[Product::new(1, "Lamp", "lamp")], &prober);
        container.settle().await;
        let old = container.card(CardId(0)).unwrap().clone();
        assert!(old.is_autoplaying());

        container.populate(&[], &prober);

        assert!(!old.is_autoplaying());
        assert!(container.is_empty());
        assert_eq!(container.notice(), Some(EMPTY_CATALOG_NOTICE));
    }
}
