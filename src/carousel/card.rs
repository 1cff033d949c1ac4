// src/carousel/card.rs
// =============================================================================
// A handle to one product card's carousel.
//
// The state record sits behind Arc<Mutex<..>> so the card's own handlers,
// its autoplay task and its probe task can all reach it. No other card ever
// touches it. The lock is never held across an .await.
//
// Autoplay:
// - a tokio task ticks every AUTOPLAY_INTERVAL and advances one image
// - pausing only gates the tick; the task keeps running
// - stop_auto()/dispose() abort the task
// - the task holds a Weak reference, so it also ends on its own once every
//   handle to the card is gone
//
// Rust concepts:
// - Arc<Mutex<T>>: shared, mutable state across tasks
// - Weak<T>: a reference that doesn't keep its target alive
// - tokio::spawn + JoinHandle::abort: start and cancel background work
// - MutexGuard: the lock is released when the guard goes out of scope
// =============================================================================

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::gesture::{Gesture, GestureOutcome};
use super::state::{CardView, CarouselState, CarouselStatus, Phase};
use crate::probe::ProbedImage;

pub const AUTOPLAY_INTERVAL: Duration = Duration::from_millis(3500);

/// Identifies a card within its container.
//
// A newtype around usize so a card id can't be mixed up with an image index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CardId(pub usize);

/// Point-in-time copy of a card, for rendering and reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CardSnapshot {
    pub id: CardId,
    pub status: CarouselStatus,
    pub current_index: usize,
    pub image_count: usize,
    pub images: Vec<ProbedImage>,
    pub view: CardView,
}

// Cloning a Carousel clones the Arc, not the state: every clone is a handle
// to the same card
#[derive(Debug, Clone)]
pub struct Carousel {
    id: CardId,
    shared: Arc<Mutex<CarouselState>>,
    interval: Duration,
}

impl Carousel {
    pub fn new(id: CardId, name: &str) -> Self {
        Self {
            id,
            shared: Arc::new(Mutex::new(CarouselState::new(name))),
            interval: AUTOPLAY_INTERVAL,
        }
    }

    /// Overrides the autoplay interval (tokio intervals can't be zero).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    // Short helper so every method below can write self.state().something
    fn state(&self) -> MutexGuard<'_, CarouselState> {
        lock(&self.shared)
    }

    /// Settles the card once its probe is done.
    ///
    /// Zero images leaves the card Empty. Otherwise the first image is shown
    /// and autoplay starts when there is more than one.
    pub fn on_probe_complete(&self, images: Vec<ProbedImage>) {
        // The guard from self.state() is dropped at the end of this statement,
        // before start_auto() takes the lock again
        let autoplay = self.state().complete(images);
        if autoplay {
            self.start_auto();
        }
    }

    pub fn show_image(&self, index: i64) {
        self.state().show_image(index);
    }

    pub fn next(&self) {
        self.state().next();
    }

    pub fn previous(&self) {
        self.state().previous();
    }

    /// Sets the explicit pause flag. The timer keeps running either way.
    pub fn set_paused(&self, paused: bool) {
        self.state().pause.explicit = paused;
    }

    pub fn start_auto(&self) {
        let mut state = self.state();

        // At most one timer per card: cancel any previous one first
        //
        // take() moves the handle out and leaves None behind
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        // A torn-down card, or one with nothing to cycle, gets no timer
        if state.disposed || state.images.len() < 2 {
            return;
        }

        // Arc::downgrade gives the task a Weak pointer to the same state
        //
        // The state owns the task's JoinHandle; if the task owned an Arc back,
        // neither could ever be freed
        let shared = Arc::downgrade(&self.shared);
        let period = self.interval;
        state.timer = Some(tokio::spawn(autoplay(shared, period)));
    }

    pub fn stop_auto(&self) {
        if let Some(timer) = self.state().timer.take() {
            timer.abort(); // the task stops at its next .await point
        }
    }

    /// Click on the card: flips the explicit pause flag, restarting autoplay
    /// if that unpaused a card whose timer had been stopped.
    pub fn toggle_on_activate(&self) {
        // Decide inside a block so the lock is released before start_auto()
        let restart = {
            let mut state = self.state();
            let was_paused = state.pause.explicit;
            state.pause.explicit = !was_paused;
            was_paused && state.phase == Phase::Active && !state.is_autoplaying()
        };

        if restart {
            self.start_auto();
        }
    }

    pub fn handle(&self, gesture: Gesture) -> GestureOutcome {
        match gesture {
            // Click toggles pause (and may restart a stopped timer)
            Gesture::Activate => {
                self.toggle_on_activate();
                GestureOutcome::default()
            }
            // Pointer or keyboard focus on the card pauses it...
            Gesture::HoverEnter | Gesture::FocusEnter => {
                self.state().pause.hover = true;
                GestureOutcome::default()
            }
            // ...and leaving clears only that reason, never an explicit pause
            Gesture::HoverLeave | Gesture::FocusLeave => {
                self.state().pause.hover = false;
                GestureOutcome::default()
            }
            // Arrow keys navigate; the page must not scroll as well
            Gesture::ArrowRight => {
                self.next();
                GestureOutcome { default_prevented: true }
            }
            Gesture::ArrowLeft => {
                self.previous();
                GestureOutcome { default_prevented: true }
            }
            // Space flips the explicit flag without touching the timer
            Gesture::Space => {
                let mut state = self.state();
                state.pause.explicit = !state.pause.explicit;
                GestureOutcome { default_prevented: true }
            }
        }
    }

    /// Tears the card down: cancels autoplay and ignores any late probe result.
    pub fn dispose(&self) {
        let mut state = self.state();
        // Set first, so a probe finishing right after this can't start a timer
        state.disposed = true;
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    pub fn status(&self) -> CarouselStatus {
        self.state().status()
    }

    pub fn current_index(&self) -> usize {
        self.state().current_index
    }

    pub fn is_paused(&self) -> bool {
        self.state().pause.is_paused()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.state().is_autoplaying()
    }

    pub fn view(&self) -> CardView {
        self.state().view.clone()
    }

    pub fn snapshot(&self) -> CardSnapshot {
        // One lock for the whole snapshot so the fields agree with each other
        let state = self.state();
        CardSnapshot {
            id: self.id,
            status: state.status(),
            current_index: state.current_index,
            image_count: state.images.len(),
            images: state.images.clone(),
            view: state.view.clone(),
        }
    }
}

// Poisoning is ignored: every critical section leaves the record consistent
fn lock(shared: &Mutex<CarouselState>) -> MutexGuard<'_, CarouselState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

// The autoplay task body
//
// Runs until aborted, or until the card it points at no longer exists.
async fn autoplay(shared: Weak<Mutex<CarouselState>>, period: Duration) {
    // interval_at: the first tick fires one period from now, not immediately
    let mut ticker = interval_at(Instant::now() + period, period);
    // A late tick must not be followed by a burst of catch-up ticks
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        // upgrade() turns the Weak back into an Arc if the card still exists
        let Some(state) = shared.upgrade() else {
            break; // every handle was dropped; nothing left to animate
        };

        // Lock, advance (or not, if paused), unlock at the end of the statement
        lock(&state).tick();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a Weak reference in the autoplay task?
//    - The state owns the task's JoinHandle
//    - If the task owned an Arc to the state, the two would keep each other
//      alive forever
//    - With Weak, dropping every Carousel handle ends the task at its next tick
//
// 2. Why std::sync::Mutex and not tokio::sync::Mutex?
//    - Every critical section is short and never awaits
//    - A std Mutex is cheaper and usable from non-async code
//
// 3. What does JoinHandle::abort() do?
//    - It asks the runtime to cancel the task
//    - The task is dropped at its next .await (here: ticker.tick())
//    - is_finished() becomes true shortly after
//
// 4. Why is pausing a flag and not a cancelled timer?
//    - Resuming keeps the original tick rhythm
//    - Hover and click pauses can overlap without juggling timers
// -----------------------------------------------------------------------------
