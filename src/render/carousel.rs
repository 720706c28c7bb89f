//! Slider paging and autoplay
//!
//! Testimonials and reviews are shown a few at a time. [`Carousel`] is the
//! pure state machine; [`Autoplay`] drives it on a tokio interval for as
//! long as it is alive. The same rules are mirrored by the inline script the
//! page shell ships to browsers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Items shown on one slide
pub const SLIDE_SIZE: usize = 3;

/// Time each slide stays up before advancing
pub const AUTOPLAY_INTERVAL: Duration = Duration::from_secs(6);

/// Split items into slides of `per_slide`, the last slide holding the rest
pub fn paginate<T>(items: &[T], per_slide: usize) -> Vec<&[T]> {
    items.chunks(per_slide.max(1)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    slide_count: usize,
    index: usize,
    hovered: bool,
}

impl Carousel {
    pub fn new(slide_count: usize) -> Self {
        Self {
            slide_count,
            index: 0,
            hovered: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn is_paused(&self) -> bool {
        self.hovered
    }

    /// Move to the next slide, wrapping to the first
    pub fn advance(&mut self) {
        if self.slide_count > 0 {
            self.index = (self.index + 1) % self.slide_count;
        }
    }

    /// Move to the previous slide, wrapping to the last
    pub fn retreat(&mut self) {
        if self.slide_count > 0 {
            self.index = (self.index + self.slide_count - 1) % self.slide_count;
        }
    }

    pub fn go_to(&mut self, index: usize) {
        if index < self.slide_count {
            self.index = index;
        }
    }

    /// Timer tick: advances unless the pointer is over the slider
    pub fn tick(&mut self) {
        if !self.hovered && self.slide_count > 1 {
            self.advance();
        }
    }

    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = false;
    }
}

/// A carousel advanced on a fixed period until dropped
#[derive(Debug)]
pub struct Autoplay {
    state: Arc<Mutex<Carousel>>,
    task: JoinHandle<()>,
}

impl Autoplay {
    pub fn start(carousel: Carousel, period: Duration) -> Self {
        let state = Arc::new(Mutex::new(carousel));
        let ticker = Arc::clone(&state);

        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                ticker.lock().unwrap_or_else(PoisonError::into_inner).tick();
            }
        });

        Self { state, task }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Carousel) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn index(&self) -> usize {
        self.with(|c| c.index())
    }

    pub fn snapshot(&self) -> Carousel {
        self.with(|c| *c)
    }

    pub fn pointer_enter(&self) {
        self.with(Carousel::pointer_enter);
    }

    pub fn pointer_leave(&self) {
        self.with(Carousel::pointer_leave);
    }
}

impl Drop for Autoplay {
    fn drop(&mut self) {
        self.task.abort();
    }
}
