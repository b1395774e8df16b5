//! Scroll session state
//!
//! Page-wide ambient values recomputed by the scroll handlers and readable by
//! any other presentational code. The state is created once at startup; only
//! the holder of [`AmbientState`] writes it, everyone else gets a
//! [`ScrollSessionReader`].
//!
//! ```
//! use reveal_core::ambient::AmbientState;
//!
//! let state = AmbientState::new();
//! let reader = state.reader();
//!
//! state.record_scroll(400.0, -120.0);
//! assert_eq!(reader.get().scroll_offset, 400.0);
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// Snapshot of the scroll session
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollSession {
    /// Last scroll offset seen by the scroll handlers
    pub scroll_offset: f32,
    /// Last vertical translation applied to the hero region
    pub parallax_offset: f32,
    /// Last published scroll progress in `[0, 1]`
    pub progress: f32,
    /// Number of progress recomputations so far
    pub progress_updates: u64,
}

/// Writable handle to the scroll session
///
/// Uses `Rc` since the page runs on a single thread.
#[derive(Clone, Debug, Default)]
pub struct AmbientState {
    inner: Rc<Cell<ScrollSession>>,
}

impl AmbientState {
    /// Create a fresh session with every value at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view for other components
    pub fn reader(&self) -> ScrollSessionReader {
        ScrollSessionReader {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Current snapshot
    pub fn get(&self) -> ScrollSession {
        self.inner.get()
    }

    /// Record a scroll notification and the parallax offset derived from it
    pub fn record_scroll(&self, scroll_offset: f32, parallax_offset: f32) {
        let mut session = self.inner.get();
        session.scroll_offset = scroll_offset;
        session.parallax_offset = parallax_offset;
        self.inner.set(session);
    }

    /// Record a recomputed scroll progress ratio
    pub fn record_progress(&self, progress: f32) {
        let mut session = self.inner.get();
        session.progress = progress;
        session.progress_updates += 1;
        self.inner.set(session);
    }
}

/// Read-only handle to the scroll session
#[derive(Clone, Debug)]
pub struct ScrollSessionReader {
    inner: Rc<Cell<ScrollSession>>,
}

impl ScrollSessionReader {
    /// Current snapshot
    pub fn get(&self) -> ScrollSession {
        self.inner.get()
    }

    /// Current scroll progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.inner.get().progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_sees_writes() {
        let state = AmbientState::new();
        let reader = state.reader();

        state.record_progress(0.25);
        state.record_progress(0.5);

        let session = reader.get();
        assert_eq!(session.progress, 0.5);
        assert_eq!(session.progress_updates, 2);
        assert_eq!(reader.progress(), 0.5);
    }

    #[test]
    fn test_scroll_does_not_touch_progress() {
        let state = AmbientState::new();
        state.record_progress(0.75);
        state.record_scroll(900.0, -270.0);

        let session = state.get();
        assert_eq!(session.progress, 0.75);
        assert_eq!(session.scroll_offset, 900.0);
        assert_eq!(session.parallax_offset, -270.0);
    }
}
