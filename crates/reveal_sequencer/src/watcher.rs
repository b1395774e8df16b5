//! One-shot visibility watching
//!
//! [`VisibilityWatcher`] wraps a viewport-intersection primitive
//! ([`ViewportObserver`]) and turns its stream of intersection entries into
//! one "became visible" notification per element. Once an element has been
//! reported it is unobserved and never reported again.
//!
//! When no observation primitive is available the watcher degrades to a
//! no-op: elements register fine but are never revealed.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use reveal_core::RootMargin;
use rustc_hash::{FxBuildHasher, FxHashSet};
use serde::{Deserialize, Serialize};

/// Viewport-intersection primitive
pub trait ViewportObserver<N> {
    /// Start delivering intersection entries for `node`
    fn observe(&mut self, node: &N);

    /// Stop delivering intersection entries for `node`
    fn unobserve(&mut self, node: &N);
}

/// One intersection measurement delivered by the observer
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<N> {
    /// Observed element
    pub target: N,
    /// Visible fraction of the element, in `[0, 1]`
    pub ratio: f32,
    /// Whether the element touches the margin-adjusted viewport at all
    pub is_intersecting: bool,
}

/// Observer configuration
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Visible fraction at which an element counts as revealed
    pub threshold: f32,
    /// Margin applied to the viewport before intersection checks
    pub root_margin: RootMargin,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::default(),
        }
    }
}

/// Tracks pending elements and reports each one once
pub struct VisibilityWatcher<N, O> {
    config: ObserverConfig,
    observer: Option<O>,
    pending: IndexSet<N, FxBuildHasher>,
    revealed: FxHashSet<N>,
}

impl<N, O> VisibilityWatcher<N, O>
where
    N: Clone + Eq + Hash + fmt::Debug,
    O: ViewportObserver<N>,
{
    /// Create a watcher over `observer`
    ///
    /// Pass `None` when the host has no intersection primitive.
    pub fn new(config: ObserverConfig, observer: Option<O>) -> Self {
        if observer.is_none() {
            tracing::warn!("viewport observation unavailable; elements will never reveal");
        }
        Self {
            config,
            observer,
            pending: IndexSet::default(),
            revealed: FxHashSet::default(),
        }
    }

    /// Observer configuration
    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// The wrapped observer, if available
    pub fn observer(&self) -> Option<&O> {
        self.observer.as_ref()
    }

    /// Whether the watcher runs without an observation primitive
    pub fn is_degraded(&self) -> bool {
        self.observer.is_none()
    }

    /// Begin observing `nodes`
    ///
    /// Elements already pending or already revealed are skipped. Returns the
    /// number of newly registered elements.
    pub fn register(&mut self, nodes: impl IntoIterator<Item = N>) -> usize {
        let Some(observer) = self.observer.as_mut() else {
            return 0;
        };
        let mut added = 0;
        for node in nodes {
            if self.revealed.contains(&node) || self.pending.contains(&node) {
                continue;
            }
            observer.observe(&node);
            self.pending.insert(node);
            added += 1;
        }
        tracing::debug!(added, pending = self.pending.len(), "registered elements");
        added
    }

    /// Process one batch of intersection entries
    ///
    /// Returns the elements revealed by this batch, in entry order. Each one
    /// is unobserved before returning; entries for elements that are not
    /// pending are ignored.
    pub fn process(&mut self, entries: impl IntoIterator<Item = IntersectionEntry<N>>) -> Vec<N> {
        let Some(observer) = self.observer.as_mut() else {
            return Vec::new();
        };
        let mut revealed = Vec::new();
        for entry in entries {
            // The ratio is relative to the element, so one taller than
            // viewport / threshold never reaches it and stays pending.
            if !entry.is_intersecting || entry.ratio < self.config.threshold {
                continue;
            }
            if !self.pending.shift_remove(&entry.target) {
                continue;
            }
            observer.unobserve(&entry.target);
            self.revealed.insert(entry.target.clone());
            revealed.push(entry.target);
        }
        revealed
    }

    /// Elements still waiting to be revealed, in registration order
    pub fn pending(&self) -> impl Iterator<Item = &N> {
        self.pending.iter()
    }

    /// Number of elements still waiting to be revealed
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `node` is registered and not yet revealed
    pub fn is_pending(&self, node: &N) -> bool {
        self.pending.contains(node)
    }

    /// Whether `node` has been revealed
    pub fn is_revealed(&self, node: &N) -> bool {
        self.revealed.contains(node)
    }
}

impl<N, O> fmt::Debug for VisibilityWatcher<N, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityWatcher")
            .field("config", &self.config)
            .field("degraded", &self.observer.is_none())
            .field("pending", &self.pending.len())
            .field("revealed", &self.revealed.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        observed: Vec<u32>,
        unobserved: Vec<u32>,
    }

    impl ViewportObserver<u32> for Recorder {
        fn observe(&mut self, node: &u32) {
            self.observed.push(*node);
        }

        fn unobserve(&mut self, node: &u32) {
            self.unobserved.push(*node);
        }
    }

    fn entry(target: u32, ratio: f32) -> IntersectionEntry<u32> {
        IntersectionEntry {
            target,
            ratio,
            is_intersecting: ratio > 0.0,
        }
    }

    fn watcher() -> VisibilityWatcher<u32, Recorder> {
        VisibilityWatcher::new(ObserverConfig::default(), Some(Recorder::default()))
    }

    #[test]
    fn test_register_observes_once() {
        let mut watcher = watcher();
        assert_eq!(watcher.register([1, 2, 2, 3]), 3);
        assert_eq!(watcher.register([1]), 0);
        assert_eq!(watcher.observer().unwrap().observed, vec![1, 2, 3]);
        assert_eq!(watcher.pending_count(), 3);
    }

    #[test]
    fn test_reveal_at_threshold() {
        let mut watcher = watcher();
        watcher.register([1, 2, 3]);

        let revealed = watcher.process([entry(1, 0.05), entry(2, 0.1), entry(3, 0.8)]);
        assert_eq!(revealed, vec![2, 3]);
        assert!(watcher.is_pending(&1));
        assert!(watcher.is_revealed(&2));
        assert_eq!(watcher.observer().unwrap().unobserved, vec![2, 3]);
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let mut watcher = watcher();
        watcher.register([7]);

        assert_eq!(watcher.process([entry(7, 1.0)]), vec![7]);
        assert!(watcher.process([entry(7, 1.0)]).is_empty());
        // Re-registering a revealed element does not bring it back.
        assert_eq!(watcher.register([7]), 0);
        assert!(!watcher.is_pending(&7));
        assert_eq!(watcher.observer().unwrap().unobserved, vec![7]);
    }

    #[test]
    fn test_non_intersecting_entry_ignored() {
        let mut watcher = watcher();
        watcher.register([1]);
        let revealed = watcher.process([IntersectionEntry {
            target: 1,
            ratio: 0.5,
            is_intersecting: false,
        }]);
        assert!(revealed.is_empty());
    }

    #[test]
    fn test_unregistered_entry_ignored() {
        let mut watcher = watcher();
        assert!(watcher.process([entry(9, 1.0)]).is_empty());
        assert!(!watcher.is_revealed(&9));
    }

    #[test]
    fn test_degraded_watcher_never_reveals() {
        let mut watcher: VisibilityWatcher<u32, Recorder> =
            VisibilityWatcher::new(ObserverConfig::default(), None);
        assert!(watcher.is_degraded());
        assert_eq!(watcher.register([1, 2]), 0);
        assert!(watcher.process([entry(1, 1.0)]).is_empty());
        assert_eq!(watcher.pending_count(), 0);
    }
}
