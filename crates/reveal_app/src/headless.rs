//! Headless runtime
//!
//! Runs a [`RevealApp`] against an in-memory [`PageTree`] with a
//! virtual-clock [`TimerQueue`]. Intersection entries are computed
//! geometrically from element bounds and the scroll position, so a whole
//! page session (load, scroll, hover, wait) can be replayed
//! deterministically.
//!
//! ```
//! use reveal_app::{HeadlessRuntime, RevealConfig};
//! use reveal_core::{Element, PageHost, PageTree, Rect, Size};
//!
//! let mut page = PageTree::new(Size::new(1000.0, 800.0));
//! let quote = page.append(
//!     page.root(),
//!     Element::new("blockquote")
//!         .class("quote-section")
//!         .bounds(Rect::new(0.0, 1200.0, 1000.0, 200.0)),
//! );
//! page.set_document_height(3000.0);
//!
//! let mut runtime = HeadlessRuntime::new(page, RevealConfig::default());
//! runtime.ready();
//! assert!(!runtime.page().has_class(&quote, "animate-fade-up"));
//!
//! runtime.scroll_to(800.0);
//! assert!(runtime.page().has_class(&quote, "animate-fade-up"));
//! ```

use indexmap::IndexSet;
use reveal_animation::TimerQueue;
use reveal_core::{intersection_ratio, Key, NodeId, PageEvent, PageTree, ScrollSessionReader, Size};
use reveal_sequencer::{IntersectionEntry, RevealOutcome, ViewportObserver};

use crate::app::{ReadySummary, RevealApp};
use crate::config::RevealConfig;

/// Viewport observer over a [`PageTree`]'s geometry
#[derive(Debug, Default)]
pub struct GeometryObserver {
    observed: IndexSet<NodeId>,
}

impl GeometryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements currently observed, in observation order
    pub fn observed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.observed.iter().copied()
    }

    /// Measure every observed element against the page's current viewport
    pub fn measure(&self, page: &PageTree, config: &RevealConfig) -> Vec<IntersectionEntry<NodeId>> {
        let root = config.observer.root_margin.apply(&page.viewport_rect());
        self.observed
            .iter()
            .filter_map(|node| {
                let bounds = page.bounds(*node)?;
                let ratio = intersection_ratio(&bounds, &root);
                Some(IntersectionEntry {
                    target: *node,
                    ratio: ratio.unwrap_or(0.0),
                    is_intersecting: ratio.is_some(),
                })
            })
            .collect()
    }
}

impl ViewportObserver<NodeId> for GeometryObserver {
    fn observe(&mut self, node: &NodeId) {
        self.observed.insert(*node);
    }

    fn unobserve(&mut self, node: &NodeId) {
        self.observed.shift_remove(node);
    }
}

/// The app as wired by [`HeadlessRuntime`]
pub type HeadlessApp = RevealApp<PageTree, TimerQueue<PageTree>, GeometryObserver>;

/// A page session driven by explicit calls instead of a browser
pub struct HeadlessRuntime {
    app: HeadlessApp,
    revealed: Vec<RevealOutcome<NodeId>>,
}

impl HeadlessRuntime {
    /// Runtime with geometric intersection observation
    pub fn new(page: PageTree, config: RevealConfig) -> Self {
        Self::with_observer(page, config, Some(GeometryObserver::new()))
    }

    /// Runtime for a host without an intersection primitive
    pub fn without_observer(page: PageTree, config: RevealConfig) -> Self {
        Self::with_observer(page, config, None)
    }

    fn with_observer(page: PageTree, config: RevealConfig, observer: Option<GeometryObserver>) -> Self {
        Self {
            app: RevealApp::new(config, page, TimerQueue::new(), observer),
            revealed: Vec::new(),
        }
    }

    /// Page-ready: wire everything and deliver the initial intersections
    pub fn ready(&mut self) -> ReadySummary<NodeId> {
        let summary = self.app.ready();
        self.observe_viewport();
        self.settle();
        summary
    }

    /// Scroll to `offset` and deliver the resulting events
    pub fn scroll_to(&mut self, offset: f32) {
        let (page, _) = self.app.parts_mut();
        page.set_scroll_offset(offset);
        self.dispatch(PageEvent::Scroll);
    }

    /// Resize the viewport and re-measure intersections
    pub fn resize(&mut self, viewport: Size) {
        let (page, _) = self.app.parts_mut();
        page.set_viewport(viewport);
        self.observe_viewport();
        self.settle();
    }

    pub fn click(&mut self, node: NodeId) {
        self.dispatch(PageEvent::Click(node));
    }

    pub fn hover_enter(&mut self, node: NodeId) {
        self.dispatch(PageEvent::PointerEnter(node));
    }

    pub fn hover_leave(&mut self, node: NodeId) {
        self.dispatch(PageEvent::PointerLeave(node));
    }

    /// Move focus to `node`; the resulting blur/focus events are dispatched
    pub fn focus(&mut self, node: NodeId) {
        let (page, _) = self.app.parts_mut();
        page.focus(node);
        self.drain_page_events();
        self.settle();
    }

    pub fn press_key(&mut self, name: &str) {
        self.dispatch(PageEvent::KeyDown(Key::from_name(name)));
    }

    /// Finish loading an image and deliver its load event
    pub fn image_loaded(&mut self, node: NodeId) {
        let (page, _) = self.app.parts_mut();
        page.set_image_complete(node, true);
        self.dispatch(PageEvent::ImageLoaded(node));
    }

    /// Deliver an arbitrary page event
    pub fn dispatch(&mut self, event: PageEvent<NodeId>) {
        let scrolled = matches!(event, PageEvent::Scroll);
        self.app.handle_event(event);
        self.drain_page_events();
        if scrolled {
            self.observe_viewport();
        }
        self.settle();
    }

    /// Let `ms` milliseconds of virtual time pass
    pub fn advance_by(&mut self, ms: u64) -> usize {
        let (page, timers) = self.app.parts_mut();
        let fired = timers.advance_by(ms, page);
        self.drain_page_events();
        fired
    }

    /// Let virtual time pass until `t` milliseconds
    pub fn advance_to(&mut self, t: u64) -> usize {
        let (page, timers) = self.app.parts_mut();
        let fired = timers.advance_to(t, page);
        self.drain_page_events();
        fired
    }

    /// Run every pending timer
    pub fn run_until_idle(&mut self) -> usize {
        let (page, timers) = self.app.parts_mut();
        let fired = timers.run_until_idle(page);
        self.drain_page_events();
        fired
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.app.scheduler().now()
    }

    /// Timers not yet fired
    pub fn pending_timers(&self) -> usize {
        self.app.scheduler().pending_count()
    }

    pub fn page(&self) -> &PageTree {
        self.app.host()
    }

    pub fn app(&self) -> &HeadlessApp {
        &self.app
    }

    /// Read-only view of the scroll session
    pub fn session(&self) -> ScrollSessionReader {
        self.app.session()
    }

    /// Every reveal so far, in reveal order
    pub fn revealed(&self) -> &[RevealOutcome<NodeId>] {
        &self.revealed
    }

    fn observe_viewport(&mut self) {
        let entries = match self.app.watcher().observer() {
            Some(observer) => observer.measure(self.app.host(), self.app.config()),
            None => return,
        };
        if entries.is_empty() {
            return;
        }
        let outcomes = self.app.handle_intersections(entries);
        self.revealed.extend(outcomes);
    }

    fn drain_page_events(&mut self) {
        loop {
            let (page, _) = self.app.parts_mut();
            let events = page.take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                self.app.handle_event(event);
            }
        }
    }

    /// Run tasks due right now (zero-delay stagger items)
    fn settle(&mut self) {
        self.advance_by(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{Element, PageHost, Rect};

    fn section(page: &mut PageTree, class: &str, top: f32, height: f32) -> NodeId {
        page.append(
            page.root(),
            Element::new("section")
                .class(class)
                .bounds(Rect::new(0.0, top, 1000.0, height)),
        )
    }

    #[test]
    fn test_initial_viewport_revealed_on_ready() {
        let mut page = PageTree::new(Size::new(1000.0, 800.0));
        let above = section(&mut page, "quote-section", 100.0, 200.0);
        let below = section(&mut page, "section-divider", 1500.0, 2.0);
        page.set_document_height(3000.0);

        let mut runtime = HeadlessRuntime::new(page, RevealConfig::default());
        runtime.ready();

        assert!(runtime.page().has_class(&above, "animate-fade-up"));
        assert!(!runtime.page().has_class(&below, "animate-fade-right"));
        assert_eq!(runtime.revealed().len(), 1);
    }

    #[test]
    fn test_bottom_margin_delays_reveal() {
        let mut page = PageTree::new(Size::new(1000.0, 800.0));
        // Top edge 20px above the viewport bottom, inside the 50px margin.
        let quote = section(&mut page, "quote-section", 780.0, 400.0);
        page.set_document_height(3000.0);

        let mut runtime = HeadlessRuntime::new(page, RevealConfig::default());
        runtime.ready();
        assert!(!runtime.page().has_class(&quote, "animate-fade-up"));

        // 70 of the section's 400px now inside the adjusted viewport.
        runtime.scroll_to(100.0);
        assert!(runtime.page().has_class(&quote, "animate-fade-up"));
    }

    #[test]
    fn test_geometry_observer_tracks_set() {
        let mut observer = GeometryObserver::new();
        let mut page = PageTree::new(Size::new(100.0, 100.0));
        let a = section(&mut page, "quote-section", 0.0, 10.0);
        let b = section(&mut page, "quote-section", 500.0, 10.0);

        observer.observe(&a);
        observer.observe(&b);
        observer.unobserve(&a);
        assert_eq!(observer.observed().collect::<Vec<_>>(), vec![b]);

        let entries = observer.measure(&page, &RevealConfig::default());
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_intersecting);
    }
}
