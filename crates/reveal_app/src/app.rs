//! Page wiring
//!
//! [`RevealApp`] owns the page host, the scheduler and the visibility
//! watcher. A backend drives it with three calls:
//!
//! - [`ready`](RevealApp::ready) once the document is parsed
//! - [`handle_intersections`](RevealApp::handle_intersections) for every
//!   batch of intersection entries
//! - [`handle_event`](RevealApp::handle_event) for every page event
//!
//! Everything else (reveal routines, stagger timers, ambient handlers) is
//! dispatched from there.

use std::fmt;

use reveal_animation::{Debouncer, TaskScheduler};
use reveal_core::vocab::{CONTENT_IMAGE, HERO_SECTION, NAV_ITEM};
use reveal_core::{AmbientState, Key, PageEvent, PageHost, ScrollSessionReader, Selector};
use reveal_sequencer::{reveal, IntersectionEntry, RevealOutcome, ViewportObserver, VisibilityWatcher};

use crate::config::RevealConfig;
use crate::handlers;

/// What [`RevealApp::ready`] attached
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadySummary<N> {
    /// Animatable elements now watched
    pub watched: usize,
    /// Content images to listen to for load events
    pub lazy_images: Vec<N>,
    /// Hero region driven by the parallax handler
    pub hero: Option<N>,
}

/// The reveal pipeline and ambient handlers bound to one page
pub struct RevealApp<H, S, O>
where
    H: PageHost,
    S: TaskScheduler<H>,
{
    config: RevealConfig,
    host: H,
    scheduler: S,
    watcher: VisibilityWatcher<H::Node, O>,
    ambient: AmbientState,
    progress: Debouncer<S::Handle>,
    hero: Option<H::Node>,
    ready: bool,
}

impl<H, S, O> RevealApp<H, S, O>
where
    H: PageHost,
    H::Node: 'static,
    S: TaskScheduler<H>,
    O: ViewportObserver<H::Node>,
{
    /// Bind the pipeline to a page
    ///
    /// `observer` is `None` when the host lacks an intersection primitive;
    /// the page then never reveals but the ambient handlers still work.
    pub fn new(config: RevealConfig, host: H, scheduler: S, observer: Option<O>) -> Self {
        let watcher = VisibilityWatcher::new(config.observer, observer);
        let progress = Debouncer::new(config.interaction.progress_debounce_ms);
        Self {
            config,
            host,
            scheduler,
            watcher,
            ambient: AmbientState::new(),
            progress,
            hero: None,
            ready: false,
        }
    }

    /// Attach everything to the parsed document
    ///
    /// Watches all animatable elements, marks already-loaded images, locates
    /// the hero region and installs the transient preload rule. Calling it a
    /// second time does nothing.
    pub fn ready(&mut self) -> ReadySummary<H::Node> {
        if self.ready {
            tracing::warn!("page already wired; ignoring repeated ready");
            return ReadySummary {
                watched: self.watcher.pending_count(),
                lazy_images: Vec::new(),
                hero: self.hero.clone(),
            };
        }
        self.ready = true;

        let animatable = self.host.select(None, Selector::ANIMATABLE);
        let watched = self.watcher.register(animatable);

        let lazy_images = handlers::attach_lazy_load(&mut self.host);
        self.hero = self.host.select_first(None, Selector::Class(HERO_SECTION));
        handlers::suppress_initial_animations(
            &mut self.host,
            &mut self.scheduler,
            &self.config.interaction,
        );

        tracing::info!(
            watched,
            lazy_images = lazy_images.len(),
            hero = self.hero.is_some(),
            degraded = self.watcher.is_degraded(),
            "reveal ready"
        );

        ReadySummary {
            watched,
            lazy_images,
            hero: self.hero.clone(),
        }
    }

    /// Reveal every element a batch of intersection entries made visible
    pub fn handle_intersections(
        &mut self,
        entries: impl IntoIterator<Item = IntersectionEntry<H::Node>>,
    ) -> Vec<RevealOutcome<H::Node>> {
        let revealed = self.watcher.process(entries);
        revealed
            .iter()
            .map(|node| reveal(&mut self.host, &mut self.scheduler, &self.config.stagger, node))
            .collect()
    }

    /// Dispatch one page event to the ambient handlers
    pub fn handle_event(&mut self, event: PageEvent<H::Node>) {
        tracing::trace!(event = event.name(), "page event");
        let interaction = &self.config.interaction;
        match event {
            PageEvent::Click(node) => {
                if self.host.has_class(&node, NAV_ITEM) {
                    handlers::press_feedback(&mut self.host, &mut self.scheduler, interaction, &node);
                }
            }
            PageEvent::PointerEnter(node) => {
                if self.host.matches(&node, Selector::IMAGE_FRAMES) {
                    handlers::hover_enter(&mut self.host, interaction, &node);
                }
            }
            PageEvent::PointerLeave(node) => {
                if self.host.matches(&node, Selector::IMAGE_FRAMES) {
                    handlers::hover_leave(&mut self.host, &node);
                }
            }
            PageEvent::Focus(node) => {
                if self.host.matches(&node, Selector::Focusable) {
                    handlers::focus_ring(&mut self.host, interaction, &node);
                }
            }
            PageEvent::Blur(node) => {
                if self.host.matches(&node, Selector::Focusable) {
                    handlers::clear_focus_ring(&mut self.host, &node);
                }
            }
            PageEvent::ImageLoaded(node) => {
                if self.host.has_class(&node, CONTENT_IMAGE) {
                    handlers::mark_loaded(&mut self.host, &node);
                }
            }
            PageEvent::KeyDown(Key::Escape) => handlers::escape(&mut self.host),
            PageEvent::KeyDown(Key::Other(_)) => {}
            PageEvent::Scroll => {
                handlers::apply_parallax(
                    &mut self.host,
                    interaction,
                    &self.ambient,
                    self.hero.as_ref(),
                );
                handlers::schedule_progress::<H, S>(
                    &mut self.progress,
                    &mut self.scheduler,
                    &self.ambient,
                );
            }
        }
    }

    /// Whether [`ready`](Self::ready) has run
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Active configuration
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Page host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Scheduler
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Visibility watcher
    pub fn watcher(&self) -> &VisibilityWatcher<H::Node, O> {
        &self.watcher
    }

    /// Read-only view of the scroll session
    pub fn session(&self) -> ScrollSessionReader {
        self.ambient.reader()
    }

    /// Host and scheduler together, for backends that drive timers
    pub fn parts_mut(&mut self) -> (&mut H, &mut S) {
        (&mut self.host, &mut self.scheduler)
    }
}

impl<H, S, O> fmt::Debug for RevealApp<H, S, O>
where
    H: PageHost,
    S: TaskScheduler<H>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealApp")
            .field("ready", &self.ready)
            .field("watcher", &self.watcher)
            .field("hero", &self.hero)
            .field("session", &self.ambient.get())
            .finish_non_exhaustive()
    }
}
