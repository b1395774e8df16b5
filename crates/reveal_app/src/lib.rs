//! Reveal Application
//!
//! Binds the reveal pipeline and the ambient interaction handlers to a page.
//!
//! # Example (Headless)
//!
//! ```
//! use reveal_app::prelude::*;
//!
//! let mut page = PageTree::new(Size::new(1000.0, 800.0));
//! let section = page.append(
//!     page.root(),
//!     Element::new("section")
//!         .class("content-section")
//!         .bounds(Rect::new(0.0, 0.0, 1000.0, 400.0)),
//! );
//! for tag in ["h2", "p", "p"] {
//!     page.append(section, Element::new(tag));
//! }
//!
//! let mut runtime = HeadlessRuntime::new(page, RevealConfig::default());
//! runtime.ready();
//! runtime.advance_by(200);
//! assert_eq!(runtime.revealed().len(), 1);
//! ```
//!
//! # Example (Custom Host)
//!
//! ```ignore
//! use reveal_app::prelude::*;
//!
//! let config = RevealConfig::load(Path::new("reveal.toml"))?;
//! let mut app = RevealApp::new(config, my_page, my_timers, Some(my_observer));
//! app.ready();
//!
//! // from the host's intersection callback
//! app.handle_intersections(entries);
//! // from the host's event listeners
//! app.handle_event(PageEvent::Scroll);
//! ```

mod app;
mod config;
mod error;
pub mod handlers;
pub mod headless;

pub use app::{ReadySummary, RevealApp};
pub use config::{InteractionConfig, RevealConfig};
pub use error::{Result, RevealError};
pub use headless::{GeometryObserver, HeadlessApp, HeadlessRuntime};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::{ReadySummary, RevealApp};
    pub use crate::config::{InteractionConfig, RevealConfig};
    pub use crate::error::{Result, RevealError};
    pub use crate::headless::HeadlessRuntime;

    // Pipeline
    pub use reveal_animation::{StaggerTimings, TaskScheduler, TimerQueue};
    pub use reveal_sequencer::{IntersectionEntry, ObserverConfig, ViewportObserver};

    // Core types
    pub use reveal_core::{
        Element, Key, NodeId, PageEvent, PageHost, PageTree, Rect, RootMargin, Size,
    };
}
