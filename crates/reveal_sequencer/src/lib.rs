//! Reveal Sequencer
//!
//! The viewport-triggered reveal pipeline:
//!
//! ```text
//! ViewportObserver ──entries──▶ VisibilityWatcher ──revealed once──▶ classify
//!                                                                      │
//!                                   TaskScheduler ◀──RevealTasks── reveal routine
//! ```
//!
//! - [`VisibilityWatcher`] reports each registered element once, then stops
//!   tracking it
//! - [`classify`] maps an element's category tag to a [`RevealRoutine`]
//! - [`reveal`] applies the routine, scheduling staggered mutations

pub mod classify;
pub mod routine;
pub mod watcher;

pub use classify::{classify, RevealRoutine};
pub use routine::{plan_content, plan_initiative, reveal, schedule_plan, RevealOutcome};
pub use watcher::{IntersectionEntry, ObserverConfig, ViewportObserver, VisibilityWatcher};
