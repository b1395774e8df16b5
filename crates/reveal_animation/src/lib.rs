//! Reveal Animation
//!
//! Timing building blocks for the reveal pipeline.
//!
//! # Features
//!
//! - **Task scheduling**: the [`TaskScheduler`] capability and a virtual-clock
//!   [`TimerQueue`] for deterministic runs
//! - **Stagger planning**: pure planning of cascading reveals
//! - **Debouncing**: trailing-edge [`Debouncer`] for bursty events

pub mod debounce;
pub mod scheduler;
pub mod stagger;

pub use debounce::Debouncer;
pub use scheduler::{Task, TaskScheduler, TimerId, TimerQueue};
pub use stagger::{
    plan_composite, stagger_group, NestedDelay, RevealTask, StaggerConfig, StaggerTimings,
};
