//! Stagger planning
//!
//! A stagger applies the same visual token to a group of sibling elements
//! with increasing delays, producing a cascading reveal. Planning is pure:
//! the functions here turn element groups into [`RevealTask`]s, and the
//! caller hands those to a [`TaskScheduler`](crate::scheduler::TaskScheduler).
//!
//! # Example
//!
//! ```
//! use reveal_animation::stagger::{stagger_group, StaggerConfig};
//! use reveal_core::VisualToken;
//!
//! let tasks = stagger_group(["h2", "p", "p"], StaggerConfig::new(100), VisualToken::FadeUp, 0);
//! let delays: Vec<u32> = tasks.iter().map(|t| t.delay_ms).collect();
//! assert_eq!(delays, vec![0, 100, 200]);
//! ```

use reveal_core::VisualToken;
use serde::{Deserialize, Serialize};

/// Delay step between consecutive items of a group
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Delay between each item's mutation (ms)
    pub delay_ms: u32,
    /// Number of steps to wait before the first item
    #[serde(default)]
    pub lead: u32,
}

impl StaggerConfig {
    /// Stagger with `delay_ms` between items, first item immediately
    pub const fn new(delay_ms: u32) -> Self {
        Self { delay_ms, lead: 0 }
    }

    /// Wait `lead` steps before the first item
    pub const fn with_lead(mut self, lead: u32) -> Self {
        self.lead = lead;
        self
    }

    /// Calculate delay for a specific item index
    pub fn delay_for_index(&self, index: usize) -> u32 {
        let steps = u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_add(self.lead);
        self.delay_ms.saturating_mul(steps)
    }
}

/// How nested text delays in a composite reveal relate to their block's delay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedDelay {
    /// Nested delays are measured from the reveal moment, ignoring the
    /// block's own delay
    #[default]
    Independent,
    /// Nested delays start when the block's own delay has elapsed
    Compounded,
}

/// Step sizes of every reveal routine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerTimings {
    /// Text of a content section
    pub text: StaggerConfig,
    /// Text blocks of an initiative section
    pub block: StaggerConfig,
    /// Text inside each initiative block
    pub nested: StaggerConfig,
    /// Image placeholders of an initiative section
    pub image: StaggerConfig,
    /// Relation between block and nested delays
    pub nested_delay: NestedDelay,
}

impl Default for StaggerTimings {
    fn default() -> Self {
        Self {
            text: StaggerConfig::new(100),
            block: StaggerConfig::new(200),
            nested: StaggerConfig::new(50),
            image: StaggerConfig::new(300).with_lead(1),
            nested_delay: NestedDelay::Independent,
        }
    }
}

/// One delayed visual-state mutation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealTask<N> {
    /// Element receiving the token
    pub target: N,
    /// Token to add
    pub token: VisualToken,
    /// Delay from the reveal moment (ms)
    pub delay_ms: u32,
}

/// Plan a stagger over `items` in order, offset by `base_delay_ms`
pub fn stagger_group<N>(
    items: impl IntoIterator<Item = N>,
    stagger: StaggerConfig,
    token: VisualToken,
    base_delay_ms: u32,
) -> Vec<RevealTask<N>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, target)| RevealTask {
            target,
            token,
            delay_ms: base_delay_ms.saturating_add(stagger.delay_for_index(index)),
        })
        .collect()
}

/// Plan a composite reveal
///
/// `blocks` holds each text block with its own text-bearing descendants, in
/// document order. Text gets fade-up, images get scale-in. The two groups are
/// indexed independently.
pub fn plan_composite<N>(
    blocks: Vec<(N, Vec<N>)>,
    images: Vec<N>,
    timings: &StaggerTimings,
) -> Vec<RevealTask<N>> {
    let mut plan = Vec::new();
    for (index, (_block, text)) in blocks.into_iter().enumerate() {
        let base = match timings.nested_delay {
            NestedDelay::Independent => 0,
            NestedDelay::Compounded => timings.block.delay_for_index(index),
        };
        plan.extend(stagger_group(
            text,
            timings.nested,
            VisualToken::FadeUp,
            base,
        ));
    }
    plan.extend(stagger_group(
        images,
        timings.image,
        VisualToken::ScaleIn,
        0,
    ));
    plan
}
