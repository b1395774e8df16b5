//! Reveal Core
//!
//! Foundational types shared by every Reveal crate:
//!
//! - **Page host**: the [`PageHost`] trait every page backend implements
//! - **Vocabulary**: category tags, visual tokens and selectors
//! - **Geometry**: rectangles, root margins and intersection ratios
//! - **Events**: page events delivered to the ambient handlers
//! - **Ambient state**: the page-wide scroll session
//! - **Headless page**: [`PageTree`], an in-memory page for tests and simulation

pub mod ambient;
pub mod events;
pub mod geometry;
pub mod host;
pub mod tree;
pub mod vocab;

pub use ambient::{AmbientState, ScrollSession, ScrollSessionReader};
pub use events::{Key, PageEvent};
pub use geometry::{intersection_ratio, MarginParseError, Rect, RootMargin, ScrollMetrics, Size};
pub use host::{PageHost, StyleRuleId};
pub use tree::{Element, NodeId, PageTree};
pub use vocab::{Category, Selector, VisualToken};
