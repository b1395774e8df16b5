//! Page host abstraction
//!
//! Everything the sequencer and the ambient handlers do to a page goes
//! through [`PageHost`]. The headless [`PageTree`](crate::tree::PageTree)
//! implements it in memory; the web backend implements it over the live DOM.
//!
//! All operations are best-effort: a query that matches nothing returns an
//! empty collection and a mutation on a missing node is ignored.

use std::fmt::Debug;
use std::hash::Hash;

use crate::geometry::ScrollMetrics;
use crate::vocab::Selector;

/// Handle to a style rule installed with [`PageHost::insert_style_rule`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StyleRuleId(pub u32);

/// A page the sequencer can query and mutate
pub trait PageHost {
    /// Handle to an element of the page
    type Node: Clone + Eq + Hash + Debug;

    /// Elements matching `selector`, in document order
    ///
    /// With a scope, only descendants of the scope are searched (the scope
    /// itself is excluded). Without one, the whole document is searched.
    fn select(&self, scope: Option<&Self::Node>, selector: Selector) -> Vec<Self::Node>;

    /// First element matching `selector`, in document order
    fn select_first(&self, scope: Option<&Self::Node>, selector: Selector) -> Option<Self::Node> {
        self.select(scope, selector).into_iter().next()
    }

    /// Whether the element itself matches `selector`
    fn matches(&self, node: &Self::Node, selector: Selector) -> bool;

    /// Whether the element carries `class`
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add `class` to the element (no-op if already present)
    fn add_class(&mut self, node: &Self::Node, class: &str);

    /// Set an inline style property on the element
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Set a property (typically a custom property) on the document root
    fn set_root_property(&mut self, name: &str, value: &str);

    /// Whether an image element has already finished loading
    fn is_image_complete(&self, node: &Self::Node) -> bool;

    /// Remove focus from whichever element holds it
    fn blur_active(&mut self);

    /// Current scroll offset and document extents
    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Install a document-level style rule
    ///
    /// Returns `None` if the host cannot install rules.
    fn insert_style_rule(&mut self, css: &str) -> Option<StyleRuleId>;

    /// Remove a rule installed with [`insert_style_rule`](Self::insert_style_rule)
    fn remove_style_rule(&mut self, id: StyleRuleId);
}
