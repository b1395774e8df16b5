//! Headless page model
//!
//! An in-memory element tree with document geometry, inline styles, focus and
//! installed style rules. It implements [`PageHost`] so the whole reveal
//! pipeline can run without a browser, which is how the test suites drive it.
//!
//! # Example
//!
//! ```
//! use reveal_core::geometry::{Rect, Size};
//! use reveal_core::tree::{Element, PageTree};
//!
//! let mut page = PageTree::new(Size::new(1280.0, 800.0));
//! let section = page.append(
//!     page.root(),
//!     Element::new("section")
//!         .class("content-section")
//!         .bounds(Rect::new(0.0, 1200.0, 1280.0, 600.0)),
//! );
//! page.append(section, Element::new("p"));
//!
//! assert_eq!(page.children(section).len(), 1);
//! assert_eq!(page.document_height(), 1800.0);
//! ```

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::events::PageEvent;
use crate::geometry::{Rect, ScrollMetrics, Size};
use crate::host::{PageHost, StyleRuleId};
use crate::vocab::Selector;

new_key_type! {
    /// Handle to an element of a [`PageTree`]
    pub struct NodeId;
}

/// Element description used to build a [`PageTree`]
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attributes: FxHashMap<String, String>,
    bounds: Rect,
    complete: bool,
}

impl Element {
    /// Create an element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Add a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the element's box in document coordinates
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Mark an image element as already loaded
    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    /// Tag name (lowercase)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Classes in insertion order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn matches(&self, selector: Selector) -> bool {
        match selector {
            Selector::Class(class) => self.has_class(class),
            Selector::AnyClass(classes) => classes.iter().any(|class| self.has_class(class)),
            Selector::Tags(tags) => tags.iter().any(|tag| *tag == self.tag),
            Selector::Focusable => {
                self.tag == "a"
                    || self.tag == "button"
                    || self.attribute("tabindex").is_some_and(|index| index.trim() != "-1")
            }
        }
    }
}

struct NodeData {
    element: Element,
    style: FxHashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(element: Element, parent: Option<NodeId>) -> Self {
        Self {
            element,
            style: FxHashMap::default(),
            parent,
            children: Vec::new(),
        }
    }
}

/// In-memory page
pub struct PageTree {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
    viewport: Size,
    scroll_offset: f32,
    document_height: Option<f32>,
    root_properties: FxHashMap<String, String>,
    style_rules: Vec<(StyleRuleId, String)>,
    next_rule: u32,
    active: Option<NodeId>,
    queued_events: Vec<PageEvent<NodeId>>,
}

impl PageTree {
    /// Create an empty page (a lone `body`) with the given viewport size
    pub fn new(viewport: Size) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(Element::new("body"), None));
        Self {
            nodes,
            root,
            viewport,
            scroll_offset: 0.0,
            document_height: None,
            root_properties: FxHashMap::default(),
            style_rules: Vec::new(),
            next_rule: 0,
            active: None,
            queued_events: Vec::new(),
        }
    }

    /// The `body` element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Append an element as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        assert!(
            self.nodes.contains_key(parent),
            "append() called with a parent from another tree"
        );
        let id = self.nodes.insert(NodeData::new(element, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Element description of a node
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).map(|data| &data.element)
    }

    /// Children of a node in document order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|data| data.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|data| data.parent)
    }

    /// Classes currently on a node
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node).map(Element::classes).unwrap_or(&[])
    }

    /// Inline style property of a node
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes
            .get(node)
            .and_then(|data| data.style.get(property))
            .map(String::as_str)
    }

    /// Property set on the document root
    pub fn root_property(&self, name: &str) -> Option<&str> {
        self.root_properties.get(name).map(String::as_str)
    }

    /// Installed style rules in installation order
    pub fn style_rules(&self) -> impl Iterator<Item = &str> {
        self.style_rules.iter().map(|(_, css)| css.as_str())
    }

    /// Box of a node in document coordinates
    pub fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.element(node).map(|element| element.bounds)
    }

    /// Viewport size
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Resize the viewport; the scroll offset is re-clamped
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.scroll_offset = self.clamp_offset(self.scroll_offset);
    }

    /// Override the document height (defaults to the lowest element edge)
    pub fn set_document_height(&mut self, height: f32) {
        self.document_height = Some(height);
        self.scroll_offset = self.clamp_offset(self.scroll_offset);
    }

    /// Full scrollable height
    pub fn document_height(&self) -> f32 {
        self.document_height.unwrap_or_else(|| {
            self.nodes
                .values()
                .map(|data| data.element.bounds.bottom())
                .fold(self.viewport.height, f32::max)
        })
    }

    /// Current vertical scroll offset
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Scroll to `offset`, clamped to the scrollable range
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = self.clamp_offset(offset);
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        let max = (self.document_height() - self.viewport.height).max(0.0);
        offset.clamp(0.0, max)
    }

    /// Visible part of the document
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.scroll_offset,
            self.viewport.width,
            self.viewport.height,
        )
    }

    /// Mark an image as loaded (or not)
    pub fn set_image_complete(&mut self, node: NodeId, complete: bool) {
        if let Some(data) = self.nodes.get_mut(node) {
            data.element.complete = complete;
        }
    }

    /// Element currently holding focus
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// Move focus to `node`, returning the element that lost it
    ///
    /// Like the browser, focus changes are reported as queued events: a blur
    /// for the previous element followed by a focus for the new one.
    pub fn focus(&mut self, node: NodeId) -> Option<NodeId> {
        if self.active == Some(node) || !self.nodes.contains_key(node) {
            return None;
        }
        let previous = self.active.take();
        if let Some(previous) = previous {
            self.queued_events.push(PageEvent::Blur(previous));
        }
        self.active = Some(node);
        self.queued_events.push(PageEvent::Focus(node));
        previous
    }

    /// Drain events the page generated on its own (focus changes)
    pub fn take_events(&mut self) -> Vec<PageEvent<NodeId>> {
        std::mem::take(&mut self.queued_events)
    }

    /// All nodes below `scope` (or the whole page) in document order
    fn document_order(&self, scope: Option<NodeId>) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = match scope {
            Some(scope) => self.children(scope).iter().rev().copied().collect(),
            None => vec![self.root],
        };
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        order
    }
}

impl PageHost for PageTree {
    type Node = NodeId;

    fn select(&self, scope: Option<&NodeId>, selector: Selector) -> Vec<NodeId> {
        if scope.is_some_and(|scope| !self.nodes.contains_key(*scope)) {
            return Vec::new();
        }
        self.document_order(scope.copied())
            .into_iter()
            .filter(|node| self.nodes[*node].element.matches(selector))
            .collect()
    }

    fn matches(&self, node: &NodeId, selector: Selector) -> bool {
        self.element(*node)
            .is_some_and(|element| element.matches(selector))
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.element(*node)
            .is_some_and(|element| element.has_class(class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(*node) {
            if !data.element.has_class(class) {
                data.element.classes.push(class.to_string());
            }
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        if let Some(data) = self.nodes.get_mut(*node) {
            data.style.insert(property.to_string(), value.to_string());
        }
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        self.root_properties
            .insert(name.to_string(), value.to_string());
    }

    fn is_image_complete(&self, node: &NodeId) -> bool {
        self.element(*node).is_some_and(|element| element.complete)
    }

    fn blur_active(&mut self) {
        if let Some(node) = self.active.take() {
            self.queued_events.push(PageEvent::Blur(node));
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.scroll_offset,
            document_height: self.document_height(),
            viewport_height: self.viewport.height,
        }
    }

    fn insert_style_rule(&mut self, css: &str) -> Option<StyleRuleId> {
        let id = StyleRuleId(self.next_rule);
        self.next_rule += 1;
        self.style_rules.push((id, css.to_string()));
        Some(id)
    }

    fn remove_style_rule(&mut self, id: StyleRuleId) {
        self.style_rules.retain(|(rule, _)| *rule != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{Category, NAV_ITEM};

    fn sample() -> (PageTree, NodeId, Vec<NodeId>) {
        let mut page = PageTree::new(Size::new(1000.0, 800.0));
        let section = page.append(
            page.root(),
            Element::new("section")
                .class(Category::Content.class())
                .bounds(Rect::new(0.0, 1000.0, 1000.0, 500.0)),
        );
        let heading = page.append(section, Element::new("h2"));
        let wrapper = page.append(section, Element::new("div"));
        let nested = page.append(wrapper, Element::new("p"));
        let trailing = page.append(section, Element::new("p"));
        (page, section, vec![heading, nested, trailing])
    }

    #[test]
    fn test_select_document_order() {
        let (page, section, text) = sample();
        assert_eq!(page.select(Some(&section), Selector::TEXT), text);
    }

    #[test]
    fn test_select_scope_excludes_itself() {
        let (page, section, _) = sample();
        let sections = page.select(Some(&section), Selector::ANIMATABLE);
        assert!(sections.is_empty());
        assert_eq!(page.select(None, Selector::ANIMATABLE), vec![section]);
    }

    #[test]
    fn test_select_empty() {
        let (page, _, _) = sample();
        assert!(page.select(None, Selector::Class(NAV_ITEM)).is_empty());
        assert_eq!(page.select_first(None, Selector::Class(NAV_ITEM)), None);
    }

    #[test]
    fn test_add_class_is_idempotent() {
        let (mut page, section, _) = sample();
        page.add_class(&section, "animate-fade-up");
        page.add_class(&section, "animate-fade-up");
        assert_eq!(
            page.classes(section),
            &["content-section".to_string(), "animate-fade-up".to_string()]
        );
    }

    #[test]
    fn test_focusable_matching() {
        let mut page = PageTree::new(Size::new(100.0, 100.0));
        let link = page.append(page.root(), Element::new("A"));
        let tabbable = page.append(page.root(), Element::new("div").attr("tabindex", "0"));
        let skipped = page.append(page.root(), Element::new("div").attr("tabindex", "-1"));
        let plain = page.append(page.root(), Element::new("span"));

        assert_eq!(
            page.select(None, Selector::Focusable),
            vec![link, tabbable]
        );
        assert!(!page.matches(&skipped, Selector::Focusable));
        assert!(!page.matches(&plain, Selector::Focusable));
    }

    #[test]
    fn test_scroll_offset_clamped() {
        let (mut page, _, _) = sample();
        assert_eq!(page.document_height(), 1500.0);
        page.set_scroll_offset(5000.0);
        assert_eq!(page.scroll_offset(), 700.0);
        page.set_scroll_offset(-20.0);
        assert_eq!(page.scroll_offset(), 0.0);
    }

    #[test]
    fn test_focus_queues_blur_then_focus() {
        let mut page = PageTree::new(Size::new(100.0, 100.0));
        let first = page.append(page.root(), Element::new("button"));
        let second = page.append(page.root(), Element::new("a"));

        page.focus(first);
        assert_eq!(page.focus(second), Some(first));
        page.blur_active();

        assert_eq!(
            page.take_events(),
            vec![
                PageEvent::Focus(first),
                PageEvent::Blur(first),
                PageEvent::Focus(second),
                PageEvent::Blur(second),
            ]
        );
        assert_eq!(page.active(), None);
        assert!(page.take_events().is_empty());
    }

    #[test]
    fn test_style_rules_install_and_remove() {
        let mut page = PageTree::new(Size::new(100.0, 100.0));
        let first = page.insert_style_rule(".a {}").unwrap();
        let _second = page.insert_style_rule(".b {}").unwrap();
        page.remove_style_rule(first);
        assert_eq!(page.style_rules().collect::<Vec<_>>(), vec![".b {}"]);
    }
}
