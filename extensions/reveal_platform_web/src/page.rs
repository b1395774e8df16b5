//! Live DOM page host
//!
//! [`WebPage`] implements [`PageHost`] over the browser document. Elements
//! are wrapped in [`WebNode`], whose identity is a number kept in a
//! `WeakMap` keyed by the element, so identifying an element leaves the DOM
//! untouched and a removed element can still be collected.

use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use js_sys::{Object, WeakMap};
use reveal_core::{PageHost, ScrollMetrics, Selector, StyleRuleId};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlImageElement, Window};

use crate::error::{Result, WebError};

const RULE_ID_ATTR: &str = "data-reveal-rule";

/// A DOM element known to Reveal
#[derive(Clone)]
pub struct WebNode {
    id: u32,
    element: Element,
}

impl WebNode {
    /// Stable identifier of the element
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The wrapped DOM element
    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl PartialEq for WebNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WebNode {}

impl Hash for WebNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for WebNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebNode")
            .field("id", &self.id)
            .field("tag", &self.element.tag_name())
            .finish()
    }
}

/// Id source shared by clones of a [`WebPage`]
#[derive(Clone, Debug)]
struct IdCounter(Rc<Cell<u32>>);

impl IdCounter {
    fn new() -> Self {
        Self(Rc::new(Cell::new(1)))
    }

    fn next(&self) -> u32 {
        let id = self.0.get();
        self.0.set(id + 1);
        id
    }

    fn issued(&self) -> u32 {
        self.0.get() - 1
    }
}

/// The browser document as a [`PageHost`]
///
/// Cheap to clone; clones share the id counters and act on the same
/// document.
#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
    node_ids: WeakMap,
    node_counter: IdCounter,
    rule_counter: IdCounter,
}

impl WebPage {
    pub fn new(window: Window) -> Result<Self> {
        let document = window.document().ok_or(WebError::NoDocument)?;
        Ok(Self {
            window,
            document,
            node_ids: WeakMap::new(),
            node_counter: IdCounter::new(),
            rule_counter: IdCounter::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Wrap an element, assigning it an id on first sight
    pub fn node(&self, element: Element) -> WebNode {
        let key: &Object = element.as_ref();
        let id = match self.node_ids.get(key).as_f64() {
            Some(id) => id as u32,
            None => {
                let id = self.node_counter.next();
                self.node_ids.set(key, &JsValue::from(id));
                id
            }
        };
        WebNode { id, element }
    }

    /// Wrap an event target if it is an element
    pub fn node_for_target(&self, target: Option<EventTarget>) -> Option<WebNode> {
        let element = target?.dyn_into::<Element>().ok()?;
        Some(self.node(element))
    }

    fn query_all(&self, scope: Option<&WebNode>, css: &str) -> Vec<WebNode> {
        let list = match scope {
            Some(scope) => scope.element.query_selector_all(css),
            None => self.document.query_selector_all(css),
        };
        let Ok(list) = list else {
            tracing::warn!(css, "selector rejected by the browser");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.node(element))
            .collect()
    }

    fn viewport_height(&self) -> f32 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0) as f32
    }
}

impl fmt::Debug for WebPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebPage")
            .field("nodes", &self.node_counter.issued())
            .field("rules", &self.rule_counter.issued())
            .finish_non_exhaustive()
    }
}

impl PageHost for WebPage {
    type Node = WebNode;

    fn select(&self, scope: Option<&WebNode>, selector: Selector) -> Vec<WebNode> {
        self.query_all(scope, &selector.to_css())
    }

    fn matches(&self, node: &WebNode, selector: Selector) -> bool {
        node.element.matches(&selector.to_css()).unwrap_or(false)
    }

    fn has_class(&self, node: &WebNode, class: &str) -> bool {
        node.element.class_list().contains(class)
    }

    fn add_class(&mut self, node: &WebNode, class: &str) {
        let _ = node.element.class_list().add_1(class);
    }

    fn set_style(&mut self, node: &WebNode, property: &str, value: &str) {
        if let Some(element) = node.element.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }

    fn set_root_property(&mut self, name: &str, value: &str) {
        let root = self
            .document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok());
        if let Some(root) = root {
            let _ = root.style().set_property(name, value);
        }
    }

    fn is_image_complete(&self, node: &WebNode) -> bool {
        node.element
            .dyn_ref::<HtmlImageElement>()
            .is_some_and(|image| image.complete())
    }

    fn blur_active(&mut self) {
        let active = self
            .document
            .active_element()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok());
        if let Some(active) = active {
            let _ = active.blur();
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let document_height = document_height(
            self.document.body().map(|body| body.scroll_height()),
            self.document.document_element().map(|root| root.scroll_height()),
        );
        ScrollMetrics {
            offset: self.window.scroll_y().unwrap_or(0.0) as f32,
            document_height,
            viewport_height: self.viewport_height(),
        }
    }

    fn insert_style_rule(&mut self, css: &str) -> Option<StyleRuleId> {
        let head = self.document.head()?;
        let style = self.document.create_element("style").ok()?;
        let id = StyleRuleId(self.rule_counter.next());
        style.set_text_content(Some(css));
        style.set_attribute(RULE_ID_ATTR, &id.0.to_string()).ok()?;
        head.append_child(&style).ok()?;
        Some(id)
    }

    fn remove_style_rule(&mut self, id: StyleRuleId) {
        let selector = format!("style[{RULE_ID_ATTR}=\"{}\"]", id.0);
        if let Ok(Some(style)) = self.document.query_selector(&selector) {
            style.remove();
        }
    }
}

/// Scrollable height of the page: `<body>`, or `<html>` before the body exists
fn document_height(body: Option<i32>, root: Option<i32>) -> f32 {
    body.or(root).unwrap_or(0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_height_prefers_body() {
        assert_eq!(document_height(Some(3200), Some(900)), 3200.0);
        assert_eq!(document_height(None, Some(900)), 900.0);
        assert_eq!(document_height(None, None), 0.0);
    }

    #[test]
    fn test_id_counter_is_shared_by_clones() {
        let nodes = IdCounter::new();
        let clone = nodes.clone();
        assert_eq!(nodes.next(), 1);
        assert_eq!(clone.next(), 2);
        assert_eq!(nodes.next(), 3);
        assert_eq!(clone.issued(), 3);
        assert_eq!(IdCounter::new().issued(), 0);
    }
}
