//! `IntersectionObserver` binding

use js_sys::{Array, Reflect};
use reveal_sequencer::{IntersectionEntry, ObserverConfig, ViewportObserver};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::page::{WebNode, WebPage};

type EntriesClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Browser viewport observer feeding entry batches to a sink
pub struct WebViewportObserver {
    observer: IntersectionObserver,
    _callback: EntriesClosure,
}

impl WebViewportObserver {
    /// Create an observer, or `None` if the browser lacks `IntersectionObserver`
    pub fn new(
        config: &ObserverConfig,
        page: WebPage,
        mut sink: impl FnMut(Vec<IntersectionEntry<WebNode>>) + 'static,
    ) -> Option<Self> {
        let supported =
            Reflect::has(page.window(), &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        if !supported {
            return None;
        }

        let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
            let batch = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target: page.node(entry.target()),
                    ratio: entry.intersection_ratio() as f32,
                    is_intersecting: entry.is_intersecting(),
                })
                .collect();
            sink(batch);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(f64::from(config.threshold)));
        init.set_root_margin(&config.root_margin.to_css());

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => Some(Self {
                observer,
                _callback: callback,
            }),
            Err(err) => {
                tracing::warn!(?err, "IntersectionObserver construction failed");
                None
            }
        }
    }
}

impl ViewportObserver<WebNode> for WebViewportObserver {
    fn observe(&mut self, node: &WebNode) {
        self.observer.observe(node.element());
    }

    fn unobserve(&mut self, node: &WebNode) {
        self.observer.unobserve(node.element());
    }
}

impl Drop for WebViewportObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
