//! Browser runtime
//!
//! Owns the [`RevealApp`] for the live document and feeds it DOM events and
//! intersection batches. Everything reaches the app through a
//! [`DispatchQueue`]: events raised while the app is busy (a `blur` fired by
//! the Escape handler, for instance) are queued and handled once the current
//! item returns.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use reveal_app::{RevealApp, RevealConfig};
use reveal_core::vocab::NAV_ITEM;
use reveal_core::{Key, PageEvent, PageHost, ScrollSessionReader, Selector};
use reveal_sequencer::IntersectionEntry;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast as _;
use web_sys::{Event, EventTarget, KeyboardEvent};

use crate::dispatch::DispatchQueue;
use crate::error::{Result, WebError};
use crate::observer::WebViewportObserver;
use crate::page::{WebNode, WebPage};
use crate::timers::WebTimers;

type WebApp = RevealApp<WebPage, WebTimers, WebViewportObserver>;

enum Deferred {
    Event(PageEvent<WebNode>),
    Entries(Vec<IntersectionEntry<WebNode>>),
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

struct Shared {
    app: RefCell<WebApp>,
    page: WebPage,
    queue: DispatchQueue<Deferred>,
    listeners: RefCell<Vec<Listener>>,
}

impl Shared {
    fn submit(&self, item: Deferred) {
        self.queue.submit(&self.app, item, |app, item| match item {
            Deferred::Event(event) => app.handle_event(event),
            Deferred::Entries(entries) => {
                app.handle_intersections(entries);
            }
        });
    }

    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        kind: &'static str,
        to_event: impl Fn(&Event) -> Option<PageEvent<WebNode>> + 'static,
    ) -> Result<()> {
        let weak = Rc::downgrade(self);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if let Some(event) = to_event(&event) {
                shared.submit(Deferred::Event(event));
            }
        }) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(WebError::dom)?;
        self.listeners.borrow_mut().push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    fn listen_each(
        self: &Rc<Self>,
        nodes: &[WebNode],
        kind: &'static str,
        make: fn(WebNode) -> PageEvent<WebNode>,
    ) -> Result<()> {
        for node in nodes {
            let owned = node.clone();
            self.listen(node.element(), kind, move |_| Some(make(owned.clone())))?;
        }
        Ok(())
    }

    /// Page-ready: wire the app, then attach the element listeners
    fn ready(self: &Rc<Self>) -> Result<()> {
        let summary = self.app.borrow_mut().ready();
        let page = &self.page;

        self.listen(page.window(), "scroll", |_| Some(PageEvent::Scroll))?;
        self.listen(page.document(), "keydown", |event| {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            Some(PageEvent::KeyDown(Key::from_name(&key)))
        })?;

        let nav = page.select(None, Selector::Class(NAV_ITEM));
        self.listen_each(&nav, "click", PageEvent::Click)?;

        let frames = page.select(None, Selector::IMAGE_FRAMES);
        self.listen_each(&frames, "mouseenter", PageEvent::PointerEnter)?;
        self.listen_each(&frames, "mouseleave", PageEvent::PointerLeave)?;

        let focusable = page.select(None, Selector::Focusable);
        self.listen_each(&focusable, "focus", PageEvent::Focus)?;
        self.listen_each(&focusable, "blur", PageEvent::Blur)?;

        let loading: Vec<WebNode> = summary
            .lazy_images
            .into_iter()
            .filter(|image| !page.is_image_complete(image))
            .collect();
        self.listen_each(&loading, "load", PageEvent::ImageLoaded)?;

        tracing::debug!(
            listeners = self.listeners.borrow().len(),
            "page listeners attached"
        );
        Ok(())
    }
}

/// Reveal running in the current browser document
///
/// Dropping the runtime detaches every listener and disconnects the
/// intersection observer.
pub struct WebRuntime {
    shared: Rc<Shared>,
    session: ScrollSessionReader,
}

impl WebRuntime {
    /// Read-only view of the scroll session
    pub fn session(&self) -> &ScrollSessionReader {
        &self.session
    }

    /// Whether the document has been wired yet
    pub fn is_ready(&self) -> bool {
        self.shared
            .app
            .try_borrow()
            .is_ok_and(|app| app.is_ready())
    }
}

impl Drop for WebRuntime {
    fn drop(&mut self) {
        for listener in self.shared.listeners.borrow_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Start Reveal on the current document
///
/// Wires immediately if the document is already parsed, otherwise on
/// `DOMContentLoaded`. Logs go to the browser console at
/// [`DEFAULT_LOG_FILTER`](crate::log::DEFAULT_LOG_FILTER) unless
/// [`init_console_logging`](crate::log::init_console_logging) ran first.
pub fn start(config: RevealConfig) -> Result<WebRuntime> {
    #[cfg(target_arch = "wasm32")]
    crate::log::init_console_logging(crate::log::DEFAULT_LOG_FILTER);

    config.validate()?;
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let page = WebPage::new(window)?;

    let shared = Rc::new_cyclic(|weak: &Weak<Shared>| {
        let sink = weak.clone();
        let observer = WebViewportObserver::new(&config.observer, page.clone(), move |entries| {
            if let Some(shared) = sink.upgrade() {
                shared.submit(Deferred::Entries(entries));
            }
        });
        let timers = WebTimers::new(page.clone());
        Shared {
            app: RefCell::new(RevealApp::new(config, page.clone(), timers, observer)),
            page: page.clone(),
            queue: DispatchQueue::new(),
            listeners: RefCell::new(Vec::new()),
        }
    });
    let session = shared.app.borrow().session();

    if page.document().ready_state() == "loading" {
        let weak = Rc::downgrade(&shared);
        shared.listen(page.document(), "DOMContentLoaded", move |_| {
            if let Some(shared) = weak.upgrade() {
                if let Err(err) = shared.ready() {
                    tracing::warn!(%err, "failed to wire page");
                }
            }
            None
        })?;
    } else {
        shared.ready()?;
    }

    Ok(WebRuntime { shared, session })
}
