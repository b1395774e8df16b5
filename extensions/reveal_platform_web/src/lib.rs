//! Reveal Web Platform
//!
//! Runs Reveal in the browser: the live document as a
//! [`PageHost`](reveal_core::PageHost), `setTimeout` as the task scheduler
//! and `IntersectionObserver` as the viewport observer.
//!
//! # Example
//!
//! ```ignore
//! use reveal_app::RevealConfig;
//!
//! let runtime = reveal_platform_web::start(RevealConfig::default())?;
//! // keep `runtime` alive for the lifetime of the page
//! ```
//!
//! From JavaScript:
//!
//! ```js
//! import init, { startReveal } from "./reveal_platform_web.js";
//!
//! await init();
//! const reveal = startReveal(
//!   JSON.stringify({ observer: { threshold: 0.2 } }),
//!   "reveal_sequencer=debug",
//! );
//! ```

#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod dispatch;
pub mod error;
pub mod log;
pub mod observer;
pub mod page;
pub mod runtime;
pub mod timers;

pub use error::{Result, WebError};
pub use log::{init_console_logging, DEFAULT_LOG_FILTER};
pub use observer::WebViewportObserver;
pub use page::{WebNode, WebPage};
pub use runtime::{start, WebRuntime};
pub use timers::{TimerHandle, WebTimers};

use reveal_app::RevealConfig;
use wasm_bindgen::prelude::*;

/// JS handle keeping Reveal alive on the page
#[wasm_bindgen]
pub struct RevealHandle {
    runtime: WebRuntime,
}

#[wasm_bindgen]
impl RevealHandle {
    /// Last published scroll progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.runtime.session().progress()
    }

    /// Last scroll offset seen by the scroll handlers
    #[wasm_bindgen(js_name = scrollOffset)]
    pub fn scroll_offset(&self) -> f32 {
        self.runtime.session().get().scroll_offset
    }

    /// Whether the document has been wired
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.runtime.is_ready()
    }
}

/// Start Reveal with an optional JSON configuration
///
/// `log_filter` takes `tracing` filter directives such as
/// `"reveal_sequencer=debug"`; the console shows `info` and above otherwise.
#[wasm_bindgen(js_name = startReveal)]
pub fn start_reveal(
    config_json: Option<String>,
    log_filter: Option<String>,
) -> std::result::Result<RevealHandle, JsValue> {
    init_console_logging(log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER));
    let config = match config_json.as_deref() {
        Some(json) => RevealConfig::from_json_str(json).map_err(WebError::from)?,
        None => RevealConfig::default(),
    };
    let runtime = start(config)?;
    Ok(RevealHandle { runtime })
}
