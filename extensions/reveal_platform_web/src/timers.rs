//! `setTimeout` task scheduler
//!
//! Each scheduled task gets its own JS closure, kept alive in a slot map
//! keyed by the browser's timeout id. A slot is released when its timeout is
//! cancelled, or lazily on the next [`schedule`](TaskScheduler::schedule)
//! once it has fired.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use reveal_animation::{Task, TaskScheduler};
use rustc_hash::FxHashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast as _;
use web_sys::Window;

use crate::page::WebPage;

/// Handle to a pending `setTimeout`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(i32);

impl TimerHandle {
    /// Handle for a timer the browser refused to create
    const REJECTED: TimerHandle = TimerHandle(0);
}

struct TimerSlot {
    _closure: Closure<dyn FnMut()>,
    fired: Rc<Cell<bool>>,
}

/// Runs tasks against the live page via `setTimeout`
pub struct WebTimers {
    window: Window,
    page: WebPage,
    slots: FxHashMap<i32, TimerSlot>,
}

impl WebTimers {
    pub fn new(page: WebPage) -> Self {
        Self {
            window: page.window().clone(),
            page,
            slots: FxHashMap::default(),
        }
    }

    /// Timers scheduled and not yet fired or cancelled
    pub fn pending_count(&self) -> usize {
        self.slots.values().filter(|slot| !slot.fired.get()).count()
    }

    fn sweep(&mut self) {
        self.slots.retain(|_, slot| !slot.fired.get());
    }
}

impl TaskScheduler<WebPage> for WebTimers {
    type Handle = TimerHandle;

    fn schedule(&mut self, delay_ms: u32, task: Task<WebPage>) -> TimerHandle {
        self.sweep();

        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let mut page = self.page.clone();
        let mut task = Some(task);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(task) = task.take() {
                flag.set(true);
                task(&mut page);
            }
        }) as Box<dyn FnMut()>);

        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout,
            );
        match scheduled {
            Ok(id) => {
                self.slots.insert(
                    id,
                    TimerSlot {
                        _closure: closure,
                        fired,
                    },
                );
                TimerHandle(id)
            }
            Err(err) => {
                tracing::warn!(?err, delay_ms, "setTimeout failed; task dropped");
                TimerHandle::REJECTED
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(slot) = self.slots.remove(&handle.0) else {
            return false;
        };
        if slot.fired.get() {
            return false;
        }
        self.window.clear_timeout_with_handle(handle.0);
        true
    }
}

impl Drop for WebTimers {
    fn drop(&mut self) {
        // The browser must not call back into a dropped closure.
        for (id, slot) in self.slots.drain() {
            if !slot.fired.get() {
                self.window.clear_timeout_with_handle(id);
            }
        }
    }
}

impl fmt::Debug for WebTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebTimers")
            .field("pending", &self.pending_count())
            .finish()
    }
}
