//! Re-entrant dispatch into a `RefCell`-owned target
//!
//! DOM calls made by a handler can fire other listeners before they return
//! (`HTMLElement.blur()` raises `blur` synchronously). Those listeners find
//! the target already borrowed, so they only queue their item; the
//! outermost [`submit`](DispatchQueue::submit) drains the queue, in arrival
//! order, before it releases the borrow.

use std::cell::RefCell;

pub(crate) struct DispatchQueue<T> {
    pending: RefCell<Vec<T>>,
}

impl<T> DispatchQueue<T> {
    pub(crate) fn new() -> Self {
        Self {
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Items waiting for the running dispatch
    pub(crate) fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Queue `item`, then drain the queue into `target` unless a dispatch is
    /// already running
    ///
    /// Returns how many items this call handled; 0 means the item was left
    /// for the dispatch further up the stack.
    pub(crate) fn submit<A>(
        &self,
        target: &RefCell<A>,
        item: T,
        mut handle: impl FnMut(&mut A, T),
    ) -> usize {
        self.pending.borrow_mut().push(item);
        let Ok(mut target) = target.try_borrow_mut() else {
            return 0;
        };
        let mut handled = 0;
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                return handled;
            }
            for item in batch {
                handle(&mut target, item);
                handled += 1;
            }
        }
    }
}
