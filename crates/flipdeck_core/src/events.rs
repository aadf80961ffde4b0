//! Per-instance named-event subscription
//!
//! Handlers are appended per event name and run synchronously, in
//! subscription order, on every emit. Emission snapshots the handler list
//! first, so a handler may subscribe or emit again (including the same name)
//! without invalidating the iteration.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use rustc_hash::FxHashMap;

/// Callback for a bus event
///
/// Uses Rc since the pager is single-threaded.
pub type Handler<P> = Rc<dyn Fn(&P)>;

/// Observer registry keyed by event name
pub struct EventBus<K, P> {
    handlers: RefCell<FxHashMap<K, Vec<Handler<P>>>>,
}

impl<K, P> Default for EventBus<K, P> {
    fn default() -> Self {
        Self {
            handlers: RefCell::new(FxHashMap::default()),
        }
    }
}

impl<K: Copy + Eq + Hash + std::fmt::Debug, P> EventBus<K, P> {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `name`
    pub fn on<F>(&self, name: K, handler: F)
    where
        F: Fn(&P) + 'static,
    {
        self.handlers
            .borrow_mut()
            .entry(name)
            .or_default()
            .push(Rc::new(handler));
    }

    /// Invoke every handler registered for `name`, in order
    ///
    /// Emitting a name nobody subscribed to is a no-op.
    pub fn emit(&self, name: K, payload: &P) {
        let snapshot: Vec<Handler<P>> = match self.handlers.borrow().get(&name) {
            Some(handlers) if !handlers.is_empty() => handlers.clone(),
            _ => return,
        };

        tracing::trace!("emit {:?} to {} handler(s)", name, snapshot.len());
        for handler in snapshot {
            handler(payload);
        }
    }

    /// Number of handlers registered for `name`
    pub fn handler_count(&self, name: K) -> usize {
        self.handlers.borrow().get(&name).map_or(0, Vec::len)
    }

    /// Whether any handler is registered for `name`
    pub fn has_handlers(&self, name: K) -> bool {
        self.handler_count(name) > 0
    }
}
