//! Listener binding and event dispatch
//!
//! The binding manager decides, once at construction, which input families
//! are live (configuration enabled and host capable), registers or
//! unregisters their listeners, and owns the handler table that routes each
//! canonical event kind to the engine.

use std::time::Instant;

use flipdeck_core::PageConfig;
use flipdeck_platform::{
    Capabilities, DeviceFamily, EventKind, EventResponse, Host, InputEvent, ListenerTarget,
    NativeEvent,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Handler invoked for one canonical event kind
pub type Dispatch<T> = fn(&mut T, &InputEvent, Instant) -> EventResponse;

/// Canonical event kind → handler
pub struct HandlerTable<T> {
    handlers: FxHashMap<EventKind, Dispatch<T>>,
}

impl<T> Default for HandlerTable<T> {
    fn default() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }
}

impl<T> HandlerTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, replacing any previous one
    pub fn with(mut self, kind: EventKind, handler: Dispatch<T>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Handler for `kind`
    pub fn get(&self, kind: EventKind) -> Option<Dispatch<T>> {
        self.handlers.get(&kind).copied()
    }
}

/// Tracks which listeners are live and whether they are registered
#[derive(Clone, Debug)]
pub struct BindingManager {
    families: SmallVec<[DeviceFamily; 3]>,
    slide_count: usize,
    bound: bool,
}

impl BindingManager {
    /// Decide the live input families from config and probed capabilities
    pub fn new(config: &PageConfig, capabilities: Capabilities, slide_count: usize) -> Self {
        let mut families = SmallVec::new();
        if config.mouse && capabilities.mouse {
            families.push(DeviceFamily::Mouse);
        }
        if config.pointer_touch && capabilities.pointer {
            families.push(DeviceFamily::Pointer);
        }
        if config.touch && capabilities.touch {
            families.push(DeviceFamily::Touch);
        }
        if families.is_empty() {
            tracing::warn!("no input family enabled, pager will only respond to resizes");
        }

        Self {
            families,
            slide_count,
            bound: false,
        }
    }

    /// Live input families
    pub fn families(&self) -> &[DeviceFamily] {
        &self.families
    }

    /// Whether listeners are currently registered
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Every listener this manager registers
    pub fn listeners(&self) -> Vec<(ListenerTarget, NativeEvent)> {
        let mut listeners: Vec<_> = NativeEvent::WINDOW
            .iter()
            .map(|e| (ListenerTarget::Window, *e))
            .collect();

        for family in &self.families {
            let events: &[NativeEvent] = match family {
                DeviceFamily::Mouse => &NativeEvent::MOUSE,
                DeviceFamily::Pointer => &NativeEvent::POINTER,
                DeviceFamily::Touch => &NativeEvent::TOUCH,
            };
            listeners.extend(events.iter().map(|e| (ListenerTarget::Container, *e)));
        }

        for slide in 0..self.slide_count {
            listeners.extend(
                NativeEvent::TRANSITION_END
                    .iter()
                    .map(|e| (ListenerTarget::Slide(slide), *e)),
            );
        }
        listeners
    }

    /// Register every listener, unless already registered
    ///
    /// Returns whether registration happened.
    pub fn bind<H: Host>(&mut self, host: &mut H) -> bool {
        if self.bound {
            tracing::debug!("bind: listeners already registered");
            return false;
        }
        for (target, event) in self.listeners() {
            host.add_listener(target, event);
        }
        self.bound = true;
        true
    }

    /// Unregister every listener, unless not registered
    ///
    /// Returns whether anything was unregistered.
    pub fn unbind<H: Host>(&mut self, host: &mut H) -> bool {
        if !self.bound {
            tracing::debug!("unbind: listeners not registered");
            return false;
        }
        for (target, event) in self.listeners() {
            host.remove_listener(target, event);
        }
        self.bound = false;
        true
    }

    /// Whether a forwarded event should reach the engine
    pub fn accepts(&self, event: NativeEvent) -> bool {
        if !self.bound {
            return false;
        }
        match event.family() {
            Some(family) => self.families.contains(&family),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(touch: bool, pointer: bool, mouse: bool) -> Capabilities {
        Capabilities {
            touch,
            pointer,
            mouse,
        }
    }

    #[test]
    fn test_families_need_config_and_capability() {
        let config = PageConfig {
            mouse: false,
            ..Default::default()
        };
        let manager = BindingManager::new(&config, caps(true, true, true), 3);
        assert_eq!(
            manager.families(),
            &[DeviceFamily::Pointer, DeviceFamily::Touch]
        );

        let manager = BindingManager::new(&PageConfig::default(), caps(true, false, false), 3);
        assert_eq!(manager.families(), &[DeviceFamily::Touch]);
    }

    #[test]
    fn test_listener_set() {
        let manager = BindingManager::new(&PageConfig::default(), caps(true, false, false), 2);
        let listeners = manager.listeners();
        // 2 window + 4 touch + 2 slides * 4 transition-end
        assert_eq!(listeners.len(), 2 + 4 + 8);
        assert!(listeners.contains(&(ListenerTarget::Container, NativeEvent::TouchCancel)));
        assert!(listeners.contains(&(ListenerTarget::Slide(1), NativeEvent::MsTransitionEnd)));
        assert!(!listeners.iter().any(|(_, e)| *e == NativeEvent::MouseDown));
    }

    #[test]
    fn test_accepts() {
        let mut manager = BindingManager::new(&PageConfig::default(), caps(true, false, true), 1);
        assert!(!manager.accepts(NativeEvent::TouchStart));

        manager.bound = true;
        assert!(manager.accepts(NativeEvent::TouchStart));
        assert!(manager.accepts(NativeEvent::MouseMove));
        assert!(!manager.accepts(NativeEvent::PointerDown));
        assert!(manager.accepts(NativeEvent::Resize));
    }

    #[test]
    fn test_handler_table() {
        struct Counter(u32);
        fn bump(c: &mut Counter, _: &InputEvent, _: Instant) -> EventResponse {
            c.0 += 1;
            EventResponse::IGNORED
        }

        let table = HandlerTable::new().with(EventKind::Start, bump as Dispatch<Counter>);
        let mut counter = Counter(0);
        let handler = table.get(EventKind::Start).unwrap();
        handler(
            &mut counter,
            &InputEvent::new(NativeEvent::TouchStart),
            Instant::now(),
        );
        assert_eq!(counter.0, 1);
        assert!(table.get(EventKind::Move).is_none());
    }
}
