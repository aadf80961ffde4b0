//! Lifecycle and gesture events published by the pager

use flipdeck_core::EventBus;

/// Event names a collaborator can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageEvent {
    /// Listeners bound
    Create,
    /// Listeners unbound
    Destroy,
    /// Geometry recomputed
    Refresh,
    /// Gesture started
    Start,
    /// Gesture moved with a locked candidate
    Move,
    /// A slide's offset/scale was written
    Translate,
    /// Drag released, settle animation started
    End,
    /// Settle animation finished
    TransitionEnd,
    /// The incoming slide became current
    Success,
    /// The drag rolled back
    Fail,
    /// Raw resize/orientation signal received
    Resize,
}

impl PageEvent {
    pub const ALL: [PageEvent; 11] = [
        PageEvent::Create,
        PageEvent::Destroy,
        PageEvent::Refresh,
        PageEvent::Start,
        PageEvent::Move,
        PageEvent::Translate,
        PageEvent::End,
        PageEvent::TransitionEnd,
        PageEvent::Success,
        PageEvent::Fail,
        PageEvent::Resize,
    ];

    /// Stable name, for logs and scripted hosts
    pub fn name(self) -> &'static str {
        match self {
            PageEvent::Create => "create",
            PageEvent::Destroy => "destroy",
            PageEvent::Refresh => "refresh",
            PageEvent::Start => "start",
            PageEvent::Move => "move",
            PageEvent::Translate => "translate",
            PageEvent::End => "end",
            PageEvent::TransitionEnd => "transitionEnd",
            PageEvent::Success => "success",
            PageEvent::Fail => "fail",
            PageEvent::Resize => "resize",
        }
    }
}

/// A slide and its position in the collection
#[derive(Clone, Debug, PartialEq)]
pub struct SlideRef<E> {
    pub index: usize,
    pub element: E,
}

/// Payload delivered with an event
#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload<E> {
    /// Most events carry nothing
    None,
    /// `Success` / `Fail`: the slide pair that took part
    Transition {
        outgoing: SlideRef<E>,
        incoming: SlideRef<E>,
    },
}

impl<E> EventPayload<E> {
    /// `(outgoing, incoming)` indices for transition payloads
    pub fn indices(&self) -> Option<(usize, usize)> {
        match self {
            EventPayload::Transition { outgoing, incoming } => {
                Some((outgoing.index, incoming.index))
            }
            EventPayload::None => None,
        }
    }
}

/// The pager's event bus
pub type PagerBus<E> = EventBus<PageEvent, EventPayload<E>>;
