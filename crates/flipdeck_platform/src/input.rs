//! Native input events and their normalization into device families
//!
//! Hosts forward raw events by [`NativeEvent`]. The normalizer classifies each
//! one into a [`DeviceFamily`] and a canonical [`EventKind`] through static
//! tables, so a single gesture handler can serve touch, MS-style pointer and
//! mouse input alike.

use smallvec::SmallVec;

// ============================================================================
// Device families
// ============================================================================

/// Classification of an input source
///
/// A gesture binds to the family of the event that started it. Events from
/// any other family are ignored until the gesture ends, which keeps hybrid
/// touch+mouse hardware from producing two interleaved streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    /// Touchscreen (`touchstart` and friends)
    Touch,
    /// Stylus / MS-style pointer (`MSPointerDown` and friends)
    Pointer,
    /// Desktop mouse
    Mouse,
}

impl DeviceFamily {
    /// Whether start events of this family carry a button that must be primary
    pub fn checks_button(self) -> bool {
        !matches!(self, DeviceFamily::Touch)
    }
}

/// Canonical event kind, independent of the native event name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Gesture start (press / touch down)
    Start,
    /// Gesture move
    Move,
    /// Gesture end, cancel or leave
    End,
    /// A CSS-style transition finished on a slide
    TransitionEnd,
    /// Viewport resized or rotated
    Resize,
}

// ============================================================================
// Native events
// ============================================================================

/// Every native event the pager listens to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeEvent {
    Resize,
    OrientationChange,

    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,

    PointerDown,
    PointerMove,
    PointerUp,
    PointerOut,
    PointerCancel,

    MouseDown,
    MouseMove,
    MouseUp,
    MouseOut,
    MouseCancel,

    TransitionEnd,
    WebkitTransitionEnd,
    OTransitionEnd,
    MsTransitionEnd,
}

impl NativeEvent {
    /// Window-level events
    pub const WINDOW: [NativeEvent; 2] = [NativeEvent::Resize, NativeEvent::OrientationChange];

    /// Touch listeners registered on the container
    pub const TOUCH: [NativeEvent; 4] = [
        NativeEvent::TouchStart,
        NativeEvent::TouchMove,
        NativeEvent::TouchCancel,
        NativeEvent::TouchEnd,
    ];

    /// MS-pointer listeners registered on the container
    pub const POINTER: [NativeEvent; 5] = [
        NativeEvent::PointerDown,
        NativeEvent::PointerMove,
        NativeEvent::PointerCancel,
        NativeEvent::PointerUp,
        NativeEvent::PointerOut,
    ];

    /// Mouse listeners registered on the container
    pub const MOUSE: [NativeEvent; 5] = [
        NativeEvent::MouseDown,
        NativeEvent::MouseMove,
        NativeEvent::MouseCancel,
        NativeEvent::MouseUp,
        NativeEvent::MouseOut,
    ];

    /// Transition-end variants registered on every slide
    pub const TRANSITION_END: [NativeEvent; 4] = [
        NativeEvent::TransitionEnd,
        NativeEvent::WebkitTransitionEnd,
        NativeEvent::OTransitionEnd,
        NativeEvent::MsTransitionEnd,
    ];

    /// Native event name as a host would report it
    pub fn name(self) -> &'static str {
        match self {
            NativeEvent::Resize => "resize",
            NativeEvent::OrientationChange => "orientationchange",
            NativeEvent::TouchStart => "touchstart",
            NativeEvent::TouchMove => "touchmove",
            NativeEvent::TouchEnd => "touchend",
            NativeEvent::TouchCancel => "touchcancel",
            NativeEvent::PointerDown => "MSPointerDown",
            NativeEvent::PointerMove => "MSPointerMove",
            NativeEvent::PointerUp => "MSPointerUp",
            NativeEvent::PointerOut => "MSPointerOut",
            NativeEvent::PointerCancel => "MSPointerCancel",
            NativeEvent::MouseDown => "mousedown",
            NativeEvent::MouseMove => "mousemove",
            NativeEvent::MouseUp => "mouseup",
            NativeEvent::MouseOut => "mouseout",
            NativeEvent::MouseCancel => "mousecancel",
            NativeEvent::TransitionEnd => "transitionend",
            NativeEvent::WebkitTransitionEnd => "webkitTransitionEnd",
            NativeEvent::OTransitionEnd => "oTransitionEnd",
            NativeEvent::MsTransitionEnd => "MSTransitionEnd",
        }
    }

    /// Parse a native event name
    pub fn from_name(name: &str) -> Option<Self> {
        let event = match name {
            "resize" => NativeEvent::Resize,
            "orientationchange" => NativeEvent::OrientationChange,
            "touchstart" => NativeEvent::TouchStart,
            "touchmove" => NativeEvent::TouchMove,
            "touchend" => NativeEvent::TouchEnd,
            "touchcancel" => NativeEvent::TouchCancel,
            "MSPointerDown" => NativeEvent::PointerDown,
            "MSPointerMove" => NativeEvent::PointerMove,
            "MSPointerUp" => NativeEvent::PointerUp,
            "MSPointerOut" => NativeEvent::PointerOut,
            "MSPointerCancel" => NativeEvent::PointerCancel,
            "mousedown" => NativeEvent::MouseDown,
            "mousemove" => NativeEvent::MouseMove,
            "mouseup" => NativeEvent::MouseUp,
            "mouseout" => NativeEvent::MouseOut,
            "mousecancel" => NativeEvent::MouseCancel,
            "transitionend" => NativeEvent::TransitionEnd,
            "webkitTransitionEnd" => NativeEvent::WebkitTransitionEnd,
            "oTransitionEnd" => NativeEvent::OTransitionEnd,
            "MSTransitionEnd" => NativeEvent::MsTransitionEnd,
            _ => return None,
        };
        Some(event)
    }

    /// Device family of a gesture event, `None` for window/transition events
    pub fn family(self) -> Option<DeviceFamily> {
        use NativeEvent::*;
        match self {
            TouchStart | TouchMove | TouchEnd | TouchCancel => Some(DeviceFamily::Touch),
            PointerDown | PointerMove | PointerUp | PointerOut | PointerCancel => {
                Some(DeviceFamily::Pointer)
            }
            MouseDown | MouseMove | MouseUp | MouseOut | MouseCancel => Some(DeviceFamily::Mouse),
            Resize | OrientationChange | TransitionEnd | WebkitTransitionEnd | OTransitionEnd
            | MsTransitionEnd => None,
        }
    }

    /// Canonical kind used for dispatch
    pub fn kind(self) -> EventKind {
        use NativeEvent::*;
        match self {
            TouchStart | PointerDown | MouseDown => EventKind::Start,
            TouchMove | PointerMove | MouseMove => EventKind::Move,
            TouchEnd | TouchCancel | PointerUp | PointerOut | PointerCancel | MouseUp
            | MouseOut | MouseCancel => EventKind::End,
            TransitionEnd | WebkitTransitionEnd | OTransitionEnd | MsTransitionEnd => {
                EventKind::TransitionEnd
            }
            Resize | OrientationChange => EventKind::Resize,
        }
    }
}

// ============================================================================
// Input events
// ============================================================================

/// Pointer buttons, for mouse and MS-pointer presses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button (left mouse, pen tip, finger)
    #[default]
    Primary,
    /// Middle button
    Auxiliary,
    /// Right button
    Secondary,
    /// Any other button index
    Other(u16),
}

/// A page-space coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where an event was delivered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window (resize / orientation)
    Window,
    /// The pager container or one of its non-slide descendants
    #[default]
    Container,
    /// A slide, by index
    Slide(usize),
}

/// A raw input event forwarded by the host
#[derive(Clone, Debug)]
pub struct InputEvent {
    /// Native event type
    pub event: NativeEvent,
    /// Active touch points (touch family only; first is primary)
    pub touches: SmallVec<[Point; 2]>,
    /// Event coordinate for mouse/pointer events
    pub position: Point,
    /// Pressed button for mouse/pointer starts
    pub button: PointerButton,
    /// Element that received the event
    pub target: EventTarget,
    /// Whether the originating element is an image
    pub target_is_image: bool,
}

impl InputEvent {
    /// A bare event with no coordinates
    pub fn new(event: NativeEvent) -> Self {
        Self {
            event,
            touches: SmallVec::new(),
            position: Point::default(),
            button: PointerButton::Primary,
            target: match event.kind() {
                EventKind::Resize => EventTarget::Window,
                _ => EventTarget::Container,
            },
            target_is_image: false,
        }
    }

    /// A touch event whose primary contact is at `(x, y)`
    pub fn touch(event: NativeEvent, x: f32, y: f32) -> Self {
        let mut e = Self::new(event);
        e.touches.push(Point::new(x, y));
        e.position = Point::new(x, y);
        e
    }

    /// A mouse or pointer event at `(x, y)`
    pub fn at(event: NativeEvent, x: f32, y: f32) -> Self {
        let mut e = Self::new(event);
        e.position = Point::new(x, y);
        e
    }

    /// A transition-end event delivered to a slide
    pub fn transition_end(slide: usize) -> Self {
        let mut e = Self::new(NativeEvent::TransitionEnd);
        e.target = EventTarget::Slide(slide);
        e
    }

    /// Set the pressed button
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the event target
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    /// Mark the target as an image element
    pub fn on_image(mut self) -> Self {
        self.target_is_image = true;
        self
    }

    /// Device family, from the static table
    pub fn family(&self) -> Option<DeviceFamily> {
        self.event.family()
    }

    /// Canonical kind, from the static table
    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }

    /// The single primary contact point
    ///
    /// First touch point for touch events (falling back to `position` when
    /// the touch list is empty, as on `touchend`), the event itself otherwise.
    pub fn primary_point(&self) -> Point {
        match self.family() {
            Some(DeviceFamily::Touch) => self.touches.first().copied().unwrap_or(self.position),
            _ => self.position,
        }
    }
}

/// What the host should do with the native event after dispatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// Suppress the host's default action (scrolling, image drag)
    pub prevent_default: bool,
}

impl EventResponse {
    pub const IGNORED: EventResponse = EventResponse {
        prevent_default: false,
    };

    pub const PREVENT_DEFAULT: EventResponse = EventResponse {
        prevent_default: true,
    };
}
