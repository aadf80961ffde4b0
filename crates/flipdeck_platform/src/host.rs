//! Host abstraction
//!
//! A host is whatever owns the real render tree: a browser binding, a native
//! view hierarchy, or the in-memory test host. The pager only ever talks to
//! it through these traits.

use crate::error::Result;
use crate::input::NativeEvent;

/// Width/height pair in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A styleable element handle
///
/// Handles are cheap to clone and share the underlying element, the way DOM
/// references do. Style writes take `&self` for the same reason.
pub trait Surface: Clone + 'static {
    /// Write an inline style property (camelCase name). An empty value clears it.
    fn set_style(&self, property: &str, value: &str);

    /// Read back an inline style property
    fn style(&self, property: &str) -> Option<String>;

    /// Current rendered size (`clientWidth` / `clientHeight`)
    fn rendered_size(&self) -> Size;

    /// Whether this handle refers to a real element that can be rendered into
    fn is_renderable(&self) -> bool;
}

/// Input capabilities detected once, at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Touch events are available
    pub touch: bool,
    /// MS-style pointer events are enabled
    pub pointer: bool,
    /// Mouse events are available
    pub mouse: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            touch: true,
            pointer: false,
            mouse: true,
        }
    }
}

/// Where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The global window
    Window,
    /// The pager container
    Container,
    /// A slide, by index
    Slide(usize),
}

/// The runtime the pager is mounted in
pub trait Host {
    /// Element handle type
    type Element: Surface;

    /// The document body, used when no container is given
    fn body(&self) -> Self::Element;

    /// Resolve a selector against the document
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// Resolve a selector below `root`, in document order
    fn query_selector_all(&self, root: &Self::Element, selector: &str)
        -> Result<Vec<Self::Element>>;

    /// Direct children of `root`, in document order
    fn children(&self, root: &Self::Element) -> Vec<Self::Element>;

    /// Probe input capabilities
    fn capabilities(&self) -> Capabilities;

    /// Whether a (possibly vendor-prefixed, camelCase) style property exists
    fn supports_style(&self, property: &str) -> bool;

    /// Inner size of the window
    fn viewport_size(&self) -> Size;

    /// Start delivering `event` on `target` to the pager
    fn add_listener(&mut self, target: ListenerTarget, event: NativeEvent);

    /// Stop delivering `event` on `target`
    fn remove_listener(&mut self, target: ListenerTarget, event: NativeEvent);
}
