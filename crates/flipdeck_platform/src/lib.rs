//! Flipdeck Platform Abstraction Layer
//!
//! This crate provides the host-facing traits and input types the pager is
//! written against:
//!
//! - [`Host`] - element lookup, capability probing and listener registration
//! - [`Surface`] - a styleable element handle (container or slide)
//! - [`InputEvent`] / [`NativeEvent`] - raw input with static device-family
//!   and canonical-kind tables
//!
//! # Host Implementations
//!
//! - `testing::MemoryHost` - in-memory element tree (feature `testing`)
//! - Browser and native bindings live with the embedding application
//!
//! # Example
//!
//! ```ignore
//! use flipdeck_platform::*;
//!
//! // Forward a raw touch move from the host's event callback
//! let event = InputEvent::touch(NativeEvent::TouchMove, 12.0, 340.0);
//! assert_eq!(event.family(), Some(DeviceFamily::Touch));
//! assert_eq!(event.kind(), EventKind::Move);
//! ```

mod error;
mod host;
mod input;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use host::{Capabilities, Host, ListenerTarget, Size, Surface};
pub use input::{
    DeviceFamily, EventKind, EventResponse, EventTarget, InputEvent, NativeEvent, Point,
    PointerButton,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::host::{Capabilities, Host, ListenerTarget, Size, Surface};
    pub use crate::input::{
        DeviceFamily, EventKind, EventResponse, EventTarget, InputEvent, NativeEvent, Point,
        PointerButton,
    };
}
