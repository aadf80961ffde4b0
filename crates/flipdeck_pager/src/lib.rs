//! Flipdeck Pager
//!
//! A full-screen, one-axis slide pager. Slides are stacked in a container;
//! dragging reveals the neighbour above or below, and releasing past a
//! distance threshold commits the change, otherwise both slides roll back.
//!
//! The engine is headless. A [`Host`](flipdeck_platform::Host) supplies
//! element lookup, style writes and listener registration, and forwards raw
//! input back through [`Pager::handle_event`]. Observers subscribe to
//! [`PageEvent`]s with [`Pager::on`].
//!
//! # Modules
//!
//! - [`engine`] - the gesture state machine and geometry
//! - [`gesture`] - per-gesture state and wraparound rules
//! - [`transition`] - transform/transition style writes with fallbacks
//! - [`binding`] - live input families, listener registration, dispatch table
//! - [`resize`] - debounced refresh on resize/orientation change
//! - [`event`] - lifecycle event names and payloads

pub mod binding;
pub mod engine;
pub mod error;
pub mod event;
pub mod gesture;
pub mod resize;
pub mod transition;

pub use binding::{BindingManager, Dispatch, HandlerTable};
pub use engine::{ContainerSpec, Outcome, Pager, PagerState, SlideSpec};
pub use error::{PagerError, Result};
pub use event::{EventPayload, PageEvent, PagerBus, SlideRef};
pub use gesture::{Direction, EdgePolicy, Gesture, DEAD_ZONE};
pub use resize::ResizeCoordinator;
pub use transition::{SlideStyler, Z_BASE, Z_RAISED};

// Configuration is part of the pager's public surface
pub use flipdeck_core::PageConfig;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{ContainerSpec, Outcome, Pager, PagerState, SlideSpec};
    pub use crate::error::{PagerError, Result};
    pub use crate::event::{EventPayload, PageEvent, SlideRef};
    pub use flipdeck_core::PageConfig;
}
