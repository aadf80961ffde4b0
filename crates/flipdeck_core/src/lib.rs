//! Flipdeck Core
//!
//! Building blocks shared by the pager and its collaborators:
//!
//! - **Style probing**: vendor-prefix resolution and 3-D acceleration checks
//! - **Event bus**: per-instance named-event subscription with synchronous emit
//! - **Configuration**: the immutable [`PageConfig`], loadable from JSON or TOML
//!
//! # Example
//!
//! ```rust
//! use flipdeck_core::events::EventBus;
//!
//! let bus: EventBus<&'static str, u32> = EventBus::new();
//! bus.on("changed", |index| println!("now showing slide {index}"));
//! bus.emit("changed", &2);
//! ```

pub mod config;
pub mod events;
pub mod style;

pub use config::{ConfigError, PageConfig};
pub use events::{EventBus, Handler};
pub use style::{StyleProbe, StyleSupport, Vendor, TRANSLATE_Z};
