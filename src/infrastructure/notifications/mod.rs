//! # Notification Adapters
//!
//! Implementations of the engine's notification hook.

pub mod publishers;

pub use publishers::{InMemoryEventPublisher, LoggingEventPublisher};
