//! # PlateKit Core
//!
//! Core types, errors, and utilities shared across PlateKit crates.
//! Provides the model identifier type, the error taxonomy, tuning
//! constants, and the event bus used to deliver scene state-change
//! notifications to the rendering and UI layers.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{EventBusError, SceneError};
pub use event_bus::{EventBus, SceneEvent, SceneState, SelectedState, SubscriptionId};
pub use types::ModelId;
