//! Scene event bus.
//!
//! Delivers scene state-change notifications to rendering/UI
//! subscribers after every mutating operation on the model group.

mod bus;
mod events;

pub use bus::{EventBus, SubscriptionId};
pub use events::{SceneEvent, SceneState, SelectedState};
