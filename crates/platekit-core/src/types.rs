//! Shared identifier types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a placed model.
///
/// Assigned once at model creation and never reused. The scene layer owns
/// the model itself; collaborators hold only the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelId(Uuid);

impl ModelId {
    /// Creates a new unique model id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Model({})", &self.0.to_string()[..8])
    }
}
