use serde::{Deserialize, Serialize};

/// A chosen move: how many clockwise quarter turns to apply to the spawn orientation and
/// the leftmost board column of the rotated shape's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Placement {
    pub rotation: usize,
    pub column: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(rotation: usize, column: usize) -> Self {
        Self { rotation, column }
    }
}
