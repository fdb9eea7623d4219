pub use self::{board::*, placement::*, shape::*};

pub(crate) mod board;
pub(crate) mod placement;
pub(crate) mod shape;
