//! Error types for shape bookkeeping.

use thiserror::Error;

use crate::{identifier::Id, shape::MountState};

/// Errors raised while building or transitioning logical shapes.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("shape `{id}` cannot move from {from:?} to {to:?}")]
    IllegalTransition {
        id: Id,
        from: MountState,
        to: MountState,
    },

    #[error("unknown shape type `{0}`")]
    UnknownShapeType(String),

    #[error("sub-shape `{label}` has no shape type")]
    IncompleteBinding { label: String },
}
