//! Error types for Easel operations.
//!
//! [`EaselError`] is the top-level error returned by the renderer and the
//! view. Engine-boundary failures are not caught anywhere in the library;
//! they surface as [`EaselError::Engine`] to whoever triggered the pass.

use std::io;

use thiserror::Error;

use easel_core::{error::ShapeError, shape::NodeId};

/// Failures reported by a [`SceneEngine`](crate::engine::SceneEngine).
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("failed to create {kind} node: {reason}")]
    Create { kind: &'static str, reason: String },

    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}

/// The main error type for Easel operations.
#[derive(Debug, Error)]
pub enum EaselError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(String),
}
