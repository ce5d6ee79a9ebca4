pub mod svg;

use std::io;

use thiserror::Error;

use crate::{engine::RecordingEngine, error::EaselError};

/// Writes a snapshot of a recorded scene somewhere.
pub trait Exporter {
    fn export_scene(&self, engine: &RecordingEngine) -> Result<(), Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<Error> for EaselError {
    fn from(error: Error) -> Self {
        match error {
            Error::Render(msg) => Self::Export(msg),
            Error::Io(err) => Self::Io(err),
        }
    }
}
