//! CLI error type and its miette diagnostic rendering.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use easel::EaselError;

use crate::config::ConfigError;

/// Everything that can make a CLI run fail.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Easel(#[from] EaselError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Diagnostic for CliError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            Self::Config(_) => "easel::config",
            Self::Easel(EaselError::Engine(_)) => "easel::engine",
            Self::Easel(EaselError::Shape(_)) => "easel::shape",
            Self::Easel(EaselError::Io(_)) => "easel::io",
            Self::Easel(EaselError::Export(_)) => "easel::export",
            Self::InvalidArgument(_) => "easel::args",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            Self::Config(ConfigError::Parse(_)) => {
                "check the TOML syntax and the key names of the configuration file"
            }
            Self::Config(ConfigError::MissingFile(_)) => {
                "pass an existing file to --config, or omit it to use the defaults"
            }
            Self::Config(ConfigError::Validation(_)) => {
                "view.background_color must be a CSS color such as \"white\" or \"#f0f0f0\""
            }
            Self::Easel(EaselError::Io(_)) => "check that the output directory exists and is writable",
            Self::InvalidArgument(_) => "run with --help to see the accepted values",
            _ => return None,
        };
        Some(Box::new(help))
    }
}
