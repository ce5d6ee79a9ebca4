//! Command-line argument definitions for the Easel CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the demo scene, the simulated input,
//! the snapshot path, configuration file selection and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Easel demo driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the output SVG snapshot
    #[arg(short, long, default_value = "easel.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of card rows in the demo grid
    #[arg(long, default_value_t = 3)]
    pub rows: usize,

    /// Number of card columns in the demo grid
    #[arg(long, default_value_t = 4)]
    pub columns: usize,

    /// Container width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Container height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Simulated drag, as a pointer offset from the container centre
    #[arg(long, num_args = 2, value_names = ["DX", "DY"], allow_negative_numbers = true)]
    pub drag: Option<Vec<f32>>,

    /// Simulated wheel notches; negative values zoom out
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub zoom: i32,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            output: "easel.svg".to_string(),
            config: None,
            rows: 3,
            columns: 4,
            width: 800.0,
            height: 600.0,
            drag: None,
            zoom: 0,
            log_level: "info".to_string(),
        }
    }
}
