//! Command-line argument definitions for the Tether CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Input and output default to the standard streams so the
//! tool can sit in a pipe and be called once per simulation step.

use clap::Parser;

/// Command-line arguments for the Tether layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph document (JSON); stdin when omitted
    #[arg(short, long)]
    pub input: Option<String>,

    /// Path to write the stepped document to; stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Indent the output document
    #[arg(long)]
    pub pretty: bool,
}
