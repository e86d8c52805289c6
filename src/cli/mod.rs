//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{UploadCommand, ValidateCommand};
use std::ffi::OsString;

/// Upload Buildkite steps for the parts of a monorepo that changed
#[derive(Debug, Parser, Clone)]
#[command(name = "monorepo-diff")]
#[command(version = "0.1.0")]
#[command(about = "Upload Buildkite steps for the parts of a monorepo that changed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Diff, resolve watch rules and upload the resulting pipeline
    Upload(UploadCommand),

    /// Check a plugin configuration without running anything
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
