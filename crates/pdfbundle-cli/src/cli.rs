//! CLI argument parsing for pdfbundle.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, environment fallbacks and help text
//! generation. It is also compiled into the build script to render the man
//! page, so it only depends on `clap` and the library.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pdfbundle::config::{Config, DEFAULT_OUTPUT_NAME, DEFAULT_STATE_FILE};
use pdfbundle::error::{PdfBundleError, Result};

/// Merge PDFs and images from uploaded ZIP archives into one PDF.
///
/// pdfbundle keeps a session between invocations: upload one or more
/// archives, pick the files to combine and their order, then merge them
/// into a named PDF shared by every session.
#[derive(Parser, Debug)]
#[command(name = "pdfbundle")]
#[command(version)]
#[command(about = "Merge PDFs and images from ZIP archives into one PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory holding uploaded files and merged PDFs
    #[arg(long, global = true, env = "PDFBUNDLE_ROOT", default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// File keeping the session between invocations
    ///
    /// Defaults to .pdfbundle-session.json inside the root directory.
    #[arg(long, global = true, env = "PDFBUNDLE_STATE", value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Verbose output - show statistics and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Only errors and warnings will be printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print listings and results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, one per interaction.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Extract ZIP archives into the session
    ///
    /// Each archive is extracted into a folder named after it (the part of
    /// the file name before the first dot). PDF and PNG files found inside
    /// become candidates for merging.
    Upload {
        /// ZIP archives to upload
        #[arg(required = true, value_name = "ZIP")]
        archives: Vec<PathBuf>,
    },

    /// List the files that can be selected
    Candidates,

    /// Choose the files to merge, in order
    ///
    /// Each argument is either a storage key or the 1-based number shown by
    /// `pdfbundle candidates`. Repeating a file includes it twice.
    Select {
        /// Storage keys or candidate numbers
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },

    /// Merge the selected files into a PDF
    Merge {
        /// Name of the merged PDF
        #[arg(short, long, value_name = "NAME", default_value = DEFAULT_OUTPUT_NAME)]
        output: String,
    },

    /// List files directly inside the session folder
    Files,

    /// Delete a file from the session
    Delete {
        /// Storage key of the file
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// List merged PDFs
    Artifacts,

    /// Copy a merged PDF out of the store
    Download {
        /// Name of the merged PDF
        #[arg(value_name = "NAME")]
        name: String,

        /// Destination path (defaults to NAME in the current directory)
        #[arg(long, value_name = "PATH")]
        to: Option<PathBuf>,
    },

    /// Show the current session
    Session {
        /// Forget the session and start a new one on next use
        #[arg(long)]
        reset: bool,
    },
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBundleError::InvalidConfig`] if validation fails.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::with_root(&self.root);
        config.state_file = self
            .state
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_STATE_FILE));
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.json = self.json;

        config.validate().map_err(|e| {
            PdfBundleError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}
