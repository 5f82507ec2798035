//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Patient document manager client
#[derive(Parser, Debug)]
#[command(name = "chartfile")]
#[command(about = "Manage documents attached to patient records")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a patient's documents
    List {
        /// Patient to list documents for
        #[arg(short, long)]
        patient: String,

        /// Show only one category (e.g. "Lab Results"); omit for all
        #[arg(long)]
        category: Option<String>,
    },

    /// Upload a file for a patient
    Upload {
        /// Patient the document belongs to
        #[arg(short, long)]
        patient: String,

        /// File to upload
        file: PathBuf,

        /// Override the MIME type guessed from the file extension
        #[arg(long)]
        mime: Option<String>,
    },

    /// Delete documents by id
    Delete {
        /// Patient scope for the post-delete listing refresh
        #[arg(short, long)]
        patient: String,

        /// Ids of the documents to delete
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Download documents to a local directory
    Download {
        /// Patient to download documents for
        #[arg(short, long)]
        patient: String,

        /// Ids to download; omit to download every listed document
        ids: Vec<String>,

        /// Destination directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show or initialize configuration
    Config {
        /// Write a default configuration file to the current directory
        #[arg(long)]
        init: bool,
    },
}

impl Cli {
    /// Log level derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}
