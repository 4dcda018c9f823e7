use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use seekback::search::parse_time_arg;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seekback")]
#[command(author, version, about = "Index and search timestamped recordings")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync once, then keep the index in sync until interrupted
    Start,

    /// Sync the index with the samples directory once
    Sync {
        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search transcripts and summaries
    Search {
        /// Full-text query (FTS5 syntax); omit to filter by time only
        query: Option<String>,

        /// Samples overlapping this window
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], value_parser = parse_time_arg)]
        overlap: Option<Vec<DateTime<FixedOffset>>>,

        /// Samples entirely inside this window
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], value_parser = parse_time_arg)]
        contained: Option<Vec<DateTime<FixedOffset>>>,

        /// Only samples starting at or after this time
        #[arg(long, value_parser = parse_time_arg)]
        start_after: Option<DateTime<FixedOffset>>,

        /// Only samples starting at or before this time
        #[arg(long, value_parser = parse_time_arg)]
        start_before: Option<DateTime<FixedOffset>>,

        /// Only samples ending at or after this time
        #[arg(long, value_parser = parse_time_arg)]
        end_after: Option<DateTime<FixedOffset>>,

        /// Only samples ending at or before this time
        #[arg(long, value_parser = parse_time_arg)]
        end_before: Option<DateTime<FixedOffset>>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the samples in the samples directory
    List {
        /// List the index instead, ordered by start time
        #[arg(long)]
        indexed: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one sample and its files
    Show {
        /// Sample ID (the shared file stem)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the summary of an indexed sample
    SetSummary {
        id: String,
        summary: String,
    },

    /// Overwrite the transcript sidecar of a sample
    SetTranscript {
        id: String,

        /// Read the transcript from this file instead of the argument
        #[arg(long, conflicts_with = "transcript")]
        from_file: Option<PathBuf>,

        transcript: Option<String>,
    },

    /// Probe the duration of a media file
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
