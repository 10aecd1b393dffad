use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "patchbook",
    bin_name = "patchbook",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Keep code projects and their version history on disk", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this directory for the store instead of the configured one
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Load settings from this file instead of the default config file
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects, most recently updated first
    #[command(alias = "ls", display_order = 1)]
    List,

    /// Show one project and its latest versions
    #[command(display_order = 2)]
    Show {
        /// Project id
        id: String,

        /// Print only the project's code
        #[arg(long)]
        code: bool,
    },

    /// Create a project, or replace one with --id
    #[command(display_order = 3)]
    Save {
        /// Project name
        #[arg(long)]
        name: String,

        /// Replace the project with this id
        #[arg(long)]
        id: Option<String>,

        /// Project description
        #[arg(long)]
        description: Option<String>,

        /// Read code from this file (default: stdin)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Delete a project and all of its versions
    #[command(alias = "rm", display_order = 4)]
    Delete {
        /// Project id
        id: String,
    },

    /// Find projects by name or description
    #[command(display_order = 5)]
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Record a version of a project's code
    #[command(alias = "snap", display_order = 10)]
    Snapshot {
        /// Project id
        project_id: String,

        /// Label for this version
        #[arg(long)]
        label: Option<String>,

        /// Read code from this file (default: stdin, else the project's code)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// List versions of one project, or the latest across all projects
    #[command(display_order = 11)]
    Versions {
        /// Project id
        project_id: Option<String>,

        /// Maximum number of versions to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Keep only the newest versions of every project
    #[command(display_order = 12)]
    Cleanup {
        /// Versions to keep per project
        #[arg(long)]
        keep: Option<usize>,
    },

    /// Export a project to JSON
    #[command(display_order = 20)]
    Export {
        /// Project id
        id: String,

        /// Write to this file (use "-" for stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Import a project from an exported JSON file
    #[command(display_order = 21)]
    Import {
        /// Exported file (use "-" for stdin)
        file: PathBuf,
    },

    /// Show project and version counts
    #[command(display_order = 30)]
    Stats,
}
