use crate::export::{ExportFormat, ExportSource};
use clap::{Parser, Subcommand};

/// Command-line interface definition for sitefeed
/// Turn published spreadsheets into website pages
#[derive(Parser)]
#[command(
    name = "sitefeed",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fetch published spreadsheets, render program and supporter pages, and publish them to the website repository",
    long_about = None
)]
pub struct Cli {
    /// Use another configuration file
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Override run log database path (useful for tests)
    #[arg(global = true, long = "db", value_name = "FILE")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the run log
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            requires = "edit_config",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Build the program schedule pages
    Schedule {
        #[arg(long, value_name = "FILE", help = "Read the CSV from a local file")]
        input: Option<String>,

        #[arg(
            long,
            value_name = "DIR",
            conflicts_with = "publish",
            help = "Write the rendered pages under DIR"
        )]
        out: Option<String>,

        #[arg(long, help = "Commit the rendered pages to the website repository")]
        publish: bool,

        #[arg(long = "dry-run", requires = "publish", help = "Show what would be committed")]
        dry_run: bool,
    },

    /// Build the supporters pages
    Supporters {
        #[arg(long, value_name = "FILE", help = "Read the CSV from a local file")]
        input: Option<String>,

        #[arg(
            long,
            value_name = "DIR",
            conflicts_with = "publish",
            help = "Write the rendered pages under DIR"
        )]
        out: Option<String>,

        #[arg(long, help = "Commit the rendered pages to the website repository")]
        publish: bool,

        #[arg(long = "dry-run", requires = "publish", help = "Show what would be committed")]
        dry_run: bool,
    },

    /// Export processed rows
    Export {
        #[arg(long, value_enum, default_value = "schedule")]
        source: ExportSource,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Output file (absolute path)")]
        file: String,

        #[arg(long, value_name = "FILE", help = "Read the CSV from a local file")]
        input: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal run log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, value_name = "N", requires = "print", help = "Only the last N rows")]
        limit: Option<usize>,
    },
}
