use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logvault",
    about = "Tenant log index and retrieval for multi-tenant server deployments",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, default_value = "text", global = true)]
    pub log_format: String,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "LOGVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the log files visible to this server
    List {
        /// Tenant domain to list logs for. Empty means the caller's own scope
        #[arg(short, long, default_value = "")]
        domain: String,

        /// Server key to list logs for. Empty means the current server
        #[arg(short, long, default_value = "")]
        server_key: String,

        /// Output format for the index
        #[arg(short, long, value_enum, default_value = "table")]
        format: IndexFormat,
    },

    /// Download a single log file
    Download {
        /// Name of the log file to download
        #[arg(value_name = "LOG_FILE")]
        file: String,

        /// Tenant domain the log belongs to. Empty means the super tenant
        #[arg(short, long, default_value = "")]
        domain: String,

        /// Service whose logs to address (managers only)
        #[arg(long)]
        service: Option<String>,

        /// Output file path (default: the log's bare filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display the effective logvault configuration
    Config,

    /// Show information about logvault
    Info,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum IndexFormat {
    Table,
    Json,
}
