use anyhow::Result;
use clap::Parser;
use logvault::cli::commands::{Cli, Commands};
use logvault::cli::handlers::{handle_config_command, handle_download_command, handle_list_command};
use logvault::cli::utils::{init_logging, print_info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, &cli.log_format);

    // Execute command
    match cli.command {
        Commands::List {
            domain,
            server_key,
            format,
        } => handle_list_command(cli.config, domain, server_key, format).await,

        Commands::Download {
            file,
            domain,
            service,
            output,
        } => handle_download_command(cli.config, file, domain, service, output).await,

        Commands::Config => handle_config_command(cli.config).await,

        Commands::Info => {
            print_info();
            Ok(())
        }
    }
}
