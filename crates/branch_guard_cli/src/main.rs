use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use branch_guard_cli::commands::{execute, Commands};
use branch_guard_cli::config::ProviderConfig;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// BranchGuard CLI: keep GitHub branch protection rules in line with a declared configuration
#[derive(Parser)]
#[command(name = "branch-guard")]
#[command(version)]
#[command(about = "Manage GitHub branch protection rules through the GraphQL API", long_about = None)]
struct Cli {
    /// Path to the provider configuration file (defaults to ./branch-guard.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("BRANCH_GUARD_LOG"))
        .init();

    let cli = Cli::parse();

    let config = match ProviderConfig::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };

    match execute(&cli.command, &config).await {
        Ok(output) => {
            println!("{output}");
        }
        Err(e) => {
            error!("Error: {e}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
