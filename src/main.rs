use clap::Parser;
use pre_commit_progress::Verdict;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("pre_commit_progress=debug")
    } else {
        EnvFilter::new("pre_commit_progress=warn")
    };

    // stdout belongs to the status view
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => {
            let verdict = cli::run::execute(args).await?;
            if verdict != Verdict::Passed {
                std::process::exit(verdict.exit_code());
            }
            Ok(())
        }
        Commands::Schema => cli::schema::execute(),
    }
}
