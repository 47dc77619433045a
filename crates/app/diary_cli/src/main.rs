pub use self::error::{Error, Result};

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _logger = logging::init()?;

    if let Err(e) = run().await {
        log::error!("{}", e);
        if e.requires_login() {
            log::info!("Run `diary login` to sign in.");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => commands::version(),
        command => {
            let gateway = commands::connect(cli.api_url.as_deref(), cli.credentials)?;
            commands::dispatch(&gateway, command).await
        }
    }
}
