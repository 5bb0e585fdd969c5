//! pagesmith - a static site generator for Markdown pages with callouts.

mod build;
mod cli;
mod config;
mod error;
mod generator;
mod init;
mod logger;
mod markup;
mod page;
mod render;
mod serve;
mod site;
mod utils;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use serve::serve_site;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Init { .. } => new_site(&config),
        Commands::Build { .. } => build_site(&config).map(|_| ()),
        Commands::Serve { .. } => {
            build_site(&config)?;
            serve_site(&config)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = SiteConfig::default();
    config.update_with_cli(cli);

    // Validate config state based on command
    match (cli.is_init(), config.config_path.exists()) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (true, false) => return Ok(config),
        (false, false) => bail!("Config file `{}` not found.", config.config_path.display()),
        (false, true) => {}
    }

    let mut config = SiteConfig::from_path(&config.config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
