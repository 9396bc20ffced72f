mod cli;
mod commands;
mod config;
mod error;
mod import;
mod logging;
mod model;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use commands::Outcome;
use config::ProtocoloConfig;
use store::Registry;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        ui::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ProtocoloConfig::load()?;
    logging::init(cli.verbose, &config.log_level)?;

    // flags > ambiente > protocolo.toml
    let data_file = cli.data.unwrap_or(config.data_file);
    let username = cli.user.or(config.default_user);

    let mut registry = Registry::load(&data_file)
        .with_context(|| format!("falha ao carregar {}", data_file.display()))?;
    let actor = commands::resolve_actor(&cli.command, &registry, username.as_deref())?;
    tracing::debug!(data = %data_file.display(), %actor, "registro carregado");

    if commands::execute(cli.command, &mut registry, &actor)? == Outcome::Changed {
        registry
            .persist(&data_file)
            .with_context(|| format!("falha ao gravar {}", data_file.display()))?;
    }
    Ok(())
}
