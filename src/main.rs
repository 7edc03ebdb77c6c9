use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use name_raffle::cli::{self, Cli};
use name_raffle::config::Config;
use name_raffle::store;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match (&cli.config, Config::default_path()) {
        (Some(path), _) => Config::load(path)?,
        (None, Some(path)) => Config::load_or_default(&path)?,
        (None, None) => Config::default(),
    };

    let state_path = config.state_path(cli.state);
    let mut ledger = store::restore(&state_path, || config.seed_ledger());
    let before = ledger.clone();

    let mut stdout = io::stdout().lock();
    cli::run(cli.command, &mut ledger, &config.suspense, &mut stdout)?;

    // save after every session that changed something
    if ledger != before {
        store::persist(&ledger, &state_path);
    }
    Ok(())
}
