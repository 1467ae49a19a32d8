//! Binary entry point: resolve configuration, start file logging, seed the
//! library and drive the Ratatui event loop until the user exits.
use ampleit::logging::init_logging;
use ampleit::seed::load_seed;
use ampleit::{run_app, App, AppConfig, CliArgs, LibraryStore};
use clap::Parser;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let config = AppConfig::resolve(cli)?;
    init_logging(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting ampleit");

    let seed = load_seed(&config)?;
    let store = LibraryStore::new(seed);
    let mut app = App::new(store, &config);

    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!(error = %err, "terminal session failed");
    }
    result
}
