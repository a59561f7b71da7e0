use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use remote_panel::{cli::Cli, config::Config, panel::BUTTONS, App};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.list_buttons {
        return list_buttons();
    }

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // No pipe, no channel: bail before anything is opened
    let pipe = cli.resolve_pipe(&config)?;

    info!("Starting remote-panel on {}", pipe.display());

    let app = App::new(config, pipe)?;
    app.run()
}

fn list_buttons() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&BUTTONS)?);
    Ok(())
}
