use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rouillepasv::core_cli::Cli;
use rouillepasv::core_log::init_logger;
use rouillepasv::{Config, Server};
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();
    init_logger(args.verbose);

    // Determine the default config path based on the OS
    let default_config_path = if cfg!(target_os = "windows") {
        PathBuf::from("C:\\rouillepasv\\etc\\rouillepasv.toml")
    } else {
        PathBuf::from("/etc/rouillepasv.toml")
    };

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => load_default_config(&default_config_path)?,
    };

    if let Some(port) = args.listen_port {
        config.server.listen_port = port;
    }
    config.validate()?;

    let server = Server::from_config(config).await?;
    server.start().await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Ctrl-C received, shutting down");
    server.stop().await;

    Ok(())
}

fn load_default_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from_file(path)
    } else {
        warn!(
            "No configuration file at {}, using built-in defaults",
            path.display()
        );
        Ok(Config::default())
    }
}
