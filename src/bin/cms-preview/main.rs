use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use spdlog::{info, warn};

use simplecms::config::open_config;
use simplecms::logger::configure_logger;
use simplecms::server::{server_run, DEFAULT_ADDRESS, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(version, about = "Serves the blog pages rendered from the post feed", long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,
}

#[ntex::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = match open_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run cms-preview --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config, "cms-preview") {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let (address, port) = match config.server {
        Some(ref server) => (server.address.as_str(), server.port),
        None => (DEFAULT_ADDRESS, DEFAULT_PORT),
    };
    info!("Starting SimpleCMS preview =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");
    info!("Listening on {}:{}", address, port);

    Ok(server_run(config).await?)
}
