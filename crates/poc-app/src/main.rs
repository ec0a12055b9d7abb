mod backend;
mod cli;
mod config;
mod error;
mod keep_alive;
mod service;
#[cfg(test)]
mod testing;

use clap::Parser;
use log::info;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use crate::backend::Gateway;
use crate::cli::{Args, Command};
use crate::config::ServiceConfig;
use crate::keep_alive::KeepAlive;
use crate::service::{Fetcher, Resolver, SignatureClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ServiceConfig::load()?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("poc/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let fetcher = Fetcher::new(http);
    let client = SignatureClient::new(Resolver::new(fetcher.clone(), &config), fetcher, config.create_timeout);

    match args.command {
        Command::Status => {
            let report = client.status().await;
            println!("{}", report.statuses.service.label());
            println!("{}", report.statuses.hardware.label());
            if let Some(endpoint) = report.resolution.endpoint() {
                println!("{endpoint}");
            }
        }
        Command::Create(create) => {
            let request = create.to_draft()?.build()?;
            let result = client.create(&request).await?;

            println!(
                "strategy {} | combined velocity {} | layers {:?}",
                result.strategy, result.combined_velocity, result.layer_dimensions
            );
            for line in cli::write_signatures(&create.out, &result)? {
                println!("{line}");
            }
        }
        Command::KeepAlive => {
            let fallback = client.resolver().fallback().clone();
            KeepAlive::new(client, fallback, config.fallback_probe_timeout, config.keep_alive_interval)
                .run(shutdown_signal())
                .await;
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let listener = TcpListener::bind(("0.0.0.0", port)).await?;
            Gateway::new(client).serve(listener, shutdown_signal()).await?;
            info!("Gateway stopped");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
