//! slircd - a minimal single-node, single-network IRC daemon.

mod config;
mod error;
mod handlers;
mod logger;
mod network;
mod persistence;
mod server;
mod state;

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::server::Server;

/// Resolve the configuration path from CLI arguments: `-c <path>`,
/// `--config <path>`, a bare path, or `config.toml` if nothing is given.
fn resolve_config_path() -> String {
    let mut args = std::env::args().skip(1);
    match args.next() {
        Some(flag) if flag == "-c" || flag == "--config" => args.next().unwrap_or_else(|| {
            eprintln!("missing path after {flag}");
            std::process::exit(1);
        }),
        Some(path) => path,
        None => "config.toml".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = resolve_config_path();
    let config = config::load(Path::new(&config_path)).map_err(|e| {
        eprintln!("ERROR: failed to load config from {config_path}: {e}");
        e
    })?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt().with_env_filter(env_filter).json().init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
        }
    }

    let problems = config::validate(&config);
    if !problems.is_empty() {
        for problem in &problems {
            error!(error = %problem, "configuration problem");
        }
        anyhow::bail!("configuration validation failed with {} problem(s)", problems.len());
    }

    let password = config.server.resolve_password()?;
    let server = Arc::new(Server::from_config(&config, password));
    info!(server = %server.name, network = %server.network, "starting slircd");

    let mut tasks = Vec::new();

    for listener in &config.listeners {
        let address = listener.address.to_string();
        let server = Arc::clone(&server);
        tasks.push(tokio::spawn(async move {
            if let Err(e) = network::gateway::run_plain(address, server).await {
                error!(error = %e, "plain listener exited");
            }
        }));
    }

    if let Some(tls) = &config.tls {
        let acceptor = network::tls::build_acceptor(&tls.cert_path, &tls.key_path)?;
        let address = tls.address.to_string();
        let server = Arc::clone(&server);
        tasks.push(tokio::spawn(async move {
            if let Err(e) = network::gateway::run_tls(address, acceptor, server).await {
                error!(error = %e, "tls listener exited");
            }
        }));
    }

    tasks.push(tokio::spawn(network::liveness::run(Arc::clone(&server))));

    for task in tasks {
        let _ = task.await;
    }

    Ok(())
}
