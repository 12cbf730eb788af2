//! Confab service binary.

use anyhow::Context;
use clap::Parser;
use confab::init_logging;
use confab_config::ConfabConfig;
use confab_memory::{BackendChain, FileBackend, MemoryBackend, MemoryStore, RemoteBackend};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Conversation memory service for a voice agent.
#[derive(Debug, Parser)]
#[command(name = "confab", version, about)]
struct Cli {
    /// Bind host (overrides CONFAB_HOST).
    #[arg(long)]
    host: Option<String>,
    /// Bind port (overrides CONFAB_PORT).
    #[arg(long)]
    port: Option<u16>,
    /// Data directory for the local-file tier (overrides CONFAB_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = ConfabConfig::from_env().context("detect configuration")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.memory.data_dir = Some(data_dir);
    }

    let store = Arc::new(build_store(&config));
    let app = confab_server::router(store);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("confab listening on http://{addr}");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}

/// Assemble the backend chain from detected deployment facts.
///
/// A tier that cannot be constructed is skipped with a warning rather than
/// failing startup; the in-process cache keeps the service usable even
/// with no durable tier at all.
fn build_store(config: &ConfabConfig) -> MemoryStore {
    let op_timeout = Duration::from_secs(config.memory.op_timeout_secs);
    let mut tiers: Vec<Arc<dyn MemoryBackend>> = Vec::new();

    if let Some(remote) = &config.memory.remote {
        match RemoteBackend::new(&remote.url, &remote.token, op_timeout) {
            Ok(backend) => tiers.push(Arc::new(backend)),
            Err(err) => warn!("remote tier disabled (error={err})"),
        }
    } else {
        info!("remote store not configured; starting with local persistence only");
    }

    match config.memory.resolve_data_dir() {
        Ok(dir) => match FileBackend::new(&dir) {
            Ok(backend) => tiers.push(Arc::new(backend)),
            Err(err) => warn!("file tier disabled (dir={}, error={err})", dir.display()),
        },
        Err(err) => warn!("file tier disabled (error={err})"),
    }

    if tiers.is_empty() {
        warn!("no durable tier available; memory lives in the process cache only");
    }

    let chain = BackendChain::new(tiers).with_op_timeout(op_timeout);
    MemoryStore::with_max_turns(chain, config.memory.max_turns)
}
