//! s3dock - a filesystem-backed, S3-compatible emulator.
//!
//! # Usage
//!
//! ```text
//! S3DOCK_PORT=4568 s3dock-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `S3DOCK_HOSTNAME` | `localhost` | Bind host and virtual-host base |
//! | `S3DOCK_PORT` | `4568` | TCP port (0 = OS-assigned) |
//! | `S3DOCK_DIRECTORY` | temp subdir | Data root |
//! | `S3DOCK_SILENT` | `false` | Suppress all log output |
//! | `S3DOCK_CORS` | *(unset)* | Path to a CORSConfiguration XML file, or `false` to disable CORS |
//! | `S3DOCK_INDEX_DOCUMENT` | *(unset)* | Serve every bucket as a website with this index |
//! | `S3DOCK_ERROR_DOCUMENT` | *(unset)* | Website error document |
//! | `S3DOCK_KEY_FILE` / `S3DOCK_CERT_FILE` | *(unset)* | PEM files; both present = HTTPS |
//! | `S3DOCK_REMOVE_BUCKETS_ON_CLOSE` | `false` | Empty the data root on shutdown |
//! | `RUST_LOG` | `info` | Tracing filter |

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use s3dock_core::config::CorsSetting;
use s3dock_core::ServerOverrides;
use s3dock_server::Server;

fn init_tracing(silent: bool) {
    let filter = if silent {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

/// Assemble overrides from the environment.
fn overrides_from_env() -> Result<ServerOverrides> {
    let port = match std::env::var("S3DOCK_PORT") {
        Ok(raw) => Some(
            raw.parse::<u16>()
                .with_context(|| format!("invalid S3DOCK_PORT: {raw}"))?,
        ),
        Err(_) => None,
    };

    let cors = match std::env::var("S3DOCK_CORS") {
        Ok(value) if value.eq_ignore_ascii_case("false") => Some(CorsSetting::Disabled),
        Ok(path) => {
            let xml = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read CORS file {path}"))?;
            Some(CorsSetting::Document(xml))
        }
        Err(_) => None,
    };

    let key = match std::env::var("S3DOCK_KEY_FILE") {
        Ok(path) => Some(
            std::fs::read(&path).with_context(|| format!("failed to read key file {path}"))?,
        ),
        Err(_) => None,
    };
    let cert = match std::env::var("S3DOCK_CERT_FILE") {
        Ok(path) => Some(
            std::fs::read(&path).with_context(|| format!("failed to read cert file {path}"))?,
        ),
        Err(_) => None,
    };

    Ok(ServerOverrides {
        hostname: std::env::var("S3DOCK_HOSTNAME").ok(),
        port,
        silent: Some(env_flag("S3DOCK_SILENT")),
        directory: std::env::var("S3DOCK_DIRECTORY").ok().map(Into::into),
        key,
        cert,
        cors,
        index_document: std::env::var("S3DOCK_INDEX_DOCUMENT").ok(),
        error_document: std::env::var("S3DOCK_ERROR_DOCUMENT").ok(),
        remove_buckets_on_close: Some(env_flag("S3DOCK_REMOVE_BUCKETS_ON_CLOSE")),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let overrides = overrides_from_env()?;
    init_tracing(overrides.silent.unwrap_or(false));

    let mut server = Server::new(overrides)?;
    let addr = server.run().await?;
    info!(%addr, directory = %server.data_dir().display(), "ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to wait for shutdown signal")?;
    info!("shutdown signal received");

    server.close().await
}
