//! The s3dock server: lifecycle around the engine and the HTTP service.
//!
//! [`Server`] is usable both from the binary in `main.rs` and directly
//! from test suites:
//!
//! ```no_run
//! use s3dock_core::ServerOverrides;
//! use s3dock_server::Server;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut server = Server::new(ServerOverrides {
//!     port: Some(0),
//!     ..ServerOverrides::default()
//! })?;
//! let addr = server.run().await?;
//! println!("listening on http://{addr}");
//! server.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod handler;
pub mod tls;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use s3dock_core::events::EventBus;
use s3dock_core::{FsStore, S3Dock, ServerOptions, ServerOverrides, resolve_options};
use s3dock_http::{S3HttpConfig, S3HttpService};

use crate::handler::S3DockHandler;

/// A configured (and possibly running) emulator instance.
pub struct Server {
    options: ServerOptions,
    data_dir: PathBuf,
    provider: S3Dock,
    running: Option<Running>,
}

struct Running {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Resolve options, open the data root, and build the engine. Nothing
    /// is bound yet; call [`run`](Self::run).
    ///
    /// A missing `directory` option resolves to a fresh subdirectory of
    /// the OS temp directory.
    ///
    /// # Errors
    ///
    /// Fails when the data root cannot be created or the configured CORS
    /// document is invalid.
    pub fn new(overrides: ServerOverrides) -> Result<Self> {
        let options = resolve_options(ServerOptions::default(), overrides);

        let data_dir = options.directory.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("s3dock-{}", uuid::Uuid::new_v4()))
        });
        let store = Arc::new(
            FsStore::open(&data_dir)
                .with_context(|| format!("failed to open data root {}", data_dir.display()))?,
        );
        let provider =
            S3Dock::from_options(store, &options).context("invalid CORS configuration")?;

        Ok(Self {
            options,
            data_dir,
            provider,
            running: None,
        })
    }

    /// The resolved data root.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The event stream; subscribe before or after [`run`](Self::run).
    #[must_use]
    pub fn events(&self) -> &EventBus {
        self.provider.events()
    }

    /// The bound address, once running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Bind the listener and start serving. Port 0 asks the OS for a free
    /// port; the chosen address is returned.
    ///
    /// # Errors
    ///
    /// Surfaces the bind error (address in use, permission denied) and TLS
    /// material problems.
    pub async fn run(&mut self) -> Result<SocketAddr> {
        anyhow::ensure!(self.running.is_none(), "server is already running");

        let listener = TcpListener::bind((self.options.hostname.as_str(), self.options.port))
            .await
            .with_context(|| {
                format!(
                    "failed to bind {}:{}",
                    self.options.hostname, self.options.port
                )
            })?;
        let addr = listener.local_addr().context("no local address")?;

        let tls_acceptor = match (&self.options.cert, &self.options.key) {
            (Some(cert), Some(key)) => Some(tls::acceptor_from_pem(cert, key)?),
            _ => None,
        };

        let service = S3HttpService::new(
            Arc::new(S3DockHandler(self.provider.clone())),
            &S3HttpConfig {
                hostname: self.options.hostname.clone(),
            },
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let accept_task = tokio::spawn(accept_loop(listener, service, tls_acceptor, shutdown_rx));

        info!(
            %addr,
            directory = %self.data_dir.display(),
            https = self.options.cert.is_some() && self.options.key.is_some(),
            "s3dock listening"
        );

        self.running = Some(Running {
            addr,
            shutdown_tx,
            accept_task,
        });
        Ok(addr)
    }

    /// Stop accepting, drain in-flight requests, detach event
    /// subscribers, and apply the close-time cleanup policy.
    ///
    /// # Errors
    ///
    /// Fails when the cleanup wipe fails.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(running) = self.running.take() {
            // A dropped receiver means the loop already exited; fine.
            let _ = running.shutdown_tx.send(());
            if let Err(e) = running.accept_task.await {
                warn!(error = %e, "accept loop ended abnormally");
            }
        }

        self.provider.events().detach_all();

        if self.options.remove_buckets_on_close {
            self.provider
                .store()
                .wipe()
                .await
                .context("failed to wipe data root on close")?;
        }

        info!("s3dock closed");
        Ok(())
    }
}

/// Accept connections until the shutdown signal fires, then drain.
async fn accept_loop(
    listener: TcpListener,
    service: S3HttpService<S3DockHandler>,
    tls_acceptor: Option<tokio_rustls::TlsAcceptor>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let http = http.clone();
                match &tls_acceptor {
                    Some(acceptor) => {
                        let acceptor = acceptor.clone();
                        let watcher = graceful.watcher();
                        tokio::spawn(async move {
                            let tls_stream = match acceptor.accept(stream).await {
                                Ok(s) => s,
                                Err(e) => {
                                    warn!(%peer_addr, error = %e, "TLS handshake failed");
                                    return;
                                }
                            };
                            let conn = http.serve_connection(TokioIo::new(tls_stream), svc);
                            if let Err(e) = watcher.watch(conn.into_owned()).await {
                                error!(%peer_addr, error = %e, "connection error");
                            }
                        });
                    }
                    None => {
                        let conn = http.serve_connection(TokioIo::new(stream), svc);
                        let conn = graceful.watch(conn.into_owned());
                        tokio::spawn(async move {
                            if let Err(e) = conn.await {
                                error!(%peer_addr, error = %e, "connection error");
                            }
                        });
                    }
                }
            }

            _ = &mut shutdown_rx => {
                info!("shutdown requested, draining connections");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");
}
