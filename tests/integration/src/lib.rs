//! End-to-end tests for the s3dock server.
//!
//! Each test boots its own server on an OS-assigned port with a throwaway
//! data directory, drives it over plain HTTP, and tears it down at the
//! end. Nothing external is required; `cargo test -p s3dock-integration`
//! is self-contained.

use std::sync::Once;

use s3dock_core::{ServerOverrides, config::CorsSetting};
use s3dock_server::Server;

static INIT: Once = Once::new();

/// Initialize tracing once for the whole suite.
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A live server plus the client pointed at it.
pub struct TestServer {
    server: Server,
    /// Base URL, e.g. `http://127.0.0.1:49152`.
    pub base: String,
    /// Plain-HTTP client.
    pub client: reqwest::Client,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    /// Boot a server with default options (wildcard CORS, no website).
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Boot a server after letting the caller adjust the overrides.
    pub async fn start_with(adjust: impl FnOnce(&mut ServerOverrides)) -> Self {
        init_tracing();

        let data_dir = tempfile::tempdir().expect("tempdir");
        let mut overrides = ServerOverrides {
            hostname: Some("127.0.0.1".to_owned()),
            port: Some(0),
            directory: Some(data_dir.path().join("data")),
            ..ServerOverrides::default()
        };
        adjust(&mut overrides);

        let mut server = Server::new(overrides).expect("server should build");
        let addr = server.run().await.expect("server should bind");

        Self {
            server,
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _data_dir: data_dir,
        }
    }

    /// The server's event bus.
    #[must_use]
    pub fn events(&self) -> &s3dock_core::EventBus {
        self.server.events()
    }

    /// URL of a bucket or object path (paths are used verbatim).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Create a bucket, panicking on failure.
    pub async fn create_bucket(&self, bucket: &str) {
        let resp = self
            .client
            .put(self.url(&format!("/{bucket}")))
            .send()
            .await
            .expect("request should succeed");
        assert!(
            resp.status().is_success(),
            "create bucket {bucket} failed: {}",
            resp.status()
        );
    }

    /// Put an object with a body and optional extra headers.
    pub async fn put_object(&self, bucket: &str, key: &str, body: &[u8], headers: &[(&str, &str)]) {
        let mut req = self
            .client
            .put(self.url(&format!("/{bucket}/{key}")))
            .body(body.to_vec());
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let resp = req.send().await.expect("request should succeed");
        assert!(
            resp.status().is_success(),
            "put {bucket}/{key} failed: {}",
            resp.status()
        );
    }

    /// Shut the server down, draining in-flight requests.
    pub async fn close(mut self) {
        self.server.close().await.expect("close should succeed");
    }
}

/// A single-rule CORS document pinned to one origin.
#[must_use]
pub fn strict_cors_xml(origin: &str) -> String {
    format!(
        "<CORSConfiguration>\
           <CORSRule>\
             <AllowedOrigin>{origin}</AllowedOrigin>\
             <AllowedMethod>GET</AllowedMethod>\
             <AllowedMethod>PUT</AllowedMethod>\
             <AllowedHeader>*</AllowedHeader>\
             <ExposeHeader>ETag</ExposeHeader>\
             <MaxAgeSeconds>3000</MaxAgeSeconds>\
           </CORSRule>\
         </CORSConfiguration>"
    )
}

/// Overrides that disable CORS outright.
pub fn disable_cors(overrides: &mut ServerOverrides) {
    overrides.cors = Some(CorsSetting::Disabled);
}

#[cfg(test)]
mod test_bucket;
#[cfg(test)]
mod test_cors;
#[cfg(test)]
mod test_error;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_list;
#[cfg(test)]
mod test_multipart;
#[cfg(test)]
mod test_object;
#[cfg(test)]
mod test_website;
