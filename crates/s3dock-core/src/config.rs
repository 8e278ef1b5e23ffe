//! The server options record and its defaults merge.

use std::path::PathBuf;

/// How the server-wide CORS configuration is sourced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsSetting {
    /// No option given: the built-in wildcard configuration applies to
    /// buckets without their own rules.
    #[default]
    Wildcard,
    /// CORS disabled entirely; every preflight is denied.
    Disabled,
    /// A raw `CORSConfiguration` XML document, parsed at startup.
    Document(String),
}

/// The resolved options record held by a running server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Hostname used for virtual-host-style bucket resolution and binding.
    pub hostname: String,
    /// TCP port; 0 asks the OS for a free one.
    pub port: u16,
    /// Suppress log output entirely.
    pub silent: bool,
    /// Data root. `None` resolves to a fresh subdirectory of the OS temp
    /// directory at startup.
    pub directory: Option<PathBuf>,
    /// PEM private key; with `cert`, switches the listener to HTTPS.
    pub key: Option<Vec<u8>>,
    /// PEM certificate chain; with `key`, switches the listener to HTTPS.
    pub cert: Option<Vec<u8>>,
    /// Server-wide CORS behaviour for buckets without their own rules.
    pub cors: CorsSetting,
    /// Server-wide website index document; turns every bucket into a
    /// website.
    pub index_document: Option<String>,
    /// Server-wide website error document.
    pub error_document: Option<String>,
    /// On close, recursively empty the data root (the directory itself is
    /// preserved).
    pub remove_buckets_on_close: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_owned(),
            port: 4568,
            silent: false,
            directory: None,
            key: None,
            cert: None,
            cors: CorsSetting::default(),
            index_document: None,
            error_document: None,
            remove_buckets_on_close: false,
        }
    }
}

/// Caller-supplied overrides; unset fields inherit the defaults.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    /// Override for [`ServerOptions::hostname`].
    pub hostname: Option<String>,
    /// Override for [`ServerOptions::port`].
    pub port: Option<u16>,
    /// Override for [`ServerOptions::silent`].
    pub silent: Option<bool>,
    /// Override for [`ServerOptions::directory`].
    pub directory: Option<PathBuf>,
    /// Override for [`ServerOptions::key`].
    pub key: Option<Vec<u8>>,
    /// Override for [`ServerOptions::cert`].
    pub cert: Option<Vec<u8>>,
    /// Override for [`ServerOptions::cors`].
    pub cors: Option<CorsSetting>,
    /// Override for [`ServerOptions::index_document`].
    pub index_document: Option<String>,
    /// Override for [`ServerOptions::error_document`].
    pub error_document: Option<String>,
    /// Override for [`ServerOptions::remove_buckets_on_close`].
    pub remove_buckets_on_close: Option<bool>,
}

/// Merge overrides into defaults. Pure: no I/O, no environment reads.
#[must_use]
pub fn resolve_options(defaults: ServerOptions, overrides: ServerOverrides) -> ServerOptions {
    ServerOptions {
        hostname: overrides.hostname.unwrap_or(defaults.hostname),
        port: overrides.port.unwrap_or(defaults.port),
        silent: overrides.silent.unwrap_or(defaults.silent),
        directory: overrides.directory.or(defaults.directory),
        key: overrides.key.or(defaults.key),
        cert: overrides.cert.or(defaults.cert),
        cors: overrides.cors.unwrap_or(defaults.cors),
        index_document: overrides.index_document.or(defaults.index_document),
        error_document: overrides.error_document.or(defaults.error_document),
        remove_buckets_on_close: overrides
            .remove_buckets_on_close
            .unwrap_or(defaults.remove_buckets_on_close),
    }
}
