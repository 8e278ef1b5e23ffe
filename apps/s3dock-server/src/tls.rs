//! TLS material loading: PEM bytes in, an acceptor out.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::TlsAcceptor;

/// Build an acceptor from PEM-encoded certificate chain and private key.
///
/// The key may be PKCS#8, RSA, or SEC1; the certificate value may carry a
/// whole chain.
///
/// # Errors
///
/// Fails when either input cannot be parsed or rustls rejects the pair.
pub fn acceptor_from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<TlsAcceptor> {
    let certs = parse_certs(cert_pem)?;
    if certs.is_empty() {
        bail!("no certificates found in PEM input");
    }
    let key = parse_key(key_pem)?;

    let config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .context("certificate/key pair rejected")?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn parse_certs(pem: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = std::io::Cursor::new(pem);
    rustls_pemfile::certs(&mut reader)
        .collect::<std::io::Result<Vec<_>>>()
        .context("failed to parse certificate PEM")
}

fn parse_key(pem: &[u8]) -> Result<PrivateKeyDer<'static>> {
    let mut reader = std::io::Cursor::new(pem);
    rustls_pemfile::private_key(&mut reader)
        .context("failed to parse private key PEM")?
        .context("no private key found in PEM input")
}
