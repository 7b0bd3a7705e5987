//! TLS acceptor construction for the optional `[tls]` listener.
//!
//! Certificate and key are loaded once at startup; the accept path wraps
//! each newly-accepted socket with a server-side TLS session before any
//! bytes are read.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context as _;
use rustls_pemfile::{certs, pkcs8_private_keys};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Build a `TlsAcceptor` from a PEM certificate chain and PKCS#8 private key.
pub fn build_acceptor(cert_path: &str, key_path: &str) -> anyhow::Result<TlsAcceptor> {
    let cert_data =
        std::fs::read(cert_path).with_context(|| format!("reading tls.cert_path {cert_path}"))?;
    let cert_chain: Vec<CertificateDer<'static>> = certs(&mut Cursor::new(&cert_data))
        .collect::<Result<_, _>>()
        .with_context(|| format!("parsing certificates in {cert_path}"))?;
    if cert_chain.is_empty() {
        anyhow::bail!("no certificates found in {cert_path}");
    }

    let key_data =
        std::fs::read(key_path).with_context(|| format!("reading tls.key_path {key_path}"))?;
    let key = pkcs8_private_keys(&mut Cursor::new(&key_data))
        .next()
        .ok_or_else(|| anyhow::anyhow!("no PKCS#8 private key found in {key_path}"))?
        .map(PrivateKeyDer::Pkcs8)
        .with_context(|| format!("invalid private key in {key_path}"))?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .context("building TLS server config")?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}
