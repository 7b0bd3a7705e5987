//! Accept loops: one per configured listener, each spawning a connection
//! task per accepted socket.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{error, info, instrument};

use crate::network::connection::{self, Stream};
use crate::server::Server;

/// Accept plain-TCP connections on `address` forever, spawning a
/// [`connection::run`] task for each.
#[instrument(skip(server))]
pub async fn run_plain(address: String, server: Arc<Server>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "listening (plain)");

    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                let server = Arc::clone(&server);
                tokio::spawn(async move {
                    connection::run(Stream::Plain(socket), addr, server).await;
                });
            }
            Err(e) => error!(error = %e, "accept failed"),
        }
    }
}

/// Accept TLS connections on `address` forever, wrapping each socket with
/// `acceptor` before handing it to [`connection::run`].
#[instrument(skip(server, acceptor))]
pub async fn run_tls(address: String, acceptor: TlsAcceptor, server: Arc<Server>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&address).await?;
    info!(%address, "listening (tls)");

    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                let server = Arc::clone(&server);
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    match acceptor.accept(socket).await {
                        Ok(tls_stream) => {
                            connection::run(Stream::Tls(Box::new(tls_stream)), addr, server).await;
                        }
                        Err(e) => error!(%addr, error = %e, "tls handshake failed"),
                    }
                });
            }
            Err(e) => error!(error = %e, "accept failed"),
        }
    }
}
