//! Per-connection task: the read/dispatch loop, outgoing relay, and the
//! disconnect broadcast.
//!
//! Each connection owns exactly one socket half pair and one end of its own
//! outgoing channel; the `tokio::select!` loop below is this connection's
//! entire write path, so no lock is ever needed to serialize writes onto
//! the wire.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_rustls::server::TlsStream;
use tokio_util::codec::Decoder;
use tracing::{debug, info, instrument, warn};

use slirc_proto::{Command, LineCodec, Message, Prefix};

use crate::handlers::{self, Context as HandlerContext};
use crate::server::Server;
use crate::state::{Client, ConnState};

const READ_CHUNK: usize = 1024;

/// Either a plain or TLS-wrapped socket, unified behind `AsyncRead`/
/// `AsyncWrite` so the rest of this module never needs to be generic over
/// transport.
pub enum Stream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl AsyncRead for Stream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut TaskContext<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Stream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut TaskContext<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_flush(cx),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Stream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Stream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

/// Drive one accepted connection end to end: registration, the dispatch
/// loop, and the disconnect broadcast. Never returns an error; all failure
/// modes resolve to a synthetic QUIT reason and a clean teardown.
#[instrument(skip(stream, server), fields(%addr))]
pub async fn run(stream: Stream, addr: SocketAddr, server: Arc<Server>) {
    let id = server.registry.next_id();
    let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<Message>(64);
    let (kill_tx, mut kill_rx) = mpsc::channel::<String>(1);

    let display_host = server.cloak.clone().unwrap_or_else(|| addr.ip().to_string());
    let initial_state = if server.requires_password() {
        ConnState::PasswordPending
    } else {
        ConnState::Registration
    };
    let client = Arc::new(Client::new(id, addr, display_host, outgoing_tx, kill_tx, initial_state));
    server.registry.insert_client(Arc::clone(&client));
    info!(id, %addr, "connection accepted");

    let ctx = HandlerContext {
        client: Arc::clone(&client),
        server: Arc::clone(&server),
    };

    let (mut read_half, mut write_half) = tokio::io::split(stream);
    let mut codec = LineCodec::default();
    let mut buf = BytesMut::with_capacity(READ_CHUNK);
    let mut read_chunk = [0u8; READ_CHUNK];

    let quit_reason = 'driver: loop {
        tokio::select! {
            biased;

            reason = kill_rx.recv() => {
                break 'driver reason.unwrap_or_else(|| "Killed".to_string());
            }

            outgoing = outgoing_rx.recv() => {
                match outgoing {
                    Some(msg) => {
                        if write_half.write_all(msg.to_wire().as_bytes()).await.is_err() {
                            break 'driver "Write error".to_string();
                        }
                    }
                    None => break 'driver "Connection closed".to_string(),
                }
            }

            n = read_half.read(&mut read_chunk) => {
                match n {
                    Ok(0) => break 'driver "Connection closed".to_string(),
                    Ok(n) => {
                        buf.extend_from_slice(&read_chunk[..n]);
                        let quit = 'lines: loop {
                            match codec.decode(&mut buf) {
                                Ok(Some(line)) => {
                                    if line.is_empty() {
                                        continue 'lines;
                                    }
                                    client.touch();
                                    if let Some(reason) = handlers::dispatch(&ctx, &line).await {
                                        break 'lines Some(reason);
                                    }
                                }
                                Ok(None) => break 'lines None,
                                Err(e) => {
                                    warn!(id, error = %e, "protocol error, disconnecting");
                                    break 'lines Some("Protocol error".to_string());
                                }
                            }
                        };
                        if let Some(reason) = quit {
                            break 'driver reason;
                        }
                    }
                    Err(e) => {
                        debug!(id, error = %e, "read error");
                        break 'driver "Read error".to_string();
                    }
                }
            }
        }
    };

    // Flush anything already queued (e.g. the error reply that prompted a
    // client-initiated QUIT) before sending the synthetic farewell.
    outgoing_rx.close();
    while let Ok(msg) = outgoing_rx.try_recv() {
        let _ = write_half.write_all(msg.to_wire().as_bytes()).await;
    }

    let farewell = Message {
        prefix: Some(Prefix::Nickname(
            client.nickname(),
            client.user(),
            client.display_host.clone(),
        )),
        command: Command::QUIT(Some(quit_reason.clone())),
    };
    let _ = write_half.write_all(farewell.to_wire().as_bytes()).await;
    let _ = write_half.shutdown().await;

    // Broadcast before removing membership, so the recipient set is computed
    // from the channels the client was actually still in.
    let left_channels = server.registry.channels_of(id);
    for chan in &left_channels {
        handlers::broadcast_channel(&server, chan, Some(id), &farewell).await;
        if let Some(dir) = &server.channel_log_dir {
            crate::logger::log_meta(
                dir,
                &slirc_proto::irc_to_lower(&chan.name),
                &client.nick_or_star(),
                &format!("quit ({quit_reason})"),
            );
        }
    }
    server.registry.remove_client(id);

    info!(id, %addr, reason = %quit_reason, "connection closed");
}
