//! Test IRC client: a thin wrapper over a raw `TcpStream` that sends
//! `Command`s and parses replies back into `Message`s.

#![allow(dead_code)]

use std::time::Duration;

use slirc_proto::{Command, Message};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    nick: String,
}

impl TestClient {
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
            nick: nick.to_string(),
        })
    }

    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_raw(&Message::from(cmd).to_string()).await
    }

    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let line = self.recv_raw_timeout(dur).await?;
        line.parse::<Message>().map_err(|e| anyhow::anyhow!("parse error: {e}"))
    }

    /// Read one line and return it verbatim (minus the trailing CRLF), for
    /// asserting on the exact bytes put on the wire rather than on a
    /// re-parsed `Message`.
    pub async fn recv_raw(&mut self) -> anyhow::Result<String> {
        self.recv_raw_timeout(Duration::from_secs(5)).await
    }

    pub async fn recv_raw_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end().to_string())
    }

    /// Read messages until `predicate` matches one, returning everything
    /// read so far (including the match).
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Drain and discard whatever is already buffered, without blocking.
    pub async fn drain(&mut self) {
        while self.recv_timeout(Duration::from_millis(20)).await.is_ok() {}
    }

    /// Register with NICK + USER and wait for RPL_WELCOME (001).
    pub async fn register(&mut self) -> anyhow::Result<()> {
        let nick = self.nick.clone();
        self.send(Command::NICK(nick.clone())).await?;
        self.send(Command::USER(
            nick,
            "0".to_string(),
            "*".to_string(),
            "Test User".to_string(),
        ))
        .await?;

        let messages = self
            .recv_until(|msg| matches!(&msg.command, Command::Reply(code, _) if *code == 1))
            .await?;
        if messages
            .iter()
            .any(|msg| matches!(&msg.command, Command::Reply(code, _) if *code == 1))
        {
            Ok(())
        } else {
            anyhow::bail!("registration failed: no RPL_WELCOME received")
        }
    }

    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send(Command::JOIN(channel.to_string(), None)).await
    }

    pub async fn join_keyed(&mut self, channel: &str, key: &str) -> anyhow::Result<()> {
        self.send(Command::JOIN(channel.to_string(), Some(key.to_string()))).await
    }

    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send(Command::PRIVMSG(target.to_string(), text.to_string())).await
    }

    pub async fn part(&mut self, channel: &str, reason: Option<&str>) -> anyhow::Result<()> {
        self.send(Command::PART(channel.to_string(), reason.map(str::to_string))).await
    }

    pub async fn topic(&mut self, channel: &str, topic: &str) -> anyhow::Result<()> {
        self.send(Command::TOPIC(channel.to_string(), Some(topic.to_string()))).await
    }

    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        self.send(Command::QUIT(reason.map(str::to_string))).await
    }
}
