//! Command dispatch.
//!
//! Each connection task calls [`dispatch`] once per complete line. Dispatch
//! never propagates an error back to the caller: every [`HandlerError`] is
//! converted to a numeric reply (or silently dropped, per
//! [`HandlerError::to_irc_reply`]) before returning. The sole exception is
//! `QUIT`, signaled by returning `Some(reason)` so the connection task can
//! run the disconnect broadcast and close the socket.

mod channel;
mod connection;
mod messaging;
mod query;

use std::sync::Arc;

use slirc_proto::{Command, Message, Response};

use crate::error::{ChannelError, HandlerError};
use crate::server::Server;
use crate::state::{Channel, Client, ConnState};

/// Everything a single command invocation needs.
pub struct Context {
    pub client: Arc<Client>,
    pub server: Arc<Server>,
}

impl Context {
    pub async fn reply(&self, response: Response, args: &[&str]) {
        let msg = Message::reply(&self.server.name, response, args);
        self.client.send(msg).await;
    }

    pub async fn send_error(&self, err: &HandlerError, cmd_name: &str) {
        if let Some(reply) = err.to_irc_reply(&self.server.name, &self.client.nick_or_star(), cmd_name) {
            self.client.send(reply).await;
        }
    }

    pub async fn send_channel_error(&self, err: &ChannelError, channel: &str) {
        let reply = err.to_irc_reply(&self.server.name, &self.client.nick_or_star(), channel);
        self.client.send(reply).await;
    }
}

/// Deliver `msg` to every member of `channel` except `exclude` (if any).
pub(crate) async fn broadcast_channel(
    server: &Server,
    channel: &Channel,
    exclude: Option<u64>,
    msg: &Message,
) {
    for id in channel.members.iter().map(|e| *e) {
        if Some(id) == exclude {
            continue;
        }
        if let Some(client) = server.registry.client(id) {
            client.send(msg.clone()).await;
        }
    }
}

/// Deliver `msg` to every connected client except `exclude` (if any).
pub(crate) async fn broadcast_all(server: &Server, exclude: Option<u64>, msg: &Message) {
    for client in server.registry.all_clients() {
        if Some(client.id) == exclude {
            continue;
        }
        client.send(msg.clone()).await;
    }
}

/// Dispatch one complete line from the client. Returns `Some(reason)` when
/// the connection should be torn down (a QUIT was received).
pub async fn dispatch(ctx: &Context, line: &str) -> Option<String> {
    let cmd_name = line
        .split(' ')
        .next()
        .unwrap_or("")
        .trim_start_matches(':')
        .to_ascii_uppercase();

    let msg: Message = match line.parse() {
        Ok(msg) => msg,
        Err(_) => {
            ctx.send_error(&HandlerError::NeedMoreParams, &cmd_name).await;
            return None;
        }
    };

    // Gate commands by connection state before calling a handler, matching
    // the state machine in which each phase only accepts a fixed subset;
    // anything else is silently ignored (no numeric for this in this
    // server's reply set).
    let state = ctx.client.state();
    let allowed = match state {
        ConnState::PasswordPending => {
            matches!(msg.command, Command::PASS(_) | Command::CAP(_, _) | Command::QUIT(_))
        }
        ConnState::Registration => matches!(
            msg.command,
            Command::NICK(_) | Command::USER(_, _, _, _) | Command::CAP(_, _) | Command::QUIT(_)
        ),
        ConnState::Registered => true,
    };
    if !allowed {
        if state == ConnState::Registered {
            ctx.reply(Response::ErrUnknownCommand, &[&ctx.client.nick_or_star(), &cmd_name, "Unknown command"])
                .await;
        }
        return None;
    }

    let result = match msg.command {
        Command::PASS(ref password) => connection::pass(ctx, password).await,
        Command::CAP(ref sub, ref arg) => connection::cap(ctx, sub, arg.as_deref()).await,
        Command::NICK(ref nick) => connection::nick(ctx, nick).await,
        Command::USER(ref user, _, _, ref realname) => connection::user(ctx, user, realname).await,
        Command::QUIT(ref reason) => Err(HandlerError::Quit(reason.clone())),
        Command::JOIN(ref chans, ref keys) => channel::join(ctx, chans, keys.as_deref()).await,
        Command::PART(ref chans, ref reason) => channel::part(ctx, chans, reason.as_deref()).await,
        Command::TOPIC(ref chan, ref topic) => channel::topic(ctx, chan, topic.as_deref()).await,
        Command::MODE(ref target, ref flag, ref arg) => {
            channel::mode(ctx, target, flag.as_deref(), arg.as_deref()).await
        }
        Command::NAMES(ref chans) => channel::names(ctx, chans.as_deref()).await,
        Command::LIST(ref chans) => channel::list(ctx, chans.as_deref()).await,
        Command::PRIVMSG(ref target, ref text) => messaging::privmsg(ctx, target, text).await,
        Command::NOTICE(ref target, ref text) => messaging::notice(ctx, target, text).await,
        Command::WALLOPS(ref text) => messaging::wallops(ctx, text).await,
        Command::WHO(ref target) => query::who(ctx, target.as_deref()).await,
        Command::WHOIS(ref nick) => query::whois(ctx, nick).await,
        Command::ISON(ref nicks) => query::ison(ctx, nicks).await,
        Command::LUSERS => query::lusers(ctx).await,
        Command::MOTD => query::motd(ctx).await,
        Command::PING(ref origin) => query::ping(ctx, origin.as_deref()).await,
        Command::PONG(_) => Ok(()),
        Command::AWAY(_) => Ok(()),
        Command::Raw(_, _) | Command::Reply(_, _) => {
            ctx.reply(
                Response::ErrUnknownCommand,
                &[&ctx.client.nick_or_star(), &cmd_name, "Unknown command"],
            )
            .await;
            Ok(())
        }
    };

    match result {
        Ok(()) => None,
        Err(HandlerError::Quit(reason)) => Some(reason.unwrap_or_else(|| ctx.client.nickname())),
        Err(err) => {
            ctx.send_error(&err, &cmd_name).await;
            None
        }
    }
}
