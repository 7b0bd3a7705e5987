//! PASS, CAP, NICK, USER, and the welcome block that completes registration.

use slirc_proto::{Command, Message, NickExt, Prefix, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::logger;
use crate::server::{Server, VERSION};
use crate::state::ConnState;

use super::{broadcast_channel, Context};

pub async fn pass(ctx: &Context, password: &str) -> HandlerResult {
    match &ctx.server.password {
        Some(expected) if expected == password => {
            ctx.client.set_state(ConnState::Registration);
            Ok(())
        }
        _ => Err(HandlerError::PasswdMismatch),
    }
}

pub async fn cap(ctx: &Context, sub: &str, arg: Option<&str>) -> HandlerResult {
    match sub.to_ascii_uppercase().as_str() {
        "LS" => {
            ctx.client.set_awaiting_cap_end(true);
            send_raw(ctx, "CAP", "* LS :").await;
        }
        "REQ" => {
            ctx.client.set_awaiting_cap_end(true);
            let caps = arg.unwrap_or_default();
            send_raw(ctx, "CAP", &format!("* NAK :{caps}")).await;
        }
        "END" => {
            ctx.client.set_awaiting_cap_end(false);
            maybe_complete_registration(ctx).await;
        }
        _ => {}
    }
    Ok(())
}

/// `CAP` replies aren't numerics; build them as a raw command with the
/// server's own name as prefix, matching [`Message::to_wire`]'s framing.
async fn send_raw(ctx: &Context, command: &str, rest: &str) {
    let msg = Message {
        prefix: Some(Prefix::ServerName(ctx.server.name.clone())),
        command: Command::Raw(command.to_string(), vec![rest.to_string()]),
    };
    ctx.client.send(msg).await;
}

pub async fn nick(ctx: &Context, new_nick: &str) -> HandlerResult {
    if new_nick.is_empty() {
        return Err(HandlerError::ErroneousNickname(new_nick.to_string()));
    }
    if !new_nick.is_valid_nick() {
        return Err(HandlerError::ErroneousNickname(new_nick.to_string()));
    }

    let old_nick = ctx.client.nickname();
    let was_registered = ctx.client.is_registered();

    if !ctx.server.registry.claim_nick(&ctx.client, new_nick) {
        return Err(HandlerError::NicknameInUse(new_nick.to_string()));
    }

    if was_registered && old_nick != ctx.client.nickname() {
        let announce = Message {
            prefix: Some(Prefix::Nickname(
                old_nick.clone(),
                ctx.client.user(),
                ctx.client.display_host.clone(),
            )),
            command: Command::NICK(new_nick.to_string()),
        };
        ctx.client.send(announce.clone()).await;
        for chan in ctx.server.registry.channels_of(ctx.client.id) {
            broadcast_channel(&ctx.server, &chan, Some(ctx.client.id), &announce).await;
            if let Some(dir) = &ctx.server.channel_log_dir {
                logger::log_meta(
                    dir,
                    &slirc_proto::irc_to_lower(&chan.name),
                    &old_nick,
                    &format!("changed nick to {new_nick}"),
                );
            }
        }
    } else {
        maybe_complete_registration(ctx).await;
    }

    Ok(())
}

pub async fn user(ctx: &Context, username: &str, realname: &str) -> HandlerResult {
    ctx.client.set_user(username);
    ctx.client.set_realname(realname);
    maybe_complete_registration(ctx).await;
    Ok(())
}

/// Send the welcome block and flip to `Registered` once a nickname and user
/// are both set and the client isn't mid-`CAP` negotiation.
async fn maybe_complete_registration(ctx: &Context) {
    if ctx.client.is_registered() {
        return;
    }
    if !ctx.client.has_nickname() || ctx.client.user().is_empty() || ctx.client.awaiting_cap_end() {
        return;
    }

    let nick = ctx.client.nickname();
    let server = &ctx.server;

    ctx.reply(
        Response::RplWelcome,
        &[&nick, &format!("Welcome to the {} Network, {nick}", server.network)],
    )
    .await;
    ctx.reply(
        Response::RplYourHost,
        &[
            &nick,
            &format!("Your host is {}, running version {VERSION}", server.name),
        ],
    )
    .await;
    ctx.reply(
        Response::RplCreated,
        &[&nick, &format!("This server was created {}", server.created_at)],
    )
    .await;
    ctx.reply(Response::RplMyInfo, &[&nick, &server.name, VERSION, "o", "o"])
        .await;

    let count = server.registry.all_clients().len();
    ctx.reply(
        Response::RplLuserClient,
        &[
            &nick,
            &format!("There are {count} users and 0 services on 1 server"),
        ],
    )
    .await;

    super::query::send_motd(ctx).await;

    ctx.client.set_state(ConnState::Registered);
}
