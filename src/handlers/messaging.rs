//! PRIVMSG, NOTICE, WALLOPS.

use slirc_proto::{ChannelExt, Command, Message, Prefix, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::logger;

use super::{broadcast_all, broadcast_channel, Context};

pub async fn privmsg(ctx: &Context, target: &str, text: &str) -> HandlerResult {
    relay(ctx, target, text, false).await
}

pub async fn notice(ctx: &Context, target: &str, text: &str) -> HandlerResult {
    relay(ctx, target, text, true).await
}

async fn relay(ctx: &Context, target: &str, text: &str, is_notice: bool) -> HandlerResult {
    if target.is_empty() {
        return Err(HandlerError::NoRecipient);
    }
    if text.is_empty() {
        return Err(HandlerError::NoTextToSend);
    }

    let prefix = Prefix::Nickname(ctx.client.nickname(), ctx.client.user(), ctx.client.display_host.clone());
    let command = if is_notice {
        Command::NOTICE(target.to_string(), text.to_string())
    } else {
        Command::PRIVMSG(target.to_string(), text.to_string())
    };
    let msg = Message {
        prefix: Some(prefix),
        command,
    };

    if target.is_channel_name() {
        let Some(chan) = ctx.server.registry.channel(target) else {
            ctx.reply(Response::ErrNoSuchNick, &[&ctx.client.nick_or_star(), target, "No such nick/channel"])
                .await;
            return Ok(());
        };
        broadcast_channel(&ctx.server, &chan, Some(ctx.client.id), &msg).await;
        if let Some(dir) = &ctx.server.channel_log_dir {
            logger::log_speech(dir, &slirc_proto::irc_to_lower(target), &ctx.client.nickname(), text);
        }
        return Ok(());
    }

    match ctx.server.registry.client_by_nick(target) {
        Some(recipient) => {
            recipient.send(msg).await;
            Ok(())
        }
        None => {
            ctx.reply(Response::ErrNoSuchNick, &[&ctx.client.nick_or_star(), target, "No such nick/channel"])
                .await;
            Ok(())
        }
    }
}

pub async fn wallops(ctx: &Context, text: &str) -> HandlerResult {
    if text.is_empty() {
        return Err(HandlerError::NoTextToSend);
    }
    let msg = Message {
        prefix: Some(Prefix::ServerName(ctx.server.name.clone())),
        command: Command::NOTICE("*".to_string(), format!("Global notice: {text}")),
    };
    broadcast_all(&ctx.server, None, &msg).await;
    Ok(())
}
