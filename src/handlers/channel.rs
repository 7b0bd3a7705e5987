//! JOIN, PART, TOPIC, MODE, NAMES, LIST.

use slirc_proto::{ChannelExt, Command, Message, Prefix, Response, MAX_LINE_LEN};

use crate::error::{ChannelError, HandlerError, HandlerResult};
use crate::logger;
use crate::persistence;
use crate::state::{Channel, ChannelState};

use super::{broadcast_channel, Context};

pub async fn join(ctx: &Context, chans_arg: &str, keys_arg: Option<&str>) -> HandlerResult {
    if chans_arg.is_empty() {
        return Err(HandlerError::NeedMoreParams);
    }

    if chans_arg == "0" {
        for chan in ctx.server.registry.channels_of(ctx.client.id) {
            part_one(ctx, &chan.name, None).await;
        }
        return Ok(());
    }

    let names: Vec<&str> = chans_arg.split(',').collect();
    let keys: Vec<Option<&str>> = match keys_arg {
        Some(k) => k.split(',').map(Some).collect(),
        None => Vec::new(),
    };

    for (i, name) in names.into_iter().enumerate() {
        let key = keys.get(i).copied().flatten();
        join_one(ctx, name, key).await;
    }
    Ok(())
}

async fn join_one(ctx: &Context, name: &str, key: Option<&str>) {
    if !name.is_channel_name() {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, name).await;
        return;
    }

    let initial_state = match &ctx.server.state_dir {
        Some(dir) => persistence::load(dir, &slirc_proto::irc_to_lower(name)),
        None => ChannelState::default(),
    };
    let chan = ctx.server.registry.get_or_create_channel(name, initial_state);

    if chan.is_member(ctx.client.id) {
        return;
    }

    if let Some(required) = chan.key() {
        if key != Some(required.as_str()) {
            ctx.send_channel_error(&ChannelError::BadChannelKey, name).await;
            return;
        }
    }

    chan.add_member(ctx.client.id);

    let announce = Message {
        prefix: Some(client_prefix(ctx)),
        command: Command::JOIN(chan.name.clone(), None),
    };
    broadcast_channel(&ctx.server, &chan, None, &announce).await;

    if let Some(dir) = &ctx.server.channel_log_dir {
        logger::log_meta(dir, &slirc_proto::irc_to_lower(name), &ctx.client.nickname(), "joined the channel");
    }

    send_topic(ctx, &chan).await;
    send_names(ctx, &chan).await;
}

pub async fn part(ctx: &Context, chans_arg: &str, reason: Option<&str>) -> HandlerResult {
    if chans_arg.is_empty() {
        return Err(HandlerError::NeedMoreParams);
    }
    for name in chans_arg.split(',') {
        part_one(ctx, name, reason).await;
    }
    Ok(())
}

async fn part_one(ctx: &Context, name: &str, reason: Option<&str>) {
    if !name.is_channel_name() {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, name).await;
        return;
    }
    let Some(chan) = ctx.server.registry.channel(name) else {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, name).await;
        return;
    };
    if !chan.is_member(ctx.client.id) {
        ctx.send_channel_error(&ChannelError::NotOnChannel, name).await;
        return;
    }

    let message = reason.unwrap_or(&ctx.client.nickname()).to_string();
    let announce = Message {
        prefix: Some(client_prefix(ctx)),
        command: Command::PART(chan.name.clone(), Some(message.clone())),
    };
    broadcast_channel(&ctx.server, &chan, None, &announce).await;

    if let Some(dir) = &ctx.server.channel_log_dir {
        logger::log_meta(
            dir,
            &slirc_proto::irc_to_lower(&chan.name),
            &ctx.client.nickname(),
            &format!("left the channel ({message})"),
        );
    }

    chan.remove_member(ctx.client.id);
    ctx.server.registry.remove_channel_if_empty(&chan.name);
}

pub async fn topic(ctx: &Context, name: &str, new_topic: Option<&str>) -> HandlerResult {
    if !name.is_channel_name() {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, name).await;
        return Ok(());
    }
    let Some(chan) = ctx.server.registry.channel(name) else {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, name).await;
        return Ok(());
    };

    match new_topic {
        None => {
            send_topic(ctx, &chan).await;
        }
        Some(text) => {
            if !chan.is_member(ctx.client.id) {
                ctx.send_channel_error(&ChannelError::NotOnChannel, name).await;
                return Ok(());
            }
            chan.set_topic(text.to_string());

            if let Some(dir) = &ctx.server.state_dir {
                persistence::save(dir, &slirc_proto::irc_to_lower(&chan.name), &chan.snapshot_state());
            }
            if let Some(dir) = &ctx.server.channel_log_dir {
                logger::log_meta(
                    dir,
                    &slirc_proto::irc_to_lower(&chan.name),
                    &ctx.client.nickname(),
                    &format!("set the topic to: {text}"),
                );
            }

            let announce = Message {
                prefix: Some(client_prefix(ctx)),
                command: Command::TOPIC(chan.name.clone(), Some(text.to_string())),
            };
            broadcast_channel(&ctx.server, &chan, None, &announce).await;
        }
    }
    Ok(())
}

pub async fn mode(
    ctx: &Context,
    target: &str,
    flag: Option<&str>,
    arg: Option<&str>,
) -> HandlerResult {
    if !target.is_channel_name() {
        if !slirc_proto::irc_eq(target, &ctx.client.nickname()) {
            ctx.send_channel_error(&ChannelError::NoSuchChannel, target).await;
            return Ok(());
        }
        if flag.is_some() {
            return Err(HandlerError::UModeUnknownFlag);
        }
        ctx.reply(Response::RplUModeIs, &[&ctx.client.nick_or_star(), "+"]).await;
        return Ok(());
    }

    let Some(chan) = ctx.server.registry.channel(target) else {
        ctx.send_channel_error(&ChannelError::NoSuchChannel, target).await;
        return Ok(());
    };

    let Some(flag) = flag else {
        let is_member = chan.is_member(ctx.client.id);
        match chan.key() {
            Some(key) if is_member => {
                ctx.reply(
                    Response::RplChannelModeIs,
                    &[&ctx.client.nick_or_star(), &chan.name, "+k", &key],
                )
                .await;
            }
            Some(_) => {
                ctx.reply(
                    Response::RplChannelModeIs,
                    &[&ctx.client.nick_or_star(), &chan.name, "+k"],
                )
                .await;
            }
            None => {
                ctx.reply(Response::RplChannelModeIs, &[&ctx.client.nick_or_star(), &chan.name, "+"])
                    .await;
            }
        }
        return Ok(());
    };

    if !chan.is_member(ctx.client.id) {
        ctx.send_channel_error(&ChannelError::NotOnChannel, target).await;
        return Ok(());
    }

    match flag {
        "+k" => {
            let Some(key) = arg else {
                return Err(HandlerError::NeedMoreParams);
            };
            chan.set_key(Some(key.to_string()));
            persist_and_announce_mode(ctx, &chan, "+k", Some(key)).await;
        }
        "-k" => {
            chan.set_key(None);
            persist_and_announce_mode(ctx, &chan, "-k", None).await;
        }
        _ => {
            ctx.send_channel_error(&ChannelError::UnknownMode, target).await;
        }
    }
    Ok(())
}

async fn persist_and_announce_mode(ctx: &Context, chan: &Channel, flag: &str, arg: Option<&str>) {
    if let Some(dir) = &ctx.server.state_dir {
        persistence::save(dir, &slirc_proto::irc_to_lower(&chan.name), &chan.snapshot_state());
    }
    if let Some(dir) = &ctx.server.channel_log_dir {
        let detail = match arg {
            Some(key) => format!("set mode {flag} {key}"),
            None => format!("set mode {flag}"),
        };
        logger::log_meta(dir, &slirc_proto::irc_to_lower(&chan.name), &ctx.client.nickname(), &detail);
    }

    let announce = Message {
        prefix: Some(client_prefix(ctx)),
        command: Command::MODE(chan.name.clone(), Some(flag.to_string()), arg.map(String::from)),
    };
    broadcast_channel(&ctx.server, chan, None, &announce).await;
}

pub async fn names(ctx: &Context, chans_arg: Option<&str>) -> HandlerResult {
    let targets: Vec<String> = match chans_arg {
        Some(arg) => arg.split(',').map(String::from).collect(),
        None => ctx
            .server
            .registry
            .channels_of(ctx.client.id)
            .iter()
            .map(|c| c.name.clone())
            .collect(),
    };

    for name in targets {
        if !name.is_channel_name() {
            ctx.send_channel_error(&ChannelError::NoSuchChannel, &name).await;
            continue;
        }
        match ctx.server.registry.channel(&name) {
            Some(chan) => send_names(ctx, &chan).await,
            None => ctx.send_channel_error(&ChannelError::NoSuchChannel, &name).await,
        }
    }
    Ok(())
}

pub async fn list(ctx: &Context, chans_arg: Option<&str>) -> HandlerResult {
    let mut channels = match chans_arg {
        Some(arg) => arg
            .split(',')
            .filter_map(|name| ctx.server.registry.channel(name))
            .collect::<Vec<_>>(),
        None => ctx.server.registry.all_channels(),
    };
    channels.sort_by(|a, b| a.name.cmp(&b.name));

    for chan in channels {
        ctx.reply(
            Response::RplList,
            &[
                &ctx.client.nick_or_star(),
                &chan.name,
                &chan.member_count().to_string(),
                &chan.topic(),
            ],
        )
        .await;
    }
    ctx.reply(Response::RplListEnd, &[&ctx.client.nick_or_star(), "End of LIST"]).await;
    Ok(())
}

async fn send_topic(ctx: &Context, chan: &Channel) {
    let topic = chan.topic();
    if topic.is_empty() {
        ctx.reply(Response::RplNoTopic, &[&ctx.client.nick_or_star(), &chan.name, "No topic is set"])
            .await;
    } else {
        ctx.reply(Response::RplTopic, &[&ctx.client.nick_or_star(), &chan.name, &topic])
            .await;
    }
}

/// Send one or more 353 lines (split so each stays within the wire limit)
/// followed by 366.
async fn send_names(ctx: &Context, chan: &Channel) {
    let nick = ctx.client.nick_or_star();
    let budget = MAX_LINE_LEN
        .saturating_sub(ctx.server.name.len() + nick.len() + chan.name.len())
        .saturating_sub(20);

    let mut line = String::new();
    let mut first = true;
    for id in chan.members.iter().map(|e| *e) {
        let Some(member) = ctx.server.registry.client(id) else {
            continue;
        };
        let member_nick = member.nickname();
        let addition = if first { member_nick.len() } else { member_nick.len() + 1 };
        if !line.is_empty() && line.len() + addition > budget {
            ctx.reply(Response::RplNamReply, &[&nick, "=", &chan.name, &line]).await;
            line.clear();
            first = true;
        }
        if !first {
            line.push(' ');
        }
        line.push_str(&member_nick);
        first = false;
    }
    if !line.is_empty() {
        ctx.reply(Response::RplNamReply, &[&nick, "=", &chan.name, &line]).await;
    }
    ctx.reply(Response::RplEndOfNames, &[&nick, &chan.name, "End of NAMES list"]).await;
}

fn client_prefix(ctx: &Context) -> Prefix {
    Prefix::Nickname(ctx.client.nickname(), ctx.client.user(), ctx.client.display_host.clone())
}
