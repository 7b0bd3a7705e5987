//! WHO, WHOIS, ISON, LUSERS, MOTD, PING.

use slirc_proto::{ChannelExt, Response};

use crate::error::{HandlerError, HandlerResult};

use super::Context;

pub async fn who(ctx: &Context, target: Option<&str>) -> HandlerResult {
    let Some(target) = target else {
        return Ok(());
    };
    if !target.is_channel_name() {
        return Ok(());
    }
    let Some(chan) = ctx.server.registry.channel(target) else {
        return Ok(());
    };

    let nick = ctx.client.nick_or_star();
    for id in chan.members.iter().map(|e| *e) {
        let Some(member) = ctx.server.registry.client(id) else {
            continue;
        };
        ctx.reply(
            Response::RplWhoReply,
            &[
                &nick,
                &chan.name,
                &member.user(),
                &member.display_host,
                &ctx.server.name,
                &member.nickname(),
                "H",
                &format!("0 {}", member.realname()),
            ],
        )
        .await;
    }
    ctx.reply(Response::RplEndOfWho, &[&nick, target, "End of WHO list"]).await;
    Ok(())
}

pub async fn whois(ctx: &Context, target: &str) -> HandlerResult {
    let nick = ctx.client.nick_or_star();
    let Some(member) = ctx.server.registry.client_by_nick(target) else {
        ctx.reply(Response::ErrNoSuchNick, &[&nick, target, "No such nick/channel"]).await;
        return Ok(());
    };

    ctx.reply(
        Response::RplWhoisUser,
        &[
            &nick,
            &member.nickname(),
            &member.user(),
            &member.display_host,
            "*",
            &member.realname(),
        ],
    )
    .await;
    ctx.reply(
        Response::RplWhoisServer,
        &[&nick, &member.nickname(), &ctx.server.name, &ctx.server.network],
    )
    .await;

    let channels = ctx.server.registry.channels_of(member.id);
    if !channels.is_empty() {
        let names = channels
            .iter()
            .map(|c| c.name.clone())
            .collect::<Vec<_>>()
            .join(" ");
        ctx.reply(Response::RplWhoisChannels, &[&nick, &member.nickname(), &format!("{names} ")])
            .await;
    }

    ctx.reply(Response::RplEndOfWhois, &[&nick, &member.nickname(), "End of WHOIS list"])
        .await;
    Ok(())
}

pub async fn ison(ctx: &Context, nicks: &[String]) -> HandlerResult {
    if nicks.is_empty() {
        return Err(HandlerError::NeedMoreParams);
    }
    let online: Vec<String> = nicks
        .iter()
        .filter(|n| ctx.server.registry.nick_in_use(n))
        .cloned()
        .collect();
    ctx.reply(Response::RplIson, &[&ctx.client.nick_or_star(), &online.join(" ")]).await;
    Ok(())
}

pub async fn lusers(ctx: &Context) -> HandlerResult {
    let count = ctx.server.registry.all_clients().len();
    ctx.reply(
        Response::RplLuserClient,
        &[
            &ctx.client.nick_or_star(),
            &format!("There are {count} users and 0 services on 1 server"),
        ],
    )
    .await;
    Ok(())
}

pub async fn motd(ctx: &Context) -> HandlerResult {
    send_motd(ctx).await;
    Ok(())
}

pub(crate) async fn send_motd(ctx: &Context) {
    let nick = ctx.client.nick_or_star();
    if ctx.server.motd_lines.is_empty() {
        ctx.reply(Response::ErrNoMotd, &[&nick, "MOTD File is missing"]).await;
        return;
    }
    ctx.reply(Response::RplMotdStart, &[&nick, &format!("- {} Message of the day -", ctx.server.name)])
        .await;
    for line in &ctx.server.motd_lines {
        ctx.reply(Response::RplMotd, &[&nick, &format!("- {line}")]).await;
    }
    ctx.reply(Response::RplEndOfMotd, &[&nick, "End of MOTD command"]).await;
}

pub async fn ping(ctx: &Context, origin: Option<&str>) -> HandlerResult {
    let Some(origin) = origin else {
        return Err(HandlerError::NoOrigin);
    };
    let msg = slirc_proto::Message {
        prefix: Some(slirc_proto::Prefix::ServerName(ctx.server.name.clone())),
        command: slirc_proto::Command::PONG(Some(origin.to_string())),
    };
    ctx.client.send(msg).await;
    Ok(())
}
