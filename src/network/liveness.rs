//! Background sweep that pings idle clients and disconnects unresponsive
//! ones.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::server::Server;

/// Run forever, waking up every `sweep_interval_secs` to scan connected
/// clients. Registered clients past `ping_threshold_secs` with no ping
/// outstanding are sent a `PING`; anyone (registered or not) past
/// `timeout_secs` is disconnected.
pub async fn run(server: Arc<Server>) {
    let interval = Duration::from_secs(server.liveness.sweep_interval_secs.max(1));
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        sweep(&server).await;
    }
}

async fn sweep(server: &Server) {
    let timeout_secs = server.liveness.timeout_secs as i64;
    let ping_threshold_secs = server.liveness.ping_threshold_secs as i64;

    for client in server.registry.all_clients() {
        let idle = client.idle_secs();
        if idle > timeout_secs {
            info!(id = client.id, idle, "liveness: ping timeout");
            client.kill("ping timeout".to_string()).await;
            continue;
        }
        if idle > ping_threshold_secs {
            if !client.is_registered() {
                info!(id = client.id, idle, "liveness: unregistered client idle past threshold");
                client.kill("ping timeout".to_string()).await;
                continue;
            }
            if !client.ping_sent() {
                let ping = slirc_proto::Message {
                    prefix: Some(slirc_proto::Prefix::ServerName(server.name.clone())),
                    command: slirc_proto::Command::PING(Some(server.name.clone())),
                };
                client.send(ping).await;
                client.set_ping_sent(true);
            }
        }
    }
}
