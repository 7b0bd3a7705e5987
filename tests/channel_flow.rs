//! Integration tests for JOIN/TOPIC/NAMES/PRIVMSG and the no-self-echo rule.

mod common;

use common::TestServer;
use slirc_proto::Command;

#[tokio::test]
async fn join_announces_topic_and_names_to_joiner() {
    let server = TestServer::spawn(17011).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    alice.register().await.expect("registration failed");
    alice.drain().await;

    alice.join("#test").await.expect("join failed");

    let messages = alice
        .recv_until(|msg| matches!(&msg.command, Command::Reply(366, _)))
        .await
        .expect("names reply never arrived");

    assert!(messages.iter().any(|m| matches!(&m.command, Command::JOIN(chan, _) if chan == "#test")));
    assert!(messages.iter().any(|m| matches!(&m.command, Command::Reply(331, _) | Command::Reply(332, _))));
    assert!(messages.iter().any(|m| matches!(&m.command, Command::Reply(353, _))));
}

#[tokio::test]
async fn channel_privmsg_fans_out_without_self_echo() {
    let server = TestServer::spawn(17012).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    let mut bob = server.connect("bob").await.expect("failed to connect");
    alice.register().await.expect("alice registration failed");
    bob.register().await.expect("bob registration failed");
    alice.drain().await;
    bob.drain().await;

    alice.join("#test").await.expect("alice join failed");
    alice.drain().await;
    bob.join("#test").await.expect("bob join failed");
    bob.drain().await;

    alice.privmsg("#test", "hello from alice").await.expect("privmsg failed");

    let messages = bob
        .recv_until(|msg| matches!(&msg.command, Command::PRIVMSG(target, text) if target == "#test" && text.contains("hello")))
        .await
        .expect("bob never received the channel message");
    assert!(messages.iter().any(|m| matches!(&m.command, Command::PRIVMSG(t, text) if t == "#test" && text == "hello from alice")));

    // Alice must not see her own PRIVMSG echoed back.
    let echoed = alice.recv_timeout(std::time::Duration::from_millis(200)).await;
    assert!(echoed.is_err(), "alice should not receive her own channel message back");
}

#[tokio::test]
async fn part_removes_membership_and_announces() {
    let server = TestServer::spawn(17013).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    let mut bob = server.connect("bob").await.expect("failed to connect");
    alice.register().await.expect("alice registration failed");
    bob.register().await.expect("bob registration failed");
    alice.drain().await;
    bob.drain().await;

    alice.join("#test").await.expect("alice join failed");
    alice.drain().await;
    bob.join("#test").await.expect("bob join failed");
    bob.drain().await;

    alice.part("#test", Some("bye")).await.expect("part failed");

    let messages = bob
        .recv_until(|msg| matches!(&msg.command, Command::PART(chan, _) if chan == "#test"))
        .await
        .expect("bob never saw the PART");
    assert!(messages.iter().any(|m| matches!(&m.command, Command::PART(chan, reason) if chan == "#test" && reason.as_deref() == Some("bye"))));
}

#[tokio::test]
async fn join_and_privmsg_match_literal_wire_bytes() {
    let server = TestServer::spawn(17015).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    let mut bob = server.connect("bob").await.expect("failed to connect");
    alice.register().await.expect("alice registration failed");
    bob.register().await.expect("bob registration failed");
    alice.drain().await;
    bob.drain().await;

    alice.join("#room").await.expect("join failed");
    let join_echo = alice.recv_raw().await.expect("no JOIN echo");
    assert!(join_echo.starts_with(":alice!alice@") && join_echo.ends_with(" JOIN #room"));

    let topic_line = alice.recv_raw().await.expect("no topic reply");
    assert!(topic_line.ends_with("331 alice #room :No topic is set"));

    let names_line = alice.recv_raw().await.expect("no names reply");
    assert!(names_line.ends_with("353 alice = #room :alice"));

    let end_names_line = alice.recv_raw().await.expect("no end-of-names reply");
    assert!(end_names_line.ends_with("366 alice #room :End of NAMES list"));

    bob.join("#room").await.expect("bob join failed");
    bob.drain().await;
    alice.drain().await;

    alice.privmsg("#room", "hi").await.expect("privmsg failed");
    let relayed = bob.recv_raw().await.expect("no relayed PRIVMSG");
    assert!(relayed.starts_with(":alice!alice@") && relayed.ends_with(" PRIVMSG #room :hi"));
}

#[tokio::test]
async fn mode_on_another_nickname_is_rejected() {
    let server = TestServer::spawn(17016).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    let mut bob = server.connect("bob").await.expect("failed to connect");
    alice.register().await.expect("alice registration failed");
    bob.register().await.expect("bob registration failed");
    alice.drain().await;
    bob.drain().await;

    alice.send_raw("MODE bob").await.expect("send failed");
    let messages = alice
        .recv_until(|msg| matches!(&msg.command, Command::Reply(403, _)))
        .await
        .expect("alice never received ERR_NOSUCHCHANNEL");
    assert!(messages.iter().any(|m| matches!(&m.command, Command::Reply(403, _))));
}

#[tokio::test]
async fn keyed_channel_rejects_wrong_key() {
    let server = TestServer::spawn(17014).await.expect("failed to spawn test server");
    let mut alice = server.connect("alice").await.expect("failed to connect");
    alice.register().await.expect("alice registration failed");
    alice.drain().await;

    alice.join("#locked").await.expect("join failed");
    alice.drain().await;
    alice.send_raw("MODE #locked +k hunter2").await.expect("send failed");
    alice.drain().await;

    let mut bob = server.connect("bob").await.expect("failed to connect");
    bob.register().await.expect("bob registration failed");
    bob.drain().await;

    bob.join("#locked").await.expect("join failed");
    let messages = bob
        .recv_until(|msg| matches!(&msg.command, Command::Reply(475, _)))
        .await
        .expect("bob never received ERR_BADCHANNELKEY");
    assert!(messages.iter().any(|m| matches!(&m.command, Command::Reply(475, _))));

    bob.join_keyed("#locked", "hunter2").await.expect("keyed join failed");
    let messages = bob
        .recv_until(|msg| matches!(&msg.command, Command::Reply(366, _)))
        .await
        .expect("bob never joined with the correct key");
    assert!(messages.iter().any(|m| matches!(&m.command, Command::JOIN(chan, _) if chan == "#locked")));
}
