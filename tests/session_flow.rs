//! Connection lifecycle: registration, nick handling, teardown.

mod common;

use common::{TestClient, TestServer};

#[tokio::test]
async fn registration_sends_the_motd() {
    let server = TestServer::start().await;
    let mut c = TestClient::connect(server.addr).await;

    c.send("NICK alice").await;
    c.send("USER alice host server :Alice A.").await;

    assert_eq!(
        c.recv().await,
        ":lark.test 375 :- lark.test Message of the day - "
    );
    assert_eq!(c.recv().await, ":lark.test 372 :- welcome to the test net");
    assert_eq!(c.recv().await, ":lark.test 376 :End of /MOTD command");
}

#[tokio::test]
async fn commands_are_gated_until_registration() {
    let server = TestServer::start().await;
    let mut c = TestClient::connect(server.addr).await;

    c.send("JOIN #rust").await;
    assert_eq!(c.recv().await, ":lark.test 451 :You have not registered");

    c.send("LIST").await;
    assert_eq!(c.recv().await, ":lark.test 451 :You have not registered");
}

#[tokio::test]
async fn duplicate_nick_is_rejected() {
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(server.addr).await;
    alice.register("alice").await;

    let mut intruder = TestClient::connect(server.addr).await;
    intruder.send("NICK Alice").await;
    assert_eq!(
        intruder.recv().await,
        ":lark.test 433 Alice :Nickname is already in use"
    );
}

#[tokio::test]
async fn malformed_lines_get_421() {
    let server = TestServer::start().await;
    let mut c = TestClient::connect(server.addr).await;
    c.register("alice").await;

    c.send(":loneprefix").await;
    assert_eq!(c.recv().await, ":lark.test 421 :No Command Specified");

    c.send("BOGUS stuff").await;
    assert_eq!(c.recv().await, ":lark.test 421 BOGUS :Unknown Command");
}

#[tokio::test]
async fn lines_split_across_writes_are_reassembled() {
    let server = TestServer::start().await;
    let mut c = TestClient::connect(server.addr).await;

    c.send_raw("NICK al").await;
    c.send_raw("ice\r\nUSER alice h s ").await;
    c.send_raw(":Alice A.\r\n").await;
    let lines = c.recv_until(" 376 ").await;
    assert!(lines[0].contains(" 375 "));
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    let server = TestServer::start().await;
    let mut c = TestClient::connect(server.addr).await;
    c.register("alice").await;

    c.send_raw("\r\n\r\n\n").await;
    c.assert_silent().await;
}

#[tokio::test]
async fn quit_closes_the_connection_and_frees_the_nick() {
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(server.addr).await;
    alice.register("alice").await;

    alice.send("QUIT :off to bed").await;
    alice.expect_closed().await;

    // The nick is reusable immediately.
    let mut next = TestClient::connect(server.addr).await;
    next.register("alice").await;
}

#[tokio::test]
async fn connections_beyond_the_client_cap_are_dropped() {
    let server = TestServer::start_with(|c| c.limits.max_clients = 1).await;
    let mut first = TestClient::connect(server.addr).await;
    first.register("alice").await;

    let mut second = TestClient::connect(server.addr).await;
    second.expect_closed().await;
}
