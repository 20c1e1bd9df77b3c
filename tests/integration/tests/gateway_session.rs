//! Gateway sessions against a scripted mock gateway

use chat_audit_gateway::SessionEnd;
use integration_tests::*;

fn setup() -> Vec<Step> {
    vec![
        Step::Expect(2),
        Step::dispatch("READY", 1, ready_payload()),
        Step::dispatch("GUILD_CREATE", 2, guild_create_payload()),
    ]
}

#[tokio::test]
async fn test_identify_carries_token_and_intents() {
    let mut script = setup();
    script.push(Step::reconnect());
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();

    let end = gateway.client(&logs).run().await.unwrap();
    assert!(matches!(end, SessionEnd::ReconnectRequested));

    let received = gateway.finish().await.unwrap();
    let identify = received.iter().find(|frame| frame["op"] == 2).unwrap();
    assert_eq!(identify["d"]["token"], TEST_TOKEN);
    assert!(identify["d"]["intents"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_guild_message_delete_and_edit_are_logged() {
    let mut script = setup();
    script.extend([
        Step::dispatch(
            "MESSAGE_CREATE",
            3,
            message_create_payload(42, user_payload(ALICE_ID, "alice", "0001"), "hello"),
        ),
        Step::dispatch(
            "MESSAGE_CREATE",
            4,
            message_create_payload(43, user_payload(ALICE_ID, "alice", "0001"), "typo"),
        ),
        Step::dispatch("MESSAGE_UPDATE", 5, message_update_payload(43, "fixed")),
        Step::dispatch(
            "MESSAGE_DELETE",
            6,
            message_delete_payload(42, TEXT_CHANNEL_ID, Some(GUILD_ID)),
        ),
        // Never cached, so nothing is written for it
        Step::dispatch(
            "MESSAGE_DELETE",
            7,
            message_delete_payload(99, TEXT_CHANNEL_ID, Some(GUILD_ID)),
        ),
        Step::reconnect(),
    ]);
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();

    let end = gateway.client(&logs).run().await.unwrap();
    assert!(matches!(end, SessionEnd::ReconnectRequested));
    gateway.finish().await.unwrap();

    let log = logs.guild(GUILD_ID).unwrap();
    assert_eq!(log["guild_name"], "Rust Guild");

    assert_eq!(
        TestLogs::record_types(&log),
        vec!["Message Edit", "Message Delete"]
    );

    let events = log["events"].as_array().unwrap();
    let delete = &events[1];
    assert_eq!(delete["author"], "alice#0001");
    assert_eq!(delete["content"], "hello");

    let edit = &events[0];
    assert_eq!(edit["before_content"], "typo");
    assert_eq!(edit["after_content"], "fixed");
}

#[tokio::test]
async fn test_bulk_delete_writes_one_record_per_message() {
    let mut script = setup();
    for (seq, id) in [(3, 51), (4, 52), (5, 53)] {
        script.push(Step::dispatch(
            "MESSAGE_CREATE",
            seq,
            message_create_payload(id, user_payload(ALICE_ID, "alice", "0001"), &format!("m{id}")),
        ));
    }
    script.push(Step::dispatch(
        "MESSAGE_DELETE_BULK",
        6,
        message_delete_bulk_payload(&[51, 52, 53]),
    ));
    script.push(Step::reconnect());

    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();
    gateway.finish().await.unwrap();

    let log = logs.guild(GUILD_ID).unwrap();
    let contents: Vec<&str> = log["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["m51", "m52", "m53"]);
}

#[tokio::test]
async fn test_channel_and_member_changes_are_logged() {
    let mut script = setup();
    script.extend([
        Step::dispatch("CHANNEL_UPDATE", 3, channel_update_payload("chat", "new topic")),
        Step::dispatch(
            "GUILD_MEMBER_ADD",
            4,
            member_add_payload(user_payload(BOB_ID, "bob", "0002")),
        ),
        Step::dispatch(
            "GUILD_MEMBER_UPDATE",
            5,
            member_update_payload(user_payload(ALICE_ID, "alice", "0001"), &[MODERATOR_ROLE_ID]),
        ),
        Step::dispatch(
            "GUILD_MEMBER_REMOVE",
            6,
            member_remove_payload(user_payload(BOB_ID, "bob", "0002")),
        ),
        Step::reconnect(),
    ]);
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();
    gateway.finish().await.unwrap();

    let log = logs.guild(GUILD_ID).unwrap();
    assert_eq!(
        TestLogs::record_types(&log),
        vec!["Channel Update", "Member Join", "Member Update", "Member Remove"]
    );

    let events = log["events"].as_array().unwrap();
    let update = events.iter().find(|e| e["type"] == "Channel Update").unwrap();
    assert_eq!(update["before_channel_name"], "general");
    assert_eq!(update["after_channel_name"], "chat");
    assert_eq!(update["after_topic"], "new topic");
    assert_eq!(update["after_nsfw"], true);
    assert_eq!(update["after_slowmode_delay"], 10);
    assert_eq!(update["category_name"], "Text Channels");

    let member = events.iter().find(|e| e["type"] == "Member Update").unwrap();
    assert_eq!(member["before_roles"], serde_json::json!(["@everyone"]));
    assert_eq!(member["after_roles"], serde_json::json!(["@everyone", "Moderator"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_records_for_one_guild_keep_dispatch_order() {
    let mut script = setup();
    let mut seq = 3;
    for id in 1000..1060 {
        script.push(Step::dispatch(
            "MESSAGE_CREATE",
            seq,
            message_create_payload(id, user_payload(ALICE_ID, "alice", "0001"), &format!("m{}", id - 1000)),
        ));
        seq += 1;
    }
    for id in 1000..1060 {
        script.push(Step::dispatch(
            "MESSAGE_DELETE",
            seq,
            message_delete_payload(id, TEXT_CHANNEL_ID, Some(GUILD_ID)),
        ));
        seq += 1;
    }
    script.push(Step::reconnect());

    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();
    gateway.finish().await.unwrap();

    let log = logs.guild(GUILD_ID).unwrap();
    let contents: Vec<String> = log["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (0..60).map(|n| format!("m{n}")).collect();
    assert_eq!(contents, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_guild_and_direct_logs_are_written_independently() {
    let mut script = setup();
    script.extend([
        Step::dispatch(
            "MESSAGE_CREATE",
            3,
            message_create_payload(42, user_payload(ALICE_ID, "alice", "0001"), "hello"),
        ),
        Step::dispatch("MESSAGE_CREATE", 4, direct_message_create_payload(77, "psst")),
        Step::dispatch("MESSAGE_DELETE", 5, message_delete_payload(77, DM_CHANNEL_ID, None)),
        Step::dispatch(
            "MESSAGE_DELETE",
            6,
            message_delete_payload(42, TEXT_CHANNEL_ID, Some(GUILD_ID)),
        ),
        Step::reconnect(),
    ]);
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();
    gateway.finish().await.unwrap();

    assert_eq!(logs.guild(GUILD_ID).unwrap()["events"][0]["content"], "hello");
    assert_eq!(logs.direct(BOB_ID).unwrap()["events"][0]["content"], "psst");
}

#[tokio::test]
async fn test_direct_message_delete_goes_to_recipient_log() {
    let mut script = setup();
    script.extend([
        Step::dispatch("MESSAGE_CREATE", 3, direct_message_create_payload(77, "psst")),
        Step::dispatch("MESSAGE_DELETE", 4, message_delete_payload(77, DM_CHANNEL_ID, None)),
        Step::reconnect(),
    ]);
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();
    gateway.finish().await.unwrap();

    let log = logs.direct(BOB_ID).unwrap();
    assert_eq!(log["DM_name"], "Direct Message with bob#0002");
    assert_eq!(log["events"][0]["type"], "Message Delete");
    assert_eq!(log["events"][0]["content"], "psst");
}

#[tokio::test]
async fn test_heartbeat_request_is_answered_with_last_sequence() {
    let mut script = setup();
    script.extend([Step::heartbeat_request(), Step::Expect(1), Step::reconnect()]);
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();
    gateway.client(&logs).run().await.unwrap();

    let received = gateway.finish().await.unwrap();
    let heartbeat = received.iter().rev().find(|frame| frame["op"] == 1).unwrap();
    assert_eq!(heartbeat["d"], 2);
}

#[tokio::test]
async fn test_fatal_close_code_ends_session() {
    let gateway = MockGateway::start(vec![Step::Expect(2), Step::Close(4004)])
        .await
        .unwrap();
    let logs = TestLogs::new().unwrap();

    let end = gateway.client(&logs).run().await.unwrap();
    assert!(matches!(end, SessionEnd::Closed(Some(4004))));
    assert!(end.is_fatal());
    gateway.finish().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_stops_an_idle_session() {
    let mut script = setup();
    script.push(Step::Expect(255));
    let gateway = MockGateway::start(script).await.unwrap();
    let logs = TestLogs::new().unwrap();

    let end = gateway
        .client(&logs)
        .run_until(tokio::time::sleep(std::time::Duration::from_millis(200)))
        .await
        .unwrap();
    assert!(matches!(end, SessionEnd::Shutdown));
}
