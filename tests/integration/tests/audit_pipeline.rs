//! Adapter and store working together against a real log directory

use std::sync::Arc;

use chat_audit_core::{LogIdentity, LogRepository, Snowflake};
use chat_audit_service::{AuditEvent, EventAdapter};
use chat_audit_store::JsonLogRepository;
use integration_tests::*;
use serde_json::json;

#[tokio::test]
async fn test_first_guild_delete_creates_log() {
    let logs = TestLogs::new().unwrap();
    let adapter = logs.adapter();

    let written = adapter
        .on_message_delete(&guild_message(42, "hello"))
        .await
        .unwrap();
    assert_eq!(written, 1);

    let log = logs.guild(GUILD_ID).unwrap();
    assert_eq!(log["guild_name"], "Rust Guild");
    assert_eq!(log["guild_id"], GUILD_ID);
    assert_eq!(log["is_guild"], true);

    let events = log["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    let record = &events[0];
    assert_eq!(record["type"], "Message Delete");
    assert_eq!(record["author"], "alice#0001");
    assert_eq!(record["author_id"], ALICE_ID);
    assert_eq!(record["content"], "hello");
    assert_eq!(record["attachments"], json!([]));
    assert_eq!(
        record["jump_url"],
        format!("https://discord.com/channels/{GUILD_ID}/{TEXT_CHANNEL_ID}/42")
    );
    assert!(record["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_bulk_delete_appends_in_order() {
    let logs = TestLogs::new().unwrap();
    let adapter = logs.adapter();

    let messages = vec![
        guild_message(1, "first"),
        guild_message(2, "second"),
        guild_message(3, "third"),
    ];
    assert_eq!(adapter.on_bulk_message_delete(&messages).await.unwrap(), 3);

    let log = logs.guild(GUILD_ID).unwrap();
    let contents: Vec<&str> = log["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_direct_message_edit_goes_to_recipient_log() {
    let logs = TestLogs::new().unwrap();
    let adapter = logs.adapter();

    let before = direct_message(7, "see you at 5");
    let mut after = before.clone();
    after.content = "see you at 6".to_string();
    adapter.on_message_edit(&before, &after).await.unwrap();

    assert!(logs.read(LogIdentity::Guild(Snowflake::new(GUILD_ID))).unwrap().is_none());

    let log = logs.direct(BOB_ID).unwrap();
    assert_eq!(log["DM_name"], "Direct Message with bob#0002");
    assert_eq!(log["DM_id"], DM_CHANNEL_ID);
    assert_eq!(log["DM_user_id"], BOB_ID);
    assert_eq!(log["is_guild"], false);

    let record = &log["events"][0];
    assert_eq!(record["type"], "Message Edit");
    assert_eq!(record["before_content"], "see you at 5");
    assert_eq!(record["after_content"], "see you at 6");
    assert_eq!(
        record["jump_url"],
        format!("https://discord.com/channels/@me/{DM_CHANNEL_ID}/7")
    );
}

#[tokio::test]
async fn test_events_through_handle_share_one_log() {
    let logs = TestLogs::new().unwrap();
    let adapter = logs.adapter();

    let renamed = {
        let mut channel = text_channel();
        channel.name = "chat".to_string();
        channel
    };
    let events = vec![
        AuditEvent::ChannelCreated(text_channel()),
        AuditEvent::ChannelUpdated {
            before: text_channel(),
            after: renamed.clone(),
        },
        AuditEvent::MemberJoined(member(alice(), &["@everyone"])),
        AuditEvent::MemberUpdated {
            before: member(alice(), &["@everyone"]),
            after: member(alice(), &["@everyone", "Moderator"]),
        },
        AuditEvent::MemberLeft(member(alice(), &["@everyone", "Moderator"])),
        AuditEvent::ChannelDeleted(renamed),
    ];
    for event in events {
        assert_eq!(adapter.handle(event).await.unwrap(), 1);
    }

    let log = logs.guild(GUILD_ID).unwrap();
    assert_eq!(
        TestLogs::record_types(&log),
        vec![
            "Channel Create",
            "Channel Update",
            "Member Join",
            "Member Update",
            "Member Remove",
            "Channel Delete",
        ]
    );
    assert_eq!(log["events"][1]["before_channel_name"], "general");
    assert_eq!(log["events"][1]["after_channel_name"], "chat");
    assert_eq!(log["events"][1]["category_name"], "Text Channels");
    assert_eq!(log["events"][3]["after_roles"], json!(["@everyone", "Moderator"]));
}

#[tokio::test]
async fn test_log_survives_a_new_repository() {
    let logs = TestLogs::new().unwrap();

    logs.adapter()
        .on_message_delete(&guild_message(1, "before restart"))
        .await
        .unwrap();

    // Fresh repository over the same directory, as after a restart
    let repository: Arc<dyn LogRepository> = Arc::new(JsonLogRepository::new(logs.layout().clone()));
    EventAdapter::new(repository.clone())
        .on_message_delete(&guild_message(2, "after restart"))
        .await
        .unwrap();

    let (log, path) = repository.resolve(&guild().into()).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(path, logs.layout().path_for(LogIdentity::Guild(Snowflake::new(GUILD_ID))));
}

#[tokio::test]
async fn test_concurrent_events_lose_nothing() {
    let logs = TestLogs::new().unwrap();
    let adapter = logs.adapter();

    let mut tasks = Vec::new();
    for id in 0..25 {
        let guild_adapter = adapter.clone();
        tasks.push(tokio::spawn(async move {
            guild_adapter.on_message_delete(&guild_message(id, "gone")).await
        }));
        let direct_adapter = adapter.clone();
        tasks.push(tokio::spawn(async move {
            direct_adapter.on_message_delete(&direct_message(id, "gone")).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 1);
    }

    let guild_log = logs.guild(GUILD_ID).unwrap();
    let direct_log = logs.direct(BOB_ID).unwrap();
    assert_eq!(guild_log["events"].as_array().unwrap().len(), 25);
    assert_eq!(direct_log["events"].as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn test_malformed_log_is_reported_and_left_alone() {
    let logs = TestLogs::new().unwrap();
    let path = logs
        .layout()
        .path_for(LogIdentity::Guild(Snowflake::new(GUILD_ID)));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let err = logs
        .adapter()
        .on_message_delete(&guild_message(1, "hello"))
        .await
        .unwrap_err();
    assert!(!err.is_fault());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}
