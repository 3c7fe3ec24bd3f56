use console_core::conversation::{ConversationSource, ConversationStore};
use console_infrastructure::JsonConversationSource;
use console_infrastructure::demo;
use console_infrastructure::json_conversation_source::write_conversations;
use tempfile::TempDir;

#[tokio::test]
async fn test_demo_inbox_round_trips_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("inbox/conversations.json");
    write_conversations(&path, &demo::conversations())
        .await
        .expect("Should write fixture");

    let source = JsonConversationSource::new(&path);
    let conversations = source.load_conversations().await.expect("Should load fixture");
    assert_eq!(conversations.len(), 4);

    // Most recent activity first; the empty conversation sinks to the end
    let store = ConversationStore::new(conversations);
    let order: Vec<&str> = store.conversations().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["c1", "c3", "c2", "c4"]);
    assert_eq!(store.get("c1").unwrap().last_message.as_deref(), Some("Any update?"));
    assert_eq!(store.total_unread(), 3);
}

#[tokio::test]
async fn test_wrapped_fixture_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("conversations.json");
    std::fs::write(
        &path,
        r#"{
            "conversations": [
                {
                    "id": "c9",
                    "participant": {"id": "p9", "name": "Mei Lin"},
                    "messages": [
                        {
                            "id": "m1",
                            "conversationId": "c9",
                            "sender": "counterpart",
                            "body": "hello",
                            "timestamp": "2026-02-01T10:00:00Z",
                            "status": "delivered"
                        }
                    ],
                    "unreadCount": 1
                }
            ]
        }"#,
    )
    .unwrap();

    let mut store = ConversationStore::new(
        JsonConversationSource::new(&path)
            .load_conversations()
            .await
            .unwrap(),
    );
    assert_eq!(store.get("c9").unwrap().last_message.as_deref(), Some("hello"));

    store.select_conversation("c9").unwrap();
    assert_eq!(store.total_unread(), 0);
    store.append_message("c9", "hi there").unwrap();
    assert_eq!(store.get("c9").unwrap().messages.len(), 2);
}

#[tokio::test]
async fn test_missing_fixture_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let source = JsonConversationSource::new(temp_dir.path().join("absent.json"));
    let err = source.load_conversations().await.unwrap_err();
    assert!(matches!(err, console_core::ConsoleError::Io { .. }));
}
