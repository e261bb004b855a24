use confab_core::ConnectionId;

use crate::integration::{create_test_gateway, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, join_room, room_users, user_joined};

#[tokio::test]
async fn test_single_channel_joins_room() {
    init_tracing();

    let (cmd_tx, output) = create_test_gateway();
    let conn = ConnectionId::new();

    join_room(&cmd_tx, conn, "abc123", "Alice")
        .await
        .expect("Join failed");

    assert!(
        output.wait_for_events(&conn, 1, EVENT_TIMEOUT_MS).await,
        "Expected a room-users response"
    );

    let events = output.events_for(&conn).await;
    let roster = room_users(&events).expect("room-users should have been sent");
    assert!(roster.is_empty(), "First joiner sees an empty roster");

    // No self-notification for the joiner.
    assert!(user_joined(&events).is_empty());
}
