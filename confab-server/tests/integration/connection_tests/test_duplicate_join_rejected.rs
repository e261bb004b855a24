use confab_core::ConnectionId;

use crate::integration::{create_test_gateway, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, errors, join_room, room_users};

#[tokio::test]
async fn test_duplicate_join_rejected() {
    init_tracing();

    let (cmd_tx, output) = create_test_gateway();
    let conn = ConnectionId::new();

    join_room(&cmd_tx, conn, "abc123", "Alice")
        .await
        .expect("Join failed");
    join_room(&cmd_tx, conn, "other-room", "Alice again")
        .await
        .expect("Join failed");

    assert!(
        output.wait_for_events(&conn, 2, EVENT_TIMEOUT_MS).await,
        "Expected roster plus rejection"
    );

    let events = output.events_for(&conn).await;
    assert_eq!(errors(&events).len(), 1, "Second join must be rejected");

    // Membership is untouched by the rejected join: a later joiner of the
    // original room still sees exactly one entry for the channel.
    let other = ConnectionId::new();
    join_room(&cmd_tx, other, "abc123", "Bob")
        .await
        .expect("Join failed");

    assert!(output.wait_for_events(&other, 1, EVENT_TIMEOUT_MS).await);
    let roster = room_users(&output.events_for(&other).await).expect("room-users missing");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].user_id, conn);
    assert_eq!(roster[0].user_name, "Alice");

    // And the rejected room id never materialized for the channel.
    let probe = ConnectionId::new();
    join_room(&cmd_tx, probe, "other-room", "Probe")
        .await
        .expect("Join failed");

    assert!(output.wait_for_events(&probe, 1, EVENT_TIMEOUT_MS).await);
    let roster = room_users(&output.events_for(&probe).await).expect("room-users missing");
    assert!(roster.is_empty());
}
