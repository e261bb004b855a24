use confab_core::ConnectionId;

use crate::integration::{create_test_gateway, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, errors, join_room, send_offer};

#[tokio::test]
async fn test_relay_before_join_rejected() {
    init_tracing();

    let (cmd_tx, output) = create_test_gateway();
    let stranger = ConnectionId::new();
    let alice = ConnectionId::new();

    join_room(&cmd_tx, alice, "abc123", "Alice")
        .await
        .expect("Join failed");

    send_offer(&cmd_tx, stranger, "uninvited-sdp")
        .await
        .expect("Relay failed");

    assert!(
        output.wait_for_events(&stranger, 1, EVENT_TIMEOUT_MS).await,
        "Expected a rejection at the stranger"
    );
    assert_eq!(errors(&output.events_for(&stranger).await).len(), 1);

    // Nobody else heard anything beyond their own roster.
    let alice_events = output.events_for(&alice).await;
    assert_eq!(alice_events.len(), 1, "Alice sees only her room-users");
}
