use confab_core::ConnectionId;

use crate::integration::{create_test_gateway, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, join_room, offers_from, send_offer};

/// Signaling traffic never leaks outside the sender's room, and the room
/// a channel is routed to is its recorded one, whatever a client claims.
#[tokio::test]
async fn test_relay_is_room_scoped() {
    init_tracing();

    let (cmd_tx, output) = create_test_gateway();
    let alice = ConnectionId::new();
    let bob = ConnectionId::new();
    let mallory = ConnectionId::new();

    join_room(&cmd_tx, alice, "room-one", "Alice")
        .await
        .expect("Join failed");
    join_room(&cmd_tx, bob, "room-one", "Bob")
        .await
        .expect("Join failed");
    join_room(&cmd_tx, mallory, "room-two", "Mallory")
        .await
        .expect("Join failed");

    assert!(output.wait_for_events(&mallory, 1, EVENT_TIMEOUT_MS).await);

    // Mallory relays; the command layer has already discarded whatever
    // room id was claimed on the frame, so only room-two is a candidate
    // recipient set -- and Mallory is alone there.
    send_offer(&cmd_tx, mallory, "sdp-from-mallory")
        .await
        .expect("Relay failed");

    send_offer(&cmd_tx, alice, "sdp-from-alice")
        .await
        .expect("Relay failed");

    assert!(output.wait_for_events(&bob, 2, EVENT_TIMEOUT_MS).await);

    assert_eq!(offers_from(&output.events_for(&bob).await), vec![alice]);
    assert!(offers_from(&output.events_for(&alice).await).is_empty());
    assert!(
        offers_from(&output.events_for(&mallory).await).is_empty(),
        "Nothing from room-one may reach room-two"
    );
}
