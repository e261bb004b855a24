use confab_core::{ConnectionId, ServerEvent, SignalPayload};
use confab_server::GatewayCommand;
use serde_json::json;

use crate::integration::{create_test_gateway, init_tracing};
use crate::utils::{EVENT_TIMEOUT_MS, join_room};

#[tokio::test]
async fn test_answer_and_ice_relay() {
    init_tracing();

    let (cmd_tx, output) = create_test_gateway();
    let alice = ConnectionId::new();
    let bob = ConnectionId::new();

    join_room(&cmd_tx, alice, "abc123", "Alice")
        .await
        .expect("Join failed");
    join_room(&cmd_tx, bob, "abc123", "Bob")
        .await
        .expect("Join failed");

    cmd_tx
        .send(GatewayCommand::Relay {
            conn_id: bob,
            payload: SignalPayload::Answer(json!({ "type": "answer", "sdp": "v=0 answer" })),
        })
        .await
        .expect("Relay failed");

    cmd_tx
        .send(GatewayCommand::Relay {
            conn_id: bob,
            payload: SignalPayload::IceCandidate(json!({
                "candidate": "candidate:0 1 udp 2122260223 192.0.2.1 54321 typ host",
                "sdpMid": "0",
                "sdpMLineIndex": 0
            })),
        })
        .await
        .expect("Relay failed");

    // roster + user-joined + answer + candidate
    assert!(output.wait_for_events(&alice, 4, EVENT_TIMEOUT_MS).await);

    let events = output.events_for(&alice).await;

    let answer_from = events.iter().find_map(|event| match event {
        ServerEvent::Answer { from, .. } => Some(*from),
        _ => None,
    });
    assert_eq!(answer_from, Some(bob));

    let candidate = events
        .iter()
        .find_map(|event| match event {
            ServerEvent::IceCandidate { candidate, from } if *from == bob => {
                Some(candidate.clone())
            }
            _ => None,
        })
        .expect("Candidate missing at Alice");
    assert_eq!(candidate["sdpMid"], "0");

    // Bob never receives his own signaling back.
    let bob_events = output.events_for(&bob).await;
    assert!(
        !bob_events
            .iter()
            .any(|event| matches!(event, ServerEvent::Answer { .. } | ServerEvent::IceCandidate { .. })),
        "Sender must be excluded from the fan-out"
    );
}
