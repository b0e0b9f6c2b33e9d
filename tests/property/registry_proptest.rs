//! Property-based tests for the presence registry
//!
//! Random connect/join/disconnect sequences are replayed against a plain
//! model; the registry must agree with it in both directions.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use serde_json::json;
use socialhub::backend::realtime::{ConnectionRegistry, JoinOutcome};
use socialhub::shared::{ConnectionId, ServerEvent, UserId};

#[derive(Debug, Clone)]
enum Op {
    Connect,
    Join { connection: usize, user: u8 },
    Disconnect { connection: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Connect),
        4 => (0..8usize, 0..4u8).prop_map(|(connection, user)| Op::Join { connection, user }),
        1 => (0..8usize).prop_map(|connection| Op::Disconnect { connection }),
    ]
}

fn user(n: u8) -> UserId {
    UserId::parse(&format!("user-{}", n)).unwrap()
}

proptest! {
    #[test]
    fn test_registry_matches_model(ops in prop::collection::vec(op(), 0..64)) {
        let registry = ConnectionRegistry::new(64);
        let mut connections: Vec<ConnectionId> = Vec::new();
        let mut receivers = Vec::new();
        let mut open: BTreeSet<ConnectionId> = BTreeSet::new();
        let mut channels: BTreeMap<UserId, BTreeSet<ConnectionId>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Connect => {
                    let (connection, receiver) = registry.connect();
                    connections.push(connection);
                    receivers.push(receiver);
                    open.insert(connection);
                }
                Op::Join { connection, user: n } => {
                    if connections.is_empty() {
                        continue;
                    }
                    let connection = connections[connection % connections.len()];
                    let outcome = registry.join(&user(n), connection);
                    if !open.contains(&connection) {
                        prop_assert_eq!(outcome, JoinOutcome::UnknownConnection);
                    } else if channels.entry(user(n)).or_default().insert(connection) {
                        prop_assert_eq!(outcome, JoinOutcome::Joined);
                    } else {
                        prop_assert_eq!(outcome, JoinOutcome::AlreadyJoined);
                    }
                }
                Op::Disconnect { connection } => {
                    if connections.is_empty() {
                        continue;
                    }
                    let connection = connections[connection % connections.len()];
                    let left = registry.disconnect(connection);
                    open.remove(&connection);

                    let mut expected = Vec::new();
                    for (user, members) in channels.iter_mut() {
                        if members.remove(&connection) {
                            expected.push(user.clone());
                        }
                    }
                    prop_assert_eq!(left, expected);
                }
            }
        }
        channels.retain(|_, members| !members.is_empty());

        prop_assert_eq!(registry.connection_count(), open.len());
        prop_assert_eq!(registry.user_count(), channels.len());
        prop_assert_eq!(
            registry.online_users(),
            channels.keys().cloned().collect::<Vec<_>>()
        );

        for n in 0..4u8 {
            let members = channels.get(&user(n)).cloned().unwrap_or_default();
            let actual: BTreeSet<ConnectionId> =
                registry.connections_for(&user(n)).into_iter().collect();
            prop_assert_eq!(&actual, &members);
            prop_assert_eq!(registry.is_online(&user(n)), !members.is_empty());

            for connection in &actual {
                prop_assert!(registry.users_for(*connection).contains(&user(n)));
            }

            let delivery = registry.deliver(&user(n), &ServerEvent::notification_read(json!(n)));
            prop_assert_eq!(delivery.delivered, members.len());
            prop_assert_eq!(delivery.dropped, 0);
        }

        for connection in &connections {
            if !open.contains(connection) {
                prop_assert!(registry.users_for(*connection).is_empty());
            }
        }
    }
}
