//! SYNC_SNAP round-trip integration tests.
//!
//! Verifies that a live network can be captured as a SyncNetSnapshot,
//! serialised to JSON, deserialised back, and restored with the same topology.

#![cfg(feature = "serde")]

use syncnet_core::snapshot::{SyncNetSnapshot, SYNC_SNAP_VERSION};
use syncnet_core::{
    ConnectionRepresentation, InitialPhases, NetworkState, SyncNetConfig, SyncNetError, SyncNetwork,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn make_network(representation: ConnectionRepresentation) -> SyncNetwork {
    let config = SyncNetConfig {
        radius: Some(1.5),
        representation,
        conn_weight: true,
        initial_phases: InitialPhases::Equipartition,
        ..SyncNetConfig::default()
    };
    let sample = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0], vec![5.0, 6.0]];
    SyncNetwork::from_points(sample, config).unwrap()
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn test_snapshot_captures_topology() {
    let net = make_network(ConnectionRepresentation::List);
    let snapshot = SyncNetSnapshot::from_network(&net);

    assert_eq!(snapshot.version, SYNC_SNAP_VERSION);
    assert_eq!(snapshot.oscillator_count(), 4);
    assert_eq!(snapshot.radius, Some(1.5));
    assert_eq!(snapshot.config.representation, ConnectionRepresentation::List);
    assert_eq!(snapshot.edges, vec![(0, 1), (2, 3)]);
    assert!(snapshot.last_run.is_none(), "no run yet");
}

#[test]
fn test_snapshot_records_last_run() {
    let mut net = make_network(ConnectionRepresentation::Matrix);
    let final_phases = net.process_default().unwrap().final_phases().to_vec();
    let snapshot = SyncNetSnapshot::from_network(&net);

    let run = snapshot.last_run.as_ref().expect("run must be captured");
    assert_eq!(run.phases, final_phases);
    assert!(run.order >= 0.998);
    assert!(run.time > 0.0);
}

#[test]
fn test_json_round_trip_and_restore() {
    let mut net = make_network(ConnectionRepresentation::Matrix);
    net.process_default().unwrap();
    let snapshot = SyncNetSnapshot::from_network(&net);

    let json = serde_json::to_string(&snapshot).expect("serialise");
    let decoded: SyncNetSnapshot = serde_json::from_str(&json).expect("deserialise");
    assert_eq!(decoded, snapshot);

    let restored = decoded.restore().expect("restore");
    assert_eq!(restored.state(), NetworkState::Connected);
    assert_eq!(restored.topology(), net.topology());
    assert_eq!(restored.config(), net.config());
}

#[test]
fn test_restore_rejects_edges_that_do_not_match() {
    let net = make_network(ConnectionRepresentation::List);
    let snapshot = SyncNetSnapshot::from_network(&net);

    let mut extra = snapshot.clone();
    extra.edges.push((0, 2));
    assert!(matches!(
        extra.restore(),
        Err(SyncNetError::SnapshotMismatch { stored: 3, rebuilt: 2 })
    ));

    let mut moved = snapshot.clone();
    moved.positions[1] = vec![0.0, 9.0];
    assert!(matches!(moved.restore(), Err(SyncNetError::SnapshotMismatch { .. })));

    let mut stale = snapshot;
    stale.radius = Some(100.0);
    assert!(matches!(stale.restore(), Err(SyncNetError::SnapshotMismatch { stored: 2, rebuilt: 6 })));
}
