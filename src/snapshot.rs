//! SYNC_SNAP — portable snapshot of a network for persistence and transport.
//!
//! The snapshot captures the sample, the topology as an edge list and the
//! final phases of the last run. Coupling weights are not stored; they are a
//! pure function of the sample and are rebuilt on restore. The stored edge
//! list is checked against the rebuilt graph, so a stale or edited snapshot
//! fails to restore instead of yielding a different network.
//!
//! # no_std
//!
//! This module requires the `serde` feature and works with no_std + alloc.

use alloc::vec::Vec;

use crate::error::{Result, SyncNetError};
use crate::network::{SyncNetConfig, SyncNetwork};
use crate::sample::SampleStore;

/// Current snapshot format version.
pub const SYNC_SNAP_VERSION: u16 = 1;

/// A serialisable capture of a [`SyncNetwork`].
///
/// # Example
///
/// ```rust,ignore
/// use syncnet_core::snapshot::SyncNetSnapshot;
///
/// let snapshot = SyncNetSnapshot::from_network(&network);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: SyncNetSnapshot = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct SyncNetSnapshot {
    /// Format version, always [`SYNC_SNAP_VERSION`] for new snapshots.
    pub version: u16,
    /// Network configuration, including the connection representation.
    pub config: SyncNetConfig,
    /// Oscillator positions.
    pub positions: Vec<Vec<f64>>,
    /// Radius of the topology, `None` if never built.
    pub radius: Option<f64>,
    /// Every connection once, `(i, j)` with `i < j`.
    pub edges: Vec<(usize, usize)>,
    /// Final simulation time and phases of the last run, if any.
    pub last_run: Option<RunRecord>,
}

/// Final state of one run.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct RunRecord {
    /// Simulation time at the end of the run.
    pub time: f64,
    /// Phase of every oscillator at the end of the run.
    pub phases: Vec<f64>,
    /// Synchronization order reached.
    pub order: f64,
}

impl SyncNetSnapshot {
    /// Capture `network`.
    pub fn from_network<E, A>(network: &SyncNetwork<E, A>) -> Self {
        let topology = network.topology();
        let last_run = network.last_dynamic().and_then(|d| {
            d.last().map(|(time, phases)| RunRecord { time, phases: phases.to_vec(), order: d.final_order })
        });
        Self {
            version: SYNC_SNAP_VERSION,
            config: network.config().clone(),
            positions: network.positions().to_vec(),
            radius: topology.map(|t| t.radius),
            edges: topology.map(|t| t.connectivity.edges()).unwrap_or_default(),
            last_run,
        }
    }

    /// Number of oscillators captured.
    pub fn oscillator_count(&self) -> usize {
        self.positions.len()
    }

    /// Rebuild a network with the reference collaborators from this snapshot.
    ///
    /// The topology is recomputed from the stored radius and must reproduce
    /// the stored edges exactly, otherwise [`SyncNetError::SnapshotMismatch`].
    /// The last run is not replayed, so the restored network is at most
    /// [`Connected`](crate::network::NetworkState::Connected).
    pub fn restore(&self) -> Result<SyncNetwork> {
        let config = SyncNetConfig { radius: self.radius, ..self.config.clone() };
        let network = SyncNetwork::new(SampleStore::new(self.positions.clone())?, config)?;

        let rebuilt = network.topology().map(|t| t.connectivity.edges()).unwrap_or_default();
        if rebuilt != self.edges {
            return Err(SyncNetError::SnapshotMismatch { stored: self.edges.len(), rebuilt: rebuilt.len() });
        }
        Ok(network)
    }
}
