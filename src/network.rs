/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The oscillatory clustering network: sample + topology + run + clusters.
//!
//! # Lifecycle
//!
//! ```text
//! Unbuilt ──radius──▶ Connected ──process──▶ Simulated
//!                        ▲                       │
//!                        └──────── radius ───────┘
//! ```
//!
//! - Supplying a radius (at construction, via [`SyncNetwork::rebuild`] or to
//!   [`SyncNetwork::process`]) replaces the topology and discards the previous
//!   run.
//! - [`SyncNetwork::get_clusters`] is only valid once a run has completed.
//! - Configuration is fixed at construction and never mutated.

use alloc::vec::Vec;

use crate::connectivity::{build, Adjacency, ConnectionRepresentation, CouplingWeights, Topology};
use crate::coupling::{CouplingModel, CouplingParams};
use crate::engine::{InitialPhases, KuramotoEngine, RunSettings, SimulationEngine, SolveType, SyncDynamic};
use crate::ensemble::{EnsembleAllocator, PhaseEnsembleAllocator};
use crate::error::{Result, SyncNetError};
use crate::sample::SampleStore;

// ─── Configuration ──────────────────────────────────────────────────────────

/// Immutable network configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncNetConfig {
    /// Storage of the coupling graph. Default matrix.
    pub representation: ConnectionRepresentation,
    /// Scale coupling by normalised pairwise distance. Default off.
    pub conn_weight: bool,
    /// Radius to build the topology with at construction, if any.
    pub radius: Option<f64>,
    /// Initial phase distribution for every run. Default uniform random.
    pub initial_phases: InitialPhases,
    /// Coupling gain and selectivity.
    pub coupling: CouplingParams,
    /// Natural frequencies are drawn from `[0, frequency_spread)`. Default 0.0.
    pub frequency_spread: f64,
    /// Settings used by [`SyncNetwork::process_default`].
    pub run: RunSettings,
}

impl Default for SyncNetConfig {
    fn default() -> Self {
        Self {
            representation: ConnectionRepresentation::Matrix,
            conn_weight: false,
            radius: None,
            initial_phases: InitialPhases::RandomUniform,
            coupling: CouplingParams::default(),
            frequency_spread: 0.0,
            run: RunSettings::default(),
        }
    }
}

/// Where the network is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkState {
    /// No topology has been built yet.
    Unbuilt,
    /// A topology exists; no run since it was built.
    Connected,
    /// A run has completed on the current topology.
    Simulated,
}

// ─── Network ────────────────────────────────────────────────────────────────

/// Oscillatory clustering network.
///
/// Generic over the simulation engine and the ensemble allocator; the
/// defaults are the crate's reference implementations.
#[derive(Debug)]
pub struct SyncNetwork<E = KuramotoEngine, A = PhaseEnsembleAllocator> {
    sample: SampleStore,
    config: SyncNetConfig,
    topology: Option<Topology>,
    dynamic: Option<SyncDynamic>,
    engine: E,
    allocator: A,
}

impl SyncNetwork {
    /// Network with the reference engine and allocator.
    pub fn new(sample: SampleStore, config: SyncNetConfig) -> Result<Self> {
        Self::with_collaborators(sample, config, KuramotoEngine::default(), PhaseEnsembleAllocator)
    }

    /// Network over raw points.
    pub fn from_points(points: Vec<Vec<f64>>, config: SyncNetConfig) -> Result<Self> {
        Self::new(SampleStore::new(points)?, config)
    }

    /// Network over a whitespace-delimited sample file.
    #[cfg(feature = "std")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P, config: SyncNetConfig) -> Result<Self> {
        Self::new(SampleStore::from_file(path)?, config)
    }
}

impl<E: SimulationEngine, A: EnsembleAllocator> SyncNetwork<E, A> {
    /// Network with caller-supplied collaborators.
    ///
    /// Builds the topology immediately when `config.radius` is set.
    pub fn with_collaborators(
        sample: SampleStore,
        config: SyncNetConfig,
        engine: E,
        allocator: A,
    ) -> Result<Self> {
        let mut network = Self { sample, config, topology: None, dynamic: None, engine, allocator };
        if let Some(radius) = network.config.radius {
            network.rebuild(radius)?;
        }
        Ok(network)
    }

    /// Replace the topology with one built for `radius`.
    ///
    /// Any previous run is discarded, so the network returns to
    /// [`NetworkState::Connected`].
    pub fn rebuild(&mut self, radius: f64) -> Result<()> {
        let topology = build(&self.sample, radius, self.config.representation, self.config.conn_weight)?;
        self.topology = Some(topology);
        self.dynamic = None;
        Ok(())
    }

    /// Simulate until the network synchronizes to `order`.
    ///
    /// With `radius` the topology is rebuilt first; without it the current
    /// topology is reused and [`SyncNetError::NotConnected`] is returned if
    /// there is none. Returns the whole trajectory when `collect_dynamic`,
    /// otherwise only the final `(time, phases)` row.
    pub fn process(
        &mut self,
        radius: Option<f64>,
        order: f64,
        solution: SolveType,
        collect_dynamic: bool,
    ) -> Result<&SyncDynamic> {
        self.run(radius, RunSettings { order, solution, collect_dynamic })
    }

    /// [`process`](Self::process) with the configured run settings and no new radius.
    pub fn process_default(&mut self) -> Result<&SyncDynamic> {
        self.run(None, self.config.run)
    }

    fn run(&mut self, radius: Option<f64>, settings: RunSettings) -> Result<&SyncDynamic> {
        settings.validate()?;
        if let Some(radius) = radius {
            self.rebuild(radius)?;
        }
        let topology = self.topology.as_ref().ok_or(SyncNetError::NotConnected)?;
        let model = CouplingModel::new(topology, self.config.coupling);

        let state = self.engine.initial_state(
            self.sample.len(),
            self.config.initial_phases,
            self.config.frequency_spread,
        );
        tracing::info!(
            oscillators = self.sample.len(),
            radius = topology.radius,
            order = settings.order,
            "processing network"
        );
        let dynamic = self.engine.simulate(&model, state, settings)?;
        Ok(self.dynamic.insert(dynamic))
    }

    /// Clusters of oscillators whose final phases lie within `tolerance`.
    ///
    /// Fails with [`SyncNetError::NotSimulated`] before the first run on the
    /// current topology.
    pub fn get_clusters(&self, tolerance: f64) -> Result<Vec<Vec<usize>>> {
        let dynamic = self.dynamic.as_ref().ok_or(SyncNetError::NotSimulated)?;
        self.allocator.allocate(dynamic.final_phases(), tolerance)
    }
}

impl<E, A> SyncNetwork<E, A> {
    /// Current lifecycle state.
    pub fn state(&self) -> NetworkState {
        match (&self.topology, &self.dynamic) {
            (None, _) => NetworkState::Unbuilt,
            (Some(_), None) => NetworkState::Connected,
            (Some(_), Some(_)) => NetworkState::Simulated,
        }
    }

    /// Number of oscillators.
    pub fn oscillator_count(&self) -> usize {
        self.sample.len()
    }

    /// The configuration the network was built with.
    pub fn config(&self) -> &SyncNetConfig {
        &self.config
    }

    /// The sample store.
    pub fn sample(&self) -> &SampleStore {
        &self.sample
    }

    /// Oscillator positions.
    pub fn positions(&self) -> &[Vec<f64>] {
        self.sample.points()
    }

    /// Current topology, if built.
    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    /// Radius of the current topology, if built.
    pub fn radius(&self) -> Option<f64> {
        self.topology.as_ref().map(|t| t.radius)
    }

    /// Normalised coupling weights, if built with weighting enabled.
    pub fn weights(&self) -> Option<&CouplingWeights> {
        self.topology.as_ref().and_then(|t| t.weights.as_ref())
    }

    /// `true` if oscillators `i` and `j` are coupled. Always `false` before a build.
    pub fn has_connection(&self, i: usize, j: usize) -> bool {
        self.topology.as_ref().is_some_and(|t| t.connectivity.has_connection(i, j))
    }

    /// Neighbours of oscillator `i`. Empty before a build.
    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        self.topology
            .as_ref()
            .map(|t| t.connectivity.neighbors(i).collect())
            .unwrap_or_default()
    }

    /// Result of the most recent run on the current topology.
    pub fn last_dynamic(&self) -> Option<&SyncDynamic> {
        self.dynamic.as_ref()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn four_points() -> Vec<Vec<f64>> {
        vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0], vec![5.0, 6.0]]
    }

    #[test]
    fn test_state_machine() {
        let mut net = SyncNetwork::from_points(four_points(), SyncNetConfig::default()).unwrap();
        assert_eq!(net.state(), NetworkState::Unbuilt);
        assert!(matches!(net.get_clusters(0.1), Err(SyncNetError::NotSimulated)));

        net.rebuild(1.5).unwrap();
        assert_eq!(net.state(), NetworkState::Connected);
        assert!(matches!(net.get_clusters(0.1), Err(SyncNetError::NotSimulated)));

        net.process_default().unwrap();
        assert_eq!(net.state(), NetworkState::Simulated);
        assert!(net.get_clusters(0.1).is_ok());

        net.process(Some(0.5), 0.998, SolveType::Fast, false).unwrap();
        assert_eq!(net.state(), NetworkState::Simulated);

        net.rebuild(2.0).unwrap();
        assert_eq!(net.state(), NetworkState::Connected);
        assert!(net.last_dynamic().is_none());
    }

    #[test]
    fn test_process_without_connectivity_fails() {
        let mut net = SyncNetwork::from_points(four_points(), SyncNetConfig::default()).unwrap();
        assert!(matches!(net.process_default(), Err(SyncNetError::NotConnected)));
        assert_eq!(net.state(), NetworkState::Unbuilt);
    }

    #[test]
    fn test_construction_radius_builds_topology() {
        let config = SyncNetConfig { radius: Some(1.5), ..SyncNetConfig::default() };
        let net = SyncNetwork::from_points(four_points(), config).unwrap();
        assert_eq!(net.state(), NetworkState::Connected);
        assert_eq!(net.radius(), Some(1.5));
        assert!(net.has_connection(0, 1));
        assert!(!net.has_connection(0, 2));
        assert_eq!(net.neighbors(3), vec![2]);
    }

    #[test]
    fn test_invalid_order_leaves_topology_untouched() {
        let config = SyncNetConfig { radius: Some(1.5), ..SyncNetConfig::default() };
        let mut net = SyncNetwork::from_points(four_points(), config).unwrap();
        let err = net.process(Some(10.0), 0.0, SolveType::Fast, false).unwrap_err();
        assert!(matches!(err, SyncNetError::InvalidOrder(_)));
        assert_eq!(net.radius(), Some(1.5));
    }

    #[test]
    fn test_unbuilt_queries_are_empty() {
        let net = SyncNetwork::from_points(four_points(), SyncNetConfig::default()).unwrap();
        assert!(!net.has_connection(0, 1));
        assert!(net.neighbors(0).is_empty());
        assert!(net.weights().is_none());
        assert_eq!(net.oscillator_count(), 4);
    }
}
