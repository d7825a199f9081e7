//! # syncnet-core
//!
//! Oscillatory network clustering: every sample point becomes a phase
//! oscillator, oscillators closer than a connectivity radius are coupled, and
//! groups that phase-lock are read out as clusters.
//!
//! ---
//!
//! ## Clustering by synchronization, not by partitioning distances
//!
//! Each oscillator turns at its natural frequency and is pulled toward the
//! phases of its neighbours:
//!
//! ```text
//! dθᵢ/dt = ωᵢ + (1 / |Nᵢ|) · Σ_{k ∈ Nᵢ} wᵢₖ · K · sin(m · (θₖ − θᵢ))
//! ```
//!
//! Neighbourhoods come from geometry alone. Points in one dense region share
//! enough couplings to lock into a common phase; regions with no couplings
//! between them drift independently. After the run, oscillators whose phases
//! agree within a tolerance form one cluster.
//!
//! ## The pipeline
//!
//! ```text
//! SampleStore → connectivity::build → CouplingModel → SimulationEngine → EnsembleAllocator
//!                      ↑                    ↑                                    ↓
//!                    radius          gain, selectivity                     clusters
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`sample`] | [`SampleStore`] | Oscillator positions; text parsing |
//! | [`connectivity`] | [`Connectivity`], [`CouplingWeights`], [`Topology`] | Radius graph (matrix or list) and distance weights |
//! | [`coupling`] | [`CouplingModel`], [`PhaseDerivative`] | The phase-derivative callback |
//! | [`order`] | [`OrderMetric`] | Local and global synchronization order |
//! | [`engine`] | [`SimulationEngine`], [`KuramotoEngine`] | Time evolution (Euler / RK4) |
//! | [`ensemble`] | [`EnsembleAllocator`], [`PhaseEnsembleAllocator`] | Phase-based cluster extraction |
//! | [`network`] | [`SyncNetwork`], [`SyncNetConfig`] | Orchestration and lifecycle |
//! | [`render`] | [`render::NetworkRenderer`] | 2-D / 3-D drawing interface |
//! | [`snapshot`] | [`snapshot::SyncNetSnapshot`] | Serialisable capture (requires `serde` feature) |
//!
//! ## Quick start
//!
//! ```rust
//! use syncnet_core::{SyncNetConfig, SyncNetwork};
//!
//! let sample = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0], vec![5.0, 6.0]];
//! let config = SyncNetConfig { radius: Some(1.5), ..SyncNetConfig::default() };
//! let mut network = SyncNetwork::from_points(sample, config).unwrap();
//! network.process_default().unwrap();
//! let clusters = network.get_clusters(0.1).unwrap();
//! assert_eq!(clusters.iter().map(Vec::len).sum::<usize>(), 4);
//! ```
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` + `alloc` by default. Enable `std` for file
//! loading, `parallel` for rayon-backed integration steps, `serde` for
//! serialisation and `python-ffi` for the Python extension.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod error;
pub mod sample;
pub mod connectivity;
pub mod coupling;
pub mod order;
pub mod engine;
pub mod ensemble;
pub mod network;
pub mod render;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use connectivity::{Adjacency, ConnectionRepresentation, Connectivity, CouplingWeights, Topology};
pub use coupling::{CouplingModel, CouplingParams, OscillatorState, PhaseDerivative};
pub use engine::{
    EngineConfig, InitialPhases, KuramotoEngine, RunSettings, SimulationEngine, SolveType, StopReason,
    SyncDynamic,
};
pub use ensemble::{EnsembleAllocator, PhaseEnsembleAllocator};
pub use error::{Result, SyncNetError};
pub use network::{NetworkState, SyncNetConfig, SyncNetwork};
pub use order::OrderMetric;
pub use sample::SampleStore;
