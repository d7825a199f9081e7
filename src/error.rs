/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Crate error type.
//!
//! Every fallible operation returns [`Result`]. None of these errors come from
//! transient conditions, so nothing is retried.

use alloc::string::String;

/// Errors raised while building, running or reading an oscillatory network.
#[derive(Debug, thiserror::Error)]
pub enum SyncNetError {
    /// A connectivity representation other than matrix or list was requested.
    #[error("unknown type of representation of coupling between oscillators: {0}")]
    UnsupportedRepresentation(String),

    /// An integration method name was not recognised.
    #[error("unknown type of solver: {0}")]
    UnsupportedSolver(String),

    /// An initial-phase distribution name was not recognised.
    #[error("unknown type of initial phase distribution: {0}")]
    UnsupportedInitialPhases(String),

    /// `process` was called without a radius before any connectivity was built.
    #[error("no connectivity has been built; supply a connectivity radius")]
    NotConnected,

    /// Clusters were requested before any simulation run completed.
    #[error("clusters are only available after the network has been simulated")]
    NotSimulated,

    /// Rendering was requested for a network outside 2-D or 3-D space.
    #[error("network located in {dimension}-d space cannot be rendered; only 2-d and 3-d are supported")]
    Dimensionality {
        /// Dimension of the sample points.
        dimension: usize,
    },

    /// A sample point has a different dimension from the first point.
    #[error("sample point {index} has dimension {found}, expected {expected}")]
    InconsistentDimension {
        /// Index of the offending point.
        index: usize,
        /// Dimension of point 0.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },

    /// A sample coordinate is NaN or infinite.
    #[error("sample point {index} has a non-finite coordinate {value}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
        /// The offending coordinate.
        value: f64,
    },

    /// The sample contains no points.
    #[error("sample is empty")]
    EmptySample,

    /// Connectivity radius is negative or not a number.
    #[error("connectivity radius must be a non-negative number, got {0}")]
    InvalidRadius(f64),

    /// Stopping order lies outside (0, 1].
    #[error("synchronization order must lie in (0, 1], got {0}")]
    InvalidOrder(f64),

    /// Cluster tolerance is negative or not a number.
    #[error("cluster tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),

    /// An engine setting is outside its valid range.
    #[error("engine setting {field} is out of range: {value}")]
    InvalidEngineConfig {
        /// Name of the setting.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An engine was handed a state sized for a different network.
    #[error("oscillator state holds {found} oscillators, network has {expected}")]
    StateMismatch {
        /// Oscillators in the network.
        expected: usize,
        /// Oscillators in the supplied state.
        found: usize,
    },

    /// A snapshot's stored connections differ from the topology rebuilt from it.
    #[error("snapshot lists {stored} connections, rebuilt topology has {rebuilt}")]
    SnapshotMismatch {
        /// Connections stored in the snapshot.
        stored: usize,
        /// Connections in the rebuilt topology.
        rebuilt: usize,
    },

    /// A sample file token could not be read as a floating-point coordinate.
    #[error("line {line}: cannot parse coordinate {token:?}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// Reading a sample file failed.
    #[cfg(feature = "std")]
    #[error("cannot read sample: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate result alias.
pub type Result<T> = core::result::Result<T, SyncNetError>;
