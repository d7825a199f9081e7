//! Python FFI bindings via PyO3.
//!
//! Exposes the oscillatory clustering network to Python with the reference
//! engine and ensemble allocator.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from syncnet_core import SyncNet
//!
//! sample = [[0.0, 0.0], [0.0, 1.0], [5.0, 5.0], [5.0, 6.0]]
//! network = SyncNet(sample, radius=1.5, conn_repr="list")
//! times, phases = network.process(order=0.998, solution="fast")
//! print(network.get_clusters(eps=0.1))   # [[0, 1], [2, 3]]
//! ```

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::SyncNetError;
use crate::network::{SyncNetConfig, SyncNetwork};
use crate::sample::SampleStore;

/// Lifecycle errors become `RuntimeError`; bad arguments become `ValueError`.
fn to_py_err(e: SyncNetError) -> PyErr {
    match e {
        SyncNetError::NotConnected | SyncNetError::NotSimulated => {
            PyRuntimeError::new_err(e.to_string())
        }
        other => PyValueError::new_err(other.to_string()),
    }
}

// ── SyncNet ───────────────────────────────────────────────────────────────────

/// Oscillatory network for cluster analysis.
///
/// Args:
///     sample:             list of points (equal-length lists of floats)
///     radius:             connectivity radius; None to build later
///     conn_repr:          "matrix" or "list"
///     initial_phases:     "random", "gaussian" or "equipartition"
///     enable_conn_weight: scale coupling by normalised distance
#[pyclass(name = "SyncNet")]
pub struct PySyncNet {
    inner: SyncNetwork,
}

#[pymethods]
impl PySyncNet {
    /// Create a network from a sample.
    #[new]
    #[pyo3(signature = (sample, radius=None, conn_repr="matrix", initial_phases="random", enable_conn_weight=false))]
    pub fn new(
        sample: Vec<Vec<f64>>,
        radius: Option<f64>,
        conn_repr: &str,
        initial_phases: &str,
        enable_conn_weight: bool,
    ) -> PyResult<Self> {
        let config = SyncNetConfig {
            representation: conn_repr.parse().map_err(to_py_err)?,
            initial_phases: initial_phases.parse().map_err(to_py_err)?,
            conn_weight: enable_conn_weight,
            radius,
            ..SyncNetConfig::default()
        };
        let sample = SampleStore::new(sample).map_err(to_py_err)?;
        Ok(Self { inner: SyncNetwork::new(sample, config).map_err(to_py_err)? })
    }

    /// Create a network from a whitespace-delimited sample file.
    #[staticmethod]
    #[pyo3(signature = (path, radius=None, conn_repr="matrix"))]
    pub fn from_file(path: &str, radius: Option<f64>, conn_repr: &str) -> PyResult<Self> {
        let config = SyncNetConfig {
            representation: conn_repr.parse().map_err(to_py_err)?,
            radius,
            ..SyncNetConfig::default()
        };
        Ok(Self { inner: SyncNetwork::from_file(path, config).map_err(to_py_err)? })
    }

    /// Simulate until the network synchronizes.
    ///
    /// Args:
    ///     radius:          rebuild connections with this radius first
    ///     order:           synchronization order in (0, 1] that stops the run
    ///     solution:        "fast" or "rk4"
    ///     collect_dynamic: return every step instead of the final one
    ///
    /// Returns:
    ///     (times, phases), one phases list per recorded step
    #[pyo3(signature = (radius=None, order=0.998, solution="fast", collect_dynamic=false))]
    pub fn process(
        &mut self,
        radius: Option<f64>,
        order: f64,
        solution: &str,
        collect_dynamic: bool,
    ) -> PyResult<(Vec<f64>, Vec<Vec<f64>>)> {
        let solution = solution.parse().map_err(to_py_err)?;
        let dynamic = self
            .inner
            .process(radius, order, solution, collect_dynamic)
            .map_err(to_py_err)?;
        Ok((dynamic.times.clone(), dynamic.phases.clone()))
    }

    /// Clusters of oscillator indices whose phases lie within `eps`.
    #[pyo3(signature = (eps=0.1))]
    pub fn get_clusters(&self, eps: f64) -> PyResult<Vec<Vec<usize>>> {
        self.inner.get_clusters(eps).map_err(to_py_err)
    }

    /// True if oscillators `i` and `j` are coupled.
    pub fn has_connection(&self, i: usize, j: usize) -> PyResult<bool> {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.inner.has_connection(i, j))
    }

    /// Indices of the oscillators coupled to `i`.
    pub fn get_neighbors(&self, i: usize) -> PyResult<Vec<usize>> {
        self.check_index(i)?;
        Ok(self.inner.neighbors(i))
    }

    /// Number of oscillators.
    #[getter]
    pub fn num_osc(&self) -> usize {
        self.inner.oscillator_count()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "SyncNet(num_osc={}, radius={:?}, conn_repr={})",
            self.inner.oscillator_count(),
            self.inner.radius(),
            self.inner.config().representation,
        )
    }
}

impl PySyncNet {
    fn check_index(&self, i: usize) -> PyResult<()> {
        let n = self.inner.oscillator_count();
        if i < n {
            Ok(())
        } else {
            Err(PyIndexError::new_err(format!("oscillator index {i} out of range for {n} oscillators")))
        }
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Oscillatory network clustering bindings.
#[pymodule]
pub fn syncnet_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySyncNet>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
