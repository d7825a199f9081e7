/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Synchronization order metrics used as early-stopping thresholds.
//!
//! Both metrics lie in [0.0, 1.0]; 1.0 means fully synchronized.

use core::f64::consts::TAU;

use crate::coupling::PhaseDerivative;

/// Which coherence measure the engine compares against the stop order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderMetric {
    /// Mean `exp(-|θⱼ − θᵢ|)` over connected pairs. Reaches 1.0 once every
    /// connected component is in phase, so separate clusters can all lock.
    #[default]
    Local,
    /// Kuramoto order `|Σ e^{iθ}| / N`. Reaches 1.0 only for one global cluster.
    Global,
}

impl OrderMetric {
    /// Evaluate this metric on `phases` over `model`'s coupling graph.
    pub fn measure<M: PhaseDerivative + ?Sized>(&self, model: &M, phases: &[f64]) -> f64 {
        match self {
            Self::Local => local_order(model, phases),
            Self::Global => global_order(phases),
        }
    }
}

/// Shortest angular distance between two phases, in [0, π].
pub fn phase_distance(a: f64, b: f64) -> f64 {
    let d = libm::fmod(libm::fabs(a - b), TAU);
    if d > TAU - d {
        TAU - d
    } else {
        d
    }
}

/// Kuramoto global order parameter. 0.0 for an empty network.
pub fn global_order(phases: &[f64]) -> f64 {
    if phases.is_empty() {
        return 0.0;
    }
    let (re, im) = phases
        .iter()
        .fold((0.0, 0.0), |(re, im), &p| (re + libm::cos(p), im + libm::sin(p)));
    libm::sqrt(re * re + im * im) / phases.len() as f64
}

/// Local order over connected pairs. 0.0 for a network with no connections.
pub fn local_order<M: PhaseDerivative + ?Sized>(model: &M, phases: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..model.oscillator_count() {
        for j in model.neighbors(i) {
            total += libm::exp(-phase_distance(phases[j], phases[i]));
            pairs += 1;
        }
    }
    total / pairs.max(1) as f64
}
