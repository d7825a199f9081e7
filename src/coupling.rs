/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The coupling law: phase derivative of one oscillator under neighbour coupling.
//!
//! ```text
//! dθᵢ/dt = ωᵢ + (1 / max(1, |Nᵢ|)) · Σ_{k ∈ Nᵢ} wᵢₖ · K · sin(m · (θₖ − θᵢ))
//! ```
//!
//! `K` is the coupling gain and `m` the selectivity multiplier: `m = 1` favours
//! one global cluster, larger `m` lets several phase-locked groups coexist.
//! `wᵢₖ` is 1.0 unless distance weighting is enabled.
//!
//! The model is read-only. It may be evaluated for many oscillators at once as
//! long as the phase vector it reads is not written during the step.

use alloc::vec::Vec;

use crate::connectivity::{Adjacency, Neighbors, Topology};

/// Phase and natural-frequency state owned by a simulation engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OscillatorState {
    /// Current phase of every oscillator.
    pub phases: Vec<f64>,
    /// Natural frequency of every oscillator.
    pub frequencies: Vec<f64>,
}

impl OscillatorState {
    /// Number of oscillators.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// `true` if the state holds no oscillators.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

/// The derivative callback a simulation engine evaluates at every (sub-)step.
pub trait PhaseDerivative: Sync {
    /// Number of oscillators the callback covers.
    fn oscillator_count(&self) -> usize;

    /// Rate of change of oscillator `index` when its phase is `phase`.
    ///
    /// `t` is accepted for engines that pass it and is otherwise ignored.
    /// `state` is the network state as of step start.
    fn phase_derivative(&self, phase: f64, t: f64, index: usize, state: &OscillatorState) -> f64;

    /// Oscillators coupled to `index` (used by local order metrics).
    fn neighbors(&self, index: usize) -> Neighbors<'_>;
}

/// Gain and selectivity of the coupling law.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouplingParams {
    /// Global coupling strength `K`. Default 1.0.
    pub gain: f64,
    /// Harmonic `m` inside the sine argument. Default 1.0.
    pub selectivity: f64,
}

impl Default for CouplingParams {
    fn default() -> Self {
        Self { gain: 1.0, selectivity: 1.0 }
    }
}

/// Coupling law bound to one built topology.
#[derive(Clone, Copy, Debug)]
pub struct CouplingModel<'a> {
    topology: &'a Topology,
    params: CouplingParams,
}

impl<'a> CouplingModel<'a> {
    /// Bind the coupling law to `topology`.
    pub fn new(topology: &'a Topology, params: CouplingParams) -> Self {
        Self { topology, params }
    }

    /// Averaged coupling term (everything except the natural frequency).
    ///
    /// An isolated oscillator has a coupling term of exactly 0.0.
    pub fn coupling_term(&self, phase: f64, index: usize, phases: &[f64]) -> f64 {
        let connectivity = &self.topology.connectivity;
        let weights = self.topology.weights.as_ref();

        let mut sum = 0.0;
        let mut count = 0usize;
        for k in connectivity.neighbors(index) {
            let w = weights.map_or(1.0, |w| w.get(index, k));
            sum += w * self.params.gain * libm::sin(self.params.selectivity * (phases[k] - phase));
            count += 1;
        }
        sum / count.max(1) as f64
    }

    /// Coupling parameters in use.
    pub fn params(&self) -> CouplingParams {
        self.params
    }
}

impl PhaseDerivative for CouplingModel<'_> {
    fn oscillator_count(&self) -> usize {
        self.topology.connectivity.oscillator_count()
    }

    fn phase_derivative(&self, phase: f64, _t: f64, index: usize, state: &OscillatorState) -> f64 {
        state.frequencies[index] + self.coupling_term(phase, index, &state.phases)
    }

    fn neighbors(&self, index: usize) -> Neighbors<'_> {
        self.topology.connectivity.neighbors(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{build, ConnectionRepresentation};
    use crate::sample::SampleStore;
    use alloc::vec;
    use core::f64::consts::PI;

    fn topology(radius: f64, weighting: bool) -> Topology {
        let s = SampleStore::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
            vec![5.0, 6.0],
        ])
        .unwrap();
        build(&s, radius, ConnectionRepresentation::List, weighting).unwrap()
    }

    fn state(phases: Vec<f64>) -> OscillatorState {
        OscillatorState { frequencies: vec![0.3, -0.2, 1.0, 0.0], phases }
    }

    #[test]
    fn test_isolated_oscillator_runs_at_natural_frequency() {
        let t = topology(0.0, false);
        let model = CouplingModel::new(&t, CouplingParams::default());
        let s = state(vec![0.1, 2.0, 4.0, 5.5]);
        for i in 0..4 {
            for phase in [0.0, 1.3, -7.0] {
                assert_eq!(model.phase_derivative(phase, 42.0, i, &s), s.frequencies[i]);
            }
        }
    }

    #[test]
    fn test_single_neighbour_pull() {
        let t = topology(1.5, false);
        let model = CouplingModel::new(&t, CouplingParams { gain: 2.0, selectivity: 1.0 });
        let s = state(vec![0.0, PI / 2.0, 0.0, 0.0]);
        // 0.3 + 2 * sin(pi/2) / 1
        assert!((model.phase_derivative(0.0, 0.0, 0, &s) - 2.3).abs() < 1e-12);
        // Oscillator 2 and 3 are in phase: no pull.
        assert!((model.phase_derivative(0.0, 0.0, 2, &s) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_selectivity_multiplies_phase_difference() {
        let t = topology(1.5, false);
        let model = CouplingModel::new(&t, CouplingParams { gain: 1.0, selectivity: 2.0 });
        let s = state(vec![0.0, PI / 2.0, 0.0, 0.0]);
        // sin(2 * pi/2) = 0: anti-phase pairs are stable for m = 2.
        assert!(model.coupling_term(0.0, 0, &s.phases).abs() < 1e-12);
    }

    #[test]
    fn test_time_argument_is_ignored() {
        let t = topology(10.0, false);
        let model = CouplingModel::new(&t, CouplingParams::default());
        let s = state(vec![0.0, 1.0, 2.0, 3.0]);
        let a = model.phase_derivative(0.5, 0.0, 1, &s);
        let b = model.phase_derivative(0.5, 99.0, 1, &s);
        assert_eq!(a, b);
    }

    #[test]
    fn test_coupling_is_averaged_over_neighbours() {
        let t = topology(10.0, false);
        let model = CouplingModel::new(&t, CouplingParams::default());
        let phases = vec![0.0, PI / 2.0, PI / 2.0, PI / 2.0];
        // Three neighbours each contributing sin(pi/2) = 1.
        assert!((model.coupling_term(0.0, 0, &phases) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_coupling_uses_normalised_weight() {
        let t = topology(1.5, true);
        let model = CouplingModel::new(&t, CouplingParams::default());
        let phases = vec![0.0, PI / 2.0, 0.0, 0.0];
        // (0,1) is one of the two closest pairs: weight 0 kills the pull.
        assert!(model.coupling_term(0.0, 0, &phases).abs() < 1e-12);
    }
}
