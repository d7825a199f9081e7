/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Simulation engine interface and the reference Kuramoto engine.
//!
//! An engine owns the oscillator state for a run: it draws initial phases and
//! natural frequencies, repeatedly evaluates a [`PhaseDerivative`], and stops
//! once the synchronization order reaches the requested threshold, the order
//! stagnates, or the horizon elapses.
//!
//! # Step semantics
//!
//! Every oscillator of one step is integrated against the phase vector as it
//! was at step start. The next phases go to a separate buffer that is swapped
//! in when the whole step is done; the buffer being read is never written.
//! With the `parallel` feature the per-oscillator work is spread over rayon.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};
use core::fmt;
use core::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::coupling::{OscillatorState, PhaseDerivative};
use crate::error::{Result, SyncNetError};
use crate::order::OrderMetric;

// ─── Run options ────────────────────────────────────────────────────────────

/// Numerical method used to advance phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveType {
    /// One explicit Euler step of size `step`.
    #[default]
    Fast,
    /// Classical fourth-order Runge-Kutta with sub-steps of size `int_step`.
    Rk4,
}

impl fmt::Display for SolveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => f.write_str("fast"),
            Self::Rk4 => f.write_str("rk4"),
        }
    }
}

impl FromStr for SolveType {
    type Err = SyncNetError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("fast") || name.eq_ignore_ascii_case("euler") {
            Ok(Self::Fast)
        } else if name.eq_ignore_ascii_case("rk4") {
            Ok(Self::Rk4)
        } else {
            Err(SyncNetError::UnsupportedSolver(s.to_string()))
        }
    }
}

/// Distribution of initial phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialPhases {
    /// Uniform over [0, 2π).
    #[default]
    RandomUniform,
    /// Normal around π with σ = π/3, wrapped into [0, 2π).
    RandomGaussian,
    /// Oscillator `i` of `n` starts at `π · i / n`.
    Equipartition,
}

impl FromStr for InitialPhases {
    type Err = SyncNetError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("random") || name.eq_ignore_ascii_case("uniform") {
            Ok(Self::RandomUniform)
        } else if name.eq_ignore_ascii_case("gaussian") {
            Ok(Self::RandomGaussian)
        } else if name.eq_ignore_ascii_case("equipartition") {
            Ok(Self::Equipartition)
        } else {
            Err(SyncNetError::UnsupportedInitialPhases(s.to_string()))
        }
    }
}

/// Per-run settings handed to an engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSettings {
    /// Synchronization order in (0, 1] at which the run stops.
    pub order: f64,
    /// Integration method.
    pub solution: SolveType,
    /// Keep every step (`true`) or only the final state (`false`).
    pub collect_dynamic: bool,
}

impl RunSettings {
    /// Reject a stop order outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        if self.order > 0.0 && self.order <= 1.0 {
            Ok(())
        } else {
            Err(SyncNetError::InvalidOrder(self.order))
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self { order: 0.998, solution: SolveType::Fast, collect_dynamic: false }
    }
}

// ─── Output ─────────────────────────────────────────────────────────────────

/// Why a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The synchronization order reached the threshold.
    OrderReached,
    /// The order changed by less than the stagnation threshold.
    Stagnated,
    /// The step horizon elapsed.
    Horizon,
}

/// Phase trajectory of a run.
///
/// Holds every step when collected, otherwise a single final row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncDynamic {
    /// Simulation time of each row.
    pub times: Vec<f64>,
    /// Phases of every oscillator at each row.
    pub phases: Vec<Vec<f64>>,
    /// Order measured at the end of the run.
    pub final_order: f64,
    /// Why the run ended.
    pub stop_reason: StopReason,
}

impl SyncDynamic {
    /// Number of recorded rows.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Final `(time, phases)` row.
    pub fn last(&self) -> Option<(f64, &[f64])> {
        Some((*self.times.last()?, self.phases.last()?.as_slice()))
    }

    /// Phases at the end of the run (empty if nothing was recorded).
    pub fn final_phases(&self) -> &[f64] {
        self.phases.last().map_or(&[], |p| p.as_slice())
    }
}

// ─── Engine interface ───────────────────────────────────────────────────────

/// Time-evolution collaborator consumed by the network facade.
pub trait SimulationEngine {
    /// Fresh state for `oscillators` oscillators.
    ///
    /// Natural frequencies are drawn from `[0, frequency_spread)`; a spread of
    /// 0.0 gives every oscillator frequency 0.0.
    fn initial_state(
        &mut self,
        oscillators: usize,
        initial: InitialPhases,
        frequency_spread: f64,
    ) -> OscillatorState;

    /// Evolve `state` under `model` until the stop condition in `settings`.
    fn simulate(
        &mut self,
        model: &dyn PhaseDerivative,
        state: OscillatorState,
        settings: RunSettings,
    ) -> Result<SyncDynamic>;
}

/// Tuning of the reference engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Time advanced per recorded step. Default 0.1.
    pub step: f64,
    /// Runge-Kutta sub-step. Default 0.01.
    pub int_step: f64,
    /// Minimum order change per step before the run counts as stagnated. Default 1e-7.
    pub threshold_changes: f64,
    /// Step horizon. Default 10 000.
    pub max_steps: usize,
    /// Stop metric. Default [`OrderMetric::Local`].
    pub order_metric: OrderMetric,
    /// Seed of the engine's random source.
    pub seed: u64,
}

impl EngineConfig {
    /// Reject a step or sub-step that is not strictly positive and finite, and
    /// a stagnation threshold that is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.step) {
            return Err(SyncNetError::InvalidEngineConfig { field: "step", value: self.step });
        }
        if !positive(self.int_step) {
            return Err(SyncNetError::InvalidEngineConfig { field: "int_step", value: self.int_step });
        }
        if !(self.threshold_changes.is_finite() && self.threshold_changes >= 0.0) {
            return Err(SyncNetError::InvalidEngineConfig {
                field: "threshold_changes",
                value: self.threshold_changes,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step: 0.1,
            int_step: 0.01,
            threshold_changes: 1e-7,
            max_steps: 10_000,
            order_metric: OrderMetric::Local,
            seed: 0x5EED_0F_05C1,
        }
    }
}

/// Reference fixed-step Kuramoto integrator.
#[derive(Clone, Debug)]
pub struct KuramotoEngine {
    config: EngineConfig,
    rng: SmallRng,
}

impl KuramotoEngine {
    /// Engine with the given tuning, seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Engine tuning.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Advance every oscillator by one step, writing into `next`.
    fn step_into(
        &self,
        model: &dyn PhaseDerivative,
        state: &OscillatorState,
        time: f64,
        solution: SolveType,
        next: &mut [f64],
    ) {
        let advance = |index: usize| {
            let phase = state.phases[index];
            let moved = match solution {
                SolveType::Fast => {
                    phase + self.config.step * model.phase_derivative(phase, time, index, state)
                }
                SolveType::Rk4 => self.rk4(model, state, time, index),
            };
            wrap_phase(moved)
        };

        #[cfg(feature = "parallel")]
        next.par_iter_mut().enumerate().for_each(|(i, slot)| *slot = advance(i));
        #[cfg(not(feature = "parallel"))]
        next.iter_mut().enumerate().for_each(|(i, slot)| *slot = advance(i));
    }

    fn rk4(&self, model: &dyn PhaseDerivative, state: &OscillatorState, t0: f64, index: usize) -> f64 {
        let substeps = libm::round(self.config.step / self.config.int_step).max(1.0) as usize;
        let h = self.config.step / substeps as f64;
        let f = |phase: f64, t: f64| model.phase_derivative(phase, t, index, state);

        let mut phase = state.phases[index];
        let mut t = t0;
        for _ in 0..substeps {
            let k1 = f(phase, t);
            let k2 = f(phase + 0.5 * h * k1, t + 0.5 * h);
            let k3 = f(phase + 0.5 * h * k2, t + 0.5 * h);
            let k4 = f(phase + h * k3, t + h);
            phase += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
            t += h;
        }
        phase
    }
}

impl Default for KuramotoEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SimulationEngine for KuramotoEngine {
    fn initial_state(
        &mut self,
        oscillators: usize,
        initial: InitialPhases,
        frequency_spread: f64,
    ) -> OscillatorState {
        let rng = &mut self.rng;
        let phases = (0..oscillators)
            .map(|i| match initial {
                InitialPhases::RandomUniform => rng.gen::<f64>() * TAU,
                InitialPhases::RandomGaussian => {
                    let z: f64 = rng.sample(StandardNormal);
                    wrap_phase(PI + z * PI / 3.0)
                }
                InitialPhases::Equipartition => PI / oscillators as f64 * i as f64,
            })
            .collect();
        let frequencies = (0..oscillators)
            .map(|_| if frequency_spread == 0.0 { 0.0 } else { rng.gen::<f64>() * frequency_spread })
            .collect();
        OscillatorState { phases, frequencies }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(oscillators = state.len(), order = settings.order, solution = %settings.solution))]
    fn simulate(
        &mut self,
        model: &dyn PhaseDerivative,
        mut state: OscillatorState,
        settings: RunSettings,
    ) -> Result<SyncDynamic> {
        self.config.validate()?;
        settings.validate()?;
        let n = model.oscillator_count();
        if state.phases.len() != n || state.frequencies.len() != n {
            return Err(SyncNetError::StateMismatch {
                expected: n,
                found: state.phases.len().min(state.frequencies.len()),
            });
        }

        let metric = self.config.order_metric;
        let mut order = metric.measure(model, &state.phases);
        let mut time = 0.0;
        let mut times = Vec::new();
        let mut trajectory = Vec::new();
        if settings.collect_dynamic {
            times.push(time);
            trajectory.push(state.phases.clone());
        }

        let mut next = vec![0.0; n];
        let mut steps = 0usize;
        let stop_reason = loop {
            if order >= settings.order {
                break StopReason::OrderReached;
            }
            if steps >= self.config.max_steps {
                break StopReason::Horizon;
            }

            self.step_into(model, &state, time, settings.solution, &mut next);
            core::mem::swap(&mut state.phases, &mut next);
            time += self.config.step;
            steps += 1;

            if settings.collect_dynamic {
                times.push(time);
                trajectory.push(state.phases.clone());
            }

            let previous = order;
            order = metric.measure(model, &state.phases);
            tracing::trace!(step = steps, time, order, "step");
            if libm::fabs(order - previous) < self.config.threshold_changes {
                break StopReason::Stagnated;
            }
        };

        if !settings.collect_dynamic {
            times.push(time);
            trajectory.push(state.phases);
        }

        tracing::debug!(steps, time, final_order = order, ?stop_reason, "simulation finished");

        Ok(SyncDynamic { times, phases: trajectory, final_order: order, stop_reason })
    }
}

/// Map any phase into [0, 2π).
pub fn wrap_phase(phase: f64) -> f64 {
    let r = libm::fmod(phase, TAU);
    if r < 0.0 {
        r + TAU
    } else {
        r
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
