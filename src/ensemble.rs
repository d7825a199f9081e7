/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Ensemble allocation: grouping oscillators by final phase.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Result, SyncNetError};
use crate::order::phase_distance;

/// Cluster-extraction collaborator consumed by the network facade.
pub trait EnsembleAllocator {
    /// Partition `0..phases.len()` into groups of phase-locked oscillators.
    ///
    /// Every index must appear in exactly one group.
    fn allocate(&self, phases: &[f64], tolerance: f64) -> Result<Vec<Vec<usize>>>;
}

/// Greedy allocation by circular phase distance.
///
/// Oscillator 0 opens the first ensemble. Each following oscillator joins the
/// first ensemble holding a member strictly within `tolerance` of its phase,
/// otherwise it opens a new one.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseEnsembleAllocator;

impl EnsembleAllocator for PhaseEnsembleAllocator {
    fn allocate(&self, phases: &[f64], tolerance: f64) -> Result<Vec<Vec<usize>>> {
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(SyncNetError::InvalidTolerance(tolerance));
        }
        let mut ensembles: Vec<Vec<usize>> = Vec::new();
        for (i, &phase) in phases.iter().enumerate() {
            let home = ensembles
                .iter()
                .position(|e| e.iter().any(|&m| phase_distance(phases[m], phase) < tolerance));
            match home {
                Some(e) => ensembles[e].push(i),
                None => ensembles.push(vec![i]),
            }
        }
        Ok(ensembles)
    }
}

/// Flat label vector from a partition: `labels[i]` is the group of oscillator `i`.
pub fn labels(ensembles: &[Vec<usize>], oscillators: usize) -> Vec<usize> {
    let mut labels = vec![0; oscillators];
    for (label, group) in ensembles.iter().enumerate() {
        for &i in group {
            labels[i] = label;
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::TAU;

    #[test]
    fn test_two_ensembles() {
        let phases = [0.10, 3.00, 0.12, 3.05, 0.09];
        let e = PhaseEnsembleAllocator.allocate(&phases, 0.1).unwrap();
        assert_eq!(e, vec![vec![0, 2, 4], vec![1, 3]]);
        assert_eq!(labels(&e, 5), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_wraparound_counts_as_close() {
        let phases = [0.01, TAU - 0.01];
        let e = PhaseEnsembleAllocator.allocate(&phases, 0.1).unwrap();
        assert_eq!(e, vec![vec![0, 1]]);
    }

    #[test]
    fn test_zero_tolerance_gives_singletons() {
        let phases = [1.0, 1.0, 1.0];
        let e = PhaseEnsembleAllocator.allocate(&phases, 0.0).unwrap();
        assert_eq!(e, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_partition_covers_every_index_once() {
        let phases: Vec<f64> = (0..40).map(|i| (i as f64 * 0.37) % TAU).collect();
        let e = PhaseEnsembleAllocator.allocate(&phases, 0.5).unwrap();
        let mut seen: Vec<usize> = e.into_iter().flatten().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(matches!(
            PhaseEnsembleAllocator.allocate(&[0.0], -1.0),
            Err(SyncNetError::InvalidTolerance(_))
        ));
    }
}
