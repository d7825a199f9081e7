/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Sample store: one coordinate vector per oscillator.
//!
//! Points are fixed at construction. Every point must have the dimension of
//! the first one; the store never holds a ragged sample.
//!
//! # Text format
//!
//! ```text
//! 0.0 0.0
//! 0.0 1.0
//! 5.0 5.0
//! ```
//!
//! One point per line, one whitespace-delimited float per dimension. Blank
//! lines are skipped.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::{Result, SyncNetError};

/// Euclidean distance between two points of equal dimension.
///
/// Extra coordinates of the longer slice are ignored; the store guarantees
/// equal lengths for every pair it hands out.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    let sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
    libm::sqrt(sq)
}

/// Immutable set of oscillator positions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleStore {
    points: Vec<Vec<f64>>,
    dimension: usize,
}

impl SampleStore {
    /// Wrap a sample, checking that it is non-empty, not ragged and finite.
    pub fn new(points: Vec<Vec<f64>>) -> Result<Self> {
        let dimension = points.first().ok_or(SyncNetError::EmptySample)?.len();
        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dimension) {
            return Err(SyncNetError::InconsistentDimension {
                index,
                expected: dimension,
                found: p.len(),
            });
        }
        for (index, p) in points.iter().enumerate() {
            if let Some(&value) = p.iter().find(|c| !c.is_finite()) {
                return Err(SyncNetError::NonFiniteCoordinate { index, value });
            }
        }
        Ok(Self { points, dimension })
    }

    /// Parse a whitespace-delimited sample (see the module docs).
    pub fn from_text(text: &str) -> Result<Self> {
        let mut points = Vec::new();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let point = line
                .split_whitespace()
                .map(|token| match token.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(SyncNetError::Parse { line: n + 1, token: token.to_string() }),
                })
                .collect::<Result<Vec<f64>>>()?;
            points.push(point);
        }
        Self::new(points)
    }

    /// Read a sample from any buffered reader.
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(mut reader: R) -> Result<Self> {
        let mut text = alloc::string::String::new();
        reader.read_to_string(&mut text)?;
        Self::from_text(&text)
    }

    /// Read a sample file.
    #[cfg(feature = "std")]
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Number of points (oscillators).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: an empty sample is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension shared by every point.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point `index`.
    pub fn point(&self, index: usize) -> &[f64] {
        &self.points[index]
    }

    /// All points in oscillator order.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Euclidean distance between points `i` and `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        euclidean_distance(&self.points[i], &self.points[j])
    }
}
