/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Radius connectivity between oscillators and optional distance weighting.
//!
//! Two oscillators are coupled when the Euclidean distance between their
//! sample points is at most the connectivity radius. The coupling graph is
//! stored either as a dense matrix or as per-oscillator neighbour lists;
//! callers only see the [`Adjacency`] capability.
//!
//! # Invariants
//!
//! - Connectivity is symmetric and has no self-loops.
//! - `i` is connected to `j` iff `distance(i, j) <= radius`.
//! - Coupling weights are defined for every pair `i != j` (connected or not),
//!   are symmetric with a zero diagonal, and span exactly [0.0, 1.0] after
//!   normalisation. When every pairwise distance is equal all off-diagonal
//!   weights are 1.0.
//! - A build fully replaces the previous topology; nothing accumulates.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use hashbrown::HashSet;

use crate::error::{Result, SyncNetError};
use crate::sample::SampleStore;

// ─── Representation choice ──────────────────────────────────────────────────

/// How the coupling graph is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionRepresentation {
    /// Dense N×N boolean matrix. O(N²) memory, O(1) neighbour test.
    #[default]
    Matrix,
    /// One neighbour list per oscillator. O(N + E) memory, O(degree) test.
    List,
}

impl fmt::Display for ConnectionRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matrix => f.write_str("matrix"),
            Self::List => f.write_str("list"),
        }
    }
}

impl FromStr for ConnectionRepresentation {
    type Err = SyncNetError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.eq_ignore_ascii_case("matrix") {
            Ok(Self::Matrix)
        } else if name.eq_ignore_ascii_case("list") {
            Ok(Self::List)
        } else {
            Err(SyncNetError::UnsupportedRepresentation(s.to_string()))
        }
    }
}

/// Numeric codes: 0 = matrix, 1 = list.
impl TryFrom<u32> for ConnectionRepresentation {
    type Error = SyncNetError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::Matrix),
            1 => Ok(Self::List),
            other => Err(SyncNetError::UnsupportedRepresentation(other.to_string())),
        }
    }
}

// ─── Adjacency capability ───────────────────────────────────────────────────

/// Neighbour query / connect-pair capability shared by both representations.
pub trait Adjacency {
    /// Number of oscillators the structure was sized for.
    fn oscillator_count(&self) -> usize;

    /// Couple `i` and `j` in both directions. Self-loops are ignored.
    fn connect(&mut self, i: usize, j: usize);

    /// `true` if `i` and `j` are coupled. Out-of-range indices are never coupled.
    fn has_connection(&self, i: usize, j: usize) -> bool;

    /// Neighbours of oscillator `i`. Empty when `i` is out of range.
    fn neighbors(&self, i: usize) -> Neighbors<'_>;

    /// Number of neighbours of oscillator `i`.
    fn degree(&self, i: usize) -> usize {
        self.neighbors(i).count()
    }

    /// Number of undirected connections.
    fn edge_count(&self) -> usize {
        (0..self.oscillator_count()).map(|i| self.degree(i)).sum::<usize>() / 2
    }
}

/// Iterator over the neighbours of one oscillator.
#[derive(Clone, Debug)]
pub enum Neighbors<'a> {
    /// Scan of one matrix row.
    Row {
        /// The row being scanned.
        row: &'a [bool],
        /// Next column to inspect.
        next: usize,
    },
    /// Walk of one neighbour list.
    List(core::slice::Iter<'a, usize>),
}

impl Iterator for Neighbors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Neighbors::Row { row, next } => {
                while *next < row.len() {
                    let j = *next;
                    *next += 1;
                    if row[j] {
                        return Some(j);
                    }
                }
                None
            }
            Neighbors::List(iter) => iter.next().copied(),
        }
    }
}

// ─── Dense matrix ───────────────────────────────────────────────────────────

/// Dense symmetric boolean adjacency, row-major with row stride `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Fully disconnected matrix for `n` oscillators.
    pub fn new(n: usize) -> Self {
        Self { n, cells: vec![false; n * n] }
    }
}

impl Adjacency for AdjacencyMatrix {
    fn oscillator_count(&self) -> usize {
        self.n
    }

    fn connect(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.cells[i * self.n + j] = true;
        self.cells[j * self.n + i] = true;
    }

    fn has_connection(&self, i: usize, j: usize) -> bool {
        i < self.n && j < self.n && self.cells[i * self.n + j]
    }

    fn neighbors(&self, i: usize) -> Neighbors<'_> {
        let row: &[bool] = if i < self.n { &self.cells[i * self.n..(i + 1) * self.n] } else { &[] };
        Neighbors::Row { row, next: 0 }
    }

    fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count() / 2
    }
}

// ─── Neighbour lists ────────────────────────────────────────────────────────

/// Per-oscillator neighbour lists.
///
/// Equality compares neighbour *membership*; the order inside a list is not
/// significant.
#[derive(Clone, Debug)]
pub struct AdjacencyList {
    lists: Vec<Vec<usize>>,
}

impl AdjacencyList {
    /// Fully disconnected lists for `n` oscillators.
    pub fn new(n: usize) -> Self {
        Self { lists: vec![Vec::new(); n] }
    }
}

impl PartialEq for AdjacencyList {
    fn eq(&self, other: &Self) -> bool {
        self.lists.len() == other.lists.len()
            && self.lists.iter().zip(other.lists.iter()).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
            })
    }
}

impl Eq for AdjacencyList {}

impl Adjacency for AdjacencyList {
    fn oscillator_count(&self) -> usize {
        self.lists.len()
    }

    fn connect(&mut self, i: usize, j: usize) {
        if i == j || self.lists[i].contains(&j) {
            return;
        }
        self.lists[i].push(j);
        self.lists[j].push(i);
    }

    fn has_connection(&self, i: usize, j: usize) -> bool {
        self.lists.get(i).is_some_and(|row| row.contains(&j))
    }

    fn neighbors(&self, i: usize) -> Neighbors<'_> {
        Neighbors::List(self.lists.get(i).map_or(&[][..], Vec::as_slice).iter())
    }

    fn degree(&self, i: usize) -> usize {
        self.lists.get(i).map_or(0, Vec::len)
    }
}

// ─── Tagged connectivity ────────────────────────────────────────────────────

/// Coupling graph in whichever representation was configured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connectivity {
    /// Dense matrix storage.
    Matrix(AdjacencyMatrix),
    /// Neighbour list storage.
    List(AdjacencyList),
}

impl Connectivity {
    /// Empty (fully disconnected) graph for `n` oscillators.
    pub fn disconnected(representation: ConnectionRepresentation, n: usize) -> Self {
        match representation {
            ConnectionRepresentation::Matrix => Self::Matrix(AdjacencyMatrix::new(n)),
            ConnectionRepresentation::List => Self::List(AdjacencyList::new(n)),
        }
    }

    /// Which representation backs this graph.
    pub fn representation(&self) -> ConnectionRepresentation {
        match self {
            Self::Matrix(_) => ConnectionRepresentation::Matrix,
            Self::List(_) => ConnectionRepresentation::List,
        }
    }

    /// Every connection once, as `(i, j)` with `i < j`, in ascending order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = (0..self.oscillator_count())
            .flat_map(|i| self.neighbors(i).filter(move |&j| i < j).map(move |j| (i, j)))
            .collect();
        edges.sort_unstable();
        edges
    }
}

impl Adjacency for Connectivity {
    fn oscillator_count(&self) -> usize {
        match self {
            Self::Matrix(m) => m.oscillator_count(),
            Self::List(l) => l.oscillator_count(),
        }
    }

    fn connect(&mut self, i: usize, j: usize) {
        match self {
            Self::Matrix(m) => m.connect(i, j),
            Self::List(l) => l.connect(i, j),
        }
    }

    fn has_connection(&self, i: usize, j: usize) -> bool {
        match self {
            Self::Matrix(m) => m.has_connection(i, j),
            Self::List(l) => l.has_connection(i, j),
        }
    }

    fn neighbors(&self, i: usize) -> Neighbors<'_> {
        match self {
            Self::Matrix(m) => m.neighbors(i),
            Self::List(l) => l.neighbors(i),
        }
    }

    fn degree(&self, i: usize) -> usize {
        match self {
            Self::Matrix(m) => m.degree(i),
            Self::List(l) => l.degree(i),
        }
    }

    fn edge_count(&self) -> usize {
        match self {
            Self::Matrix(m) => m.edge_count(),
            Self::List(l) => l.edge_count(),
        }
    }
}

// ─── Coupling weights ───────────────────────────────────────────────────────

/// Dense symmetric matrix of normalised coupling strengths in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct CouplingWeights {
    n: usize,
    values: Vec<f64>,
}

impl CouplingWeights {
    /// Weight between oscillators `i` and `j` (0.0 on the diagonal and for
    /// out-of-range indices).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i < self.n && j < self.n {
            self.values[i * self.n + j]
        } else {
            0.0
        }
    }

    /// Number of oscillators.
    pub fn oscillator_count(&self) -> usize {
        self.n
    }

    fn set_pair(&mut self, i: usize, j: usize, w: f64) {
        self.values[i * self.n + j] = w;
        self.values[j * self.n + i] = w;
    }
}

// ─── Builder ────────────────────────────────────────────────────────────────

/// Connectivity (and optional weights) built for one radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    /// Radius the graph was built with.
    pub radius: f64,
    /// The coupling graph.
    pub connectivity: Connectivity,
    /// Normalised pairwise weights, present only when weighting is enabled.
    pub weights: Option<CouplingWeights>,
}

/// Build the radius graph over `sample`.
///
/// Each unordered pair is visited once. With `weighting` on, raw distances are
/// stored for every pair and then rescaled to `(d - min) / (max - min)`. The
/// min and max range over pairs `i < j` only, so the zero self-distances never
/// count.
pub fn build(
    sample: &SampleStore,
    radius: f64,
    representation: ConnectionRepresentation,
    weighting: bool,
) -> Result<Topology> {
    if radius.is_nan() || radius < 0.0 {
        return Err(SyncNetError::InvalidRadius(radius));
    }

    let n = sample.len();
    let mut connectivity = Connectivity::disconnected(representation, n);
    let mut weights = weighting.then(|| CouplingWeights { n, values: vec![0.0; n * n] });

    let mut min_distance = f64::INFINITY;
    let mut max_distance = 0.0_f64;

    for i in 0..n {
        for j in (i + 1)..n {
            let d = sample.distance(i, j);
            if let Some(w) = weights.as_mut() {
                w.set_pair(i, j, d);
                min_distance = min_distance.min(d);
                max_distance = max_distance.max(d);
            }
            if d <= radius {
                connectivity.connect(i, j);
            }
        }
    }

    if let Some(w) = weights.as_mut() {
        normalize(w, min_distance, max_distance);
    }

    tracing::debug!(
        oscillators = n,
        radius,
        representation = %representation,
        edges = connectivity.edge_count(),
        weighting,
        "connectivity built"
    );

    Ok(Topology { radius, connectivity, weights })
}

fn normalize(w: &mut CouplingWeights, min: f64, max: f64) {
    let n = w.n;
    if n < 2 {
        return;
    }
    if max == min {
        tracing::warn!(distance = max, "all pairwise distances equal; coupling weights set to 1.0");
        for i in 0..n {
            for j in (i + 1)..n {
                w.set_pair(i, j, 1.0);
            }
        }
        return;
    }
    let span = max - min;
    for i in 0..n {
        for j in (i + 1)..n {
            let scaled = (w.get(i, j) - min) / span;
            w.set_pair(i, j, scaled);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn four_points() -> SampleStore {
        SampleStore::new(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![5.0, 5.0],
            vec![5.0, 6.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_two_pairs_at_radius_1_5() {
        for repr in [ConnectionRepresentation::Matrix, ConnectionRepresentation::List] {
            let t = build(&four_points(), 1.5, repr, false).unwrap();
            assert_eq!(t.connectivity.edges(), vec![(0, 1), (2, 3)], "{repr}");
            assert!(!t.connectivity.has_connection(0, 2));
            assert!(!t.connectivity.has_connection(1, 3));
            assert!(t.weights.is_none());
        }
    }

    #[test]
    fn test_radius_zero_isolates_everything() {
        let t = build(&four_points(), 0.0, ConnectionRepresentation::List, false).unwrap();
        assert_eq!(t.connectivity.edge_count(), 0);
        for i in 0..4 {
            assert_eq!(t.connectivity.degree(i), 0);
        }
    }

    #[test]
    fn test_boundary_distance_is_inclusive() {
        let t = build(&four_points(), 1.0, ConnectionRepresentation::Matrix, false).unwrap();
        assert!(t.connectivity.has_connection(0, 1));
        assert!(t.connectivity.has_connection(3, 2));
    }

    #[test]
    fn test_negative_or_nan_radius_rejected() {
        let s = four_points();
        assert!(matches!(
            build(&s, -0.1, ConnectionRepresentation::Matrix, false),
            Err(SyncNetError::InvalidRadius(_))
        ));
        assert!(build(&s, f64::NAN, ConnectionRepresentation::Matrix, false).is_err());
    }

    #[test]
    fn test_collinear_weights_span_unit_interval() {
        // Reference at 0, others at distance 1 and 2: pair distances 1, 2, 1.
        let s = SampleStore::new(vec![vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let t = build(&s, 10.0, ConnectionRepresentation::Matrix, true).unwrap();
        let w = t.weights.unwrap();
        assert_eq!(w.get(0, 1), 0.0);
        assert_eq!(w.get(1, 2), 0.0);
        assert_eq!(w.get(0, 2), 1.0);
        assert_eq!(w.get(2, 0), 1.0);
        for i in 0..3 {
            assert_eq!(w.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_weights_defined_for_unconnected_pairs() {
        let t = build(&four_points(), 1.5, ConnectionRepresentation::Matrix, true).unwrap();
        let w = t.weights.unwrap();
        assert!(!t.connectivity.has_connection(0, 3));
        // (0,3) is the farthest pair.
        assert!((w.get(0, 3) - 1.0).abs() < 1e-12);
        assert!(w.get(0, 2) > 0.0 && w.get(0, 2) < 1.0);
    }

    #[test]
    fn test_equal_distances_give_unit_weights() {
        let s = SampleStore::new(vec![vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let t = build(&s, 0.5, ConnectionRepresentation::List, true).unwrap();
        let w = t.weights.unwrap();
        assert_eq!(w.get(0, 1), 1.0);
        assert_eq!(w.get(0, 0), 0.0);
    }

    #[test]
    fn test_single_point_weights_stay_zero() {
        let s = SampleStore::new(vec![vec![1.0, 2.0]]).unwrap();
        let t = build(&s, 3.0, ConnectionRepresentation::Matrix, true).unwrap();
        assert_eq!(t.weights.unwrap().get(0, 0), 0.0);
        assert_eq!(t.connectivity.edge_count(), 0);
    }

    #[test]
    fn test_list_equality_ignores_order() {
        let mut a = AdjacencyList::new(3);
        a.connect(0, 1);
        a.connect(0, 2);
        let mut b = AdjacencyList::new(3);
        b.connect(0, 2);
        b.connect(1, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_connect_is_symmetric_and_ignores_self_loops() {
        let mut m = Connectivity::disconnected(ConnectionRepresentation::Matrix, 3);
        m.connect(1, 1);
        m.connect(2, 0);
        assert!(!m.has_connection(1, 1));
        assert!(m.has_connection(0, 2) && m.has_connection(2, 0));
        assert_eq!(m.neighbors(0).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_representation_parsing() {
        assert_eq!("List".parse::<ConnectionRepresentation>().unwrap(), ConnectionRepresentation::List);
        assert_eq!(ConnectionRepresentation::try_from(0).unwrap(), ConnectionRepresentation::Matrix);
        assert!(matches!(
            "bitmap".parse::<ConnectionRepresentation>(),
            Err(SyncNetError::UnsupportedRepresentation(_))
        ));
        assert!(ConnectionRepresentation::try_from(7).is_err());
    }

    #[test]
    fn test_out_of_range_queries_agree_across_representations() {
        for repr in [ConnectionRepresentation::Matrix, ConnectionRepresentation::List] {
            let t = build(&four_points(), 1.5, repr, true).unwrap();
            let c = &t.connectivity;
            assert!(c.has_connection(1, 0));
            assert!(!c.has_connection(0, 4), "{repr}");
            assert!(!c.has_connection(4, 0), "{repr}");
            assert!(!c.has_connection(9, 9), "{repr}");
            assert_eq!(c.neighbors(4).count(), 0);
            assert_eq!(c.degree(4), 0);

            let w = t.weights.as_ref().unwrap();
            assert!(w.get(3, 0) > 0.0);
            assert_eq!(w.get(0, 4), 0.0);
            assert_eq!(w.get(4, 0), 0.0);
        }
    }
}
