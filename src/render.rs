//! Rendering interface for 2-D and 3-D networks.
//!
//! Drawing itself belongs to the caller's [`NetworkRenderer`]; this module only
//! decides what gets drawn. Networks in any other dimension are refused before
//! anything is drawn.

use crate::connectivity::Adjacency;
use crate::error::{Result, SyncNetError};
use crate::network::SyncNetwork;

/// Drawing surface supplied by the caller.
pub trait NetworkRenderer {
    /// Draw oscillator `index` at `position` (2 or 3 coordinates).
    fn draw_oscillator(&mut self, index: usize, position: &[f64]);

    /// Draw the connection between two oscillator positions.
    fn draw_connection(&mut self, from: &[f64], to: &[f64]);
}

/// Draw every oscillator, then every connection exactly once (`i < j`).
///
/// Returns the number of connections drawn. An unbuilt network draws points only.
pub fn show_network<E, A, R: NetworkRenderer>(network: &SyncNetwork<E, A>, renderer: &mut R) -> Result<usize> {
    let dimension = network.sample().dimension();
    if dimension != 2 && dimension != 3 {
        return Err(SyncNetError::Dimensionality { dimension });
    }

    let positions = network.positions();
    for (i, p) in positions.iter().enumerate() {
        renderer.draw_oscillator(i, p);
    }

    let Some(topology) = network.topology() else {
        return Ok(0);
    };
    let mut drawn = 0;
    for i in 0..positions.len() {
        for j in topology.connectivity.neighbors(i).filter(|&j| j > i) {
            renderer.draw_connection(&positions[i], &positions[j]);
            drawn += 1;
        }
    }
    Ok(drawn)
}
