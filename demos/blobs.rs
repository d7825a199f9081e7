//! # Blob clustering demo
//!
//! Places three noisy blobs in the plane, couples oscillators within a radius,
//! runs the network to synchronization and prints the phase-locked clusters.
//! Shows the radius sweep: too small isolates every point, too large merges
//! every blob into one cluster.
//!
//! ```bash
//! cargo run --example blobs
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use syncnet_core::ensemble::labels;
use syncnet_core::render::{show_network, NetworkRenderer};
use syncnet_core::{ConnectionRepresentation, SolveType, SyncNetConfig, SyncNetwork};

// ── Sample ────────────────────────────────────────────────────────────────────

/// Points on a jittered ring around the centre.
fn blob(cx: f64, cy: f64, n: usize, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            let r = rng.gen_range(0.3..0.5);
            vec![cx + r * t.cos(), cy + r * t.sin()]
        })
        .collect()
}

// ── Display helpers ───────────────────────────────────────────────────────────

fn bar(v: f64) -> String {
    let filled = (v * 20.0).round() as usize;
    let empty = 20usize.saturating_sub(filled);
    format!("[{}{}] {:.3}", "█".repeat(filled), "░".repeat(empty), v)
}

/// Counts what would be drawn; a real renderer would plot here.
#[derive(Default)]
struct EdgeCounter {
    points: usize,
    edges: usize,
}

impl NetworkRenderer for EdgeCounter {
    fn draw_oscillator(&mut self, _index: usize, _position: &[f64]) {
        self.points += 1;
    }

    fn draw_connection(&mut self, _from: &[f64], _to: &[f64]) {
        self.edges += 1;
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║  Oscillatory network clustering — three blobs, radius sweep          ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");

    let mut rng = SmallRng::seed_from_u64(42);
    let mut sample = blob(0.0, 0.0, 8, &mut rng);
    sample.extend(blob(4.0, 0.0, 8, &mut rng));
    sample.extend(blob(2.0, 3.5, 8, &mut rng));

    let config = SyncNetConfig {
        representation: ConnectionRepresentation::List,
        ..SyncNetConfig::default()
    };
    let mut network = match SyncNetwork::from_points(sample, config) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("cannot build network: {e}");
            return;
        }
    };

    for radius in [0.05, 1.0, 5.0] {
        let dynamic = match network.process(Some(radius), 0.998, SolveType::Rk4, false) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("radius {radius}: {e}");
                continue;
            }
        };
        let time = dynamic.last().map_or(0.0, |(t, _)| t);
        println!(
            "  radius {:<5} order {} t={:<6.1} stop={:?}",
            radius,
            bar(dynamic.final_order),
            time,
            dynamic.stop_reason,
        );

        let mut counter = EdgeCounter::default();
        if let Err(e) = show_network(&network, &mut counter) {
            eprintln!("  render: {e}");
        }

        match network.get_clusters(0.1) {
            Ok(clusters) => {
                println!("    {} oscillators, {} connections, {} clusters", counter.points, counter.edges, clusters.len());
                for (k, c) in clusters.iter().enumerate().take(5) {
                    println!("    cluster {k}: {c:?}");
                }
                println!("    labels: {:?}", labels(&clusters, network.oscillator_count()));
            }
            Err(e) => eprintln!("  clusters: {e}"),
        }
        println!();
    }
}
