//! Quantum-network graph metrics and channel estimates.
//!
//! Nodes carry 2D positions; link distance is Euclidean. Channel estimates
//! use the standard telecom-fiber loss figure and a fixed detector model:
//! loss `10^(-0.2·d/10)`, entanglement attempt rate 1 MHz with 10% detection
//! efficiency, fidelity `0.95·e^(-0.1·d)`.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{SimError, SimResult};

/// Fiber attenuation in dB/km.
const FIBER_LOSS_DB_PER_KM: f64 = 0.2;
/// Entanglement attempt rate in Hz.
const ATTEMPT_RATE_HZ: f64 = 1e6;
/// Detector efficiency applied to the channel transmission.
const DETECTION_EFFICIENCY: f64 = 0.1;
/// Fidelity of a zero-length link.
const BASE_FIDELITY: f64 = 0.95;
/// Exponential fidelity decay per km.
const NOISE_FACTOR: f64 = 0.1;

/// A node in the network request.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    /// Node kind (endpoint, repeater, ...). Carried through, not interpreted.
    pub kind: String,
    /// X position in km.
    pub x: f64,
    /// Y position in km.
    pub y: f64,
}

/// An undirected link between two node indices.
#[derive(Debug, Clone, Copy)]
pub struct NetworkLink {
    pub source: usize,
    pub target: usize,
}

/// Whole-graph metrics.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkMetrics {
    /// Distance-weighted average shortest path length over ordered pairs.
    pub avg_path_length: f64,
    /// Average local clustering coefficient.
    pub clustering: f64,
    /// Node count.
    pub num_nodes: usize,
    /// Edge count.
    pub num_edges: usize,
}

/// Per-link channel estimate.
#[derive(Debug, Clone, Serialize)]
pub struct LinkEstimate {
    /// Euclidean link length in km.
    pub distance: f64,
    /// Channel transmission after fiber loss.
    pub channel_loss: f64,
    /// Expected entanglement rate in Hz.
    pub entanglement_rate: f64,
    /// Expected entangled-pair fidelity.
    pub fidelity: f64,
}

/// Result of analyzing one network.
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    pub metrics: NetworkMetrics,
    /// Per-link estimates keyed by (source, target) as given in the request.
    pub links: Vec<(usize, usize, LinkEstimate)>,
}

/// Analyze a network: validate, compute metrics and per-link estimates.
pub fn analyze(nodes: &[NetworkNode], links: &[NetworkLink]) -> SimResult<NetworkAnalysis> {
    if nodes.len() < 2 {
        return Err(SimError::TooFewNodes(nodes.len()));
    }

    let mut graph: UnGraph<usize, f64> = UnGraph::default();
    let indices: Vec<NodeIndex> = (0..nodes.len()).map(|i| graph.add_node(i)).collect();

    let mut estimates = Vec::with_capacity(links.len());
    for link in links {
        for endpoint in [link.source, link.target] {
            if endpoint >= nodes.len() {
                return Err(SimError::InvalidLink {
                    index: endpoint,
                    num_nodes: nodes.len(),
                });
            }
        }
        let a = &nodes[link.source];
        let b = &nodes[link.target];
        let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        graph.add_edge(indices[link.source], indices[link.target], distance);
        estimates.push((link.source, link.target, estimate_link(distance)));
    }

    let metrics = NetworkMetrics {
        avg_path_length: average_shortest_path_length(&graph, &indices)?,
        clustering: average_clustering(&graph, &indices),
        num_nodes: graph.node_count(),
        num_edges: graph.edge_count(),
    };

    Ok(NetworkAnalysis {
        metrics,
        links: estimates,
    })
}

/// Channel estimate for a link of the given length.
pub fn estimate_link(distance: f64) -> LinkEstimate {
    let channel_loss = 10f64.powf(-FIBER_LOSS_DB_PER_KM * distance / 10.0);
    LinkEstimate {
        distance,
        channel_loss,
        entanglement_rate: ATTEMPT_RATE_HZ * channel_loss * DETECTION_EFFICIENCY,
        fidelity: BASE_FIDELITY * (-distance * NOISE_FACTOR).exp(),
    }
}

/// Distance-weighted average shortest path length over all ordered pairs.
///
/// Errors if any pair is unreachable.
fn average_shortest_path_length(
    graph: &UnGraph<usize, f64>,
    indices: &[NodeIndex],
) -> SimResult<f64> {
    let n = indices.len();
    let mut total = 0.0;
    for &start in indices {
        let lengths: FxHashMap<NodeIndex, f64> = dijkstra(graph, start, None, |e| *e.weight())
            .into_iter()
            .collect();
        if lengths.len() < n {
            return Err(SimError::Disconnected);
        }
        total += lengths.values().sum::<f64>();
    }
    Ok(total / (n * (n - 1)) as f64)
}

/// Average local clustering coefficient.
fn average_clustering(graph: &UnGraph<usize, f64>, indices: &[NodeIndex]) -> f64 {
    let n = indices.len();
    let mut total = 0.0;

    for &node in indices {
        let neighbors: Vec<NodeIndex> = graph.neighbors(node).collect();
        let k = neighbors.len();
        if k < 2 {
            continue;
        }
        let mut closed = 0usize;
        for i in 0..k {
            for j in (i + 1)..k {
                if graph.find_edge(neighbors[i], neighbors[j]).is_some() {
                    closed += 1;
                }
            }
        }
        total += closed as f64 / (k * (k - 1) / 2) as f64;
    }

    total / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64) -> NetworkNode {
        NetworkNode {
            kind: "endpoint".to_string(),
            x,
            y,
        }
    }

    fn link(source: usize, target: usize) -> NetworkLink {
        NetworkLink { source, target }
    }

    #[test]
    fn test_triangle_metrics() {
        let nodes = vec![node(0.0, 0.0), node(1.0, 0.0), node(0.0, 1.0)];
        let links = vec![link(0, 1), link(1, 2), link(0, 2)];
        let analysis = analyze(&nodes, &links).unwrap();

        assert_eq!(analysis.metrics.num_nodes, 3);
        assert_eq!(analysis.metrics.num_edges, 3);
        // Every node's neighbors are linked.
        assert!((analysis.metrics.clustering - 1.0).abs() < 1e-10);
        // Paths: two of length 1, one pair via the diagonal of length √2.
        let expected = (1.0 + 1.0 + 2f64.sqrt()) / 3.0;
        assert!((analysis.metrics.avg_path_length - expected).abs() < 1e-10);
    }

    #[test]
    fn test_line_has_zero_clustering() {
        let nodes = vec![node(0.0, 0.0), node(1.0, 0.0), node(2.0, 0.0)];
        let links = vec![link(0, 1), link(1, 2)];
        let analysis = analyze(&nodes, &links).unwrap();
        assert_eq!(analysis.metrics.clustering, 0.0);
    }

    #[test]
    fn test_disconnected_graph_rejected() {
        let nodes = vec![node(0.0, 0.0), node(1.0, 0.0), node(5.0, 5.0)];
        let links = vec![link(0, 1)];
        assert!(matches!(
            analyze(&nodes, &links),
            Err(SimError::Disconnected)
        ));
    }

    #[test]
    fn test_invalid_link_rejected() {
        let nodes = vec![node(0.0, 0.0), node(1.0, 0.0)];
        let links = vec![link(0, 5)];
        assert!(matches!(
            analyze(&nodes, &links),
            Err(SimError::InvalidLink { index: 5, .. })
        ));
    }

    #[test]
    fn test_link_estimates_decay_with_distance() {
        let short = estimate_link(1.0);
        let long = estimate_link(50.0);
        assert!(short.channel_loss > long.channel_loss);
        assert!(short.entanglement_rate > long.entanglement_rate);
        assert!(short.fidelity > long.fidelity);
        // 50 km at 0.2 dB/km is 10 dB, i.e. 10% transmission.
        assert!((long.channel_loss - 0.1).abs() < 1e-10);
    }
}
