//! Quantum network simulation endpoint.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, extract::State};

use qlab_sim::network::{self, NetworkLink, NetworkNode};

use crate::dto::{NetworkRequest, NetworkSimResponse, QuantumMetrics};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/quantum/network/simulate - Graph metrics plus per-link
/// loss/rate/fidelity estimates.
pub async fn simulate(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<NetworkRequest>,
) -> Result<Json<NetworkSimResponse>, ApiError> {
    let nodes: Vec<NetworkNode> = req
        .nodes
        .iter()
        .map(|n| NetworkNode {
            kind: n.kind.clone(),
            x: n.position.x,
            y: n.position.y,
        })
        .collect();
    let links: Vec<NetworkLink> = req
        .connections
        .iter()
        .map(|c| NetworkLink {
            source: c.source,
            target: c.target,
        })
        .collect();

    let analysis = network::analyze(&nodes, &links)?;

    let mut entanglement_rates = BTreeMap::new();
    let mut fidelities = BTreeMap::new();
    for (source, target, estimate) in &analysis.links {
        let key = format!("{source}-{target}");
        entanglement_rates.insert(key.clone(), estimate.entanglement_rate);
        fidelities.insert(key, estimate.fidelity);
    }

    Ok(Json(NetworkSimResponse {
        network_metrics: analysis.metrics,
        quantum_metrics: QuantumMetrics {
            entanglement_rates,
            fidelities,
        },
    }))
}
