//! Photonic circuit simulation endpoint.
//!
//! Maps a component-and-connection description onto a qubit circuit (one
//! wire per component), simulates it, and renders both a probability chart
//! and a chip-layout view.

use std::sync::Arc;

use axum::{Json, extract::State};

use qlab_ir::{Circuit, QubitId};
use qlab_render::{ComponentKind, Figure, Layout, to_base64};
use qlab_sim::Statevector;

use crate::dto::{CircuitSimResponse, ComplexNumber, PhotonicCircuitRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// Canvas-to-micron scale for layout placement.
const POSITION_SCALE: f64 = 0.1;

/// POST /api/quantum/circuit/simulate - Simulate a photonic circuit.
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PhotonicCircuitRequest>,
) -> Result<Json<CircuitSimResponse>, ApiError> {
    if req.components.is_empty() {
        return Err(ApiError::BadRequest(
            "circuit needs at least one component".to_string(),
        ));
    }
    if req.components.len() > state.config.max_circuit_components {
        return Err(ApiError::BadRequest(format!(
            "circuit has {} components, the limit is {}",
            req.components.len(),
            state.config.max_circuit_components
        )));
    }

    let circuit = build_circuit(&req)?;
    let sv = Statevector::from_circuit(&circuit);
    let probabilities = sv.probabilities();

    // Probability bar chart
    let mut figure = Figure::new();
    figure.bar(probabilities.clone());
    let state_visualization = to_base64(&figure.render_png()?);

    // Chip layout view
    let layout = build_layout(&req)?;
    let gds_layout = to_base64(&layout.render_png(800, 600)?);

    Ok(Json(CircuitSimResponse {
        state: sv.amplitudes().iter().copied().map(ComplexNumber::from).collect(),
        probabilities,
        state_visualization,
        gds_layout,
        success: true,
    }))
}

/// One qubit per component: sources prepare superpositions, beam splitters
/// become Y rotations by the transmittivity angle, phase shifters become
/// phase gates, connections entangle via CNOT.
fn build_circuit(req: &PhotonicCircuitRequest) -> Result<Circuit, ApiError> {
    let mut circuit = Circuit::try_with_size("photonic", req.components.len() as u32)?;

    for (idx, component) in req.components.iter().enumerate() {
        let qubit = QubitId::from(idx);
        match component.kind.as_str() {
            "source" => {
                circuit.h(qubit)?;
            }
            "beamsplitter" => {
                let transmittivity = component
                    .params
                    .get("transmittivity")
                    .copied()
                    .unwrap_or(0.5)
                    .clamp(0.0, 1.0);
                let theta = transmittivity.sqrt().acos();
                circuit.ry(2.0 * theta, qubit)?;
            }
            "phaseshift" => {
                let phase = component.params.get("phase").copied().unwrap_or(0.0);
                circuit.phase(phase, qubit)?;
            }
            "detector" | "straight" | "taper" => {
                // Passive at the gate level.
            }
            other => {
                return Err(ApiError::BadRequest(format!(
                    "unknown component type '{other}'"
                )));
            }
        }
    }

    for conn in &req.connections {
        for endpoint in [conn.source, conn.target] {
            if endpoint >= req.components.len() {
                return Err(ApiError::BadRequest(format!(
                    "connection endpoint {endpoint} out of range"
                )));
            }
        }
        circuit.cx(QubitId::from(conn.source), QubitId::from(conn.target))?;
    }

    Ok(circuit)
}

/// Place each component on the chip at its (scaled) canvas position and
/// route the connections.
fn build_layout(req: &PhotonicCircuitRequest) -> Result<Layout, ApiError> {
    let mut layout = Layout::new("photonic_circuit");
    for component in &req.components {
        let kind = ComponentKind::from_name(&component.kind)?;
        layout.add(
            kind,
            component.position.x * POSITION_SCALE,
            component.position.y * POSITION_SCALE,
        );
    }
    for conn in &req.connections {
        layout.route(conn.source, conn.target)?;
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{Connection, PhotonicComponent, Position};
    use std::collections::HashMap;

    fn component(kind: &str, x: f64) -> PhotonicComponent {
        PhotonicComponent {
            kind: kind.to_string(),
            params: HashMap::new(),
            position: Position { x, y: 0.0 },
        }
    }

    #[test]
    fn test_source_and_connection_build_bell_pair() {
        let req = PhotonicCircuitRequest {
            components: vec![component("source", 0.0), component("detector", 100.0)],
            connections: vec![Connection {
                source: 0,
                target: 1,
            }],
        };
        let circuit = build_circuit(&req).unwrap();
        assert_eq!(circuit.num_qubits(), 2);

        let probs = Statevector::from_circuit(&circuit).probabilities();
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!((probs[3] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_unknown_component_rejected() {
        let req = PhotonicCircuitRequest {
            components: vec![component("laser", 0.0)],
            connections: vec![],
        };
        assert!(matches!(
            build_circuit(&req),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_out_of_range_connection_rejected() {
        let req = PhotonicCircuitRequest {
            components: vec![component("source", 0.0)],
            connections: vec![Connection {
                source: 0,
                target: 9,
            }],
        };
        assert!(matches!(
            build_circuit(&req),
            Err(ApiError::BadRequest(_))
        ));
    }
}
