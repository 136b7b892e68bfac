//! Photonic script execution endpoints.
//!
//! Both endpoints run the caller's script through the capture executor with
//! the photonic binding set; script faults come back in the body, never as
//! HTTP errors.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::debug;

use qlab_exec::{BindingSet, ExecLimits, ResultFilter, execute};
use qlab_render::{Figure, circuit_diagram, to_base64};

use crate::dto::{
    CodeRequest, PhotonicExecuteResponse, PhotonicVisualizeResponse, unitary_to_rows,
};
use crate::error::ApiError;
use crate::state::AppState;

fn limits(state: &AppState) -> ExecLimits {
    ExecLimits {
        timeout: Some(state.config.exec_timeout),
    }
}

/// POST /api/quantum/photonic/execute - Run a photonic script and return
/// captured output, plots and the produced circuit's unitary.
pub async fn execute_code(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<PhotonicExecuteResponse>, ApiError> {
    let outcome = execute(
        &req.code,
        &BindingSet::photonic(),
        &ResultFilter::photonic(),
        &limits(&state),
    );
    debug!(
        plots = outcome.plots.len(),
        has_circuit = outcome.circuit.is_some(),
        "photonic execute finished"
    );

    Ok(Json(PhotonicExecuteResponse {
        stdout: outcome.stdout,
        stderr: outcome.stderr,
        plots: outcome.plots,
        unitary: outcome.unitary.as_ref().map(unitary_to_rows),
    }))
}

/// POST /api/quantum/photonic/visualize - Run a photonic script and return
/// circuit/state images instead of raw capture.
pub async fn visualize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CodeRequest>,
) -> Result<Json<PhotonicVisualizeResponse>, ApiError> {
    let outcome = execute(
        &req.code,
        &BindingSet::photonic(),
        &ResultFilter::photonic(),
        &limits(&state),
    );

    let mut error_text = outcome.stderr.clone();

    let circuit_visualization = outcome.circuit.as_ref().and_then(|circuit| {
        match circuit_diagram(circuit) {
            Ok(png) => Some(to_base64(&png)),
            Err(e) => {
                error_text.push_str(&format!("Error visualizing circuit: {e}\n"));
                None
            }
        }
    });

    // State chart only when both a circuit and a state were produced, like
    // the probability view is defined. Falls back to a plain amplitude
    // chart if the probability rendering fails.
    let state_visualization = match (&outcome.circuit, &outcome.state) {
        (Some(_), Some(state)) => match probability_chart(state) {
            Ok(png) => Some(to_base64(&png)),
            Err(e) => {
                error_text.push_str(&format!("Error generating state probabilities: {e}\n"));
                match amplitude_chart(state) {
                    Ok(png) => Some(to_base64(&png)),
                    Err(e2) => {
                        error_text.push_str(&format!("Error in fallback visualization: {e2}\n"));
                        None
                    }
                }
            }
        },
        _ => None,
    };

    Ok(Json(PhotonicVisualizeResponse {
        circuit_visualization,
        state_visualization,
        error: if error_text.is_empty() {
            None
        } else {
            Some(error_text)
        },
    }))
}

/// Bar chart of output-state probabilities.
fn probability_chart(state: &qlab_sim::Statevector) -> Result<Vec<u8>, qlab_render::RenderError> {
    let mut figure = Figure::new();
    figure.bar(state.probabilities());
    figure.render_png()
}

/// Simplified fallback: amplitude magnitudes as a line.
fn amplitude_chart(state: &qlab_sim::Statevector) -> Result<Vec<u8>, qlab_render::RenderError> {
    let magnitudes: Vec<f64> = state.amplitudes().iter().map(|a| a.norm()).collect();
    let xs: Vec<f64> = (0..magnitudes.len()).map(|i| i as f64).collect();
    let mut figure = Figure::new();
    figure.line(xs, magnitudes);
    figure.render_png()
}
