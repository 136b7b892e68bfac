//! BB84 key distribution endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};

use qlab_sim::bb84::{self, Bb84Config};

use crate::dto::{Bb84Request, Bb84Response, SampleBits};
use crate::error::ApiError;
use crate::state::AppState;

/// Largest accepted protocol run.
const MAX_QUBITS: usize = 1_000_000;

/// POST /api/quantum/bb84/simulate - Run the BB84 protocol.
pub async fn simulate(
    State(_state): State<Arc<AppState>>,
    Json(req): Json<Bb84Request>,
) -> Result<Json<Bb84Response>, ApiError> {
    if req.num_qubits == 0 || req.num_qubits > MAX_QUBITS {
        return Err(ApiError::BadRequest(format!(
            "num_qubits must be between 1 and {MAX_QUBITS}"
        )));
    }
    if !(0.0..=1.0).contains(&req.error_rate) {
        return Err(ApiError::BadRequest(
            "error_rate must be between 0 and 1".to_string(),
        ));
    }

    let outcome = bb84::simulate(&Bb84Config {
        num_qubits: req.num_qubits,
        channel_error_rate: req.error_rate,
        eavesdropping: req.eavesdropping,
    });

    Ok(Json(Bb84Response {
        key_rate: outcome.key_rate,
        error_rate: outcome.error_rate,
        secure: outcome.secure,
        final_key_length: outcome.final_key_length,
        sample_bits: SampleBits {
            alice: outcome.alice_sample,
            bob: outcome.bob_sample,
        },
    }))
}
