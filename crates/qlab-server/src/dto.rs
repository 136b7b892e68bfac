//! Data Transfer Objects for the server API.
//!
//! These types bridge internal QLab structures to JSON request/response
//! bodies. Field names follow the frontend's wire contract.

use std::collections::{BTreeMap, HashMap};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use qlab_sim::network::NetworkMetrics;
use qlab_sim::sweep::SweepResult;

// ============================================================================
// Shared pieces
// ============================================================================

/// A 2D position.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// An index pair connecting two request entities.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Connection {
    pub source: usize,
    pub target: usize,
}

/// A complex number split for JSON.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ComplexNumber {
    pub real: f64,
    pub imag: f64,
}

impl From<Complex64> for ComplexNumber {
    fn from(c: Complex64) -> Self {
        Self {
            real: c.re,
            imag: c.im,
        }
    }
}

// ============================================================================
// Circuit simulation DTOs
// ============================================================================

/// One typed component of a photonic circuit.
#[derive(Debug, Deserialize)]
pub struct PhotonicComponent {
    /// Component type: source, beamsplitter, phaseshift, detector, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric parameters (transmittivity, phase, ...).
    #[serde(default)]
    pub params: HashMap<String, f64>,
    /// Position on the editor canvas.
    pub position: Position,
}

/// Request to simulate a photonic circuit.
#[derive(Debug, Deserialize)]
pub struct PhotonicCircuitRequest {
    pub components: Vec<PhotonicComponent>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Response from the circuit-simulate endpoint.
#[derive(Debug, Serialize)]
pub struct CircuitSimResponse {
    /// Final statevector amplitudes.
    pub state: Vec<ComplexNumber>,
    /// Measurement probabilities per basis state.
    pub probabilities: Vec<f64>,
    /// Bar chart of the probabilities (base64 PNG).
    pub state_visualization: String,
    /// Rendered chip layout (base64 PNG).
    pub gds_layout: String,
    pub success: bool,
}

// ============================================================================
// Network simulation DTOs
// ============================================================================

/// A node in a quantum-network request.
#[derive(Debug, Deserialize)]
pub struct NetworkNodeDto {
    /// Node type (endpoint, repeater, ...). Carried through, not
    /// interpreted.
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    /// Free-form node parameters, accepted and ignored.
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// Request to analyze a quantum network.
#[derive(Debug, Deserialize)]
pub struct NetworkRequest {
    pub nodes: Vec<NetworkNodeDto>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// Per-link quantum channel estimates keyed `"source-target"`.
#[derive(Debug, Serialize)]
pub struct QuantumMetrics {
    pub entanglement_rates: BTreeMap<String, f64>,
    pub fidelities: BTreeMap<String, f64>,
}

/// Response from the network-simulate endpoint.
#[derive(Debug, Serialize)]
pub struct NetworkSimResponse {
    pub network_metrics: NetworkMetrics,
    pub quantum_metrics: QuantumMetrics,
}

// ============================================================================
// BB84 DTOs
// ============================================================================

/// Request to run the BB84 protocol.
#[derive(Debug, Deserialize)]
pub struct Bb84Request {
    pub num_qubits: usize,
    /// Channel bit-flip probability.
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub eavesdropping: bool,
}

/// Sample bits from both sides of the sifted key.
#[derive(Debug, Serialize)]
pub struct SampleBits {
    pub alice: Vec<u8>,
    pub bob: Vec<u8>,
}

/// Response from the BB84 endpoint.
#[derive(Debug, Serialize)]
pub struct Bb84Response {
    pub key_rate: f64,
    pub error_rate: f64,
    pub secure: bool,
    pub final_key_length: usize,
    pub sample_bits: SampleBits,
}

// ============================================================================
// Code execution DTOs
// ============================================================================

/// A script to execute.
#[derive(Debug, Deserialize)]
pub struct CodeRequest {
    pub code: String,
}

/// Response from the photonic execute endpoint.
#[derive(Debug, Serialize)]
pub struct PhotonicExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    /// Base64 PNG plots, one per `show()` call.
    pub plots: Vec<String>,
    /// Unitary of the produced circuit, row-major.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unitary: Option<Vec<Vec<ComplexNumber>>>,
}

/// Response from the photonic visualize endpoint.
#[derive(Debug, Serialize)]
pub struct PhotonicVisualizeResponse {
    /// Circuit diagram (base64 PNG).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_visualization: Option<String>,
    /// Output-state probability chart (base64 PNG).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_visualization: Option<String>,
    /// Captured error text, if anything went wrong.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wavelength-sweep block in a layout response.
#[derive(Debug, Serialize)]
pub struct SimulationResults {
    pub device_type: String,
    pub wavelengths: Vec<f64>,
    pub transmission: Vec<f64>,
    pub insertion_loss: String,
    pub extinction_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsr: Option<String>,
}

impl From<&SweepResult> for SimulationResults {
    fn from(sweep: &SweepResult) -> Self {
        Self {
            device_type: sweep.device_type.to_string(),
            wavelengths: sweep.wavelengths.clone(),
            transmission: sweep.transmission.clone(),
            insertion_loss: format!("{:.2} dB", sweep.insertion_loss_db),
            extinction_ratio: format!("{:.2} dB", sweep.extinction_ratio_db),
            fsr: sweep.fsr_nm.map(|f| format!("{f} nm")),
        }
    }
}

/// Response from the layout execute endpoint.
#[derive(Debug, Serialize)]
pub struct LayoutExecuteResponse {
    pub stdout: String,
    pub stderr: String,
    /// Chip preview as a `data:image/png;base64,` URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Detailed chip view (base64 PNG).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<String>,
    /// GDSII stream of the layout (base64).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gds_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_results: Option<SimulationResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation_plots: Option<Vec<String>>,
}

// ============================================================================
// Health check response
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status (always "ok" if responding).
    pub status: String,
    /// Server version.
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Convert an ndarray unitary to nested JSON-friendly rows.
pub fn unitary_to_rows(matrix: &ndarray::Array2<Complex64>) -> Vec<Vec<ComplexNumber>> {
    matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().copied().map(ComplexNumber::from).collect())
        .collect()
}
