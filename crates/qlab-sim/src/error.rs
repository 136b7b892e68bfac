//! Error types for the simulation crate.

use thiserror::Error;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Unitary derivation refused for a wide circuit.
    #[error("Unitary of a {num_qubits}-qubit circuit exceeds the {max}-qubit limit")]
    UnitaryTooLarge {
        /// Circuit width.
        num_qubits: usize,
        /// Permitted width.
        max: usize,
    },

    /// State and circuit widths disagree.
    #[error("State has {state_qubits} qubits but circuit has {circuit_qubits}")]
    DimensionMismatch {
        /// Qubits in the state.
        state_qubits: usize,
        /// Qubits in the circuit.
        circuit_qubits: usize,
    },

    /// A network link references a node that does not exist.
    #[error("Link endpoint {index} out of range for {num_nodes} nodes")]
    InvalidLink {
        /// The offending endpoint index.
        index: usize,
        /// Number of nodes in the request.
        num_nodes: usize,
    },

    /// Path-length metrics need a connected graph.
    #[error("Network graph is not connected")]
    Disconnected,

    /// Path-length metrics need at least two nodes.
    #[error("Network needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
