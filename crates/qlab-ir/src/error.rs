//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit.
    #[error("Qubit {qubit} out of range for circuit with {num_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Circuit width.
        num_qubits: u32,
    },

    /// Same qubit used twice in one operation.
    #[error("Duplicate qubit {qubit} in '{gate_name}' operands")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate name for context.
        gate_name: String,
    },

    /// Circuit wider than a hard limit.
    #[error("Circuit width {requested} exceeds the maximum of {max} qubits")]
    TooManyQubits {
        /// Requested width.
        requested: u32,
        /// Permitted width.
        max: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
