//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A complete instruction: a gate applied to specific qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate being applied.
    pub gate: StandardGate,
    /// Qubits this instruction operates on, in gate-operand order.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn new(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit(gate: StandardGate, qubit: QubitId) -> Self {
        Self::new(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::new(gate, [q1, q2])
    }

    /// Create a three-qubit gate instruction.
    pub fn three_qubit(gate: StandardGate, q1: QubitId, q2: QubitId, q3: QubitId) -> Self {
        Self::new(gate, [q1, q2, q3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_order_preserved() {
        let inst = Instruction::two_qubit(StandardGate::CX, QubitId(2), QubitId(0));
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(0)]);
    }
}
