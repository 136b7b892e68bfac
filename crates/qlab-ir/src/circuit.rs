//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Hard cap on circuit width.
///
/// Statevector memory is 2^n amplitudes; 20 qubits is already 16 MiB of
/// complex doubles and the service runs untrusted scripts.
pub const MAX_QUBITS: u32 = 20;

/// A quantum circuit: a named, fixed-width sequence of gate instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create an empty circuit with the given width.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Create a circuit, rejecting widths above [`MAX_QUBITS`].
    pub fn try_with_size(name: impl Into<String>, num_qubits: u32) -> IrResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(IrError::TooManyQubits {
                requested: num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self::with_size(name, num_qubits))
    }

    /// The two-qubit Bell-state preparation circuit.
    pub fn bell() -> Self {
        let mut circuit = Self::with_size("bell", 2);
        circuit
            .h(QubitId(0))
            .and_then(|c| c.cx(QubitId(0), QubitId(1)))
            .expect("bell circuit construction is infallible");
        circuit
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of instructions.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Circuit depth: the number of time layers when each instruction is
    /// scheduled as early as the qubits it touches allow.
    pub fn depth(&self) -> usize {
        let mut qubit_depth: FxHashMap<QubitId, usize> = FxHashMap::default();
        let mut depth = 0;

        for instruction in &self.instructions {
            let layer = instruction
                .qubits
                .iter()
                .map(|q| qubit_depth.get(q).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            for q in &instruction.qubits {
                qubit_depth.insert(*q, layer + 1);
            }
            depth = depth.max(layer + 1);
        }

        depth
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        for (i, q) in instruction.qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    num_qubits: self.num_qubits,
                });
            }
            if instruction.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: instruction.gate.name().to_string(),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::H, qubit))
    }

    /// Apply Pauli-X.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Z, qubit))
    }

    /// Apply S.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::S, qubit))
    }

    /// Apply S-dagger.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Sdg, qubit))
    }

    /// Apply T.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::T, qubit))
    }

    /// Apply T-dagger.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Tdg, qubit))
    }

    /// Apply X rotation.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Rx(theta), qubit))
    }

    /// Apply Y rotation.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Ry(theta), qubit))
    }

    /// Apply Z rotation.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Rz(theta), qubit))
    }

    /// Apply phase rotation.
    pub fn phase(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit(StandardGate::Phase(theta), qubit))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit(StandardGate::CX, control, target))
    }

    /// Apply controlled-Y.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit(StandardGate::CY, control, target))
    }

    /// Apply controlled-Z.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit(StandardGate::CZ, control, target))
    }

    /// Apply controlled phase.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit(
            StandardGate::CP(theta),
            control,
            target,
        ))
    }

    /// Apply SWAP.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit(StandardGate::Swap, q1, q2))
    }

    /// Apply Toffoli.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::three_qubit(StandardGate::CCX, c1, c2, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_depth() {
        let circuit = Circuit::bell();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_ops(), 2);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_parallel_gates_share_a_layer() {
        let mut circuit = Circuit::with_size("parallel", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 1);
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut circuit = Circuit::with_size("narrow", 1);
        let err = circuit.cx(QubitId(0), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_operand_rejected() {
        let mut circuit = Circuit::with_size("dup", 2);
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_width_cap() {
        let err = Circuit::try_with_size("wide", MAX_QUBITS + 1).unwrap_err();
        assert!(matches!(err, IrError::TooManyQubits { .. }));
    }
}
