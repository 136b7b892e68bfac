//! Unitary derivation for circuits.

use ndarray::Array2;
use num_complex::Complex64;

use qlab_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::statevector::Statevector;

/// Widest circuit a unitary is derived for.
///
/// The matrix is dense: 10 qubits is already a 1024x1024 complex matrix,
/// and the result is serialized into a JSON response.
pub const MAX_UNITARY_QUBITS: usize = 10;

/// Derive the unitary matrix of a circuit.
///
/// Column `k` is the circuit applied to basis state |k⟩.
pub fn unitary(circuit: &Circuit) -> SimResult<Array2<Complex64>> {
    let num_qubits = circuit.num_qubits();
    if num_qubits > MAX_UNITARY_QUBITS {
        return Err(SimError::UnitaryTooLarge {
            num_qubits,
            max: MAX_UNITARY_QUBITS,
        });
    }

    let dim = 1 << num_qubits;
    let mut matrix = Array2::zeros((dim, dim));
    for col in 0..dim {
        let mut sv = Statevector::basis(num_qubits, col);
        sv.apply_circuit(circuit);
        for (row, amp) in sv.amplitudes().iter().enumerate() {
            matrix[(row, col)] = *amp;
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlab_ir::QubitId;

    #[test]
    fn test_hadamard_unitary() {
        let mut circuit = Circuit::with_size("h", 1);
        circuit.h(QubitId(0)).unwrap();

        let u = unitary(&circuit).unwrap();
        let h = 1.0 / 2.0_f64.sqrt();
        assert!((u[(0, 0)].re - h).abs() < 1e-10);
        assert!((u[(0, 1)].re - h).abs() < 1e-10);
        assert!((u[(1, 0)].re - h).abs() < 1e-10);
        assert!((u[(1, 1)].re + h).abs() < 1e-10);
    }

    #[test]
    fn test_cx_unitary_is_permutation() {
        let mut circuit = Circuit::with_size("cx", 2);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();

        let u = unitary(&circuit).unwrap();
        // CX with control q0 (low bit): |01⟩ ↔ |11⟩, i.e. columns 1 and 3 swap.
        assert!((u[(0, 0)].re - 1.0).abs() < 1e-10);
        assert!((u[(3, 1)].re - 1.0).abs() < 1e-10);
        assert!((u[(2, 2)].re - 1.0).abs() < 1e-10);
        assert!((u[(1, 3)].re - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_unitary_refuses_wide_circuits() {
        let circuit = Circuit::with_size("wide", (MAX_UNITARY_QUBITS + 1) as u32);
        assert!(matches!(
            unitary(&circuit),
            Err(SimError::UnitaryTooLarge { .. })
        ));
    }
}
