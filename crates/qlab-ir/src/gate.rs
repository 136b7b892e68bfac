//! Standard gate set with concrete parameters.

use std::f64::consts::PI;
use std::fmt;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A standard quantum gate.
///
/// Rotation angles are concrete `f64` values: by the time a circuit is built
/// (from a script or from a request body) every parameter has been evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// Phase gate S = P(π/2).
    S,
    /// S-dagger.
    Sdg,
    /// T gate = P(π/4).
    T,
    /// T-dagger.
    Tdg,
    /// Rotation around X.
    Rx(f64),
    /// Rotation around Y.
    Ry(f64),
    /// Rotation around Z.
    Rz(f64),
    /// Phase rotation P(θ).
    Phase(f64),
    /// Controlled-NOT.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled phase.
    CP(f64),
    /// SWAP.
    Swap,
    /// Toffoli (CCNOT).
    CCX,
}

impl StandardGate {
    /// Lowercase gate name as used in serialized circuits.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::Phase(_) => "p",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::Phase(_) => 1,
            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CP(_)
            | StandardGate::Swap => 2,
            StandardGate::CCX => 3,
        }
    }

    /// Display label including parameters, e.g. `RY(π/2)`.
    pub fn label(&self) -> String {
        match self {
            StandardGate::I => "I".to_string(),
            StandardGate::X => "X".to_string(),
            StandardGate::Y => "Y".to_string(),
            StandardGate::Z => "Z".to_string(),
            StandardGate::H => "H".to_string(),
            StandardGate::S => "S".to_string(),
            StandardGate::Sdg => "S†".to_string(),
            StandardGate::T => "T".to_string(),
            StandardGate::Tdg => "T†".to_string(),
            StandardGate::Rx(t) => format!("RX({})", format_angle(*t)),
            StandardGate::Ry(t) => format!("RY({})", format_angle(*t)),
            StandardGate::Rz(t) => format!("RZ({})", format_angle(*t)),
            StandardGate::Phase(t) => format!("P({})", format_angle(*t)),
            StandardGate::CX => "CX".to_string(),
            StandardGate::CY => "CY".to_string(),
            StandardGate::CZ => "CZ".to_string(),
            StandardGate::CP(t) => format!("CP({})", format_angle(*t)),
            StandardGate::Swap => "SWAP".to_string(),
            StandardGate::CCX => "CCX".to_string(),
        }
    }

    /// The 2x2 matrix of a single-qubit gate, row-major.
    ///
    /// Returns `None` for multi-qubit gates; the statevector engine applies
    /// those through dedicated kernels.
    pub fn single_qubit_matrix(&self) -> Option<[Complex64; 4]> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        let h = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);

        let m = match self {
            StandardGate::I => [one, zero, zero, one],
            StandardGate::X => [zero, one, one, zero],
            StandardGate::Y => [zero, -i, i, zero],
            StandardGate::Z => [one, zero, zero, -one],
            StandardGate::H => [h, h, h, -h],
            StandardGate::S => [one, zero, zero, i],
            StandardGate::Sdg => [one, zero, zero, -i],
            StandardGate::T => [one, zero, zero, Complex64::from_polar(1.0, PI / 4.0)],
            StandardGate::Tdg => [one, zero, zero, Complex64::from_polar(1.0, -PI / 4.0)],
            StandardGate::Rx(t) => {
                let c = Complex64::new((t / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(t / 2.0).sin());
                [c, s, s, c]
            }
            StandardGate::Ry(t) => {
                let c = Complex64::new((t / 2.0).cos(), 0.0);
                let s = Complex64::new((t / 2.0).sin(), 0.0);
                [c, -s, s, c]
            }
            StandardGate::Rz(t) => [
                Complex64::from_polar(1.0, -t / 2.0),
                zero,
                zero,
                Complex64::from_polar(1.0, t / 2.0),
            ],
            StandardGate::Phase(t) => [one, zero, zero, Complex64::from_polar(1.0, *t)],
            _ => return None,
        };
        Some(m)
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Format an angle for display, with shortcuts for multiples of π.
fn format_angle(value: f64) -> String {
    if (value - PI).abs() < 1e-10 {
        "π".to_string()
    } else if (value - PI / 2.0).abs() < 1e-10 {
        "π/2".to_string()
    } else if (value - PI / 4.0).abs() < 1e-10 {
        "π/4".to_string()
    } else if (value + PI).abs() < 1e-10 {
        "-π".to_string()
    } else if (value + PI / 2.0).abs() < 1e-10 {
        "-π/2".to_string()
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_counts() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(StandardGate::Ry(PI / 2.0).label(), "RY(π/2)");
        assert_eq!(StandardGate::Sdg.label(), "S†");
        assert_eq!(StandardGate::Rx(0.5).label(), "RX(0.50)");
    }

    #[test]
    fn test_hadamard_matrix_unitary() {
        let m = StandardGate::H.single_qubit_matrix().unwrap();
        // H·H = I
        let a = m[0] * m[0] + m[1] * m[2];
        let b = m[2] * m[1] + m[3] * m[3];
        assert!((a - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        assert!((b - Complex64::new(1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_multi_qubit_gates_have_no_single_matrix() {
        assert!(StandardGate::CX.single_qubit_matrix().is_none());
        assert!(StandardGate::Swap.single_qubit_matrix().is_none());
    }
}
