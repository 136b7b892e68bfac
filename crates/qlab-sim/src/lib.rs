//! QLab Simulation Engines
//!
//! Numeric backends behind the HTTP surface:
//!
//! - [`Statevector`]: dense statevector simulation of [`qlab_ir::Circuit`]s
//! - [`unitary`]: derive a circuit's unitary matrix
//! - [`bb84`]: BB84 quantum key distribution protocol runs
//! - [`network`]: quantum-network graph metrics and per-link channel
//!   estimates
//! - [`sweep`]: wavelength-sweep responses for common photonic devices

pub mod bb84;
pub mod error;
pub mod network;
pub mod statevector;
pub mod sweep;
pub mod unitary;

pub use error::{SimError, SimResult};
pub use statevector::Statevector;
pub use unitary::{MAX_UNITARY_QUBITS, unitary};
