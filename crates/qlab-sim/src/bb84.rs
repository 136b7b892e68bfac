//! BB84 quantum key distribution protocol simulation.
//!
//! Intercept-resend model: Alice encodes random bits in random bases, an
//! optional eavesdropper measures and re-sends in her own random basis, Bob
//! measures in his. Keys are sifted to the positions where Alice's and Bob's
//! bases match; the observed error rate on the sifted key decides whether
//! the channel is considered secure.

use rand::Rng;
use serde::Serialize;

/// BB84 aborts above this sifted-key error rate.
pub const SECURITY_THRESHOLD: f64 = 0.11;

/// How many sifted bits are echoed back for display.
const SAMPLE_LEN: usize = 10;

/// Parameters of a protocol run.
#[derive(Debug, Clone)]
pub struct Bb84Config {
    /// Number of qubits Alice sends.
    pub num_qubits: usize,
    /// Independent bit-flip probability on Bob's measurement.
    pub channel_error_rate: f64,
    /// Whether an intercept-resend eavesdropper is present.
    pub eavesdropping: bool,
}

/// Outcome of a protocol run.
#[derive(Debug, Clone, Serialize)]
pub struct Bb84Outcome {
    /// Fraction of transmitted qubits that survived sifting.
    pub key_rate: f64,
    /// Error rate observed on the sifted key.
    pub error_rate: f64,
    /// Whether the error rate is below [`SECURITY_THRESHOLD`].
    pub secure: bool,
    /// Sifted key length.
    pub final_key_length: usize,
    /// First sifted bits on Alice's side.
    pub alice_sample: Vec<u8>,
    /// First sifted bits on Bob's side.
    pub bob_sample: Vec<u8>,
}

/// Run the protocol with the thread-local RNG.
pub fn simulate(config: &Bb84Config) -> Bb84Outcome {
    simulate_with_rng(config, &mut rand::thread_rng())
}

/// Run the protocol with a caller-supplied RNG (deterministic in tests).
pub fn simulate_with_rng<R: Rng>(config: &Bb84Config, rng: &mut R) -> Bb84Outcome {
    let n = config.num_qubits;
    let mut alice_key = Vec::new();
    let mut bob_key = Vec::new();

    for _ in 0..n {
        let alice_bit: u8 = rng.gen_range(0..2);
        let alice_basis: u8 = rng.gen_range(0..2);
        let bob_basis: u8 = rng.gen_range(0..2);

        // The qubit in flight: its encoded bit and basis.
        let mut bit = alice_bit;
        let mut basis = alice_basis;

        if config.eavesdropping {
            let eve_basis: u8 = rng.gen_range(0..2);
            if eve_basis != basis {
                // Wrong-basis measurement collapses to a random bit, and the
                // resent qubit carries Eve's basis.
                bit = rng.gen_range(0..2);
                basis = eve_basis;
            }
        }

        // Bob's measurement: deterministic in the matching basis, random
        // otherwise.
        let mut measured = if bob_basis == basis {
            bit
        } else {
            rng.gen_range(0..2)
        };

        // Channel noise as an independent flip.
        if config.channel_error_rate > 0.0 && rng.r#gen::<f64>() < config.channel_error_rate {
            measured ^= 1;
        }

        // Sift: keep only matching Alice/Bob bases.
        if alice_basis == bob_basis {
            alice_key.push(alice_bit);
            bob_key.push(measured);
        }
    }

    let final_key_length = alice_key.len();
    let errors = alice_key
        .iter()
        .zip(&bob_key)
        .filter(|(a, b)| a != b)
        .count();
    let error_rate = if final_key_length == 0 {
        0.0
    } else {
        errors as f64 / final_key_length as f64
    };

    Bb84Outcome {
        key_rate: if n == 0 {
            0.0
        } else {
            final_key_length as f64 / n as f64
        },
        error_rate,
        secure: error_rate < SECURITY_THRESHOLD,
        final_key_length,
        alice_sample: alice_key.into_iter().take(SAMPLE_LEN).collect(),
        bob_sample: bob_key.into_iter().take(SAMPLE_LEN).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_clean_channel_is_secure() {
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = simulate_with_rng(
            &Bb84Config {
                num_qubits: 1000,
                channel_error_rate: 0.0,
                eavesdropping: false,
            },
            &mut rng,
        );
        assert_eq!(outcome.error_rate, 0.0);
        assert!(outcome.secure);
        // Roughly half the bases match.
        assert!(outcome.final_key_length > 350);
        assert!(outcome.key_rate > 0.35 && outcome.key_rate < 0.65);
    }

    #[test]
    fn test_eavesdropper_raises_error_rate() {
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = simulate_with_rng(
            &Bb84Config {
                num_qubits: 1000,
                channel_error_rate: 0.0,
                eavesdropping: true,
            },
            &mut rng,
        );
        // Intercept-resend induces ~25% errors on the sifted key.
        assert!(outcome.error_rate > 0.15);
        assert!(!outcome.secure);
    }

    #[test]
    fn test_samples_are_bounded() {
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = simulate_with_rng(
            &Bb84Config {
                num_qubits: 100,
                channel_error_rate: 0.05,
                eavesdropping: false,
            },
            &mut rng,
        );
        assert!(outcome.alice_sample.len() <= 10);
        assert_eq!(outcome.alice_sample.len(), outcome.bob_sample.len().min(10));
    }

    #[test]
    fn test_zero_qubits() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = simulate_with_rng(
            &Bb84Config {
                num_qubits: 0,
                channel_error_rate: 0.0,
                eavesdropping: false,
            },
            &mut rng,
        );
        assert_eq!(outcome.final_key_length, 0);
        assert_eq!(outcome.error_rate, 0.0);
        assert!(outcome.secure);
    }
}
