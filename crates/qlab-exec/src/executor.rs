//! The capture executor: parse, interpret, capture, discover.

use std::time::Duration;

use ndarray::Array2;
use num_complex::Complex64;

use qlab_ir::Circuit;
use qlab_render::Layout;
use qlab_sim::Statevector;

use crate::bindings::BindingSet;
use crate::context::ExecContext;
use crate::interp::Interpreter;
use crate::value::{Env, Value};

/// Default wall-clock budget for one script.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Execution resource limits.
#[derive(Debug, Clone)]
pub struct ExecLimits {
    /// Wall-clock budget; `None` disables the deadline (tests only).
    pub timeout: Option<Duration>,
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Which result kinds to discover after execution, and whether to derive a
/// unitary from a discovered circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultFilter {
    /// Look for a circuit-like value.
    pub circuit: bool,
    /// Look for a state-like value.
    pub state: bool,
    /// Look for a layout-like value.
    pub layout: bool,
    /// Best-effort derive the unitary of the discovered circuit.
    pub derive_unitary: bool,
}

impl ResultFilter {
    /// Discover nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Circuit + state + unitary: the photonic execute/visualize endpoints.
    pub fn photonic() -> Self {
        Self {
            circuit: true,
            state: true,
            layout: false,
            derive_unitary: true,
        }
    }

    /// Layout only: the chip-layout endpoint.
    pub fn layout() -> Self {
        Self {
            circuit: false,
            state: false,
            layout: true,
            derive_unitary: false,
        }
    }
}

/// Everything one execution produced.
#[derive(Debug, Default)]
pub struct ExecOutcome {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error, including formatted script faults.
    pub stderr: String,
    /// Base64 PNG plots in display-call order.
    pub plots: Vec<String>,
    /// First discovered circuit-like value, if requested.
    pub circuit: Option<Circuit>,
    /// First discovered state-like value, if requested.
    pub state: Option<Statevector>,
    /// First discovered layout-like value, if requested.
    pub layout: Option<Layout>,
    /// Unitary derived from the discovered circuit, if requested and small
    /// enough.
    pub unitary: Option<Array2<Complex64>>,
}

/// Execute a script and capture everything it does.
///
/// Never fails: parse errors, runtime faults and deadline overruns are
/// formatted into `stderr`. Faults outside the script (none today) are the
/// HTTP layer's business, not this function's.
pub fn execute(
    source: &str,
    bindings: &BindingSet,
    filter: &ResultFilter,
    limits: &ExecLimits,
) -> ExecOutcome {
    let mut ctx = ExecContext::new(limits.timeout);

    let env = match qlab_script::parse(source) {
        Ok(program) => {
            let mut interp = Interpreter::new(bindings, &mut ctx);
            if let Err(e) = interp.run(&program) {
                let env = interp.into_env();
                ctx.sink.error_line(&format!("Error: {e}"));
                env
            } else {
                interp.into_env()
            }
        }
        Err(e) => {
            ctx.sink.error_line(&format!("Error: {e}"));
            Env::new()
        }
    };

    let mut outcome = ExecOutcome::default();
    discover_results(&mut outcome, &ctx, &env, filter);

    // Best-effort derived artifact: a failure here is a captured error
    // line, not a failure of the request.
    if filter.derive_unitary {
        if let Some(circuit) = &outcome.circuit {
            match qlab_sim::unitary(circuit) {
                Ok(matrix) => outcome.unitary = Some(matrix),
                Err(e) => ctx.sink.error_line(&format!("Error computing unitary: {e}")),
            }
        }
    }

    outcome.stdout = ctx.sink.stdout;
    outcome.stderr = ctx.sink.stderr;
    outcome.plots = ctx.sink.plots;
    outcome
}

/// Fill the outcome's result slots.
///
/// Explicitly registered results win, in registration order; the namespace
/// is then scanned in insertion order for any still-empty slot. Each kind
/// is matched independently and only the first match counts.
fn discover_results(
    outcome: &mut ExecOutcome,
    ctx: &ExecContext,
    env: &Env,
    filter: &ResultFilter,
) {
    let registered = ctx.registered().iter().map(|v| ("", v));
    let scanned = env.iter();

    for (_, value) in registered.chain(scanned) {
        match value {
            Value::Circuit(c) if filter.circuit && outcome.circuit.is_none() => {
                outcome.circuit = Some(c.clone());
            }
            Value::State(s) if filter.state && outcome.state.is_none() => {
                outcome.state = Some(s.clone());
            }
            Value::Layout(l) if filter.layout && outcome.layout.is_none() => {
                outcome.layout = Some(l.clone());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_captured() {
        let outcome = execute(
            "let = broken",
            &BindingSet::photonic(),
            &ResultFilter::none(),
            &ExecLimits::default(),
        );
        assert!(outcome.stderr.starts_with("Error: "));
        assert!(outcome.stdout.is_empty());
    }

    #[test]
    fn test_registered_result_wins_over_scan() {
        // Two circuits: `b` is registered, `a` merely comes first in the
        // namespace. The registered one must win.
        let outcome = execute(
            "let a = circuit(1); let b = circuit(2); b.h(0); result(b);",
            &BindingSet::photonic(),
            &ResultFilter::photonic(),
            &ExecLimits::default(),
        );
        let circuit = outcome.circuit.expect("circuit discovered");
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_ops(), 1);
    }

    #[test]
    fn test_namespace_scan_takes_first_match() {
        let outcome = execute(
            "let a = circuit(1); let b = circuit(2);",
            &BindingSet::photonic(),
            &ResultFilter::photonic(),
            &ExecLimits::default(),
        );
        assert_eq!(outcome.circuit.unwrap().num_qubits(), 1);
    }

    #[test]
    fn test_unitary_derived_from_discovered_circuit() {
        let outcome = execute(
            "let c = circuit(1); c.h(0);",
            &BindingSet::photonic(),
            &ResultFilter::photonic(),
            &ExecLimits::default(),
        );
        let unitary = outcome.unitary.expect("unitary derived");
        let h = 1.0 / 2.0_f64.sqrt();
        assert!((unitary[(0, 0)].re - h).abs() < 1e-10);
        assert!(outcome.stderr.is_empty());
    }

    #[test]
    fn test_unitary_failure_is_captured_not_fatal() {
        // 12 qubits is buildable but beyond the unitary cap.
        let outcome = execute(
            "let c = circuit(12); c.h(0);",
            &BindingSet::photonic(),
            &ResultFilter::photonic(),
            &ExecLimits::default(),
        );
        assert!(outcome.circuit.is_some());
        assert!(outcome.unitary.is_none());
        assert!(outcome.stderr.contains("Error computing unitary"));
    }

    #[test]
    fn test_filter_gates_discovery() {
        let outcome = execute(
            "let c = circuit(1);",
            &BindingSet::photonic(),
            &ResultFilter::none(),
            &ExecLimits::default(),
        );
        assert!(outcome.circuit.is_none());
    }
}
