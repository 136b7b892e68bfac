//! Black-box tests of the capture executor's contract.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use qlab_exec::{BindingSet, ExecLimits, ResultFilter, execute};

fn run(source: &str) -> qlab_exec::ExecOutcome {
    execute(
        source,
        &BindingSet::photonic(),
        &ResultFilter::photonic(),
        &ExecLimits::default(),
    )
}

#[test]
fn print_only_script_captures_exact_stdout() {
    let outcome = run(r#"print("hi");"#);
    assert_eq!(outcome.stdout, "hi\n");
    assert_eq!(outcome.stderr, "");
    assert!(outcome.plots.is_empty());
    assert!(outcome.circuit.is_none());
    assert!(outcome.state.is_none());
}

#[test]
fn multiple_prints_preserve_order() {
    let outcome = run(r#"print("one"); print("two"); print(3);"#);
    assert_eq!(outcome.stdout, "one\ntwo\n3\n");
}

#[test]
fn each_show_call_captures_one_decodable_image() {
    let outcome = run(
        r#"plot_bar([0.5, 0.5]);
           show();
           plot_line([0, 1, 2], [1, 0, 1]);
           show();
           show();"#,
    );
    assert_eq!(outcome.plots.len(), 3);
    for plot in &outcome.plots {
        let png = STANDARD.decode(plot).expect("valid base64");
        image::load_from_memory(&png).expect("decodable PNG");
    }
}

#[test]
fn raising_script_returns_normally_with_error_text() {
    let outcome = run(r#"print("before"); error("boom"); print("after");"#);
    assert_eq!(outcome.stdout, "before\n");
    assert!(outcome.stderr.contains("boom"));
}

#[test]
fn type_fault_is_captured() {
    let outcome = run("let x = 1 + true;");
    assert!(outcome.stderr.contains("Type error"));
}

#[test]
fn harmless_script_is_idempotent() {
    let source = r#"let c = circuit(2);
                    c.h(0);
                    print("depth: ", c.depth());
                    plot_bar(run(c).probabilities());
                    show();"#;
    let first = run(source);
    let second = run(source);
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.plots.len(), second.plots.len());
}

#[test]
fn executions_do_not_observe_each_other() {
    // First execution prints and plots; the second must start from a clean
    // capture context.
    let first = run(r#"print("first"); plot_bar([1]); show();"#);
    assert_eq!(first.plots.len(), 1);

    let second = run(r#"print("second");"#);
    assert_eq!(second.stdout, "second\n");
    assert!(second.plots.is_empty());
    assert!(second.stderr.is_empty());
}

#[test]
fn runaway_loop_hits_the_deadline() {
    let outcome = execute(
        "for i in 0..1000000 { for j in 0..1000000 { let x = i * j; } }",
        &BindingSet::photonic(),
        &ResultFilter::none(),
        &ExecLimits {
            timeout: Some(Duration::from_millis(50)),
        },
    );
    assert!(outcome.stderr.contains("timed out"));
}

#[test]
fn discovered_circuit_and_state_are_returned() {
    let outcome = run(
        r#"let c = circuit(2);
           c.h(0);
           c.cx(0, 1);
           let s = run(c);"#,
    );
    let circuit = outcome.circuit.expect("circuit");
    assert_eq!(circuit.num_ops(), 2);
    let state = outcome.state.expect("state");
    let probs = state.probabilities();
    assert!((probs[0] - 0.5).abs() < 1e-10);
    assert!((probs[3] - 0.5).abs() < 1e-10);
    let unitary = outcome.unitary.expect("unitary");
    assert_eq!(unitary.dim(), (4, 4));
}

#[test]
fn layout_binding_set_discovers_layouts() {
    let outcome = execute(
        r#"let c = chip("mzi");
           let a = c.coupler(0, 0);
           let b = c.coupler(40, 0);
           c.route(a, b);"#,
        &BindingSet::layout(),
        &ResultFilter::layout(),
        &ExecLimits::default(),
    );
    let layout = outcome.layout.expect("layout");
    assert_eq!(layout.num_components(), 2);
    assert!(outcome.stderr.is_empty());
}

#[test]
fn layout_scripts_cannot_reach_circuit_bindings() {
    let outcome = execute(
        "let c = circuit(2);",
        &BindingSet::layout(),
        &ResultFilter::layout(),
        &ExecLimits::default(),
    );
    assert!(outcome.stderr.contains("Unknown function 'circuit'"));
}
