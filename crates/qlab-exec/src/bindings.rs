//! Fixed binding sets exposed to scripts.
//!
//! Each executor endpoint installs exactly one [`BindingSet`]; the caller
//! never controls which names a script can reach. Free functions live here,
//! method dispatch lives in the interpreter.

use rustc_hash::FxHashMap;

use qlab_ir::Circuit;
use qlab_render::Layout;
use qlab_sim::Statevector;

use crate::context::ExecContext;
use crate::error::RuntimeError;
use crate::value::Value;

/// A builtin function: context access plus evaluated arguments.
pub type BuiltinFn = fn(&mut ExecContext, Vec<Value>) -> Result<Value, RuntimeError>;

/// A named, fixed set of free functions available to a script.
pub struct BindingSet {
    name: &'static str,
    functions: FxHashMap<&'static str, BuiltinFn>,
}

impl BindingSet {
    /// Bindings for linear-optics scripts: circuit construction and
    /// simulation on top of the common set.
    pub fn photonic() -> Self {
        let mut functions = common_functions();
        functions.insert("circuit", builtin_circuit as BuiltinFn);
        functions.insert("run", builtin_run as BuiltinFn);
        functions.insert("probabilities", builtin_probabilities as BuiltinFn);
        functions.insert("amplitudes", builtin_amplitudes as BuiltinFn);
        Self {
            name: "photonic",
            functions,
        }
    }

    /// Bindings for chip-layout scripts: layout construction on top of the
    /// common set.
    pub fn layout() -> Self {
        let mut functions = common_functions();
        functions.insert("chip", builtin_chip as BuiltinFn);
        Self {
            name: "layout",
            functions,
        }
    }

    /// Binding-set name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a builtin by name.
    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.functions.get(name).copied()
    }
}

/// Functions present in every binding set: output, plotting, result
/// registration, errors and scalar math.
fn common_functions() -> FxHashMap<&'static str, BuiltinFn> {
    let mut functions: FxHashMap<&'static str, BuiltinFn> = FxHashMap::default();
    functions.insert("print", builtin_print as BuiltinFn);
    functions.insert("error", builtin_error as BuiltinFn);
    functions.insert("result", builtin_result as BuiltinFn);
    functions.insert("plot_bar", builtin_plot_bar as BuiltinFn);
    functions.insert("plot_line", builtin_plot_line as BuiltinFn);
    functions.insert("show", builtin_show as BuiltinFn);
    functions.insert("len", builtin_len as BuiltinFn);
    functions.insert("min", builtin_min as BuiltinFn);
    functions.insert("max", builtin_max as BuiltinFn);
    functions.insert("sin", builtin_sin as BuiltinFn);
    functions.insert("cos", builtin_cos as BuiltinFn);
    functions.insert("tan", builtin_tan as BuiltinFn);
    functions.insert("sqrt", builtin_sqrt as BuiltinFn);
    functions.insert("exp", builtin_exp as BuiltinFn);
    functions.insert("ln", builtin_ln as BuiltinFn);
    functions.insert("abs", builtin_abs as BuiltinFn);
    functions.insert("floor", builtin_floor as BuiltinFn);
    functions.insert("ceil", builtin_ceil as BuiltinFn);
    functions.insert("round", builtin_round as BuiltinFn);
    functions
}

fn expect_arity(callee: &str, expected: usize, args: &[Value]) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            callee: callee.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

// =============================================================================
// Output and results
// =============================================================================

/// `print(...)` concatenates its arguments and appends a newline.
fn builtin_print(ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let mut text = String::new();
    for arg in &args {
        text.push_str(&arg.to_string());
    }
    ctx.sink.print_line(&text);
    Ok(Value::Unit)
}

/// `error(message)` raises a script-level fault.
fn builtin_error(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("error", 1, &args)?;
    Err(RuntimeError::Raised(args[0].to_string()))
}

/// `result(value)` registers an explicit result object.
fn builtin_result(ctx: &mut ExecContext, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("result", 1, &args)?;
    ctx.register_result(args.remove(0));
    Ok(Value::Unit)
}

// =============================================================================
// Plotting
// =============================================================================

fn builtin_plot_bar(ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("plot_bar", 1, &args)?;
    let values = args[0].as_number_array()?;
    ctx.figure_mut().bar(values);
    Ok(Value::Unit)
}

fn builtin_plot_line(ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("plot_line", 2, &args)?;
    let xs = args[0].as_number_array()?;
    let ys = args[1].as_number_array()?;
    ctx.figure_mut().line(xs, ys);
    Ok(Value::Unit)
}

/// `show()` flushes the current figure into the captured plot sequence.
fn builtin_show(ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("show", 0, &args)?;
    ctx.flush_figure()?;
    Ok(Value::Unit)
}

// =============================================================================
// Domain constructors
// =============================================================================

/// `circuit(n)` creates an n-qubit circuit.
fn builtin_circuit(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("circuit", 1, &args)?;
    let num_qubits = args[0].as_index()?;
    let circuit = Circuit::try_with_size("circuit", num_qubits as u32)?;
    Ok(Value::Circuit(circuit))
}

/// `run(c)` simulates a circuit from |0...0⟩.
fn builtin_run(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("run", 1, &args)?;
    match &args[0] {
        Value::Circuit(circuit) => Ok(Value::State(Statevector::from_circuit(circuit))),
        other => Err(RuntimeError::TypeMismatch {
            expected: "circuit",
            found: other.type_name(),
        }),
    }
}

/// `probabilities(s)` returns per-basis-state probabilities.
fn builtin_probabilities(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("probabilities", 1, &args)?;
    match &args[0] {
        Value::State(state) => Ok(Value::Array(
            state.probabilities().into_iter().map(Value::Number).collect(),
        )),
        other => Err(RuntimeError::TypeMismatch {
            expected: "state",
            found: other.type_name(),
        }),
    }
}

/// `amplitudes(s)` returns `[re, im]` pairs per basis state.
fn builtin_amplitudes(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("amplitudes", 1, &args)?;
    match &args[0] {
        Value::State(state) => Ok(Value::Array(
            state
                .amplitudes()
                .iter()
                .map(|amp| Value::Array(vec![Value::Number(amp.re), Value::Number(amp.im)]))
                .collect(),
        )),
        other => Err(RuntimeError::TypeMismatch {
            expected: "state",
            found: other.type_name(),
        }),
    }
}

/// `chip(name)` creates an empty layout.
fn builtin_chip(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("chip", 1, &args)?;
    match &args[0] {
        Value::Str(name) => Ok(Value::Layout(Layout::new(name.clone()))),
        other => Err(RuntimeError::TypeMismatch {
            expected: "string",
            found: other.type_name(),
        }),
    }
}

// =============================================================================
// Scalar helpers
// =============================================================================

fn builtin_len(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("len", 1, &args)?;
    match &args[0] {
        Value::Array(items) => Ok(Value::Number(items.len() as f64)),
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        other => Err(RuntimeError::TypeMismatch {
            expected: "array or string",
            found: other.type_name(),
        }),
    }
}

fn builtin_min(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("min", 2, &args)?;
    Ok(Value::Number(args[0].as_number()?.min(args[1].as_number()?)))
}

fn builtin_max(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
    expect_arity("max", 2, &args)?;
    Ok(Value::Number(args[0].as_number()?.max(args[1].as_number()?)))
}

macro_rules! unary_math {
    ($fn_name:ident, $name:literal, $method:ident) => {
        fn $fn_name(_ctx: &mut ExecContext, args: Vec<Value>) -> Result<Value, RuntimeError> {
            expect_arity($name, 1, &args)?;
            Ok(Value::Number(args[0].as_number()?.$method()))
        }
    };
}

unary_math!(builtin_sin, "sin", sin);
unary_math!(builtin_cos, "cos", cos);
unary_math!(builtin_tan, "tan", tan);
unary_math!(builtin_sqrt, "sqrt", sqrt);
unary_math!(builtin_exp, "exp", exp);
unary_math!(builtin_ln, "ln", ln);
unary_math!(builtin_abs, "abs", abs);
unary_math!(builtin_floor, "floor", floor);
unary_math!(builtin_ceil, "ceil", ceil);
unary_math!(builtin_round, "round", round);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_concatenates() {
        let mut ctx = ExecContext::new(None);
        builtin_print(
            &mut ctx,
            vec![
                Value::Str("n = ".to_string()),
                Value::Number(2.0),
            ],
        )
        .unwrap();
        assert_eq!(ctx.sink.stdout, "n = 2\n");
    }

    #[test]
    fn test_error_raises() {
        let mut ctx = ExecContext::new(None);
        let err = builtin_error(&mut ctx, vec![Value::Str("boom".to_string())]).unwrap_err();
        assert!(matches!(err, RuntimeError::Raised(msg) if msg == "boom"));
    }

    #[test]
    fn test_circuit_constructor_validates_width() {
        let mut ctx = ExecContext::new(None);
        assert!(builtin_circuit(&mut ctx, vec![Value::Number(2.0)]).is_ok());
        assert!(builtin_circuit(&mut ctx, vec![Value::Number(1000.0)]).is_err());
    }

    #[test]
    fn test_photonic_and_layout_sets_differ() {
        let photonic = BindingSet::photonic();
        let layout = BindingSet::layout();
        assert!(photonic.get("circuit").is_some());
        assert!(photonic.get("chip").is_none());
        assert!(layout.get("chip").is_some());
        assert!(layout.get("circuit").is_none());
        // Common functions exist in both.
        assert!(photonic.get("print").is_some());
        assert!(layout.get("print").is_some());
    }
}
