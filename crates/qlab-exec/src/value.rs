//! Runtime values and the execution namespace.

use std::fmt;

use qlab_ir::Circuit;
use qlab_render::Layout;
use qlab_sim::Statevector;

use crate::error::RuntimeError;

/// A runtime value in an executing script.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value (statements, effectful builtins).
    Unit,
    /// Boolean.
    Bool(bool),
    /// All numbers are f64, like the script's surface syntax.
    Number(f64),
    /// String.
    Str(String),
    /// Array of values.
    Array(Vec<Value>),
    /// A quantum circuit (circuit-like result object).
    Circuit(Circuit),
    /// A statevector (state-like result object).
    State(Statevector),
    /// A photonic chip layout (layout-like result object).
    Layout(Layout),
}

impl Value {
    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Circuit(_) => "circuit",
            Value::State(_) => "state",
            Value::Layout(_) => "layout",
        }
    }

    /// Numeric view.
    pub fn as_number(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(RuntimeError::TypeMismatch {
                expected: "number",
                found: other.type_name(),
            }),
        }
    }

    /// Boolean view.
    pub fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(RuntimeError::TypeMismatch {
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    /// Non-negative integer view (indices, qubit numbers, counts).
    pub fn as_index(&self) -> Result<usize, RuntimeError> {
        let n = self.as_number()?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(RuntimeError::TypeMismatch {
                expected: "non-negative integer",
                found: "number",
            });
        }
        Ok(n as usize)
    }

    /// Flat numeric view of an array.
    pub fn as_number_array(&self) -> Result<Vec<f64>, RuntimeError> {
        match self {
            Value::Array(items) => items.iter().map(Value::as_number).collect(),
            other => Err(RuntimeError::TypeMismatch {
                expected: "array of numbers",
                found: other.type_name(),
            }),
        }
    }

    /// Structural equality where it is meaningful.
    pub fn try_eq(&self, other: &Value) -> Result<bool, RuntimeError> {
        match (self, other) {
            (Value::Unit, Value::Unit) => Ok(true),
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Number(a), Value::Number(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::Array(a), Value::Array(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b) {
                    if !x.try_eq(y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Err(RuntimeError::TypeMismatch {
                expected: "comparable values of the same type",
                found: other.type_name(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // Nested strings are quoted for readability.
                    match item {
                        Value::Str(s) => write!(f, "\"{s}\"")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "]")
            }
            Value::Circuit(c) => {
                write!(f, "circuit({} qubits, {} ops)", c.num_qubits(), c.num_ops())
            }
            Value::State(s) => write!(f, "state({} qubits)", s.num_qubits()),
            Value::Layout(l) => {
                write!(f, "layout(\"{}\", {} components)", l.name(), l.num_components())
            }
        }
    }
}

/// The execution namespace: name → value with insertion-order iteration.
///
/// Post-execution result discovery walks this in insertion order, so the
/// ordering is part of the executor's contract, not an implementation
/// detail. Scripts are small; linear lookup is fine.
#[derive(Debug, Default)]
pub struct Env {
    slots: Vec<(String, Value)>,
}

impl Env {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Bind a name: updates in place if present, appends otherwise.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.slots.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.slots.push((name.to_string(), value));
        }
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Mutable access to a bound value.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.slots
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_trims_integral_numbers() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
    }

    #[test]
    fn test_array_display() {
        let v = Value::Array(vec![
            Value::Number(1.0),
            Value::Str("x".to_string()),
            Value::Bool(true),
        ]);
        assert_eq!(v.to_string(), "[1, \"x\", true]");
    }

    #[test]
    fn test_env_insertion_order() {
        let mut env = Env::new();
        env.set("b", Value::Number(1.0));
        env.set("a", Value::Number(2.0));
        env.set("b", Value::Number(3.0)); // update keeps position
        let names: Vec<&str> = env.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!((env.get("b").unwrap().as_number().unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_as_index_rejects_fractions() {
        assert!(Value::Number(1.5).as_index().is_err());
        assert!(Value::Number(-1.0).as_index().is_err());
        assert_eq!(Value::Number(4.0).as_index().unwrap(), 4);
    }
}
