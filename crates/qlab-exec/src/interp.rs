//! Tree-walking interpreter for QLab scripts.

use qlab_ir::QubitId;
use qlab_script::syntax::{BinOp, Expr, Program, Stmt, UnaryOp};

use crate::bindings::BindingSet;
use crate::context::ExecContext;
use crate::error::RuntimeError;
use crate::value::{Env, Value};

/// Interpreter state for one execution.
pub struct Interpreter<'a> {
    bindings: &'a BindingSet,
    ctx: &'a mut ExecContext,
    env: Env,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over a fresh namespace.
    pub fn new(bindings: &'a BindingSet, ctx: &'a mut ExecContext) -> Self {
        Self {
            bindings,
            ctx,
            env: Env::new(),
        }
    }

    /// Execute a program to completion.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.exec_block(&program.statements)
    }

    /// Hand back the (possibly mutated) namespace for result discovery.
    ///
    /// This is the exact namespace the program ran against; discovery never
    /// looks anywhere else.
    pub fn into_env(self) -> Env {
        self.env
    }

    fn exec_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.ctx.check_deadline()?;
            self.exec_stmt(statement)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, statement: &Stmt) -> Result<(), RuntimeError> {
        match statement {
            Stmt::Let { name, value } | Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.env.set(name, value);
                Ok(())
            }
            Stmt::Expr(expr) => {
                self.eval(expr)?;
                Ok(())
            }
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => {
                if self.eval(condition)?.as_bool()? {
                    self.exec_block(then_body)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body)
                } else {
                    Ok(())
                }
            }
            Stmt::For {
                variable,
                start,
                end,
                body,
            } => {
                let start = self.eval(start)?.as_number()? as i64;
                let end = self.eval(end)?.as_number()? as i64;
                for i in start..end {
                    self.ctx.check_deadline()?;
                    self.env.set(variable, Value::Number(i as f64));
                    self.exec_block(body)?;
                }
                Ok(())
            }
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Pi => Ok(Value::Number(std::f64::consts::PI)),
            Expr::Ident(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Expr::Array(elements) => {
                let values = elements
                    .iter()
                    .map(|e| self.eval(e))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(values))
            }
            Expr::Index { target, index } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?.as_number()? as i64;
                let items = match target {
                    Value::Array(items) => items,
                    other => {
                        return Err(RuntimeError::TypeMismatch {
                            expected: "array",
                            found: other.type_name(),
                        });
                    }
                };
                if index < 0 || index as usize >= items.len() {
                    return Err(RuntimeError::IndexOutOfBounds {
                        index,
                        len: items.len(),
                    });
                }
                Ok(items[index as usize].clone())
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand)?;
                match op {
                    UnaryOp::Neg => Ok(Value::Number(-value.as_number()?)),
                    UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
                }
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs),
            Expr::Call { name, args } => {
                let arg_values = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;
                let Some(function) = self.bindings.get(name) else {
                    return Err(RuntimeError::UnknownFunction(name.clone()));
                };
                function(self.ctx, arg_values)
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let arg_values = args
                    .iter()
                    .map(|a| self.eval(a))
                    .collect::<Result<Vec<_>, _>>()?;

                // Methods on a named binding mutate it in place; methods on
                // a temporary act on the temporary.
                if let Expr::Ident(name) = receiver.as_ref() {
                    match self.env.get_mut(name) {
                        Some(value) => call_method(value, method, arg_values),
                        None => Err(RuntimeError::UndefinedVariable(name.clone())),
                    }
                } else {
                    let mut value = self.eval(receiver)?;
                    call_method(&mut value, method, arg_values)
                }
            }
        }
    }

    fn eval_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr) -> Result<Value, RuntimeError> {
        // Short-circuit logic first.
        if matches!(op, BinOp::And | BinOp::Or) {
            let left = self.eval(lhs)?.as_bool()?;
            return match (op, left) {
                (BinOp::And, false) => Ok(Value::Bool(false)),
                (BinOp::Or, true) => Ok(Value::Bool(true)),
                _ => Ok(Value::Bool(self.eval(rhs)?.as_bool()?)),
            };
        }

        let left = self.eval(lhs)?;
        let right = self.eval(rhs)?;

        match op {
            BinOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(_), _) | (_, Value::Str(_)) => {
                    Ok(Value::Str(format!("{left}{right}")))
                }
                (Value::Array(a), Value::Array(b)) => {
                    let mut joined = a.clone();
                    joined.extend(b.iter().cloned());
                    Ok(Value::Array(joined))
                }
                _ => Err(RuntimeError::TypeMismatch {
                    expected: "numbers, strings or arrays",
                    found: left.type_name(),
                }),
            },
            BinOp::Sub => Ok(Value::Number(left.as_number()? - right.as_number()?)),
            BinOp::Mul => Ok(Value::Number(left.as_number()? * right.as_number()?)),
            BinOp::Div => Ok(Value::Number(left.as_number()? / right.as_number()?)),
            BinOp::Rem => Ok(Value::Number(left.as_number()? % right.as_number()?)),
            BinOp::Pow => Ok(Value::Number(left.as_number()?.powf(right.as_number()?))),
            BinOp::Eq => Ok(Value::Bool(left.try_eq(&right)?)),
            BinOp::NotEq => Ok(Value::Bool(!left.try_eq(&right)?)),
            BinOp::Lt => Ok(Value::Bool(left.as_number()? < right.as_number()?)),
            BinOp::LtEq => Ok(Value::Bool(left.as_number()? <= right.as_number()?)),
            BinOp::Gt => Ok(Value::Bool(left.as_number()? > right.as_number()?)),
            BinOp::GtEq => Ok(Value::Bool(left.as_number()? >= right.as_number()?)),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }
}

/// Dispatch a method call on a receiver value.
fn call_method(value: &mut Value, method: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match value {
        Value::Circuit(circuit) => circuit_method(circuit, method, &args),
        Value::State(state) => state_method(state, method, &args),
        Value::Layout(layout) => layout_method(layout, method, &args),
        Value::Array(items) => match method {
            "len" => {
                expect_method_arity("len", 0, &args)?;
                Ok(Value::Number(items.len() as f64))
            }
            _ => Err(RuntimeError::UnknownMethod {
                type_name: "array",
                method: method.to_string(),
            }),
        },
        Value::Str(s) => match method {
            "len" => {
                expect_method_arity("len", 0, &args)?;
                Ok(Value::Number(s.chars().count() as f64))
            }
            _ => Err(RuntimeError::UnknownMethod {
                type_name: "string",
                method: method.to_string(),
            }),
        },
        other => Err(RuntimeError::UnknownMethod {
            type_name: other.type_name(),
            method: method.to_string(),
        }),
    }
}

fn expect_method_arity(method: &str, expected: usize, args: &[Value]) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            callee: method.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn qubit_arg(args: &[Value], index: usize) -> Result<QubitId, RuntimeError> {
    Ok(QubitId::from(args[index].as_index()?))
}

fn circuit_method(
    circuit: &mut qlab_ir::Circuit,
    method: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match method {
        // Parameterless single-qubit gates
        "h" | "x" | "y" | "z" | "s" | "sdg" | "t" | "tdg" => {
            expect_method_arity(method, 1, args)?;
            let q = qubit_arg(args, 0)?;
            match method {
                "h" => circuit.h(q)?,
                "x" => circuit.x(q)?,
                "y" => circuit.y(q)?,
                "z" => circuit.z(q)?,
                "s" => circuit.s(q)?,
                "sdg" => circuit.sdg(q)?,
                "t" => circuit.t(q)?,
                _ => circuit.tdg(q)?,
            };
            Ok(Value::Unit)
        }
        // Angle + qubit
        "rx" | "ry" | "rz" | "phase" => {
            expect_method_arity(method, 2, args)?;
            let theta = args[0].as_number()?;
            let q = qubit_arg(args, 1)?;
            match method {
                "rx" => circuit.rx(theta, q)?,
                "ry" => circuit.ry(theta, q)?,
                "rz" => circuit.rz(theta, q)?,
                _ => circuit.phase(theta, q)?,
            };
            Ok(Value::Unit)
        }
        // Two-qubit gates
        "cx" | "cy" | "cz" | "swap" => {
            expect_method_arity(method, 2, args)?;
            let a = qubit_arg(args, 0)?;
            let b = qubit_arg(args, 1)?;
            match method {
                "cx" => circuit.cx(a, b)?,
                "cy" => circuit.cy(a, b)?,
                "cz" => circuit.cz(a, b)?,
                _ => circuit.swap(a, b)?,
            };
            Ok(Value::Unit)
        }
        "cp" => {
            expect_method_arity(method, 3, args)?;
            let theta = args[0].as_number()?;
            circuit.cp(theta, qubit_arg(args, 1)?, qubit_arg(args, 2)?)?;
            Ok(Value::Unit)
        }
        "ccx" => {
            expect_method_arity(method, 3, args)?;
            circuit.ccx(qubit_arg(args, 0)?, qubit_arg(args, 1)?, qubit_arg(args, 2)?)?;
            Ok(Value::Unit)
        }
        "qubits" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Number(circuit.num_qubits() as f64))
        }
        "depth" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Number(circuit.depth() as f64))
        }
        "ops" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Number(circuit.num_ops() as f64))
        }
        _ => Err(RuntimeError::UnknownMethod {
            type_name: "circuit",
            method: method.to_string(),
        }),
    }
}

fn state_method(
    state: &qlab_sim::Statevector,
    method: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    match method {
        "qubits" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Number(state.num_qubits() as f64))
        }
        "probabilities" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Array(
                state.probabilities().into_iter().map(Value::Number).collect(),
            ))
        }
        _ => Err(RuntimeError::UnknownMethod {
            type_name: "state",
            method: method.to_string(),
        }),
    }
}

fn layout_method(
    layout: &mut qlab_render::Layout,
    method: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    use qlab_render::ComponentKind;

    match method {
        // Component placement: (x, y) in microns, returns the index.
        "source" | "straight" | "coupler" | "heater" | "taper" | "ring" | "detector" => {
            expect_method_arity(method, 2, args)?;
            let kind = ComponentKind::from_name(method)?;
            let x = args[0].as_number()?;
            let y = args[1].as_number()?;
            Ok(Value::Number(layout.add(kind, x, y) as f64))
        }
        "route" => {
            expect_method_arity(method, 2, args)?;
            layout.route(args[0].as_index()?, args[1].as_index()?)?;
            Ok(Value::Unit)
        }
        "components" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Number(layout.num_components() as f64))
        }
        "name" => {
            expect_method_arity(method, 0, args)?;
            Ok(Value::Str(layout.name().to_string()))
        }
        _ => Err(RuntimeError::UnknownMethod {
            type_name: "layout",
            method: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(source: &str) -> (Env, ExecContext) {
        let program = qlab_script::parse(source).unwrap();
        let bindings = BindingSet::photonic();
        let mut ctx = ExecContext::new(None);
        let mut interp = Interpreter::new(&bindings, &mut ctx);
        interp.run(&program).unwrap();
        let env = interp.into_env();
        (env, ctx)
    }

    #[test]
    fn test_arithmetic() {
        let (env, _) = run_script("let x = 2 + 3 * 4; let y = 2 ** 10; let z = 7 % 3;");
        assert_eq!(env.get("x").unwrap().as_number().unwrap(), 14.0);
        assert_eq!(env.get("y").unwrap().as_number().unwrap(), 1024.0);
        assert_eq!(env.get("z").unwrap().as_number().unwrap(), 1.0);
    }

    #[test]
    fn test_method_mutates_binding() {
        let (env, _) = run_script("let c = circuit(2); c.h(0); c.cx(0, 1);");
        let Value::Circuit(circuit) = env.get("c").unwrap() else {
            panic!("expected circuit");
        };
        assert_eq!(circuit.num_ops(), 2);
    }

    #[test]
    fn test_for_loop_builds_circuit() {
        let (env, _) = run_script("let c = circuit(4); for i in 0..4 { c.h(i); }");
        let Value::Circuit(circuit) = env.get("c").unwrap() else {
            panic!("expected circuit");
        };
        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.depth(), 1);
    }

    #[test]
    fn test_if_else() {
        let (env, _) = run_script("let x = 0; if 2 > 1 { x = 10; } else { x = 20; }");
        assert_eq!(env.get("x").unwrap().as_number().unwrap(), 10.0);
    }

    #[test]
    fn test_string_concat_in_print() {
        let (_, ctx) = run_script(r#"print("n = " + 3);"#);
        assert_eq!(ctx.sink.stdout, "n = 3\n");
    }

    #[test]
    fn test_undefined_variable() {
        let program = qlab_script::parse("let x = y + 1;").unwrap();
        let bindings = BindingSet::photonic();
        let mut ctx = ExecContext::new(None);
        let mut interp = Interpreter::new(&bindings, &mut ctx);
        let err = interp.run(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable(name) if name == "y"));
    }

    #[test]
    fn test_unknown_method() {
        let program = qlab_script::parse("let c = circuit(1); c.teleport(0);").unwrap();
        let bindings = BindingSet::photonic();
        let mut ctx = ExecContext::new(None);
        let mut interp = Interpreter::new(&bindings, &mut ctx);
        let err = interp.run(&program).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownMethod { .. }));
    }

    #[test]
    fn test_state_probabilities_method() {
        let (env, _) =
            run_script("let c = circuit(1); c.h(0); let s = run(c); let p = s.probabilities();");
        let probs = env.get("p").unwrap().as_number_array().unwrap();
        assert!((probs[0] - 0.5).abs() < 1e-10);
        assert!((probs[1] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_layout_script() {
        let program = qlab_script::parse(
            r#"let c = chip("mzi");
               let a = c.straight(0, 0);
               let b = c.coupler(20, 0);
               c.route(a, b);"#,
        )
        .unwrap();
        let bindings = BindingSet::layout();
        let mut ctx = ExecContext::new(None);
        let mut interp = Interpreter::new(&bindings, &mut ctx);
        interp.run(&program).unwrap();
        let env = interp.into_env();
        let Value::Layout(layout) = env.get("c").unwrap() else {
            panic!("expected layout");
        };
        assert_eq!(layout.num_components(), 2);
        assert_eq!(layout.routes().len(), 1);
    }

    #[test]
    fn test_array_index_out_of_bounds() {
        let program = qlab_script::parse("let a = [1, 2]; let b = a[5];").unwrap();
        let bindings = BindingSet::photonic();
        let mut ctx = ExecContext::new(None);
        let mut interp = Interpreter::new(&bindings, &mut ctx);
        assert!(matches!(
            interp.run(&program).unwrap_err(),
            RuntimeError::IndexOutOfBounds { index: 5, .. }
        ));
    }
}
