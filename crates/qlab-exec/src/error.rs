//! Runtime errors raised while executing a script.
//!
//! These never escape the executor: they are formatted into the captured
//! stderr text of the [`crate::ExecOutcome`].

use thiserror::Error;

/// Errors raised by the interpreter or the builtins.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    /// Name not bound in the namespace.
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Function not present in the binding set.
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    /// Method not supported by the receiver's type.
    #[error("Value of type {type_name} has no method '{method}'")]
    UnknownMethod {
        type_name: &'static str,
        method: String,
    },

    /// Operand or argument of the wrong type.
    #[error("Type error: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Wrong number of arguments.
    #[error("'{callee}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        callee: String,
        expected: usize,
        got: usize,
    },

    /// Array index outside bounds.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Explicitly raised by the script via `error(...)`.
    #[error("{0}")]
    Raised(String),

    /// Wall-clock deadline exceeded.
    #[error("execution timed out")]
    DeadlineExceeded,

    /// Circuit construction failed.
    #[error("{0}")]
    Circuit(#[from] qlab_ir::IrError),

    /// Simulation failed.
    #[error("{0}")]
    Sim(#[from] qlab_sim::SimError),

    /// Rendering failed.
    #[error("{0}")]
    Render(#[from] qlab_render::RenderError),
}
