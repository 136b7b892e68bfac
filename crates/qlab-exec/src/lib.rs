//! QLab Code-Capture Executor
//!
//! Runs caller-supplied QLab scripts against a fixed set of bindings and
//! turns everything the script does — printed text, error text, displayed
//! plots, produced circuits/states/layouts — into one structured
//! [`ExecOutcome`].
//!
//! Design points:
//!
//! - **No process-global state.** Output capture and the plot hook live in a
//!   per-execution [`ExecContext`]; concurrent executions are isolated by
//!   construction and nothing needs restoring on exit paths.
//! - **Faults are data.** Parse errors, runtime faults and deadline
//!   overruns inside the script are formatted into the captured stderr
//!   text; [`execute`] itself never fails.
//! - **Closed binding surface.** Scripts can only reach what the endpoint's
//!   [`BindingSet`] exposes. This bounds the API surface, not resources —
//!   the wall-clock deadline in [`ExecLimits`] covers runaway loops, and
//!   real deployments still want a process-level boundary.
//!
//! ```rust
//! use qlab_exec::{BindingSet, ExecLimits, ResultFilter, execute};
//!
//! let outcome = execute(
//!     r#"print("hi");"#,
//!     &BindingSet::photonic(),
//!     &ResultFilter::none(),
//!     &ExecLimits::default(),
//! );
//! assert_eq!(outcome.stdout, "hi\n");
//! assert!(outcome.stderr.is_empty());
//! ```

pub mod bindings;
pub mod context;
pub mod error;
pub mod executor;
pub mod interp;
pub mod value;

pub use bindings::BindingSet;
pub use context::{CaptureSink, ExecContext};
pub use error::RuntimeError;
pub use executor::{ExecLimits, ExecOutcome, ResultFilter, execute};
pub use value::Value;
