//! Per-execution capture context.

use std::time::{Duration, Instant};

use qlab_render::{Figure, to_base64};

use crate::error::RuntimeError;
use crate::value::Value;

/// The capture sink: everything one execution writes.
#[derive(Debug, Default)]
pub struct CaptureSink {
    /// Captured standard output text.
    pub stdout: String,
    /// Captured standard error text.
    pub stderr: String,
    /// Base64 PNG images, one per plot-display call, in call order.
    pub plots: Vec<String>,
}

impl CaptureSink {
    /// Append a line to captured stdout.
    pub fn print_line(&mut self, text: &str) {
        self.stdout.push_str(text);
        self.stdout.push('\n');
    }

    /// Append a line to captured stderr.
    pub fn error_line(&mut self, text: &str) {
        self.stderr.push_str(text);
        self.stderr.push('\n');
    }
}

/// Context owned by exactly one execution.
///
/// Holds the capture sink, the figure under construction, the wall-clock
/// deadline and any explicitly registered results. Because the context is
/// per-call there is nothing global to install or restore, and two
/// executions can never observe each other.
#[derive(Debug)]
pub struct ExecContext {
    /// The capture sink.
    pub sink: CaptureSink,
    /// Figure accumulating plot calls until the next `show()`.
    figure: Option<Figure>,
    /// Absolute deadline, if a timeout was configured.
    deadline: Option<Instant>,
    /// Results registered by the script via `result(...)`, in call order.
    registered: Vec<Value>,
}

impl ExecContext {
    /// Create a context; the deadline clock starts now.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            sink: CaptureSink::default(),
            figure: None,
            deadline: timeout.map(|t| Instant::now() + t),
            registered: Vec::new(),
        }
    }

    /// Fail if the deadline has passed. Checked at statement and
    /// loop-iteration boundaries.
    pub fn check_deadline(&self) -> Result<(), RuntimeError> {
        match self.deadline {
            Some(deadline) if Instant::now() > deadline => Err(RuntimeError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// The figure under construction, created on first use.
    pub fn figure_mut(&mut self) -> &mut Figure {
        self.figure.get_or_insert_with(Figure::new)
    }

    /// Flush the current figure to the plot sequence and release it.
    ///
    /// A `show()` with nothing plotted still captures an (empty) image, so
    /// the image count always equals the display-call count.
    pub fn flush_figure(&mut self) -> Result<(), RuntimeError> {
        let figure = self.figure.take().unwrap_or_default();
        let png = figure.render_png()?;
        self.sink.plots.push(to_base64(&png));
        Ok(())
    }

    /// Register an explicit result object.
    pub fn register_result(&mut self, value: Value) {
        self.registered.push(value);
    }

    /// Registered results in call order.
    pub fn registered(&self) -> &[Value] {
        &self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_in_the_past_fails() {
        let ctx = ExecContext::new(Some(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            ctx.check_deadline(),
            Err(RuntimeError::DeadlineExceeded)
        ));
    }

    #[test]
    fn test_no_deadline_never_fails() {
        let ctx = ExecContext::new(None);
        assert!(ctx.check_deadline().is_ok());
    }

    #[test]
    fn test_flush_captures_empty_figure() {
        let mut ctx = ExecContext::new(None);
        ctx.flush_figure().unwrap();
        ctx.flush_figure().unwrap();
        assert_eq!(ctx.sink.plots.len(), 2);
    }

    #[test]
    fn test_flush_releases_figure() {
        let mut ctx = ExecContext::new(None);
        ctx.figure_mut().bar(vec![1.0]);
        ctx.flush_figure().unwrap();
        // The next figure starts fresh.
        assert!(ctx.figure.is_none());
    }
}
