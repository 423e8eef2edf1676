// Path: crates/telemetry/src/time.rs
use std::time::Instant;

/// Logs how long a scope took when dropped.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Starts timing a scope named `label`.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Seconds elapsed so far.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        tracing::debug!(
            target: "telemetry",
            scope = self.label,
            elapsed_secs = self.elapsed_secs(),
            "scope finished"
        );
    }
}
