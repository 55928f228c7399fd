//! Logging capability handed to the pipeline
//!
//! The fetcher and the pipeline report retries and completion through a
//! [`Reporter`] rather than a global logger, so tests can observe exactly
//! what was reported.

/// Receiver for the run's user-facing log lines
pub trait Reporter {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Reporter that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn info(&self, message: &str) {
        (**self).info(message)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}
