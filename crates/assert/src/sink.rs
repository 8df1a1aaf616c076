//! Failure sinks: where assertion failures are delivered.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The capability every assertion reports through.
///
/// `report` records a formatted failure and lets the test keep running.
/// `fail_now` stops the current test and never returns.
pub trait FailureSink {
    fn report(&self, args: fmt::Arguments<'_>);

    fn fail_now(&self) -> !;
}

impl<S: FailureSink + ?Sized> FailureSink for &S {
    fn report(&self, args: fmt::Arguments<'_>) {
        (**self).report(args)
    }

    fn fail_now(&self) -> ! {
        (**self).fail_now()
    }
}

fn lock(failures: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
    failures.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink for plain `#[test]` functions.
///
/// Reported failures are logged through `log::error!` as they happen, and the
/// full reports are repeated in the panic that fails the test. A reporter that is
/// dropped while holding failures panics, which fails the surrounding test
/// even when only non-fatal assertions were used.
///
/// ```should_panic
/// use assertdiff::{lines_equal, TestReporter};
///
/// let t = TestReporter::new();
/// lines_equal(&t, "a\nb\n", "a\nc\n", ());
/// // `t` is dropped here and the test fails with the recorded diff.
/// ```
#[derive(Debug, Default)]
pub struct TestReporter {
    failures: Mutex<Vec<String>>,
}

impl TestReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any failure has been reported so far.
    pub fn failed(&self) -> bool {
        !lock(&self.failures).is_empty()
    }

    /// Consume the reporter, panicking if anything was reported.
    pub fn finish(self) {
        // Drop performs the check.
    }

    fn take_summary(&self) -> Option<String> {
        let failures = std::mem::take(&mut *lock(&self.failures));
        if failures.is_empty() {
            return None;
        }
        Some(format!(
            "{} assertion(s) failed:\n{}",
            failures.len(),
            failures.join("\n")
        ))
    }
}

impl FailureSink for TestReporter {
    fn report(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        log::error!("assertion failed:{message}");
        lock(&self.failures).push(message);
    }

    fn fail_now(&self) -> ! {
        match self.take_summary() {
            Some(summary) => panic!("{summary}"),
            None => panic!("test halted by fail_now"),
        }
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        if let Some(summary) = self.take_summary() {
            panic!("{summary}");
        }
    }
}

/// Panic payload used by [`Recorder::fail_now`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailNow;

/// A sink that keeps every report for later inspection.
///
/// `fail_now` unwinds with a [`FailNow`] payload which [`Recorder::capture`]
/// turns back into a `None` result, so halting behaviour can be observed
/// without failing the enclosing test.
#[derive(Debug, Default)]
pub struct Recorder {
    failures: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far, oldest first.
    pub fn failures(&self) -> Vec<String> {
        lock(&self.failures).clone()
    }

    pub fn failure_count(&self) -> usize {
        lock(&self.failures).len()
    }

    /// Run `f` against this recorder.
    ///
    /// Returns `None` when `f` was stopped by [`FailureSink::fail_now`]. Any
    /// other panic is propagated unchanged.
    pub fn capture<R>(&self, f: impl FnOnce(&Self) -> R) -> Option<R> {
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(result) => Some(result),
            Err(payload) if payload.is::<FailNow>() => None,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl FailureSink for Recorder {
    fn report(&self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        log::debug!("recorded failure #{}", self.failure_count() + 1);
        lock(&self.failures).push(message);
    }

    fn fail_now(&self) -> ! {
        panic::panic_any(FailNow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_reports_in_order() {
        let recorder = Recorder::new();
        recorder.report(format_args!("first {}", 1));
        recorder.report(format_args!("second"));
        assert_eq!(recorder.failures(), vec!["first 1", "second"]);
    }

    #[test]
    fn test_capture_completes() {
        let recorder = Recorder::new();
        assert_eq!(recorder.capture(|_| 42), Some(42));
    }

    #[test]
    fn test_capture_stops_on_fail_now() {
        let recorder = Recorder::new();
        let result: Option<()> = recorder.capture(|t| {
            t.report(format_args!("boom"));
            t.fail_now()
        });
        assert!(result.is_none());
        assert_eq!(recorder.failure_count(), 1);
    }

    #[test]
    #[should_panic(expected = "unrelated")]
    fn test_capture_propagates_other_panics() {
        let recorder = Recorder::new();
        recorder.capture(|_| panic!("unrelated"));
    }

    #[test]
    fn test_reporter_without_failures_drops_quietly() {
        let reporter = TestReporter::new();
        assert!(!reporter.failed());
        reporter.finish();
    }

    #[test]
    #[should_panic(expected = "1 assertion(s) failed")]
    fn test_reporter_panics_on_drop_with_failures() {
        let reporter = TestReporter::new();
        reporter.report(format_args!("broken"));
        assert!(reporter.failed());
    }

    #[test]
    #[should_panic(expected = "broken")]
    fn test_reporter_fail_now_includes_reports() {
        let reporter = TestReporter::new();
        reporter.report(format_args!("broken"));
        reporter.fail_now();
    }

    #[test]
    fn test_reporter_summary_holds_each_report_once() {
        let reporter = TestReporter::new();
        reporter.report(format_args!("first"));
        reporter.report(format_args!("second"));
        let summary = reporter.take_summary().unwrap();
        assert_eq!(summary, "2 assertion(s) failed:\nfirst\nsecond");
        assert!(!reporter.failed());
    }

    #[test]
    fn test_sink_through_reference() {
        let recorder = Recorder::new();
        let by_ref: &dyn FailureSink = &recorder;
        (&by_ref).report(format_args!("via ref"));
        assert_eq!(recorder.failures(), vec!["via ref"]);
    }
}
