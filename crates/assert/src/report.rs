//! Failure report formatting.

use std::fmt;
use std::panic::Location;

use crate::message::Message;
use crate::sink::FailureSink;

/// A fully assembled failure, ready to be handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// `file:line:column` of the assertion call site.
    pub trace: String,
    /// One-line description such as "Strings differ".
    pub failure: String,
    /// Name of the running test, when the thread carries one.
    pub test_name: Option<String>,
    /// Unified diff; empty means no diff section.
    pub diff: String,
    pub message: Message,
}

impl FailureReport {
    #[track_caller]
    pub fn new(failure: impl Into<String>) -> Self {
        Self {
            trace: caller_info(),
            failure: failure.into(),
            test_name: test_name(),
            diff: String::new(),
            message: Message::none(),
        }
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<Message>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "\tError Trace:\t{}", self.trace)?;
        writeln!(f, "\tError:\t\t{}", indent_message_lines(&self.failure, 2))?;
        if let Some(name) = &self.test_name {
            writeln!(f, "\tTest:\t\t{name}")?;
        }
        if !self.diff.is_empty() {
            writeln!(f, "\tDiff:")?;
            writeln!(f, "{}", indent_all_lines(&self.diff, 3))?;
        }
        if let Some(message) = self.message.as_str() {
            writeln!(f, "\tMessages:\t{}", indent_message_lines(message, 2))?;
        }
        Ok(())
    }
}

#[track_caller]
fn caller_info() -> String {
    let location = Location::caller();
    format!(
        "{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    )
}

fn test_name() -> Option<String> {
    std::thread::current()
        .name()
        .filter(|name| *name != "main")
        .map(str::to_string)
}

/// Indent every line after the first so multi-line text lines up under its label.
fn indent_message_lines(message: &str, tabs: usize) -> String {
    let separator = format!("\n{}", "\t".repeat(tabs));
    message.lines().collect::<Vec<_>>().join(&separator)
}

fn indent_all_lines(text: &str, tabs: usize) -> String {
    let prefix = "\t".repeat(tabs);
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report a failure without a diff. Always returns `false`.
#[track_caller]
pub fn fail<S>(t: &S, failure: &str, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
{
    fail_diff(t, failure, "", msg)
}

/// Report a failure with a contextual diff. Always returns `false`.
///
/// An empty `diff` produces the same report as [`fail`].
#[track_caller]
pub fn fail_diff<S>(t: &S, failure: &str, diff: &str, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
{
    let report = FailureReport::new(failure)
        .with_diff(diff)
        .with_message(msg);
    t.report(format_args!("{report}"));
    false
}
