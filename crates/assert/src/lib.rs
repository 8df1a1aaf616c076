//! Equivalence assertions that explain themselves with a diff.
//!
//! Four notions of equality are provided, each reporting a unified diff of the
//! two sides when they disagree:
//! - [`deep_equal`]: `PartialEq`, diffing canonical dumps of both values
//! - [`deep_equal_json`] and [`marshals_to_json`]: equality of decoded JSON
//! - [`lines_equal`]: exact string equality, diffing the raw texts
//! - [`html_equal`]: structural equality of parsed HTML documents
//!
//! Failures go to a [`FailureSink`]. Use [`TestReporter`] inside a `#[test]`,
//! or [`Recorder`] to inspect reports. The `assertdiff-require` crate wraps
//! every check so that a failure also halts the test.
//!
//! # Example
//!
//! ```
//! use assertdiff::{deep_equal_json, lines_equal, TestReporter};
//! use serde_json::json;
//!
//! let t = TestReporter::new();
//! lines_equal(&t, "a\nb\n", "a\nb\n", ());
//! deep_equal_json(&t, &json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1}), ());
//! t.finish();
//! ```

mod assertions;
pub mod diff;
pub mod dump;
pub mod html;
pub mod json;
mod message;
mod report;
mod sink;

pub use assertions::{
    deep_equal, deep_equal_json, html_equal, lines_equal, marshals_to_json, Assertions,
};
pub use diff::{diff, diff_with_config, DiffConfig};
pub use dump::{dump, normalize_volatile};
pub use html::{HtmlError, HtmlInput};
pub use message::Message;
pub use report::{fail, fail_diff, FailureReport};
pub use sink::{FailNow, FailureSink, Recorder, TestReporter};
