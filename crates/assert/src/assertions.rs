//! Equivalence checks.
//!
//! Each check is a free function taking the failure sink first, and a method
//! on [`Assertions`], which holds the sink. Both forms return `true` when the
//! check passes and report exactly one failure otherwise.

use serde::Serialize;

use crate::diff::diff;
use crate::dump::dump;
use crate::html::{documents_equal, to_document, HtmlInput};
use crate::json::{json_equal, marshal_json};
use crate::message::Message;
use crate::report::{fail, fail_diff};
use crate::sink::FailureSink;

/// Assert that two values are deeply equal.
///
/// On mismatch the canonical dumps of both values are diffed.
#[track_caller]
pub fn deep_equal<S, E, A>(t: &S, expected: &E, actual: &A, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
    E: PartialEq<A> + Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    if expected == actual {
        return true;
    }
    log::debug!("deep_equal mismatch, dumping both values");
    fail_diff(t, "Structs differ", &diff(&dump(expected), &dump(actual)), msg)
}

/// Assert that two values have equivalent JSON representations.
///
/// Both values are marshaled to canonical JSON and compared in decoded form,
/// so formatting and key order are irrelevant. On mismatch the pretty-printed
/// JSON texts are diffed.
#[track_caller]
pub fn deep_equal_json<S, E, A>(t: &S, expected: &E, actual: &A, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    let msg = msg.into();
    let (expected_json, expected_value) = match marshal_json(expected) {
        Ok(marshaled) => marshaled,
        Err(err) => return fail(t, &format!("Error marshaling JSON: {err}"), msg),
    };
    let (actual_json, actual_value) = match marshal_json(actual) {
        Ok(marshaled) => marshaled,
        Err(err) => return fail(t, &format!("Error marshaling JSON: {err}"), msg),
    };
    if json_equal(&expected_value, &actual_value) {
        return true;
    }
    fail_diff(
        t,
        "JSON representations differ",
        &diff(&expected_json, &actual_json),
        msg,
    )
}

/// Assert that `actual` marshals to the JSON document `expected`.
///
/// An `expected` literal that is not valid JSON is reported on its own,
/// whatever `actual` holds.
#[track_caller]
pub fn marshals_to_json<S, A>(t: &S, expected: &[u8], actual: &A, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
    A: Serialize + ?Sized,
{
    let msg = msg.into();
    let expected_value: serde_json::Value = match serde_json::from_slice(expected) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("expected JSON literal does not parse: {err}");
            return fail(t, "Error unmarshaling expected JSON string", msg);
        }
    };
    let (actual_json, actual_value) = match marshal_json(actual) {
        Ok(marshaled) => marshaled,
        Err(err) => return fail(t, &format!("Error marshaling JSON: {err}"), msg),
    };
    if json_equal(&expected_value, &actual_value) {
        return true;
    }
    fail_diff(
        t,
        "JSON representations differ",
        &diff(&String::from_utf8_lossy(expected), &actual_json),
        msg,
    )
}

/// Assert that two strings are equal, showing a line-by-line diff otherwise.
#[track_caller]
pub fn lines_equal<S>(t: &S, expected: &str, actual: &str, msg: impl Into<Message>) -> bool
where
    S: FailureSink + ?Sized,
{
    if expected == actual {
        return true;
    }
    fail_diff(t, "Strings differ", &diff(expected, actual), msg)
}

/// Assert that two inputs represent equivalent HTML.
///
/// Accepts markup, bytes, a parsed [`scraper::Html`], a selected
/// [`scraper::ElementRef`] or an `Option` of any of these. An input that cannot
/// be turned into a document halts the test through
/// [`FailureSink::fail_now`], whichever facade is used.
#[track_caller]
pub fn html_equal<'e, 'a, S>(
    t: &S,
    expected: impl Into<HtmlInput<'e>>,
    actual: impl Into<HtmlInput<'a>>,
    msg: impl Into<Message>,
) -> bool
where
    S: FailureSink + ?Sized,
{
    let expected = match to_document(expected.into()) {
        Ok(document) => document,
        Err(err) => {
            t.report(format_args!("invalid expected document: {err}"));
            t.fail_now()
        }
    };
    let actual = match to_document(actual.into()) {
        Ok(document) => document,
        Err(err) => {
            t.report(format_args!("invalid actual document: {err}"));
            t.fail_now()
        }
    };
    if documents_equal(expected.html(), actual.html()) {
        return true;
    }
    fail_diff(
        t,
        "HTML differs",
        &diff(&expected.render(), &actual.render()),
        msg,
    )
}

/// Assertion methods bound to one failure sink.
///
/// ```
/// use assertdiff::{Assertions, Recorder};
///
/// let recorder = Recorder::new();
/// let assert = Assertions::new(&recorder);
/// assert!(assert.lines_equal("a\nb\n", "a\nb\n", ()));
/// assert!(!assert.lines_equal("a\nb\n", "a\nc\n", "second line"));
/// assert_eq!(recorder.failure_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Assertions<S> {
    sink: S,
}

impl<S: FailureSink> Assertions<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    #[track_caller]
    pub fn fail(&self, failure: &str, msg: impl Into<Message>) -> bool {
        fail(&self.sink, failure, msg)
    }

    #[track_caller]
    pub fn fail_diff(&self, failure: &str, diff: &str, msg: impl Into<Message>) -> bool {
        fail_diff(&self.sink, failure, diff, msg)
    }

    pub fn fail_now(&self) -> ! {
        self.sink.fail_now()
    }

    #[track_caller]
    pub fn deep_equal<E, A>(&self, expected: &E, actual: &A, msg: impl Into<Message>) -> bool
    where
        E: PartialEq<A> + Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        deep_equal(&self.sink, expected, actual, msg)
    }

    #[track_caller]
    pub fn deep_equal_json<E, A>(&self, expected: &E, actual: &A, msg: impl Into<Message>) -> bool
    where
        E: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        deep_equal_json(&self.sink, expected, actual, msg)
    }

    #[track_caller]
    pub fn marshals_to_json<A>(&self, expected: &[u8], actual: &A, msg: impl Into<Message>) -> bool
    where
        A: Serialize + ?Sized,
    {
        marshals_to_json(&self.sink, expected, actual, msg)
    }

    #[track_caller]
    pub fn lines_equal(&self, expected: &str, actual: &str, msg: impl Into<Message>) -> bool {
        lines_equal(&self.sink, expected, actual, msg)
    }

    #[track_caller]
    pub fn html_equal<'e, 'a>(
        &self,
        expected: impl Into<HtmlInput<'e>>,
        actual: impl Into<HtmlInput<'a>>,
        msg: impl Into<Message>,
    ) -> bool {
        html_equal(&self.sink, expected, actual, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::Recorder;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn user(name: &str, age: u32) -> User {
        User {
            name: name.to_string(),
            age,
        }
    }

    #[test]
    fn test_deep_equal_passes_without_report() {
        let recorder = Recorder::new();
        assert!(deep_equal(&recorder, &user("ann", 30), &user("ann", 30), ()));
        assert_eq!(recorder.failure_count(), 0);
    }

    #[test]
    fn test_deep_equal_maps_ignore_insertion_order() {
        let recorder = Recorder::new();
        let first: HashMap<_, _> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let second: HashMap<_, _> = [("c", 3), ("a", 1), ("b", 2)].into_iter().collect();
        assert!(deep_equal(&recorder, &first, &second, ()));
    }

    #[test]
    fn test_deep_equal_reports_dump_diff() {
        let recorder = Recorder::new();
        assert!(!deep_equal(&recorder, &user("ann", 30), &user("ann", 31), ()));

        let report = &recorder.failures()[0];
        assert!(report.contains("Structs differ"));
        assert!(report.contains("--- expected"));
        assert!(report.contains("-  age: (u32) 30,"));
        assert!(report.contains("+  age: (u32) 31,"));
    }

    #[test]
    fn test_deep_equal_difference_below_depth_limit_has_diff() {
        #[derive(Debug, PartialEq, Serialize)]
        struct Chain(Option<Box<Chain>>, u8);

        fn build(leaf: u8) -> Chain {
            let mut chain = Chain(None, leaf);
            for _ in 0..100 {
                chain = Chain(Some(Box::new(chain)), 0);
            }
            chain
        }

        let recorder = Recorder::new();
        assert!(!deep_equal(&recorder, &build(1), &build(2), ()));
        let report = &recorder.failures()[0];
        assert!(report.contains("Diff:"));
        assert!(report.contains("\t\t\t-"));
        assert!(report.contains("\t\t\t+"));
        assert!(report.contains("<max depth reached, digest "));
    }

    #[test]
    fn test_deep_equal_cyclic_values_use_caller_equality() {
        use std::cell::RefCell;
        use std::rc::Rc;

        // Equality stops at the link; the dump only shows the label.
        struct Ring {
            label: &'static str,
            next: RefCell<Option<Rc<Ring>>>,
        }

        impl PartialEq for Ring {
            fn eq(&self, other: &Self) -> bool {
                self.label == other.label
                    && match (&*self.next.borrow(), &*other.next.borrow()) {
                        (Some(a), Some(b)) => a.label == b.label,
                        (None, None) => true,
                        _ => false,
                    }
            }
        }

        impl Serialize for Ring {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.label)
            }
        }

        fn ring(label: &'static str) -> Rc<Ring> {
            let node = Rc::new(Ring {
                label,
                next: RefCell::new(None),
            });
            *node.next.borrow_mut() = Some(Rc::clone(&node));
            node
        }

        let recorder = Recorder::new();
        let (first, second) = (ring("a"), ring("a"));
        assert!(deep_equal(&recorder, &*first, &*second, ()));
        assert!(!deep_equal(&recorder, &*first, &*ring("b"), ()));
        assert_eq!(recorder.failure_count(), 1);
        assert!(recorder.failures()[0].contains("+(str) (len=1) \"b\""));

        for node in [first, second] {
            node.next.borrow_mut().take();
        }
    }

    #[test]
    fn test_deep_equal_mixed_types() {
        let recorder = Recorder::new();
        assert!(deep_equal(&recorder, &"abc".to_string(), "abc", ()));
    }

    #[test]
    fn test_deep_equal_json_ignores_key_order() {
        let recorder = Recorder::new();
        let expected = serde_json::json!({"a": 1, "b": 2});
        let actual: HashMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert!(deep_equal_json(&recorder, &expected, &actual, ()));
        assert_eq!(recorder.failure_count(), 0);
    }

    #[test]
    fn test_deep_equal_json_mismatch() {
        let recorder = Recorder::new();
        assert!(!deep_equal_json(&recorder, &user("ann", 30), &user("bob", 30), ()));
        let report = &recorder.failures()[0];
        assert!(report.contains("JSON representations differ"));
        assert!(report.contains("-    \"name\": \"ann\""));
        assert!(report.contains("+    \"name\": \"bob\""));
    }

    #[test]
    fn test_deep_equal_json_marshal_error_is_a_failure() {
        let recorder = Recorder::new();
        let bad: HashMap<(u8, u8), u8> = [((1, 1), 1)].into_iter().collect();
        assert!(!deep_equal_json(&recorder, &bad, &bad, ()));
        assert_eq!(recorder.failure_count(), 1);
        assert!(recorder.failures()[0].contains("Error marshaling JSON: "));
    }

    #[test]
    fn test_non_finite_floats_fail_to_marshal() {
        let recorder = Recorder::new();
        assert!(!deep_equal_json(&recorder, &f64::NAN, &None::<f64>, ()));
        assert!(!marshals_to_json(&recorder, b"null", &f64::INFINITY, ()));

        let failures = recorder.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("Error marshaling JSON: unsupported value: NaN"));
        assert!(failures[1].contains("Error marshaling JSON: unsupported value: inf"));
        assert!(!failures[0].contains("Diff:"));
    }

    #[test]
    fn test_marshals_to_json() {
        let recorder = Recorder::new();
        assert!(marshals_to_json(
            &recorder,
            br#"{"age": 30, "name": "ann"}"#,
            &user("ann", 30),
            ()
        ));
        assert!(!marshals_to_json(
            &recorder,
            br#"{"age": 31, "name": "ann"}"#,
            &user("ann", 30),
            ()
        ));
        assert!(recorder.failures()[0].contains("JSON representations differ"));
    }

    #[test]
    fn test_marshals_to_json_bad_literal() {
        let recorder = Recorder::new();
        assert!(!marshals_to_json(&recorder, b"{not json", &user("ann", 30), ()));
        let failures = recorder.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("Error unmarshaling expected JSON string"));
        assert!(!failures[0].contains("Diff:"));
    }

    #[test]
    fn test_lines_equal() {
        let recorder = Recorder::new();
        assert!(lines_equal(&recorder, "a\nb\n", "a\nb\n", ()));
        assert!(!lines_equal(&recorder, "a\nb\n", "a\nc\n", ()));

        let report = &recorder.failures()[0];
        assert!(report.contains("Strings differ"));
        assert!(report.contains("\t\t\t-b\n"));
        assert!(report.contains("\t\t\t+c\n"));
    }

    #[test]
    fn test_lines_equal_trailing_newline_only() {
        let recorder = Recorder::new();
        assert!(!lines_equal(&recorder, "a", "a\n", ()));
        // The texts differ but their normalized diff is empty.
        assert!(!recorder.failures()[0].contains("Diff:"));
    }

    #[test]
    fn test_html_equal() {
        let recorder = Recorder::new();
        assert!(html_equal(&recorder, "<p>hi</p>", "<p>hi</p>", ()));
        assert!(!html_equal(&recorder, "<p>hi</p>", "<p>bye</p>", ()));

        let report = &recorder.failures()[0];
        assert!(report.contains("HTML differs"));
        assert!(report.contains("-<html><head></head><body><p>hi</p></body></html>"));
        assert!(report.contains("+<html><head></head><body><p>bye</p></body></html>"));
    }

    #[test]
    fn test_html_equal_unsupported_input_halts() {
        let recorder = Recorder::new();
        let outcome = recorder.capture(|t| html_equal(t, "<p>", None::<&str>, ()));
        assert!(outcome.is_none());
        assert_eq!(
            recorder.failures(),
            vec!["invalid actual document: unknown type: no document supplied (None)"]
        );
    }

    #[test]
    fn test_method_form_matches_free_form() {
        let free = Recorder::new();
        let bound = Recorder::new();
        let assert = Assertions::new(&bound);

        assert_eq!(
            lines_equal(&free, "x", "y", "context"),
            assert.lines_equal("x", "y", "context")
        );
        assert_eq!(
            deep_equal(&free, &[1, 2], &[1, 3], ()),
            assert.deep_equal(&[1, 2], &[1, 3], ())
        );
        assert_eq!(free.failure_count(), bound.failure_count());

        let strip_trace = |report: &String| {
            report
                .lines()
                .filter(|line| !line.contains("Error Trace"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let free_reports: Vec<_> = free.failures().iter().map(strip_trace).collect();
        let bound_reports: Vec<_> = bound.failures().iter().map(strip_trace).collect();
        assert_eq!(free_reports, bound_reports);
    }

    #[test]
    fn test_trace_points_at_call_site() {
        let recorder = Recorder::new();
        let assert = Assertions::new(&recorder);
        let line = line!() + 1;
        assert.lines_equal("x", "y", ());
        assert!(recorder.failures()[0].contains(&format!("assertions.rs:{line}:")));
    }
}
