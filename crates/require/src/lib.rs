//! Fatal equivalence assertions.
//!
//! Every function here runs the matching `assertdiff` check and, when it
//! fails, halts the test through [`FailureSink::fail_now`] right after the
//! failure has been reported. Control never returns to the test body after a
//! failed check.
//!
//! ```should_panic
//! use assertdiff_require::{lines_equal, TestReporter};
//!
//! let t = TestReporter::new();
//! lines_equal(&t, "a\nb\n", "a\nc\n", ());
//! unreachable!("lines_equal halts the test");
//! ```

use serde::Serialize;

pub use assertdiff::{FailureSink, HtmlInput, Message, Recorder, TestReporter};

#[track_caller]
fn require<S>(t: &S, passed: bool)
where
    S: FailureSink + ?Sized,
{
    if !passed {
        log::debug!(
            "required check failed at {}, halting",
            std::panic::Location::caller()
        );
        t.fail_now();
    }
}

/// Report a failure, then halt.
#[track_caller]
pub fn fail<S>(t: &S, failure: &str, msg: impl Into<Message>) -> !
where
    S: FailureSink + ?Sized,
{
    assertdiff::fail(t, failure, msg);
    t.fail_now()
}

/// Require that two values are deeply equal.
#[track_caller]
pub fn deep_equal<S, E, A>(t: &S, expected: &E, actual: &A, msg: impl Into<Message>)
where
    S: FailureSink + ?Sized,
    E: PartialEq<A> + Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    require(t, assertdiff::deep_equal(t, expected, actual, msg));
}

/// Require that two values have equivalent JSON representations.
#[track_caller]
pub fn deep_equal_json<S, E, A>(t: &S, expected: &E, actual: &A, msg: impl Into<Message>)
where
    S: FailureSink + ?Sized,
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    require(t, assertdiff::deep_equal_json(t, expected, actual, msg));
}

/// Require that `actual` marshals to the JSON document `expected`.
#[track_caller]
pub fn marshals_to_json<S, A>(t: &S, expected: &[u8], actual: &A, msg: impl Into<Message>)
where
    S: FailureSink + ?Sized,
    A: Serialize + ?Sized,
{
    require(t, assertdiff::marshals_to_json(t, expected, actual, msg));
}

/// Require that two strings are equal.
#[track_caller]
pub fn lines_equal<S>(t: &S, expected: &str, actual: &str, msg: impl Into<Message>)
where
    S: FailureSink + ?Sized,
{
    require(t, assertdiff::lines_equal(t, expected, actual, msg));
}

/// Require that two inputs represent equivalent HTML.
#[track_caller]
pub fn html_equal<'e, 'a, S>(
    t: &S,
    expected: impl Into<HtmlInput<'e>>,
    actual: impl Into<HtmlInput<'a>>,
    msg: impl Into<Message>,
) where
    S: FailureSink + ?Sized,
{
    require(t, assertdiff::html_equal(t, expected, actual, msg));
}

/// Fatal assertion methods bound to one failure sink.
#[derive(Debug, Clone)]
pub struct Assertions<S> {
    inner: assertdiff::Assertions<S>,
}

impl<S: FailureSink> Assertions<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: assertdiff::Assertions::new(sink),
        }
    }

    pub fn sink(&self) -> &S {
        self.inner.sink()
    }

    /// The non-fatal assertions over the same sink.
    pub fn assert(&self) -> &assertdiff::Assertions<S> {
        &self.inner
    }

    #[track_caller]
    pub fn fail(&self, failure: &str, msg: impl Into<Message>) -> ! {
        fail(self.sink(), failure, msg)
    }

    pub fn fail_now(&self) -> ! {
        self.inner.fail_now()
    }

    #[track_caller]
    pub fn deep_equal<E, A>(&self, expected: &E, actual: &A, msg: impl Into<Message>)
    where
        E: PartialEq<A> + Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        deep_equal(self.sink(), expected, actual, msg)
    }

    #[track_caller]
    pub fn deep_equal_json<E, A>(&self, expected: &E, actual: &A, msg: impl Into<Message>)
    where
        E: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        deep_equal_json(self.sink(), expected, actual, msg)
    }

    #[track_caller]
    pub fn marshals_to_json<A>(&self, expected: &[u8], actual: &A, msg: impl Into<Message>)
    where
        A: Serialize + ?Sized,
    {
        marshals_to_json(self.sink(), expected, actual, msg)
    }

    #[track_caller]
    pub fn lines_equal(&self, expected: &str, actual: &str, msg: impl Into<Message>) {
        lines_equal(self.sink(), expected, actual, msg)
    }

    #[track_caller]
    pub fn html_equal<'e, 'a>(
        &self,
        expected: impl Into<HtmlInput<'e>>,
        actual: impl Into<HtmlInput<'a>>,
        msg: impl Into<Message>,
    ) {
        html_equal(self.sink(), expected, actual, msg)
    }
}
