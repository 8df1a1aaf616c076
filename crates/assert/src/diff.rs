//! Unified diffs between expected and actual text.

use similar::TextDiff;

/// Configuration for diff generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffConfig {
    /// Number of context lines around each change (default: 2)
    pub context_lines: usize,
    /// File label for the expected side
    pub expected_label: String,
    /// File label for the actual side
    pub actual_label: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: 2,
            expected_label: "expected".to_string(),
            actual_label: "actual".to_string(),
        }
    }
}

/// Unified diff of `expected` against `actual` with the default configuration.
///
/// Returns an empty string when the texts only differ by a trailing newline.
pub fn diff(expected: &str, actual: &str) -> String {
    diff_with_config(expected, actual, &DiffConfig::default())
}

/// Unified diff of `expected` against `actual`.
///
/// Both inputs are terminated with exactly one newline before diffing.
///
/// # Panics
///
/// If the diff cannot be rendered. That means the diff engine itself is
/// broken, not that the inputs differ.
pub fn diff_with_config(expected: &str, actual: &str, config: &DiffConfig) -> String {
    let expected = ensure_trailing_newline(expected);
    let actual = ensure_trailing_newline(actual);

    let text_diff = TextDiff::from_lines(expected.as_str(), actual.as_str());
    let mut output = Vec::new();
    let written = text_diff
        .unified_diff()
        .context_radius(config.context_lines)
        .header(&config.expected_label, &config.actual_label)
        .to_writer(&mut output);

    if let Err(err) = written {
        panic!("Error producing diff: {err}");
    }
    String::from_utf8(output).unwrap_or_else(|err| panic!("Error producing diff: {err}"))
}

fn ensure_trailing_newline(text: &str) -> String {
    let mut text = text.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
