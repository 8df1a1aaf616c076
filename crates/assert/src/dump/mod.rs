//! Canonical text dumps of arbitrary values.
//!
//! A dump is what `deep_equal` diffs when two values are not equal. Two values
//! that compare equal dump to the same text:
//! - keyed containers are emitted with their entries sorted, so the iteration
//!   order of a `HashMap` never leaks into the output
//! - only data reaches the dump, since it is driven by the value's `Serialize` impl
//! - volatile details (capacity and address annotations) are replaced by fixed
//!   placeholders, see [`normalize_volatile`]
//! - nesting deeper than [`MAX_DEPTH`] is folded into a digest, so differences
//!   below the limit still show up as a changed line
//!
//! # Unordered sets
//!
//! Serde presents a `HashSet` exactly like a `Vec`, so its elements are dumped
//! in hash iteration order and two equal sets may dump differently. Equality
//! itself is unaffected, but the diff of a failed `deep_equal` can then show
//! set elements moving around the real change. Use `BTreeSet` in values that
//! are compared with `deep_equal`.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use assertdiff::dump;
//!
//! let mut first = HashMap::new();
//! first.insert("b", 2);
//! first.insert("a", 1);
//!
//! let mut second = HashMap::new();
//! second.insert("a", 1);
//! second.insert("b", 2);
//!
//! assert_eq!(dump(&first), dump(&second));
//! ```

mod node;
mod serializer;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use node::DumpNode;
pub use serializer::{DumpError, MAX_DEPTH};

use serializer::DumpSerializer;

static CAPACITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"cap=[0-9]+\)").unwrap());
const CAPACITY_REPLACEMENT: &str = "cap=X)";

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(0x[0-9a-f]{6,10}\)").unwrap());
const ADDRESS_REPLACEMENT: &str = "(0xXXXXXXXXXX)";

/// Build the dump tree for `value`.
pub fn dump_tree<T: Serialize + ?Sized>(value: &T) -> Result<DumpNode, DumpError> {
    value.serialize(DumpSerializer::default())
}

/// Render `value` as a deterministic, normalized, indented dump.
///
/// A value whose `Serialize` impl fails is rendered as a one-line error marker
/// so a diff can still be shown next to the other side.
pub fn dump<T: Serialize + ?Sized>(value: &T) -> String {
    let text = match dump_tree(value) {
        Ok(node) => node.to_text(),
        Err(err) => {
            log::debug!("dump failed: {err}");
            format!("<unable to dump value: {err}>\n")
        }
    };
    normalize_volatile(&text)
}

/// Fail if `value` holds a float with no JSON encoding (NaN or an infinity).
pub fn ensure_json_floats<T: Serialize + ?Sized>(value: &T) -> Result<(), DumpError> {
    value.serialize(DumpSerializer::rejecting_non_finite())?;
    Ok(())
}

/// Replace capacity counts and memory-address annotations with placeholders.
pub fn normalize_volatile(text: &str) -> String {
    let text = CAPACITY_RE.replace_all(text, CAPACITY_REPLACEMENT);
    ADDRESS_RE
        .replace_all(&text, ADDRESS_REPLACEMENT)
        .into_owned()
}
