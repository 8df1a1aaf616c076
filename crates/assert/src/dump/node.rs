//! Dump tree and its text rendering.

use sha2::{Digest, Sha256};

const INDENT: &str = "  ";

/// Bytes of the subtree digest kept in a truncation marker.
const DIGEST_BYTES: usize = 8;

/// A value as seen through its `Serialize` impl.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpNode {
    /// A leaf, e.g. `(i32) 5` or `(Enum::Variant)`.
    Scalar { ty: String, repr: Option<String> },
    /// A single wrapped value, e.g. `Some` or a newtype struct.
    Wrapped { ty: String, inner: Box<DumpNode> },
    /// Sequences and tuples, in order.
    Seq {
        ty: String,
        open: char,
        close: char,
        items: Vec<DumpNode>,
    },
    /// Keyed containers. Rendered with entries sorted by key.
    Map {
        ty: String,
        entries: Vec<(DumpNode, DumpNode)>,
    },
    /// Structs and struct variants, in declaration order.
    Struct {
        ty: String,
        fields: Vec<(&'static str, DumpNode)>,
    },
    /// Stand-in for anything nested deeper than the dump limit, identified
    /// by a digest of its full rendering.
    Truncated { digest: String },
}

impl DumpNode {
    pub fn scalar(ty: impl Into<String>, repr: impl Into<String>) -> Self {
        Self::Scalar {
            ty: ty.into(),
            repr: Some(repr.into()),
        }
    }

    pub fn marker(ty: impl Into<String>) -> Self {
        Self::Scalar {
            ty: ty.into(),
            repr: None,
        }
    }

    /// Fold `node` into a truncation marker.
    pub fn truncated(node: &DumpNode) -> Self {
        let mut text = String::new();
        node.render(&mut text, 0);
        let hash: [u8; 32] = Sha256::digest(text.as_bytes()).into();
        let digest = hash[..DIGEST_BYTES]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        Self::Truncated { digest }
    }

    /// Render with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, 0);
        out.push('\n');
        out
    }

    fn render(&self, out: &mut String, depth: usize) {
        match self {
            DumpNode::Scalar { ty, repr } => {
                out.push_str(&format!("({ty})"));
                if let Some(repr) = repr {
                    out.push(' ');
                    out.push_str(repr);
                }
            }
            DumpNode::Wrapped { ty, inner } => {
                out.push_str(&format!("({ty}) "));
                inner.render(out, depth);
            }
            DumpNode::Seq {
                ty,
                open,
                close,
                items,
            } => {
                out.push_str(&format!("({ty}) (len={}) {open}", items.len()));
                if items.is_empty() {
                    out.push(*close);
                    return;
                }
                out.push('\n');
                for item in items {
                    push_indent(out, depth + 1);
                    item.render(out, depth + 1);
                    out.push_str(",\n");
                }
                push_indent(out, depth);
                out.push(*close);
            }
            DumpNode::Map { ty, entries } => {
                out.push_str(&format!("({ty}) (len={}) {{", entries.len()));
                if entries.is_empty() {
                    out.push('}');
                    return;
                }
                let mut rendered: Vec<(MapKey, String, String)> = entries
                    .iter()
                    .map(|(key, value)| {
                        let mut key_text = String::new();
                        key.render(&mut key_text, depth + 1);
                        let mut value_text = String::new();
                        value.render(&mut value_text, depth + 1);
                        (MapKey::of(key), key_text, value_text)
                    })
                    .collect();
                rendered.sort();
                out.push('\n');
                for (_, key, value) in rendered {
                    push_indent(out, depth + 1);
                    out.push_str(&format!("{key}: {value},\n"));
                }
                push_indent(out, depth);
                out.push('}');
            }
            DumpNode::Struct { ty, fields } => {
                out.push_str(&format!("({ty}) {{"));
                if fields.is_empty() {
                    out.push('}');
                    return;
                }
                out.push('\n');
                for (name, value) in fields {
                    push_indent(out, depth + 1);
                    out.push_str(name);
                    out.push_str(": ");
                    value.render(out, depth + 1);
                    out.push_str(",\n");
                }
                push_indent(out, depth);
                out.push('}');
            }
            DumpNode::Truncated { digest } => {
                out.push_str(&format!("<max depth reached, digest {digest}>"))
            }
        }
    }
}

/// Sort key for map entries: integer keys by value, everything else by text.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum MapKey {
    Integer(i128),
    Text,
}

impl MapKey {
    fn of(key: &DumpNode) -> Self {
        match key {
            DumpNode::Scalar {
                ty,
                repr: Some(repr),
            } if is_integer_type(ty) => repr.parse().map_or(MapKey::Text, MapKey::Integer),
            _ => MapKey::Text,
        }
    }
}

fn is_integer_type(ty: &str) -> bool {
    matches!(
        ty,
        "i8" | "i16" | "i32" | "i64" | "i128" | "u8" | "u16" | "u32" | "u64" | "u128"
    )
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_marker() {
        assert_eq!(DumpNode::scalar("i32", "5").to_text(), "(i32) 5\n");
        assert_eq!(DumpNode::marker("()").to_text(), "(())\n");
    }

    #[test]
    fn test_nested_indentation() {
        let node = DumpNode::Struct {
            ty: "Point".to_string(),
            fields: vec![
                ("x", DumpNode::scalar("i32", "1")),
                (
                    "tags",
                    DumpNode::Seq {
                        ty: "Vec".to_string(),
                        open: '[',
                        close: ']',
                        items: vec![DumpNode::scalar("u8", "7")],
                    },
                ),
            ],
        };
        assert_eq!(
            node.to_text(),
            "(Point) {\n  x: (i32) 1,\n  tags: (Vec) (len=1) [\n    (u8) 7,\n  ],\n}\n"
        );
    }

    #[test]
    fn test_map_entries_sorted_by_key() {
        let node = DumpNode::Map {
            ty: "map".to_string(),
            entries: vec![
                (DumpNode::scalar("str", "\"b\""), DumpNode::scalar("i32", "2")),
                (DumpNode::scalar("str", "\"a\""), DumpNode::scalar("i32", "1")),
            ],
        };
        assert_eq!(
            node.to_text(),
            "(map) (len=2) {\n  (str) \"a\": (i32) 1,\n  (str) \"b\": (i32) 2,\n}\n"
        );
    }

    #[test]
    fn test_integer_keys_sorted_by_value() {
        let entries = [10, 9, -3, 100]
            .iter()
            .map(|k| {
                (
                    DumpNode::scalar("i32", k.to_string()),
                    DumpNode::marker("()"),
                )
            })
            .collect();
        let node = DumpNode::Map {
            ty: "map".to_string(),
            entries,
        };
        let keys: Vec<_> = node
            .to_text()
            .lines()
            .skip(1)
            .filter_map(|line| line.trim().strip_suffix(": (()),"))
            .map(str::to_string)
            .collect();
        assert_eq!(keys, ["(i32) -3", "(i32) 9", "(i32) 10", "(i32) 100"]);
    }

    #[test]
    fn test_truncated_marker_tracks_content() {
        let one = DumpNode::truncated(&DumpNode::scalar("u8", "1"));
        let two = DumpNode::truncated(&DumpNode::scalar("u8", "2"));
        assert_ne!(one, two);
        assert_eq!(one, DumpNode::truncated(&DumpNode::scalar("u8", "1")));
        let text = one.to_text();
        assert!(text.starts_with("<max depth reached, digest "));
        assert_eq!(text.len(), "<max depth reached, digest >\n".len() + 16);
    }

    #[test]
    fn test_empty_containers_stay_on_one_line() {
        let seq = DumpNode::Seq {
            ty: "tuple".to_string(),
            open: '(',
            close: ')',
            items: vec![],
        };
        assert_eq!(seq.to_text(), "(tuple) (len=0) ()\n");
    }
}
