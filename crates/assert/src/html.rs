//! HTML inputs, normalization to parsed documents, and structural comparison.

use scraper::{ElementRef, Html, Node};
use thiserror::Error;

/// Errors turning an [`HtmlInput`] into a document.
#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("document bytes are not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("unknown type: no document supplied (None)")]
    Nil,
}

/// Every representation accepted by `html_equal`.
#[derive(Debug, Clone, Copy)]
pub enum HtmlInput<'a> {
    /// Markup text.
    Markup(&'a str),
    /// Raw bytes, which must be UTF-8.
    Bytes(&'a [u8]),
    /// A document that was already parsed.
    Document(&'a Html),
    /// A selected element; its outer HTML is parsed as a new document.
    Selection(ElementRef<'a>),
    /// Nothing was supplied.
    Nil,
}

impl<'a> From<&'a str> for HtmlInput<'a> {
    fn from(markup: &'a str) -> Self {
        HtmlInput::Markup(markup)
    }
}

impl<'a> From<&'a String> for HtmlInput<'a> {
    fn from(markup: &'a String) -> Self {
        HtmlInput::Markup(markup)
    }
}

impl<'a> From<&'a [u8]> for HtmlInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        HtmlInput::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for HtmlInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        HtmlInput::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for HtmlInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        HtmlInput::Bytes(bytes)
    }
}

impl<'a> From<&'a Html> for HtmlInput<'a> {
    fn from(document: &'a Html) -> Self {
        HtmlInput::Document(document)
    }
}

impl<'a> From<ElementRef<'a>> for HtmlInput<'a> {
    fn from(selection: ElementRef<'a>) -> Self {
        HtmlInput::Selection(selection)
    }
}

impl<'a, T: Into<HtmlInput<'a>>> From<Option<T>> for HtmlInput<'a> {
    fn from(input: Option<T>) -> Self {
        input.map_or(HtmlInput::Nil, Into::into)
    }
}

/// A parsed document, either borrowed from the caller or parsed here.
#[derive(Debug)]
pub enum HtmlDocument<'a> {
    Borrowed(&'a Html),
    Owned(Html),
}

impl HtmlDocument<'_> {
    pub fn html(&self) -> &Html {
        match self {
            HtmlDocument::Borrowed(document) => document,
            HtmlDocument::Owned(document) => document,
        }
    }

    /// Re-render the document as markup.
    pub fn render(&self) -> String {
        self.html().html()
    }
}

/// Normalize any accepted input into a parsed document.
pub fn to_document(input: HtmlInput<'_>) -> Result<HtmlDocument<'_>, HtmlError> {
    match input {
        HtmlInput::Document(document) => Ok(HtmlDocument::Borrowed(document)),
        HtmlInput::Markup(markup) => Ok(HtmlDocument::Owned(Html::parse_document(markup))),
        HtmlInput::Bytes(bytes) => {
            let markup = std::str::from_utf8(bytes)?;
            Ok(HtmlDocument::Owned(Html::parse_document(markup)))
        }
        HtmlInput::Selection(selection) => {
            Ok(HtmlDocument::Owned(Html::parse_document(&selection.html())))
        }
        HtmlInput::Nil => Err(HtmlError::Nil),
    }
}

/// One node of a document, without its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    Document,
    Fragment,
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    Comment(String),
    Text(String),
    /// Attributes are sorted by name; their source order carries no meaning.
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    ProcessingInstruction {
        target: String,
        data: String,
    },
}

impl HtmlNode {
    fn from_node(node: &Node) -> Self {
        match node {
            Node::Document => HtmlNode::Document,
            Node::Fragment => HtmlNode::Fragment,
            Node::Doctype(doctype) => HtmlNode::Doctype {
                name: doctype.name().to_string(),
                public_id: doctype.public_id().to_string(),
                system_id: doctype.system_id().to_string(),
            },
            Node::Comment(comment) => HtmlNode::Comment(owned(comment)),
            Node::Text(text) => HtmlNode::Text(owned(text)),
            Node::Element(element) => {
                let mut attrs: Vec<(String, String)> = element
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                attrs.sort();
                HtmlNode::Element {
                    name: element.name().to_string(),
                    attrs,
                }
            }
            Node::ProcessingInstruction(instruction) => HtmlNode::ProcessingInstruction {
                target: instruction.target.to_string(),
                data: owned(instruction),
            },
        }
    }
}

fn owned(text: &str) -> String {
    text.to_string()
}

/// A document flattened into its pre-order `(depth, node)` sequence.
///
/// Two ordered trees are equal exactly when these sequences are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlTree {
    nodes: Vec<(usize, HtmlNode)>,
}

impl HtmlTree {
    pub fn from_document(document: &Html) -> Self {
        let nodes = document
            .tree
            .root()
            .descendants()
            .map(|node| (node.ancestors().count(), HtmlNode::from_node(node.value())))
            .collect();
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Structural equality of two parsed documents.
pub fn documents_equal(expected: &Html, actual: &Html) -> bool {
    HtmlTree::from_document(expected) == HtmlTree::from_document(actual)
}
