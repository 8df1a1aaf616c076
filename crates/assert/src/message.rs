use std::fmt;

/// Optional user-supplied context attached to a failure report.
///
/// Accepts `()` for "no message", string types, or `format_args!`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message(Option<String>);

impl Message {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<()> for Message {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

impl From<Option<String>> for Message {
    fn from(message: Option<String>) -> Self {
        Self(message.filter(|m| !m.is_empty()))
    }
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Some(message).into()
    }
}

impl From<&str> for Message {
    fn from(message: &str) -> Self {
        message.to_string().into()
    }
}

impl From<&String> for Message {
    fn from(message: &String) -> Self {
        message.as_str().into()
    }
}

impl From<fmt::Arguments<'_>> for Message {
    fn from(args: fmt::Arguments<'_>) -> Self {
        args.to_string().into()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or_default())
    }
}
