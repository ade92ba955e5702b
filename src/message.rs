//! Assertion messages and the rendering seam
//!
//! The chain never formats text itself. An assertion is raised with a
//! [`Message`] (a catalog key plus arguments) and the chain asks its
//! [`MessageRenderer`] to turn it into a [`RenderedMessage`] when an outcome
//! has to be recorded or reported.
//!
//! A real catalog (keyed lookup, locale formatting) lives outside this crate
//! and plugs in by implementing [`MessageRenderer`]. [`KeyRenderer`] is the
//! fallback used when no catalog is configured.

use std::fmt;

/// A message catalog key together with its positional arguments.
///
/// # Examples
///
/// ```
/// use fathom::Message;
///
/// let m = Message::new("number.at_least").arg(18).arg("age");
/// assert_eq!(m.key(), "number.at_least");
/// assert_eq!(m.args(), &["18".to_string(), "age".to_string()]);
///
/// let bare: Message = "user.present".into();
/// assert!(bare.args().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: String,
    args: Vec<String>,
}

impl Message {
    /// Create a message with no arguments.
    pub fn new(key: impl Into<String>) -> Self {
        Message {
            key: key.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument, stringified with `Display`.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// The catalog key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Positional arguments, in the order they were added.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl From<&str> for Message {
    fn from(key: &str) -> Self {
        Message::new(key)
    }
}

impl From<String> for Message {
    fn from(key: String) -> Self {
        Message::new(key)
    }
}

/// Text produced by a [`MessageRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// The rendered text.
    pub text: String,
}

impl fmt::Display for RenderedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Turns a catalog key and its arguments into human-readable text.
pub trait MessageRenderer {
    /// Render `key` with `args`.
    fn render(&self, key: &str, args: &[String]) -> RenderedMessage;
}

impl<F> MessageRenderer for F
where
    F: Fn(&str, &[String]) -> String,
{
    fn render(&self, key: &str, args: &[String]) -> RenderedMessage {
        RenderedMessage {
            text: self(key, args),
        }
    }
}

/// Renders the key followed by its arguments: `key(arg1, arg2)`.
///
/// # Examples
///
/// ```
/// use fathom::message::{KeyRenderer, MessageRenderer};
///
/// let text = KeyRenderer.render("number.at_least", &["18".to_string()]).text;
/// assert_eq!(text, "number.at_least(18)");
/// assert_eq!(KeyRenderer.render("user.present", &[]).text, "user.present");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyRenderer;

impl MessageRenderer for KeyRenderer {
    fn render(&self, key: &str, args: &[String]) -> RenderedMessage {
        let text = if args.is_empty() {
            key.to_string()
        } else {
            format!("{}({})", key, args.join(", "))
        };
        RenderedMessage { text }
    }
}
