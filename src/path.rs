//! Dotted path expressions
//!
//! A path names a route from a value to one of its nested members or
//! behavior results:
//!
//! ```text
//! address.city              member, member
//! shape.area(0)             member, zero-argument call
//! grid.cell(2).label(lang)  member, positional call, named call
//! ```
//!
//! The path is split on `.` characters outside parentheses, and each segment
//! is classified by two mutually exclusive grammars:
//!
//! - numeric call `ident(N)`: `N` is the declared arity, bound positionally;
//! - named call `ident(a, b)`: zero or more bare identifiers, bound by name.
//!
//! A bare `ident` is a member access. Anything else is a [`PathError`].
//!
//! # Examples
//!
//! ```
//! use fathom::path::{parse_path, CallParams, SegmentKind};
//!
//! let segments = parse_path("grid.cell(2).label(lang)").unwrap();
//! assert_eq!(segments.len(), 3);
//! assert_eq!(segments[0].kind, SegmentKind::Member);
//! assert_eq!(segments[1].kind, SegmentKind::Call(CallParams::Arity(2)));
//! assert_eq!(
//!     segments[2].kind,
//!     SegmentKind::Call(CallParams::Named(vec!["lang".to_string()]))
//! );
//! ```

use std::fmt;

/// Parameters a call segment declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallParams {
    /// `ident(a, b)`: parameter names, looked up in a named argument map.
    Named(Vec<String>),
    /// `ident(N)`: number of arguments taken from a positional or typed queue.
    Arity(usize),
}

impl CallParams {
    /// Number of arguments the call takes.
    pub fn arity(&self) -> usize {
        match self {
            CallParams::Named(names) => names.len(),
            CallParams::Arity(n) => *n,
        }
    }
}

/// How a segment is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Plain member access.
    Member,
    /// Behavior invocation.
    Call(CallParams),
}

/// One dot-separated unit of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// Member or behavior name.
    pub identifier: String,
    /// Member access or call.
    pub kind: SegmentKind,
}

impl PathSegment {
    /// A member access segment.
    pub fn member(identifier: impl Into<String>) -> Self {
        PathSegment {
            identifier: identifier.into(),
            kind: SegmentKind::Member,
        }
    }

    /// A call segment.
    pub fn call(identifier: impl Into<String>, params: CallParams) -> Self {
        PathSegment {
            identifier: identifier.into(),
            kind: SegmentKind::Call(params),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SegmentKind::Member => f.write_str(&self.identifier),
            SegmentKind::Call(CallParams::Arity(n)) => write!(f, "{}({})", self.identifier, n),
            SegmentKind::Call(CallParams::Named(names)) => {
                write!(f, "{}({})", self.identifier, names.join(","))
            }
        }
    }
}

/// A path that does not follow the segment grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path is empty.
    Empty,
    /// Parentheses do not balance.
    Unbalanced {
        /// The offending path.
        path: String,
    },
    /// Two dots in a row, or a leading or trailing dot.
    EmptySegment {
        /// The offending path.
        path: String,
    },
    /// A segment matches neither call grammar nor a bare identifier.
    InvalidSegment {
        /// The offending segment text.
        segment: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => f.write_str("empty path"),
            PathError::Unbalanced { path } => write!(f, "unbalanced parentheses in `{}`", path),
            PathError::EmptySegment { path } => write!(f, "empty segment in `{}`", path),
            PathError::InvalidSegment { segment } => {
                write!(f, "`{}` is not a member or call segment", segment)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Split `path` on dots that are not enclosed in parentheses.
///
/// # Examples
///
/// ```
/// use fathom::path::split_segments;
///
/// assert_eq!(split_segments("a.b(x.y).c").unwrap(), vec!["a", "b(x.y)", "c"]);
/// assert!(split_segments("a.(b").is_err());
/// ```
pub fn split_segments(path: &str) -> Result<Vec<&str>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let unbalanced = || PathError::Unbalanced {
        path: path.to_string(),
    };

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1).ok_or_else(unbalanced)?,
            '.' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(unbalanced());
    }
    parts.push(&path[start..]);

    if parts.iter().any(|p| p.trim().is_empty()) {
        return Err(PathError::EmptySegment {
            path: path.to_string(),
        });
    }
    Ok(parts)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Classify one segment.
pub fn parse_segment(raw: &str) -> Result<PathSegment, PathError> {
    let invalid = || PathError::InvalidSegment {
        segment: raw.to_string(),
    };
    let text = raw.trim();

    let Some(open) = text.find('(') else {
        return if is_identifier(text) {
            Ok(PathSegment::member(text))
        } else {
            Err(invalid())
        };
    };

    let identifier = &text[..open];
    let inner = text[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
    if !is_identifier(identifier) || inner.contains(['(', ')']) {
        return Err(invalid());
    }

    let inner = inner.trim();
    if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        let arity = inner.parse::<usize>().map_err(|_| invalid())?;
        return Ok(PathSegment::call(identifier, CallParams::Arity(arity)));
    }

    let names = if inner.is_empty() {
        Vec::new()
    } else {
        inner
            .split(',')
            .map(str::trim)
            .map(|name| {
                if is_identifier(name) {
                    Ok(name.to_string())
                } else {
                    Err(invalid())
                }
            })
            .collect::<Result<Vec<_>, _>>()?
    };
    Ok(PathSegment::call(identifier, CallParams::Named(names)))
}

/// Parse a full path into its ordered segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    split_segments(path)?
        .into_iter()
        .map(parse_segment)
        .collect()
}
