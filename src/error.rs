use std::fmt;

/// Source location for error reporting. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Which quote was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteKind {
    Single,
    Double,
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
        }
    }
}

/// Classifies a parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `=` with no key before it.
    EmptyKey,
    /// Byte that cannot appear in a key name.
    InvalidKeyCharacter(u8),
    /// Whitespace between a key and `=`.
    UnexpectedWhitespaceInKey,
    /// A key with no `=` after it.
    MissingValueOperator,
    /// A space directly after `=`.
    UnexpectedSpaceInValue,
    /// Raw control byte in an unquoted value.
    InvalidValueCharacter(u8),
    /// Input ended inside a quoted value.
    UnmatchedQuote(QuoteKind),
    /// Input ended directly after a backslash.
    IncompleteEscapeSequence,
    /// Malformed `${...}` expansion.
    BadSubstitution,
    /// Recognized but unimplemented double-quoted escape such as `\u`.
    UnsupportedEscape(u8),
    /// The value is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "empty key"),
            Self::InvalidKeyCharacter(b) => {
                write!(f, "invalid character in key name: {}", Printable(*b))
            }
            Self::UnexpectedWhitespaceInKey => write!(f, "unexpected whitespace in key"),
            Self::MissingValueOperator => write!(f, "missing value operator"),
            Self::UnexpectedSpaceInValue => write!(f, "unexpected space in value"),
            Self::InvalidValueCharacter(b) => {
                write!(f, "invalid value character: {b:#04x}")
            }
            Self::UnmatchedQuote(kind) => write!(f, "unmatched {kind} quote"),
            Self::IncompleteEscapeSequence => write!(f, "incomplete escape sequence"),
            Self::BadSubstitution => write!(f, "bad substitution"),
            Self::UnsupportedEscape(b) => {
                write!(f, "escape sequence not implemented: \\{}", Printable(*b))
            }
            Self::InvalidUtf8 => write!(f, "value is not valid UTF-8"),
        }
    }
}

/// Shows a byte as a character when printable, otherwise as hex.
struct Printable(u8);

impl fmt::Display for Printable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() {
            write!(f, "'{}'", char::from(self.0))
        } else {
            write!(f, "{:#04x}", self.0)
        }
    }
}

/// Error produced while parsing an environment file.
///
/// Carries the offending line so the error can be rendered on its own,
/// without the caller holding on to the input:
///
/// ```text
/// unexpected whitespace in key on line 2, column 4
/// FOO BAR=1
///    ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} on line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    /// Raw text of the line containing the fault, without its line break.
    pub line: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, input: &[u8], span: Span) -> Self {
        let raw = input
            .split(|&b| b == b'\n')
            .nth(span.line - 1)
            .unwrap_or_default();
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        Self {
            kind,
            span,
            line: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Render the message, the offending line and a caret under the
    /// faulty column.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{self}\n{}\n{}^",
            self.line,
            " ".repeat(self.span.column.saturating_sub(1))
        )
    }

    /// The byte that triggered an invalid-character error, if any.
    #[must_use]
    pub const fn offending_byte(&self) -> Option<u8> {
        match self.kind {
            ParseErrorKind::InvalidKeyCharacter(b)
            | ParseErrorKind::InvalidValueCharacter(b)
            | ParseErrorKind::UnsupportedEscape(b) => Some(b),
            _ => None,
        }
    }
}
