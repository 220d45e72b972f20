use std::collections::BTreeMap;
use std::mem;

use crate::error::{ParseError, ParseErrorKind, QuoteKind, Span};
use crate::expand::{self, is_name_char, is_name_start};
use crate::lookup::{Layered, Lookup};

/// Variable names mapped to their values.
pub type EnvMap = BTreeMap<String, String>;

const EXPORT: &[u8] = b"export";

/// Parse an environment file into a map of variable names to values.
///
/// `$NAME` and `${NAME...}` expansions resolve against the keys already
/// defined earlier in `input`, then against `lookup`. Later assignments
/// to the same key replace earlier ones.
///
/// ```
/// use envfile_rs::parse;
///
/// let env = parse(b"export HOST=localhost\nURL=\"http://${HOST}:${PORT:-8080}\"", &()).unwrap();
/// assert_eq!(env["URL"], "http://localhost:8080");
/// ```
///
/// # Errors
///
/// Returns `ParseError` on the first malformed line; nothing parsed
/// before the fault is returned.
pub fn parse<L: Lookup + ?Sized>(input: &[u8], lookup: &L) -> Result<EnvMap, ParseError> {
    let env = Lexer::new(input).run(lookup)?;
    tracing::debug!(entries = env.len(), "parsed environment");
    Ok(env)
}

/// Parse environment file text. See [`parse`].
pub fn parse_str<L: Lookup + ?Sized>(input: &str, lookup: &L) -> Result<EnvMap, ParseError> {
    parse(input.as_bytes(), lookup)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Key,
    Value,
    EscapeNone,
    EscapeSingle,
    EscapeDouble,
    QuoteDouble,
    QuoteSingle,
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    state: State,
    key: Vec<u8>,
    value: Vec<u8>,
    /// Something (a character, escape, quote or expansion) has been
    /// scanned for the current value.
    produced: bool,
    /// The previous byte was an unescaped space in an unquoted value.
    after_space: bool,
    /// An `export` prefix was consumed on the current line.
    exported: bool,
    env: EnvMap,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        let input = input.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(input);
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
            state: State::Key,
            key: Vec::new(),
            value: Vec::new(),
            produced: false,
            after_space: false,
            exported: false,
            env: EnvMap::new(),
        }
    }

    fn run<L: Lookup + ?Sized>(mut self, lookup: &L) -> Result<EnvMap, ParseError> {
        while let Some(c) = self.peek() {
            match self.state {
                State::Key => self.scan_key(c)?,
                State::Value => self.scan_value(c, lookup)?,
                State::EscapeNone => {
                    self.value.push(c);
                    self.state = State::Value;
                    self.advance();
                }
                State::QuoteDouble => self.scan_double_quoted(c, lookup)?,
                State::EscapeDouble => self.scan_double_escape(c)?,
                State::QuoteSingle => {
                    match c {
                        b'\'' => self.state = State::Value,
                        b'\\' => self.state = State::EscapeSingle,
                        _ => self.value.push(c),
                    }
                    self.advance();
                }
                State::EscapeSingle => {
                    self.value.extend_from_slice(&[b'\\', c]);
                    self.state = State::QuoteSingle;
                    self.advance();
                }
            }
        }

        match self.state {
            State::Key if self.key.is_empty() && !self.exported => {}
            State::Key => return Err(self.error(ParseErrorKind::MissingValueOperator)),
            State::Value => self.commit()?,
            State::QuoteDouble => {
                return Err(self.error(ParseErrorKind::UnmatchedQuote(QuoteKind::Double)));
            }
            State::QuoteSingle => {
                return Err(self.error(ParseErrorKind::UnmatchedQuote(QuoteKind::Single)));
            }
            State::EscapeNone | State::EscapeSingle | State::EscapeDouble => {
                return Err(self.error(ParseErrorKind::IncompleteEscapeSequence));
            }
        }

        Ok(self.env)
    }

    fn scan_key(&mut self, c: u8) -> Result<(), ParseError> {
        match c {
            b' ' | b'\t' => {
                if self.key == EXPORT {
                    self.key.clear();
                    self.exported = true;
                } else if !self.key.is_empty() {
                    return Err(self.error(ParseErrorKind::UnexpectedWhitespaceInKey));
                }
            }
            b'\n' | b'\r' if self.is_line_break() => {
                if !self.key.is_empty() || self.exported {
                    return Err(self.error(ParseErrorKind::MissingValueOperator));
                }
            }
            b'#' if self.key.is_empty() => {
                self.skip_to_line_end();
                return Ok(());
            }
            b'=' => {
                if self.key.is_empty() {
                    return Err(self.error(ParseErrorKind::EmptyKey));
                }
                self.exported = false;
                self.state = State::Value;
            }
            c if is_name_start(c) || (is_name_char(c) && !self.key.is_empty()) => {
                self.key.push(c);
            }
            _ => return Err(self.error(ParseErrorKind::InvalidKeyCharacter(c))),
        }
        self.advance();
        Ok(())
    }

    fn scan_value<L: Lookup + ?Sized>(&mut self, c: u8, lookup: &L) -> Result<(), ParseError> {
        let after_space = mem::take(&mut self.after_space);
        match c {
            b'\n' => self.commit()?,
            // CR of a CRLF pair; the LF commits.
            b'\r' if self.is_line_break() => {
                self.after_space = after_space;
            }
            b'\\' => {
                self.state = State::EscapeNone;
                self.produced = true;
            }
            b'\'' => {
                self.state = State::QuoteSingle;
                self.produced = true;
            }
            b'"' => {
                self.state = State::QuoteDouble;
                self.produced = true;
            }
            b'#' if after_space => {
                self.skip_to_line_end();
                return Ok(());
            }
            b'$' => {
                self.produced = true;
                return self.expand(lookup);
            }
            b' ' => {
                if !self.produced {
                    return Err(self.error(ParseErrorKind::UnexpectedSpaceInValue));
                }
                self.after_space = true;
            }
            c if c < 0x20 => {
                return Err(self.error(ParseErrorKind::InvalidValueCharacter(c)));
            }
            _ => {
                self.value.push(c);
                self.produced = true;
            }
        }
        self.advance();
        Ok(())
    }

    fn scan_double_quoted<L: Lookup + ?Sized>(
        &mut self,
        c: u8,
        lookup: &L,
    ) -> Result<(), ParseError> {
        match c {
            b'$' => return self.expand(lookup),
            b'"' => self.state = State::Value,
            b'\\' => self.state = State::EscapeDouble,
            _ => self.value.push(c),
        }
        self.advance();
        Ok(())
    }

    fn scan_double_escape(&mut self, c: u8) -> Result<(), ParseError> {
        let unescaped = match c {
            b'b' => 0x08,
            b'f' => 0x0C,
            b'r' => b'\r',
            b'n' => b'\n',
            b't' => b'\t',
            b'u' => return Err(self.error(ParseErrorKind::UnsupportedEscape(c))),
            _ => c,
        };
        self.value.push(unescaped);
        self.state = State::QuoteDouble;
        self.advance();
        Ok(())
    }

    /// Expand the `$` at the current position and move past everything
    /// the expansion used.
    fn expand<L: Lookup + ?Sized>(&mut self, lookup: &L) -> Result<(), ParseError> {
        let input = self.input;
        let rest = &input[self.pos + 1..];
        let layered = Layered {
            defined: &self.env,
            ambient: lookup,
        };
        match expand::expand(rest, &layered) {
            Ok(expansion) => {
                self.value.extend_from_slice(&expansion.text);
                self.pos += 1 + expansion.consumed;
                Ok(())
            }
            Err(bad) => {
                self.pos += 1 + bad.offset;
                Err(self.error(ParseErrorKind::BadSubstitution))
            }
        }
    }

    fn commit(&mut self) -> Result<(), ParseError> {
        let key = self.key.iter().map(|&b| char::from(b)).collect::<String>();
        let value = String::from_utf8(mem::take(&mut self.value))
            .map_err(|_| self.error(ParseErrorKind::InvalidUtf8))?;
        tracing::trace!(key, "committed entry");
        self.env.insert(key, value);
        self.key.clear();
        self.state = State::Key;
        self.produced = false;
        self.after_space = false;
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// `\n`, or a `\r` that starts a `\r\n` pair.
    fn is_line_break(&self) -> bool {
        match self.peek() {
            Some(b'\n') => true,
            Some(b'\r') => self.input.get(self.pos + 1) == Some(&b'\n'),
            _ => false,
        }
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
                self.line_start = self.pos;
            }
        }
    }

    /// Stop in front of the next line break so it is handled by the
    /// current state.
    fn skip_to_line_end(&mut self) {
        while self.peek().is_some() && !self.is_line_break() {
            self.pos += 1;
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let end = self.pos.min(self.input.len());
        let column = String::from_utf8_lossy(&self.input[self.line_start..end])
            .chars()
            .count()
            + 1;
        ParseError::new(
            kind,
            self.input,
            Span {
                line: self.line,
                column,
            },
        )
    }
}
