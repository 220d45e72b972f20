//! Shell-style parameter expansion for `$NAME` and `${NAME...}`.
//!
//! Supported forms:
//!
//! | syntax            | result                                         |
//! |-------------------|------------------------------------------------|
//! | `$NAME`, `${NAME}`| value of NAME, empty if unset                  |
//! | `${NAME:-word}`   | value if set and non-empty, otherwise `word`   |
//! | `${NAME-word}`    | value if set, otherwise `word`                 |
//! | `${NAME:+word}`   | `word` if set and non-empty, otherwise empty   |
//! | `${NAME+word}`    | `word` if set, otherwise empty                 |
//!
//! `word` is used literally; it is not expanded again. Positional and
//! special parameters (`$0`..`$9`, `${10}`, `$*`, `$#`, `$$`, `$@`, `$!`,
//! `$?`, `$-`) are accepted but always unset, as is a braced name that
//! is not a valid identifier (`${A.B}`).

use crate::lookup::Lookup;

/// Text produced for one `$` and how many bytes after the `$` it used.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Expansion {
    pub(crate) text: Vec<u8>,
    pub(crate) consumed: usize,
}

impl Expansion {
    const fn new(text: Vec<u8>, consumed: usize) -> Self {
        Self { text, consumed }
    }

    /// `$` not followed by anything expandable stands for itself.
    fn literal_dollar() -> Self {
        Self::new(b"$".to_vec(), 0)
    }
}

/// Malformed `${...}`; `offset` is relative to the byte after `$`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct BadSubstitution {
    pub(crate) offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Default { colon: bool },
    Alternate { colon: bool },
}

pub(crate) const fn is_special(c: u8) -> bool {
    matches!(c, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-' | b'0'..=b'9')
}

pub(crate) const fn is_name_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic()
}

pub(crate) const fn is_name_char(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

fn name_len(s: &[u8]) -> usize {
    s.iter().take_while(|&&c| is_name_char(c)).count()
}

// Name bytes are ASCII by construction.
fn ascii(s: &[u8]) -> String {
    s.iter().map(|&b| char::from(b)).collect()
}

/// Length of the name at the start of a non-empty `${...}` body: one
/// special character, or everything up to a modifier.
fn braced_name_len(inner: &[u8]) -> usize {
    match inner[0] {
        c if is_special(c) && !c.is_ascii_digit() => 1,
        _ => inner
            .iter()
            .position(|&c| matches!(c, b':' | b'-' | b'+'))
            .unwrap_or(inner.len()),
    }
}

/// Expand the construct at the start of `rest`, the input right after a `$`.
pub(crate) fn expand<L: Lookup + ?Sized>(
    rest: &[u8],
    lookup: &L,
) -> Result<Expansion, BadSubstitution> {
    match rest.first() {
        Some(b'{') => expand_braced(rest, lookup),
        Some(&c) if is_special(c) => Ok(Expansion::new(Vec::new(), 1)),
        Some(&c) if is_name_start(c) => {
            let len = name_len(rest);
            let value = lookup.lookup(&ascii(&rest[..len])).unwrap_or_default();
            Ok(Expansion::new(value.into_bytes(), len))
        }
        _ => Ok(Expansion::literal_dollar()),
    }
}

fn expand_braced<L: Lookup + ?Sized>(
    rest: &[u8],
    lookup: &L,
) -> Result<Expansion, BadSubstitution> {
    let Some(close) = rest
        .iter()
        .position(|&c| c == b'}' || c == b'\n')
        .filter(|&i| rest[i] == b'}')
    else {
        return Err(BadSubstitution { offset: 0 });
    };
    let inner = &rest[1..close];
    let consumed = close + 1;

    if inner.is_empty() {
        return Ok(Expansion::new(Vec::new(), consumed));
    }

    let len = braced_name_len(inner);
    let name = &inner[..len];

    let (modifier, word): (Modifier, &[u8]) = match &inner[len..] {
        [] => (Modifier::None, b"".as_slice()),
        [b':', b'-', word @ ..] => (Modifier::Default { colon: true }, word),
        [b':', b'+', word @ ..] => (Modifier::Alternate { colon: true }, word),
        [b':', ..] => return Err(BadSubstitution { offset: len + 2 }),
        [b'-', word @ ..] => (Modifier::Default { colon: false }, word),
        [b'+', word @ ..] => (Modifier::Alternate { colon: false }, word),
        _ => return Err(BadSubstitution { offset: len + 1 }),
    };

    // Positional, special and malformed names are never set.
    let value = if name.first().is_some_and(|&c| is_name_start(c)) && name_len(name) == len {
        lookup.lookup(&ascii(name))
    } else {
        None
    };
    // With a colon, an empty value counts as unset.
    let counts_as_set = |colon: bool, v: &str| !colon || !v.is_empty();

    let text = match modifier {
        Modifier::None => value.unwrap_or_default().into_bytes(),
        Modifier::Default { colon } => match value {
            Some(v) if counts_as_set(colon, &v) => v.into_bytes(),
            _ => word.to_vec(),
        },
        Modifier::Alternate { colon } => {
            if value.is_some_and(|v| counts_as_set(colon, &v)) {
                word.to_vec()
            } else {
                Vec::new()
            }
        }
    };
    Ok(Expansion::new(text, consumed))
}
