//! Serializes an environment map back into canonical env file text.
//!
//! Integer values are written bare, everything else is double-quoted
//! with `\`, `"`, `!`, `$`, `` ` ``, newline and carriage return escaped.
//! Lines are sorted so the output does not depend on map order.

use crate::lexer::EnvMap;

/// Format an environment map as env file text.
///
/// The result has one `KEY=value` line per entry and no trailing
/// newline.
///
/// ```
/// use envfile_rs::{EnvMap, marshal};
///
/// let mut env = EnvMap::new();
/// env.insert("PORT".to_string(), "8080".to_string());
/// env.insert("HOST".to_string(), "local host".to_string());
/// assert_eq!(marshal(&env), "HOST=\"local host\"\nPORT=8080");
/// ```
#[must_use]
pub fn marshal(env: &EnvMap) -> String {
    marshal_pairs(env.iter())
}

/// Format any sequence of key/value pairs. Duplicate keys are written
/// as given.
pub fn marshal_pairs<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut lines: Vec<String> = pairs
        .into_iter()
        .map(|(key, value)| format_line(key.as_ref(), value.as_ref()))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

fn format_line(key: &str, value: &str) -> String {
    if value.parse::<i64>().is_ok() {
        format!("{key}={value}")
    } else {
        format!("{key}=\"{}\"", escape_double_quoted(value))
    }
}

fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' | '"' | '!' | '$' | '`' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
