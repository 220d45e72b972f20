//! Parser and serializer for dotenv-style environment files.
//!
//! Env files are lines of `KEY=value` assignments with shell-like
//! quoting, an optional `export` prefix, `#` comments and parameter
//! expansion (`$VAR`, `${VAR}`, `${VAR:-default}`, `${VAR-default}`,
//! `${VAR:+alternate}`, `${VAR+alternate}`).
//!
//! # Quick start
//!
//! ## Parse with an explicit lookup
//!
//! ```
//! use std::collections::HashMap;
//! use envfile_rs::parse_str;
//!
//! let ambient = HashMap::from([("USER", "alice")]);
//! let env = parse_str(
//!     "# database\nexport DB_USER=${USER}\nDB_URL=\"postgres://$DB_USER@db/app\" # dev only\n",
//!     &ambient,
//! )
//! .unwrap();
//! assert_eq!(env["DB_URL"], "postgres://alice@db/app");
//! ```
//!
//! ## Serialize back
//!
//! ```
//! use envfile_rs::{marshal, parse_str};
//!
//! let env = parse_str("B='two words'\nA=1", &()).unwrap();
//! assert_eq!(marshal(&env), "A=1\nB=\"two words\"");
//! ```
//!
//! ## Report errors
//!
//! ```
//! use envfile_rs::{ParseErrorKind, parse_str};
//!
//! let err = parse_str("GOOD=1\nBAD KEY=2", &()).unwrap_err();
//! assert_eq!(err.kind, ParseErrorKind::UnexpectedWhitespaceInKey);
//! assert_eq!(
//!     err.render(),
//!     "unexpected whitespace in key on line 2, column 4\nBAD KEY=2\n   ^"
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod error;
mod expand;
pub mod formatter;
pub mod lexer;
pub mod loader;
pub mod lookup;

use std::path::PathBuf;

pub use error::{ParseError, ParseErrorKind, QuoteKind, Span};
pub use formatter::{marshal, marshal_pairs};
pub use lexer::{EnvMap, parse, parse_str};
pub use loader::{DEFAULT_FILE, env_plan, read_file, read_file_with, unmarshal, write_file};
pub use lookup::{FnLookup, Lookup, ProcessEnv};

/// Unified error type covering parsing and file access.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file contents are malformed.
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
