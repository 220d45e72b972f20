//! Reading and writing env files on disk.
//!
//! Each call handles a single file. The process environment is only
//! ever read here; [`env_plan`] computes what loading a file would
//! assign so the caller decides where to apply it.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use crate::Error;
use crate::formatter::marshal;
use crate::lexer::{EnvMap, parse, parse_str};
use crate::lookup::{Lookup, ProcessEnv};

/// File read when no path is given.
pub const DEFAULT_FILE: &str = ".env";

/// Parse env file text, expanding against the process environment.
pub fn unmarshal(input: &str) -> Result<EnvMap, Error> {
    Ok(parse_str(input, &ProcessEnv)?)
}

/// Read and parse an env file, expanding against the process environment.
pub fn read_file(path: impl AsRef<Path>) -> Result<EnvMap, Error> {
    read_file_with(path, &ProcessEnv)
}

/// Read and parse an env file, expanding against `lookup`.
pub fn read_file_with<L: Lookup + ?Sized>(
    path: impl AsRef<Path>,
    lookup: &L,
) -> Result<EnvMap, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read env file");
    Ok(parse(&bytes, lookup)?)
}

/// Write `env` to `path` in canonical form, followed by a newline.
pub fn write_file(env: &EnvMap, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut content = marshal(env);
    content.push('\n');

    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    tracing::debug!(path = %path.display(), entries = env.len(), "wrote env file");
    Ok(())
}

/// The assignments loading `parsed` on top of `current` performs.
///
/// Without `overload`, variables already set in `current` keep their
/// value and are left out. With it, every parsed variable is assigned.
#[must_use]
pub fn env_plan<L: Lookup + ?Sized>(
    parsed: &EnvMap,
    current: &L,
    overload: bool,
) -> Vec<(String, String)> {
    parsed
        .iter()
        .filter(|(key, _)| overload || current.lookup(key).is_none())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
