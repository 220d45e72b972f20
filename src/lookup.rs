//! Sources of variable values consulted during parameter expansion.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Resolves a variable name to its value.
///
/// `None` means the variable is unset, which is distinct from a
/// variable that is set to the empty string: `${NAME-word}` and
/// `${NAME:-word}` differ exactly on that point.
pub trait Lookup {
    /// Value of the variable `name`, or `None` when it is unset.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Nothing is set.
impl Lookup for () {
    fn lookup(&self, _: &str) -> Option<String> {
        None
    }
}

impl<L: Lookup + ?Sized> Lookup for &L {
    fn lookup(&self, name: &str) -> Option<String> {
        (**self).lookup(name)
    }
}

impl<K, V, S> Lookup for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: std::hash::BuildHasher,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.as_ref().to_string())
    }
}

impl<K, V> Lookup for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.as_ref().to_string())
    }
}

/// Adapts a closure into a [`Lookup`].
///
/// ```
/// use envfile_rs::{FnLookup, parse_str};
///
/// let env = parse_str("A=$HOME", &FnLookup(|name: &str| {
///     (name == "HOME").then(|| "/home/me".to_string())
/// }))
/// .unwrap();
/// assert_eq!(env["A"], "/home/me");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnLookup<F>(pub F);

impl<F> Lookup for FnLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        (self.0)(name)
    }
}

/// The environment of the current process.
///
/// Values that are not valid UTF-8 are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).and_then(|v| v.into_string().ok())
    }
}

/// Definitions made earlier in the same parse shadow the ambient source.
pub(crate) struct Layered<'a, L: ?Sized> {
    pub(crate) defined: &'a BTreeMap<String, String>,
    pub(crate) ambient: &'a L,
}

impl<L: Lookup + ?Sized> Lookup for Layered<'_, L> {
    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.defined.get(name) {
            return Some(value.clone());
        }
        let value = self.ambient.lookup(name);
        tracing::trace!(name, found = value.is_some(), "fell back to ambient lookup");
        value
    }
}
