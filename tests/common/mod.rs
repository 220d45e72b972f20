#![allow(dead_code)]

use std::collections::HashMap;

use envfile_rs::{EnvMap, ParseError, marshal, parse_str};

/// Parse with nothing set in the ambient environment.
pub fn env(input: &str) -> EnvMap {
    parse_str(input, &()).unwrap_or_else(|e| panic!("parse failed:\n{}", e.render()))
}

/// Parse with the given ambient variables.
pub fn env_with(input: &str, ambient: &[(&str, &str)]) -> EnvMap {
    let ambient: HashMap<&str, &str> = ambient.iter().copied().collect();
    parse_str(input, &ambient).unwrap_or_else(|e| panic!("parse failed:\n{}", e.render()))
}

pub fn err(input: &str) -> ParseError {
    match parse_str(input, &()) {
        Ok(env) => panic!("expected an error for {input:?}, got {env:?}"),
        Err(e) => e,
    }
}

pub fn map(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Assert that `input` parses to exactly one variable.
pub fn assert_single(input: &str, key: &str, value: &str) {
    assert_eq!(env(input), map(&[(key, value)]), "input: {input:?}");
}

/// Helper: marshal a map, parse it back, assert equality.
pub fn assert_map_roundtrip(original: &EnvMap) {
    let marshalled = marshal(original);
    let parsed = parse_str(&marshalled, &()).unwrap_or_else(|e| {
        panic!(
            "failed to re-parse marshalled output: {e}\n\
             --- marshalled ---\n{marshalled}"
        )
    });
    assert_eq!(
        original, &parsed,
        "round-trip mismatch\n--- marshalled ---\n{marshalled}"
    );
}
