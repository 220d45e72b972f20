//! Line-level parsing cases.

mod common;

use common::{assert_single, env, env_with, err, map};
use envfile_rs::ParseErrorKind;

// -----------------------------------------------------------
// Unquoted values.
// -----------------------------------------------------------

#[test]
fn parse_plain_value() {
    assert_single("FOO=bar", "FOO", "bar");
}

#[test]
fn parse_empty_value() {
    assert_single("FOO=", "FOO", "");
    assert_eq!(env("A=\nB=2"), map(&[("A", ""), ("B", "2")]));
}

#[test]
fn parse_value_with_colons() {
    assert_single("OPTION_A=1:B", "OPTION_A", "1:B");
}

#[test]
fn parse_value_with_equals() {
    assert_single("FOO=foobar=", "FOO", "foobar=");
}

#[test]
fn parse_url_value() {
    assert_single(
        "OPTION_A=postgres://localhost:5432/database?sslmode=disable",
        "OPTION_A",
        "postgres://localhost:5432/database?sslmode=disable",
    );
}

#[test]
fn parse_trailing_space_is_stripped() {
    assert_single("FOO=bar ", "FOO", "bar");
}

#[test]
fn parse_unquoted_backslash_takes_next_char() {
    assert_single(r"FOO=a\\b", "FOO", r"a\b");
    assert_single(r"FOO=\'x\'", "FOO", "'x'");
}

#[test]
fn parse_adjacent_quoted_runs_concatenate() {
    assert_single(r#"key=va"lu"e"#, "key", "value");
    assert_single("key=va'lu'e", "key", "value");
}

// -----------------------------------------------------------
// Quoted values.
// -----------------------------------------------------------

#[test]
fn parse_single_quoted() {
    assert_single("FOO='bar'", "FOO", "bar");
    assert_single("FOO=''", "FOO", "");
    assert_single(r#"FOO='echo "asd"'"#, "FOO", r#"echo "asd""#);
}

#[test]
fn parse_double_quoted() {
    assert_single(r#"FOO="bar""#, "FOO", "bar");
    assert_single(r#"FOO="""#, "FOO", "");
    assert_single(r#"FOO="'d'""#, "FOO", "'d'");
}

#[test]
fn parse_escaped_double_quote() {
    assert_single(r#"FOO="escaped\"bar""#, "FOO", r#"escaped"bar"#);
}

#[test]
fn parse_double_quoted_escapes() {
    assert_single(r#"FOO="bar\nbaz""#, "FOO", "bar\nbaz");
    assert_single(r#"FOO="bar\n\ b\az""#, "FOO", "bar\n baz");
    assert_single(r#"FOO="bar\\\n\ b\az""#, "FOO", "bar\\\n baz");
    assert_single(r#"FOO="bar\\r\ b\az""#, "FOO", "bar\\r baz");
}

#[test]
fn parse_single_quoted_keeps_backslashes() {
    assert_single(r"OPTION_B='\n'", "OPTION_B", "\\n");
    assert_single(
        "OPTION_SINGLE_H='1\n2\n3 is \\'quoted\\''",
        "OPTION_SINGLE_H",
        "1\n2\n3 is \\'quoted\\'",
    );
}

#[test]
fn parse_multiline_quoted() {
    let e = env("OPTION_SINGLE_G='1\n2'\nOPTION_DOUBLE_G=\"1\n2\"\nAFTER=x");
    assert_eq!(e["OPTION_SINGLE_G"], "1\n2");
    assert_eq!(e["OPTION_DOUBLE_G"], "1\n2");
    assert_eq!(e["AFTER"], "x");
}

#[test]
fn parse_hash_inside_quotes() {
    assert_single(r#"FOO="ba#r""#, "FOO", "ba#r");
    assert_single("FOO='ba#r'", "FOO", "ba#r");
    assert_single(r#"FOO="bar#baz" # comment"#, "FOO", "bar#baz");
    assert_single("FOO='bar#baz' # comment", "FOO", "bar#baz");
    assert_single(r#"FOO="bar#baz#bang" # comment"#, "FOO", "bar#baz#bang");
}

// -----------------------------------------------------------
// Keys, export and comments.
// -----------------------------------------------------------

#[test]
fn parse_export_prefix() {
    assert_single("export OPTION_A=2", "OPTION_A", "2");
    assert_single("export\tOPTION_A=2", "OPTION_A", "2");
    assert_single("  export OPTION_A=2", "OPTION_A", "2");
    assert_single("\texport OPTION_A=2", "OPTION_A", "2");
    assert_single("export exportFoo=2", "exportFoo", "2");
    assert_single("exportFOO=2", "exportFOO", "2");
    assert_single("export_FOO=2", "export_FOO", "2");
}

#[test]
fn parse_leading_whitespace_ignored() {
    assert_single("   KEY=value", "KEY", "value");
    assert_single("\tKEY=value", "KEY", "value");
}

#[test]
fn parse_key_character_classes() {
    assert_single("_=1", "_", "1");
    assert_single("a1_B2=1", "a1_B2", "1");
}

#[test]
fn parse_comments() {
    assert_single("FOO=asd#asd", "FOO", "asd#asd");
    assert_single("FOO=asd #asd", "FOO", "asd");
    assert_single("FOO=bar # this is foo", "FOO", "bar");
    assert!(env("# only a comment").is_empty());
    assert!(env("#FOO=bar").is_empty());
}

#[test]
fn parse_interior_space_is_dropped() {
    assert_single("A=b c", "A", "bc");
    assert_single("A=b  c  d", "A", "bcd");
    assert_single("A=\"x\" y", "A", "xy");
    assert_single("A=b\\ c", "A", "b c");
}

#[test]
fn parse_leading_hash_is_literal() {
    assert_single("A=#x", "A", "#x");
    assert_single("A=a#b #c", "A", "a#b");
    assert_single("A='' #c", "A", "");
}

#[test]
fn parse_export_without_key() {
    let e = err("export ");
    assert_eq!(e.kind, ParseErrorKind::MissingValueOperator);
    assert_eq!(e.span.column, 8);
    assert_eq!(
        err("A=1\nexport # note\nB=2").kind,
        ParseErrorKind::MissingValueOperator
    );
}

#[test]
fn parse_blank_document() {
    assert!(env("").is_empty());
    assert!(env("\n\n   \n\t\n").is_empty());
}

#[test]
fn parse_all_fixture() {
    let input = "\
OPTION_A=1
OPTION_B=${OPTION_A}#realvalue
OPTION_C=${OPTION_A} # comment
OPTION_D=\"$OPTION_A\"
OPTION_E='$OPTION_A'
OPTION_F=\"1#realvalue\"
OPTION_G=${OPTION_A}${OPTION_F}
OPTION_H=
OPTION_I=\"$OPTION_A\" # comment
OPTION_J=\\${OPTION_A}
OPTION_K='${OPTION_NOT_DEFINED:-default}'
OPTION_L=\"\\${OPTION_A:+default}\"
OPTION_M='1
2'
OPTION_Q=${OPTION_NOT_DEFINED:-default}
OPTION_R=\"${OPTION_NOT_DEFINED-default}\"
";
    let e = env(input);
    assert_eq!(e["OPTION_A"], "1");
    assert_eq!(e["OPTION_B"], "1#realvalue");
    assert_eq!(e["OPTION_C"], "1");
    assert_eq!(e["OPTION_D"], "1");
    assert_eq!(e["OPTION_E"], "$OPTION_A");
    assert_eq!(e["OPTION_F"], "1#realvalue");
    assert_eq!(e["OPTION_G"], "11#realvalue");
    assert_eq!(e["OPTION_H"], "");
    assert_eq!(e["OPTION_I"], "1");
    assert_eq!(e["OPTION_J"], "${OPTION_A}");
    assert_eq!(e["OPTION_K"], "${OPTION_NOT_DEFINED:-default}");
    assert_eq!(e["OPTION_L"], "${OPTION_A:+default}");
    assert_eq!(e["OPTION_M"], "1\n2");
    assert_eq!(e["OPTION_Q"], "default");
    assert_eq!(e["OPTION_R"], "default");
}

#[test]
fn parse_duplicate_key_last_wins() {
    assert_eq!(env("A=1\nB=x\nA=2"), map(&[("A", "2"), ("B", "x")]));
}

#[test]
fn parse_ambient_does_not_leak_into_map() {
    let e = env_with("A=1", &[("B", "2")]);
    assert_eq!(e, map(&[("A", "1")]));
}

// -----------------------------------------------------------
// Rejected lines.
// -----------------------------------------------------------

#[test]
fn reject_spaces_around_equals() {
    assert_eq!(
        err("FOO =bar").kind,
        ParseErrorKind::UnexpectedWhitespaceInKey
    );
    assert_eq!(err("FOO= bar").kind, ParseErrorKind::UnexpectedSpaceInValue);
    assert_eq!(
        err(" KEY =value").kind,
        ParseErrorKind::UnexpectedWhitespaceInKey
    );
    assert_eq!(
        err("VARIABLE_3=       $a$0$12$_x").kind,
        ParseErrorKind::UnexpectedSpaceInValue
    );
}

#[test]
fn reject_invalid_key_characters() {
    assert_eq!(
        err("export.FOO=2").kind,
        ParseErrorKind::InvalidKeyCharacter(b'.')
    );
    assert_eq!(
        err("FOO.BAR=foobar").kind,
        ParseErrorKind::InvalidKeyCharacter(b'.')
    );
    assert_eq!(
        err("9LIVES=1").kind,
        ParseErrorKind::InvalidKeyCharacter(b'9')
    );
    assert_eq!(
        err("FOO#=1").kind,
        ParseErrorKind::InvalidKeyCharacter(b'#')
    );
}

#[test]
fn reject_empty_key() {
    assert_eq!(err(r#"="value""#).kind, ParseErrorKind::EmptyKey);
}

#[test]
fn reject_missing_value_operator() {
    assert_eq!(err("FOO").kind, ParseErrorKind::MissingValueOperator);
    assert_eq!(err("export").kind, ParseErrorKind::MissingValueOperator);
    assert_eq!(err("FOO\nBAR=1").kind, ParseErrorKind::MissingValueOperator);
}

#[test]
fn reject_tab_in_unquoted_value() {
    assert_eq!(
        err("FOO=a\tb").kind,
        ParseErrorKind::InvalidValueCharacter(b'\t')
    );
}

#[test]
fn reject_lone_carriage_return() {
    assert_eq!(
        err("FOO=a\rb").kind,
        ParseErrorKind::InvalidValueCharacter(b'\r')
    );
}

#[test]
fn no_partial_result_on_failure() {
    assert!(envfile_rs::parse_str("A=1\nB=2\nC", &()).is_err());
}
