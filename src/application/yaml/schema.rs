//! Plain scalar resolution (YAML 1.2 core schema).

use std::sync::LazyLock;

use regex::Regex;

static NON_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"~|null|Null|NULL",
        r"|true|True|TRUE|false|False|FALSE",
        r"|[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+",
        r"|[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?",
        r"|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN)",
        r")$"
    ))
    .expect("core schema pattern is valid")
});

static NULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:~|null|Null|NULL)?$").expect("null pattern is valid"));

/// Whether an unquoted scalar would be read as null, bool, int or float.
pub fn resolves_to_non_string(plain: &str) -> bool {
    plain.is_empty() || NON_STRING.is_match(plain)
}

pub fn is_null(plain: &str) -> bool {
    NULL.is_match(plain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("~")]
    #[case("null")]
    #[case("true")]
    #[case("FALSE")]
    #[case("42")]
    #[case("-7")]
    #[case("0x1F")]
    #[case("0o17")]
    #[case("3.14")]
    #[case("1e10")]
    #[case(".5")]
    #[case("-.inf")]
    #[case(".NaN")]
    #[case("")]
    fn given_typed_plain_scalar_then_not_a_string(#[case] input: &str) {
        assert!(resolves_to_non_string(input));
    }

    #[rstest]
    #[case("hello")]
    #[case("yes")]
    #[case("no")]
    #[case("on")]
    #[case("1.2.3")]
    #[case("nulls")]
    #[case("True story")]
    fn given_text_then_is_a_string(#[case] input: &str) {
        assert!(!resolves_to_non_string(input));
    }
}
