//! Dotted key paths locating a leaf in a document tree.

use std::fmt;
use std::str::FromStr;

use crate::domain::{DomainError, DomainResult};

/// Separator between segments in user input.
pub const SEPARATOR: char = '.';

/// Ordered, non-empty list of non-empty key segments.
///
/// `notifications.new-results.newfield` becomes
/// `["notifications", "new-results", "newfield"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path.
    ///
    /// Empty input and empty segments (leading, trailing or doubled dots)
    /// are rejected; segments are not trimmed, so `a. b` addresses the key `" b"`.
    pub fn parse(input: &str) -> DomainResult<Self> {
        if input.is_empty() {
            return Err(DomainError::EmptyKeyPath);
        }

        let mut segments = Vec::new();
        for (idx, segment) in input.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(DomainError::EmptySegment {
                    path: input.to_string(),
                    position: idx + 1,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for KeyPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_dotted_input_when_parsing_then_splits_segments() {
        let path = KeyPath::parse("notifications.new-results.newfield").unwrap();
        assert_eq!(
            path.segments(),
            &["notifications", "new-results", "newfield"]
        );
        assert_eq!(path.to_string(), "notifications.new-results.newfield");
    }

    #[test]
    fn given_single_segment_when_parsing_then_has_one_segment() {
        let path: KeyPath = "title".parse().unwrap();
        assert_eq!(path.segments(), &["title"]);
    }

    #[rstest]
    #[case(".a", 1)]
    #[case("a.", 2)]
    #[case("a..b", 2)]
    #[case(".", 1)]
    fn given_empty_segment_when_parsing_then_rejects_with_position(
        #[case] input: &str,
        #[case] position: usize,
    ) {
        let err = KeyPath::parse(input).unwrap_err();
        assert_eq!(
            err,
            DomainError::EmptySegment {
                path: input.to_string(),
                position
            }
        );
    }

    #[test]
    fn given_empty_input_when_parsing_then_rejects() {
        assert_eq!(KeyPath::parse("").unwrap_err(), DomainError::EmptyKeyPath);
    }

    #[test]
    fn given_whitespace_segment_when_parsing_then_keeps_it_verbatim() {
        let path = KeyPath::parse("a. b").unwrap();
        assert_eq!(path.segments(), &["a", " b"]);
    }
}
