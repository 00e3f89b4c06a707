//! Regex-based string helpers.
//!
//! Thin wrappers over the `regex` crate used by the document library for
//! search, replace and group extraction.
//!
//! ```rust
//! use counter_hooks::text;
//!
//! let re = text::compile(r"(\d+)")?;
//! let caps = text::first_match(&re, "id42").expect("digits present");
//! assert_eq!(text::group(&caps, 1), "42");
//! # Ok::<(), counter_hooks::Error>(())
//! ```

use regex::{Captures, Regex};

use crate::error::Result;

/// Replaces every non-overlapping match of `pattern` in `source`.
///
/// `replacement` may reference groups as `$1` or `${name}`. Use `${1}` when
/// the reference is followed by a letter, digit or underscore.
pub fn substitute(source: &str, pattern: &str, replacement: &str) -> Result<String> {
    let re = compile(pattern)?;
    Ok(re.replace_all(source, replacement).into_owned())
}

/// Compiles a regular expression.
pub fn compile(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Returns the first match of `pattern` in `source`, with its groups.
pub fn first_match<'h>(pattern: &Regex, source: &'h str) -> Option<Captures<'h>> {
    pattern.captures(source)
}

/// Returns the text of group `index` (0 is the whole match).
///
/// A group that does not exist or did not take part in the match yields an
/// empty string.
pub fn group(captures: &Captures<'_>, index: usize) -> String {
    captures
        .get(index)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_substitute_literal() {
        assert_eq!(substitute("aXbXc", "X", "-").unwrap(), "a-b-c");
    }

    #[test]
    fn test_substitute_group_reference() {
        let out = substitute("width=10 height=20", r"(\w+)=(\d+)", "$2:$1").unwrap();
        assert_eq!(out, "10:width 20:height");
    }

    #[test]
    fn test_substitute_no_match() {
        assert_eq!(substitute("abc", "z", "-").unwrap(), "abc");
    }

    #[test]
    fn test_substitute_invalid_pattern() {
        assert!(matches!(
            substitute("abc", "([", "-"),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_compile_invalid_pattern() {
        let err = compile("([").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
        assert!(err.to_string().starts_with("invalid pattern"));
    }

    #[test]
    fn test_group_extraction() {
        let re = compile(r"(\d+)").unwrap();
        let caps = first_match(&re, "id42").unwrap();
        assert_eq!(group(&caps, 0), "42");
        assert_eq!(group(&caps, 1), "42");
    }

    #[test]
    fn test_first_match_only() {
        let re = compile(r"obj (\d+)").unwrap();
        let caps = first_match(&re, "obj 1 obj 2").unwrap();
        assert_eq!(group(&caps, 1), "1");
    }

    #[test]
    fn test_no_match() {
        let re = compile(r"\d+").unwrap();
        assert!(first_match(&re, "none").is_none());
    }

    #[test]
    fn test_missing_group_is_empty() {
        let re = compile(r"(a)|(b)").unwrap();
        let caps = first_match(&re, "b").unwrap();
        assert_eq!(group(&caps, 1), "");
        assert_eq!(group(&caps, 2), "b");
        assert_eq!(group(&caps, 9), "");
    }
}
