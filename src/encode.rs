//! Filesystem-safe encoding of module and package import paths
//!
//! Cache directories are derived from textual module identities and import
//! paths. Those may contain uppercase letters, which are ambiguous on
//! case-insensitive filesystems, so every uppercase letter is escaped as
//! `!` followed by its lowercase form (and a literal `!` is rejected to keep
//! the encoding reversible). Distinct inputs always encode to distinct
//! outputs.

use crate::error::{GobinError, Result};

/// Characters permitted within a path segment, besides ASCII letters and digits
const SEGMENT_SAFE_CHARS: &[char] = &['-', '.', '_', '~', '+'];

/// Encode a slash-separated module or import path into a filesystem-safe form.
///
/// Uppercase ASCII letters become `!` followed by the lowercase letter;
/// `/` separators pass through untouched. Any other character outside the
/// permitted set fails with an encoding error.
///
/// # Examples
///
/// ```
/// # use gobin::encode::escape_path;
/// assert_eq!(escape_path("example.com/cmd/foo").unwrap(), "example.com/cmd/foo");
/// assert_eq!(escape_path("github.com/Azure/draft").unwrap(), "github.com/!azure/draft");
/// ```
pub fn escape_path(path: &str) -> Result<String> {
    if path.is_empty() {
        return Err(encoding_error(path, "path is empty"));
    }
    if path.starts_with('/') || path.ends_with('/') || path.contains("//") {
        return Err(encoding_error(path, "empty path segment"));
    }

    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            'A'..='Z' => {
                escaped.push('!');
                escaped.push(c.to_ascii_lowercase());
            }
            'a'..='z' | '0'..='9' | '/' => escaped.push(c),
            '!' => return Err(encoding_error(path, "disallowed character '!'")),
            c if SEGMENT_SAFE_CHARS.contains(&c) => escaped.push(c),
            c => {
                return Err(encoding_error(
                    path,
                    &format!("disallowed character {c:?}"),
                ));
            }
        }
    }

    Ok(escaped)
}

fn encoding_error(path: &str, reason: &str) -> GobinError {
    GobinError::EncodingFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_lowercase_unchanged() {
        assert_eq!(
            escape_path("example.com/cmd/foo").unwrap(),
            "example.com/cmd/foo"
        );
    }

    #[test]
    fn test_escape_uppercase() {
        assert_eq!(
            escape_path("github.com/Masterminds/glide").unwrap(),
            "github.com/!masterminds/glide"
        );
        assert_eq!(escape_path("ABC").unwrap(), "!a!b!c");
    }

    #[test]
    fn test_escape_deterministic() {
        let a = escape_path("github.com/User/tool").unwrap();
        let b = escape_path("github.com/User/tool").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_escape_injective_on_case() {
        // The whole point: paths differing only by case must not collide.
        let upper = escape_path("github.com/User/tool").unwrap();
        let lower = escape_path("github.com/user/tool").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn test_escape_rejects_bang() {
        // '!' in the input would make the escaping ambiguous
        assert!(escape_path("github.com/user/oh!no").is_err());
    }

    #[test]
    fn test_escape_rejects_control_and_space() {
        assert!(escape_path("bad path").is_err());
        assert!(escape_path("bad\npath").is_err());
        assert!(escape_path("bad\\path").is_err());
    }

    #[test]
    fn test_escape_rejects_empty_segments() {
        assert!(escape_path("").is_err());
        assert!(escape_path("/leading").is_err());
        assert!(escape_path("trailing/").is_err());
        assert!(escape_path("a//b").is_err());
    }

    #[test]
    fn test_escape_allows_segment_punctuation() {
        assert_eq!(
            escape_path("gopkg.in/yaml.v2").unwrap(),
            "gopkg.in/yaml.v2"
        );
        assert_eq!(escape_path("a-b_c~d+e").unwrap(), "a-b_c~d+e");
    }
}
