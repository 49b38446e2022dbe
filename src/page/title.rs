//! Page title extraction and validation
//!
//! A title is used verbatim as a file name, so this is the only place that
//! decides which names may reach the page store.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Letters and digits only, at least one character
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9]+$").expect("title pattern is a valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    #[error("path '{path}' does not start with '{prefix}'")]
    MissingPrefix { path: String, prefix: &'static str },
    #[error("invalid page title: '{0}'")]
    Invalid(String),
}

/// A page title that has passed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn parse(candidate: &str) -> Result<Self, TitleError> {
        if TITLE_PATTERN.is_match(candidate) {
            Ok(Self(candidate.to_string()))
        } else {
            Err(TitleError::Invalid(candidate.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip the operation prefix (e.g. `/view/`) from a request path,
/// percent-decode what remains and validate it as a title.
///
/// Decoding happens before validation, so `%2F` or `%2E` still yield an
/// invalid title rather than reaching the store.
pub fn extract_title(path: &str, prefix: &'static str) -> Result<Title, TitleError> {
    let raw = path
        .strip_prefix(prefix)
        .ok_or_else(|| TitleError::MissingPrefix {
            path: path.to_string(),
            prefix,
        })?;
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| TitleError::Invalid(raw.to_string()))?;
    Title::parse(&decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_alphanumeric() {
        for title in ["TestPage", "a", "Z9", "123", "FrontPage2024"] {
            let parsed = Title::parse(title).unwrap();
            assert_eq!(parsed.as_str(), title);
        }
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        for title in [
            "",
            "bad title!",
            "../etc/passwd",
            "a/b",
            "a.txt",
            "under_score",
            "dash-ed",
            "caf\u{e9}",
            "trailing\n",
            "%2e%2e",
        ] {
            assert_eq!(
                Title::parse(title),
                Err(TitleError::Invalid(title.to_string())),
                "{title:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_alphabet_boundaries() {
        let long = "Ab1".repeat(400);
        for title in [
            "0",
            "0123456789",
            "99999999999999999999",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            "abcdefghijklmnopqrstuvwxyz",
            long.as_str(),
        ] {
            assert_eq!(Title::parse(title).unwrap().as_str(), title);
        }
    }

    #[test]
    fn test_parse_rejects_every_non_alphanumeric_ascii() {
        let rejected = (0u8..=127)
            .map(char::from)
            .filter(|c| !c.is_ascii_alphanumeric());
        for c in rejected {
            for candidate in [c.to_string(), format!("Foo{c}"), format!("{c}Foo"), format!("Fo{c}o")] {
                assert!(
                    Title::parse(&candidate).is_err(),
                    "{candidate:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_extract_title() {
        let title = extract_title("/view/TestPage", "/view/").unwrap();
        assert_eq!(title.as_str(), "TestPage");

        let title = extract_title("/save/Foo", "/save/").unwrap();
        assert_eq!(title.to_string(), "Foo");
    }

    #[test]
    fn test_extract_title_empty_after_prefix() {
        assert_eq!(
            extract_title("/edit/", "/edit/"),
            Err(TitleError::Invalid(String::new()))
        );
    }

    #[test]
    fn test_extract_title_nested_path() {
        assert!(matches!(
            extract_title("/view/a/b", "/view/"),
            Err(TitleError::Invalid(_))
        ));
    }

    #[test]
    fn test_extract_title_decodes_percent_escapes() {
        let title = extract_title("/view/Foo%42ar", "/view/").unwrap();
        assert_eq!(title.as_str(), "FooBar");
        let title = extract_title("/edit/%41%62%63123", "/edit/").unwrap();
        assert_eq!(title.as_str(), "Abc123");
    }

    #[test]
    fn test_extract_title_decoded_separators_stay_invalid() {
        for path in [
            "/view/..%2F..%2Fetc%2Fpasswd",
            "/view/%2E%2E",
            "/view/a%2eb",
            "/view/bad%20title",
            "/view/%00",
        ] {
            assert!(
                matches!(extract_title(path, "/view/"), Err(TitleError::Invalid(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn test_extract_title_rejects_non_utf8_escape() {
        assert_eq!(
            extract_title("/view/%FF", "/view/"),
            Err(TitleError::Invalid("%FF".to_string()))
        );
    }

    #[test]
    fn test_extract_title_wrong_prefix() {
        assert!(matches!(
            extract_title("/edit/Foo", "/view/"),
            Err(TitleError::MissingPrefix { .. })
        ));
    }
}
