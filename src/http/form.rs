//! `application/x-www-form-urlencoded` decoding
//!
//! Only what the save handler needs: look up one field and decode it to raw
//! bytes. Values are not required to be UTF-8.

use percent_encoding::percent_decode;

/// Return the decoded value of the first `name=value` pair matching `field`
pub fn form_value(form: &[u8], field: &str) -> Option<Vec<u8>> {
    form.split(|b| *b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (key, value) = match pair.iter().position(|b| *b == b'=') {
                Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                None => (pair, &[][..]),
            };
            (decode_component(key) == field.as_bytes()).then(|| decode_component(value))
        })
}

/// Whether a `Content-Type` value names an urlencoded form; parameters such
/// as `charset` are ignored
pub fn is_form_urlencoded(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Decode one form component: `+` is a space, then percent escapes
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    percent_decode(&spaced).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_field() {
        assert_eq!(form_value(b"body=bar", "body"), Some(b"bar".to_vec()));
    }

    #[test]
    fn test_plus_and_percent_escapes() {
        assert_eq!(
            form_value(b"body=This+is+a+simple+Page%2E%0D%0Aline+2", "body"),
            Some(b"This is a simple Page.\r\nline 2".to_vec())
        );
        // Encoded plus stays a plus
        assert_eq!(form_value(b"body=1%2B1", "body"), Some(b"1+1".to_vec()));
    }

    #[test]
    fn test_field_among_others() {
        let form = b"title=ignored&body=hello%26world&body=second";
        assert_eq!(form_value(form, "body"), Some(b"hello&world".to_vec()));
        assert_eq!(form_value(form, "title"), Some(b"ignored".to_vec()));
    }

    #[test]
    fn test_missing_and_empty_field() {
        assert_eq!(form_value(b"other=1", "body"), None);
        assert_eq!(form_value(b"", "body"), None);
        assert_eq!(form_value(b"body=", "body"), Some(Vec::new()));
        assert_eq!(form_value(b"body", "body"), Some(Vec::new()));
    }

    #[test]
    fn test_form_content_type() {
        assert!(is_form_urlencoded(Some("application/x-www-form-urlencoded")));
        assert!(is_form_urlencoded(Some(
            "Application/X-WWW-Form-Urlencoded; charset=UTF-8"
        )));
        assert!(!is_form_urlencoded(Some("text/plain")));
        assert!(!is_form_urlencoded(Some("multipart/form-data; boundary=x")));
        assert!(!is_form_urlencoded(None));
    }

    #[test]
    fn test_non_utf8_value() {
        assert_eq!(form_value(b"body=%FF%00", "body"), Some(vec![0xFF, 0x00]));
    }
}
