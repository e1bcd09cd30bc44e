//! Text converters and string constraints.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::{from_fn, Converter, ValueConverter};
use crate::error::ConversionError;
use crate::value::Value;

/// Converts any value to its textual form without normalizing it.
///
/// Bytes are decoded as UTF-8, replacing invalid sequences. `Null` and
/// `Undefined` pass through. Prefer [`single_line_string`] or
/// [`multi_line_string`] for user input.
pub fn string() -> Converter {
    from_fn(|value| match value {
        absent @ (Value::Null | Value::Undefined) => Ok(absent),
        Value::String(s) => Ok(Value::String(s)),
        Value::Bytes(bytes) => Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        other => Ok(Value::String(other.to_string())),
    })
}

/// Normalizes text that must fit on one line, such as a name or a title.
///
/// Every character that is not printable becomes a space, and the result is
/// trimmed. Printable means graphic or the ASCII space, so line breaks, tabs,
/// other spaces, format and private use characters are all replaced.
/// Invalid UTF-8 in byte input is dropped. Values that are neither text nor
/// bytes fail with "not a string".
///
/// ```rust
/// use mapparse::converter::single_line_string;
/// use mapparse::Value;
///
/// let c = single_line_string();
/// assert_eq!(c.convert(Value::from(" a\tb\r\n")), Ok(Value::from("a b")));
/// ```
pub fn single_line_string() -> Converter {
    Arc::new(SingleLineString)
}

/// Normalizes text that may span lines, such as a description.
///
/// Whitespace (including line breaks and tabs) is kept. Other non-printable
/// characters become a space. Nothing is trimmed.
pub fn multi_line_string() -> Converter {
    Arc::new(MultiLineString)
}

/// Letters, marks, numbers, punctuation and symbols. Unassigned, private
/// use, control, format and separator characters are not graphic.
const GRAPHIC: &str = r"\p{L}\p{M}\p{N}\p{P}\p{S}";

static NOT_PRINTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("[^{} ]", GRAPHIC)).expect("static regex must compile")
});

static NOT_GRAPHIC_OR_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"[^{}\p{{Zs}}\s]", GRAPHIC)).expect("static regex must compile")
});

/// Applies the [`single_line_string`] normalization to `s`.
pub fn normalize_single_line(s: &str) -> String {
    NOT_PRINTABLE.replace_all(s, " ").trim().to_string()
}

/// Applies the [`multi_line_string`] normalization to `s`.
pub fn normalize_multi_line(s: &str) -> String {
    NOT_GRAPHIC_OR_SPACE.replace_all(s, " ").into_owned()
}

/// Extracts text from a string or from bytes with invalid UTF-8 removed.
fn text_input(value: Value) -> Result<String, ConversionError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bytes(bytes) => Ok(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()),
        _ => Err(ConversionError::NotAString),
    }
}

#[derive(Debug, Clone, Copy)]
struct SingleLineString;

impl ValueConverter for SingleLineString {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        if value.is_absent() {
            return Ok(value);
        }
        let text = text_input(value)?;
        Ok(Value::String(normalize_single_line(&text)))
    }
}

#[derive(Debug, Clone, Copy)]
struct MultiLineString;

impl ValueConverter for MultiLineString {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        if value.is_absent() {
            return Ok(value);
        }
        let text = text_input(value)?;
        Ok(Value::String(normalize_multi_line(&text)))
    }
}

/// Fails with "not allowed value" unless the value is one of `items`.
/// Non-text values are never allowed.
pub fn allow_strings<I, S>(items: I) -> Converter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: HashSet<String> = items.into_iter().map(Into::into).collect();
    from_fn(move |value| match &value {
        Value::Null | Value::Undefined => Ok(value),
        Value::String(s) if allowed.contains(s) => Ok(value),
        _ => Err(ConversionError::NotAllowed),
    })
}

/// Fails with "not allowed value" if the value is one of `items`.
/// Non-text values are never allowed.
pub fn deny_strings<I, S>(items: I) -> Converter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let denied: HashSet<String> = items.into_iter().map(Into::into).collect();
    from_fn(move |value| match &value {
        Value::Null | Value::Undefined => Ok(value),
        Value::String(s) if !denied.contains(s) => Ok(value),
        _ => Err(ConversionError::NotAllowed),
    })
}

/// Fails unless the text matches the regular expression `pattern`.
///
/// Returns an error if `pattern` does not compile.
///
/// ```rust
/// use mapparse::converter::matches;
/// use mapparse::{ConversionError, Value};
///
/// let sku = matches(r"^[A-Z]{3}-\d{4}$").unwrap();
/// assert!(sku.convert(Value::from("ABC-1234")).is_ok());
/// assert!(matches!(
///     sku.convert(Value::from("abc")),
///     Err(ConversionError::PatternMismatch(_))
/// ));
/// ```
pub fn matches(pattern: &str) -> Result<Converter, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(from_fn(move |value| match &value {
        Value::Null | Value::Undefined => Ok(value),
        Value::String(s) if regex.is_match(s) => Ok(value),
        Value::String(_) => Err(ConversionError::PatternMismatch(regex.as_str().to_string())),
        _ => Err(ConversionError::NotAString),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_replaces_and_trims() {
        assert_eq!(normalize_single_line("a\r\n"), "a");
        assert_eq!(normalize_single_line("  Jack\tSmith  "), "Jack Smith");
        assert_eq!(normalize_single_line("line1\nline2"), "line1 line2");
        assert_eq!(normalize_single_line("a\u{00A0}b"), "a b");
        assert_eq!(normalize_single_line("zero\u{200B}width"), "zero width");
        assert_eq!(normalize_single_line("héllo wörld"), "héllo wörld");
    }

    #[test]
    fn test_multi_line_keeps_whitespace() {
        assert_eq!(normalize_multi_line(" a\r\n\tb "), " a\r\n\tb ");
        assert_eq!(normalize_multi_line("bell\u{0007}"), "bell ");
        assert_eq!(normalize_multi_line("\u{FEFF}x"), " x");
    }

    #[test]
    fn test_private_use_unassigned_and_tag_characters_are_replaced() {
        assert_eq!(normalize_single_line("a\u{E000}b"), "a b");
        assert_eq!(normalize_single_line("a\u{E0001}b"), "a b");
        assert_eq!(normalize_single_line("a\u{0378}b"), "a b");
        assert_eq!(normalize_single_line("a\u{2028}b"), "a b");

        assert_eq!(normalize_multi_line("a\u{E000}b"), "a b");
        assert_eq!(normalize_multi_line("a\u{E0001}b"), "a b");
        assert_eq!(normalize_multi_line("a\u{0378}b"), "a b");
        assert_eq!(normalize_multi_line("a\u{3000}b"), "a\u{3000}b");
    }

    #[test]
    fn test_graphic_text_is_kept() {
        let text = "Ünïcödé €5 ✓ 日本語 e\u{0301}";
        assert_eq!(normalize_single_line(text), text);
        assert_eq!(normalize_multi_line(text), text);
    }

    #[test]
    fn test_text_converters_reject_non_text() {
        assert_eq!(
            single_line_string().convert(Value::from(5)),
            Err(ConversionError::NotAString)
        );
        assert_eq!(
            multi_line_string().convert(Value::from(true)),
            Err(ConversionError::NotAString)
        );
        assert_eq!(single_line_string().convert(Value::Null), Ok(Value::Null));
        assert_eq!(multi_line_string().convert(Value::Undefined), Ok(Value::Undefined));
    }

    #[test]
    fn test_invalid_utf8_bytes_are_dropped() {
        let bytes = vec![b'o', b'k', 0xFF, b'!'];
        assert_eq!(
            single_line_string().convert(Value::Bytes(bytes)),
            Ok(Value::from("ok!"))
        );
    }

    #[test]
    fn test_string_textual_forms() {
        let c = string();
        assert_eq!(c.convert(Value::from(12)), Ok(Value::from("12")));
        assert_eq!(c.convert(Value::from(true)), Ok(Value::from("true")));
        assert_eq!(c.convert(Value::from(b"raw".to_vec())), Ok(Value::from("raw")));
        assert_eq!(c.convert(Value::from(" keep ")), Ok(Value::from(" keep ")));
        assert_eq!(c.convert(Value::Null), Ok(Value::Null));
    }

    #[test]
    fn test_allow_and_deny() {
        let allow = allow_strings(["red", "green"]);
        assert_eq!(allow.convert(Value::from("red")), Ok(Value::from("red")));
        assert_eq!(allow.convert(Value::from("blue")), Err(ConversionError::NotAllowed));
        assert_eq!(allow.convert(Value::from(1)), Err(ConversionError::NotAllowed));
        assert_eq!(allow.convert(Value::Null), Ok(Value::Null));

        let deny = deny_strings(vec!["admin".to_string()]);
        assert_eq!(deny.convert(Value::from("admin")), Err(ConversionError::NotAllowed));
        assert_eq!(deny.convert(Value::from("guest")), Ok(Value::from("guest")));
        assert_eq!(deny.convert(Value::from(1)), Err(ConversionError::NotAllowed));
    }

    #[test]
    fn test_matches_invalid_pattern() {
        assert!(matches("(unclosed").is_err());
    }

    #[test]
    fn test_matches_rejects_non_text() {
        let c = matches("^a").unwrap();
        assert_eq!(c.convert(Value::from(1)), Err(ConversionError::NotAString));
    }
}
