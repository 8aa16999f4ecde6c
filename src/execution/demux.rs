//! Splitting combined child stdout into log text and the trailing result line.

use serde_json::{Map, Value};

/// Splits `text` at the last newline that is not its final character.
///
/// Returns `(log_prefix, candidate)`. The prefix keeps its trailing newline and
/// is empty when no such newline exists; the candidate is whitespace-trimmed.
pub fn split_last_line(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let head = &bytes[..bytes.len().saturating_sub(1)];
    match head.iter().rposition(|&b| b == b'\n') {
        // '\n' is a single byte, so idx + 1 is a char boundary.
        Some(idx) => (&text[..=idx], text[idx + 1..].trim()),
        None => ("", text.trim()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Success(Map<String, Value>),
    /// Valid JSON, but not an object.
    NotAnObject,
    Unparsable,
}

impl Classification {
    pub fn kind(&self) -> &'static str {
        match self {
            Classification::Success(_) => "success",
            Classification::NotAnObject => "not_an_object",
            Classification::Unparsable => "unparsable",
        }
    }
}

pub fn classify(candidate: &str) -> Classification {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Classification::Success(map),
        Ok(_) => Classification::NotAnObject,
        Err(_) => Classification::Unparsable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_single_line_without_newline() {
        assert_eq!(split_last_line(r#"{"a":1}"#), ("", r#"{"a":1}"#));
    }

    #[test]
    fn test_split_ignores_single_trailing_newline() {
        assert_eq!(split_last_line("{\"a\":1}\n"), ("", "{\"a\":1}"));
        assert_eq!(
            split_last_line("line1\nline2\n{\"a\":1}\n"),
            ("line1\nline2\n", "{\"a\":1}")
        );
    }

    #[test]
    fn test_split_empty_and_lone_newline() {
        assert_eq!(split_last_line(""), ("", ""));
        assert_eq!(split_last_line("\n"), ("", ""));
    }

    #[test]
    fn test_split_double_trailing_newline_yields_empty_candidate() {
        // Only one trailing newline is forgiven.
        assert_eq!(split_last_line("{\"a\":1}\n\n"), ("{\"a\":1}\n", ""));
    }

    #[test]
    fn test_split_trims_candidate_whitespace() {
        assert_eq!(split_last_line("log\n   {\"a\":1}  \r\n"), ("log\n", "{\"a\":1}"));
    }

    #[test]
    fn test_split_handles_multibyte_tail() {
        assert_eq!(split_last_line("héllo\nwörld"), ("héllo\n", "wörld"));
        assert_eq!(split_last_line("日本"), ("", "日本"));
    }

    #[test]
    fn test_classify_object() {
        assert_eq!(
            classify(r#"{"a":1,"b":[true]}"#),
            Classification::Success(json!({"a":1,"b":[true]}).as_object().unwrap().clone())
        );
        assert_eq!(classify("{}"), Classification::Success(Map::new()));
    }

    #[test]
    fn test_classify_keeps_big_integers_and_key_order() {
        let text = r#"{"n":18446744073709551616,"b":-99999999999999999999,"a":1}"#;
        match classify(text) {
            Classification::Success(map) => {
                assert_eq!(Value::Object(map.clone()).to_string(), text);
                assert_eq!(map.keys().collect::<Vec<_>>(), ["n", "b", "a"]);
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_objects() {
        for text in ["[1,2,3]", "\"s\"", "42", "true", "null"] {
            assert_eq!(classify(text), Classification::NotAnObject, "{}", text);
        }
    }

    #[test]
    fn test_classify_unparsable() {
        assert_eq!(classify(""), Classification::Unparsable);
        assert_eq!(classify("not json"), Classification::Unparsable);
        assert_eq!(classify("{\"a\":"), Classification::Unparsable);
        assert_eq!(Classification::Unparsable.kind(), "unparsable");
    }
}
