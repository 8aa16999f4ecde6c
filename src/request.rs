//! Request model and the child-process environment built from it.

use std::{collections::BTreeMap, env};

use serde_json::{Map, Value};

use crate::RunnerError;

/// Reserved request key holding the action's input argument.
pub const INPUT_KEY: &str = "value";

/// Prefix applied to every non-input request key when exported to the child.
pub const ENV_PREFIX: &str = "__OW_";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    fields: Map<String, Value>,
}

impl Request {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn from_json(text: &str) -> Result<Self, RunnerError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| RunnerError::InvalidRequest(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RunnerError::InvalidRequest(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The reserved input entry, or an empty object when absent.
    pub fn input(&self) -> Value {
        self.fields
            .get(INPUT_KEY)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

/// This process's environment. Entries whose name or value is not valid
/// UTF-8 are skipped.
pub fn inherited_env() -> impl Iterator<Item = (String, String)> {
    env::vars_os().filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
        (Ok(k), Ok(v)) => Some((k, v)),
        (k, _) => {
            tracing::debug!(name = ?k, "skipping non-UTF-8 environment variable");
            None
        }
    })
}

/// Environment delta carrying the serialized input under `var`.
pub fn input_env(request: &Request, var: &str) -> (String, String) {
    (var.to_string(), request.input().to_string())
}

/// Inherited environment plus `__OW_<KEY>` for every request key except the input.
pub fn base_env<I>(request: &Request, inherited: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env: BTreeMap<String, String> = inherited.into_iter().collect();
    for (k, v) in request.fields() {
        if k == INPUT_KEY {
            continue;
        }
        let rendered = match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        env.insert(format!("{}{}", ENV_PREFIX, k.to_uppercase()), rendered);
    }
    env
}

pub fn build_env<I>(request: &Request, inherited: I, var: &str) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut env = base_env(request, inherited);
    let (k, v) = input_env(request, var);
    env.insert(k, v);
    env
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(v: Value) -> Request {
        match v {
            Value::Object(m) => Request::new(m),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_input_defaults_to_empty_object() {
        let req = request(json!({"api_key": "k"}));
        assert_eq!(req.input(), json!({}));
        assert_eq!(input_env(&req, "WHISK_INPUT"), ("WHISK_INPUT".into(), "{}".into()));
    }

    #[test]
    fn test_input_env_serializes_value() {
        let req = request(json!({"value": {"name": "a \"quoted\"\nline"}}));
        let (k, v) = input_env(&req, "WHISK_INPUT");
        assert_eq!(k, "WHISK_INPUT");
        let back: Value = serde_json::from_str(&v).unwrap();
        assert_eq!(back, json!({"name": "a \"quoted\"\nline"}));
    }

    #[test]
    fn test_base_env_exports_non_input_keys() {
        let req = request(json!({
            "value": {"x": 1},
            "api_key": "secret",
            "deadline": 1700000000000u64,
            "namespace": "guest"
        }));
        let env = base_env(&req, vec![("PATH".to_string(), "/usr/bin".to_string())]);
        assert_eq!(env.get("PATH").map(String::as_str), Some("/usr/bin"));
        assert_eq!(env.get("__OW_API_KEY").map(String::as_str), Some("secret"));
        assert_eq!(env.get("__OW_DEADLINE").map(String::as_str), Some("1700000000000"));
        assert_eq!(env.get("__OW_NAMESPACE").map(String::as_str), Some("guest"));
        assert!(!env.contains_key("__OW_VALUE"));
    }

    #[test]
    fn test_build_env_input_var_wins_over_inherited() {
        let req = request(json!({"value": {"a": 1}}));
        let env = build_env(
            &req,
            vec![("WHISK_INPUT".to_string(), "stale".to_string())],
            "WHISK_INPUT",
        );
        assert_eq!(env.get("WHISK_INPUT").map(String::as_str), Some(r#"{"a":1}"#));
    }

    #[cfg(unix)]
    #[test]
    fn test_inherited_env_skips_non_utf8_entries() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        env::set_var("ACTION_RUNNER_TEST_BAD_UTF8", OsStr::from_bytes(b"\xff\xfe"));
        env::set_var("ACTION_RUNNER_TEST_GOOD_UTF8", "ok");
        let env: BTreeMap<_, _> = inherited_env().collect();
        env::remove_var("ACTION_RUNNER_TEST_BAD_UTF8");
        env::remove_var("ACTION_RUNNER_TEST_GOOD_UTF8");

        assert!(!env.contains_key("ACTION_RUNNER_TEST_BAD_UTF8"));
        assert_eq!(env.get("ACTION_RUNNER_TEST_GOOD_UTF8").map(String::as_str), Some("ok"));
    }

    #[test]
    fn test_from_json_keeps_big_integers_and_key_order() {
        let req = Request::from_json(r#"{"value":{"z":18446744073709551616,"a":1}}"#).unwrap();
        assert_eq!(req.input().to_string(), r#"{"z":18446744073709551616,"a":1}"#);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(Request::from_json("[1,2]").is_err());
        assert!(Request::from_json("not json").is_err());
        let req = Request::from_json(r#"{"value":{"k":"v"}}"#).unwrap();
        assert_eq!(req.input(), json!({"k": "v"}));
    }
}
