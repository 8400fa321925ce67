//! Response decoding for both generation backends.

use serde_json::Value;

use crate::ports::{GeneratedPost, GenerationError};

/// Accepted top-level shapes of a chat-completion answer, in preference order.
#[derive(Debug)]
enum Envelope {
    Array(Vec<Value>),
    Posts(Vec<Value>),
    Results(Vec<Value>),
}

impl Envelope {
    fn classify(value: Value) -> Result<Self, GenerationError> {
        match value {
            Value::Array(items) => Ok(Envelope::Array(items)),
            Value::Object(mut map) => {
                // The first key present decides; a non-array value is an error.
                if let Some(posts) = map.remove("posts") {
                    return Ok(Envelope::Posts(expect_array("posts", posts)?));
                }
                if let Some(results) = map.remove("results") {
                    return Ok(Envelope::Results(expect_array("results", results)?));
                }
                let keys = map.keys().cloned().collect::<Vec<_>>().join(", ");
                Err(GenerationError::ResponseShape(format!(
                    "object has no `posts` or `results` array (keys: {keys})"
                )))
            }
            other => Err(GenerationError::ResponseShape(format!(
                "expected an array or object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn into_items(self) -> Vec<Value> {
        match self {
            Envelope::Array(items) | Envelope::Posts(items) | Envelope::Results(items) => items,
        }
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Decode the message content of a chat-completion answer.
///
/// Accepts a top-level array, or an object with a `posts` or `results` array.
pub fn decode_chat_content(raw: &str) -> Result<Vec<GeneratedPost>, GenerationError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| GenerationError::ResponseShape(format!("content is not JSON: {e}")))?;
    decode_items(Envelope::classify(value)?.into_items())
}

/// Decode schema-constrained output, which must be a top-level array.
///
/// Blank output decodes to an empty batch.
pub fn decode_schema_array(raw: &str) -> Result<Vec<GeneratedPost>, GenerationError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| GenerationError::ResponseShape(format!("output is not JSON: {e}")))?;
    match value {
        Value::Array(items) => decode_items(items),
        other => Err(GenerationError::ResponseShape(format!(
            "expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

fn decode_items(items: Vec<Value>) -> Result<Vec<GeneratedPost>, GenerationError> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| GenerationError::ResponseShape(format!("post {i}: {e}")))
        })
        .collect()
}

fn expect_array(key: &str, value: Value) -> Result<Vec<Value>, GenerationError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(GenerationError::ResponseShape(format!(
            "`{key}` is {}, expected an array",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
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

    const ITEM: &str = r#"{"content":"Hello #a","topic":"Intro","personaId":"p1"}"#;

    #[test]
    fn test_fenced_results_object_is_accepted() {
        let body = format!("```json\n{{\"results\":[{ITEM}]}}\n```");
        let posts = decode_chat_content(&body).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].topic, "Intro");
        assert_eq!(posts[0].persona_id, "p1");
    }

    #[test]
    fn test_bare_fence_and_plain_array() {
        let fenced = format!("```\n[{ITEM},{ITEM}]\n```");
        assert_eq!(decode_chat_content(&fenced).unwrap().len(), 2);
        assert_eq!(decode_chat_content(&format!("  [{ITEM}]  ")).unwrap().len(), 1);
    }

    #[test]
    fn test_posts_wins_over_results() {
        let body = format!(
            r#"{{"results":[{ITEM},{ITEM}],"posts":[{ITEM}]}}"#
        );
        assert_eq!(decode_chat_content(&body).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_posts_does_not_fall_back_to_results() {
        let body = format!(r#"{{"posts":"oops","results":[{ITEM}]}}"#);
        let err = decode_chat_content(&body).unwrap_err();
        assert!(
            matches!(&err, GenerationError::ResponseShape(msg) if msg.contains("`posts` is a string")),
            "unexpected error {err:?}"
        );

        let body = r#"{"results":{"content":"Hi"}}"#;
        assert!(matches!(
            decode_chat_content(body),
            Err(GenerationError::ResponseShape(_))
        ));
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        for body in [
            r#"{"data":[]}"#,
            r#"{"posts":"not a list"}"#,
            r#""just text""#,
            "42",
            "not json at all",
        ] {
            assert!(
                matches!(decode_chat_content(body), Err(GenerationError::ResponseShape(_))),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn test_items_missing_required_fields_are_rejected() {
        let body = r#"[{"content":"Hi","topic":"T"}]"#;
        assert!(matches!(
            decode_chat_content(body),
            Err(GenerationError::ResponseShape(_))
        ));
        assert!(matches!(
            decode_schema_array(body),
            Err(GenerationError::ResponseShape(_))
        ));
    }

    #[test]
    fn test_schema_output_must_be_an_array() {
        assert_eq!(decode_schema_array(&format!("[{ITEM}]")).unwrap().len(), 1);
        assert!(decode_schema_array("").unwrap().is_empty());
        assert!(matches!(
            decode_schema_array(&format!(r#"{{"posts":[{ITEM}]}}"#)),
            Err(GenerationError::ResponseShape(_))
        ));
    }

    #[test]
    fn test_short_and_long_batches_pass_through() {
        let six = format!("[{}]", vec![ITEM; 6].join(","));
        assert_eq!(decode_chat_content(&six).unwrap().len(), 6);
        assert!(decode_chat_content("[]").unwrap().is_empty());
    }
}
