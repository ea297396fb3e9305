//! Structural validation of the generation service's JSON.
//!
//! Every field is checked for presence and type before anything is trusted,
//! and failures name the offending path (`sections[1].changes[0]`).

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::optimization::{normalize_score, OptimizationPayload, ResumeSection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected a JSON object at `{0}`")]
    NotAnObject(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{path}` must be {expected}")]
    WrongType { path: String, expected: &'static str },
}

/// Validates the raw response against the `OptimizationResult` shape (minus id/date).
/// Scores are rounded and clamped into 0–100 on the way through.
pub fn validate_payload(value: &Value) -> Result<OptimizationPayload, ShapeError> {
    let root = as_object(value, "$")?;

    let initial_score = number_field(root, "", "initialScore")?;
    let optimized_score = number_field(root, "", "optimizedScore")?;
    let analysis = string_field(root, "", "analysis")?;
    let sections = array_field(root, "", "sections")?
        .iter()
        .enumerate()
        .map(|(i, section)| validate_section(section, &format!("sections[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;
    let suggested_keywords = string_array_field(root, "", "suggestedKeywords")?;
    let full_optimized_resume = string_field(root, "", "fullOptimizedResume")?;

    Ok(OptimizationPayload {
        initial_score: normalize_score(initial_score),
        optimized_score: normalize_score(optimized_score),
        analysis,
        sections,
        suggested_keywords,
        full_optimized_resume,
    })
}

fn validate_section(value: &Value, path: &str) -> Result<ResumeSection, ShapeError> {
    let section = as_object(value, path)?;
    Ok(ResumeSection {
        title: string_field(section, path, "title")?,
        original: string_field(section, path, "original")?,
        optimized: string_field(section, path, "optimized")?,
        changes: string_array_field(section, path, "changes")?,
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ShapeError> {
    value
        .as_object()
        .ok_or_else(|| ShapeError::NotAnObject(path.to_string()))
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn field<'a>(obj: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value, ShapeError> {
    match obj.get(key) {
        Some(Value::Null) | None => Err(ShapeError::MissingField(join(parent, key))),
        Some(v) => Ok(v),
    }
}

fn string_field(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<String, ShapeError> {
    field(obj, parent, key)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| ShapeError::WrongType {
            path: join(parent, key),
            expected: "a string",
        })
}

fn number_field(obj: &Map<String, Value>, parent: &str, key: &str) -> Result<f64, ShapeError> {
    field(obj, parent, key)?
        .as_f64()
        .ok_or_else(|| ShapeError::WrongType {
            path: join(parent, key),
            expected: "a number",
        })
}

fn array_field<'a>(
    obj: &'a Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<&'a Vec<Value>, ShapeError> {
    field(obj, parent, key)?
        .as_array()
        .ok_or_else(|| ShapeError::WrongType {
            path: join(parent, key),
            expected: "an array",
        })
}

fn string_array_field(
    obj: &Map<String, Value>,
    parent: &str,
    key: &str,
) -> Result<Vec<String>, ShapeError> {
    let path = join(parent, key);
    array_field(obj, parent, key)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(String::from)
                .ok_or_else(|| ShapeError::WrongType {
                    path: format!("{path}[{i}]"),
                    expected: "a string",
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "initialScore": 48,
            "optimizedScore": 83.6,
            "analysis": "Missing cloud keywords.",
            "sections": [
                {
                    "title": "Experience",
                    "original": "Managed a team of 5",
                    "optimized": "Led a cross-functional team of 5 engineers",
                    "changes": ["Stronger verb", "Added scope"]
                }
            ],
            "suggestedKeywords": ["AWS", "Terraform"],
            "fullOptimizedResume": "JANE DOE\nLed a cross-functional team of 5 engineers"
        })
    }

    #[test]
    fn test_valid_payload() {
        let payload = validate_payload(&valid()).unwrap();
        assert_eq!(payload.initial_score, 48);
        assert_eq!(payload.optimized_score, 84);
        assert_eq!(payload.sections.len(), 1);
        assert_eq!(payload.sections[0].changes, vec!["Stronger verb", "Added scope"]);
        assert_eq!(payload.suggested_keywords, vec!["AWS", "Terraform"]);
    }

    #[test]
    fn test_scores_are_clamped() {
        let mut value = valid();
        value["initialScore"] = json!(-10);
        value["optimizedScore"] = json!(130);
        let payload = validate_payload(&value).unwrap();
        assert_eq!(payload.initial_score, 0);
        assert_eq!(payload.optimized_score, 100);
    }

    #[test]
    fn test_score_drop_is_kept() {
        let mut value = valid();
        value["initialScore"] = json!(70);
        value["optimizedScore"] = json!(60);
        let payload = validate_payload(&value).unwrap();
        assert!(payload.optimized_score < payload.initial_score);
    }

    #[test]
    fn test_missing_top_level_field() {
        let mut value = valid();
        value.as_object_mut().unwrap().remove("fullOptimizedResume");
        assert_eq!(
            validate_payload(&value).unwrap_err(),
            ShapeError::MissingField("fullOptimizedResume".to_string())
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut value = valid();
        value["analysis"] = Value::Null;
        assert_eq!(
            validate_payload(&value).unwrap_err(),
            ShapeError::MissingField("analysis".to_string())
        );
    }

    #[test]
    fn test_score_as_string_rejected() {
        let mut value = valid();
        value["initialScore"] = json!("48");
        assert_eq!(
            validate_payload(&value).unwrap_err(),
            ShapeError::WrongType {
                path: "initialScore".to_string(),
                expected: "a number"
            }
        );
    }

    #[test]
    fn test_section_missing_changes() {
        let mut value = valid();
        value["sections"][0].as_object_mut().unwrap().remove("changes");
        assert_eq!(
            validate_payload(&value).unwrap_err(),
            ShapeError::MissingField("sections[0].changes".to_string())
        );
    }

    #[test]
    fn test_non_string_change_reports_index() {
        let mut value = valid();
        value["sections"][0]["changes"] = json!(["ok", 7]);
        let err = validate_payload(&value).unwrap_err();
        assert_eq!(err.to_string(), "field `sections[0].changes[1]` must be a string");
    }

    #[test]
    fn test_section_not_object() {
        let mut value = valid();
        value["sections"] = json!(["Experience"]);
        assert_eq!(
            validate_payload(&value).unwrap_err(),
            ShapeError::NotAnObject("sections[0]".to_string())
        );
    }

    #[test]
    fn test_root_not_object() {
        assert_eq!(
            validate_payload(&json!([1, 2])).unwrap_err(),
            ShapeError::NotAnObject("$".to_string())
        );
    }
}
