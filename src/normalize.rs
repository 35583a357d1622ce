use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::config::Validation;
use crate::error::ParseError;
use crate::quiz::{DescriptiveQuestion, McqQuestion, Question, Quiz, QuizType};

const FENCE_JSON: &str = "```json";
const FENCE: &str = "```";

/// Remove every markdown fence marker from `raw` and trim the result.
///
/// This is a textual strip, not a markdown parser: any occurrence of the
/// fence tokens is removed wherever it appears.
pub fn strip_fences(raw: &str) -> String {
    raw.replace(FENCE_JSON, "").replace(FENCE, "").trim().to_string()
}

/// Top-level shapes a model response may take.
#[derive(Debug)]
pub enum TopLevel {
    /// A bare array of question objects.
    RawArray(Vec<Value>),
    /// An object carrying the array under `"questions"`.
    WrappedObject(Vec<Value>),
    /// Anything else.
    Other(Value),
}

impl TopLevel {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::RawArray(items),
            Value::Object(mut map) => match map.remove("questions") {
                Some(Value::Array(items)) => Self::WrappedObject(items),
                Some(other) => {
                    map.insert("questions".to_string(), other);
                    Self::Other(Value::Object(map))
                }
                None => Self::Other(Value::Object(map)),
            },
            other => Self::Other(other),
        }
    }
}

/// Normalize a raw model response into a quiz of the requested type.
///
/// Lenient: multiple-choice questions that miss the 4-options / answer-in-options
/// contract are kept and logged.
pub fn normalize(raw: &str, quiz_type: QuizType) -> Result<Quiz, ParseError> {
    normalize_with(raw, quiz_type, Validation::Lenient)
}

/// Normalize with an explicit validation policy.
#[instrument(target = "quizify::normalize", skip(raw), fields(raw_len = raw.len()))]
pub fn normalize_with(raw: &str, quiz_type: QuizType, validation: Validation) -> Result<Quiz, ParseError> {
    let result = normalize_inner(raw, quiz_type, validation);
    if let Err(e) = &result {
        error!(target: "quizify::normalize", reason = e.reason(), error = %e, raw = %raw, "Failed to parse model response");
    }
    result
}

fn normalize_inner(raw: &str, quiz_type: QuizType, validation: Validation) -> Result<Quiz, ParseError> {
    let cleaned = strip_fences(raw);
    let parsed: Value = serde_json::from_str(&cleaned)
        .map_err(|source| ParseError::InvalidJson { source, raw: raw.to_string() })?;

    let elements = match TopLevel::classify(parsed) {
        TopLevel::RawArray(items) => {
            debug!(target: "quizify::normalize", count = items.len(), "Response is a bare array");
            items
        }
        TopLevel::WrappedObject(items) => {
            debug!(target: "quizify::normalize", count = items.len(), "Response wraps questions in an object");
            items
        }
        TopLevel::Other(_) => return Err(ParseError::MissingQuestions { raw: raw.to_string() }),
    };

    let questions = elements
        .iter()
        .enumerate()
        .map(|(index, element)| coerce_question(index, element, quiz_type, validation))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(target: "quizify::normalize", count = questions.len(), quiz_type = %quiz_type, "Normalized quiz");
    Ok(Quiz::new(questions))
}

fn coerce_question(
    index: usize,
    element: &Value,
    quiz_type: QuizType,
    validation: Validation,
) -> Result<Question, ParseError> {
    let fields = element.as_object().ok_or_else(|| ParseError::MalformedElement {
        index,
        detail: format!("expected an object, found {}", type_name(element)),
    })?;

    let question = text_field(index, fields, "question")?;
    let answer = text_field(index, fields, "answer")?;

    match quiz_type {
        QuizType::Mcq => {
            let options = options_field(index, fields)?;
            let mcq = McqQuestion { question, options, answer };
            for issue in mcq.issues() {
                match validation {
                    Validation::Strict => return Err(ParseError::InvalidQuestion { index, issue }),
                    Validation::Lenient => {
                        warn!(target: "quizify::normalize", index, issue = %issue, "Keeping multiple-choice question that breaks its contract");
                    }
                }
            }
            Ok(Question::Mcq(mcq))
        }
        QuizType::Descriptive => Ok(Question::Descriptive(DescriptiveQuestion { question, answer })),
    }
}

/// Read a scalar field as trimmed text. Missing or null becomes an empty string.
fn text_field(index: usize, fields: &Map<String, Value>, name: &str) -> Result<String, ParseError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => scalar_text(value).ok_or_else(|| ParseError::MalformedElement {
            index,
            detail: format!("field `{}` must be text, found {}", name, type_name(value)),
        }),
    }
}

fn options_field(index: usize, fields: &Map<String, Value>) -> Result<Vec<String>, ParseError> {
    match fields.get("options") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(pos, item)| {
                scalar_text(item).ok_or_else(|| ParseError::MalformedElement {
                    index,
                    detail: format!("option {} must be text, found {}", pos, type_name(item)),
                })
            })
            .collect(),
        Some(other) => Err(ParseError::MalformedElement {
            index,
            detail: format!("field `options` must be an array, found {}", type_name(other)),
        }),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn type_name(value: &Value) -> &'static str {
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
    use serde_json::json;

    #[test]
    fn strip_fences_removes_markers_anywhere() {
        assert_eq!(strip_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_fences("  [```1```]  "), "[1]");
        assert_eq!(strip_fences("no fences"), "no fences");
    }

    #[test]
    fn classify_dispatches_on_shape() {
        assert!(matches!(TopLevel::classify(json!([])), TopLevel::RawArray(v) if v.is_empty()));
        assert!(matches!(TopLevel::classify(json!({"questions": [1]})), TopLevel::WrappedObject(v) if v.len() == 1));
        assert!(matches!(TopLevel::classify(json!({"questions": "x"})), TopLevel::Other(_)));
        assert!(matches!(TopLevel::classify(json!({"foo": 1})), TopLevel::Other(_)));
        assert!(matches!(TopLevel::classify(json!("text")), TopLevel::Other(_)));
    }

    #[test]
    fn scalar_text_coerces_numbers_and_bools() {
        assert_eq!(scalar_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!("  hi ")).as_deref(), Some("hi"));
        assert_eq!(scalar_text(&json!([1])), None);
    }
}
