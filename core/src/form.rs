//! Read-only views over a parsed form payload.
//!
//! Payloads come from a third-party export and are only loosely shaped, so
//! the views borrow the parsed JSON and answer every lookup leniently: a
//! field that is missing or has the wrong shape reads as absent instead of
//! failing the whole question.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::QuestionKind;
use crate::text::normalize_title;

/// Renders a JSON field as text the way the export's own tooling does.
///
/// Falsy values (`null`, `false`, `0`, empty string, empty list, empty
/// record) read as the empty string. Strings are returned as-is, other
/// scalars in their JSON spelling, and non-empty containers as compact JSON.
///
/// # Examples
///
/// ```
/// use form_flatten_core::value_text;
/// use serde_json::json;
///
/// assert_eq!(value_text(&json!("Jane")), "Jane");
/// assert_eq!(value_text(&json!(42)), "42");
/// assert_eq!(value_text(&json!(0)), "");
/// assert_eq!(value_text(&json!(null)), "");
/// ```
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null | Value::Bool(false) => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => {
            if n.as_f64() == Some(0.0) {
                Cow::Borrowed("")
            } else {
                Cow::Owned(n.to_string())
            }
        }
        Value::Array(items) if items.is_empty() => Cow::Borrowed(""),
        Value::Object(map) if map.is_empty() => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// A grouping node of the payload holding an ordered list of questions.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Section<'a> {
    /// Wraps a payload element; non-record elements are not sections.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|raw| Self { raw })
    }

    /// Questions of this section in payload order.
    ///
    /// A missing or non-list `questions` field yields nothing, as do list
    /// entries that are not records.
    pub fn questions(self) -> impl Iterator<Item = Question<'a>> {
        self.raw
            .get("questions")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Question::from_value)
    }
}

/// Iterates every question of every section, preserving payload order.
///
/// # Examples
///
/// ```
/// use form_flatten_core::{questions_in, QuestionKind};
/// use serde_json::json;
///
/// let sections = vec![
///     json!({"questions": [{"type": "Short answer", "title": "Reason"}]}),
///     json!("not a section"),
///     json!({"questions": [{"type": "Signature", "title": "Signature"}]}),
/// ];
/// let kinds: Vec<_> = questions_in(&sections).map(|q| q.kind()).collect();
/// assert_eq!(kinds, vec![QuestionKind::ShortAnswer, QuestionKind::Signature]);
/// ```
pub fn questions_in(sections: &[Value]) -> impl Iterator<Item = Question<'_>> {
    sections
        .iter()
        .filter_map(Section::from_value)
        .flat_map(|section| section.questions())
}

/// One form field record.
#[derive(Debug, Clone, Copy)]
pub struct Question<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Question<'a> {
    /// Wraps a question record; non-record values are not questions.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|raw| Self { raw })
    }

    /// Kind parsed from the whitespace-normalized `type` tag.
    pub fn kind(&self) -> QuestionKind {
        QuestionKind::from_tag(&normalize_title(&self.text("type")))
    }

    /// Whitespace-normalized title; empty when missing.
    pub fn title(&self) -> String {
        normalize_title(&self.text("title"))
    }

    /// Trimmed question id; empty when missing.
    pub fn id(&self) -> String {
        self.text("id").trim().to_string()
    }

    /// `true` only when `shown` is exactly boolean `false`.
    pub fn is_hidden(&self) -> bool {
        matches!(self.raw.get("shown"), Some(Value::Bool(false)))
    }

    /// Raw field lookup.
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    /// Field rendered through [`value_text`]; empty when missing.
    pub fn text(&self, key: &str) -> Cow<'a, str> {
        self.raw.get(key).map_or(Cow::Borrowed(""), value_text)
    }

    /// Field if it is a JSON string.
    pub fn str_field(&self, key: &str) -> Option<&'a str> {
        self.raw.get(key).and_then(Value::as_str)
    }

    /// Field if it is a JSON integer.
    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.raw.get(key).and_then(Value::as_i64)
    }

    /// Options of a choice question (`checkboxes` list), skipping non-records.
    pub fn options(self) -> impl Iterator<Item = ChoiceOption<'a>> {
        self.raw
            .get("checkboxes")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_object().map(|raw| ChoiceOption { raw }))
    }
}

/// One option of a checkbox or multiple-choice question.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceOption<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> ChoiceOption<'a> {
    /// `true` only when `checked` is exactly boolean `true`.
    pub fn is_checked(&self) -> bool {
        matches!(self.raw.get("checked"), Some(Value::Bool(true)))
    }

    /// `true` when the option is the free-text "other" choice.
    pub fn is_custom(&self) -> bool {
        matches!(self.raw.get("customChoice"), Some(Value::Bool(true)))
    }

    /// Trimmed `label`, falling back to `value` when the label is empty.
    pub fn label(&self) -> String {
        let label = self.raw.get("label").map_or(Cow::Borrowed(""), value_text);
        let picked = if label.is_empty() {
            self.raw.get("value").map_or(Cow::Borrowed(""), value_text)
        } else {
            label
        };
        picked.trim().to_string()
    }
}
