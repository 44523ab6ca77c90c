//! Flattening one row's sections into named answers.
//!
//! [`question_titles`] and [`AnswerMap::from_sections`] walk the questions in
//! the same order with the same [`TitleAssigner`] rules, so the column names
//! discovered for a row are exactly the names its answers are filed under.

use std::collections::HashMap;

use form_flatten_core::{Question, questions_in};
use serde_json::Value;

use crate::extract::{NOT_SIGNED, VALUE_SEPARATOR, extract_answer};
use crate::titles::TitleAssigner;

/// Cell value for a column the row does not have (or hides).
pub const NOT_APPLICABLE: &str = "(N/A)";
/// Cell value for a column the row has but left unanswered.
pub const NO_RESPONSE: &str = "(NoResponse)";
/// Column whose unanswered cell reads [`NOT_SIGNED`] instead of [`NO_RESPONSE`].
pub const SIGNATURE_TITLE: &str = "Signature";

/// Walks the questions that get a column, paired with their final names.
fn named_questions<'a>(sections: &'a [Value]) -> impl Iterator<Item = (String, Question<'a>)> {
    let mut titles = TitleAssigner::new();
    questions_in(sections)
        .filter(|q| q.kind().expects_response())
        .map(move |q| (titles.assign(&q.title(), &q), q))
}

/// Final column names of one row's questions, in payload order.
///
/// Statements are skipped; hidden questions are included.
///
/// # Examples
///
/// ```
/// use form_flatten::answers::question_titles;
/// use serde_json::json;
///
/// let sections = vec![json!({"questions": [
///     {"type": "Statement", "title": "Intro"},
///     {"type": "Short answer", "title": "Comment"},
///     {"type": "Short answer", "title": "Comment", "shown": false}
/// ]})];
/// assert_eq!(question_titles(&sections), vec!["Comment", "Comment #2"]);
/// ```
pub fn question_titles(sections: &[Value]) -> Vec<String> {
    named_questions(sections).map(|(name, _)| name).collect()
}

/// Answers of one row keyed by final column name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnswerMap {
    answers: HashMap<String, Vec<String>>,
}

impl AnswerMap {
    /// Extracts every visible question's answer.
    ///
    /// Hidden questions still consume their name, so later duplicates are
    /// numbered exactly as during column discovery, but they are not entered
    /// into the map.
    pub fn from_sections(sections: &[Value], extra_keys: &[String]) -> Self {
        let mut answers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, question) in named_questions(sections) {
            if question.is_hidden() {
                continue;
            }
            let entry = answers.entry(name).or_default();
            if let Some(answer) = extract_answer(&question, extra_keys) {
                if !answer.trim().is_empty() {
                    entry.push(answer);
                }
            }
        }
        Self { answers }
    }

    /// Output cell for `title`.
    ///
    /// Missing or hidden ⇒ [`NOT_APPLICABLE`]; present without answers ⇒
    /// [`NOT_SIGNED`] for the [`SIGNATURE_TITLE`] column, [`NO_RESPONSE`]
    /// otherwise; else the answers joined with `"; "`.
    pub fn cell(&self, title: &str) -> String {
        match self.answers.get(title) {
            None => NOT_APPLICABLE.to_string(),
            Some(values) if values.is_empty() => {
                if title == SIGNATURE_TITLE {
                    NOT_SIGNED.to_string()
                } else {
                    NO_RESPONSE.to_string()
                }
            }
            Some(values) => values.join(VALUE_SEPARATOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sections() -> Vec<Value> {
        vec![
            json!({"questions": [
                {"type": "Statement", "title": "Intro"},
                {"type": "Short answer", "title": "Comment", "answerText": "first"},
                {"type": "Short answer", "title": "Comment", "answerText": "second"},
                {"type": "Paragraph", "title": "Empty"},
                {"type": "Short answer", "title": "Hidden", "answerText": "secret", "shown": false}
            ]}),
            json!({"questions": [
                {"type": "Signature", "title": "Signature", "signature": ""},
                {"type": "Checkboxes", "title": "", "id": "c1", "checkboxes": [{"label": "A", "checked": true}]}
            ]}),
        ]
    }

    #[test]
    fn test_titles_follow_payload_order() {
        assert_eq!(
            question_titles(&sections()),
            vec!["Comment", "Comment #2", "Empty", "Hidden", "Signature", "(untitled:c1)"]
        );
    }

    #[test]
    fn test_statements_contribute_nothing() {
        let map = AnswerMap::from_sections(&sections(), &[]);
        assert_eq!(map.cell("Intro"), NOT_APPLICABLE);
        assert_eq!(map.cell("Intro #2"), NOT_APPLICABLE);
    }

    #[test]
    fn test_duplicate_titles_keep_separate_answers() {
        let map = AnswerMap::from_sections(&sections(), &[]);
        assert_eq!(map.cell("Comment"), "first");
        assert_eq!(map.cell("Comment #2"), "second");
    }

    #[test]
    fn test_unanswered_and_hidden_sentinels() {
        let map = AnswerMap::from_sections(&sections(), &[]);
        assert_eq!(map.cell("Empty"), NO_RESPONSE);
        assert_eq!(map.cell("Hidden"), NOT_APPLICABLE);
        assert_eq!(map.cell("Never seen"), NOT_APPLICABLE);
        assert_eq!(map.cell("(untitled:c1)"), "A");
    }

    #[test]
    fn test_signature_column_reads_not_signed() {
        let map = AnswerMap::from_sections(&sections(), &[]);
        assert_eq!(map.cell(SIGNATURE_TITLE), NOT_SIGNED);
    }

    #[test]
    fn test_unanswered_signature_title_on_other_kind() {
        let raw = vec![json!({"questions": [{"type": "Short answer", "title": "Signature"}]})];
        let map = AnswerMap::from_sections(&raw, &[]);
        assert_eq!(map.cell("Signature"), NOT_SIGNED);
        assert_eq!(map.cell("Signature #2"), NOT_APPLICABLE);
    }

    #[test]
    fn test_hidden_question_still_shifts_numbering() {
        let raw = vec![json!({"questions": [
            {"type": "Short answer", "title": "Note", "answerText": "hidden", "shown": false},
            {"type": "Short answer", "title": "Note", "answerText": "shown"}
        ]})];
        let map = AnswerMap::from_sections(&raw, &[]);
        assert_eq!(map.cell("Note"), NOT_APPLICABLE);
        assert_eq!(map.cell("Note #2"), "shown");
        assert_eq!(map.cell("Note #3"), NOT_APPLICABLE);
    }
}
