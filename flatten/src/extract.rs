//! Per-question answer extraction.
//!
//! Dispatch is a closed `match` over [`QuestionKind`]; each kind has one
//! rule, and [`QuestionKind::Other`] uses the generic rule driven by the
//! configured extra keys.

use form_flatten_core::{Question, QuestionKind, clean_text};

/// Text shown for a signature question with a signature attached.
pub const SIGNED: &str = "signed";
/// Text shown for a signature question without one.
pub const NOT_SIGNED: &str = "not signed";
/// Label used for a checked custom choice that carries no text.
pub const CUSTOM_CHOICE_LABEL: &str = "Other";
/// Separator between multiple values in one cell.
pub const VALUE_SEPARATOR: &str = "; ";

/// Extracts the display answer of one question.
///
/// Returns `None` when the question holds no answer. Visibility is not
/// checked here; callers skip hidden questions before extracting.
///
/// # Examples
///
/// ```
/// use form_flatten::extract::extract_answer;
/// use form_flatten_core::Question;
/// use serde_json::json;
///
/// let raw = json!({"type": "Date of birth", "birthYear": 1990, "birthMonth": 0, "birthDay": 15});
/// let q = Question::from_value(&raw).unwrap();
/// assert_eq!(extract_answer(&q, &[]).as_deref(), Some("15/01/1990"));
/// ```
pub fn extract_answer(question: &Question<'_>, extra_keys: &[String]) -> Option<String> {
    match question.kind() {
        QuestionKind::Statement => None,
        QuestionKind::ShortAnswer | QuestionKind::Paragraph | QuestionKind::YesNo => {
            non_empty(clean_text(question.str_field("answerText").unwrap_or_default()))
        }
        QuestionKind::PatientName => patient_name(question),
        QuestionKind::DateOfBirth => date_of_birth(question),
        QuestionKind::Checkboxes | QuestionKind::MultipleChoice => {
            checked_options(question).or_else(|| answer_text(question))
        }
        QuestionKind::Signature => Some(signature(question).to_string()),
        QuestionKind::Other => generic(question, extra_keys),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn answer_text(question: &Question<'_>) -> Option<String> {
    non_empty(clean_text(&question.text("answerText")))
}

fn patient_name(question: &Question<'_>) -> Option<String> {
    let parts: Vec<String> = ["firstName", "lastName"]
        .into_iter()
        .map(|key| clean_text(&question.text(key)))
        .filter(|part| !part.is_empty())
        .collect();
    non_empty(parts.join(" "))
}

/// `DD/MM/YYYY` from the split birth fields; the stored month is 0-based.
fn date_of_birth(question: &Question<'_>) -> Option<String> {
    match (
        question.int_field("birthYear"),
        question.int_field("birthMonth"),
        question.int_field("birthDay"),
    ) {
        (Some(year), Some(month), Some(day)) => {
            Some(format!("{day:02}/{:02}/{year}", month.saturating_add(1)))
        }
        _ => answer_text(question),
    }
}

fn checked_options(question: &Question<'_>) -> Option<String> {
    let picked: Vec<String> = question
        .options()
        .filter(|option| option.is_checked())
        .filter_map(|option| {
            let label = option.label();
            if !label.is_empty() {
                Some(clean_text(&label))
            } else if option.is_custom() {
                Some(CUSTOM_CHOICE_LABEL.to_string())
            } else {
                None
            }
        })
        .collect();
    non_empty(picked.join(VALUE_SEPARATOR))
}

/// Signature questions always produce a value.
pub fn signature(question: &Question<'_>) -> &'static str {
    match question.str_field("signature") {
        Some(sig) if !sig.trim().is_empty() => SIGNED,
        _ => NOT_SIGNED,
    }
}

fn generic(question: &Question<'_>, extra_keys: &[String]) -> Option<String> {
    let values: Vec<String> = std::iter::once("answerText")
        .chain(extra_keys.iter().map(String::as_str))
        .map(|key| clean_text(&question.text(key)))
        .filter(|value| !value.is_empty())
        .collect();
    non_empty(values.join(VALUE_SEPARATOR))
}
