//! Core payload model and text normalization for form-submission exports.
//!
//! This crate defines the pieces every other crate in the workspace builds
//! on:
//!
//! - [`Section`] / [`Question`] / [`ChoiceOption`]: lenient, borrowing views
//!   over a parsed JSON payload. Missing or wrong-shaped fields read as
//!   absent rather than erroring.
//! - [`QuestionKind`]: the closed vocabulary of question types used to
//!   dispatch answer extraction.
//! - [`normalize_title`] / [`clean_text`]: the text normalizer used for
//!   every header and cell value.
//!
//! # Example
//!
//! ```
//! use form_flatten_core::*;
//! use serde_json::json;
//!
//! let sections = vec![json!({
//!     "questions": [
//!         {"type": "Statement", "title": "Welcome"},
//!         {"type": "Paragraph", "title": " Reason  for visit", "answerText": "<p>Knee</p>"}
//!     ]
//! })];
//!
//! let answered: Vec<_> = questions_in(&sections)
//!     .filter(|q| q.kind().expects_response())
//!     .map(|q| (q.title(), clean_text(&q.text("answerText"))))
//!     .collect();
//! assert_eq!(answered, vec![("Reason for visit".to_string(), "Knee".to_string())]);
//! ```

mod form;
mod kind;
mod text;

pub use form::{ChoiceOption, Question, Section, questions_in, value_text};
pub use kind::QuestionKind;
pub use text::{clean_text, normalize_title, unescape_html};
