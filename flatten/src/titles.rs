//! Column naming for questions within one row.

use std::collections::HashSet;

use form_flatten_core::Question;

/// Assigns each question of one row a distinct column name.
///
/// A fresh assigner is used per row. Identical titles recurring across rows
/// in the same order map to the same names, which is what lines their
/// answers up under one column; nothing stronger than that convention ties
/// a column to a logical question.
///
/// # Examples
///
/// ```
/// use form_flatten::titles::TitleAssigner;
/// use form_flatten_core::Question;
/// use serde_json::json;
///
/// let a = json!({"title": "Comment"});
/// let b = json!({"title": "Comment"});
/// let mut titles = TitleAssigner::new();
/// assert_eq!(titles.assign("Comment", &Question::from_value(&a).unwrap()), "Comment");
/// assert_eq!(titles.assign("Comment", &Question::from_value(&b).unwrap()), "Comment #2");
/// ```
#[derive(Debug, Default)]
pub struct TitleAssigner {
    seen: HashSet<String>,
}

impl TitleAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the final column name for `base` and records it as taken.
    ///
    /// An unused non-empty title is kept as-is. An empty title becomes
    /// `(untitled:<id>)`, or `(untitled)` without an id. A name that is
    /// still taken gets the lowest free ` #k` suffix, starting at 2.
    pub fn assign(&mut self, base: &str, question: &Question<'_>) -> String {
        if !base.is_empty() && !self.seen.contains(base) {
            self.seen.insert(base.to_string());
            return base.to_string();
        }

        let candidate = if base.is_empty() {
            let id = question.id();
            if id.is_empty() {
                "(untitled)".to_string()
            } else {
                format!("(untitled:{id})")
            }
        } else {
            base.to_string()
        };

        let mut name = candidate.clone();
        let mut k = 2u32;
        while self.seen.contains(&name) {
            name = format!("{candidate} #{k}");
            k += 1;
        }

        self.seen.insert(name.clone());
        name
    }
}
