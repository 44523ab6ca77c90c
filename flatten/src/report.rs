//! Run report returned by a conversion.

use serde::{Deserialize, Serialize};

use crate::plan::ColumnPlan;

/// What a run detected and how many rows went through it.
///
/// `rows_written` is `None` when only column discovery ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenReport {
    pub title_col: Option<String>,
    pub date_col: Option<String>,
    pub payload_col: String,
    pub meta_cols: Vec<String>,
    /// Union of question columns in discovery order.
    pub question_columns: Vec<String>,
    /// Data rows in the input.
    pub rows_read: usize,
    /// Rows that passed the row filter.
    pub rows_kept: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_written: Option<usize>,
    /// Kept rows whose payload cell did not hold a usable section list.
    pub rows_without_payload: usize,
}

impl FlattenReport {
    /// Starts a report from the resolved columns, with zeroed counts.
    pub fn new(plan: &ColumnPlan, question_columns: Vec<String>) -> Self {
        Self {
            title_col: plan.title_col.clone(),
            date_col: plan.date_col.clone(),
            payload_col: plan.payload_col.clone(),
            meta_cols: plan.meta_cols.clone(),
            question_columns,
            rows_read: 0,
            rows_kept: 0,
            rows_written: None,
            rows_without_payload: 0,
        }
    }

    /// `Detected columns: title_col=..., date_col=..., payload_col=...`
    pub fn detected_columns_line(&self) -> String {
        format!(
            "Detected columns: title_col={}, date_col={}, payload_col={}",
            display_column(self.title_col.as_deref()),
            display_column(self.date_col.as_deref()),
            display_column(Some(&self.payload_col)),
        )
    }
}

fn display_column(column: Option<&str>) -> String {
    match column {
        Some(name) => format!("{name:?}"),
        None => "none".to_string(),
    }
}
