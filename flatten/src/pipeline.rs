//! The two-stage flattening pipeline.
//!
//! Stage 1 ([`discover_columns`]) reads the input once and yields only the
//! union of question column names. Stage 2 ([`emit_rows`]) re-reads the
//! input from the start and writes one output row per kept input row
//! against that fixed column list. Neither stage keeps rows in memory.

use std::collections::HashSet;

use form_flatten_config::FlattenConfig;
use tracing::{debug, info};

use crate::answers::{AnswerMap, NOT_APPLICABLE, question_titles};
use crate::error::Result;
use crate::filter::RowFilter;
use crate::payload::parse_nonempty_sections;
use crate::plan::ColumnPlan;
use crate::report::FlattenReport;
use crate::sniff::{ColumnSniffer, HeuristicSniffer, SAMPLE_ROWS};
use crate::table::{Row, RowSink, RowSource};

/// Insertion-ordered set of column names.
///
/// # Examples
///
/// ```
/// use form_flatten::pipeline::UnionTitles;
///
/// let mut titles = UnionTitles::new();
/// titles.extend(["B", "A"].map(String::from));
/// titles.extend(["A", "C"].map(String::from));
/// assert_eq!(titles.as_slice(), ["B", "A", "C"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnionTitles {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl UnionTitles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `title` unless present; returns `true` if it was added.
    pub fn insert(&mut self, title: String) -> bool {
        if self.seen.contains(&title) {
            return false;
        }
        self.seen.insert(title.clone());
        self.order.push(title);
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

impl Extend<String> for UnionTitles {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for title in iter {
            self.insert(title);
        }
    }
}

/// Result of the discovery stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub titles: UnionTitles,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_without_payload: usize,
}

/// Counters from the emission stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_written: usize,
    pub rows_without_payload: usize,
}

/// Stage 1: collects every question column name across the kept rows.
///
/// Rows without a usable payload contribute nothing.
pub fn discover_columns(
    source: &dyn RowSource,
    plan: &ColumnPlan,
    filter: &RowFilter,
) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    for (idx, row) in source.open()?.enumerate() {
        let row = row?;
        discovery.rows_read += 1;
        if !filter.keep(&row) {
            debug!(row = idx + 1, "Row filtered out");
            continue;
        }
        discovery.rows_kept += 1;

        match parse_nonempty_sections(row.get(&plan.payload_col)) {
            Some(sections) => discovery.titles.extend(question_titles(&sections)),
            None => {
                debug!(row = idx + 1, "No usable payload, row adds no columns");
                discovery.rows_without_payload += 1;
            }
        }
    }

    info!(
        rows = discovery.rows_read,
        kept = discovery.rows_kept,
        columns = discovery.titles.len(),
        "Column discovery finished"
    );
    Ok(discovery)
}

/// Stage 2: writes the header and one row per kept input row.
///
/// A row without a usable payload is still written, with every question
/// column set to [`NOT_APPLICABLE`].
pub fn emit_rows(
    source: &dyn RowSource,
    plan: &ColumnPlan,
    filter: &RowFilter,
    titles: &[String],
    extra_keys: &[String],
    sink: &mut dyn RowSink,
) -> Result<PassStats> {
    let mut stats = PassStats::default();
    sink.write_header(&plan.output_header(titles))?;

    for (idx, row) in source.open()?.enumerate() {
        let row = row?;
        stats.rows_read += 1;
        if !filter.keep(&row) {
            continue;
        }
        stats.rows_kept += 1;

        let mut cells = meta_cells(plan, &row);
        match parse_nonempty_sections(row.get(&plan.payload_col)) {
            Some(sections) => {
                let answers = AnswerMap::from_sections(&sections, extra_keys);
                cells.extend(titles.iter().map(|title| answers.cell(title)));
            }
            None => {
                debug!(row = idx + 1, "No usable payload, writing placeholders");
                stats.rows_without_payload += 1;
                cells.extend(titles.iter().map(|_| NOT_APPLICABLE.to_string()));
            }
        }

        sink.write_row(&cells)?;
        stats.rows_written += 1;
    }

    sink.finish()?;
    info!(
        rows = stats.rows_read,
        written = stats.rows_written,
        without_payload = stats.rows_without_payload,
        "Row emission finished"
    );
    Ok(stats)
}

fn meta_cells(plan: &ColumnPlan, row: &Row) -> Vec<String> {
    plan.meta_cols
        .iter()
        .map(|column| row.get_or_empty(column).to_string())
        .collect()
}

/// Runs column resolution and both stages for one configuration.
///
/// # Examples
///
/// ```
/// use form_flatten::pipeline::Flattener;
/// use form_flatten::table::MemoryTable;
/// use form_flatten_config::FlattenConfig;
///
/// let input = MemoryTable::new(["Client Name", "Json"])
///     .with_row(["Jane", r#"[{"questions": [{"type": "Short answer", "title": "Reason", "answerText": "Back pain"}]}]"#])
///     .with_row(["John", "not json"]);
/// let mut output = MemoryTable::default();
///
/// let report = Flattener::new(FlattenConfig::default()).run(&input, &mut output).unwrap();
/// assert_eq!(report.payload_col, "Json");
/// assert_eq!(output.headers(), ["Client Name", "Reason"]);
/// assert_eq!(output.column("Reason"), vec!["Back pain", "(N/A)"]);
/// ```
pub struct Flattener {
    config: FlattenConfig,
    sniffer: Box<dyn ColumnSniffer>,
}

impl Flattener {
    /// Creates a flattener using the [`HeuristicSniffer`].
    pub fn new(config: FlattenConfig) -> Self {
        Self {
            config,
            sniffer: Box::new(HeuristicSniffer),
        }
    }

    /// Replaces the column sniffer.
    pub fn with_sniffer(mut self, sniffer: impl ColumnSniffer + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Resolves the column roles from the header and the first rows.
    pub fn plan(&self, source: &dyn RowSource) -> Result<ColumnPlan> {
        let stream = source.open()?;
        let headers = stream.headers().to_vec();
        let sample = stream.take(SAMPLE_ROWS).collect::<Result<Vec<_>>>()?;
        debug!(columns = headers.len(), sampled = sample.len(), "Sampled input");
        ColumnPlan::resolve(&self.config, &headers, &sample, self.sniffer.as_ref())
    }

    /// Row filter for a resolved plan.
    pub fn filter(&self, plan: &ColumnPlan) -> RowFilter {
        RowFilter::new(
            &self.config,
            plan.title_col.as_deref(),
            plan.date_col.as_deref(),
        )
    }

    /// Resolves columns and runs the discovery stage only.
    pub fn discover(&self, source: &dyn RowSource) -> Result<FlattenReport> {
        let plan = self.plan(source)?;
        let discovery = discover_columns(source, &plan, &self.filter(&plan))?;

        let mut report = FlattenReport::new(&plan, discovery.titles.into_vec());
        report.rows_read = discovery.rows_read;
        report.rows_kept = discovery.rows_kept;
        report.rows_without_payload = discovery.rows_without_payload;
        Ok(report)
    }

    /// Resolves columns, then runs both stages into `sink`.
    pub fn run(&self, source: &dyn RowSource, sink: &mut dyn RowSink) -> Result<FlattenReport> {
        let plan = self.plan(source)?;
        self.run_with_plan(source, &plan, sink)
    }

    /// Runs both stages with an already resolved plan.
    pub fn run_with_plan(
        &self,
        source: &dyn RowSource,
        plan: &ColumnPlan,
        sink: &mut dyn RowSink,
    ) -> Result<FlattenReport> {
        let filter = self.filter(plan);
        let discovery = discover_columns(source, plan, &filter)?;
        let titles = discovery.titles.into_vec();
        let stats = emit_rows(
            source,
            plan,
            &filter,
            &titles,
            self.config.extra_answer_keys(),
            sink,
        )?;

        let mut report = FlattenReport::new(plan, titles);
        report.rows_read = stats.rows_read;
        report.rows_kept = stats.rows_kept;
        report.rows_written = Some(stats.rows_written);
        report.rows_without_payload = stats.rows_without_payload;
        Ok(report)
    }
}
