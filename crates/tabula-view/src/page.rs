//! The rendered page of a table view.
//!
//! A [`Page`] is the table's output: header cells, the visible slice of
//! rows already turned into text, pagination metadata, and the counts and
//! filter summary needed for a "showing X of Y" line. It is plain data and
//! serializes to JSON for front ends that do their own drawing.

use serde::Serialize;

use crate::notice::Notice;
use crate::pager::PageInfo;
use crate::panel::{FilterConfig, FilterOption};
use crate::state::ViewState;

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub label: String,
    /// Stable column id, used to toggle sorting.
    pub id: String,
    pub sortable: bool,
    /// `"asc"` or `"desc"` when this column is the active sort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<&'static str>,
}

/// One page of a table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub headers: Vec<Header>,

    /// Visible rows, one string per column.
    pub rows: Vec<Vec<String>>,

    pub info: PageInfo,

    /// Row count before search and filters.
    pub unfiltered_count: usize,

    /// Applied filters summary (for "filtered by: ...").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_summary: Option<String>,

    /// The normalized query string for this view, without `?`.
    pub query: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl Page {
    /// Returns true if no rows are visible.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Row count after search and filters.
    pub fn total_count(&self) -> usize {
        self.info.total_rows
    }

    /// A "Showing 1-10 of 25" line, noting the unfiltered total when it
    /// differs.
    pub fn showing(&self) -> String {
        let mut line = if self.info.total_rows == 0 {
            "No matching rows".to_string()
        } else {
            format!(
                "Showing {}-{} of {}",
                self.info.first_row, self.info.last_row, self.info.total_rows
            )
        };
        if self.unfiltered_count != self.info.total_rows {
            line.push_str(&format!(" (filtered from {})", self.unfiltered_count));
        }
        line
    }

    /// Cells of column `index` in display order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(index).map(String::as_str))
    }
}

/// Describes the active search, filters and date bounds in one line.
///
/// `options` holds the resolved options of each entry in `configs`, in the
/// same order; option labels are shown in place of slugs when found.
/// Returns `None` when nothing narrows the view.
pub fn describe_filters(
    state: &ViewState,
    configs: &[FilterConfig],
    options: &[Vec<FilterOption>],
) -> Option<String> {
    let mut parts = Vec::new();

    let search = state.search_term.trim();
    if !search.is_empty() {
        parts.push(format!("search \"{}\"", search));
    }

    for (i, config) in configs.iter().enumerate() {
        let Some(slug) = state.applied_filters.get(&config.filter_field) else {
            continue;
        };
        let shown = options
            .get(i)
            .and_then(|opts| FilterConfig::label_for(opts, slug))
            .unwrap_or(slug.as_str());
        parts.push(format!("{}: {}", config.label, shown));
    }

    match (state.start_date, state.end_date) {
        (Some(start), Some(end)) => parts.push(format!("dates {} to {}", start, end)),
        (Some(start), None) => parts.push(format!("dates from {}", start)),
        (None, Some(end)) => parts.push(format!("dates until {}", end)),
        (None, None) => {}
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
