//! The filter panel.
//!
//! The panel edits a draft [`FilterSelection`] while the table keeps showing
//! the applied one. Nothing the user picks takes effect until
//! [`FilterPanel::commit`]; [`FilterPanel::discard`] throws the draft away.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabula_seeker::{slugify, DateRange, Record};

use crate::error::{Result, ViewError};

/// One choice in a filter dropdown.
///
/// In config files an option may be written either as a bare string (used
/// as both label and value) or as `{label, value}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OptionSpec")]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }

    /// The normalized form used in state and the URL.
    pub fn slug(&self) -> String {
        slugify(&self.value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OptionSpec {
    Plain(String),
    Labeled { label: String, value: String },
}

impl From<OptionSpec> for FilterOption {
    fn from(spec: OptionSpec) -> Self {
        match spec {
            OptionSpec::Plain(value) => FilterOption::new(value.clone(), value),
            OptionSpec::Labeled { label, value } => FilterOption::new(label, value),
        }
    }
}

/// A dropdown filter over one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub label: String,
    pub filter_field: String,
    /// Fixed options. When absent they are derived from the rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FilterOption>>,
}

impl FilterConfig {
    pub fn new(label: impl Into<String>, filter_field: impl Into<String>) -> Self {
        FilterConfig {
            label: label.into(),
            filter_field: filter_field.into(),
            options: None,
        }
    }

    pub fn options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = FilterOption>,
    {
        self.options = Some(options.into_iter().collect());
        self
    }

    /// The options offered for this filter.
    ///
    /// Configured options are returned as-is. Otherwise every distinct value
    /// of the field across `rows` becomes an option, in first-seen order,
    /// deduplicated by slug, with empty values dropped.
    pub fn resolve_options<T: Record>(&self, rows: &[T]) -> Vec<FilterOption> {
        if let Some(options) = &self.options {
            return options.clone();
        }

        let mut seen = std::collections::HashSet::new();
        let mut options = Vec::new();
        for row in rows {
            let text = row.field(&self.filter_field).to_text().into_owned();
            let slug = slugify(&text);
            if slug.is_empty() || !seen.insert(slug) {
                continue;
            }
            options.push(FilterOption::new(text.clone(), text));
        }
        options
    }

    /// Label of the option whose slug is `slug`, if it is one of `options`.
    pub fn label_for<'a>(options: &'a [FilterOption], slug: &str) -> Option<&'a str> {
        options
            .iter()
            .find(|o| o.slug() == slug)
            .map(|o| o.label.as_str())
    }
}

/// A complete set of filter choices: dropdown values plus date bounds.
///
/// Values are stored as slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub values: BTreeMap<String, String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterSelection {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.start_date.is_none() && self.end_date.is_none()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

/// Draft-and-commit editor for the table's filters.
#[derive(Debug, Clone, Default)]
pub struct FilterPanel {
    configs: Vec<FilterConfig>,
    draft: FilterSelection,
    open: bool,
}

impl FilterPanel {
    pub fn new(configs: Vec<FilterConfig>) -> Self {
        FilterPanel {
            configs,
            draft: FilterSelection::default(),
            open: false,
        }
    }

    pub fn configs(&self) -> &[FilterConfig] {
        &self.configs
    }

    pub fn config(&self, field: &str) -> Option<&FilterConfig> {
        self.configs.iter().find(|c| c.filter_field == field)
    }

    pub fn draft(&self) -> &FilterSelection {
        &self.draft
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the panel with the draft seeded from the applied selection.
    pub fn open(&mut self, applied: &FilterSelection) {
        self.draft = applied.clone();
        self.open = true;
    }

    /// Opens a closed panel, or discards and closes an open one.
    pub fn toggle(&mut self, applied: &FilterSelection) {
        if self.open {
            self.discard(applied);
        } else {
            self.open(applied);
        }
    }

    /// Picks a dropdown value in the draft. An empty value clears the field.
    pub fn select(&mut self, field: &str, value: &str) -> Result<()> {
        if self.config(field).is_none() {
            return Err(ViewError::UnknownFilterField(field.to_string()));
        }
        let slug = slugify(value);
        if slug.is_empty() {
            self.draft.values.remove(field);
        } else {
            self.draft.values.insert(field.to_string(), slug);
        }
        Ok(())
    }

    /// Sets the draft date bounds. An inverted range is rejected and the
    /// draft is left unchanged.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
        let range = DateRange::new(start, end)?;
        self.draft.start_date = range.start;
        self.draft.end_date = range.end;
        Ok(())
    }

    /// Returns `true` when the draft differs from `applied`.
    pub fn is_dirty(&self, applied: &FilterSelection) -> bool {
        self.draft != *applied
    }

    /// Closes the panel and hands back the draft to be applied.
    pub fn commit(&mut self) -> FilterSelection {
        self.open = false;
        self.draft.clone()
    }

    /// Closes the panel, resetting the draft to `applied`.
    pub fn discard(&mut self, applied: &FilterSelection) {
        self.draft = applied.clone();
        self.open = false;
    }

    /// Empties the draft, dates included.
    pub fn clear(&mut self) {
        self.draft = FilterSelection::default();
    }
}
