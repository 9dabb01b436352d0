//! Table definitions loaded from YAML or JSON.
//!
//! ```yaml
//! columns:
//!   - { label: Name, field: name }
//!   - { label: Joined, field: createdAt }
//! searchFields: [name, email]
//! filters:
//!   - { label: Role, filterField: role }
//! export: [name, { field: email, header: E-mail }]
//! rowsPerPageOptions: [10, 20, 50, 100]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tabula_seeker::Record;

use crate::column::Column;
use crate::error::{Result, ViewError};
use crate::export::ExportField;
use crate::panel::FilterConfig;
use crate::state::RowsPerPage;
use crate::table::{DataTableBuilder, DEFAULT_DATE_FIELD};

/// A field column as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub label: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ColumnConfig {
    pub fn to_column<T>(&self) -> Column<T> {
        let mut column = Column::field(self.label.as_str(), self.field.as_str());
        if let Some(sorting_key) = &self.sorting_key {
            column = column.sorting_key(sorting_key.as_str());
        }
        if let Some(key) = &self.key {
            column = column.key(key.as_str());
        }
        column
    }
}

/// A complete table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    #[serde(default)]
    pub search_fields: Vec<String>,
    #[serde(default)]
    pub export: Vec<ExportField>,
    #[serde(default = "default_rows_per_page_options")]
    pub rows_per_page_options: Vec<usize>,
    /// Defaults to the first option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rows_per_page: Option<usize>,
    #[serde(default = "default_date_field")]
    pub date_field: String,
}

fn default_rows_per_page_options() -> Vec<usize> {
    RowsPerPage::DEFAULT_OPTIONS.to_vec()
}

fn default_date_field() -> String {
    DEFAULT_DATE_FIELD.to_string()
}

impl TableConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| ViewError::Config(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ViewError::Config(e.to_string()))
    }

    /// Loads a config file; `.json` files are read as JSON, anything else
    /// as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        log::debug!("loading table config from {}", path.display());
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// The validated page-size options.
    pub fn rows_per_page(&self) -> Result<RowsPerPage> {
        let default = self
            .default_rows_per_page
            .or_else(|| self.rows_per_page_options.first().copied())
            .ok_or(ViewError::EmptyRowsPerPageOptions)?;
        RowsPerPage::new(self.rows_per_page_options.clone(), default)
    }

    /// A table builder carrying everything in this config.
    ///
    /// Filter field validation happens in [`DataTableBuilder::build`].
    pub fn builder<T: Record>(&self) -> Result<DataTableBuilder<T>> {
        Ok(
            DataTableBuilder::new(self.columns.iter().map(ColumnConfig::to_column).collect())
                .search_fields(self.search_fields.iter().cloned())
                .filters(self.filters.clone())
                .date_field(self.date_field.as_str())
                .export_fields(self.export.clone())
                .rows_per_page(self.rows_per_page()?),
        )
    }
}
