//! Tabula View - sortable, filterable, paginated table views.
//!
//! This crate turns a row collection into pages of text cells and keeps the
//! view state in step with URL query parameters, so a view can be shared,
//! bookmarked and restored after a reload. Row matching and ordering come
//! from [`tabula_seeker`]; this crate adds everything around them.
//!
//! - [`Column`]: header label plus a field or computed accessor
//! - [`DataTable`]: owns rows, state and the filter panel; renders [`Page`]s
//! - [`FilterPanel`]: draft dropdown and date choices with commit/discard
//! - [`state_to_params`] / [`params_to_state`]: the URL binding
//! - [`export_rows`]: CSV and XLSX output of the filtered rows
//! - [`TableConfig`]: YAML/JSON table definitions
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tabula_view::{Column, DataTable, QueryParams};
//! use tabula_seeker::Row;
//!
//! let rows: Vec<Row> = (1..=25)
//!     .filter_map(|i| json!({"name": format!("user{i}")}).as_object().cloned())
//!     .collect();
//!
//! let mut table = DataTable::builder(vec![Column::field("Name", "name")])
//!     .rows(rows)
//!     .search_fields(["name"])
//!     .params(QueryParams::parse("?page=2"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.page().showing(), "Showing 11-20 of 25");
//!
//! table.set_rows_per_page(20).unwrap();
//! assert_eq!(table.params().to_string(), "?rows=20");
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod export;
pub mod notice;
pub mod page;
pub mod pager;
pub mod panel;
pub mod params;
pub mod state;
pub mod table;

pub use column::{Accessor, Column, ComputeFn};
pub use config::{ColumnConfig, TableConfig};
pub use error::{Result, ViewError};
pub use export::{export_rows, ExportError, ExportField, ExportFile, ExportFormat, ExportOutcome};
pub use notice::{Notice, NoticeLevel};
pub use page::{describe_filters, Header, Page};
pub use pager::{clamp_page, page_range, total_pages, PageInfo};
pub use panel::{FilterConfig, FilterOption, FilterPanel, FilterSelection};
pub use params::{params_to_state, state_to_params, QueryParams, ViewDefaults, RESERVED_PARAMS};
pub use state::{RowsPerPage, ViewState};
pub use table::{DataTable, DataTableBuilder, Listener, DEFAULT_DATE_FIELD};
