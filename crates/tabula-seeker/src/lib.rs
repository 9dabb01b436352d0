//! Seeker - search, filter and sort engine for table rows.
//!
//! Seeker evaluates the row-level half of a data table: which records are
//! visible and in what order. It knows nothing about pages, URLs or
//! rendering; those live in `tabula-view`.
//!
//! It supports:
//!
//! - Free-text search across a list of fields (slug-normalized substring)
//! - Exact dropdown filters (slug-normalized equality)
//! - Inclusive date ranges over a `createdAt`-shaped field
//! - Single-column ordering with nulls always last
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tabula_seeker::{Query, Record, Row};
//!
//! let rows: Vec<Row> = vec![
//!     json!({"name": "Bob", "role": "admin"}),
//!     json!({"name": "Ann", "role": "admin"}),
//!     json!({"name": "Cid", "role": "editor"}),
//! ]
//! .into_iter()
//! .filter_map(|v| v.as_object().cloned())
//! .collect();
//!
//! let query = Query::new()
//!     .filter_eq("role", "admin")
//!     .order_asc("name")
//!     .build();
//!
//! let names: Vec<_> = query
//!     .filter(&rows, Row::accessor)
//!     .into_iter()
//!     .map(|row| row["name"].as_str().unwrap_or_default())
//!     .collect();
//! assert_eq!(names, vec!["Ann", "Bob"]);
//! ```
//!
//! # Query Semantics
//!
//! ```text
//! visible = search(fields, term) ∧ (∀ filter: slug(value) = slug(selected)) ∧ date ∈ range
//! order   = stable sort of `visible`, nulls last in both directions
//! ```
//!
//! Empty inputs are trivially satisfied: a blank search term, an empty filter
//! value, or an unbounded date range never removes rows.

mod clause;
mod date;
mod error;
mod ordering;
mod query;
mod slug;
mod traits;
mod value;

pub use clause::Clause;
pub use date::{parse_date, value_date, DateRange};
pub use error::{Result, SeekerError};
pub use ordering::{collate, compare_values, cycle_sort, Dir, OrderBy};
pub use query::Query;
pub use slug::{fold, slugify};
pub use traits::{Record, Row};
pub use value::{Number, Timestamp, Value};
