//! View state and its defaults.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabula_seeker::{DateRange, OrderBy};

use crate::error::{Result, ViewError};

/// Everything the user has chosen about the current view.
///
/// `applied_filters` maps filter field to slug; a field is absent rather
/// than mapped to an empty string. `current_page` is 1-based and kept in
/// range by the owning table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub current_page: usize,
    pub rows_per_page: usize,
    pub applied_filters: BTreeMap<String, String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort: Option<OrderBy>,
}

impl ViewState {
    /// A fresh state: no search, first page, default page size.
    pub fn new(rows_per_page: usize) -> Self {
        ViewState {
            search_term: String::new(),
            current_page: 1,
            rows_per_page,
            applied_filters: BTreeMap::new(),
            start_date: None,
            end_date: None,
            sort: None,
        }
    }

    /// The applied date bounds as a range.
    ///
    /// States are only ever built from validated bounds, so an inverted pair
    /// cannot occur; should one be constructed by hand it is treated as
    /// unbounded.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date).unwrap_or_default()
    }

    /// Returns `true` when any search, filter or date bound is active.
    pub fn is_filtered(&self) -> bool {
        !self.search_term.trim().is_empty()
            || !self.applied_filters.is_empty()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }
}

/// The fixed set of page sizes a table offers.
///
/// Deserializing goes through [`RowsPerPage::new`], so an invalid set is
/// rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRowsPerPage")]
pub struct RowsPerPage {
    options: Vec<usize>,
    default: usize,
}

#[derive(Deserialize)]
struct RawRowsPerPage {
    options: Vec<usize>,
    default: usize,
}

impl TryFrom<RawRowsPerPage> for RowsPerPage {
    type Error = ViewError;

    fn try_from(raw: RawRowsPerPage) -> Result<Self> {
        RowsPerPage::new(raw.options, raw.default)
    }
}

impl RowsPerPage {
    /// Offered when a table is not configured otherwise.
    pub const DEFAULT_OPTIONS: [usize; 4] = [10, 20, 50, 100];

    /// Validates and builds an option set.
    pub fn new(options: Vec<usize>, default: usize) -> Result<Self> {
        if options.is_empty() || options.contains(&0) {
            return Err(ViewError::EmptyRowsPerPageOptions);
        }
        if !options.contains(&default) {
            return Err(ViewError::InvalidRowsPerPage {
                value: default,
                options,
            });
        }
        Ok(RowsPerPage { options, default })
    }

    pub fn options(&self) -> &[usize] {
        &self.options
    }

    pub fn default_size(&self) -> usize {
        self.default
    }

    /// Returns `true` if `value` is one of the offered sizes.
    pub fn offers(&self, value: usize) -> bool {
        self.options.contains(&value)
    }

    /// Checks a requested size against the offered ones.
    pub fn check(&self, value: usize) -> Result<usize> {
        if self.offers(value) {
            Ok(value)
        } else {
            Err(ViewError::InvalidRowsPerPage {
                value,
                options: self.options.clone(),
            })
        }
    }
}

impl Default for RowsPerPage {
    fn default() -> Self {
        RowsPerPage {
            options: Self::DEFAULT_OPTIONS.to_vec(),
            default: Self::DEFAULT_OPTIONS[0],
        }
    }
}
