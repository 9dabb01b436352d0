//! URL query-string binding.
//!
//! The view state is mirrored to the query string as a pure pair of
//! functions: [`state_to_params`] and [`params_to_state`]. Parsing is
//! forgiving; a malformed value is logged and replaced by its default so a
//! hand-edited URL never breaks the view.
//!
//! | param       | state field             | default   |
//! |-------------|-------------------------|-----------|
//! | `search`    | `search_term`           | empty     |
//! | `page`      | `current_page`          | 1         |
//! | `rows`      | `rows_per_page`         | first option |
//! | `startDate` | `start_date`            | none      |
//! | `endDate`   | `end_date`              | none      |
//! | *filter*    | `applied_filters[field]`| none      |
//!
//! Defaults are omitted when serializing. Sort order is not part of the URL.

use std::fmt;

use tabula_seeker::{slugify, DateRange};
use url::form_urlencoded;

use crate::state::{RowsPerPage, ViewState};

pub const SEARCH: &str = "search";
pub const PAGE: &str = "page";
pub const ROWS: &str = "rows";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";

/// Parameter names owned by the table itself. Filter fields may not use them.
pub const RESERVED_PARAMS: [&str; 5] = [SEARCH, PAGE, ROWS, START_DATE, END_DATE];

/// An ordered list of query-string pairs.
///
/// Order is preserved and keys may repeat; [`get`](Self::get) returns the
/// first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        QueryParams::default()
    }

    /// Parses a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        QueryParams {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, replacing every existing occurrence.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.remove(&key);
        self.pairs.push((key, value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Appends every pair of `other` whose key `owned` rejects.
    ///
    /// Used to carry parameters that belong to someone else (a tab selector,
    /// a tracking id) through a re-serialization of the table's own state.
    pub fn retain_foreign<F>(&mut self, other: &QueryParams, owned: F)
    where
        F: Fn(&str) -> bool,
    {
        for (k, v) in other.iter() {
            if !owned(k) && !self.contains(k) {
                self.pairs.push((k.to_string(), v.to_string()));
            }
        }
    }

    /// Compares two parameter lists ignoring pair order.
    pub fn equivalent(&self, other: &QueryParams) -> bool {
        let mut a: Vec<_> = self.iter().collect();
        let mut b: Vec<_> = other.iter().collect();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }

    /// Encodes the pairs without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs.is_empty() {
            Ok(())
        } else {
            write!(f, "?{}", self.to_query_string())
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What a parameter falls back to when it is absent or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewDefaults {
    pub rows_per_page: RowsPerPage,
    /// Configured filter fields; each one maps to a parameter of that name.
    pub filter_fields: Vec<String>,
}

impl ViewDefaults {
    pub fn new(rows_per_page: RowsPerPage, filter_fields: Vec<String>) -> Self {
        ViewDefaults {
            rows_per_page,
            filter_fields,
        }
    }

    /// A fresh state with every field at its default.
    pub fn initial_state(&self) -> ViewState {
        ViewState::new(self.rows_per_page.default_size())
    }

    /// Returns `true` for parameters the table reads and writes.
    pub fn owns(&self, key: &str) -> bool {
        RESERVED_PARAMS.contains(&key) || self.filter_fields.iter().any(|f| f == key)
    }
}

/// Serializes `state`, omitting every value equal to its default.
pub fn state_to_params(state: &ViewState, defaults: &ViewDefaults) -> QueryParams {
    let mut params = QueryParams::new();

    if !state.search_term.trim().is_empty() {
        params.set(SEARCH, state.search_term.as_str());
    }
    if state.current_page > 1 {
        params.set(PAGE, state.current_page.to_string());
    }
    if state.rows_per_page != defaults.rows_per_page.default_size() {
        params.set(ROWS, state.rows_per_page.to_string());
    }
    if let Some(start) = state.start_date {
        params.set(START_DATE, start.format("%Y-%m-%d").to_string());
    }
    if let Some(end) = state.end_date {
        params.set(END_DATE, end.format("%Y-%m-%d").to_string());
    }
    for (field, value) in &state.applied_filters {
        let slug = slugify(value);
        if !slug.is_empty() {
            params.set(field.as_str(), slug);
        }
    }

    params
}

/// Rebuilds a state from `params`.
///
/// Never fails: unknown parameters are ignored, malformed ones fall back to
/// their default with a warning. The page is not clamped here since the row
/// count is unknown; the table clamps it on load.
pub fn params_to_state(params: &QueryParams, defaults: &ViewDefaults) -> ViewState {
    let mut state = defaults.initial_state();

    if let Some(search) = params.get(SEARCH) {
        if !search.trim().is_empty() {
            state.search_term = search.to_string();
        }
    }

    if let Some(raw) = params.get(PAGE).filter(|s| !s.is_empty()) {
        match raw.trim().parse::<usize>() {
            Ok(page) if page >= 1 => state.current_page = page,
            _ => log::warn!("ignoring malformed page parameter '{}'", raw),
        }
    }

    if let Some(raw) = params.get(ROWS).filter(|s| !s.is_empty()) {
        match raw.trim().parse::<usize>() {
            Ok(rows) if defaults.rows_per_page.offers(rows) => state.rows_per_page = rows,
            _ => log::warn!(
                "rows parameter '{}' is not one of {:?}, using {}",
                raw,
                defaults.rows_per_page.options(),
                defaults.rows_per_page.default_size()
            ),
        }
    }

    let start = date_param(params, START_DATE);
    let end = date_param(params, END_DATE);
    match DateRange::new(start, end) {
        Ok(range) => {
            state.start_date = range.start;
            state.end_date = range.end;
        }
        Err(err) => log::warn!("dropping date range from URL: {}", err),
    }

    for field in &defaults.filter_fields {
        if let Some(value) = params.get(field) {
            let slug = slugify(value);
            if !slug.is_empty() {
                state.applied_filters.insert(field.clone(), slug);
            }
        }
    }

    state
}

fn date_param(params: &QueryParams, key: &str) -> Option<chrono::NaiveDate> {
    let raw = params.get(key).filter(|s| !s.trim().is_empty())?;
    match DateRange::parse_bound(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            log::warn!("ignoring {} parameter: {}", key, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn defaults() -> ViewDefaults {
        ViewDefaults::new(RowsPerPage::default(), vec!["role".into(), "status".into()])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_strips_question_mark_and_decodes() {
        let params = QueryParams::parse("?search=john+doe&page=2&x=%C3%A9");
        assert_eq!(params.get("search"), Some("john doe"));
        assert_eq!(params.get("page"), Some("2"));
        assert_eq!(params.get("x"), Some("é"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn set_replaces_all_occurrences() {
        let mut params = QueryParams::parse("a=1&a=2&b=3");
        params.set("a", "9");
        assert_eq!(params.to_query_string(), "b=3&a=9");
    }

    #[test]
    fn equivalence_ignores_order() {
        let a = QueryParams::parse("rows=20&search=x");
        let b = QueryParams::parse("search=x&rows=20");
        assert!(a.equivalent(&b));
        assert_ne!(a, b);
        assert!(!a.equivalent(&QueryParams::parse("search=x")));
    }

    #[test]
    fn display_adds_question_mark_only_when_non_empty() {
        assert_eq!(QueryParams::new().to_string(), "");
        let params: QueryParams = [("page", "2")].into_iter().collect();
        assert_eq!(params.to_string(), "?page=2");
    }

    #[test]
    fn restores_search_page_and_rows() {
        let params = QueryParams::parse("?search=john&page=2&rows=20");
        let state = params_to_state(&params, &defaults());
        assert_eq!(state.search_term, "john");
        assert_eq!(state.current_page, 2);
        assert_eq!(state.rows_per_page, 20);
    }

    #[test]
    fn defaults_are_omitted() {
        let state = defaults().initial_state();
        assert!(state_to_params(&state, &defaults()).is_empty());
    }

    #[test]
    fn full_state_serializes_in_fixed_order() {
        let mut state = defaults().initial_state();
        state.search_term = "ann".into();
        state.current_page = 3;
        state.rows_per_page = 50;
        state.start_date = Some(date(2024, 1, 1));
        state.end_date = Some(date(2024, 1, 31));
        state.applied_filters.insert("role".into(), "admin".into());

        let params = state_to_params(&state, &defaults());
        assert_eq!(
            params.to_query_string(),
            "search=ann&page=3&rows=50&startDate=2024-01-01&endDate=2024-01-31&role=admin"
        );
        assert_eq!(params_to_state(&params, &defaults()), state);
    }

    #[test]
    fn malformed_page_falls_back_to_one() {
        for raw in ["page=abc", "page=0", "page=-3", "page="] {
            let state = params_to_state(&QueryParams::parse(raw), &defaults());
            assert_eq!(state.current_page, 1, "{raw}");
        }
    }

    #[test]
    fn unoffered_rows_fall_back_to_default() {
        let state = params_to_state(&QueryParams::parse("rows=7"), &defaults());
        assert_eq!(state.rows_per_page, 10);
    }

    #[test]
    fn bad_dates_are_dropped_individually() {
        let state = params_to_state(
            &QueryParams::parse("startDate=2024-13-01&endDate=2024-02-01"),
            &defaults(),
        );
        assert_eq!(state.start_date, None);
        assert_eq!(state.end_date, Some(date(2024, 2, 1)));
    }

    #[test]
    fn inverted_range_is_dropped() {
        let state = params_to_state(
            &QueryParams::parse("startDate=2024-03-01&endDate=2024-02-01"),
            &defaults(),
        );
        assert_eq!(state.start_date, None);
        assert_eq!(state.end_date, None);
    }

    #[test]
    fn filter_values_are_slugified_and_unknown_fields_ignored() {
        let state = params_to_state(
            &QueryParams::parse("role=Super%20Admin&status=&team=red"),
            &defaults(),
        );
        assert_eq!(
            state.applied_filters.get("role").map(String::as_str),
            Some("super-admin")
        );
        assert!(!state.applied_filters.contains_key("status"));
        assert!(!state.applied_filters.contains_key("team"));
    }

    #[test]
    fn ownership_and_foreign_params() {
        let defaults = defaults();
        assert!(defaults.owns("page"));
        assert!(defaults.owns("role"));
        assert!(!defaults.owns("tab"));

        let incoming = QueryParams::parse("tab=users&page=4");
        let mut out = QueryParams::parse("page=2");
        out.retain_foreign(&incoming, |k| defaults.owns(k));
        assert_eq!(out.to_query_string(), "page=2&tab=users");
    }
}
