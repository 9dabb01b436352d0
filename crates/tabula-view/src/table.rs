//! The data table view.
//!
//! [`DataTable`] owns the rows, the columns, the filter panel and the view
//! state. Every mutating call follows the same path: change the state, clamp
//! the page against the new filtered count, then push the resulting query
//! parameters to the single subscriber if they changed.
//!
//! ```text
//! rows ─► filter (search, dropdowns, dates) ─► sort ─► page slice ─► Page
//!                         ▲                      ▲          ▲
//!                      ViewState ◄──────────── URL params ──┘
//! ```

use tabula_seeker::{cycle_sort, OrderBy, Query, Record};

use crate::column::Column;
use crate::error::{Result, ViewError};
use crate::export::{export_rows, ExportError, ExportField, ExportFormat, ExportOutcome};
use crate::page::{describe_filters, Header, Page};
use crate::pager::{clamp_page, page_range, PageInfo};
use crate::panel::{FilterConfig, FilterOption, FilterPanel, FilterSelection};
use crate::params::{params_to_state, state_to_params, QueryParams, ViewDefaults, RESERVED_PARAMS};
use crate::state::{RowsPerPage, ViewState};

/// Field the date range applies to unless configured otherwise.
pub const DEFAULT_DATE_FIELD: &str = "createdAt";

/// Receives the table's query parameters whenever they change.
pub type Listener = Box<dyn FnMut(&QueryParams) + Send>;

/// A sortable, filterable, paginated view over a row collection.
pub struct DataTable<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    search_fields: Vec<String>,
    date_field: String,
    export_fields: Vec<ExportField>,
    defaults: ViewDefaults,
    panel: FilterPanel,
    state: ViewState,
    /// Id of the column whose header set the current sort.
    sorted_column: Option<String>,
    /// Last parameter list seen by the URL, raw or emitted.
    url: QueryParams,
    listener: Option<Listener>,
}

impl<T> std::fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.rows.len())
            .field(
                "columns",
                &self.columns.iter().map(Column::id).collect::<Vec<_>>(),
            )
            .field("state", &self.state)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DataTable`].
pub struct DataTableBuilder<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    search_fields: Vec<String>,
    filters: Vec<FilterConfig>,
    date_field: String,
    export_fields: Vec<ExportField>,
    rows_per_page: RowsPerPage,
    params: QueryParams,
}

impl<T: Record> DataTableBuilder<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        DataTableBuilder {
            rows: Vec::new(),
            columns,
            search_fields: Vec::new(),
            filters: Vec::new(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            export_fields: Vec::new(),
            rows_per_page: RowsPerPage::default(),
            params: QueryParams::new(),
        }
    }

    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    /// Fields the free-text search looks in.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, config: FilterConfig) -> Self {
        self.filters.push(config);
        self
    }

    pub fn filters(mut self, configs: Vec<FilterConfig>) -> Self {
        self.filters = configs;
        self
    }

    pub fn date_field(mut self, field: impl Into<String>) -> Self {
        self.date_field = field.into();
        self
    }

    pub fn export_fields(mut self, fields: Vec<ExportField>) -> Self {
        self.export_fields = fields;
        self
    }

    pub fn rows_per_page(mut self, rows_per_page: RowsPerPage) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    /// Seeds the view from the URL the table is mounted at.
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Validates the configuration and builds the table.
    pub fn build(self) -> Result<DataTable<T>> {
        let mut seen = Vec::new();
        for config in &self.filters {
            let field = config.filter_field.as_str();
            if RESERVED_PARAMS.contains(&field) {
                return Err(ViewError::ReservedFilterField(field.to_string()));
            }
            if seen.contains(&field) {
                return Err(ViewError::DuplicateFilterField(field.to_string()));
            }
            seen.push(field);
        }

        let filter_fields = self
            .filters
            .iter()
            .map(|c| c.filter_field.clone())
            .collect();
        let defaults = ViewDefaults::new(self.rows_per_page, filter_fields);
        let state = defaults.initial_state();

        let mut table = DataTable {
            rows: self.rows,
            columns: self.columns,
            search_fields: self.search_fields,
            date_field: self.date_field,
            export_fields: self.export_fields,
            defaults,
            panel: FilterPanel::new(self.filters),
            state,
            sorted_column: None,
            url: QueryParams::new(),
            listener: None,
        };
        table.sync_from_params(&self.params);
        Ok(table)
    }
}

impl<T: Record> DataTable<T> {
    pub fn builder(columns: Vec<Column<T>>) -> DataTableBuilder<T> {
        DataTableBuilder::new(columns)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn defaults(&self) -> &ViewDefaults {
        &self.defaults
    }

    pub fn export_fields(&self) -> &[ExportField] {
        &self.export_fields
    }

    pub fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    /// The panel, for editing the draft selection.
    pub fn panel_mut(&mut self) -> &mut FilterPanel {
        &mut self.panel
    }

    /// The applied filters and dates as a panel selection.
    pub fn applied_selection(&self) -> FilterSelection {
        FilterSelection {
            values: self.state.applied_filters.clone(),
            start_date: self.state.start_date,
            end_date: self.state.end_date,
        }
    }

    /// The query parameters for the current state, foreign parameters
    /// from the mount URL included.
    pub fn params(&self) -> QueryParams {
        let mut params = state_to_params(&self.state, &self.defaults);
        params.retain_foreign(&self.url, |key| self.defaults.owns(key));
        params
    }

    // ========================================================================
    // URL synchronization
    // ========================================================================

    /// Registers the single URL subscriber, replacing any previous one.
    ///
    /// If the state already differs from the URL the table was loaded from
    /// (a clamped page, a dropped malformed value) the listener is called
    /// right away with the corrected parameters.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&QueryParams) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self.emit();
    }

    pub fn unsubscribe(&mut self) {
        self.listener = None;
    }

    /// Re-seeds the state from an externally changed URL.
    ///
    /// The current sort is kept, since it is not part of the URL. The filter
    /// draft is reset to the new applied filters. The subscriber is called
    /// only when normalization changed the parameters.
    pub fn sync_from_params(&mut self, params: &QueryParams) {
        let sort = self.state.sort.take();
        self.state = params_to_state(params, &self.defaults);
        self.state.sort = sort;
        self.url = params.clone();
        let applied = self.applied_selection();
        self.panel.discard(&applied);
        log::debug!("view state loaded from '{}'", params);
        self.settle();
    }

    /// Clamps the page, then notifies the subscriber if the URL is stale.
    fn settle(&mut self) {
        let total = self.filtered_count();
        self.state.current_page =
            clamp_page(self.state.current_page, total, self.state.rows_per_page);
        self.emit();
    }

    fn emit(&mut self) {
        let params = self.params();
        if params.equivalent(&self.url) {
            return;
        }
        if let Some(listener) = self.listener.as_mut() {
            log::debug!("url sync: '{}' -> '{}'", self.url, params);
            listener(&params);
            self.url = params;
        }
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    /// Sets the free-text search and returns to the first page.
    pub fn set_search(&mut self, term: &str) {
        self.state.search_term = term.to_string();
        self.state.current_page = 1;
        self.settle();
    }

    /// Advances the sort cycle of the column with id `column`.
    ///
    /// Returns the new ordering, `None` meaning unsorted.
    pub fn toggle_sort(&mut self, column: &str) -> Result<Option<&OrderBy>> {
        let col = self
            .columns
            .iter()
            .find(|c| c.id() == column)
            .ok_or_else(|| ViewError::UnknownColumn(column.to_string()))?;
        let field = col
            .sort_field()
            .ok_or_else(|| ViewError::UnsortableColumn(column.to_string()))?;
        // Columns sharing a sort field still cycle independently.
        let current = self
            .state
            .sort
            .as_ref()
            .filter(|_| self.sorted_column.as_deref() == Some(column));
        let next = cycle_sort(current, field);
        self.sorted_column = next.as_ref().map(|_| column.to_string());
        self.state.sort = next;
        log::debug!("sort on '{}' is now {:?}", column, self.state.sort);
        self.settle();
        Ok(self.state.sort.as_ref())
    }

    /// Goes to `page`, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.state.current_page = page;
        self.settle();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.current_page.saturating_sub(1));
    }

    /// Changes the page size and returns to the first page.
    ///
    /// A size outside the offered options is rejected and nothing changes.
    pub fn set_rows_per_page(&mut self, rows: usize) -> Result<()> {
        self.state.rows_per_page = self.defaults.rows_per_page.check(rows)?;
        self.state.current_page = 1;
        self.settle();
        Ok(())
    }

    /// Opens the filter panel with the draft seeded from the applied filters.
    pub fn open_filters(&mut self) {
        let applied = self.applied_selection();
        self.panel.open(&applied);
    }

    /// Commits the panel draft and returns to the first page.
    pub fn apply_filters(&mut self) {
        let selection = self.panel.commit();
        log::debug!("applying filters {:?}", selection);
        self.state.applied_filters = selection.values;
        self.state.start_date = selection.start_date;
        self.state.end_date = selection.end_date;
        self.state.current_page = 1;
        self.settle();
    }

    /// Throws away the panel draft.
    pub fn discard_filter_edits(&mut self) {
        let applied = self.applied_selection();
        self.panel.discard(&applied);
    }

    /// Empties the draft and the applied filters, dates included.
    pub fn clear_filters(&mut self) {
        self.panel.clear();
        self.apply_filters();
    }

    /// Replaces the row collection, keeping the view state.
    pub fn replace_rows(&mut self, rows: Vec<T>) {
        log::debug!("replacing {} rows with {}", self.rows.len(), rows.len());
        self.rows = rows;
        self.settle();
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The query for the current state.
    pub fn query(&self) -> Query {
        let mut query = Query::new().search(self.search_fields.iter().cloned(), &self.state.search_term);
        for (field, slug) in &self.state.applied_filters {
            query = query.filter_eq(field, slug);
        }
        query
            .date_range(&self.date_field, self.state.date_range())
            .order_by(self.state.sort.clone())
            .build()
    }

    /// Rows passing search, filters and dates, in sort order.
    pub fn filtered(&self) -> Vec<&T> {
        self.query().filter(&self.rows, T::accessor)
    }

    pub fn filtered_count(&self) -> usize {
        self.query().count(&self.rows, T::accessor)
    }

    /// Options for each configured filter, in configuration order.
    pub fn filter_options(&self) -> Vec<(&FilterConfig, Vec<FilterOption>)> {
        self.panel
            .configs()
            .iter()
            .map(|config| (config, config.resolve_options(&self.rows)))
            .collect()
    }

    /// Renders the current page.
    pub fn page(&self) -> Page {
        let filtered = self.filtered();
        let total = filtered.len();
        let rows_per_page = self.state.rows_per_page;
        let page = self.state.current_page;

        let rows = filtered[page_range(page, total, rows_per_page)]
            .iter()
            .map(|row| self.columns.iter().map(|c| c.render(row)).collect())
            .collect();

        let headers = self
            .columns
            .iter()
            .map(|c| Header {
                label: c.label.clone(),
                id: c.id().to_string(),
                sortable: c.sort_field().is_some(),
                sort: self
                    .state
                    .sort
                    .as_ref()
                    .filter(|_| self.sorted_column.as_deref() == Some(c.id()))
                    .map(|o| o.dir.as_str()),
            })
            .collect();

        let options: Vec<Vec<FilterOption>> = self
            .filter_options()
            .into_iter()
            .map(|(_, options)| options)
            .collect();

        Page {
            headers,
            rows,
            info: PageInfo::new(page, total, rows_per_page),
            unfiltered_count: self.rows.len(),
            filter_summary: describe_filters(&self.state, self.panel.configs(), &options),
            query: self.params().to_query_string(),
            notices: Vec::new(),
        }
    }

    /// Exports the filtered, unpaginated rows with the configured fields.
    pub fn export(&self, format: ExportFormat) -> std::result::Result<ExportOutcome, ExportError> {
        export_rows(&self.filtered(), &self.export_fields, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tabula_seeker::{Dir, Row};

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .filter_map(|i| {
                json!({"name": format!("user{:02}", i), "role": if i % 2 == 0 { "admin" } else { "editor" }})
                    .as_object()
                    .cloned()
            })
            .collect()
    }

    fn table(n: usize) -> DataTable<Row> {
        DataTable::builder(vec![Column::field("Name", "name"), Column::field("Role", "role")])
            .rows(rows(n))
            .search_fields(["name"])
            .filter(FilterConfig::new("Role", "role"))
            .build()
            .unwrap()
    }

    fn recorder(table: &mut DataTable<Row>) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        table.subscribe(move |p| sink.lock().unwrap().push(p.to_query_string()));
        log
    }

    #[test]
    fn reserved_and_duplicate_filter_fields_are_rejected() {
        let reserved = DataTable::<Row>::builder(vec![])
            .filter(FilterConfig::new("Page", "page"))
            .build();
        assert!(matches!(reserved, Err(ViewError::ReservedFilterField(f)) if f == "page"));

        let dup = DataTable::<Row>::builder(vec![])
            .filter(FilterConfig::new("Role", "role"))
            .filter(FilterConfig::new("Role again", "role"))
            .build();
        assert!(matches!(dup, Err(ViewError::DuplicateFilterField(_))));
    }

    #[test]
    fn mount_url_page_is_clamped() {
        let table = DataTable::builder(vec![Column::<Row>::field("Name", "name")])
            .rows(rows(25))
            .params(QueryParams::parse("page=9"))
            .build()
            .unwrap();
        assert_eq!(table.state().current_page, 3);
    }

    #[test]
    fn subscribe_reports_stale_mount_url() {
        let mut table = DataTable::builder(vec![Column::<Row>::field("Name", "name")])
            .rows(rows(25))
            .params(QueryParams::parse("page=9&tab=users"))
            .build()
            .unwrap();
        let log = recorder(&mut table);
        assert_eq!(*log.lock().unwrap(), vec!["page=3&tab=users".to_string()]);
    }

    #[test]
    fn subscriber_only_sees_changes() {
        let mut t = table(25);
        let log = recorder(&mut t);
        assert!(log.lock().unwrap().is_empty());

        t.set_page(2);
        t.set_page(2);
        t.toggle_sort("name").unwrap();
        t.set_page(1);
        assert_eq!(*log.lock().unwrap(), vec!["page=2".to_string(), String::new()]);
    }

    #[test]
    fn rows_per_page_change_resets_page() {
        let mut t = table(95);
        t.set_page(4);
        t.set_rows_per_page(20).unwrap();
        assert_eq!(t.state().current_page, 1);
        assert_eq!(t.state().rows_per_page, 20);

        assert!(t.set_rows_per_page(15).is_err());
        assert_eq!(t.state().rows_per_page, 20);
    }

    #[test]
    fn page_navigation_clamps() {
        let mut t = table(25);
        t.prev_page();
        assert_eq!(t.state().current_page, 1);
        t.set_page(100);
        assert_eq!(t.state().current_page, 3);
        t.next_page();
        assert_eq!(t.state().current_page, 3);
        assert_eq!(t.page().len(), 5);
    }

    #[test]
    fn search_resets_page_and_narrows() {
        let mut t = table(25);
        t.set_page(3);
        t.set_search("user1");
        assert_eq!(t.state().current_page, 1);
        assert_eq!(t.filtered_count(), 10);
    }

    #[test]
    fn shrinking_rows_clamps_page() {
        let mut t = table(25);
        t.set_page(3);
        t.replace_rows(rows(5));
        assert_eq!(t.state().current_page, 1);
    }

    #[test]
    fn sort_cycles_and_marks_header() {
        let mut t = table(3);
        assert_eq!(t.toggle_sort("name").unwrap().map(|o| o.dir.as_str()), Some("asc"));
        assert_eq!(t.page().headers[0].sort, Some("asc"));
        assert_eq!(t.toggle_sort("name").unwrap().map(|o| o.dir.as_str()), Some("desc"));
        assert_eq!(t.page().rows[0][0], "user02");
        assert!(t.toggle_sort("name").unwrap().is_none());
        assert_eq!(t.page().headers[0].sort, None);

        assert!(matches!(t.toggle_sort("nope"), Err(ViewError::UnknownColumn(_))));
    }

    #[test]
    fn columns_sharing_a_sort_field_mark_only_the_clicked_header() {
        let mut t = DataTable::builder(vec![
            Column::<Row>::field("Name", "name"),
            Column::<Row>::compute("Shout", |r: &Row| r.field("name").to_text().to_uppercase())
                .sorting_key("name")
                .key("shout"),
        ])
        .rows(rows(3))
        .build()
        .unwrap();

        t.toggle_sort("shout").unwrap();
        let headers = t.page().headers;
        assert_eq!(headers[0].sort, None);
        assert_eq!(headers[1].sort, Some("asc"));

        // A different header restarts the cycle even on the same field.
        assert_eq!(t.toggle_sort("name").unwrap().map(|o| o.dir), Some(Dir::Asc));
        let headers = t.page().headers;
        assert_eq!(headers[0].sort, Some("asc"));
        assert_eq!(headers[1].sort, None);
    }

    #[test]
    fn mixed_number_and_string_column_sorts() {
        let data: Vec<Row> = (0..200)
            .filter_map(|i| {
                let code = if i % 3 == 0 { json!(i.to_string()) } else { json!(i) };
                json!({ "code": code }).as_object().cloned()
            })
            .collect();
        let mut t = DataTable::builder(vec![Column::<Row>::field("Code", "code")])
            .rows(data)
            .build()
            .unwrap();

        t.toggle_sort("code").unwrap();
        assert_eq!(t.page().rows[0][0], "1");
        t.toggle_sort("code").unwrap();
        assert_eq!(t.page().rows[0][0], "99");
        assert_eq!(t.filtered().len(), 200);
    }

    #[test]
    fn computed_column_without_key_is_unsortable() {
        let mut t = DataTable::builder(vec![Column::<Row>::compute("Shout", |r: &Row| {
            r.field("name").to_text().to_uppercase()
        })])
        .rows(rows(2))
        .build()
        .unwrap();
        assert!(matches!(t.toggle_sort("Shout"), Err(ViewError::UnsortableColumn(_))));
        assert!(!t.page().headers[0].sortable);
        assert_eq!(t.page().rows[1][0], "USER01");
    }

    #[test]
    fn filters_apply_through_the_panel() {
        let mut t = table(10);
        t.set_page(1);
        t.open_filters();
        t.panel_mut().select("role", "Editor").unwrap();
        assert_eq!(t.filtered_count(), 10, "draft must not filter");

        t.apply_filters();
        assert_eq!(t.filtered_count(), 5);
        assert_eq!(t.params().to_query_string(), "role=editor");
        assert_eq!(t.page().filter_summary.as_deref(), Some("Role: editor"));

        t.clear_filters();
        assert_eq!(t.filtered_count(), 10);
        assert!(t.panel().draft().is_empty());
        assert!(t.params().is_empty());
    }

    #[test]
    fn discard_keeps_applied_filters() {
        let mut t = table(10);
        t.open_filters();
        t.panel_mut().select("role", "admin").unwrap();
        t.apply_filters();
        t.open_filters();
        t.panel_mut().select("role", "editor").unwrap();
        t.discard_filter_edits();
        assert_eq!(t.panel().draft().get("role"), Some("admin"));
        assert_eq!(t.state().applied_filters.get("role").map(String::as_str), Some("admin"));
    }

    #[test]
    fn sync_from_params_reemits_only_when_normalized() {
        let mut t = table(25);
        let log = recorder(&mut t);

        // 13 admins fill two pages, so nothing needs correcting.
        t.sync_from_params(&QueryParams::parse("role=admin&page=2"));
        assert_eq!(t.state().current_page, 2);
        assert!(log.lock().unwrap().is_empty());

        t.sync_from_params(&QueryParams::parse("page=5&role=Admin"));
        assert_eq!(t.state().current_page, 2);
        assert_eq!(*log.lock().unwrap(), vec!["page=2&role=admin".to_string()]);
    }

    #[test]
    fn page_reports_counts() {
        let mut t = table(25);
        t.set_search("user0");
        let page = t.page();
        assert_eq!(page.total_count(), 10);
        assert_eq!(page.unfiltered_count, 25);
        assert_eq!(page.query, "search=user0");
        assert_eq!(page.filter_summary.as_deref(), Some("search \"user0\""));
    }

    #[test]
    fn export_uses_filtered_unpaginated_rows() {
        let mut t = DataTable::builder(vec![Column::<Row>::field("Name", "name")])
            .rows(rows(25))
            .export_fields(vec![ExportField::new("name")])
            .build()
            .unwrap();
        t.set_page(2);
        let outcome = t.export(ExportFormat::Csv).unwrap();
        assert_eq!(outcome.file().map(|f| f.row_count), Some(25));

        t.set_search("nobody");
        assert!(matches!(t.export(ExportFormat::Csv).unwrap(), ExportOutcome::NoData(_)));
    }
}
