//! Query builder and executor.
//!
//! The [`Query`] struct collects the clauses and ordering of one table view
//! and runs them over a slice of rows. Execution order is fixed: filter
//! first, then sort the whole filtered set. Paging is the caller's job.

use crate::clause::Clause;
use crate::date::DateRange;
use crate::ordering::{Dir, OrderBy};
use crate::value::Value;

/// A filter-and-sort query over a row collection.
///
/// # Example
///
/// ```
/// use tabula_seeker::{Query, Record, Row};
///
/// let query = Query::new()
///     .search(["name", "email"], "ann")
///     .filter_eq("role", "Admin")
///     .order_desc("createdAt")
///     .build();
///
/// let rows: Vec<Row> = Vec::new();
/// assert!(query.filter(&rows, Row::accessor).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    clauses: Vec<Clause>,
    ordering: Option<OrderBy>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all items and keeps their input order.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Adds a clause. `None` (a clause that would match everything) is skipped.
    pub fn clause(mut self, clause: Option<Clause>) -> Self {
        self.clauses.extend(clause);
        self
    }

    /// Adds a free-text search over `fields`.
    pub fn search<I, S>(self, fields: I, term: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clause(Clause::search(fields, term))
    }

    /// Adds an exact-match dropdown filter.
    pub fn filter_eq(self, field: &str, value: &str) -> Self {
        self.clause(Clause::equals(field, value))
    }

    /// Adds a date range over `field`.
    pub fn date_range(self, field: &str, range: DateRange) -> Self {
        self.clause(Clause::date_range(field, range))
    }

    /// Sets the ordering, replacing any previous one.
    pub fn order_by(mut self, ordering: Option<OrderBy>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sorts ascending by `field`.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(Some(OrderBy::new(field, Dir::Asc)))
    }

    /// Sorts descending by `field`.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(Some(OrderBy::new(field, Dir::Desc)))
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the clauses in insertion order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns the ordering, if any.
    pub fn ordering(&self) -> Option<&OrderBy> {
        self.ordering.as_ref()
    }

    /// Returns `true` if the query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item passes every clause.
    pub fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.clauses
            .iter()
            .all(|clause| clause.matches(item, accessor))
    }

    /// Filters a slice, then sorts the surviving items.
    ///
    /// The sort is stable, so rows that compare equal keep their input order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut results: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();

        if let Some(order) = &self.ordering {
            results.sort_by(|a, b| {
                order.compare(&accessor(*a, &order.field), &accessor(*b, &order.field))
            });
        }

        log::trace!(
            "query kept {} of {} rows ({} clauses)",
            results.len(),
            items.len(),
            self.clauses.len()
        );
        results
    }

    /// Counts matching items without sorting.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }
}
