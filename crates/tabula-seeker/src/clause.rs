//! Clause types for row predicates.
//!
//! A table narrows its rows with three kinds of predicate, always ANDed:
//! a free-text search over several fields, exact dropdown filters, and a
//! date range. Each is a [`Clause`] variant.

use crate::date::DateRange;
use crate::slug::{fold, slugify};
use crate::value::Value;

/// A single row predicate.
///
/// Constructors return `None` when the clause would match everything
/// (blank search term, empty filter value, unbounded range), so a query
/// only ever carries clauses that can actually reject rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Folded `needle` occurs in the folded text of any of `fields`.
    Search { fields: Vec<String>, needle: String },
    /// Slug of `field` equals `slug`.
    Equals { field: String, slug: String },
    /// Date of `field` lies inside `range`.
    DateRange { field: String, range: DateRange },
}

impl Clause {
    /// Builds a search clause over `fields`.
    pub fn search<I, S>(fields: I, term: &str) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let needle = fold(term);
        if needle.is_empty() {
            return None;
        }
        Some(Clause::Search {
            fields: fields.into_iter().map(Into::into).collect(),
            needle,
        })
    }

    /// Builds an exact-match filter clause. `value` is slugified here.
    pub fn equals(field: impl Into<String>, value: &str) -> Option<Self> {
        let slug = slugify(value);
        if slug.is_empty() {
            return None;
        }
        Some(Clause::Equals {
            field: field.into(),
            slug,
        })
    }

    /// Builds a date range clause.
    pub fn date_range(field: impl Into<String>, range: DateRange) -> Option<Self> {
        if range.is_unbounded() {
            return None;
        }
        Some(Clause::DateRange {
            field: field.into(),
            range,
        })
    }

    /// Evaluates this clause against an item.
    pub fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        match self {
            Clause::Search { fields, needle } => fields
                .iter()
                .any(|field| fold(&accessor(item, field).to_text()).contains(needle.as_str())),
            Clause::Equals { field, slug } => slugify(&accessor(item, field).to_text()) == *slug,
            Clause::DateRange { field, range } => range.matches(&accessor(item, field)),
        }
    }

    /// The field names this clause reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Clause::Search { fields, .. } => fields.iter().map(String::as_str).collect(),
            Clause::Equals { field, .. } | Clause::DateRange { field, .. } => vec![field.as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Number, Record, Row};
    use chrono::NaiveDate;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn search_is_punctuation_insensitive() {
        let clause = Clause::search(["name"], "O'Brien").unwrap();
        assert!(clause.matches(&row(json!({"name": "obrien"})), &Row::accessor));
        assert!(clause.matches(&row(json!({"name": "Pat O Brien"})), &Row::accessor));
        assert!(!clause.matches(&row(json!({"name": "Bryan"})), &Row::accessor));
    }

    #[test]
    fn search_any_field() {
        let clause = Clause::search(["name", "email"], "acme").unwrap();
        let r = row(json!({"name": "Ann", "email": "ann@acme.io"}));
        assert!(clause.matches(&r, &Row::accessor));
    }

    #[test]
    fn search_coerces_numbers() {
        let clause = Clause::search(["grade"], "10").unwrap();
        assert!(clause.matches(&row(json!({"grade": 10})), &Row::accessor));
    }

    #[test]
    fn blank_clauses_are_dropped() {
        assert!(Clause::search(["name"], "   ").is_none());
        assert!(Clause::search(["name"], "'!").is_none());
        assert!(Clause::equals("role", "").is_none());
        assert!(Clause::date_range("createdAt", DateRange::unbounded()).is_none());
    }

    #[test]
    fn equals_matches_on_slug() {
        let clause = Clause::equals("status", "In Progress").unwrap();
        assert!(clause.matches(&row(json!({"status": "in-progress"})), &Row::accessor));
        assert!(clause.matches(&row(json!({"status": "IN PROGRESS"})), &Row::accessor));
        assert!(!clause.matches(&row(json!({"status": "in progress now"})), &Row::accessor));
        assert!(!clause.matches(&row(json!({})), &Row::accessor));
    }

    #[test]
    fn equals_on_numbers_and_bools() {
        let clause = Clause::equals("active", "true").unwrap();
        assert!(clause.matches(&row(json!({"active": true})), &Row::accessor));

        fn level<'a>(_: &'a (), _: &str) -> Value<'a> {
            Value::Number(Number::I64(3))
        }
        let clause = Clause::equals("level", "3").unwrap();
        assert!(clause.matches(&(), &level));
    }

    #[test]
    fn date_range_clause() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let range = DateRange::new(start, None).unwrap();
        let clause = Clause::date_range("createdAt", range).unwrap();

        assert!(clause.matches(
            &row(json!({"createdAt": "2024-06-01T00:00:00Z"})),
            &Row::accessor
        ));
        assert!(!clause.matches(&row(json!({"createdAt": "garbage"})), &Row::accessor));
        assert!(!clause.matches(&row(json!({})), &Row::accessor));
    }

    #[test]
    fn fields_lists_inputs() {
        let clause = Clause::search(["a", "b"], "x").unwrap();
        assert_eq!(clause.fields(), vec!["a", "b"]);
    }
}
