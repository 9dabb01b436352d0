//! Ordering types for result sorting.
//!
//! A table sorts by at most one column. [`cycle_sort`] implements the header
//! click cycle, [`OrderBy::compare`] the comparison itself.

use std::cmp::Ordering;
use std::str::FromStr;

use deunicode::deunicode;

use crate::error::SeekerError;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = SeekerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(SeekerError::InvalidDirection(s.to_string())),
        }
    }
}

/// A sort on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two field values according to this ordering.
    ///
    /// Missing values sort after present ones in both directions; only the
    /// comparison between present values is reversed for `Desc`.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a.is_none(), b.is_none()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(compare_values(a, b)),
        }
    }
}

/// Advances the header-click cycle for `field`.
///
/// Clicking the sorted column goes `Asc → Desc → unsorted`; clicking any
/// other column starts it at `Asc` and drops the previous sort.
pub fn cycle_sort(current: Option<&OrderBy>, field: &str) -> Option<OrderBy> {
    match current {
        Some(order) if order.field == field => match order.dir {
            Dir::Asc => Some(OrderBy::desc(field)),
            Dir::Desc => None,
        },
        _ => Some(OrderBy::asc(field)),
    }
}

/// Compares two present values.
///
/// Values rank by class first: numbers, then timestamps, then everything
/// else as text. Numbers compare with
/// [`Number::total_cmp`](crate::Number::total_cmp), timestamps
/// chronologically and text with [`collate`]. A column mixing
/// `3` and `"2"` therefore puts every number before every string, and the
/// order stays total.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(*y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        _ => class_rank(a)
            .cmp(&class_rank(b))
            .then_with(|| collate(&a.to_text(), &b.to_text())),
    }
}

fn class_rank(value: &Value<'_>) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Timestamp(_) => 1,
        _ => 2,
    }
}

/// Locale-style string collation.
///
/// Primary key is the transliterated, lowercased text, so `"émile"` sorts
/// with `"emile"` and `"b"` after `"A"`. Ties break lowercase-first, then by
/// raw code points so the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let (ta, tb) = (deunicode(a), deunicode(b));
    ta.to_lowercase()
        .cmp(&tb.to_lowercase())
        .then_with(|| case_rank(&ta).cmp(case_rank(&tb)))
        .then_with(|| a.cmp(b))
}

fn case_rank(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(|c| c.is_uppercase())
}
