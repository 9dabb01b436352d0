//! Column definitions.
//!
//! A column pairs a header label with an [`Accessor`]. Field accessors read a
//! value straight off the row and are sortable by that field; computed
//! accessors format arbitrary text and are sortable only when given an
//! explicit `sorting_key`.

use std::fmt;
use std::sync::Arc;

use tabula_seeker::Record;

/// Cell formatter for computed columns.
pub type ComputeFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// How a column gets its cell text.
pub enum Accessor<T> {
    /// Read the named field and coerce it to text.
    Field(String),
    /// Format the whole row.
    Compute(ComputeFn<T>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Field(name) => Accessor::Field(name.clone()),
            Accessor::Compute(f) => Accessor::Compute(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Accessor::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// One visible column of a table.
#[derive(Debug)]
pub struct Column<T> {
    pub label: String,
    pub accessor: Accessor<T>,
    pub sorting_key: Option<String>,
    pub key: Option<String>,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            label: self.label.clone(),
            accessor: self.accessor.clone(),
            sorting_key: self.sorting_key.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T> Column<T> {
    /// A column showing `field` as-is.
    pub fn field(label: impl Into<String>, field: impl Into<String>) -> Self {
        Column {
            label: label.into(),
            accessor: Accessor::Field(field.into()),
            sorting_key: None,
            key: None,
        }
    }

    /// A column whose text is computed from the row.
    pub fn compute<F>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Column {
            label: label.into(),
            accessor: Accessor::Compute(Arc::new(f)),
            sorting_key: None,
            key: None,
        }
    }

    /// Sets the field to sort by when the header is clicked.
    pub fn sorting_key(mut self, field: impl Into<String>) -> Self {
        self.sorting_key = Some(field.into());
        self
    }

    /// Sets a stable identifier for the column.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The field this column sorts by, if it is sortable at all.
    pub fn sort_field(&self) -> Option<&str> {
        match (&self.sorting_key, &self.accessor) {
            (Some(key), _) => Some(key),
            (None, Accessor::Field(name)) => Some(name),
            (None, Accessor::Compute(_)) => None,
        }
    }

    /// Stable identifier: explicit key, else sort field, else label.
    pub fn id(&self) -> &str {
        self.key
            .as_deref()
            .or_else(|| self.sort_field())
            .unwrap_or(self.label.as_str())
    }
}

impl<T: Record> Column<T> {
    /// Renders this column's cell for `row`.
    pub fn render(&self, row: &T) -> String {
        match &self.accessor {
            Accessor::Field(name) => row.field(name).to_text().into_owned(),
            Accessor::Compute(f) => f(row),
        }
    }
}
