//! The [`Record`] trait: how the engine reads fields out of a row.

use crate::value::Value;

/// A JSON object row, the shape rows arrive in from the REST API.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Types whose fields can be searched, filtered and sorted.
///
/// # Manual Implementation
///
/// ```
/// use tabula_seeker::{Number, Record, Value};
///
/// struct User {
///     email: String,
///     logins: u32,
/// }
///
/// impl Record for User {
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "email" => Value::String(&self.email),
///             "logins" => Value::Number(Number::from(self.logins)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] when absent.
    fn field(&self, name: &str) -> Value<'_>;

    /// Function-pointer form of [`Record::field`] for the query methods.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field(field)
    }
}

impl Record for Row {
    /// Looks up `name` directly, then as a dotted path (`category.name`).
    fn field(&self, name: &str) -> Value<'_> {
        if let Some(value) = self.get(name) {
            return Value::from_json(value);
        }
        if !name.contains('.') {
            return Value::None;
        }
        let mut parts = name.split('.');
        let mut current = parts.next().and_then(|head| self.get(head));
        for part in parts {
            current = current.and_then(|v| v.get(part));
        }
        current.map(Value::from_json).unwrap_or(Value::None)
    }
}

impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => Value::None,
        }
    }
}
