//! Update payloads and filter predicates.

use crate::error::{StmtError, StmtResult};
use crate::value::BindValue;
use serde::Serialize;

/// Ordered column/value assignments for one UPDATE statement.
///
/// Column order is the SET-clause order and the binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    columns: Vec<(String, BindValue)>,
}

impl UpdatePayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an assignment.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    /// Append an assignment if the value is `Some`.
    pub fn set_opt<T: Into<BindValue>>(self, column: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Append an assignment in place.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<BindValue>) {
        self.columns.push((column.into(), value.into()));
    }

    /// Build a payload from a JSON object, keeping key order.
    pub fn from_json(value: serde_json::Value) -> StmtResult<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(Self {
                columns: map.into_iter().map(|(k, v)| (k, BindValue::from(v))).collect(),
            }),
            other => Err(StmtError::Serialization(format!(
                "update payload must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build a payload from any value serializing to a JSON object.
    ///
    /// Struct fields keep their declaration order.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> StmtResult<Self> {
        Self::from_json(serde_json::to_value(value)?)
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate assignments in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BindValue)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Look up the value assigned to `column`.
    pub fn get(&self, column: &str) -> Option<&BindValue> {
        self.columns.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for UpdatePayload
where
    K: Into<String>,
    V: Into<BindValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// One payload or an ordered batch of payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Updates {
    One(UpdatePayload),
    Many(Vec<UpdatePayload>),
}

impl Updates {
    /// Normalize to a list, one entry per statement.
    pub fn into_payloads(self) -> Vec<UpdatePayload> {
        match self {
            Updates::One(p) => vec![p],
            Updates::Many(ps) => ps,
        }
    }
}

impl From<UpdatePayload> for Updates {
    fn from(p: UpdatePayload) -> Self {
        Updates::One(p)
    }
}

impl From<Vec<UpdatePayload>> for Updates {
    fn from(ps: Vec<UpdatePayload>) -> Self {
        Updates::Many(ps)
    }
}

/// Boolean connective placed between WHERE predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    /// Separator text including surrounding spaces.
    pub fn separator(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

/// A single `column operator value` WHERE condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub column: String,
    /// Embedded verbatim unless the builder uses an operator allowlist.
    pub operator: String,
    pub value: BindValue,
}

impl FilterPredicate {
    /// Create a predicate with an arbitrary operator.
    pub fn new(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<BindValue>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// column = value
    pub fn eq(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, "=", value)
    }

    /// column != value
    pub fn ne(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, "!=", value)
    }

    /// column > value
    pub fn gt(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, ">", value)
    }

    /// column >= value
    pub fn gte(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, ">=", value)
    }

    /// column < value
    pub fn lt(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, "<", value)
    }

    /// column <= value
    pub fn lte(column: impl Into<String>, value: impl Into<BindValue>) -> Self {
        Self::new(column, "<=", value)
    }

    /// column LIKE pattern
    pub fn like(column: impl Into<String>, pattern: impl Into<BindValue>) -> Self {
        Self::new(column, "LIKE", pattern)
    }
}
