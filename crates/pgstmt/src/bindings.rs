//! Per-statement binding accumulator.
//!
//! A [`BindingsCollector`] is created fresh for each statement-building call,
//! borrowed mutably by the builder, and handed to the executor together with
//! the generated text. Bindings are append-only: placeholders are issued in
//! registration order and never reused.

use crate::error::{StmtError, StmtResult};
use crate::value::BindValue;
use tokio_postgres::types::ToSql;

/// Placeholder convention expected by the downstream executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (Postgres)
    #[default]
    Dollar,
    /// `?1, ?2, ...` (SQLite)
    NumberedQuestion,
    /// `?` for every parameter; position alone identifies it.
    ///
    /// Executors that rewrite `?` cannot tell it apart from the jsonb `?`
    /// operator, so avoid `?`-family operators in predicates with this style.
    Question,
}

impl PlaceholderStyle {
    /// Format the placeholder for a 1-based parameter index.
    pub fn placeholder(self, idx: usize) -> String {
        match self {
            PlaceholderStyle::Dollar => format!("${idx}"),
            PlaceholderStyle::NumberedQuestion => format!("?{idx}"),
            PlaceholderStyle::Question => "?".to_string(),
        }
    }
}

/// A registered value and the placeholder embedded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Column the value is destined for.
    pub column: String,
    /// The bound value, passed through untouched.
    pub value: BindValue,
    /// Placeholder text embedded in the statement.
    pub placeholder_sql: String,
    /// 1-based parameter position.
    pub index: usize,
}

/// Ordered, append-only collection of [`Binding`]s for one statement.
#[derive(Debug, Clone, Default)]
pub struct BindingsCollector {
    style: PlaceholderStyle,
    offset: usize,
    bindings: Vec<Binding>,
}

impl BindingsCollector {
    /// Create an empty collector using `$n` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collector with the given placeholder style.
    pub fn with_style(style: PlaceholderStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Start numbering after `offset` parameters bound elsewhere.
    ///
    /// Used when the generated statement is embedded in a larger query that
    /// already owns `$1..=$offset`.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// The placeholder style in use.
    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Register a value and issue its placeholder.
    ///
    /// Returns `self` so the placeholder can be read back immediately with
    /// [`last_binding`](Self::last_binding).
    pub fn add_binding(&mut self, column: impl Into<String>, value: impl Into<BindValue>) -> &mut Self {
        let index = self.offset + self.bindings.len() + 1;
        self.bindings.push(Binding {
            column: column.into(),
            value: value.into(),
            placeholder_sql: self.style.placeholder(index),
            index,
        });
        self
    }

    /// The most recently registered binding, if any.
    pub fn last_binding(&self) -> Option<&Binding> {
        self.bindings.last()
    }

    /// Like [`last_binding`](Self::last_binding), but reading from an empty
    /// collector is an error.
    pub fn try_last_binding(&self) -> StmtResult<&Binding> {
        self.bindings.last().ok_or(StmtError::MissingBinding)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate bindings in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Binding> {
        self.bindings.iter()
    }

    /// Bound values in registration order.
    pub fn values(&self) -> Vec<&BindValue> {
        self.bindings.iter().map(|b| &b.value).collect()
    }

    /// Values as references compatible with tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.bindings
            .iter()
            .map(|b| &b.value as &(dyn ToSql + Sync))
            .collect()
    }

    /// Consume the collector, keeping its bindings.
    pub fn into_bindings(self) -> Vec<Binding> {
        self.bindings
    }
}

impl<'a> IntoIterator for &'a BindingsCollector {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}
