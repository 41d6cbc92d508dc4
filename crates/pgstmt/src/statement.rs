//! Generated SQL paired with the bindings it references.

use crate::bindings::BindingsCollector;
use crate::value::BindValue;
use std::ops::Range;
use tokio_postgres::types::ToSql;

/// Where one placeholder sits in the statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlaceholderSpan {
    /// Byte range of the placeholder text.
    pub(crate) range: Range<usize>,
    /// Position of its binding in the collector.
    pub(crate) binding: usize,
}

/// The output of one building call: statement text plus its bindings.
///
/// The two halves are only meaningful together, so they travel as one value.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    bindings: BindingsCollector,
    statement_count: usize,
    placeholders: Vec<PlaceholderSpan>,
}

impl Statement {
    pub(crate) fn new(
        sql: String,
        bindings: BindingsCollector,
        statement_count: usize,
        placeholders: Vec<PlaceholderSpan>,
    ) -> Self {
        Self {
            sql,
            bindings,
            statement_count,
            placeholders,
        }
    }

    /// The statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bindings referenced by the text, in placeholder order.
    pub fn bindings(&self) -> &BindingsCollector {
        &self.bindings
    }

    /// Number of `;`-terminated statements in the text.
    pub fn statement_count(&self) -> usize {
        self.statement_count
    }

    /// Bound values in placeholder order.
    pub fn values(&self) -> Vec<&BindValue> {
        self.bindings.values()
    }

    /// Parameters as references compatible with tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.bindings.params_ref()
    }

    /// Split into text and collector.
    pub fn into_parts(self) -> (String, BindingsCollector) {
        (self.sql, self.bindings)
    }

    /// Render the text with every placeholder replaced by its value as an SQL
    /// literal.
    ///
    /// Only the positions where placeholders were emitted are substituted, so
    /// `$` or `?` inside identifiers and operators is left alone.
    ///
    /// Debug output only: the result must never be executed.
    pub fn render_inline(&self) -> String {
        let bindings: Vec<_> = self.bindings.iter().collect();
        let mut out = String::with_capacity(self.sql.len() + bindings.len() * 8);
        let mut cursor = 0;

        for span in &self.placeholders {
            out.push_str(&self.sql[cursor..span.range.start]);
            match bindings.get(span.binding) {
                Some(b) => out.push_str(&b.value.to_sql_literal()),
                None => out.push_str(&self.sql[span.range.clone()]),
            }
            cursor = span.range.end;
        }
        out.push_str(&self.sql[cursor..]);
        out
    }
}
