//! UPDATE statement assembly.
//!
//! [`UpdateStatementBuilder`] turns a table name, one or more payloads and a
//! predicate list into `UPDATE "t" SET a = $1 WHERE b = $2;` text. Values are
//! registered with a [`BindingsCollector`] in the exact order their
//! placeholders appear, so the text and the collector are always in step.
//!
//! # Example
//!
//! ```ignore
//! use pgstmt::{FilterPredicate, UpdatePayload, UpdateStatementBuilder};
//!
//! let stmt = UpdateStatementBuilder::new().build(
//!     "users",
//!     UpdatePayload::new().set("status", "active"),
//!     &[FilterPredicate::eq("id", 5)],
//! )?;
//! assert_eq!(stmt.sql(), r#"UPDATE "users" SET status = $1 WHERE id = $2;"#);
//! ```
//!
//! Every identifier, payload and predicate is checked before the first value
//! is registered. A failed call leaves the collector untouched.

use crate::bindings::BindingsCollector;
use crate::config::{DangerousDmlPolicy, UpdateConfig, handle_dangerous_dml};
use crate::error::{StmtError, StmtResult};
use crate::hook::StatementHook;
use crate::ident::{format_table_name_with_quotes, prepare_column};
use crate::payload::{Conjunction, FilterPredicate, UpdatePayload, Updates};
use crate::statement::{PlaceholderSpan, Statement};
use crate::value::BindValue;
use std::sync::Arc;

/// SET assignment with its column already rendered.
type PreparedSet<'a> = Vec<(String, &'a BindValue)>;

/// WHERE predicate with column and operator already checked.
type PreparedWhere<'a> = Vec<(String, &'a str, &'a BindValue)>;

/// Stateless UPDATE statement builder.
///
/// Holds only configuration; all per-statement state lives in the
/// [`BindingsCollector`] passed to each call.
#[derive(Clone, Default)]
pub struct UpdateStatementBuilder {
    config: UpdateConfig,
    hook: Option<Arc<dyn StatementHook>>,
}

impl std::fmt::Debug for UpdateStatementBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateStatementBuilder")
            .field("config", &self.config)
            .field("hook", &self.hook.as_ref().map(|_| "<dyn StatementHook>"))
            .finish()
    }
}

impl UpdateStatementBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given configuration.
    pub fn with_config(config: UpdateConfig) -> Self {
        Self { config, hook: None }
    }

    /// Notify `hook` of every statement produced by [`build`](Self::build).
    pub fn with_hook(mut self, hook: impl StatementHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// The configuration this builder applies.
    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Build statements into a fresh collector and return them paired.
    pub fn build(
        &self,
        table: &str,
        updates: impl Into<Updates>,
        wheres: &[FilterPredicate],
    ) -> StmtResult<Statement> {
        let payloads = updates.into().into_payloads();
        let mut bindings = BindingsCollector::with_style(self.config.placeholder_style);
        let (sql, spans) = self.assemble(table, &payloads, wheres, &mut bindings)?;
        let stmt = Statement::new(sql, bindings, payloads.len(), spans);
        if let Some(hook) = &self.hook {
            hook.on_statement(&stmt);
        }
        Ok(stmt)
    }

    /// Generate one UPDATE per payload, concatenated in payload order.
    ///
    /// All statements share `bindings`; the predicates are re-bound for each
    /// statement.
    pub fn to_sql(
        &self,
        table: &str,
        updates: impl Into<Updates>,
        wheres: &[FilterPredicate],
        bindings: &mut BindingsCollector,
    ) -> StmtResult<String> {
        let payloads = updates.into().into_payloads();
        let (sql, _) = self.assemble(table, &payloads, wheres, bindings)?;
        Ok(sql)
    }

    /// Generate a single `UPDATE <table> SET ... [WHERE ...];` statement.
    pub fn create_update_sql(
        &self,
        table: &str,
        update: &UpdatePayload,
        wheres: &[FilterPredicate],
        bindings: &mut BindingsCollector,
    ) -> StmtResult<String> {
        let (sql, _) = self.assemble(table, std::slice::from_ref(update), wheres, bindings)?;
        Ok(sql)
    }

    /// Generate `SET col = <ph>, ...` in payload order.
    pub fn set(&self, update: &UpdatePayload, bindings: &mut BindingsCollector) -> StmtResult<String> {
        let sets = prepare_set(update)?;
        let mut sql = String::new();
        emit_set(&sets, bindings, &mut sql, &mut Vec::new())?;
        Ok(sql)
    }

    /// Generate `WHERE col op <ph> AND ...`, or `""` for no predicates.
    pub fn where_clause(
        &self,
        wheres: &[FilterPredicate],
        bindings: &mut BindingsCollector,
    ) -> StmtResult<String> {
        self.where_clause_with(wheres, self.config.conjunction, bindings)
    }

    /// Like [`where_clause`](Self::where_clause) with an explicit connective.
    pub fn where_clause_with(
        &self,
        wheres: &[FilterPredicate],
        conjunction: Conjunction,
        bindings: &mut BindingsCollector,
    ) -> StmtResult<String> {
        let preds = self.prepare_where(wheres)?;
        let mut sql = String::new();
        emit_where(&preds, conjunction, bindings, &mut sql, &mut Vec::new())?;
        Ok(sql)
    }

    fn assemble(
        &self,
        table: &str,
        payloads: &[UpdatePayload],
        wheres: &[FilterPredicate],
        bindings: &mut BindingsCollector,
    ) -> StmtResult<(String, Vec<PlaceholderSpan>)> {
        if payloads.is_empty() {
            return Err(StmtError::malformed("updates", "no update payloads given"));
        }
        let table_sql = format_table_name_with_quotes(table)?;
        if wheres.is_empty() && self.config.update_without_where == DangerousDmlPolicy::Error {
            return Err(StmtError::UnconditionalUpdate {
                table: table.to_string(),
            });
        }

        let sets = payloads
            .iter()
            .map(prepare_set)
            .collect::<StmtResult<Vec<_>>>()?;
        let preds = self.prepare_where(wheres)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "pgstmt.sql",
            table,
            payloads = payloads.len(),
            predicates = wheres.len(),
            "assembling UPDATE"
        );

        let mut sql = String::new();
        let mut spans = Vec::new();
        for set in &sets {
            let start = sql.len();
            sql.push_str("UPDATE ");
            sql.push_str(&table_sql);
            sql.push(' ');
            emit_set(set, bindings, &mut sql, &mut spans)?;
            if !preds.is_empty() {
                sql.push(' ');
                emit_where(&preds, self.config.conjunction, bindings, &mut sql, &mut spans)?;
            }
            sql.push(';');

            if preds.is_empty() {
                handle_dangerous_dml(self.config.update_without_where, table, &sql[start..])?;
            }
        }
        Ok((sql, spans))
    }

    fn prepare_where<'a>(&self, wheres: &'a [FilterPredicate]) -> StmtResult<PreparedWhere<'a>> {
        wheres
            .iter()
            .map(|p| {
                let column = prepare_column(&p.column)?;
                let operator = self.config.operator_policy.check(&p.operator)?;
                Ok((column, operator, &p.value))
            })
            .collect()
    }
}

fn prepare_set(update: &UpdatePayload) -> StmtResult<PreparedSet<'_>> {
    if update.is_empty() {
        return Err(StmtError::malformed("update", "update payload has no columns"));
    }
    update
        .iter()
        .map(|(column, value)| Ok((prepare_column(column)?, value)))
        .collect()
}

/// Register `value` and append its placeholder to `out`, recording where it went.
fn emit_placeholder(
    column: &str,
    value: &BindValue,
    bindings: &mut BindingsCollector,
    out: &mut String,
    spans: &mut Vec<PlaceholderSpan>,
) -> StmtResult<()> {
    let position = bindings.len();
    let placeholder = &bindings
        .add_binding(column, value.clone())
        .try_last_binding()?
        .placeholder_sql;
    let start = out.len();
    out.push_str(placeholder);
    spans.push(PlaceholderSpan {
        range: start..out.len(),
        binding: position,
    });
    Ok(())
}

fn emit_set(
    sets: &[(String, &BindValue)],
    bindings: &mut BindingsCollector,
    out: &mut String,
    spans: &mut Vec<PlaceholderSpan>,
) -> StmtResult<()> {
    out.push_str("SET ");
    for (i, (column, value)) in sets.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(column);
        out.push_str(" = ");
        emit_placeholder(column, value, bindings, out, spans)?;
    }
    Ok(())
}

fn emit_where(
    preds: &[(String, &str, &BindValue)],
    conjunction: Conjunction,
    bindings: &mut BindingsCollector,
    out: &mut String,
    spans: &mut Vec<PlaceholderSpan>,
) -> StmtResult<()> {
    if preds.is_empty() {
        return Ok(());
    }
    out.push_str("WHERE ");
    for (i, (column, operator, value)) in preds.iter().enumerate() {
        if i > 0 {
            out.push_str(conjunction.separator());
        }
        out.push_str(column);
        out.push(' ');
        out.push_str(operator);
        out.push(' ');
        emit_placeholder(column, value, bindings, out, spans)?;
    }
    Ok(())
}

/// Build with a default [`UpdateStatementBuilder`].
pub fn build_update(
    table: &str,
    updates: impl Into<Updates>,
    wheres: &[FilterPredicate],
) -> StmtResult<Statement> {
    UpdateStatementBuilder::new().build(table, updates, wheres)
}

#[cfg(test)]
mod tests;
