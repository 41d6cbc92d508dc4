//! Observation hooks for built statements.

use crate::statement::Statement;

/// Observer notified after [`UpdateStatementBuilder::build`](crate::UpdateStatementBuilder::build)
/// produces a statement.
pub trait StatementHook: Send + Sync {
    fn on_statement(&self, stmt: &Statement);
}

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub use self::tracing_hook::TracingStatementHook;

#[cfg(feature = "tracing")]
mod tracing_hook {
    use super::{StatementHook, truncate_sql_bytes};
    use crate::statement::Statement;
    use tracing::Level;

    /// A `tracing`-based hook that emits each built statement.
    ///
    /// Enable via the crate feature: `pgstmt = { features = ["tracing"] }`.
    #[derive(Debug, Clone)]
    pub struct TracingStatementHook {
        /// Tracing event level to emit at.
        pub level: Level,
        /// Truncate long SQL strings (in bytes). `None` means no truncation.
        pub max_sql_length: Option<usize>,
        /// Also emit the statement with values inlined.
        pub inline_values: bool,
    }

    impl Default for TracingStatementHook {
        fn default() -> Self {
            Self {
                level: Level::DEBUG,
                max_sql_length: Some(200),
                inline_values: false,
            }
        }
    }

    impl TracingStatementHook {
        /// Create a new hook with defaults.
        pub fn new() -> Self {
            Self::default()
        }

        /// Override the tracing event level.
        pub fn level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Set maximum SQL length to display.
        pub fn max_sql_length(mut self, len: usize) -> Self {
            self.max_sql_length = Some(len);
            self
        }

        /// Disable SQL truncation.
        pub fn no_truncate(mut self) -> Self {
            self.max_sql_length = None;
            self
        }

        /// Include bound values rendered inline. Values may be sensitive.
        pub fn with_inline_values(mut self) -> Self {
            self.inline_values = true;
            self
        }

        pub(crate) fn truncate_sql(&self, sql: &str) -> String {
            match self.max_sql_length {
                Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
                _ => sql.to_string(),
            }
        }
    }

    impl StatementHook for TracingStatementHook {
        fn on_statement(&self, stmt: &Statement) {
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let sql = self.truncate_sql(stmt.sql());
            let statement_count = stmt.statement_count();
            let param_count = stmt.bindings().len();
            if self.inline_values {
                let inlined = self.truncate_sql(&stmt.render_inline());
                emit_at_level!(
                    self.level,
                    target: "pgstmt.sql",
                    statement_count,
                    param_count,
                    sql = %sql,
                    inlined = %inlined,
                );
            } else {
                emit_at_level!(
                    self.level,
                    target: "pgstmt.sql",
                    statement_count,
                    param_count,
                    sql = %sql,
                );
            }
        }
    }
}
