//! # pgstmt
//!
//! Parameterized UPDATE statement assembly for Postgres-style executors.
//!
//! ## Features
//!
//! - **Injection-safe by construction**: values only ever appear as placeholders
//! - **Ordered bindings**: placeholders are issued in the same order they appear in the text
//! - **Batches**: one statement per payload, all sharing a single collector
//! - **Explicit WHERE connective**: predicates are joined with `AND` (or `OR`)
//! - **Safe defaults**: UPDATE without WHERE warns, and can be rejected outright
//! - **Executor handoff**: bound values implement `tokio_postgres::types::ToSql`
//!
//! ## Usage
//!
//! ```ignore
//! use pgstmt::{BindingsCollector, FilterPredicate, UpdatePayload, UpdateStatementBuilder};
//!
//! let mut bindings = BindingsCollector::new();
//! let sql = UpdateStatementBuilder::new().to_sql(
//!     "users",
//!     UpdatePayload::new().set("name", "Alice").set("age", 30),
//!     &[FilterPredicate::eq("id", 5)],
//!     &mut bindings,
//! )?;
//! assert_eq!(sql, r#"UPDATE "users" SET name = $1, age = $2 WHERE id = $3;"#);
//!
//! client.execute(&sql, &bindings.params_ref()).await?;
//! ```

pub mod bindings;
pub mod config;
pub mod error;
pub mod hook;
pub mod ident;
pub mod payload;
pub mod rules;
pub mod statement;
pub mod update;
pub mod value;

pub use bindings::{Binding, BindingsCollector, PlaceholderStyle};
pub use config::{ALLOWED_OPERATORS, DangerousDmlPolicy, OperatorPolicy, UpdateConfig};
pub use error::{StmtError, StmtResult};
pub use hook::StatementHook;
pub use ident::{Ident, IdentPart, format_table_name_with_quotes, prepare_column};
pub use payload::{Conjunction, FilterPredicate, UpdatePayload, Updates};
pub use rules::{Rule, RuleSet, ValidationCode, ValidationError, ValidationErrors};
pub use statement::Statement;
pub use update::{UpdateStatementBuilder, build_update};
pub use value::BindValue;

#[cfg(feature = "tracing")]
pub use hook::TracingStatementHook;

pub mod prelude;
