//! Convenient imports for typical `pgstmt` usage.
//!
//! ```ignore
//! use pgstmt::prelude::*;
//! ```

pub use crate::{
    BindValue, BindingsCollector, FilterPredicate, Statement, StmtError, StmtResult, UpdateConfig,
    UpdatePayload, UpdateStatementBuilder, build_update,
};
pub use crate::{Conjunction, DangerousDmlPolicy, PlaceholderStyle};
