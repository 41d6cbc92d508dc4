//! Builder configuration.
//!
//! [`UpdateConfig`] selects the placeholder style and WHERE connective, and
//! decides how unconditional updates and unknown operators are treated.

use crate::bindings::PlaceholderStyle;
use crate::error::{StmtError, StmtResult};
use crate::payload::Conjunction;

/// Configuration for [`UpdateStatementBuilder`](crate::UpdateStatementBuilder).
#[derive(Debug, Clone, Default)]
pub struct UpdateConfig {
    /// Placeholder convention for collectors created by `build()`.
    pub placeholder_style: PlaceholderStyle,
    /// Connective placed between WHERE predicates.
    pub conjunction: Conjunction,
    /// How an UPDATE without WHERE is handled.
    pub update_without_where: DangerousDmlPolicy,
    /// How predicate operators are checked.
    pub operator_policy: OperatorPolicy,
}

impl UpdateConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder style.
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }

    /// Set the connective between WHERE predicates.
    pub fn conjunction(mut self, conjunction: Conjunction) -> Self {
        self.conjunction = conjunction;
        self
    }

    /// Configure how UPDATE without WHERE is handled.
    pub fn update_without_where(mut self, policy: DangerousDmlPolicy) -> Self {
        self.update_without_where = policy;
        self
    }

    /// Configure operator checking.
    pub fn operator_policy(mut self, policy: OperatorPolicy) -> Self {
        self.operator_policy = policy;
        self
    }

    /// Reject unconditional updates and operators outside the allowlist.
    pub fn strict(mut self) -> Self {
        self.update_without_where = DangerousDmlPolicy::Error;
        self.operator_policy = OperatorPolicy::Allowlist;
        self
    }
}

/// Handling of an UPDATE that has no WHERE clause and so touches every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DangerousDmlPolicy {
    /// Build it silently.
    Allow,
    /// Build it and log a warning on target `pgstmt.policy`.
    #[default]
    Warn,
    /// Reject it with [`StmtError::UnconditionalUpdate`].
    Error,
}

/// Operator checking for WHERE predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatorPolicy {
    /// Embed the operator text as given.
    #[default]
    Verbatim,
    /// Accept only [`ALLOWED_OPERATORS`] (case-insensitive).
    Allowlist,
}

/// Comparison operators accepted under [`OperatorPolicy::Allowlist`].
pub const ALLOWED_OPERATORS: &[&str] = &[
    "=",
    "!=",
    "<>",
    "<",
    "<=",
    ">",
    ">=",
    "LIKE",
    "NOT LIKE",
    "ILIKE",
    "NOT ILIKE",
    "IS",
    "IS NOT",
    "IS DISTINCT FROM",
    "IS NOT DISTINCT FROM",
];

impl OperatorPolicy {
    /// Check an operator, returning the text to embed.
    pub(crate) fn check<'a>(self, operator: &'a str) -> StmtResult<&'a str> {
        let trimmed = operator.trim();
        if trimmed.is_empty() {
            return Err(StmtError::malformed("operator", "operator is empty"));
        }
        match self {
            OperatorPolicy::Verbatim => Ok(operator),
            OperatorPolicy::Allowlist => {
                let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
                if ALLOWED_OPERATORS
                    .iter()
                    .any(|op| op.eq_ignore_ascii_case(&normalized))
                {
                    Ok(trimmed)
                } else {
                    Err(StmtError::UnsupportedOperator(operator.to_string()))
                }
            }
        }
    }
}

/// Apply `policy` to an UPDATE without WHERE.
pub(crate) fn handle_dangerous_dml(
    policy: DangerousDmlPolicy,
    table: &str,
    sql: &str,
) -> StmtResult<()> {
    match policy {
        DangerousDmlPolicy::Allow => Ok(()),
        DangerousDmlPolicy::Warn => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "pgstmt.policy",
                table,
                sql,
                "UPDATE without WHERE affects every row"
            );
            #[cfg(not(feature = "tracing"))]
            eprintln!("[pgstmt warn] UPDATE without WHERE affects every row: {sql}");
            Ok(())
        }
        DangerousDmlPolicy::Error => Err(StmtError::UnconditionalUpdate {
            table: table.to_string(),
        }),
    }
}
