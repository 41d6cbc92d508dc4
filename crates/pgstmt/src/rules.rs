//! Pluggable validation rules applied to payloads before building.
//!
//! The builder itself never validates values; callers run a [`RuleSet`] first
//! when they need type checks on user input.
//!
//! ```ignore
//! use pgstmt::rules::{BooleanRule, RequiredRule, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .rule("active", BooleanRule)
//!     .rule("name", RequiredRule);
//! rules.validate(&payload)?;
//! ```

use crate::payload::UpdatePayload;
use crate::value::BindValue;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Boolean,
    String,
    Number,
    Regex,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Boolean => "is_boolean",
            Self::String => "is_string",
            Self::Number => "is_number",
            Self::Regex => "regex",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&err.message)?;
        }
        Ok(())
    }
}

/// A predicate over a single bound value.
pub trait Rule: Send + Sync {
    /// Code reported when the rule fails.
    fn code(&self) -> ValidationCode;

    /// Message template; `:attribute` is replaced by the column name.
    fn error_template(&self) -> &str;

    /// Returns `true` when the value passes.
    fn test(&self, value: Option<&BindValue>) -> bool;

    fn message(&self, attribute: &str) -> String {
        self.error_template().replace(":attribute", attribute)
    }
}

/// Value must be a boolean. Absent values pass; combine with [`RequiredRule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

impl Rule for BooleanRule {
    fn code(&self) -> ValidationCode {
        ValidationCode::Boolean
    }

    fn error_template(&self) -> &str {
        "The :attribute field must be a boolean."
    }

    fn test(&self, value: Option<&BindValue>) -> bool {
        matches!(value, None | Some(BindValue::Bool(_)))
    }
}

/// Value must be present and not NULL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredRule;

impl Rule for RequiredRule {
    fn code(&self) -> ValidationCode {
        ValidationCode::Required
    }

    fn error_template(&self) -> &str {
        "The :attribute field is required."
    }

    fn test(&self, value: Option<&BindValue>) -> bool {
        value.is_some_and(|v| !v.is_null())
    }
}

/// Value must be text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRule;

impl Rule for StringRule {
    fn code(&self) -> ValidationCode {
        ValidationCode::String
    }

    fn error_template(&self) -> &str {
        "The :attribute field must be a string."
    }

    fn test(&self, value: Option<&BindValue>) -> bool {
        matches!(value, None | Some(BindValue::Text(_)))
    }
}

/// Value must be an integer or float.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRule;

impl Rule for NumberRule {
    fn code(&self) -> ValidationCode {
        ValidationCode::Number
    }

    fn error_template(&self) -> &str {
        "The :attribute field must be a number."
    }

    fn test(&self, value: Option<&BindValue>) -> bool {
        matches!(value, None | Some(BindValue::Int(_) | BindValue::Float(_)))
    }
}

/// Text value must match a regular expression.
#[cfg(feature = "validate")]
#[derive(Debug, Clone)]
pub struct RegexRule {
    re: regex::Regex,
}

#[cfg(feature = "validate")]
impl RegexRule {
    /// Compile `pattern`. An invalid pattern is a developer error.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            re: regex::Regex::new(pattern)?,
        })
    }
}

#[cfg(feature = "validate")]
impl Rule for RegexRule {
    fn code(&self) -> ValidationCode {
        ValidationCode::Regex
    }

    fn error_template(&self) -> &str {
        "The :attribute field format is invalid."
    }

    fn test(&self, value: Option<&BindValue>) -> bool {
        match value {
            None => true,
            Some(BindValue::Text(s)) => self.re.is_match(s),
            Some(_) => false,
        }
    }
}

/// Rules keyed by column, checked in insertion order.
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Arc<dyn Rule>)>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("columns", &self.rules.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a rule to a column.
    pub fn rule(mut self, column: impl Into<String>, rule: impl Rule + 'static) -> Self {
        self.rules.push((column.into(), Arc::new(rule)));
        self
    }

    /// Check every rule against the payload, collecting all failures.
    pub fn validate(&self, payload: &UpdatePayload) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (column, rule) in &self.rules {
            if !rule.test(payload.get(column)) {
                errors.push(ValidationError::new(column.clone(), rule.code(), rule.message(column)));
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
