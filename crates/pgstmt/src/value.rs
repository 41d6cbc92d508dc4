//! Bound parameter values.
//!
//! [`BindValue`] is the opaque value carried by each binding. The builder never
//! looks inside it; the executor receives it through [`ToSql`], and
//! [`BindValue::to_sql_literal`] exists only to render statements for logs.

use bytes::BytesMut;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BindValue {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(uuid::Uuid),
    Timestamp(DateTime<Utc>),
    /// JSON/JSONB document
    Json(serde_json::Value),
}

impl BindValue {
    /// Returns `true` for [`BindValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Null)
    }

    /// Short type name, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            BindValue::Null => "null",
            BindValue::Bool(_) => "boolean",
            BindValue::Int(_) => "integer",
            BindValue::Float(_) => "float",
            BindValue::Text(_) => "text",
            BindValue::Bytes(_) => "bytes",
            BindValue::Uuid(_) => "uuid",
            BindValue::Timestamp(_) => "timestamp",
            BindValue::Json(_) => "json",
        }
    }

    /// Render the value as an SQL literal.
    ///
    /// For debugging output only. Statements sent to the database must keep
    /// their placeholders.
    pub fn to_sql_literal(&self) -> String {
        match self {
            BindValue::Null => "NULL".to_string(),
            BindValue::Bool(true) => "TRUE".to_string(),
            BindValue::Bool(false) => "FALSE".to_string(),
            BindValue::Int(i) => i.to_string(),
            BindValue::Float(f) if f.is_finite() => f.to_string(),
            BindValue::Float(f) => format!("'{f}'::float8"),
            BindValue::Text(s) => quote_literal(s),
            BindValue::Bytes(b) => {
                let mut out = String::with_capacity(b.len() * 2 + 12);
                out.push_str("'\\x");
                for byte in b {
                    out.push_str(&format!("{byte:02x}"));
                }
                out.push_str("'::bytea");
                out
            }
            BindValue::Uuid(u) => format!("'{u}'"),
            BindValue::Timestamp(t) => format!("'{}'", t.to_rfc3339()),
            BindValue::Json(v) => quote_literal(&v.to_string()),
        }
    }
}

fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

impl ToSql for BindValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            BindValue::Null => Ok(IsNull::Yes),
            BindValue::Bool(b) => b.to_sql(ty, out),
            BindValue::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                _ => i.to_sql(ty, out),
            },
            BindValue::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => f.to_sql(ty, out),
            },
            BindValue::Text(s) => s.as_str().to_sql(ty, out),
            BindValue::Bytes(b) => b.as_slice().to_sql(ty, out),
            BindValue::Uuid(u) => u.to_sql(ty, out),
            BindValue::Timestamp(t) => t.to_sql(ty, out),
            BindValue::Json(v) => v.to_sql(ty, out),
        }
    }

    // Type checking happens per variant in `to_sql_checked`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            BindValue::Null => Ok(IsNull::Yes),
            BindValue::Bool(b) => b.to_sql_checked(ty, out),
            BindValue::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            BindValue::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql_checked(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            BindValue::Text(s) => s.as_str().to_sql_checked(ty, out),
            BindValue::Bytes(b) => b.as_slice().to_sql_checked(ty, out),
            BindValue::Uuid(u) => u.to_sql_checked(ty, out),
            BindValue::Timestamp(t) => t.to_sql_checked(ty, out),
            BindValue::Json(v) => v.to_sql_checked(ty, out),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for BindValue {
            fn from(v: $t) -> Self {
                BindValue::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for BindValue {
    fn from(v: bool) -> Self {
        BindValue::Bool(v)
    }
}

impl From<f32> for BindValue {
    fn from(v: f32) -> Self {
        BindValue::Float(f64::from(v))
    }
}

impl From<f64> for BindValue {
    fn from(v: f64) -> Self {
        BindValue::Float(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<String> for BindValue {
    fn from(v: String) -> Self {
        BindValue::Text(v)
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(v: Vec<u8>) -> Self {
        BindValue::Bytes(v)
    }
}

impl From<uuid::Uuid> for BindValue {
    fn from(v: uuid::Uuid) -> Self {
        BindValue::Uuid(v)
    }
}

impl From<DateTime<Utc>> for BindValue {
    fn from(v: DateTime<Utc>) -> Self {
        BindValue::Timestamp(v)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(BindValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for BindValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => BindValue::Int(i),
                None => n.as_f64().map_or(BindValue::Json(Value::Number(n)), BindValue::Float),
            },
            Value::String(s) => BindValue::Text(s),
            other @ (Value::Array(_) | Value::Object(_)) => BindValue::Json(other),
        }
    }
}
