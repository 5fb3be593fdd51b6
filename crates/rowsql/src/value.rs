//! Bound parameter values.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A scalar decoded from a record, bound to a `$n` placeholder.
///
/// The value adapts to the column type the server reports: an `Int` binds to
/// `int2`, `int4`, `int8`, `float4` or `float8`, and a `Text` holding an ISO date,
/// RFC 3339 timestamp or UUID binds to `date`, `timestamp`, `timestamptz` or `uuid`.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arrays and objects, bound to `json` / `jsonb`.
    Json(Value),
}

impl BindValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<Value> for BindValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map_or_else(|| Self::Text(n.to_string()), Self::Float),
            },
            Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<&Value> for BindValue {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

fn is_json(ty: &Type) -> bool {
    *ty == Type::JSON || *ty == Type::JSONB
}

fn int_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 {
        i16::try_from(i)?.to_sql_checked(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(i)?.to_sql_checked(ty, out)
    } else if *ty == Type::FLOAT4 {
        (i as f32).to_sql_checked(ty, out)
    } else if *ty == Type::FLOAT8 {
        (i as f64).to_sql_checked(ty, out)
    } else if is_json(ty) {
        Value::from(i).to_sql_checked(ty, out)
    } else {
        i.to_sql_checked(ty, out)
    }
}

fn float_to_sql(f: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::FLOAT4 {
        (f as f32).to_sql_checked(ty, out)
    } else if is_json(ty) {
        Value::from(f).to_sql_checked(ty, out)
    } else {
        f.to_sql_checked(ty, out)
    }
}

fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::DATE {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")?.to_sql_checked(ty, out)
    } else if *ty == Type::TIMESTAMP {
        let ts = match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.naive_utc(),
            Err(_) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")?,
        };
        ts.to_sql_checked(ty, out)
    } else if *ty == Type::TIMESTAMPTZ {
        DateTime::parse_from_rfc3339(s)?
            .with_timezone(&Utc)
            .to_sql_checked(ty, out)
    } else if *ty == Type::UUID {
        uuid::Uuid::parse_str(s)?.to_sql_checked(ty, out)
    } else if is_json(ty) {
        Value::from(s).to_sql_checked(ty, out)
    } else {
        s.to_sql_checked(ty, out)
    }
}

impl ToSql for BindValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) => b.to_sql_checked(ty, out),
            Self::Int(i) => int_to_sql(*i, ty, out),
            Self::Float(f) => float_to_sql(*f, ty, out),
            Self::Text(s) => text_to_sql(s, ty, out),
            Self::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        [
            Type::BOOL,
            Type::INT2,
            Type::INT4,
            Type::INT8,
            Type::FLOAT4,
            Type::FLOAT8,
            Type::TEXT,
            Type::VARCHAR,
            Type::BPCHAR,
            Type::NAME,
            Type::UNKNOWN,
            Type::DATE,
            Type::TIMESTAMP,
            Type::TIMESTAMPTZ,
            Type::UUID,
            Type::JSON,
            Type::JSONB,
        ]
        .contains(ty)
    }

    to_sql_checked!();
}
