//! Wire-shape normalization between backend generations.
//!
//! Legacy backends speak snake_case and return bare arrays from list
//! endpoints. Current backends speak camelCase and wrap lists in a
//! pagination envelope. Decoding accepts both; encoding follows the
//! configured [`FieldStyle`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::project::Project;
use crate::query::{ListQuery, Page};
use crate::status::ProjectStatus;
use crate::util::parse_date;

/// Key naming used for request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStyle {
    #[default]
    Snake,
    Camel,
}

impl std::fmt::Display for FieldStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snake => write!(f, "snake"),
            Self::Camel => write!(f, "camel"),
        }
    }
}

impl std::str::FromStr for FieldStyle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snake" | "snake_case" | "legacy" => Ok(Self::Snake),
            "camel" | "camelcase" | "current" => Ok(Self::Camel),
            _ => Err(ParseError::FieldStyle(s.to_string())),
        }
    }
}

// ── Key conversion ──────────────────────────────────────────────────────────

/// `projectCode` → `project_code`. Already snake_case keys pass through.
pub fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `project_code` → `projectCode`. Already camelCase keys pass through.
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Rewrite every object key in `value` to the given style, recursively.
pub fn rename_keys(value: Value, style: FieldStyle) -> Value {
    match value {
        Value::Object(map) => {
            let renamed: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| {
                    let key = match style {
                        FieldStyle::Snake => to_snake_case(&k),
                        FieldStyle::Camel => to_camel_case(&k),
                    };
                    (key, rename_keys(v, style))
                })
                .collect();
            Value::Object(renamed)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| rename_keys(v, style)).collect())
        }
        other => other,
    }
}

/// Serialize a request body with keys in the configured style.
///
/// Stage flag objects keep their keys; they are single words in both styles.
pub fn encode_body<T: Serialize>(body: &T, style: FieldStyle) -> Result<Value, serde_json::Error> {
    let value = serde_json::to_value(body)?;
    Ok(match style {
        FieldStyle::Snake => value,
        FieldStyle::Camel => rename_keys(value, FieldStyle::Camel),
    })
}

// ── Lenient field decoders ──────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Ids arrive as numbers or numeric strings.
pub fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => Ok(n),
        Scalar::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id '{s}'"))),
        _ => Err(de::Error::custom("id must be a number or numeric string")),
    }
}

/// Media refs may be numeric ids or opaque strings.
pub fn de_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => Ok(n.to_string()),
        Scalar::Float(f) => Ok(f.to_string()),
        Scalar::Text(s) => Ok(s),
        Scalar::Bool(_) => Err(de::Error::custom("media ref must be a string or number")),
    }
}

/// Text fields: `null` becomes empty, numbers (phone numbers) become text.
pub fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

/// Team members: a comma-separated string or a list of names.
pub fn de_members<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Members {
        List(Vec<String>),
        Text(String),
    }
    Ok(match Option::<Members>::deserialize(deserializer)? {
        None => String::new(),
        Some(Members::List(names)) => names.join(", "),
        Some(Members::Text(s)) => s,
    })
}

/// Dates: `YYYY-MM-DD` or an ISO timestamp; empty or `null` means unset.
pub fn de_opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s).map(Some).map_err(de::Error::custom),
    }
}

/// Timestamps are informational; anything unparseable is dropped.
pub fn de_opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

/// Flags: booleans, `0`/`1`, or `"true"`/`"false"`; `null` is false.
pub fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => false,
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Int(n)) => n != 0,
        Some(Scalar::Float(f)) => f != 0.0,
        Some(Scalar::Text(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
    })
}

/// Status: canonical code or legacy label; `null`/empty is the default status.
pub fn de_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ProjectStatus, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(ProjectStatus::default()),
        Some(s) if s.trim().is_empty() => Ok(ProjectStatus::default()),
        Some(s) => s.parse().map_err(de::Error::custom),
    }
}

// ── List responses ──────────────────────────────────────────────────────────

/// Pagination envelope returned by current backends.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(alias = "data", alias = "results")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

/// A list endpoint response in either generation's shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Legacy(Vec<T>),
    Envelope(Envelope<T>),
}

impl ListResponse<Project> {
    /// Convert into a page for `query`.
    ///
    /// Envelopes are already filtered and paginated by the server. A legacy
    /// array is treated as the complete, unfiltered list and has the query
    /// applied locally.
    pub fn into_page(self, query: &ListQuery) -> Page<Project> {
        match self {
            Self::Envelope(env) => {
                let total = env.total.map_or(env.items.len(), |t| t as usize);
                Page {
                    total,
                    page: env.page.filter(|p| *p > 0).unwrap_or_else(|| query.page()),
                    page_size: env
                        .page_size
                        .filter(|s| *s > 0)
                        .unwrap_or_else(|| query.page_size()),
                    items: env.items,
                }
            }
            Self::Legacy(items) => query.apply(items),
        }
    }
}

impl<T> ListResponse<T> {
    /// Items regardless of shape, for endpoints without pagination.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Envelope(env) => env.items,
            Self::Legacy(items) => items,
        }
    }
}

#[cfg(test)]
#[path = "tests/wire_tests.rs"]
mod tests;
