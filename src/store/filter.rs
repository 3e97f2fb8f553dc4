use std::cmp::Ordering;

use serde_json::Value;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Document, SortOrder};

/// Filter document selecting which stored records an operation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches the document with this id.
    Id(Uuid),
    /// Matches when the field holds exactly the string `value`.
    Eq { field: &'static str, value: String },
    /// Matches when any branch matches. An empty `Or` matches nothing.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        Filter::Eq {
            field,
            value: value.into(),
        }
    }

    pub fn matches(&self, id: Uuid, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(want) => *want == id,
            Filter::Eq { field, value } => {
                matches!(doc.get(*field), Some(Value::String(s)) if s == value)
            }
            Filter::Or(branches) => branches.iter().any(|f| f.matches(id, doc)),
        }
    }

    /// Appends this filter as a boolean SQL expression over `id`/`doc` columns.
    pub(crate) fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Filter::All => {
                qb.push("TRUE");
            }
            Filter::Id(id) => {
                qb.push("id = ").push_bind(*id);
            }
            Filter::Eq { field, value } => {
                qb.push("doc->")
                    .push_bind(*field)
                    .push(" = ")
                    .push_bind(Value::String(value.clone()));
            }
            Filter::Or(branches) if branches.is_empty() => {
                qb.push("FALSE");
            }
            Filter::Or(branches) => {
                qb.push("(");
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    branch.push_sql(qb);
                }
                qb.push(")");
            }
        }
    }
}

/// Text form of a JSON value, as PostgreSQL's `->>` renders it. Unique
/// indexes compare this form.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Orders two sort keys the way a `jsonb` column sorts, with a missing
/// field treated as SQL NULL (last ascending, first descending).
pub(crate) fn compare_sort_keys(a: Option<&Value>, b: Option<&Value>, order: SortOrder) -> Ordering {
    let ord = match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => compare_json(a, b),
    };
    match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    }
}

fn compare_json(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::String(_) => 1,
            Value::Number(_) => 2,
            Value::Bool(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
