//! Query builder for the `field=operator.value` filter grammar.
//!
//! A query is a list of filters plus an optional ordering:
//!
//! ```text
//! family_id=eq.42&order=day_of_week.asc,time.asc
//! ```
//!
//! The same `Query` value is rendered onto the wire by the REST gateway and
//! evaluated directly by the in-memory gateway.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// Comparison operator of a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Neq => ordering != Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Sort direction of an order clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A collection query: equality/range filters plus a sort order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Vec<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter.
    pub fn eq(self, field: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    /// Adds a filter with an arbitrary operator.
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl fmt::Display) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn order_asc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Asc)
    }

    pub fn order_desc(self, field: impl Into<String>) -> Self {
        self.order_by(field, Direction::Desc)
    }

    fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.order.is_empty()
    }

    /// Renders the query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = self
            .filters
            .iter()
            .map(|f| {
                format!(
                    "{}={}.{}",
                    f.field,
                    f.op.as_str(),
                    urlencoding::encode(&f.value)
                )
            })
            .collect();

        if !self.order.is_empty() {
            let clauses: Vec<String> = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.field, o.direction.as_str()))
                .collect();
            parts.push(format!("order={}", clauses.join(",")));
        }

        parts.join("&")
    }

    /// Returns true if the JSON row satisfies every filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| match row.get(&f.field) {
            None | Some(Value::Null) => f.op == FilterOp::Neq,
            Some(value) => compare_to_literal(value, &f.value)
                .map(|ordering| f.op.accepts(ordering))
                .unwrap_or(f.op == FilterOp::Neq),
        })
    }

    /// Compares two JSON rows according to the order clauses.
    ///
    /// Nulls sort last when ascending and first when descending.
    pub fn compare_rows(&self, a: &Value, b: &Value) -> Ordering {
        for clause in &self.order {
            let left = a.get(&clause.field).unwrap_or(&Value::Null);
            let right = b.get(&clause.field).unwrap_or(&Value::Null);
            let ordering = compare_values(left, right);
            let ordering = match clause.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn compare_to_literal(value: &Value, literal: &str) -> Option<Ordering> {
    match value {
        Value::Number(n) => {
            let left = n.as_f64()?;
            let right = literal.parse::<f64>().ok()?;
            left.partial_cmp(&right)
        }
        Value::String(s) => Some(s.as_str().cmp(literal)),
        Value::Bool(b) => {
            let right = literal.parse::<bool>().ok()?;
            Some(b.cmp(&right))
        }
        _ => None,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
