//! JSON selector queries for the in-memory ledger.
//!
//! Evaluates the subset of CouchDB Mango queries chaincode commonly issues:
//!
//! | Key | Support |
//! |-----|---------|
//! | `selector` | required; implicit equality, nested objects, dotted paths |
//! | operators | `$eq $ne $gt $gte $lt $lte $in $nin $exists $and $or $nor $not` |
//! | `sort` | `["field"]` or `[{"field": "asc"\|"desc"}]` |
//! | `limit`, `skip` | non-negative integers |
//! | `fields` | projection of the listed paths |
//! | `use_index`, `bookmark` | accepted, ignored |
//!
//! Stored values that are not JSON objects never match.
//!
//! Values of different JSON types compare by CouchDB collation:
//! `null < false < true < numbers < strings < arrays < objects`.

use crate::errors::StoreError;
use crate::ports::KeyValue;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Parsed selector query.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorQuery {
    condition: Condition,
    sort: Vec<SortField>,
    limit: Option<usize>,
    skip: usize,
    fields: Option<Vec<Vec<String>>>,
}

#[derive(Clone, Debug, PartialEq)]
enum Condition {
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Nor(Vec<Condition>),
    Not(Box<Condition>),
    Field { path: Vec<String>, op: FieldOp },
}

#[derive(Clone, Debug, PartialEq)]
enum FieldOp {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
}

#[derive(Clone, Debug, PartialEq)]
struct SortField {
    path: Vec<String>,
    descending: bool,
}

fn invalid(msg: impl Into<String>) -> StoreError {
    StoreError::InvalidQuery(msg.into())
}

impl SelectorQuery {
    /// Parse a query document.
    pub fn parse(query: &str) -> Result<Self, StoreError> {
        let doc: Value = serde_json::from_str(query).map_err(|e| {
            invalid(format!(
                "query is not valid JSON at line {} column {}",
                e.line(),
                e.column()
            ))
        })?;
        let Value::Object(doc) = doc else {
            return Err(invalid("query must be a JSON object"));
        };

        let selector = match doc.get("selector") {
            Some(Value::Object(selector)) => selector,
            Some(_) => return Err(invalid("selector must be a JSON object")),
            None => return Err(invalid("query has no selector")),
        };
        let condition = parse_selector(selector, &[])?;

        let sort = match doc.get("sort") {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(parse_sort_field)
                .collect::<Result<_, _>>()?,
            Some(_) => return Err(invalid("sort must be an array")),
        };

        let fields = match doc.get("fields") {
            None => None,
            Some(Value::Array(entries)) => Some(
                entries
                    .iter()
                    .map(|f| {
                        f.as_str()
                            .map(split_path)
                            .ok_or_else(|| invalid("fields entries must be strings"))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            Some(_) => return Err(invalid("fields must be an array")),
        };

        Ok(Self {
            condition,
            sort,
            limit: parse_count(&doc, "limit")?,
            skip: parse_count(&doc, "skip")?.unwrap_or(0),
            fields,
        })
    }

    /// Whether a document satisfies the selector.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        doc.is_object() && self.condition.evaluate(doc)
    }

    /// Run the query over `(key, value)` entries in key order.
    pub fn execute<'e>(
        &self,
        entries: impl Iterator<Item = (&'e String, &'e Vec<u8>)>,
    ) -> Vec<KeyValue> {
        let mut matched: Vec<(&String, &Vec<u8>, Value)> = entries
            .filter_map(|(key, bytes)| {
                let doc: Value = serde_json::from_slice(bytes).ok()?;
                self.matches(&doc).then_some((key, bytes, doc))
            })
            .collect();

        if !self.sort.is_empty() {
            // Stable, so ties keep key order
            matched.sort_by(|(_, _, a), (_, _, b)| self.compare_for_sort(a, b));
        }

        matched
            .into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|(key, bytes, doc)| match &self.fields {
                None => KeyValue::new(key.clone(), bytes.clone()),
                Some(fields) => {
                    KeyValue::new(key.clone(), project(&doc, fields).to_string().into_bytes())
                }
            })
            .collect()
    }

    fn compare_for_sort(&self, a: &Value, b: &Value) -> Ordering {
        for field in &self.sort {
            let left = lookup(a, &field.path).unwrap_or(&Value::Null);
            let right = lookup(b, &field.path).unwrap_or(&Value::Null);
            let ord = collate(left, right);
            let ord = if field.descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn split_path(path: &str) -> Vec<String> {
    path.split('.').map(str::to_string).collect()
}

fn parse_count(doc: &Map<String, Value>, name: &str) -> Result<Option<usize>, StoreError> {
    match doc.get(name) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(format!("{name} must be a non-negative integer"))),
    }
}

fn parse_sort_field(entry: &Value) -> Result<SortField, StoreError> {
    match entry {
        Value::String(path) => Ok(SortField {
            path: split_path(path),
            descending: false,
        }),
        Value::Object(obj) if obj.len() == 1 => {
            let (path, direction) = obj
                .iter()
                .next()
                .ok_or_else(|| invalid("empty sort entry"))?;
            let descending = match direction.as_str() {
                Some("asc") => false,
                Some("desc") => true,
                _ => return Err(invalid(format!("sort direction for {path} must be asc or desc"))),
            };
            Ok(SortField {
                path: split_path(path),
                descending,
            })
        }
        _ => Err(invalid("sort entries must be a field name or {field: direction}")),
    }
}

fn parse_selector(
    selector: &Map<String, Value>,
    prefix: &[String],
) -> Result<Condition, StoreError> {
    let mut conditions = Vec::with_capacity(selector.len());
    for (key, value) in selector {
        conditions.push(match key.as_str() {
            "$and" => Condition::All(parse_clause_list(key, value, prefix)?),
            "$or" => Condition::Any(parse_clause_list(key, value, prefix)?),
            "$nor" => Condition::Nor(parse_clause_list(key, value, prefix)?),
            "$not" => match value {
                Value::Object(inner) => Condition::Not(Box::new(parse_selector(inner, prefix)?)),
                _ => return Err(invalid("$not takes a selector object")),
            },
            op if op.starts_with('$') => {
                // {"a": {"$gt": 1}} reaches here with prefix ["a"]
                if prefix.is_empty() {
                    return Err(invalid(format!("operator {op} needs a field")));
                }
                Condition::Field {
                    path: prefix.to_vec(),
                    op: parse_operator(op, value)?,
                }
            }
            field => {
                let mut path = prefix.to_vec();
                path.extend(split_path(field));
                match value {
                    Value::Object(inner) if !inner.is_empty() => parse_selector(inner, &path)?,
                    other => Condition::Field {
                        path,
                        op: FieldOp::Eq(other.clone()),
                    },
                }
            }
        });
    }
    Ok(match conditions.len() {
        1 => conditions.remove(0),
        _ => Condition::All(conditions),
    })
}

fn parse_clause_list(
    op: &str,
    value: &Value,
    prefix: &[String],
) -> Result<Vec<Condition>, StoreError> {
    let Value::Array(clauses) = value else {
        return Err(invalid(format!("{op} takes an array of selectors")));
    };
    clauses
        .iter()
        .map(|clause| match clause {
            Value::Object(inner) => parse_selector(inner, prefix),
            _ => Err(invalid(format!("{op} entries must be selector objects"))),
        })
        .collect()
}

fn parse_operator(op: &str, arg: &Value) -> Result<FieldOp, StoreError> {
    let list = |arg: &Value| match arg {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(invalid(format!("{op} takes an array"))),
    };
    Ok(match op {
        "$eq" => FieldOp::Eq(arg.clone()),
        "$ne" => FieldOp::Ne(arg.clone()),
        "$gt" => FieldOp::Gt(arg.clone()),
        "$gte" => FieldOp::Gte(arg.clone()),
        "$lt" => FieldOp::Lt(arg.clone()),
        "$lte" => FieldOp::Lte(arg.clone()),
        "$in" => FieldOp::In(list(arg)?),
        "$nin" => FieldOp::Nin(list(arg)?),
        "$exists" => FieldOp::Exists(
            arg.as_bool()
                .ok_or_else(|| invalid("$exists takes a boolean"))?,
        ),
        other => return Err(invalid(format!("unsupported operator {other}"))),
    })
}

// =============================================================================
// EVALUATION
// =============================================================================

impl Condition {
    fn evaluate(&self, doc: &Value) -> bool {
        match self {
            Self::All(all) => all.iter().all(|c| c.evaluate(doc)),
            Self::Any(any) => any.iter().any(|c| c.evaluate(doc)),
            Self::Nor(none) => !none.iter().any(|c| c.evaluate(doc)),
            Self::Not(inner) => !inner.evaluate(doc),
            Self::Field { path, op } => op.evaluate(lookup(doc, path)),
        }
    }
}

impl FieldOp {
    fn evaluate(&self, found: Option<&Value>) -> bool {
        // Only $exists can match a missing field
        let Some(value) = found else {
            return matches!(self, Self::Exists(false));
        };
        match self {
            Self::Eq(expected) => collate(value, expected) == Ordering::Equal,
            Self::Ne(expected) => collate(value, expected) != Ordering::Equal,
            Self::Gt(bound) => {
                same_class(value, bound) && collate(value, bound) == Ordering::Greater
            }
            Self::Gte(bound) => same_class(value, bound) && collate(value, bound) != Ordering::Less,
            Self::Lt(bound) => same_class(value, bound) && collate(value, bound) == Ordering::Less,
            Self::Lte(bound) => {
                same_class(value, bound) && collate(value, bound) != Ordering::Greater
            }
            Self::In(options) => options.iter().any(|o| collate(value, o) == Ordering::Equal),
            Self::Nin(options) => !options.iter().any(|o| collate(value, o) == Ordering::Equal),
            Self::Exists(expected) => *expected,
        }
    }
}

fn lookup<'v>(doc: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(doc, |current, segment| current.as_object()?.get(segment))
}

fn project(doc: &Value, fields: &[Vec<String>]) -> Value {
    let mut out = Map::new();
    for path in fields {
        if let Some(value) = lookup(doc, path) {
            insert_path(&mut out, path, value.clone());
        }
    }
    Value::Object(out)
}

fn insert_path(target: &mut Map<String, Value>, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            target.insert(leaf.clone(), value);
        }
        [parent, rest @ ..] => {
            let slot = target
                .entry(parent.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = slot {
                insert_path(inner, rest, value);
            }
        }
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(false) => 1,
        Value::Bool(true) => 2,
        Value::Number(_) => 3,
        Value::String(_) => 4,
        Value::Array(_) => 5,
        Value::Object(_) => 6,
    }
}

/// Range operators only compare within one JSON type.
fn same_class(a: &Value, b: &Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// CouchDB view collation.
fn collate(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => x
            .iter()
            .zip(y)
            .map(|(l, r)| collate(l, r))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        (Value::Object(x), Value::Object(y)) => x
            .iter()
            .zip(y)
            .map(|((lk, lv), (rk, rv))| lk.cmp(rk).then_with(|| collate(lv, rv)))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
