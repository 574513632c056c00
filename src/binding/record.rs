use std::collections::BTreeMap;

use super::{HostObject, Method, dispatch};
use crate::error::EvalError;
use crate::value::Value;

/// String-keyed mapping exposed to expressions.
///
/// Entries are reachable both as members (`order.customer`) and through the
/// indexer (`order["customer"]`), which looks up the text of its argument.
/// JSON objects convert to records.
///
/// # Examples
///
/// ```
/// use dynexpr::{Record, Value, evaluate};
///
/// let root = Record::new()
///     .with("Country", "China")
///     .with("Company", "Alibaba");
///
/// let result = evaluate("Country + \".\" + Company", &root.into()).unwrap();
/// assert_eq!(result, Value::from("China.Alibaba"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

static RECORD_METHODS: &[Method<Record>] = &[
    Method { name: "ContainsKey", arity: 1, call: record_contains_key },
    Method { name: "Keys", arity: 0, call: record_keys },
];

fn record_contains_key(record: &Record, args: &[Value]) -> Result<Value, EvalError> {
    let key = args.first().map(Value::to_text).unwrap_or_default();
    Ok(Value::Boolean(record.fields.contains_key(&key)))
}

fn record_keys(record: &Record, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Sequence(
        record.fields.keys().map(|k| Value::from(k.as_str())).collect(),
    ))
}

impl HostObject for Record {
    fn type_name(&self) -> &str {
        "record"
    }

    fn entry(&self, key: &str) -> Option<Value> {
        self.fields.get(key).cloned()
    }

    fn is_mapping(&self) -> bool {
        true
    }

    fn member(&self, name: &str) -> Option<Value> {
        match name {
            "Count" => Some(Value::from(self.fields.len())),
            _ => None,
        }
    }

    fn invoke(&self, name: &str, args: &[Value]) -> Option<Result<Value, EvalError>> {
        dispatch(self, RECORD_METHODS, name, args)
    }

    fn structural_eq(&self, other: &dyn HostObject) -> bool {
        let other: &dyn std::any::Any = other;
        other.downcast_ref::<Record>().is_some_and(|other| self == other)
    }

    fn to_text(&self) -> String {
        let entries: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v.to_text()))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}
