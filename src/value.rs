//! Concrete values carried between stages.
//!
//! A `Value` is the materialized side of a pipeline: what collectors build
//! and what lazy sequences yield item by item.

use std::fmt;

use crate::error::{PipeError, Result};

/// A concrete, comparable datum.
///
/// Values are totally ordered and hashable so that any of them can key a
/// `Map`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(Dict),
}

impl Value {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Map(_) => "map",
        }
    }

    /// Truthiness, used when a mapper result acts as a predicate.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The elements this value yields when used as a sequence.
    ///
    /// Strings yield their characters and maps yield their keys.
    pub fn into_items(self) -> Result<Vec<Value>> {
        match self {
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            Value::List(items) | Value::Tuple(items) => Ok(items),
            Value::Map(map) => Ok(map.into_keys().collect()),
            other => Err(PipeError::NotIterable { kind: other.kind() }),
        }
    }

    /// Quoted rendering used for values nested inside containers.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            other => other.to_string(),
        }
    }
}

/// Single quotes unless the text holds a `'` and no `"`.
fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// Key/value entries kept in insertion order.
///
/// Inserting a key that is already present replaces its value where it
/// stands. Equality and ordering compare entries in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dict {
    entries: Vec<(Value, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value when `key` was already present.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn into_keys(self) -> impl Iterator<Item = Value> {
        self.entries.into_iter().map(|(k, _)| k)
    }
}

impl FromIterator<(Value, Value)> for Dict {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

fn join_reprs<'a>(items: impl Iterator<Item = &'a Value>) -> String {
    items.map(Value::repr).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write!(f, "[{}]", join_reprs(items.iter())),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0].repr()),
            Value::Tuple(items) => write!(f, "({})", join_reprs(items.iter())),
            Value::Map(map) => {
                let entries = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{entries}}}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_iterates_characters() {
        let items = Value::from("abc").into_items().unwrap();
        assert_eq!(items, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
    }

    #[test]
    fn test_map_iterates_keys() {
        let mut map = Dict::new();
        map.insert(Value::Int(2), Value::from("b"));
        map.insert(Value::Int(1), Value::from("a"));
        let items = Value::Map(map).into_items().unwrap();
        assert_eq!(items, vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn test_scalars_are_not_iterable() {
        let err = Value::Int(3).into_items().unwrap_err();
        assert!(matches!(err, PipeError::NotIterable { kind: "int" }));
        assert!(Value::None.into_items().is_err());
    }

    #[test]
    fn test_display_nests_reprs() {
        let value = Value::List(vec![
            Value::from("it's"),
            Value::Tuple(vec![Value::Int(0)]),
            Value::None,
        ]);
        assert_eq!(value.to_string(), r#"["it's", (0,), None]"#);
        assert_eq!(Value::from("raw").to_string(), "raw");
    }

    #[test]
    fn test_repr_quote_choice_and_escapes() {
        assert_eq!(Value::from("plain").repr(), "'plain'");
        assert_eq!(Value::from(r#"say "hi""#).repr(), r#"'say "hi"'"#);
        assert_eq!(Value::from(r#"a'b"c"#).repr(), r#"'a\'b"c'"#);
        assert_eq!(Value::from("a\r\n\tb\\").repr(), r"'a\r\n\tb\\'");
    }

    #[test]
    fn test_display_map() {
        let mut map = Dict::new();
        map.insert(Value::from("b"), Value::Int(1));
        map.insert(Value::from("a"), Value::Int(2));
        assert_eq!(Value::Map(map).to_string(), "{'b': 1, 'a': 2}");
    }

    #[test]
    fn test_dict_replaces_in_place() {
        let mut map = Dict::new();
        assert_eq!(map.insert(Value::from("x"), Value::Int(1)), None);
        map.insert(Value::from("y"), Value::Int(2));
        assert_eq!(map.insert(Value::from("x"), Value::Int(3)), Some(Value::Int(1)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from("x")), Some(&Value::Int(3)));
        let keys: Vec<Value> = map.into_keys().collect();
        assert_eq!(keys, vec![Value::from("x"), Value::from("y")]);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Bool(true).is_truthy());
    }
}
