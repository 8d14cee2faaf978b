//! What flows between stages: a concrete value or a lazy sequence.

use std::fmt;

use crate::error::Result;
use crate::value::Value;

/// A single-pass, forward-only sequence of values.
///
/// Items are produced on demand. Errors that can only be discovered while
/// producing (a file that fails to open halfway through a list) are yielded
/// in place, so the consumer sees them in order. A sequence cannot be
/// restarted: once drained, it stays empty.
pub struct Sequence {
    inner: Box<dyn Iterator<Item = Result<Value>>>,
}

impl Sequence {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<Value>> + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }

    /// Wrap infallible values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Self::new(values.into_iter().map(Ok))
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Iterator for Sequence {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sequence { .. }")
    }
}

/// A pipeline value: already materialized, or still lazy.
#[derive(Debug)]
pub enum Flow {
    Value(Value),
    Stream(Sequence),
}

impl Flow {
    /// View this flow as a sequence of elements.
    ///
    /// A concrete value is iterated the way `Value::into_items` describes;
    /// a stream is returned as is.
    pub fn into_sequence(self) -> Result<Sequence> {
        match self {
            Flow::Stream(seq) => Ok(seq),
            Flow::Value(value) => Ok(Sequence::from_values(value.into_items()?)),
        }
    }

    /// Collapse into a concrete value, draining a stream into a list.
    pub fn materialize(self) -> Result<Value> {
        match self {
            Flow::Value(value) => Ok(value),
            Flow::Stream(seq) => Ok(Value::List(seq.collect::<Result<Vec<_>>>()?)),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Flow::Value(value) => Some(value),
            Flow::Stream(_) => None,
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Flow::Stream(_))
    }
}

impl From<Value> for Flow {
    fn from(value: Value) -> Self {
        Flow::Value(value)
    }
}

impl From<Sequence> for Flow {
    fn from(seq: Sequence) -> Self {
        Flow::Stream(seq)
    }
}

impl From<&str> for Flow {
    fn from(s: &str) -> Self {
        Flow::Value(Value::from(s))
    }
}

impl From<String> for Flow {
    fn from(s: String) -> Self {
        Flow::Value(Value::from(s))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Flow {
    fn from(items: Vec<T>) -> Self {
        Flow::Value(Value::from(items))
    }
}
