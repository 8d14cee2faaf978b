//! Collectors: stages that materialize a sequence into a container.
//!
//! `ASLIST`, `ASTUPLE`, `ASDICT` and `ASSTRING` are opaque stages (no declared
//! signature), so calling one standalone always runs it. With no argument the
//! list, tuple and map collectors return an empty container; `ASSTRING` needs
//! its input.

use crate::arg::Bound;
use crate::error::{PipeError, Result};
use crate::flow::{Flow, Sequence};
use crate::stage::{Param, Stage};
use crate::value::{Dict, Value};

pub const ASLIST: Stage = Stage::opaque("aslist", to_list);
pub const ASTUPLE: Stage = Stage::opaque("astuple", to_tuple);
pub const ASDICT: Stage = Stage::opaque("asdict", to_map);
pub const ASSTRING: Stage = Stage::opaque("asstring", to_joined_string);

/// Pairs each element with its zero-based position, lazily.
pub const ENUMERATE: Stage = Stage::new("enumerate", &[Param::new("input")], index_pairs);

/// The input sequence, or `None` when the collector was called bare.
fn optional_input(bound: &mut Bound) -> Result<Option<Sequence>> {
    if bound.remaining() == 0 {
        return Ok(None);
    }
    Ok(Some(bound.sequence("iterable")?))
}

fn drain(bound: Bound, items: Option<Sequence>) -> Result<Vec<Value>> {
    bound.finish()?;
    match items {
        Some(items) => items.collect(),
        None => Ok(Vec::new()),
    }
}

fn to_list(mut bound: Bound) -> Result<Flow> {
    let items = optional_input(&mut bound)?;
    Ok(Flow::Value(Value::List(drain(bound, items)?)))
}

fn to_tuple(mut bound: Bound) -> Result<Flow> {
    let items = optional_input(&mut bound)?;
    Ok(Flow::Value(Value::Tuple(drain(bound, items)?)))
}

fn to_map(mut bound: Bound) -> Result<Flow> {
    let items = optional_input(&mut bound)?;
    let mut map = Dict::new();
    for item in drain(bound, items)? {
        match item {
            Value::Tuple(mut pair) | Value::List(mut pair) if pair.len() == 2 => {
                let value = pair.pop().unwrap_or(Value::None);
                let key = pair.pop().unwrap_or(Value::None);
                map.insert(key, value);
            }
            other => return Err(PipeError::NotAPair(other.repr())),
        }
    }
    Ok(Flow::Value(Value::Map(map)))
}

fn to_joined_string(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("iterable")?;
    bound.finish()?;
    let mut joined = String::new();
    for item in items {
        match item? {
            Value::Str(s) => joined.push_str(&s),
            other => {
                return Err(PipeError::ElementType {
                    expected: "str",
                    found: other.kind(),
                });
            }
        }
    }
    Ok(Flow::Value(Value::Str(joined)))
}

fn index_pairs(mut bound: Bound) -> Result<Flow> {
    let items = bound.sequence("input")?;
    let pairs = items
        .zip(0i64..)
        .map(|(item, i)| item.map(|value| Value::Tuple(vec![Value::Int(i), value])));
    Ok(Flow::Stream(Sequence::new(pairs)))
}
