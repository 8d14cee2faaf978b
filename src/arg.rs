//! Arguments supplied to stages.
//!
//! `Args` is what a caller hands to `Stage::call`; `Bound` is what a
//! transformation receives once the arguments have been resolved against the
//! stage's declared parameters (with the upstream sequence in front when the
//! call came through the chain operator).

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::error::{PipeError, Result};
use crate::flow::{Flow, Sequence};
use crate::value::Value;

/// A callable argument: mapper for `tr`, predicate for `grep`.
pub type Func = Rc<dyn Fn(&Value) -> Value>;

/// Wrap a closure as a callable argument.
pub fn func<F>(f: F) -> Arg
where
    F: Fn(&Value) -> Value + 'static,
{
    Arg::Func(Rc::new(f))
}

/// One supplied argument.
pub enum Arg {
    Flow(Flow),
    Func(Func),
    Regex(Regex),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Flow(flow) => f.debug_tuple("Flow").field(flow).finish(),
            Arg::Func(_) => f.write_str("Func(..)"),
            Arg::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
        }
    }
}

impl From<Flow> for Arg {
    fn from(flow: Flow) -> Self {
        Arg::Flow(flow)
    }
}

impl From<Sequence> for Arg {
    fn from(seq: Sequence) -> Self {
        Arg::Flow(Flow::Stream(seq))
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Flow(Flow::Value(value))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::from(Value::from(s))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::from(Value::from(s))
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::from(Value::Int(n))
    }
}

impl From<Option<&str>> for Arg {
    fn from(opt: Option<&str>) -> Self {
        Arg::from(Value::from(opt))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::from(Value::from(items))
    }
}

impl From<Regex> for Arg {
    fn from(re: Regex) -> Self {
        Arg::Regex(re)
    }
}

/// Arguments for one stage invocation: positional, then named.
#[derive(Debug, Default)]
pub struct Args {
    pub(crate) positional: Vec<Arg>,
    pub(crate) named: Vec<(String, Arg)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.positional.push(arg.into());
        self
    }

    pub fn named(mut self, name: &str, arg: impl Into<Arg>) -> Self {
        self.named.push((name.to_string(), arg.into()));
        self
    }

    /// Combined count of positional and named arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolved arguments handed to a transformation, consumed in order.
pub struct Bound {
    stage: &'static str,
    args: std::vec::IntoIter<Arg>,
    total: usize,
    taken: usize,
}

impl Bound {
    pub(crate) fn new(stage: &'static str, args: Vec<Arg>) -> Self {
        Self {
            stage,
            total: args.len(),
            args: args.into_iter(),
            taken: 0,
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.taken)
    }

    /// Take the next argument, failing with an arity error if there is none.
    pub fn next_arg(&mut self) -> Result<Arg> {
        self.taken += 1;
        self.args.next().ok_or(PipeError::Arity {
            stage: self.stage,
            expected: self.taken,
            actual: self.total,
        })
    }

    pub fn flow(&mut self, param: &'static str) -> Result<Flow> {
        match self.next_arg()? {
            Arg::Flow(flow) => Ok(flow),
            _ => Err(self.mismatch(param, "a value or sequence")),
        }
    }

    pub fn sequence(&mut self, param: &'static str) -> Result<Sequence> {
        self.flow(param)?.into_sequence()
    }

    pub fn string(&mut self, param: &'static str) -> Result<String> {
        match self.next_arg()? {
            Arg::Flow(Flow::Value(Value::Str(s))) => Ok(s),
            _ => Err(self.mismatch(param, "a string")),
        }
    }

    /// A string, or `None` when the argument is the none value.
    pub fn opt_string(&mut self, param: &'static str) -> Result<Option<String>> {
        match self.next_arg()? {
            Arg::Flow(Flow::Value(Value::Str(s))) => Ok(Some(s)),
            Arg::Flow(Flow::Value(Value::None)) => Ok(None),
            _ => Err(self.mismatch(param, "a string or none")),
        }
    }

    pub fn func(&mut self, param: &'static str) -> Result<Func> {
        match self.next_arg()? {
            Arg::Func(f) => Ok(f),
            _ => Err(self.mismatch(param, "a callable")),
        }
    }

    /// Fail if anything is left over.
    pub fn finish(self) -> Result<()> {
        if self.taken < self.total {
            return Err(PipeError::Arity {
                stage: self.stage,
                expected: self.taken,
                actual: self.total,
            });
        }
        Ok(())
    }

    fn mismatch(&self, param: &'static str, expected: &'static str) -> PipeError {
        PipeError::ArgType {
            stage: self.stage,
            param,
            expected,
        }
    }
}

impl fmt::Debug for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bound")
            .field("stage", &self.stage)
            .field("remaining", &self.remaining())
            .finish()
    }
}
