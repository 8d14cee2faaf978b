//! Stage definitions and the invocation contract.
//!
//! A `Stage` pairs a transformation with its declared parameter list. The
//! first parameter is always the incoming sequence. Calling a stage with
//! every parameter runs it immediately; calling it with one fewer captures
//! the arguments in a `Partial` that the chain operator completes later.

use tracing::debug;

use crate::arg::{Arg, Args, Bound};
use crate::binding::Partial;
use crate::error::{PipeError, Result};
use crate::flow::Flow;

/// The function behind a stage. Receives its arguments in declared order.
pub type Transform = fn(Bound) -> Result<Flow>;

/// Converts or validates a captured argument at invocation time.
pub type Prepare = fn(Arg) -> Result<Arg>;

/// A declared positional parameter.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    name: &'static str,
    prepare: Option<Prepare>,
}

impl Param {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            prepare: None,
        }
    }

    /// Attach a hook run on this parameter's argument as soon as it is supplied.
    pub const fn prepared(self, prepare: Prepare) -> Self {
        Self {
            name: self.name,
            prepare: Some(prepare),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, arg: Arg) -> Result<Arg> {
        match self.prepare {
            Some(prepare) => prepare(arg),
            None => Ok(arg),
        }
    }
}

/// Result of invoking a stage.
#[derive(Debug)]
pub enum Applied {
    /// Every parameter was supplied; the transformation ran.
    Ran(Flow),
    /// One parameter short; waiting for the upstream sequence.
    Awaiting(Partial),
}

impl Applied {
    /// The flow produced by a full invocation.
    ///
    /// A partial binding here means the caller supplied one argument too few
    /// for a standalone call.
    pub fn into_flow(self) -> Result<Flow> {
        match self {
            Applied::Ran(flow) => Ok(flow),
            Applied::Awaiting(partial) => Err(PipeError::Arity {
                stage: partial.stage().name(),
                expected: partial.stage().required_count(),
                actual: partial.captured(),
            }),
        }
    }

    pub fn into_partial(self) -> Option<Partial> {
        match self {
            Applied::Awaiting(partial) => Some(partial),
            Applied::Ran(_) => None,
        }
    }
}

/// A named transformation with a declared parameter list.
///
/// Stages hold no per-call state and are `Copy`; define them once as
/// constants and share them freely.
#[derive(Clone, Copy)]
pub struct Stage {
    name: &'static str,
    params: &'static [Param],
    transform: Transform,
}

impl Stage {
    pub const fn new(name: &'static str, params: &'static [Param], transform: Transform) -> Self {
        Self {
            name,
            params,
            transform,
        }
    }

    /// A stage with no declared signature.
    ///
    /// Its required count is zero, so every call runs it immediately with
    /// whatever arguments were given. Used to adapt container constructors.
    pub const fn opaque(name: &'static str, transform: Transform) -> Self {
        Self::new(name, &[], transform)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn params(&self) -> &'static [Param] {
        self.params
    }

    /// Minimum number of arguments, counting the leading sequence.
    pub fn required_count(&self) -> usize {
        self.params.len()
    }

    /// Invoke with `args`: run now, capture for later, or fail.
    pub fn call(&self, args: Args) -> Result<Applied> {
        let required = self.required_count();
        let supplied = args.len();

        if supplied >= required {
            debug!(stage = self.name, supplied, "running stage");
            let resolved = if required == 0 {
                passthrough(args)
            } else {
                self.resolve(args, 0)?
            };
            return self.invoke(resolved).map(Applied::Ran);
        }

        if supplied + 1 == required {
            return self.bind(args).map(Applied::Awaiting);
        }

        Err(PipeError::Arity {
            stage: self.name,
            expected: required,
            actual: supplied,
        })
    }

    /// Capture exactly `required_count() - 1` arguments.
    pub fn bind(&self, args: Args) -> Result<Partial> {
        let required = self.required_count();
        if required == 0 || args.len() + 1 != required {
            return Err(PipeError::Arity {
                stage: self.name,
                expected: required,
                actual: args.len(),
            });
        }
        debug!(stage = self.name, captured = args.len(), "binding partial stage");
        Ok(Partial::new(*self, self.resolve(args, 1)?))
    }

    /// Capture arguments without checking them against the signature.
    ///
    /// Positional arguments still pass through their parameter's prepare hook
    /// when one exists at that position; named arguments are appended as given.
    pub fn bind_unchecked(&self, args: Args) -> Result<Partial> {
        let mut captured = Vec::with_capacity(args.len());
        for (i, arg) in args.positional.into_iter().enumerate() {
            match self.params.get(i + 1) {
                Some(param) => captured.push(param.apply(arg)?),
                None => captured.push(arg),
            }
        }
        captured.extend(args.named.into_iter().map(|(_, arg)| arg));
        debug!(stage = self.name, captured = captured.len(), "binding unchecked stage");
        Ok(Partial::new(*self, captured))
    }

    pub(crate) fn invoke(&self, args: Vec<Arg>) -> Result<Flow> {
        (self.transform)(Bound::new(self.name, args))
    }

    /// Place arguments into parameter slots starting at `offset`.
    ///
    /// Slots below `offset` are left for the caller to fill; naming one of
    /// them is a binding error.
    fn resolve(&self, args: Args, offset: usize) -> Result<Vec<Arg>> {
        let required = self.required_count();
        let supplied = args.len();
        let mut slots: Vec<Option<Arg>> = std::iter::repeat_with(|| None).take(required).collect();

        for (i, arg) in args.positional.into_iter().enumerate() {
            let slot = slots.get_mut(offset + i).ok_or(PipeError::Arity {
                stage: self.name,
                expected: required,
                actual: supplied,
            })?;
            *slot = Some(arg);
        }

        for (name, arg) in args.named {
            let index = self
                .params
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| self.binding_error(&name, "unknown"))?;
            if index < offset {
                return Err(self.binding_error(&name, "upstream sequence fills"));
            }
            if slots[index].is_some() {
                return Err(self.binding_error(&name, "multiple values for"));
            }
            slots[index] = Some(arg);
        }

        let mut resolved = Vec::with_capacity(required - offset);
        for (param, slot) in self.params.iter().zip(slots).skip(offset) {
            let arg = slot.ok_or(PipeError::Arity {
                stage: self.name,
                expected: required,
                actual: supplied,
            })?;
            resolved.push(param.apply(arg)?);
        }
        Ok(resolved)
    }

    fn binding_error(&self, name: &str, reason: &'static str) -> PipeError {
        PipeError::Binding {
            stage: self.name,
            name: name.to_string(),
            reason,
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.params.iter().map(|p| p.name).collect();
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("params", &names)
            .finish()
    }
}

fn passthrough(args: Args) -> Vec<Arg> {
    let mut all = args.positional;
    all.extend(args.named.into_iter().map(|(_, arg)| arg));
    all
}
