//! The chain operator and a builder for left-to-right composition.
//!
//! ```
//! use shelike_rs::{Pipeline, Value, collect, stages};
//!
//! let lines = Pipeline::new(vec!["apple", "banana", "avocado"])
//!     .through(stages::grep("a").unwrap())
//!     .through(&collect::ASLIST)
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(lines.as_value(), Some(&Value::from(vec!["apple", "avocado"])));
//! ```

use tracing::trace;

use crate::binding::Partial;
use crate::error::{PipeError, Result};
use crate::flow::Flow;
use crate::stage::Stage;

/// The right-hand side of a chain step.
#[derive(Debug)]
pub enum Target {
    /// A bare stage; only valid when its required count is 0 or 1.
    Stage(Stage),
    Partial(Partial),
}

impl From<Stage> for Target {
    fn from(stage: Stage) -> Self {
        Target::Stage(stage)
    }
}

impl From<&Stage> for Target {
    fn from(stage: &Stage) -> Self {
        Target::Stage(*stage)
    }
}

impl From<Partial> for Target {
    fn from(partial: Partial) -> Self {
        Target::Partial(partial)
    }
}

/// Feed `input` as the first argument of `target`.
///
/// The result is returned exactly as the stage produced it; lazy output
/// stays lazy.
pub fn chain(input: impl Into<Flow>, target: impl Into<Target>) -> Result<Flow> {
    let input = input.into();
    match target.into() {
        Target::Partial(partial) => partial.complete(input),
        Target::Stage(stage) if stage.required_count() <= 1 => {
            trace!(stage = stage.name(), "chaining bare stage");
            stage.invoke(vec![input.into()])
        }
        Target::Stage(stage) => Err(PipeError::Arity {
            stage: stage.name(),
            expected: stage.required_count(),
            actual: 1,
        }),
    }
}

/// Left-associative chain builder.
///
/// Each `through` step feeds the previous result into the next target. The
/// first error is kept and later steps are skipped.
#[derive(Debug)]
pub struct Pipeline {
    state: Result<Flow>,
    steps: usize,
}

impl Pipeline {
    pub fn new(input: impl Into<Flow>) -> Self {
        Self {
            state: Ok(input.into()),
            steps: 0,
        }
    }

    /// Start from the result of a standalone stage call.
    pub fn start(input: Result<Flow>) -> Self {
        Self {
            state: input,
            steps: 0,
        }
    }

    pub fn through(self, target: impl Into<Target>) -> Self {
        let steps = self.steps + 1;
        let state = match self.state {
            Ok(flow) => chain(flow, target),
            Err(e) => Err(e),
        };
        Self { state, steps }
    }

    /// Number of chain steps applied so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn finish(self) -> Result<Flow> {
        self.state
    }
}
