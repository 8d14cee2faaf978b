//! Partial bindings: a stage plus captured arguments awaiting a sequence.

use tracing::trace;

use crate::arg::Arg;
use crate::error::Result;
use crate::flow::Flow;
use crate::stage::Stage;

/// A stage with every parameter but the first already supplied.
///
/// Created by `Stage::call` (one argument short) or `Stage::bind`. The
/// captured arguments are never changed after creation, and completing the
/// binding consumes it.
#[derive(Debug)]
pub struct Partial {
    stage: Stage,
    captured: Vec<Arg>,
}

impl Partial {
    pub(crate) fn new(stage: Stage, captured: Vec<Arg>) -> Self {
        Self { stage, captured }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Number of captured arguments.
    pub fn captured(&self) -> usize {
        self.captured.len()
    }

    /// Run the stage with `input` as its first argument.
    pub fn complete(self, input: Flow) -> Result<Flow> {
        trace!(
            stage = self.stage.name(),
            captured = self.captured.len(),
            "completing partial binding"
        );
        let mut args = Vec::with_capacity(self.captured.len() + 1);
        args.push(Arg::Flow(input));
        args.extend(self.captured);
        self.stage.invoke(args)
    }
}
