use async_trait::async_trait;
use clap::Args;

use super::interface::{PipelineCommand, PipelineContext, PipelineValues};
use crate::{clock::ClockReading, error::Result};

/// Output the view model: visible rows with their emphasis flags, the
/// category chips and the item count.
#[derive(Debug, Args)]
pub struct Show {
    /// Stamp the current wall-clock time into the view first.  Off by default
    /// so that output is reproducible.
    #[clap(long, action)]
    with_clock: bool,
}

#[derive(Debug)]
pub struct ShowCommand {
    pub args: Show,
}

#[async_trait]
impl PipelineCommand for ShowCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        if self.args.with_clock {
            context.view.set_clock(ClockReading::now());
        }
        Ok(PipelineValues::View(context.view.snapshot()))
    }
}
