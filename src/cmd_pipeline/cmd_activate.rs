use async_trait::async_trait;
use clap::Args;

use super::interface::{PipelineCommand, PipelineContext, PipelineValues};
use crate::error::Result;

/// Open a resource, as a click on its row would.  The output names what the
/// navigator was asked to open; the view itself is unchanged.
#[derive(Debug, Args)]
pub struct Activate {
    #[clap(value_parser)]
    id: u32,
}

#[derive(Debug)]
pub struct ActivateCommand {
    pub args: Activate,
}

#[async_trait]
impl PipelineCommand for ActivateCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let activation = context.view.activate(self.args.id)?;
        Ok(PipelineValues::Activation(activation))
    }
}
