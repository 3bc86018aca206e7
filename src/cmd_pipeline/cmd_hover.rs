use async_trait::async_trait;
use clap::Args;

use super::interface::{PipelineCommand, PipelineContext, PipelineValues};
use crate::error::Result;

/// Pointer entered the row of the given resource.
#[derive(Debug, Args)]
pub struct HoverEnter {
    #[clap(value_parser)]
    id: u32,
}

/// Pointer left the row of the given resource.  Ignored unless that resource
/// is the one currently hovered.
#[derive(Debug, Args)]
pub struct HoverLeave {
    #[clap(value_parser)]
    id: u32,
}

#[derive(Debug)]
pub struct HoverEnterCommand {
    pub args: HoverEnter,
}

#[derive(Debug)]
pub struct HoverLeaveCommand {
    pub args: HoverLeave,
}

#[async_trait]
impl PipelineCommand for HoverEnterCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let summary = context.view.hover_enter(self.args.id)?;
        Ok(PipelineValues::Interaction(summary))
    }
}

#[async_trait]
impl PipelineCommand for HoverLeaveCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let summary = context.view.hover_leave(self.args.id)?;
        Ok(PipelineValues::Interaction(summary))
    }
}
