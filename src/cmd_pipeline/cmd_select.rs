use async_trait::async_trait;
use clap::Args;

use super::interface::{PipelineCommand, PipelineContext, PipelineValues};
use crate::error::Result;

/// Make a category the active filter.  `All` clears the filter.
#[derive(Debug, Args)]
pub struct Select {
    /// Category label as listed by `categories`; matched case-insensitively if
    /// there's no exact match.
    #[clap(value_parser)]
    category: String,
}

#[derive(Debug)]
pub struct SelectCommand {
    pub args: Select,
}

#[async_trait]
impl PipelineCommand for SelectCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let summary = context.view.select_category(&self.args.category)?;
        Ok(PipelineValues::Interaction(summary))
    }
}
