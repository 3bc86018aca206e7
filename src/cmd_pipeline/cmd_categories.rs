use async_trait::async_trait;
use clap::Args;

use super::interface::{CategoryList, PipelineCommand, PipelineContext, PipelineValues};
use crate::error::Result;

/// List every category derived from the catalog, `All` first.
#[derive(Debug, Args)]
pub struct Categories {
    /// Only list the categories that get a button in the filter row.
    #[clap(long, action)]
    shown_only: bool,
}

#[derive(Debug)]
pub struct CategoriesCommand {
    pub args: Categories,
}

#[async_trait]
impl PipelineCommand for CategoriesCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let categories = context
            .view
            .snapshot()
            .categories
            .into_iter()
            .filter(|chip| chip.shown || !self.args.shown_only)
            .collect();
        Ok(PipelineValues::CategoryList(CategoryList { categories }))
    }
}
