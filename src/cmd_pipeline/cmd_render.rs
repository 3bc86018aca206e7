use async_trait::async_trait;
use clap::Args;
use serde_json::Value;

use super::interface::{PipelineCommand, PipelineContext, PipelineValues, TextFile};
use crate::{
    error::Result,
    templating::{builder::build_and_parse_directory_page, page::render_page},
};

/// Render the directory page as the server would serve it.
#[derive(Debug, Args)]
pub struct Render {}

#[derive(Debug)]
pub struct RenderCommand {
    #[allow(dead_code)]
    pub args: Render,
}

#[async_trait]
impl PipelineCommand for RenderCommand {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        _input: PipelineValues,
    ) -> Result<PipelineValues> {
        let template = build_and_parse_directory_page()?;
        let contents = render_page(
            &template,
            &context.page,
            &context.view.snapshot(),
            Value::Null,
        )?;
        Ok(PipelineValues::TextFile(TextFile {
            mime_type: "text/html".to_string(),
            contents,
        }))
    }
}
