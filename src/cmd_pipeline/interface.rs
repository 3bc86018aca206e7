use std::fmt::Debug;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::to_string_pretty;
use tracing::{trace, trace_span, Instrument};

pub use crate::error::Result;
use crate::{
    templating::page::PageInfo,
    view::{Activation, CategoryChip, DirectoryView, InteractionSummary, ViewSnapshot},
};

/// The derived categories, sentinel first.
#[derive(Serialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryChip>,
}

/// A rendered document.
#[derive(Serialize)]
pub struct TextFile {
    pub mime_type: String,
    pub contents: String,
}

#[derive(Serialize)]
pub enum PipelineValues {
    Interaction(InteractionSummary),
    Activation(Activation),
    CategoryList(CategoryList),
    View(ViewSnapshot),
    TextFile(TextFile),
    Void,
}

/// Everything a pipeline step may read or mutate.  There is exactly one view
/// per pipeline and the steps run strictly one after another, which is the
/// same one-event-at-a-time model the server's session provides.
pub struct PipelineContext {
    pub view: DirectoryView,
    pub page: PageInfo,
}

/// A command that takes a single input and produces a single output.  Most of
/// our commands are UI events that ignore their input; `show` and `render`
/// look at the view as left by the steps before them.
#[async_trait]
pub trait PipelineCommand: Debug {
    async fn execute(
        &self,
        context: &mut PipelineContext,
        input: PipelineValues,
    ) -> Result<PipelineValues>;
}

pub struct ViewPipeline {
    pub context: PipelineContext,
    pub commands: Vec<Box<dyn PipelineCommand + Send + Sync>>,
}

impl ViewPipeline {
    pub async fn run(mut self, traced: bool) -> Result<PipelineValues> {
        let mut cur_values = PipelineValues::Void;

        for cmd in &self.commands {
            let span = trace_span!("run_pipeline_step", cmd = ?cmd);

            match cmd
                .execute(&mut self.context, cur_values)
                .instrument(span.clone())
                .await
            {
                Ok(next_values) => {
                    cur_values = next_values;
                }
                Err(err) => {
                    trace!(err = ?err);
                    return Err(err);
                }
            }

            let _span_guard = span.entered();
            if traced {
                if let Ok(value_str) = to_string_pretty(&cur_values) {
                    trace!(output_json = %value_str);
                }
            }
        }

        Ok(cur_values)
    }
}
