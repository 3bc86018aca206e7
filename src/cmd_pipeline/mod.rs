pub mod builder;
pub mod interface;
pub mod parser;

mod cmd_activate;
mod cmd_categories;
mod cmd_hover;
mod cmd_render;
mod cmd_select;
mod cmd_show;

pub use builder::{build_pipeline, build_pipeline_with_context};
pub use interface::{PipelineCommand, PipelineContext, PipelineValues, ViewPipeline};
