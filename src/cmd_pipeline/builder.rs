use clap::Parser;
use tracing::{trace, trace_span};

use super::{
    cmd_activate::ActivateCommand,
    cmd_categories::CategoriesCommand,
    cmd_hover::{HoverEnterCommand, HoverLeaveCommand},
    cmd_render::RenderCommand,
    cmd_select::SelectCommand,
    cmd_show::ShowCommand,
    interface::{PipelineCommand, PipelineContext, ViewPipeline},
    parser::{Command, OutputFormat, ToolOpts},
};
use crate::{
    catalog::Catalog,
    error::{DirectoryError, Result},
    interaction::LoggingNavigator,
    templating::page::PageInfo,
    view::{DirectoryView, ViewOptions},
};

pub fn fab_command_from_opts(opts: ToolOpts) -> Box<dyn PipelineCommand + Send + Sync> {
    match opts.cmd {
        Command::Activate(a) => Box::new(ActivateCommand { args: a }),

        Command::Categories(c) => Box::new(CategoriesCommand { args: c }),

        Command::HoverEnter(he) => Box::new(HoverEnterCommand { args: he }),

        Command::HoverLeave(hl) => Box::new(HoverLeaveCommand { args: hl }),

        Command::Render(r) => Box::new(RenderCommand { args: r }),

        Command::Select(s) => Box::new(SelectCommand { args: s }),

        Command::Show(s) => Box::new(ShowCommand { args: s }),
    }
}

/// Split a shell-y string into per-command option sets.
///
/// The shell-words module is used to parse `arg_str` into shell words, which we
/// then break into separate sub-commands whenever we see a `|`.  Each
/// sub-command is handed to clap with our binary name stuffed into the first
/// arg.
pub fn parse_pipeline_opts(bin_name: &str, arg_str: &str) -> Result<Vec<ToolOpts>> {
    let span = trace_span!("parse_pipeline_opts", arg_str);
    let _span_guard = span.enter();

    let all_args = shell_words::split(arg_str)
        .map_err(|err| DirectoryError::bad_input(err.to_string()))?;

    let mut all_opts = vec![];
    for (i, arg_slices) in all_args.split(|v| v == "|").enumerate() {
        // Everything before the subcommand is a `ToolOpts` option, and those
        // describe the whole pipeline.
        if i > 0 && arg_slices.first().map_or(false, |arg| arg.starts_with('-')) {
            return Err(DirectoryError::bad_input(format!(
                "{} is only accepted before the first command of a pipeline",
                arg_slices[0]
            )));
        }

        let mut fake_args = vec![bin_name.to_string()];
        fake_args.extend(arg_slices.iter().cloned());

        let opts = ToolOpts::try_parse_from(fake_args)
            .map_err(|err| DirectoryError::bad_input(err.to_string()))?;
        trace!(cmd = ?opts.cmd);
        all_opts.push(opts);
    }

    Ok(all_opts)
}

/// Build a pipeline over a fresh view of the catalog named by the first
/// segment's `--catalog` (or the builtin one).
pub fn build_pipeline(bin_name: &str, arg_str: &str) -> Result<(ViewPipeline, OutputFormat)> {
    let all_opts = parse_pipeline_opts(bin_name, arg_str)?;

    // `parse_pipeline_opts` always yields at least one segment or fails.
    let first = all_opts
        .first()
        .ok_or_else(|| DirectoryError::invariant("empty pipeline"))?;
    let catalog = match &first.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    let output_format = first.output_format.clone();

    let context = PipelineContext {
        view: DirectoryView::new(catalog, Box::new(LoggingNavigator), ViewOptions::default()),
        page: PageInfo::default(),
    };
    Ok((assemble(context, all_opts), output_format))
}

/// Build a pipeline over an existing context, ignoring any `--catalog`.
pub fn build_pipeline_with_context(
    context: PipelineContext,
    bin_name: &str,
    arg_str: &str,
) -> Result<ViewPipeline> {
    let all_opts = parse_pipeline_opts(bin_name, arg_str)?;
    Ok(assemble(context, all_opts))
}

fn assemble(context: PipelineContext, all_opts: Vec<ToolOpts>) -> ViewPipeline {
    ViewPipeline {
        context,
        commands: all_opts.into_iter().map(fab_command_from_opts).collect(),
    }
}
