use clap::{Parser, Subcommand, ValueEnum};

use super::cmd_activate::Activate;
use super::cmd_categories::Categories;
use super::cmd_hover::{HoverEnter, HoverLeave};
use super::cmd_render::Render;
use super::cmd_select::Select;
use super::cmd_show::Show;

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Pretty,
    /// Un-pretty-printed JSON.
    Concise,
}

/// Options for one pipeline segment.  `--catalog` and `--output-format` apply
/// to the whole pipeline, so they may only lead its first segment.
#[derive(Debug, Parser)]
pub struct ToolOpts {
    /// JSON file with the resources to list; the builtin startup directory is
    /// used when absent.
    #[clap(long, env = "RESDIR_CATALOG")]
    pub catalog: Option<String>,

    #[clap(long, short, value_enum, ignore_case = true, default_value = "concise")]
    pub output_format: OutputFormat,

    #[clap(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Activate(Activate),
    Categories(Categories),
    HoverEnter(HoverEnter),
    HoverLeave(HoverLeave),
    Render(Render),
    Select(Select),
    Show(Show),
}
