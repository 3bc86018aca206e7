use std::borrow;

use include_dir::{include_dir, Dir};
use liquid::Template;

use super::liquid_exts::{CategoryQueryFilterParser, JsonFilterParser, UrlHostFilterParser};
use crate::error::{DirectoryError, Result};

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

#[derive(Default, Debug, Clone, Copy)]
struct StaticTemplateSource;

impl liquid::partials::PartialSource for StaticTemplateSource {
    fn contains(&self, name: &str) -> bool {
        TEMPLATE_DIR.get_file(name).is_some()
    }

    fn names(&self) -> Vec<&str> {
        vec![]
    }

    fn try_get<'a>(&'a self, name: &str) -> Option<borrow::Cow<'a, str>> {
        match TEMPLATE_DIR.get_file(name) {
            Some(file) => file.contents_utf8().map(borrow::Cow::from),
            _ => None,
        }
    }
}

pub fn build_and_parse(s: &str) -> Result<Template> {
    let parser = liquid::ParserBuilder::with_stdlib()
        .filter(CategoryQueryFilterParser)
        .filter(JsonFilterParser)
        .filter(UrlHostFilterParser)
        .partials(liquid::partials::LazyCompiler::<StaticTemplateSource>::empty())
        .build()?;
    Ok(parser.parse(s)?)
}

fn template_source(name: &str) -> Result<&'static str> {
    TEMPLATE_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| DirectoryError::invariant(format!("missing embedded template {}", name)))
}

pub fn build_and_parse_directory_page() -> Result<Template> {
    build_and_parse(template_source("directory.liquid")?)
}
