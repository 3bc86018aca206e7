use std::fs;

use serde::Deserialize;
use tracing::info;

use crate::{
    catalog::Catalog,
    error::Result,
    templating::page::PageInfo,
    view::{ViewOptions, DEFAULT_CATEGORY_ROW_LIMIT},
};

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8003";

/// Schema for the config.json file; every field is optional so an empty
/// object (or no file at all) gives the stock directory.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigJson {
    /// Address for `directory-server` to bind, `0.0.0.0:8003` by default.
    pub listen_addr: Option<String>,
    /// JSON file holding an array of resources to use instead of the builtin
    /// catalog.
    pub catalog_path: Option<String>,
    /// How many category buttons the filter row shows.
    pub category_row_limit: Option<usize>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub catalog: Catalog,
    pub view_options: ViewOptions,
    pub page: PageInfo,
}

impl Config {
    pub fn from_json(json: ConfigJson) -> Result<Config> {
        let catalog = match &json.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };
        let defaults = PageInfo::default();

        Ok(Config {
            listen_addr: json
                .listen_addr
                .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            catalog,
            view_options: ViewOptions {
                category_row_limit: json
                    .category_row_limit
                    .unwrap_or(DEFAULT_CATEGORY_ROW_LIMIT),
            },
            page: PageInfo {
                title: json.title.unwrap_or(defaults.title),
                subtitle: json.subtitle.unwrap_or(defaults.subtitle),
            },
        })
    }
}

/// Load the config at `config_path`, or the defaults when there is none.
pub fn load(config_path: Option<&str>) -> Result<Config> {
    let json = match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            info!(path, "loading config");
            serde_json::from_str(&raw)?
        }
        None => ConfigJson::default(),
    };
    Config::from_json(json)
}
