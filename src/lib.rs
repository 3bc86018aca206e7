extern crate serde;
extern crate serde_json;

extern crate chrono;
extern crate clap;
extern crate include_dir;
extern crate itertools;
#[macro_use]
extern crate lazy_static;
extern crate liquid;
extern crate tracing;
extern crate tracing_subscriber;
extern crate uuid;

pub mod catalog;
pub mod clock;
pub mod cmd_pipeline;
pub mod config;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod server;
pub mod session;
pub mod templating;
pub mod view;
pub mod view_filter;
