pub mod builder;
pub mod liquid_exts;
pub mod page;
