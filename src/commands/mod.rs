//! CLI command implementations

pub mod clean;
pub mod generate;
pub mod render;
pub mod serve;
pub mod validate;
