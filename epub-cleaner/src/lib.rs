pub mod cli;
pub mod load_config;
pub mod render;
pub mod upload;
pub mod web;

pub use cli::{run, Cli, Commands};
