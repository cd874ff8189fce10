//! CLI commands

pub mod create;
pub mod list;
pub mod print;
pub mod write;
