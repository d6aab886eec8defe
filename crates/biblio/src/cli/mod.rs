//! CLI support for the `biblio` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
