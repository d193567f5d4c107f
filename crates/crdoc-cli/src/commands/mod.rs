//! CLI commands

pub mod catalog;
pub mod deprecated_since;
pub mod releases;
pub mod route;
pub mod show;
