//! Hostedit - edit hosts files in place, preserving formatting.

pub mod cli;
pub mod entry;
pub mod error;
pub mod file;
pub mod lock;
pub mod parser;
pub mod platform;
pub mod resource;
