#![forbid(unsafe_code)]

pub mod book;
pub mod browser;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod filter;
pub mod formats;
pub mod list;
pub mod loader;
pub mod logging;
pub mod prefs;
pub mod prompt;
pub mod render;
pub mod shell;
pub mod terminal;
pub mod theme;
