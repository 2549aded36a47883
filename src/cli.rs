use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::browser::BrowserConfig;
use crate::loader::{CatalogSource, DEFAULT_SOURCE};
use crate::prefs::LocalFsPreferenceStore;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Catalog document: a local path, a file:// URL or an http(s) URL.
    #[arg(long, global = true, default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Preference file (default: $BOOKSHELF_PREFS or `.bookshelf/prefs.json`).
    #[arg(long, global = true)]
    pub prefs: Option<String>,

    /// Do not offer the synthetic never-matching category option.
    #[arg(long, global = true)]
    pub no_sentinel_category: bool,
}

impl GlobalArgs {
    pub fn catalog_source(&self) -> anyhow::Result<CatalogSource> {
        CatalogSource::parse(&self.source)
    }

    pub fn browser_config(&self) -> BrowserConfig {
        BrowserConfig {
            include_sentinel_category: !self.no_sentinel_category,
        }
    }

    pub fn prefs_store(&self) -> LocalFsPreferenceStore {
        LocalFsPreferenceStore::resolve(self.prefs.as_deref())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the catalog and print the (filtered) table once.
    List(ListArgs),
    /// Print the category selector options.
    Categories(CategoriesArgs),
    /// Interactive session: filter, search, select and fill the cart.
    Shell,
    /// Show or toggle the persisted dark-mode preference.
    Theme(ThemeArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Category to filter by (case-insensitive; empty means all).
    #[arg(long)]
    pub category: Option<String>,

    /// Highlight rows whose title contains this text.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct CategoriesArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ThemeArgs {
    /// Flip the preference and persist it.
    #[arg(long)]
    pub toggle: bool,
}
