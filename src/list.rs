use std::io::Write as _;

use anyhow::Context as _;

use crate::browser::Browser;
use crate::cli::{CategoriesArgs, GlobalArgs, ListArgs, OutputFormat};
use crate::prefs::PreferenceStore as _;
use crate::render::VecSink;
use crate::terminal::TextTableSink;

/// Builds a browser from the global options, with the stored preferences applied.
pub fn open_browser(global: &GlobalArgs) -> Browser {
    let store = global.prefs_store();
    let prefs = store.load().unwrap_or_else(|err| {
        tracing::warn!(?err, path = %store.path().display(), "ignoring unreadable preferences");
        Default::default()
    });
    Browser::new(global.browser_config(), &prefs)
}

pub async fn run(global: &GlobalArgs, args: ListArgs) -> anyhow::Result<()> {
    let source = global.catalog_source().context("parse --source")?;
    let mut browser = open_browser(global);

    let loaded = browser.load(&source).await;
    if loaded.is_ok() {
        if let Some(category) = args.category.as_deref() {
            browser.apply_category_filter(category);
        }
        if let Some(search) = args.search.as_deref() {
            browser.search(search);
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => browser.present(&mut TextTableSink::new(&mut out))?,
        OutputFormat::Json => {
            let mut sink = VecSink::default();
            browser.present(&mut sink)?;
            serde_json::to_writer_pretty(&mut out, &sink.rows).context("serialize rows")?;
            writeln!(out).context("write stdout")?;
        }
    }
    out.flush().context("flush stdout")?;

    loaded.map(|_| ()).context("load catalog")
}

pub async fn categories(global: &GlobalArgs, args: CategoriesArgs) -> anyhow::Result<()> {
    let source = global.catalog_source().context("parse --source")?;
    let mut browser = open_browser(global);
    browser.load(&source).await.context("load catalog")?;

    let options = browser.category_options();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => {
            for option in &options {
                writeln!(out, "{}\t{}", option.value, option.label).context("write stdout")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &options).context("serialize categories")?;
            writeln!(out).context("write stdout")?;
        }
    }
    out.flush().context("flush stdout")?;
    Ok(())
}
