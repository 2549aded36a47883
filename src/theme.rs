use std::io::Write as _;

use anyhow::Context as _;

use crate::cli::{GlobalArgs, ThemeArgs};
use crate::prefs::{PreferenceStore as _, Theme};

pub fn run(global: &GlobalArgs, args: ThemeArgs) -> anyhow::Result<()> {
    let mut store = global.prefs_store();
    let prefs = store
        .load()
        .with_context(|| format!("load preferences: {}", store.path().display()))?;
    let mut theme = Theme::from_prefs(&prefs);

    if args.toggle {
        theme.toggle(&mut store)?;
        tracing::info!(
            path = %store.path().display(),
            dark_mode = theme.is_dark(),
            "theme preference saved"
        );
    }

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "dark mode: {}; cart icon: {}",
        if theme.is_dark() { "on" } else { "off" },
        theme.cart_icon()
    )
    .context("write stdout")?;
    Ok(())
}
