use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::Value;

use crate::formats::Preferences;

pub const PREFS_ENV: &str = "BOOKSHELF_PREFS";
pub const DEFAULT_PREFS_PATH: &str = ".bookshelf/prefs.json";
pub const DARK_MODE_KEY: &str = "darkMode";

const CART_ICON_LIGHT: &str = "images/shopping_cart.png";
const CART_ICON_DARK: &str = "images/shopping_cart_dark.png";
const CART_ICON_DARK_AT_STARTUP: &str = "images/white_cart.png";

/// Client-local key/value storage holding the theme flag.
pub trait PreferenceStore {
    fn load(&self) -> anyhow::Result<Preferences>;
    fn save(&mut self, prefs: &Preferences) -> anyhow::Result<()>;
}

/// JSON file on disk. Unknown keys already in the file are preserved.
#[derive(Debug, Clone)]
pub struct LocalFsPreferenceStore {
    path: PathBuf,
}

impl LocalFsPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `--prefs` wins, then `BOOKSHELF_PREFS`, then the default path.
    pub fn resolve(explicit: Option<&str>) -> Self {
        let path = explicit
            .map(str::to_owned)
            .or_else(|| std::env::var(PREFS_ENV).ok())
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_PREFS_PATH.to_owned());
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> anyhow::Result<BTreeMap<String, Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("read: {}", self.path.display()));
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse preferences: {}", self.path.display()))
    }
}

impl PreferenceStore for LocalFsPreferenceStore {
    fn load(&self) -> anyhow::Result<Preferences> {
        let map = self.read_map()?;
        // Stored values are strings ("true"/"false"); accept plain booleans too.
        let dark_mode = match map.get(DARK_MODE_KEY) {
            Some(Value::String(text)) => text == "true",
            Some(Value::Bool(flag)) => *flag,
            _ => false,
        };
        Ok(Preferences { dark_mode })
    }

    fn save(&mut self, prefs: &Preferences) -> anyhow::Result<()> {
        let mut map = self.read_map().unwrap_or_else(|err| {
            tracing::warn!(?err, path = %self.path.display(), "discarding unreadable preferences");
            BTreeMap::new()
        });
        map.insert(
            DARK_MODE_KEY.to_owned(),
            Value::String(prefs.dark_mode.to_string()),
        );
        write_json_atomic(&self.path, &map)
    }
}

/// Volatile store that counts saves.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryPreferenceStore {
    pub(crate) prefs: Preferences,
    pub(crate) saves: usize,
}

#[cfg(test)]
impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> anyhow::Result<Preferences> {
        Ok(self.prefs)
    }

    fn save(&mut self, prefs: &Preferences) -> anyhow::Result<()> {
        self.prefs = *prefs;
        self.saves += 1;
        Ok(())
    }
}

fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    std::fs::write(&tmp_path, &data)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

/// Light/dark presentation state derived from the stored flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    dark_mode: bool,
    toggled: bool,
}

impl Theme {
    pub fn from_prefs(prefs: &Preferences) -> Self {
        Self {
            dark_mode: prefs.dark_mode,
            toggled: false,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark_mode
    }

    /// Flips the theme and persists the new flag.
    pub fn toggle(&mut self, store: &mut dyn PreferenceStore) -> anyhow::Result<bool> {
        self.dark_mode = !self.dark_mode;
        self.toggled = true;
        store
            .save(&Preferences {
                dark_mode: self.dark_mode,
            })
            .context("persist theme preference")?;
        tracing::debug!(dark_mode = self.dark_mode, "theme toggled");
        Ok(self.dark_mode)
    }

    /// Cart badge icon for the current theme.
    pub fn cart_icon(&self) -> &'static str {
        match (self.dark_mode, self.toggled) {
            (true, false) => CART_ICON_DARK_AT_STARTUP,
            (true, true) => CART_ICON_DARK,
            (false, _) => CART_ICON_LIGHT,
        }
    }
}
