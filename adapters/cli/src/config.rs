//! Optional TOML configuration for the `tileslide` binary.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tileslide_assets::{Catalog, CatalogManifest};
use tileslide_system_controller::{ControllerConfig, ShuffleMoves};

const DEFAULT_ASSET_ROOT: &str = "assets";

/// Settings read from a configuration file. Every table is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) timing: TimingSection,
    pub(crate) shuffle: ShuffleSection,
    pub(crate) assets: AssetsSection,
    pub(crate) catalog: Option<CatalogManifest>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TimingSection {
    pub(crate) debounce_ms: u64,
    pub(crate) slide_ms: u64,
    pub(crate) flash_ms: u64,
    pub(crate) notice_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        let defaults = ControllerConfig::default();
        Self {
            debounce_ms: millis(defaults.debounce),
            slide_ms: millis(defaults.slide_duration),
            flash_ms: millis(defaults.flash_duration),
            notice_ms: millis(defaults.notice_duration),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ShuffleSection {
    pub(crate) easy: u32,
    pub(crate) medium: u32,
    pub(crate) hard: u32,
    pub(crate) seed: Option<u64>,
}

impl Default for ShuffleSection {
    fn default() -> Self {
        let defaults = ShuffleMoves::default();
        Self {
            easy: defaults.three,
            medium: defaults.four,
            hard: defaults.five,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AssetsSection {
    pub(crate) root: PathBuf,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ASSET_ROOT),
        }
    }
}

impl GameConfig {
    /// Reads the configuration file, or returns defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (label, moves) in [
            ("easy", self.shuffle.easy),
            ("medium", self.shuffle.medium),
            ("hard", self.shuffle.hard),
        ] {
            ensure!(moves > 0, "shuffle depth for {label} puzzles must be positive");
        }
        ensure!(
            self.timing.notice_ms > 0,
            "notice duration must be positive"
        );
        Ok(())
    }

    /// Controller settings, with an optional seed taking precedence over the file.
    pub(crate) fn controller(&self, seed_override: Option<u64>) -> ControllerConfig {
        let defaults = ControllerConfig::default();
        ControllerConfig {
            debounce: Duration::from_millis(self.timing.debounce_ms),
            slide_duration: Duration::from_millis(self.timing.slide_ms),
            flash_duration: Duration::from_millis(self.timing.flash_ms),
            notice_duration: Duration::from_millis(self.timing.notice_ms),
            shuffle_moves: ShuffleMoves {
                three: self.shuffle.easy,
                four: self.shuffle.medium,
                five: self.shuffle.hard,
            },
            seed: seed_override.or(self.shuffle.seed).unwrap_or(defaults.seed),
        }
    }

    /// Catalog from the `[catalog]` table, or the built-in one.
    pub(crate) fn catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(manifest) => {
                Catalog::from_manifest(manifest.clone()).context("invalid [catalog] table")
            }
            None => Ok(Catalog::builtin()),
        }
    }

    /// Asset directory, with an optional override taking precedence over the file.
    pub(crate) fn asset_root(&self, root_override: Option<&Path>) -> PathBuf {
        root_override.map_or_else(|| self.assets.root.clone(), Path::to_path_buf)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
