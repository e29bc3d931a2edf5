//! TOML client configuration.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use snake_arena_system_sync::StalePolicy;
use std::{fs, path::Path, time::Duration};

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// How the bridge treats snapshots older than the one it holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum StalePolicySetting {
    #[default]
    RejectOlder,
    AlwaysOverwrite,
}

impl From<StalePolicySetting> for StalePolicy {
    fn from(setting: StalePolicySetting) -> Self {
        match setting {
            StalePolicySetting::RejectOlder => StalePolicy::RejectOlder,
            StalePolicySetting::AlwaysOverwrite => StalePolicy::AlwaysOverwrite,
        }
    }
}

/// Settings read from the optional `--config` file. Every key is optional.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ClientConfig {
    pub(crate) version: u32,
    pub(crate) player_id: String,
    pub(crate) window_title: String,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) stale_policy: StalePolicySetting,
    pub(crate) replay_interval_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            player_id: "player-1".to_owned(),
            window_title: "Snake Arena".to_owned(),
            vsync: true,
            show_fps: false,
            stale_policy: StalePolicySetting::default(),
            replay_interval_ms: 100,
        }
    }
}

impl ClientConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read client config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid client config at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).context("failed to parse client config toml contents")?;
        if config.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported client config version {}; expected {}",
                config.version,
                SUPPORTED_CONFIG_VERSION
            );
        }
        if config.player_id.trim().is_empty() {
            bail!("player_id must not be empty");
        }
        Ok(config)
    }

    pub(crate) fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }
}
