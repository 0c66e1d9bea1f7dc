//! Optional TOML settings file.
//!
//! Every field may be omitted. Values given on the command line take
//! precedence over the file.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use roomcrawl_core::{Difficulty, DifficultyProfile};
use serde::Deserialize;

/// Contents of a settings file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) levels: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) arm_length: Option<u32>,
    pub(crate) ticks: Option<u64>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) profile: ProfileOverrides,
}

/// Per-number overrides applied on top of the selected difficulty preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ProfileOverrides {
    player_health: Option<i32>,
    boss_health: Option<f32>,
    enemy_health: Option<f32>,
    enemy_shot_delay: Option<u32>,
    enemy_speed: Option<i32>,
}

impl Settings {
    /// Reads and parses the settings file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(contents).context("failed to parse settings toml contents")?;
        if settings.arm_length == Some(0) {
            bail!("arm_length must be at least 1");
        }
        if settings.profile.enemy_shot_delay == Some(0) {
            bail!("profile.enemy_shot_delay must be at least 1");
        }
        if settings.profile.player_health.is_some_and(|health| health <= 0) {
            bail!("profile.player_health must be positive");
        }
        Ok(settings)
    }
}

impl ProfileOverrides {
    /// `profile` with every present override written over it.
    pub(crate) fn apply(&self, profile: DifficultyProfile) -> DifficultyProfile {
        DifficultyProfile {
            player_health: self.player_health.unwrap_or(profile.player_health),
            boss_health: self.boss_health.unwrap_or(profile.boss_health),
            enemy_health: self.enemy_health.unwrap_or(profile.enemy_health),
            enemy_shot_delay: self.enemy_shot_delay.unwrap_or(profile.enemy_shot_delay),
            enemy_speed: self.enemy_speed.unwrap_or(profile.enemy_speed),
        }
    }
}
