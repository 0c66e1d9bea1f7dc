//! Player stat block, artifacts, and difficulty tuning.

use serde::{Deserialize, Serialize};

/// Difficulty presets selectable when starting a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Generous health, slow enemies that rarely fire.
    Easy,
    /// The default tuning.
    #[default]
    Medium,
    /// Tough enemies that fire constantly.
    Hard,
}

impl Difficulty {
    /// Numbers associated with the preset.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                player_health: 12,
                boss_health: 100.0,
                enemy_health: 25.0,
                enemy_shot_delay: 60,
                enemy_speed: 1,
            },
            Self::Medium => DifficultyProfile {
                player_health: 6,
                boss_health: 200.0,
                enemy_health: 50.0,
                enemy_shot_delay: 10,
                enemy_speed: 2,
            },
            Self::Hard => DifficultyProfile {
                player_health: 6,
                boss_health: 350.0,
                enemy_health: 65.0,
                enemy_shot_delay: 5,
                enemy_speed: 4,
            },
        }
    }
}

/// Tunable numbers that scale a run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Health the player starts with.
    pub player_health: i32,
    /// Health of a freshly spawned boss.
    pub boss_health: f32,
    /// Health of a freshly spawned regular enemy.
    pub enemy_health: f32,
    /// Ticks between shots of an aligned enemy.
    pub enemy_shot_delay: u32,
    /// Pixels an enemy moves per axis per tick.
    pub enemy_speed: i32,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

/// Multipliers and additive bonuses carried by an artifact.
///
/// Integer stats grow by `floor(factor * current)` and never drop below one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactEffect {
    /// Relative change to movement speed.
    pub speed: f32,
    /// Candidate damage coefficient; the larger of this and the current one wins.
    pub coef: f32,
    /// Relative damage bonus, compounded with current damage and coefficient.
    pub damage: f32,
    /// Relative change to bullet speed.
    pub bullet_speed: f32,
    /// Relative change to the firing cooldown.
    pub cooldown: f32,
    /// Health restored.
    pub health: i32,
}

impl ArtifactEffect {
    const fn new(
        speed: f32,
        coef: f32,
        damage: f32,
        bullet_speed: f32,
        cooldown: f32,
        health: i32,
    ) -> Self {
        Self {
            speed,
            coef,
            damage,
            bullet_speed,
            cooldown,
            health,
        }
    }
}

/// Pickups found in artifact rooms, shops, and after the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Heals and adds damage.
    Meat,
    /// Heals.
    Sandwich,
    /// Heals.
    Breakfast,
    /// Heals.
    Soup,
    /// Faster bullets.
    Onion,
    /// Faster bullets and a shorter cooldown.
    Screw,
    /// Adds damage.
    Amulet,
    /// Raises the damage coefficient.
    DeadCat,
    /// Adds a little damage.
    MineralWater,
    /// Damage, a much shorter cooldown, and a heal.
    GoodMorning,
    /// Huge damage at the cost of slow bullets and a long cooldown.
    Eye,
    /// Winning the game.
    Prize,
}

impl ArtifactKind {
    /// Kinds drawn uniformly when an `A` marker spawns.
    pub const RANDOM_POOL: [ArtifactKind; 11] = [
        ArtifactKind::Meat,
        ArtifactKind::Sandwich,
        ArtifactKind::Breakfast,
        ArtifactKind::Soup,
        ArtifactKind::Onion,
        ArtifactKind::Screw,
        ArtifactKind::Amulet,
        ArtifactKind::DeadCat,
        ArtifactKind::MineralWater,
        ArtifactKind::GoodMorning,
        ArtifactKind::Eye,
    ];

    /// Stat changes applied on pickup.
    #[must_use]
    pub const fn effect(self) -> ArtifactEffect {
        match self {
            Self::Meat => ArtifactEffect::new(0.0, 0.0, 1.0, 0.0, 0.0, 1),
            Self::Sandwich | Self::Breakfast | Self::Soup => {
                ArtifactEffect::new(0.0, 0.0, 0.0, 0.0, 0.0, 1)
            }
            Self::Onion => ArtifactEffect::new(0.0, 0.0, 0.0, 0.7, 0.0, 0),
            Self::Screw => ArtifactEffect::new(0.0, 0.0, 0.0, 0.3, -0.2, 0),
            Self::Amulet => ArtifactEffect::new(0.0, 0.0, 1.0, 0.0, 0.0, 0),
            Self::DeadCat => ArtifactEffect::new(0.0, 1.5, 1.0, 0.0, 0.0, 0),
            Self::MineralWater => ArtifactEffect::new(0.0, 0.0, 0.5, 0.0, 0.0, 0),
            Self::GoodMorning => ArtifactEffect::new(0.0, 0.0, 0.5, 0.0, -0.7, 1),
            Self::Eye => ArtifactEffect::new(0.0, 2.0, 4.0, -1.5, 1.25, 0),
            Self::Prize => ArtifactEffect::new(0.0, 0.0, 0.0, 0.0, 0.0, 0),
        }
    }

    /// Whether collecting the artifact ends the run in victory.
    #[must_use]
    pub const fn is_winning(self) -> bool {
        matches!(self, Self::Prize)
    }

    /// Identifier used for sprite lookup and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Meat => "meat",
            Self::Sandwich => "sandwich",
            Self::Breakfast => "breakfast",
            Self::Soup => "soup",
            Self::Onion => "onion",
            Self::Screw => "screw",
            Self::Amulet => "amulet",
            Self::DeadCat => "dead_cat",
            Self::MineralWater => "mineral_water",
            Self::GoodMorning => "good_morning",
            Self::Eye => "eye",
            Self::Prize => "prize",
        }
    }
}

/// The player's mutable stat block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Pixels moved per tick.
    pub speed: i32,
    /// Damage coefficient; the larger candidate always wins.
    pub coef: f32,
    /// Base damage before the coefficient.
    pub damage: f32,
    /// Pixels a player bullet travels per tick.
    pub bullet_speed: i32,
    /// Ticks between shots while a fire key is held.
    pub cooldown: i32,
    /// Remaining health; the run ends when it reaches zero.
    pub health: i32,
}

impl PlayerStats {
    /// Stat block a fresh run begins with.
    #[must_use]
    pub const fn starting(profile: &DifficultyProfile) -> Self {
        Self {
            speed: 5,
            coef: 1.0,
            damage: 3.5,
            bullet_speed: 5,
            cooldown: 21,
            health: profile.player_health,
        }
    }

    /// Damage dealt by a single player bullet.
    #[must_use]
    pub fn attack(&self) -> f32 {
        self.damage * self.coef
    }

    /// Folds an artifact's effect into the stat block.
    pub fn apply_artifact(&mut self, effect: &ArtifactEffect) {
        self.speed = grow(self.speed, effect.speed);
        self.cooldown = grow(self.cooldown, effect.cooldown);
        self.bullet_speed = grow(self.bullet_speed, effect.bullet_speed);
        self.damage += effect.damage * self.damage * self.coef;
        self.coef = self.coef.max(effect.coef);
        self.health += effect.health;
    }
}

fn grow(current: i32, factor: f32) -> i32 {
    let increment = (factor * current as f32).floor() as i32;
    let candidate = current + increment;
    if candidate > 1 {
        candidate
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medium() -> PlayerStats {
        PlayerStats::starting(&Difficulty::Medium.profile())
    }

    #[test]
    fn starting_stats_follow_profile() {
        let stats = PlayerStats::starting(&Difficulty::Easy.profile());
        assert_eq!(stats.health, 12);
        assert_eq!(stats.speed, 5);
        assert_eq!(stats.cooldown, 21);
        assert!((stats.attack() - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn dead_cat_applied_twice_keeps_the_larger_coefficient() {
        let mut stats = medium();
        let effect = ArtifactKind::DeadCat.effect();

        stats.apply_artifact(&effect);
        assert!((stats.coef - 1.5).abs() < f32::EPSILON);
        assert!((stats.damage - 7.0).abs() < 1e-5);

        stats.apply_artifact(&effect);
        assert!((stats.coef - 1.5).abs() < f32::EPSILON);
        assert!((stats.damage - 17.5).abs() < 1e-4);
    }

    #[test]
    fn integer_stats_floor_and_clamp_at_one() {
        let mut stats = medium();
        stats.apply_artifact(&ArtifactKind::Screw.effect());
        assert_eq!(stats.bullet_speed, 6);
        assert_eq!(stats.cooldown, 16);

        stats.apply_artifact(&ArtifactKind::Eye.effect());
        assert_eq!(stats.bullet_speed, 1);
        assert_eq!(stats.cooldown, 36);
        assert!((stats.coef - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn food_restores_health() {
        let mut stats = medium();
        stats.health = 2;
        stats.apply_artifact(&ArtifactKind::Soup.effect());
        stats.apply_artifact(&ArtifactKind::GoodMorning.effect());
        assert_eq!(stats.health, 4);
    }

    #[test]
    fn only_the_prize_wins() {
        assert!(ArtifactKind::Prize.is_winning());
        assert!(ArtifactKind::RANDOM_POOL
            .iter()
            .all(|kind| !kind.is_winning()));
    }

    #[test]
    fn difficulty_profile_survives_binary_encoding() {
        let profile = Difficulty::Hard.profile();
        let bytes = bincode::serialize(&profile).expect("profile encodes");
        let decoded: DifficultyProfile = bincode::deserialize(&bytes).expect("profile decodes");
        assert_eq!(decoded, profile);
    }
}
