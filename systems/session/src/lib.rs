#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session orchestration.
//!
//! [`GameSession`] owns the authoritative world together with the pure
//! systems and drives one simulation tick per call: player control first,
//! then enemy steering, then enemy aiming, then the world's own time step
//! (bullets, artifact pickups, room transitions).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roomcrawl_core::{
    Command, DifficultyProfile, DungeonLayout, Event, InputFrame, PlayerStats, SessionStatus,
    TemplatePool,
};
use roomcrawl_system_enemy_ai::EnemyAi;
use roomcrawl_system_generation::{Config, DungeonGenerator, GenerationError};
use roomcrawl_system_player_control::PlayerControl;
use roomcrawl_world::{apply, query, World};
use tracing::info;

/// Settings fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionConfig {
    /// Difficulty numbers applied to every run.
    pub profile: DifficultyProfile,
    /// Dungeon generation tunables.
    pub generation: Config,
    /// Seed of the first run; later runs draw their seeds from it.
    pub seed: u64,
}

/// A running game: the world, the systems that drive it, and the dungeon source.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    pool: TemplatePool,
    generator: DungeonGenerator,
    profile: DifficultyProfile,
    seeds: ChaCha8Rng,
    seed: u64,
    layout: DungeonLayout,
    player_control: PlayerControl,
    enemy_ai: EnemyAi,
    commands: Vec<Command>,
}

impl GameSession {
    /// Generates the first dungeon and starts a run on it.
    pub fn new(pool: TemplatePool, config: SessionConfig) -> Result<Self, GenerationError> {
        let generator = DungeonGenerator::new(config.generation);
        let layout = generate(&generator, &pool, config.seed)?;
        let mut session = Self {
            world: World::new(),
            pool,
            generator,
            profile: config.profile,
            seeds: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            layout: layout.clone(),
            player_control: PlayerControl::new(),
            enemy_ai: EnemyAi::new(),
            commands: Vec::new(),
        };
        let _ = session.begin(config.seed, layout);
        Ok(session)
    }

    /// Starts a fresh run on the dungeon generated from `seed`.
    pub fn start(&mut self, seed: u64) -> Result<Vec<Event>, GenerationError> {
        let layout = generate(&self.generator, &self.pool, seed)?;
        Ok(self.begin(seed, layout))
    }

    /// Starts a fresh run with the next seed drawn from the session's seed stream.
    ///
    /// Stats reset to the profile's starting values and the whole dungeon is
    /// regenerated.
    pub fn restart(&mut self) -> Result<Vec<Event>, GenerationError> {
        let seed = self.seeds.gen();
        self.start(seed)
    }

    fn begin(&mut self, seed: u64, layout: DungeonLayout) -> Vec<Event> {
        info!(seed, rooms = layout.room_count(), "starting run");
        self.seed = seed;
        self.layout = layout.clone();
        self.player_control.reset();
        self.commands.clear();

        let mut events = Vec::new();
        apply(
            &mut self.world,
            Command::StartSession {
                layout,
                profile: self.profile,
                stats: PlayerStats::starting(&self.profile),
                seed,
            },
            &mut events,
        );
        events
    }

    /// Advances the simulation by one tick and returns everything that happened.
    ///
    /// Ticks after the run ended are no-ops.
    pub fn tick(&mut self, input: &InputFrame) -> Vec<Event> {
        let mut events = Vec::new();
        if query::status(&self.world) != SessionStatus::Playing {
            return events;
        }

        let stats = query::player_stats(&self.world);
        self.player_control.handle(input, &stats, &mut self.commands);
        self.flush(&mut events);

        if let Some(player) = query::player(&self.world) {
            if let Some(grid) = query::occupancy_view(&self.world) {
                let enemies = query::enemy_view(&self.world);
                self.enemy_ai
                    .steer(&enemies, &player.rect, grid, &mut self.commands);
            }
            self.flush(&mut events);

            let enemies = query::enemy_view(&self.world);
            self.enemy_ai.aim(&enemies, &player.rect, &mut self.commands);
        }

        self.commands.push(Command::Tick);
        self.flush(&mut events);
        events
    }

    fn flush(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, events);
        }
    }

    /// Authoritative world for read-only queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Layout of the current run.
    #[must_use]
    pub fn layout(&self) -> &DungeonLayout {
        &self.layout
    }

    /// Seed the current run was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether the current run is still being played or how it ended.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        query::status(&self.world)
    }
}

fn generate(
    generator: &DungeonGenerator,
    pool: &TemplatePool,
    seed: u64,
) -> Result<DungeonLayout, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generator.generate(pool, &mut rng)
}
