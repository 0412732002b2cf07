//! Session state and the events a tick emits
//!
//! Everything the simulation mutates lives in `GameSession`; nothing is global.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{BonusPickup, Enemy, IdAllocator, Player, Projectile};
use super::level::{LevelDefinition, LevelError, LevelId};
use crate::consts::*;
use crate::leaderboard::LeaderboardEntry;

/// Tick-counted tuning derived from `Settings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub player_fire_cooldown_ticks: u32,
    pub enemy_fire_cooldown_ticks: u32,
    pub max_name_len: usize,
    /// Seed for bonus placement
    pub seed: u64,
    /// Place the bonus pseudo-randomly instead of at the level's spawn point
    pub randomize_bonus: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_fire_cooldown_ticks: crate::ms_to_ticks(500, TICK_RATE_HZ),
            enemy_fire_cooldown_ticks: crate::ms_to_ticks(3000, TICK_RATE_HZ),
            max_name_len: 16,
            seed: 0,
            randomize_bonus: false,
        }
    }
}

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Typing a name on the title screen
    EnteringName,
    /// Playing a maze
    Level(LevelId),
    /// Reached the winning score
    Won,
    /// Ran out of lives
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Post-game leaderboard sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardStage {
    /// Final score waiting to be written
    WritePending,
    /// Written; entries waiting to be read back
    ReadPending,
    /// Showing every player's scores
    ShowingAll,
    /// Showing this player's scores
    ShowingMine,
}

/// Sound effects the host should play
///
/// Each cue restarts its sound rather than queueing behind a running copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    PlayerDeath,
    PersonDeath,
    MonsterDeath,
    MonsterDamaged,
    Win,
    Lose,
    PlayerShoots,
    EnemyShoots,
    EnemyPlayerCollision,
    BonusPickedUp,
    ExtraLife,
}

/// What killed the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    EnemyContact,
    EnemyProjectile,
}

/// What retired an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    Wall,
    Projectile,
}

/// Ordered side effects of a tick, consumed by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Audio(AudioCue),
    NameConfirmed(String),
    LevelEntered(LevelId),
    BonusCollected { extra_life: bool },
    PlayerDied { cause: DeathCause, deaths: u32 },
    EnemyDamaged { slot: usize, health: u8 },
    EnemyKilled { slot: usize, cause: KillCause },
    ScoreChanged { score: u32 },
    GameWon { score: u32 },
    GameLost { score: u32 },
    /// Final result to append to the leaderboard (emitted once per session)
    SubmitScore(LeaderboardEntry),
    LeaderboardToggled(LeaderboardStage),
    SessionRestarted,
}

/// A complete play session, from name entry to the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub config: SimConfig,
    pub phase: GamePhase,
    /// Set once the session reaches Won or Lost
    pub leaderboard: Option<LeaderboardStage>,
    /// Definition of the level being played (level one before the game starts)
    pub level: LevelDefinition,
    /// Guards the once-per-level roster spawn
    pub spawned: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Append-only within a level; cleared at level boundaries
    pub player_projectiles: Vec<Projectile>,
    pub bonus: BonusPickup,
    pub score: u32,
    /// Capped at `MAX_DEATHS`
    pub deaths: u32,
    pub name: String,
    /// Latch for the single leaderboard submission
    pub submitted: bool,
    pub extra_life_awarded: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub ids: IdAllocator,
}

impl GameSession {
    /// Create a session waiting for name entry
    ///
    /// Fails if any built-in level has a malformed roster.
    pub fn new(config: SimConfig) -> Result<Self, LevelError> {
        for id in [LevelId::One, LevelId::Two, LevelId::Three] {
            LevelDefinition::builtin(id).validate()?;
        }
        Ok(Self::fresh(config))
    }

    fn fresh(config: SimConfig) -> Self {
        let level = LevelDefinition::builtin(LevelId::One);
        let mut ids = IdAllocator::default();
        let player = Player::new(ids.next_id(), level.entry);
        let bonus = BonusPickup {
            pos: level.bonus_spawn,
            collected: false,
        };
        Self {
            config,
            phase: GamePhase::EnteringName,
            leaderboard: None,
            level,
            spawned: false,
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            bonus,
            score: 0,
            deaths: 0,
            name: String::new(),
            submitted: false,
            extra_life_awarded: false,
            time_ticks: 0,
            ids,
        }
    }

    /// Start over at name entry, keeping the configuration
    pub fn reset(&mut self) {
        *self = Self::fresh(self.config.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> super::entity::EntityId {
        self.ids.next_id()
    }

    pub fn lives_remaining(&self) -> u32 {
        MAX_DEATHS.saturating_sub(self.deaths)
    }

    pub fn current_level(&self) -> Option<LevelId> {
        match self.phase {
            GamePhase::Level(id) => Some(id),
            _ => None,
        }
    }

    /// The row this session writes to the leaderboard
    pub fn result_entry(&self) -> LeaderboardEntry {
        LeaderboardEntry::new(self.name.clone(), self.score)
    }

    /// Add to the score, reporting the new total
    pub fn credit(&mut self, amount: u32, events: &mut Vec<GameEvent>) {
        if amount == 0 {
            return;
        }
        self.score += amount;
        events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Count a player death (capped)
    pub fn record_death(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        self.deaths = (self.deaths + 1).min(MAX_DEATHS);
        log::debug!("Player died ({:?}), deaths = {}", cause, self.deaths);
        events.push(GameEvent::PlayerDied {
            cause,
            deaths: self.deaths,
        });
    }

    /// Spawn the current level's roster and place the bonus (once per level)
    pub fn spawn_level(&mut self) {
        if self.spawned {
            return;
        }

        let roster = self.level.roster.clone();
        self.enemies = roster
            .iter()
            .enumerate()
            .map(|(slot, spawn)| {
                let body = super::entity::Entity::new(
                    self.ids.next_id(),
                    spawn.pos,
                    spawn.facing,
                    spawn.kind.max_health(),
                );
                Enemy {
                    body,
                    kind: spawn.kind,
                    slot,
                    route: spawn.route,
                    home_facing: spawn.facing,
                    mode: Default::default(),
                    projectiles: Vec::new(),
                }
            })
            .collect();

        self.bonus = BonusPickup {
            pos: self.bonus_position(),
            collected: false,
        };
        self.spawned = true;
    }

    fn bonus_position(&self) -> IVec2 {
        if !self.config.randomize_bonus {
            return self.level.bonus_spawn;
        }
        // Each level draws from its own stream so placement does not depend on play
        let mut rng =
            Pcg32::seed_from_u64(self.config.seed.wrapping_add(self.level.id.index() as u64));
        for _ in 0..BONUS_PLACEMENT_ATTEMPTS {
            let pos = IVec2::new(
                rng.random_range(0..SCREEN_WIDTH - BONUS_PLACEMENT_MARGIN),
                rng.random_range(0..SCREEN_HEIGHT - BONUS_PLACEMENT_MARGIN),
            );
            if !self.level.is_out_of_bounds(pos, BONUS_SIZE) {
                return pos;
            }
        }
        log::debug!(
            "No open bonus spot found on level {}, using the fixed one",
            self.level.id.index() + 1
        );
        self.level.bonus_spawn
    }

    /// Switch to `id`: reposition the player and drop the previous level's entities
    pub fn enter_level(&mut self, id: LevelId, events: &mut Vec<GameEvent>) {
        self.level = LevelDefinition::builtin(id);
        self.phase = GamePhase::Level(id);
        self.player.respawn_at(self.level.entry);
        self.enemies.clear();
        self.player_projectiles.clear();
        self.spawned = false;
        log::info!("Entering level {} (score {})", id.index() + 1, self.score);
        events.push(GameEvent::LevelEntered(id));
    }
}
