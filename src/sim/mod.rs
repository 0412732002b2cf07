//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (cooldowns count ticks)
//! - Seeded RNG only
//! - Stable iteration order (roster slot, then fire order)
//! - No rendering, audio or storage; side effects are returned as events

pub mod ai;
pub mod combat;
pub mod entity;
pub mod geometry;
pub mod level;
pub mod projectile;
pub mod state;
pub mod tick;

pub use entity::{
    AiMode, BonusPickup, Cooldown, Direction, Enemy, EnemyKind, Entity, EntityId, IdAllocator,
    Player, Projectile,
};
pub use geometry::{OPEN, Rect, intersects, is_out_of_bounds};
pub use level::{EnemySpawn, LevelDefinition, LevelError, LevelId, PatrolRoute, WallRespawn};
pub use state::{
    AudioCue, DeathCause, GameEvent, GamePhase, GameSession, KillCause, LeaderboardStage,
    SimConfig,
};
pub use tick::{Key, TickInput, evaluate_progress, tick};
