//! Tank Maze - A top-down maze tank shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, enemy AI, projectiles, combat, level flow)
//! - `leaderboard`: Ranked score views
//! - `persistence`: Append-only leaderboard storage
//! - `settings`: Data-driven configuration
//! - `game`: Driver tying the simulation to the leaderboard store

pub mod game;
pub mod leaderboard;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default external scheduler rate (ticks per second)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 700;
    /// Thickness of the boundary walls on every screen edge
    pub const BOUNDARY_INSET: i32 = 25;

    /// Player movement speed (pixels per tick)
    pub const PLAYER_SPEED: i32 = 3;
    /// Enemy patrol/pursuit speed (pixels per tick)
    pub const ENEMY_SPEED: i32 = 1;
    /// Player projectile speed (pixels per tick)
    pub const PLAYER_PROJECTILE_SPEED: i32 = 10;
    /// Enemy projectile speed (pixels per tick)
    pub const ENEMY_PROJECTILE_SPEED: i32 = 3;

    /// Enemies notice the player when both axis offsets are under this
    pub const AGGRO_RANGE: i32 = 150;

    /// Sprite boxes (square, top-left anchored)
    pub const PLAYER_WALL_SIZE: i32 = 61;
    pub const PLAYER_BODY_SIZE: i32 = 74;
    pub const MONSTER_SIZE: i32 = 50;
    pub const PERSON_VERTICAL_SIZE: i32 = 40;
    pub const PERSON_HORIZONTAL_SIZE: i32 = 46;
    pub const PROJECTILE_SIZE: i32 = 20;
    pub const BONUS_SIZE: i32 = 32;
    /// Margin kept free when the bonus is placed pseudo-randomly
    pub const BONUS_PLACEMENT_MARGIN: i32 = 72;
    /// Draws tried before falling back to the level's fixed bonus spot
    pub const BONUS_PLACEMENT_ATTEMPTS: u32 = 64;

    /// Scoring
    pub const BONUS_SCORE: u32 = 25;
    pub const DAMAGE_SCORE: u32 = 100;
    pub const KILL_SCORE: u32 = 200;
    /// Credited when a full-health monster is retired by a wall
    pub const FULL_KILL_SCORE: u32 = DAMAGE_SCORE + KILL_SCORE;

    /// Score thresholds for level 2, level 3 and the win
    pub const LEVEL_2_SCORE: u32 = 1000;
    pub const LEVEL_3_SCORE: u32 = 2000;
    pub const WIN_SCORE: u32 = 3000;

    /// Deaths that end the run
    pub const MAX_DEATHS: u32 = 3;
}

/// Convert a millisecond duration to a tick count at `tick_rate_hz` (rounded up, at least 1)
#[inline]
pub fn ms_to_ticks(ms: u32, tick_rate_hz: u32) -> u32 {
    let ticks = (u64::from(ms) * u64::from(tick_rate_hz)).div_ceil(1000);
    u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500, 60), 30);
        assert_eq!(ms_to_ticks(3000, 60), 180);
        assert_eq!(ms_to_ticks(10, 60), 1);
        assert_eq!(ms_to_ticks(0, 60), 1);
    }

    #[test]
    fn test_ms_to_ticks_saturates() {
        assert_eq!(ms_to_ticks(u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(ms_to_ticks(u32::MAX, 2000), u32::MAX);
    }
}
