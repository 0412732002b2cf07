//! Level definitions: maze walls, enemy rosters and patrol routes
//!
//! One parameterised definition drives every level; the three built-in
//! mazes differ only in data.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Direction, EnemyKind};
use super::geometry::{OPEN, Rect, is_out_of_bounds};
use crate::consts::*;

/// Number of enemies every level spawns
pub const ROSTER_SIZE: usize = 4;

/// Which maze is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    One,
    Two,
    Three,
}

impl LevelId {
    /// 0-based index
    pub fn index(self) -> usize {
        match self {
            LevelId::One => 0,
            LevelId::Two => 1,
            LevelId::Three => 2,
        }
    }

    /// Level that follows this one (None after the last)
    pub fn next(self) -> Option<LevelId> {
        match self {
            LevelId::One => Some(LevelId::Two),
            LevelId::Two => Some(LevelId::Three),
            LevelId::Three => None,
        }
    }

    /// Score that ends this level (advance, or win after the last)
    pub fn exit_score(self) -> u32 {
        match self {
            LevelId::One => LEVEL_2_SCORE,
            LevelId::Two => LEVEL_3_SCORE,
            LevelId::Three => WIN_SCORE,
        }
    }
}

/// Scripted back-and-forth or loop path followed while patrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolRoute {
    /// Bounce along x between `min` and `max`
    Horizontal { min: i32, max: i32 },
    /// Bounce along y between `min` and `max`
    Vertical { min: i32, max: i32 },
    /// Walk the rectangle left → down → right → up
    Loop {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
}

impl PatrolRoute {
    fn is_degenerate(&self) -> bool {
        match *self {
            PatrolRoute::Horizontal { min, max } | PatrolRoute::Vertical { min, max } => min >= max,
            PatrolRoute::Loop {
                left,
                top,
                right,
                bottom,
            } => left >= right || top >= bottom,
        }
    }

    /// Whether `facing` is a heading this route can continue with
    pub fn accepts(&self, facing: Direction) -> bool {
        match self {
            PatrolRoute::Horizontal { .. } => facing.is_horizontal(),
            PatrolRoute::Vertical { .. } => facing.is_vertical(),
            PatrolRoute::Loop { .. } => facing != Direction::None,
        }
    }
}

/// Where the player reappears after running into a wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallRespawn {
    Fixed(IVec2),
    /// `west` when the player died left of `split_x`, else `east`
    BySide {
        split_x: i32,
        west: IVec2,
        east: IVec2,
    },
}

impl WallRespawn {
    pub fn point_for(&self, died_at: IVec2) -> IVec2 {
        match *self {
            WallRespawn::Fixed(p) => p,
            WallRespawn::BySide {
                split_x,
                west,
                east,
            } => {
                if died_at.x < split_x {
                    west
                } else {
                    east
                }
            }
        }
    }
}

/// One roster entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub pos: IVec2,
    pub facing: Direction,
    pub route: PatrolRoute,
}

/// Malformed level data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("level {level:?}: roster has {actual} enemies, expected {expected}")]
    RosterSize {
        level: LevelId,
        expected: usize,
        actual: usize,
    },

    #[error("level {level:?}: roster needs 2 persons and 2 monsters, got {persons} and {monsters}")]
    RosterComposition {
        level: LevelId,
        persons: usize,
        monsters: usize,
    },

    #[error("level {level:?}: enemy slot {slot} spawns inside a wall at ({x}, {y})")]
    SpawnInsideWall {
        level: LevelId,
        slot: usize,
        x: i32,
        y: i32,
    },

    #[error("level {level:?}: enemy slot {slot} has an empty patrol route")]
    EmptyRoute { level: LevelId, slot: usize },
}

/// Everything that distinguishes one maze from another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: LevelId,
    /// Maze walls (the screen boundary is implicit)
    pub zones: Vec<Rect>,
    pub roster: Vec<EnemySpawn>,
    /// Where the player is placed on entering the level
    pub entry: IVec2,
    /// Respawn after enemy contact or an enemy projectile
    pub respawn: IVec2,
    pub wall_respawn: WallRespawn,
    pub bonus_spawn: IVec2,
}

impl LevelDefinition {
    /// The built-in maze for `id`
    pub fn builtin(id: LevelId) -> Self {
        match id {
            LevelId::One => level_one(),
            LevelId::Two => level_two(),
            LevelId::Three => level_three(),
        }
    }

    /// True if a square sprite at `pos` touches any wall of this level
    pub fn is_out_of_bounds(&self, pos: IVec2, size: i32) -> bool {
        is_out_of_bounds(&self.zones, pos, size)
    }

    /// Reject rosters the patrol program cannot drive
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.roster.len() != ROSTER_SIZE {
            return Err(LevelError::RosterSize {
                level: self.id,
                expected: ROSTER_SIZE,
                actual: self.roster.len(),
            });
        }

        let persons = self
            .roster
            .iter()
            .filter(|s| s.kind == EnemyKind::Person)
            .count();
        let monsters = self.roster.len() - persons;
        if persons != 2 || monsters != 2 {
            return Err(LevelError::RosterComposition {
                level: self.id,
                persons,
                monsters,
            });
        }

        for (slot, spawn) in self.roster.iter().enumerate() {
            if spawn.route.is_degenerate() {
                return Err(LevelError::EmptyRoute {
                    level: self.id,
                    slot,
                });
            }
            if self.is_out_of_bounds(spawn.pos, spawn.kind.size(spawn.facing)) {
                return Err(LevelError::SpawnInsideWall {
                    level: self.id,
                    slot,
                    x: spawn.pos.x,
                    y: spawn.pos.y,
                });
            }
        }

        Ok(())
    }
}

fn spawn(kind: EnemyKind, x: i32, y: i32, facing: Direction, route: PatrolRoute) -> EnemySpawn {
    EnemySpawn {
        kind,
        pos: IVec2::new(x, y),
        facing,
        route,
    }
}

/// Plus-shaped maze
fn level_one() -> LevelDefinition {
    use Direction::*;
    use EnemyKind::*;

    LevelDefinition {
        id: LevelId::One,
        zones: vec![
            Rect::new(200, -OPEN, 275, 250),
            Rect::new(275, 175, 475, 250),
            Rect::new(175, 400, 275, 475),
            Rect::new(550, 350, 625, 575),
            Rect::new(475, 500, 550, 575),
        ],
        roster: vec![
            spawn(Person, 90, 40, Down, PatrolRoute::Vertical { min: 40, max: 500 }),
            spawn(
                Person,
                425,
                285,
                Left,
                PatrolRoute::Loop {
                    left: 285,
                    top: 285,
                    right: 425,
                    bottom: 425,
                },
            ),
            spawn(Monster, 300, 85, Right, PatrolRoute::Horizontal { min: 300, max: 600 }),
            spawn(Monster, 650, 600, Left, PatrolRoute::Horizontal { min: 100, max: 700 }),
        ],
        entry: IVec2::new(74, 350),
        respawn: IVec2::new(190, 504),
        wall_respawn: WallRespawn::BySide {
            split_x: SCREEN_WIDTH / 2,
            west: IVec2::new(650, 450),
            east: IVec2::new(74, 350),
        },
        bonus_spawn: IVec2::new(380, 320),
    }
}

/// Two offset pillars
fn level_two() -> LevelDefinition {
    use Direction::*;
    use EnemyKind::*;

    LevelDefinition {
        id: LevelId::Two,
        zones: vec![Rect::new(200, -OPEN, 325, 525), Rect::new(500, 200, 600, OPEN)],
        roster: vec![
            spawn(Person, 365, 585, Left, PatrolRoute::Horizontal { min: 150, max: 365 }),
            spawn(Person, 665, 550, Up, PatrolRoute::Vertical { min: 150, max: 550 }),
            spawn(Monster, 80, 600, Up, PatrolRoute::Vertical { min: 150, max: 400 }),
            spawn(Monster, 650, 100, Left, PatrolRoute::Horizontal { min: 400, max: 650 }),
        ],
        entry: IVec2::new(100, 100),
        respawn: IVec2::new(100, 100),
        wall_respawn: WallRespawn::Fixed(IVec2::new(100, 100)),
        bonus_spawn: IVec2::new(400, 600),
    }
}

/// L-shaped corridor
fn level_three() -> LevelDefinition {
    use Direction::*;
    use EnemyKind::*;

    LevelDefinition {
        id: LevelId::Three,
        zones: vec![
            Rect::new(200, 175, OPEN, 275),
            Rect::new(200, 275, 325, 425),
            Rect::new(200, 425, 625, 525),
        ],
        roster: vec![
            spawn(Person, 100, 100, Right, PatrolRoute::Horizontal { min: 100, max: 600 }),
            spawn(Person, 665, 585, Left, PatrolRoute::Horizontal { min: 200, max: 665 }),
            spawn(Monster, 85, 585, Up, PatrolRoute::Vertical { min: 150, max: 585 }),
            spawn(Monster, 350, 325, Right, PatrolRoute::Horizontal { min: 350, max: 600 }),
        ],
        entry: IVec2::new(600, 100),
        respawn: IVec2::new(600, 100),
        wall_respawn: WallRespawn::Fixed(IVec2::new(600, 100)),
        bonus_spawn: IVec2::new(100, 600),
    }
}
