//! Entity model shared by the player, enemies and projectiles

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::level::PatrolRoute;
use crate::consts::*;

/// Stable entity identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out ids in increasing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Unit step for this direction (zero for `None`)
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
            Direction::None => IVec2::ZERO,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }
}

/// Tick-counted cooldown (0 = ready)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cooldown {
    pub remaining: u32,
}

impl Cooldown {
    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Count down one tick
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Position/velocity/health record common to every simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: IVec2,
    pub vel: IVec2,
    pub facing: Direction,
    /// 0 (dead), 1 or 2
    pub health: u8,
    /// Set once the entity has hit a wall or been destroyed; never cleared
    pub retired: bool,
    pub fire_cooldown: Cooldown,
}

impl Entity {
    pub fn new(id: EntityId, pos: IVec2, facing: Direction, health: u8) -> Self {
        Self {
            id,
            pos,
            vel: IVec2::ZERO,
            facing,
            health,
            retired: false,
            fire_cooldown: Cooldown::default(),
        }
    }

    /// Participates in collision and drawing
    pub fn is_active(&self) -> bool {
        !self.retired && self.health > 0
    }

    /// Mark as permanently out of play
    pub fn retire(&mut self) {
        self.retired = true;
        self.health = 0;
        self.vel = IVec2::ZERO;
    }

    /// Apply velocity to position
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

/// The player's tank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Entity,
    /// Turret aim, set by W/A/S/D independently of movement
    pub aim: Direction,
}

impl Player {
    pub fn new(id: EntityId, pos: IVec2) -> Self {
        Self {
            body: Entity::new(id, pos, Direction::None, 1),
            aim: Direction::None,
        }
    }

    /// Teleport to `pos`; held movement keys keep their velocity
    pub fn respawn_at(&mut self, pos: IVec2) {
        self.body.pos = pos;
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Foot soldier, one hit
    Person,
    /// Armoured monster, two hits
    Monster,
}

impl EnemyKind {
    pub fn max_health(self) -> u8 {
        match self {
            EnemyKind::Person => 1,
            EnemyKind::Monster => 2,
        }
    }

    /// Sprite size for the given facing
    pub fn size(self, facing: Direction) -> i32 {
        match self {
            EnemyKind::Monster => MONSTER_SIZE,
            EnemyKind::Person if facing.is_horizontal() => PERSON_HORIZONTAL_SIZE,
            EnemyKind::Person => PERSON_VERTICAL_SIZE,
        }
    }
}

/// Enemy behaviour mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiMode {
    #[default]
    Patrol,
    Pursue,
}

/// A projectile in flight (or retired, kept until the level ends)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Entity,
}

impl Projectile {
    pub fn new(id: EntityId, pos: IVec2, vel: IVec2, facing: Direction) -> Self {
        let mut body = Entity::new(id, pos, facing, 1);
        body.vel = vel;
        Self { body }
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }
}

/// An enemy with its patrol slot and the projectiles it has fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Entity,
    pub kind: EnemyKind,
    /// Roster index (0-3)
    pub slot: usize,
    pub route: PatrolRoute,
    /// Facing the enemy resumes its patrol with when its current facing is off-route
    pub home_facing: Direction,
    pub mode: AiMode,
    /// Append-only for the lifetime of the level
    pub projectiles: Vec<Projectile>,
}

impl Enemy {
    /// Sprite size for the current facing
    pub fn size(&self) -> i32 {
        self.kind.size(self.body.facing)
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }

    pub fn active_projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.is_active())
    }
}

/// The collectable bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPickup {
    pub pos: IVec2,
    /// Latched true on first pickup
    pub collected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_counts_down() {
        let mut cd = Cooldown::default();
        assert!(cd.ready());
        cd.start(2);
        assert!(!cd.ready());
        cd.tick();
        assert!(!cd.ready());
        cd.tick();
        assert!(cd.ready());
        cd.tick();
        assert_eq!(cd.remaining, 0);
    }

    #[test]
    fn test_retire_zeroes_health_and_velocity() {
        let mut e = Entity::new(EntityId(1), IVec2::new(10, 10), Direction::Left, 2);
        e.vel = IVec2::new(-1, 0);
        assert!(e.is_active());
        e.retire();
        assert!(!e.is_active());
        assert_eq!(e.health, 0);
        assert_eq!(e.vel, IVec2::ZERO);
    }

    #[test]
    fn test_person_size_depends_on_facing() {
        assert_eq!(EnemyKind::Person.size(Direction::Left), PERSON_HORIZONTAL_SIZE);
        assert_eq!(EnemyKind::Person.size(Direction::Up), PERSON_VERTICAL_SIZE);
        assert_eq!(EnemyKind::Monster.size(Direction::Right), MONSTER_SIZE);
        assert_eq!(EnemyKind::Monster.size(Direction::Down), MONSTER_SIZE);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids = IdAllocator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_direction_helpers() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.unit(), IVec2::new(-1, 0));
        assert!(Direction::Right.is_horizontal());
        assert!(!Direction::None.is_vertical());
    }
}
