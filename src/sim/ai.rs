//! Enemy behaviour: scripted patrols and close-range pursuit
//!
//! Each tick an active enemy either chases the player (when both axis
//! distances are inside the aggro range) or walks its patrol route.

use glam::IVec2;

use super::entity::{AiMode, Direction};
use super::level::PatrolRoute;
use super::projectile::fire_enemy_projectile;
use super::state::{AudioCue, GameEvent, GameSession};
use crate::consts::*;

/// Both axis offsets strictly inside `AGGRO_RANGE`
pub fn in_aggro_range(enemy_pos: IVec2, player_pos: IVec2) -> bool {
    let offset = player_pos - enemy_pos;
    offset.x.abs() < AGGRO_RANGE && offset.y.abs() < AGGRO_RANGE
}

/// Diagonal step toward the player and the facing it implies
///
/// Each axis always moves; an enemy level with the player still steps
/// forward on that axis. Facing follows the dominant axis, vertical on ties.
pub fn pursuit(enemy_pos: IVec2, player_pos: IVec2) -> (IVec2, Direction) {
    let dx = if enemy_pos.x <= player_pos.x { 1 } else { -1 };
    let dy = if enemy_pos.y <= player_pos.y { 1 } else { -1 };

    let offset = player_pos - enemy_pos;
    let facing = if offset.x.abs() > offset.y.abs() {
        if dx > 0 { Direction::Right } else { Direction::Left }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };

    (IVec2::new(dx, dy) * ENEMY_SPEED, facing)
}

/// One patrol step: keep walking, or turn at the end of the route
///
/// A turn costs the tick (zero velocity). `facing` must be one the route
/// accepts.
pub fn patrol(route: &PatrolRoute, pos: IVec2, facing: Direction) -> (IVec2, Direction) {
    let turn = |next: Direction| (IVec2::ZERO, next);
    let walk = |dir: Direction| (dir.unit() * ENEMY_SPEED, dir);

    match (*route, facing) {
        (PatrolRoute::Horizontal { max, .. }, Direction::Right) => {
            if pos.x < max { walk(Direction::Right) } else { turn(Direction::Left) }
        }
        (PatrolRoute::Horizontal { min, .. }, Direction::Left) => {
            if pos.x > min { walk(Direction::Left) } else { turn(Direction::Right) }
        }
        (PatrolRoute::Vertical { max, .. }, Direction::Down) => {
            if pos.y < max { walk(Direction::Down) } else { turn(Direction::Up) }
        }
        (PatrolRoute::Vertical { min, .. }, Direction::Up) => {
            if pos.y > min { walk(Direction::Up) } else { turn(Direction::Down) }
        }
        (PatrolRoute::Loop { left, .. }, Direction::Left) => {
            if pos.x > left { walk(Direction::Left) } else { turn(Direction::Down) }
        }
        (PatrolRoute::Loop { bottom, .. }, Direction::Down) => {
            if pos.y < bottom { walk(Direction::Down) } else { turn(Direction::Right) }
        }
        (PatrolRoute::Loop { right, .. }, Direction::Right) => {
            if pos.x < right { walk(Direction::Right) } else { turn(Direction::Up) }
        }
        (PatrolRoute::Loop { top, .. }, Direction::Up) => {
            if pos.y > top { walk(Direction::Up) } else { turn(Direction::Left) }
        }
        // Off-route heading: stand still this tick
        _ => (IVec2::ZERO, facing),
    }
}

/// Choose every active enemy's velocity and facing for this tick
///
/// Pursuing enemies fire along their new facing whenever their cooldown allows.
pub fn update(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let player_pos = session.player.body.pos;
    let cooldown = session.config.enemy_fire_cooldown_ticks;
    let GameSession { enemies, ids, .. } = session;

    for enemy in enemies.iter_mut().filter(|e| e.is_active()) {
        if in_aggro_range(enemy.body.pos, player_pos) {
            enemy.mode = AiMode::Pursue;
            let (vel, facing) = pursuit(enemy.body.pos, player_pos);
            enemy.body.vel = vel;
            enemy.body.facing = facing;

            if fire_enemy_projectile(enemy, cooldown, ids) {
                events.push(GameEvent::Audio(AudioCue::EnemyShoots));
            }
        } else {
            if enemy.mode == AiMode::Pursue {
                log::trace!("Enemy slot {} back on patrol", enemy.slot);
            }
            enemy.mode = AiMode::Patrol;
            if !enemy.route.accepts(enemy.body.facing) {
                enemy.body.facing = enemy.home_facing;
            }
            let (vel, facing) = patrol(&enemy.route, enemy.body.pos, enemy.body.facing);
            enemy.body.vel = vel;
            enemy.body.facing = facing;
        }
    }
}
