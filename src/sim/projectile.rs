//! Projectile spawning and flight
//!
//! Projectiles fly in a straight line until they touch a wall or a target.
//! Retired projectiles stay in their owner's list, flagged inactive, until the
//! level ends.

use glam::IVec2;

use super::entity::{Direction, Enemy, Entity, IdAllocator, Player, Projectile};
use super::level::LevelDefinition;
use crate::consts::*;

/// Spawn offset from the shooter's top-left corner and the resolved heading
///
/// An unset direction fires up.
pub fn muzzle(direction: Direction) -> (IVec2, Direction) {
    match direction {
        Direction::Down => (IVec2::new(20, 55), Direction::Down),
        Direction::Left => (IVec2::new(-15, 18), Direction::Left),
        Direction::Right => (IVec2::new(55, 18), Direction::Right),
        Direction::Up | Direction::None => (IVec2::new(20, -18), Direction::Up),
    }
}

/// Fire from `shooter` toward `direction` if its cooldown allows
fn try_fire(
    shooter: &mut Entity,
    direction: Direction,
    speed: i32,
    cooldown_ticks: u32,
    ids: &mut IdAllocator,
) -> Option<Projectile> {
    if shooter.retired || !shooter.fire_cooldown.ready() {
        return None;
    }
    shooter.fire_cooldown.start(cooldown_ticks);

    let (offset, heading) = muzzle(direction);
    Some(Projectile::new(
        ids.next_id(),
        shooter.pos + offset,
        heading.unit() * speed,
        heading,
    ))
}

/// Player shot along the current aim (W/A/S/D), gated by the player cooldown
pub fn fire_player_projectile(
    player: &mut Player,
    cooldown_ticks: u32,
    ids: &mut IdAllocator,
) -> Option<Projectile> {
    let aim = player.aim;
    try_fire(
        &mut player.body,
        aim,
        PLAYER_PROJECTILE_SPEED,
        cooldown_ticks,
        ids,
    )
}

/// Enemy shot along its facing; appended to the enemy's own list
///
/// Returns true if a projectile was fired.
pub fn fire_enemy_projectile(enemy: &mut Enemy, cooldown_ticks: u32, ids: &mut IdAllocator) -> bool {
    let facing = enemy.body.facing;
    match try_fire(
        &mut enemy.body,
        facing,
        ENEMY_PROJECTILE_SPEED,
        cooldown_ticks,
        ids,
    ) {
        Some(projectile) => {
            enemy.projectiles.push(projectile);
            true
        }
        None => false,
    }
}

/// Move one step and retire on wall contact
///
/// Returns true if the projectile retired this step.
pub fn advance(projectile: &mut Projectile, level: &LevelDefinition) -> bool {
    if !projectile.is_active() {
        return false;
    }
    projectile.body.integrate();
    if level.is_out_of_bounds(projectile.body.pos, PROJECTILE_SIZE) {
        projectile.body.retire();
        return true;
    }
    false
}

/// Advance every active projectile in `list`
pub fn advance_all(list: &mut [Projectile], level: &LevelDefinition) -> usize {
    list.iter_mut()
        .map(|p| advance(p, level))
        .filter(|retired| *retired)
        .count()
}
