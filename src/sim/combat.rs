//! Combat resolution
//!
//! Runs after positions integrate. The passes run in a fixed order so a
//! single tick can never score the same interaction twice.

use super::entity::EnemyKind;
use super::geometry::intersects;
use super::projectile::advance_all;
use super::state::{AudioCue, DeathCause, GameEvent, GameSession, KillCause};
use crate::consts::*;

/// Resolve every pairwise interaction for one tick
pub fn resolve(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    collect_bonus(session, events);
    player_vs_walls(session, events);
    enemies_vs_walls(session, events);
    advance_projectiles(session);
    player_vs_enemies(session, events);
    enemy_projectiles_vs_player(session, events);
    player_projectiles_vs_enemies(session, events);
}

fn death_cue(kind: EnemyKind) -> AudioCue {
    match kind {
        EnemyKind::Person => AudioCue::PersonDeath,
        EnemyKind::Monster => AudioCue::MonsterDeath,
    }
}

fn collect_bonus(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let bonus = session.bonus;
    if bonus.collected
        || !intersects(
            session.player.body.pos,
            PLAYER_BODY_SIZE,
            bonus.pos,
            BONUS_SIZE,
        )
    {
        return;
    }
    session.bonus.collected = true;

    // A score off the hundreds means a bonus was banked on an earlier level
    let banked = session.score % 100 != 0;
    let mut extra_life = false;
    if banked && session.deaths > 0 {
        session.deaths -= 1;
        session.extra_life_awarded = true;
        extra_life = true;
    }

    log::debug!("Bonus collected (extra life: {})", extra_life);
    events.push(GameEvent::Audio(if banked {
        AudioCue::ExtraLife
    } else {
        AudioCue::BonusPickedUp
    }));
    events.push(GameEvent::BonusCollected { extra_life });
    session.credit(BONUS_SCORE, events);
}

fn player_vs_walls(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let died_at = session.player.body.pos;
    if !session.level.is_out_of_bounds(died_at, PLAYER_WALL_SIZE) {
        return;
    }
    let respawn = session.level.wall_respawn.point_for(died_at);
    session.player.respawn_at(respawn);
    session.record_death(DeathCause::Wall, events);
    events.push(GameEvent::Audio(AudioCue::PlayerDeath));
}

/// Enemies that walk into a wall die, scored on their remaining health
fn enemies_vs_walls(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    for i in 0..session.enemies.len() {
        let enemy = &mut session.enemies[i];
        if !enemy.is_active() || !session.level.is_out_of_bounds(enemy.body.pos, enemy.size()) {
            continue;
        }

        let award = if enemy.body.health >= 2 {
            FULL_KILL_SCORE
        } else {
            KILL_SCORE
        };
        let (slot, kind) = (enemy.slot, enemy.kind);
        enemy.body.retire();

        log::debug!("Enemy slot {} ({:?}) hit a wall", slot, kind);
        events.push(GameEvent::Audio(death_cue(kind)));
        events.push(GameEvent::EnemyKilled {
            slot,
            cause: KillCause::Wall,
        });
        session.credit(award, events);
    }
}

/// Player shots, then every enemy's shots (dead shooters included)
fn advance_projectiles(session: &mut GameSession) {
    let level = &session.level;
    advance_all(&mut session.player_projectiles, level);
    for enemy in &mut session.enemies {
        advance_all(&mut enemy.projectiles, level);
    }
}

fn player_vs_enemies(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    for i in 0..session.enemies.len() {
        let enemy = &session.enemies[i];
        if !enemy.is_active()
            || !intersects(
                session.player.body.pos,
                PLAYER_BODY_SIZE,
                enemy.body.pos,
                enemy.size(),
            )
        {
            continue;
        }

        let respawn = session.level.respawn;
        session.player.respawn_at(respawn);
        session.record_death(DeathCause::EnemyContact, events);
        events.push(GameEvent::Audio(AudioCue::EnemyPlayerCollision));
    }
}

fn enemy_projectiles_vs_player(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    for i in 0..session.enemies.len() {
        for j in 0..session.enemies[i].projectiles.len() {
            let shot = &mut session.enemies[i].projectiles[j];
            if !shot.is_active()
                || !intersects(
                    shot.body.pos,
                    PROJECTILE_SIZE,
                    session.player.body.pos,
                    PLAYER_WALL_SIZE,
                )
            {
                continue;
            }
            shot.body.retire();

            let respawn = session.level.respawn;
            session.player.respawn_at(respawn);
            session.record_death(DeathCause::EnemyProjectile, events);
            events.push(GameEvent::Audio(AudioCue::PlayerDeath));
        }
    }
}

/// Each shot damages at most one enemy by exactly one point
fn player_projectiles_vs_enemies(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    for p in 0..session.player_projectiles.len() {
        if !session.player_projectiles[p].is_active() {
            continue;
        }
        let shot_pos = session.player_projectiles[p].body.pos;
        let Some(target) = session.enemies.iter().position(|enemy| {
            enemy.is_active() && intersects(shot_pos, PROJECTILE_SIZE, enemy.body.pos, enemy.size())
        }) else {
            continue;
        };
        session.player_projectiles[p].body.retire();

        let enemy = &mut session.enemies[target];
        enemy.body.health -= 1;
        let (slot, kind, health) = (enemy.slot, enemy.kind, enemy.body.health);

        if health == 0 {
            enemy.body.retire();
            log::debug!("Enemy slot {} ({:?}) destroyed", slot, kind);
            events.push(GameEvent::Audio(death_cue(kind)));
            events.push(GameEvent::EnemyKilled {
                slot,
                cause: KillCause::Projectile,
            });
            session.credit(KILL_SCORE, events);
        } else {
            events.push(GameEvent::Audio(AudioCue::MonsterDamaged));
            events.push(GameEvent::EnemyDamaged { slot, health });
            session.credit(DAMAGE_SCORE, events);
        }
    }
}
