//! Bullet, projectile and contact resolution
//!
//! Bullets are walked back to front so removing one never shifts an entry that
//! has not been visited yet. Kill side effects (combo, loot, replacements) are
//! deferred until the bullet pass is finished, so freshly spawned enemies
//! cannot be struck by the bullet that caused them.

use glam::Vec2;
use rand::Rng;

use super::boss;
use super::collision::{circles_overlap, direction_to, within_radius};
use super::spawn;
use super::state::{
    BossProjectile, Enemy, GameEvent, GamePhase, GameState, ParticleKind, PowerUpKind,
    ProjectileBehavior,
};
use crate::config::EngineConfig;
use crate::consts::*;

/// Apply incoming damage to the player.
///
/// Dashing grants full invulnerability; an active shield halves the hit.
/// Health never drops below zero. Returns the health actually removed.
pub fn damage_player(state: &mut GameState, amount: f32) -> f32 {
    if state.player.is_dashing() || amount.is_nan() || amount <= 0.0 {
        return 0.0;
    }
    let amount = if state.effects.shield_active() {
        amount * SHIELD_FACTOR
    } else {
        amount
    };
    let before = state.player.health;
    state.player.health = (before - amount).max(0.0);
    let applied = before - state.player.health;
    if applied > 0.0 {
        state.emit(GameEvent::PlayerDamaged { amount: applied });
    }
    applied
}

/// Gold for a kill: base × gold multiplier × combo multiplier, floored
pub fn kill_gold(base: u64, gold_multiplier_active: bool, combo_multiplier: u32) -> u64 {
    let doubled = if gold_multiplier_active { 2.0 } else { 1.0 };
    (base as f64 * doubled * combo_multiplier as f64).floor() as u64
}

/// Roll a power-up drop for a kill; low health favours heals
fn roll_drop(state: &mut GameState, config: &EngineConfig, enemy: &Enemy) -> Option<PowerUpKind> {
    let low_health = state.player.health_fraction() < LOW_HEALTH_FRACTION;
    let mut chance = enemy.kind.drop_chance() + config.power_up_spawn_rate_bonus;
    if low_health {
        chance *= 1.5;
    }
    if state.rng.random::<f32>() >= chance.min(1.0) {
        return None;
    }
    if low_health && state.rng.random_bool(0.5) {
        return Some(PowerUpKind::Health);
    }
    let index = state.rng.random_range(0..PowerUpKind::ALL.len());
    Some(PowerUpKind::ALL[index])
}

/// Combo, score, gold and drops for one dead enemy
fn on_enemy_killed(state: &mut GameState, config: &EngineConfig, enemy: &Enemy) {
    let multiplier = state.progression.register_kill();
    let gold = kill_gold(enemy.gold, state.effects.gold_multiplier_active(), multiplier);
    state.score += enemy.score * multiplier as u64;
    state.spawn_gold(enemy.pos, gold);

    if let Some(kind) = roll_drop(state, config, enemy) {
        let offset = Vec2::new(state.rng.random_range(-12.0..12.0), state.rng.random_range(-12.0..12.0));
        state.spawn_power_up(enemy.pos + offset, kind);
    }

    state.burst(enemy.pos, 10, ParticleKind::Death, 4.0);
    state.emit(GameEvent::EnemyKilled {
        kind: enemy.kind,
        gold,
        position: enemy.pos,
    });
}

/// Advance bullets and resolve hits against enemies and the boss
pub fn resolve_bullets(state: &mut GameState, config: &EngineConfig, f: f32) {
    let mut killed: Vec<Enemy> = Vec::new();
    let mut boss_damage = 0.0;

    for bi in (0..state.bullets.len()).rev() {
        let bullet = &mut state.bullets[bi];
        let step = bullet.vel * f;
        bullet.pos += step;
        bullet.traveled += step.length();
        let out_of_world = bullet.pos.min_element() < 0.0 || bullet.pos.max_element() > WORLD_SIZE;
        if bullet.traveled > BULLET_RANGE || out_of_world {
            state.bullets.remove(bi);
            continue;
        }

        let (pos, radius, damage) = (bullet.pos, bullet.radius, bullet.damage);
        let mut consumed = false;

        for ei in (0..state.enemies.len()).rev() {
            let enemy = &mut state.enemies[ei];
            if state.bullets[bi].hit_ids.contains(&enemy.id)
                || !circles_overlap(pos, radius, enemy.pos, enemy.radius)
            {
                continue;
            }

            enemy.health -= damage;
            enemy.hit_flash_ms = HIT_FLASH_MS;
            let (id, at) = (enemy.id, enemy.pos);
            let dead = enemy.health <= 0.0;
            state.bullets[bi].hit_ids.push(id);
            state.events.push(GameEvent::EnemyHit {
                id,
                damage,
                position: at,
            });
            if dead {
                killed.push(state.enemies.remove(ei));
            }

            let bullet = &mut state.bullets[bi];
            if bullet.pierce == 0 {
                consumed = true;
                break;
            }
            bullet.pierce -= 1;
        }

        if !consumed {
            if let Some(boss) = state.boss.as_mut() {
                if boss.health > 0.0 && circles_overlap(pos, radius, boss.pos, boss.radius) {
                    boss.health -= damage;
                    boss.hit_flash_ms = HIT_FLASH_MS;
                    boss_damage += damage;
                    consumed = true;
                }
            }
        }

        if consumed {
            state.bullets.remove(bi);
            state.burst(pos, 3, ParticleKind::Spark, 2.5);
        }
    }

    if boss_damage > 0.0 {
        state.emit(GameEvent::BossHit {
            damage: boss_damage,
        });
    }

    let kills = killed.len() as u32;
    for enemy in &killed {
        on_enemy_killed(state, config, enemy);
    }
    if kills > 0 {
        spawn::spawn_replacements(state, kills);
    }

    let boss_dead = state.boss.as_ref().is_some_and(|b| b.health <= 0.0);
    if boss_dead {
        if let Some(defeated) = state.boss.take() {
            boss::defeat_boss(state, defeated);
        }
    }
}

/// Outcome of advancing one boss projectile
enum ProjectileOutcome {
    Keep,
    Expire,
    HitPlayer(f32),
    Explode { pos: Vec2, radius: f32, damage: f32 },
}

fn advance_projectile(
    projectile: &mut BossProjectile,
    player_pos: Vec2,
    player_radius: f32,
    delta_ms: f32,
    f: f32,
) -> ProjectileOutcome {
    projectile.ttl_ms -= delta_ms;

    match &mut projectile.behavior {
        ProjectileBehavior::Homing { turn_rate } => {
            let speed = projectile.vel.length();
            let desired = direction_to(projectile.pos, player_pos) * speed;
            let blend = (*turn_rate * f).clamp(0.0, 1.0);
            projectile.vel = projectile.vel.lerp(desired, blend).normalize_or_zero() * speed;
        }
        ProjectileBehavior::Mine {
            arm_ms,
            explosion_radius,
        } => {
            *arm_ms -= delta_ms;
            if *arm_ms <= 0.0 {
                return ProjectileOutcome::Explode {
                    pos: projectile.pos,
                    radius: *explosion_radius,
                    damage: projectile.damage,
                };
            }
            // Unarmed mines are inert
            return if projectile.ttl_ms <= 0.0 {
                ProjectileOutcome::Expire
            } else {
                ProjectileOutcome::Keep
            };
        }
        ProjectileBehavior::Plain | ProjectileBehavior::LaserSegment => {}
    }

    projectile.pos += projectile.vel * f;

    if projectile.ttl_ms <= 0.0
        || !within_radius(projectile.pos, player_pos, PROJECTILE_DESPAWN_RANGE)
    {
        return ProjectileOutcome::Expire;
    }
    if circles_overlap(projectile.pos, projectile.radius, player_pos, player_radius) {
        return ProjectileOutcome::HitPlayer(projectile.damage);
    }
    ProjectileOutcome::Keep
}

/// Boss projectiles: steering, mines, expiry and player hits
pub fn resolve_boss_projectiles(state: &mut GameState, delta_ms: f32, f: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    for i in (0..state.boss_projectiles.len()).rev() {
        let outcome = advance_projectile(
            &mut state.boss_projectiles[i],
            player_pos,
            player_radius,
            delta_ms,
            f,
        );
        match outcome {
            ProjectileOutcome::Keep => {}
            ProjectileOutcome::Expire => {
                state.boss_projectiles.remove(i);
            }
            ProjectileOutcome::HitPlayer(damage) => {
                state.boss_projectiles.remove(i);
                damage_player(state, damage);
                state.burst(player_pos, 4, ParticleKind::Spark, 2.0);
            }
            ProjectileOutcome::Explode {
                pos,
                radius,
                damage,
            } => {
                state.boss_projectiles.remove(i);
                if within_radius(player_pos, pos, radius + player_radius) {
                    damage_player(state, damage);
                }
                state.burst(pos, 12, ParticleKind::Explosion, 5.0);
            }
        }
    }
}

/// Touching the boss hurts every frame
pub fn resolve_boss_contact(state: &mut GameState, f: f32) {
    let Some(boss) = state.boss.as_ref() else {
        return;
    };
    if circles_overlap(boss.pos, boss.radius, state.player.pos, state.player.radius) {
        let damage = BOSS_CONTACT_DAMAGE * boss.damage_multiplier * f;
        damage_player(state, damage);
    }
}

/// Terminal transition when the player runs out of health
pub fn check_player_death(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing || state.player.health > 0.0 {
        return false;
    }
    state.player.health = 0.0;
    state.phase = GamePhase::Dead;
    log::info!(
        "Player died: score {}, round {}, kills {}",
        state.score,
        state.progression.round,
        state.progression.total_kills
    );
    state.emit(GameEvent::PlayerDied { score: state.score });
    true
}

/// Full combat stage
pub fn resolve(state: &mut GameState, config: &EngineConfig, delta_ms: f32, f: f32) {
    resolve_bullets(state, config, f);
    resolve_boss_projectiles(state, delta_ms, f);
    if check_player_death(state) {
        return;
    }
    resolve_boss_contact(state, f);
    check_player_death(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::spawn_enemy;
    use crate::sim::state::{Bullet, DashState, EnemyKind};

    fn state() -> GameState {
        let mut state = GameState::new(21, &EngineConfig::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn bullet(state: &mut GameState, pos: Vec2, damage: f32, pierce: u32) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::new(0.1, 0.0),
            radius: BULLET_RADIUS,
            damage,
            pierce,
            traveled: 0.0,
            hit_ids: Vec::new(),
        });
    }

    fn line_of_enemies(state: &mut GameState, at: Vec2, count: usize) {
        for _ in 0..count {
            spawn_enemy(state, EnemyKind::Big, at);
        }
    }

    #[test]
    fn test_kill_gold_formula() {
        assert_eq!(kill_gold(1, false, 1), 1);
        assert_eq!(kill_gold(5, true, 1), 10);
        assert_eq!(kill_gold(2, true, 5), 20);
        assert_eq!(kill_gold(1, false, 3), 3);
    }

    #[test]
    fn test_single_use_bullet_hits_once() {
        let mut state = state();
        let at = state.player.pos + Vec2::new(300.0, 0.0);
        line_of_enemies(&mut state, at, 3);
        bullet(&mut state, at, 1.0, 0);
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert!(state.bullets.is_empty());
        let damaged = state.enemies.iter().filter(|e| e.health < e.max_health).count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn test_pierce_budget_limits_hits() {
        let mut state = state();
        let at = state.player.pos + Vec2::new(300.0, 0.0);
        line_of_enemies(&mut state, at, 5);
        bullet(&mut state, at, 1.0, 2);
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert!(state.bullets.is_empty());
        let damaged = state.enemies.iter().filter(|e| e.health < e.max_health).count();
        assert_eq!(damaged, 3);
    }

    #[test]
    fn test_piercing_bullet_survives_with_budget_left() {
        let mut state = state();
        let at = state.player.pos + Vec2::new(300.0, 0.0);
        line_of_enemies(&mut state, at, 1);
        bullet(&mut state, at, 1.0, 2);
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pierce, 1);
        // Same enemy is not struck twice by the same bullet
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert_eq!(state.enemies[0].health, state.enemies[0].max_health - 1.0);
    }

    #[test]
    fn test_kill_updates_combo_and_drops_gold() {
        let mut state = state();
        let at = state.player.pos + Vec2::new(300.0, 0.0);
        spawn_enemy(&mut state, EnemyKind::Normal, at);
        bullet(&mut state, at, 10.0, 0);
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert_eq!(state.progression.kills, 1);
        assert_eq!(state.progression.combo, 1);
        assert_eq!(state.gold_pickups.len(), 1);
        assert_eq!(state.gold_pickups[0].value, 1);
        // Two replacements
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_every_kill_in_a_pass_gets_its_own_replacements() {
        let mut state = state();
        let a = state.player.pos + Vec2::new(300.0, 0.0);
        let b = state.player.pos + Vec2::new(0.0, 300.0);
        spawn_enemy(&mut state, EnemyKind::Normal, a);
        spawn_enemy(&mut state, EnemyKind::Normal, b);
        bullet(&mut state, a, 10.0, 0);
        bullet(&mut state, b, 10.0, 0);
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert_eq!(state.progression.kills, 2);
        assert_eq!(state.enemies.len(), 4);
    }

    #[test]
    fn test_bullet_expires_past_range() {
        let mut state = state();
        let pos = state.player.pos;
        bullet(&mut state, pos, 1.0, 0);
        state.bullets[0].traveled = BULLET_RANGE;
        resolve_bullets(&mut state, &EngineConfig::default(), 1.0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shield_halves_damage() {
        let mut state = state();
        state.effects.apply_buff(crate::sim::effects::BuffKind::Shield);
        let applied = damage_player(&mut state, 20.0);
        assert_eq!(applied, 10.0);
    }

    #[test]
    fn test_health_never_negative() {
        let mut state = state();
        damage_player(&mut state, 10_000.0);
        assert_eq!(state.player.health, 0.0);
        assert!(check_player_death(&mut state));
        assert_eq!(state.phase, GamePhase::Dead);
        assert!(state.events.contains(&GameEvent::PlayerDied { score: 0 }));
        // Only fires once
        assert!(!check_player_death(&mut state));
    }

    #[test]
    fn test_projectile_hit_during_dash_is_absorbed() {
        let mut state = state();
        state.player.dash = DashState::Dashing { remaining_ms: 150.0 };
        state.boss_projectiles.push(BossProjectile {
            pos: state.player.pos,
            vel: Vec2::ZERO,
            radius: BOSS_PROJECTILE_RADIUS,
            damage: 25.0,
            ttl_ms: 1000.0,
            behavior: ProjectileBehavior::Plain,
        });
        resolve_boss_projectiles(&mut state, FRAME_MS, 1.0);
        assert!(state.boss_projectiles.is_empty());
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_mine_waits_then_explodes() {
        let mut state = state();
        state.boss_projectiles.push(BossProjectile {
            pos: state.player.pos + Vec2::new(30.0, 0.0),
            vel: Vec2::ZERO,
            radius: BOSS_PROJECTILE_RADIUS,
            damage: 20.0,
            ttl_ms: 10_000.0,
            behavior: ProjectileBehavior::Mine {
                arm_ms: 50.0,
                explosion_radius: 60.0,
            },
        });
        resolve_boss_projectiles(&mut state, 20.0, 1.0);
        assert_eq!(state.boss_projectiles.len(), 1);
        assert_eq!(state.player.health, state.player.max_health);
        resolve_boss_projectiles(&mut state, 40.0, 1.0);
        assert!(state.boss_projectiles.is_empty());
        assert_eq!(state.player.health, state.player.max_health - 20.0);
    }

    #[test]
    fn test_homing_turns_toward_player() {
        let mut state = state();
        let start = state.player.pos + Vec2::new(0.0, -500.0);
        state.boss_projectiles.push(BossProjectile {
            pos: start,
            vel: Vec2::new(5.0, 0.0),
            radius: BOSS_PROJECTILE_RADIUS,
            damage: 5.0,
            ttl_ms: 5000.0,
            behavior: ProjectileBehavior::Homing { turn_rate: 0.2 },
        });
        resolve_boss_projectiles(&mut state, FRAME_MS, 1.0);
        let vel = state.boss_projectiles[0].vel;
        assert!(vel.y > 0.0);
        assert!((vel.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_far_projectiles_are_discarded() {
        let mut state = state();
        state.boss_projectiles.push(BossProjectile {
            pos: state.player.pos + Vec2::new(PROJECTILE_DESPAWN_RANGE + 10.0, 0.0),
            vel: Vec2::ZERO,
            radius: BOSS_PROJECTILE_RADIUS,
            damage: 5.0,
            ttl_ms: 5000.0,
            behavior: ProjectileBehavior::Plain,
        });
        resolve_boss_projectiles(&mut state, FRAME_MS, 1.0);
        assert!(state.boss_projectiles.is_empty());
    }
}
