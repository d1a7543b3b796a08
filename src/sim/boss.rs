//! Boss controller
//!
//! One boss at a time. Its phase only ever escalates as health drops, its
//! movement pattern is fixed at spawn from the round number, and attacks are
//! drawn from the set of patterns the round has unlocked.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, TAU};

use super::collision::direction_to;
use super::progression::{StatScale, difficulty_multiplier};
use super::spawn;
use super::state::{
    Boss, BossProjectile, GameEvent, GameState, ParticleKind, PowerUpKind, ProjectileBehavior,
};
use crate::consts::*;

/// Health-gated escalation. Ordering follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    Normal,
    Enraged,
    Desperate,
    FinalStand,
}

impl BossPhase {
    /// Phase a boss at `fraction` of its max health belongs in
    pub fn for_health_fraction(fraction: f32) -> Self {
        if fraction <= 0.25 {
            BossPhase::FinalStand
        } else if fraction <= 0.5 {
            BossPhase::Desperate
        } else if fraction <= 0.75 {
            BossPhase::Enraged
        } else {
            BossPhase::Normal
        }
    }

    /// Attack cooldown factor
    pub fn cooldown_factor(self) -> f32 {
        match self {
            BossPhase::Normal => 1.0,
            BossPhase::Enraged => 0.8,
            BossPhase::Desperate => 0.7,
            BossPhase::FinalStand => 0.5,
        }
    }

    /// Minion cooldown factor
    pub fn minion_factor(self) -> f32 {
        match self {
            BossPhase::Normal => 1.0,
            BossPhase::Enraged => 0.8,
            BossPhase::Desperate => 0.6,
            BossPhase::FinalStand => 0.4,
        }
    }
}

/// Charge routine sub-state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChargeState {
    /// Standing still, counting down to the next charge
    WindingUp { timer_ms: f32 },
    /// Sliding along `vel`, decelerating each frame
    Charging { vel: Vec2 },
}

/// Movement routine, chosen once per boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementPattern {
    Stationary,
    /// Orbit `center` at a fixed radius
    Circle { center: Vec2, angle: f32 },
    /// Blink to a new spot near the player on a timer
    Teleport { timer_ms: f32 },
    Charge(ChargeState),
    /// Slow pursuit that never closes inside a minimum distance
    Follow,
}

const ORBIT_RADIUS: f32 = 250.0;
const ORBIT_SPEED: f32 = 0.015;
const TELEPORT_INTERVAL_MS: f32 = 3000.0;
const CHARGE_WINDUP_MS: f32 = 2000.0;
const CHARGE_SPEED: f32 = 12.0;
const CHARGE_DECAY: f32 = 0.95;
const FOLLOW_SPEED: f32 = 1.5;
const FOLLOW_MIN_DISTANCE: f32 = 200.0;

impl MovementPattern {
    /// Routine for a boss spawned in `round` at `anchor`
    pub fn for_round(round: u32, anchor: Vec2) -> Self {
        match round {
            10.. => MovementPattern::Follow,
            7..=9 => MovementPattern::Charge(ChargeState::WindingUp {
                timer_ms: CHARGE_WINDUP_MS,
            }),
            5..=6 => MovementPattern::Teleport {
                timer_ms: TELEPORT_INTERVAL_MS,
            },
            // Orbit starts where the boss stands
            3..=4 => MovementPattern::Circle {
                center: anchor - Vec2::new(ORBIT_RADIUS, 0.0),
                angle: 0.0,
            },
            _ => MovementPattern::Stationary,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MovementPattern::Stationary => "stationary",
            MovementPattern::Circle { .. } => "circle",
            MovementPattern::Teleport { .. } => "teleport",
            MovementPattern::Charge(_) => "charge",
            MovementPattern::Follow => "follow",
        }
    }
}

/// Attack patterns in unlock order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPattern {
    Direct,
    Spread,
    Spiral,
    Ring,
    Wave,
    Cross,
    Homing,
    Laser,
    Minefield,
}

impl AttackPattern {
    pub const ALL: [AttackPattern; 9] = [
        AttackPattern::Direct,
        AttackPattern::Spread,
        AttackPattern::Spiral,
        AttackPattern::Ring,
        AttackPattern::Wave,
        AttackPattern::Cross,
        AttackPattern::Homing,
        AttackPattern::Laser,
        AttackPattern::Minefield,
    ];

    /// First round this pattern is available
    pub fn unlock_round(self) -> u32 {
        match self {
            AttackPattern::Direct | AttackPattern::Spread => 1,
            AttackPattern::Spiral => 2,
            AttackPattern::Ring => 3,
            AttackPattern::Wave => 4,
            AttackPattern::Cross => 5,
            AttackPattern::Homing => 6,
            AttackPattern::Laser => 8,
            AttackPattern::Minefield => 10,
        }
    }

    /// Patterns available in `round`; grows monotonically with the round
    pub fn unlocked_for_round(round: u32) -> Vec<AttackPattern> {
        Self::ALL
            .into_iter()
            .filter(|p| p.unlock_round() <= round.max(1))
            .collect()
    }

    /// Generate this pattern's projectiles
    pub fn execute(self, ctx: &AttackContext, rng: &mut Pcg32) -> Vec<BossProjectile> {
        match self {
            AttackPattern::Direct => direct(ctx),
            AttackPattern::Spread => spread(ctx),
            AttackPattern::Spiral => spiral(ctx),
            AttackPattern::Ring => ring(ctx),
            AttackPattern::Wave => wave(ctx),
            AttackPattern::Cross => cross(ctx, rng),
            AttackPattern::Homing => homing(ctx),
            AttackPattern::Laser => laser(ctx),
            AttackPattern::Minefield => minefield(ctx, rng),
        }
    }
}

/// Everything a pattern needs to aim
#[derive(Debug, Clone, Copy)]
pub struct AttackContext {
    pub origin: Vec2,
    pub origin_radius: f32,
    pub target: Vec2,
    pub target_vel: Vec2,
    pub round: u32,
    pub phase: BossPhase,
    pub damage_multiplier: f32,
    pub spiral_angle: f32,
}

impl AttackContext {
    fn aim(&self) -> f32 {
        let d = self.target - self.origin;
        d.y.atan2(d.x)
    }

    fn damage(&self, factor: f32) -> f32 {
        BOSS_PROJECTILE_DAMAGE * self.damage_multiplier * factor
    }

    /// Projectile leaving the boss rim along `angle`
    fn shot(&self, angle: f32, speed: f32, damage: f32) -> BossProjectile {
        let dir = Vec2::from_angle(angle);
        BossProjectile {
            pos: self.origin + dir * self.origin_radius,
            vel: dir * speed,
            radius: BOSS_PROJECTILE_RADIUS,
            damage,
            ttl_ms: 8000.0,
            behavior: ProjectileBehavior::Plain,
        }
    }
}

/// Count that grows with the round up to a cap
fn scaled_count(base: u32, round: u32, per_rounds: u32, cap: u32) -> u32 {
    (base + round / per_rounds.max(1)).min(cap)
}

fn direct(ctx: &AttackContext) -> Vec<BossProjectile> {
    let speed = BOSS_PROJECTILE_SPEED * 1.6;
    let count = scaled_count(1, ctx.round, 3, 4);
    // Lead the target by its travel time
    let frames = ctx.origin.distance(ctx.target) / speed;
    let predicted = ctx.target + ctx.target_vel * frames;
    let d = predicted - ctx.origin;
    let aim = d.y.atan2(d.x);
    (0..count)
        .map(|i| {
            let offset = (i as f32 - (count - 1) as f32 / 2.0) * 0.08;
            ctx.shot(aim + offset, speed, ctx.damage(1.2))
        })
        .collect()
}

fn spread(ctx: &AttackContext) -> Vec<BossProjectile> {
    let count = scaled_count(5, ctx.round, 2, 11);
    let cone = 60_f32.to_radians();
    let aim = ctx.aim();
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            ctx.shot(aim - cone / 2.0 + cone * t, BOSS_PROJECTILE_SPEED, ctx.damage(1.0))
        })
        .collect()
}

fn spiral(ctx: &AttackContext) -> Vec<BossProjectile> {
    let count = scaled_count(12, ctx.round, 1, 24);
    (0..count)
        .map(|i| {
            let angle = ctx.spiral_angle + TAU * i as f32 / count as f32;
            // Staggered speeds give the arms their curl
            let speed = BOSS_PROJECTILE_SPEED * (0.6 + 0.4 * i as f32 / count as f32);
            ctx.shot(angle, speed, ctx.damage(0.8))
        })
        .collect()
}

fn ring(ctx: &AttackContext) -> Vec<BossProjectile> {
    let count = (16 + 2 * ctx.round).min(36);
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            ctx.shot(angle, BOSS_PROJECTILE_SPEED * 0.8, ctx.damage(0.8))
        })
        .collect()
}

fn wave(ctx: &AttackContext) -> Vec<BossProjectile> {
    let count = scaled_count(7, ctx.round, 2, 15);
    let width = 1.2;
    let aim = ctx.aim();
    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let speed = BOSS_PROJECTILE_SPEED * (0.75 + 0.25 * (i as f32 * 0.9).sin());
            ctx.shot(aim - width / 2.0 + width * t, speed, ctx.damage(0.9))
        })
        .collect()
}

fn cross(ctx: &AttackContext, rng: &mut Pcg32) -> Vec<BossProjectile> {
    let arms = if ctx.phase >= BossPhase::Desperate || ctx.round >= 8 {
        8
    } else {
        4
    };
    let base = if rng.random_bool(0.5) { 0.0 } else { FRAC_PI_4 };
    let mut shots = Vec::with_capacity(arms * 3);
    for arm in 0..arms {
        let angle = base + TAU * arm as f32 / arms as f32;
        for speed in [0.8, 1.0, 1.2] {
            shots.push(ctx.shot(angle, BOSS_PROJECTILE_SPEED * speed, ctx.damage(1.0)));
        }
    }
    shots
}

fn homing(ctx: &AttackContext) -> Vec<BossProjectile> {
    let count = scaled_count(2, ctx.round, 4, 6);
    let aim = ctx.aim();
    (0..count)
        .map(|i| {
            let offset = (i as f32 - (count - 1) as f32 / 2.0) * 0.5;
            let mut shot = ctx.shot(aim + offset, BOSS_PROJECTILE_SPEED * 0.7, ctx.damage(1.0));
            shot.ttl_ms = 4000.0;
            shot.behavior = ProjectileBehavior::Homing { turn_rate: 0.05 };
            shot
        })
        .collect()
}

fn laser(ctx: &AttackContext) -> Vec<BossProjectile> {
    let segments = scaled_count(20, ctx.round, 1, 40);
    let spacing = 25.0;
    let dir = Vec2::from_angle(ctx.aim());
    (0..segments)
        .map(|i| BossProjectile {
            pos: ctx.origin + dir * (ctx.origin_radius + spacing * i as f32),
            vel: Vec2::ZERO,
            radius: BOSS_PROJECTILE_RADIUS * 1.5,
            damage: ctx.damage(0.5),
            ttl_ms: 800.0,
            behavior: ProjectileBehavior::LaserSegment,
        })
        .collect()
}

fn minefield(ctx: &AttackContext, rng: &mut Pcg32) -> Vec<BossProjectile> {
    let count = scaled_count(3, ctx.round, 3, 10);
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            let dist = rng.random_range(40.0..300.0);
            BossProjectile {
                pos: crate::clamp_to_world(crate::polar_offset(ctx.target, dist, angle), 0.0),
                vel: Vec2::ZERO,
                radius: BOSS_PROJECTILE_RADIUS * 1.2,
                damage: ctx.damage(2.0),
                ttl_ms: 10_000.0,
                behavior: ProjectileBehavior::Mine {
                    arm_ms: 1500.0,
                    explosion_radius: 80.0,
                },
            }
        })
        .collect()
}

/// Cooldown for the next attack cycle, randomized ±30%
pub fn next_cooldown(round: u32, phase: BossPhase, rng: &mut Pcg32) -> f32 {
    let base = (BOSS_BASE_COOLDOWN_MS - 100.0 * round.saturating_sub(1) as f32)
        .max(BOSS_MIN_COOLDOWN_MS);
    base * phase.cooldown_factor() * rng.random_range(0.7..=1.3)
}

/// Pick the next pattern: 30% uniform random, otherwise the one after the
/// current in unlock order
pub fn select_attack(boss: &mut Boss, rng: &mut Pcg32) -> AttackPattern {
    let len = boss.unlocked.len().max(1);
    let index = if rng.random_bool(0.3) {
        rng.random_range(0..len)
    } else {
        (boss.current_attack + 1) % len
    };
    boss.current_attack = index;
    boss.unlocked
        .get(index)
        .copied()
        .unwrap_or(AttackPattern::Direct)
}

/// Build a boss for `round` near `player_pos`
pub fn create_boss(id: u32, round: u32, player_pos: Vec2, rng: &mut Pcg32) -> Boss {
    let pos = crate::clamp_to_world(
        crate::polar_offset(player_pos, BOSS_SPAWN_DISTANCE, -std::f32::consts::FRAC_PI_2),
        BOSS_RADIUS,
    );
    let scale = StatScale::for_round(round);
    let health = BOSS_BASE_HEALTH * scale.health;
    let phase = BossPhase::Normal;
    Boss {
        id,
        round,
        pos,
        radius: (BOSS_RADIUS * scale.size).min(BOSS_RADIUS * 2.0),
        health,
        max_health: health,
        phase,
        movement: MovementPattern::for_round(round, pos),
        attack_cooldown_ms: next_cooldown(round, phase, rng),
        unlocked: AttackPattern::unlocked_for_round(round),
        current_attack: 0,
        spiral_angle: 0.0,
        minion_timer_ms: BOSS_MINION_COOLDOWN_MS,
        damage_multiplier: difficulty_multiplier(round),
        hit_flash_ms: 0.0,
    }
}

/// Spawn the boss once the kill threshold is met
pub fn try_spawn_boss(state: &mut GameState) -> bool {
    if state.boss.is_some() || !state.progression.boss_due() {
        return false;
    }
    let round = state.progression.round;
    let id = state.next_entity_id();
    let boss = create_boss(id, round, state.player.pos, &mut state.rng);
    log::info!(
        "Boss spawned for round {} ({} hp, {} movement, {} patterns)",
        round,
        boss.max_health,
        boss.movement.name(),
        boss.unlocked.len()
    );
    state.enemies.clear();
    state.boss_projectiles.clear();
    state.boss = Some(boss);
    state.progression.boss_spawned = true;
    state.emit(GameEvent::BossSpawned { round });
    true
}

/// Escalate the phase if health has crossed a threshold; never regresses
pub fn update_phase(boss: &mut Boss) -> Option<BossPhase> {
    let fraction = if boss.max_health > 0.0 {
        boss.health / boss.max_health
    } else {
        0.0
    };
    let candidate = BossPhase::for_health_fraction(fraction);
    if candidate > boss.phase {
        boss.phase = candidate;
        Some(candidate)
    } else {
        None
    }
}

/// Run the boss's movement routine for one tick
pub fn move_boss(boss: &mut Boss, player_pos: Vec2, rng: &mut Pcg32, delta_ms: f32, f: f32) {
    match &mut boss.movement {
        MovementPattern::Stationary => {}
        MovementPattern::Circle { center, angle } => {
            *angle = crate::normalize_angle(*angle + ORBIT_SPEED * f);
            boss.pos = crate::polar_offset(*center, ORBIT_RADIUS, *angle);
        }
        MovementPattern::Teleport { timer_ms } => {
            *timer_ms -= delta_ms;
            if *timer_ms <= 0.0 {
                *timer_ms = TELEPORT_INTERVAL_MS;
                let angle = rng.random_range(0.0..TAU);
                let dist = rng.random_range(300.0..500.0);
                boss.pos = crate::polar_offset(player_pos, dist, angle);
            }
        }
        MovementPattern::Charge(charge) => match charge {
            ChargeState::WindingUp { timer_ms } => {
                *timer_ms -= delta_ms;
                if *timer_ms <= 0.0 {
                    *charge = ChargeState::Charging {
                        vel: direction_to(boss.pos, player_pos) * CHARGE_SPEED,
                    };
                }
            }
            ChargeState::Charging { vel } => {
                boss.pos += *vel * f;
                *vel *= CHARGE_DECAY.powf(f);
                if vel.length() < 0.5 {
                    *charge = ChargeState::WindingUp {
                        timer_ms: CHARGE_WINDUP_MS,
                    };
                }
            }
        },
        MovementPattern::Follow => {
            let dist = boss.pos.distance(player_pos);
            if dist > FOLLOW_MIN_DISTANCE {
                let step = (FOLLOW_SPEED * f).min(dist - FOLLOW_MIN_DISTANCE);
                boss.pos += direction_to(boss.pos, player_pos) * step;
            }
        }
    }
    boss.pos = crate::clamp_to_world(boss.pos, boss.radius);
}

fn attack_context(boss: &Boss, state: &GameState) -> AttackContext {
    AttackContext {
        origin: boss.pos,
        origin_radius: boss.radius,
        target: state.player.pos,
        target_vel: state.player.vel,
        round: boss.round,
        phase: boss.phase,
        damage_multiplier: boss.damage_multiplier,
        spiral_angle: boss.spiral_angle,
    }
}

fn run_pattern(boss: &mut Boss, state: &mut GameState, pattern: AttackPattern) {
    let ctx = attack_context(boss, state);
    let shots = pattern.execute(&ctx, &mut state.rng);
    log::debug!("Boss attack {:?}: {} projectiles", pattern, shots.len());
    state.boss_projectiles.extend(shots);
    if matches!(pattern, AttackPattern::Spiral | AttackPattern::Cross) {
        boss.spiral_angle = crate::normalize_angle(boss.spiral_angle + 0.35);
    }
}

/// Attack cycle: select, execute, maybe follow up immediately
fn attack(boss: &mut Boss, state: &mut GameState) {
    let first = select_attack(boss, &mut state.rng);
    run_pattern(boss, state, first);

    let follow_up_chance = state.rng.random_range(0.4..=0.6);
    if state.rng.random::<f32>() < follow_up_chance {
        let second = if state.rng.random_bool(0.5) {
            first
        } else {
            let index = state.rng.random_range(0..boss.unlocked.len().max(1));
            boss.unlocked.get(index).copied().unwrap_or(first)
        };
        run_pattern(boss, state, second);
    }
}

/// Per-tick boss update. A boss at zero health is defeated before it can
/// move or attack.
pub fn update(state: &mut GameState, delta_ms: f32, f: f32) {
    let Some(mut boss) = state.boss.take() else {
        return;
    };
    if boss.health <= 0.0 {
        defeat_boss(state, boss);
        return;
    }

    if let Some(phase) = update_phase(&mut boss) {
        log::info!("Boss entered {:?} phase", phase);
        state.emit(GameEvent::BossPhaseChanged { phase });
    }

    boss.hit_flash_ms = (boss.hit_flash_ms - delta_ms).max(0.0);
    move_boss(&mut boss, state.player.pos, &mut state.rng, delta_ms, f);

    boss.attack_cooldown_ms -= delta_ms;
    if boss.attack_cooldown_ms <= 0.0 {
        attack(&mut boss, state);
        boss.attack_cooldown_ms = next_cooldown(boss.round, boss.phase, &mut state.rng);
    }

    if boss.round >= BOSS_MINION_ROUND {
        boss.minion_timer_ms -= delta_ms;
        if boss.minion_timer_ms <= 0.0 {
            let count = (2 + boss.round / 4).min(6) as usize;
            let spawned = spawn::spawn_minions(state, boss.pos, boss.radius + 40.0, count);
            log::debug!("Boss summoned {} minions", spawned);
            boss.minion_timer_ms = BOSS_MINION_COOLDOWN_MS * boss.phase.minion_factor();
        }
    }

    state.boss = Some(boss);
}

/// Boss death: clear its projectiles, drop loot, advance the round.
///
/// The caller has already detached the boss from the state.
pub fn defeat_boss(state: &mut GameState, boss: Boss) {
    let round = boss.round;
    state.boss_projectiles.clear();

    let coins = (8 + 2 * round).min(30);
    for _ in 0..coins {
        let angle = state.rng.random_range(0.0..TAU);
        let dist = state.rng.random_range(10.0..80.0);
        state.spawn_gold(crate::polar_offset(boss.pos, dist, angle), 5 * round as u64);
    }
    let power_ups = 1 + (round / 5).min(2);
    for i in 0..power_ups {
        let index = state.rng.random_range(0..PowerUpKind::ALL.len());
        let angle = TAU * i as f32 / power_ups as f32;
        state.spawn_power_up(crate::polar_offset(boss.pos, 30.0, angle), PowerUpKind::ALL[index]);
    }

    state.burst(boss.pos, 40, ParticleKind::Explosion, 7.0);
    state.score += BOSS_SCORE * round as u64;
    state.progression.reset_combo();
    state.progression.advance_round();
    state.spawn_timer_ms = 0.0;

    log::info!(
        "Boss defeated in round {}; advancing to round {}",
        round,
        state.progression.round
    );
    state.emit(GameEvent::BossDefeated { round });
    state.emit(GameEvent::RoundAdvanced {
        round: state.progression.round,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sim::GamePhase;
    use rand::SeedableRng;

    fn state() -> GameState {
        let mut state = GameState::new(77, &EngineConfig::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn ctx(round: u32) -> AttackContext {
        AttackContext {
            origin: Vec2::splat(1000.0),
            origin_radius: BOSS_RADIUS,
            target: Vec2::new(1000.0, 1400.0),
            target_vel: Vec2::ZERO,
            round,
            phase: BossPhase::Normal,
            damage_multiplier: difficulty_multiplier(round),
            spiral_angle: 0.0,
        }
    }

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(BossPhase::for_health_fraction(1.0), BossPhase::Normal);
        assert_eq!(BossPhase::for_health_fraction(0.75), BossPhase::Enraged);
        assert_eq!(BossPhase::for_health_fraction(0.5), BossPhase::Desperate);
        assert_eq!(BossPhase::for_health_fraction(0.25), BossPhase::FinalStand);
        assert_eq!(BossPhase::for_health_fraction(0.0), BossPhase::FinalStand);
    }

    #[test]
    fn test_phase_never_regresses() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = create_boss(1, 3, Vec2::splat(1500.0), &mut rng);
        boss.health = boss.max_health * 0.4;
        assert_eq!(update_phase(&mut boss), Some(BossPhase::Desperate));
        boss.health = boss.max_health;
        assert_eq!(update_phase(&mut boss), None);
        assert_eq!(boss.phase, BossPhase::Desperate);
    }

    #[test]
    fn test_movement_by_round() {
        let anchor = Vec2::ZERO;
        assert_eq!(MovementPattern::for_round(1, anchor).name(), "stationary");
        assert_eq!(MovementPattern::for_round(3, anchor).name(), "circle");
        assert_eq!(MovementPattern::for_round(5, anchor).name(), "teleport");
        assert_eq!(MovementPattern::for_round(7, anchor).name(), "charge");
        assert_eq!(MovementPattern::for_round(10, anchor).name(), "follow");
        assert_eq!(MovementPattern::for_round(25, anchor).name(), "follow");
    }

    #[test]
    fn test_unlocked_set_grows_with_round() {
        let mut previous = 0;
        for round in 1..=12 {
            let unlocked = AttackPattern::unlocked_for_round(round);
            assert!(unlocked.len() >= previous);
            previous = unlocked.len();
        }
        assert_eq!(AttackPattern::unlocked_for_round(1).len(), 2);
        assert_eq!(AttackPattern::unlocked_for_round(10).len(), 9);
    }

    #[test]
    fn test_selection_stays_in_unlocked_set() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut boss = create_boss(1, 4, Vec2::splat(1500.0), &mut rng);
        for _ in 0..200 {
            let pattern = select_attack(&mut boss, &mut rng);
            assert!(boss.unlocked.contains(&pattern));
            assert!(pattern.unlock_round() <= 4);
        }
    }

    #[test]
    fn test_every_pattern_produces_projectiles() {
        let mut rng = Pcg32::seed_from_u64(8);
        let ctx = ctx(10);
        for pattern in AttackPattern::ALL {
            let shots = pattern.execute(&ctx, &mut rng);
            assert!(!shots.is_empty(), "{:?} produced nothing", pattern);
            for shot in &shots {
                assert!(shot.damage > 0.0);
            }
        }
    }

    #[test]
    fn test_counts_and_damage_scale_with_round() {
        let mut rng = Pcg32::seed_from_u64(8);
        let early = AttackPattern::Ring.execute(&ctx(1), &mut rng);
        let late = AttackPattern::Ring.execute(&ctx(9), &mut rng);
        assert!(late.len() > early.len());
        assert!(late[0].damage > early[0].damage);
    }

    #[test]
    fn test_mines_and_lasers_are_stationary() {
        let mut rng = Pcg32::seed_from_u64(2);
        let ctx = ctx(10);
        for shot in AttackPattern::Minefield.execute(&ctx, &mut rng) {
            assert_eq!(shot.vel, Vec2::ZERO);
            assert!(matches!(shot.behavior, ProjectileBehavior::Mine { .. }));
        }
        for shot in AttackPattern::Laser.execute(&ctx, &mut rng) {
            assert_eq!(shot.vel, Vec2::ZERO);
            assert_eq!(shot.behavior, ProjectileBehavior::LaserSegment);
        }
    }

    #[test]
    fn test_cooldown_jitter_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let cd = next_cooldown(1, BossPhase::Normal, &mut rng);
            assert!((BOSS_BASE_COOLDOWN_MS * 0.7..=BOSS_BASE_COOLDOWN_MS * 1.3).contains(&cd));
            let fs = next_cooldown(1, BossPhase::FinalStand, &mut rng);
            assert!(fs <= BOSS_BASE_COOLDOWN_MS * 1.3 * 0.5);
        }
    }

    #[test]
    fn test_spawn_clears_enemies_once() {
        let mut state = state();
        spawn::spawn_replacements(&mut state, 3);
        state.progression.kills = BOSS_KILL_THRESHOLD;
        assert!(try_spawn_boss(&mut state));
        assert!(state.enemies.is_empty());
        assert!(state.progression.boss_spawned);
        assert!(!try_spawn_boss(&mut state));
    }

    #[test]
    fn test_follow_keeps_minimum_distance() {
        let mut rng = Pcg32::seed_from_u64(4);
        let player = Vec2::splat(1500.0);
        let mut boss = create_boss(1, 10, player, &mut rng);
        boss.pos = player + Vec2::new(FOLLOW_MIN_DISTANCE + 1.0, 0.0);
        for _ in 0..10 {
            move_boss(&mut boss, player, &mut rng, FRAME_MS, 1.0);
        }
        assert!(boss.pos.distance(player) >= FOLLOW_MIN_DISTANCE - 1e-3);
    }

    #[test]
    fn test_charge_cycle() {
        let mut rng = Pcg32::seed_from_u64(4);
        let player = Vec2::splat(1500.0);
        let mut boss = create_boss(1, 7, player, &mut rng);
        let start = boss.pos;
        move_boss(&mut boss, player, &mut rng, CHARGE_WINDUP_MS, 1.0);
        assert!(matches!(boss.movement, MovementPattern::Charge(ChargeState::Charging { .. })));
        move_boss(&mut boss, player, &mut rng, FRAME_MS, 1.0);
        assert!(boss.pos.distance(player) < start.distance(player));
        // Decays below the stop speed in ~62 frames, well before the next wind-up ends
        for _ in 0..80 {
            move_boss(&mut boss, player, &mut rng, FRAME_MS, 1.0);
        }
        assert!(matches!(boss.movement, MovementPattern::Charge(ChargeState::WindingUp { .. })));
    }

    #[test]
    fn test_dead_boss_is_defeated_before_acting() {
        let mut state = state();
        state.progression.kills = BOSS_KILL_THRESHOLD;
        try_spawn_boss(&mut state);
        if let Some(boss) = state.boss.as_mut() {
            boss.health = 0.0;
            boss.attack_cooldown_ms = 0.0;
        }
        let mut rng = Pcg32::seed_from_u64(1);
        state.boss_projectiles.extend(AttackPattern::Direct.execute(&ctx(1), &mut rng));
        update(&mut state, FRAME_MS, 1.0);
        assert!(state.boss.is_none());
        assert!(state.boss_projectiles.is_empty());
        assert_eq!(state.progression.round, 2);
        assert_eq!(state.progression.kills, 0);
        assert!(!state.progression.boss_spawned);
        assert!(state.gold_pickups.len() > 1);
        assert!(!state.power_ups.is_empty());
    }

    #[test]
    fn test_minions_only_from_round_four() {
        let mut state = state();
        state.progression.round = 4;
        state.progression.kills = BOSS_KILL_THRESHOLD;
        try_spawn_boss(&mut state);
        if let Some(boss) = state.boss.as_mut() {
            boss.minion_timer_ms = 1.0;
            boss.attack_cooldown_ms = 1.0e9;
        }
        update(&mut state, FRAME_MS, 1.0);
        assert_eq!(state.enemies.len(), 3);

        let mut early = self::state();
        early.progression.kills = BOSS_KILL_THRESHOLD;
        try_spawn_boss(&mut early);
        if let Some(boss) = early.boss.as_mut() {
            boss.minion_timer_ms = 1.0;
            boss.attack_cooldown_ms = 1.0e9;
        }
        update(&mut early, FRAME_MS, 1.0);
        assert!(early.enemies.is_empty());
    }
}
