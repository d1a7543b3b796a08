//! Game state and core simulation types
//!
//! Every mutable collection the simulation touches lives in [`GameState`].
//! Behavior lives in the sibling modules; this file only defines the data and
//! the insertion contracts (id allocation, particle cap, loot placement).

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{AttackPattern, BossPhase, MovementPattern};
use super::effects::ActiveEffects;
use super::progression::Progression;
use crate::config::EngineConfig;
use crate::consts::*;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for `start()`
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen until `resume()`
    Paused,
    /// Player died; terminal until `restart()`
    Dead,
}

/// Player dash state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DashState {
    Idle,
    /// Moving at dash speed, invulnerable
    Dashing { remaining_ms: f32 },
    /// Dash spent, waiting to recharge
    Cooldown { remaining_ms: f32 },
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub base_speed: f32,
    /// Aim direction (radians)
    pub rotation: f32,
    pub dash: DashState,
    /// Milliseconds until the weapon may fire again
    pub fire_cooldown_ms: f32,
}

impl Player {
    pub fn new(max_health: f32, base_speed: f32) -> Self {
        Self {
            pos: Vec2::splat(WORLD_SIZE / 2.0),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: max_health,
            max_health,
            base_speed,
            rotation: 0.0,
            dash: DashState::Idle,
            fire_cooldown_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        matches!(self.dash, DashState::Dashing { .. })
    }

    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Change max health, keeping current health within the new ceiling
    pub fn set_max_health(&mut self, max_health: f32) {
        self.max_health = max_health;
        self.health = self.health.min(max_health);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Big,
}

/// A chasing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage dealt to the player
    pub damage: f32,
    pub gold: u64,
    pub score: u64,
    #[serde(default)]
    pub hit_flash_ms: f32,
}

/// The round boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    /// Round this boss was spawned for
    pub round: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub phase: BossPhase,
    pub movement: MovementPattern,
    /// Milliseconds until the next attack cycle
    pub attack_cooldown_ms: f32,
    /// Patterns available this round, in unlock order
    pub unlocked: Vec<AttackPattern>,
    /// Index into `unlocked` of the last executed pattern
    pub current_attack: usize,
    /// Rotating offset used by spiral/cross patterns
    pub spiral_angle: f32,
    pub minion_timer_ms: f32,
    /// `D(round)` captured at spawn
    pub damage_multiplier: f32,
    #[serde(default)]
    pub hit_flash_ms: f32,
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Extra enemies this bullet may pass through (0 = single use)
    pub pierce: u32,
    /// Distance covered so far
    pub traveled: f32,
    /// Enemies already struck, so a piercing bullet never hits one twice
    #[serde(default)]
    pub hit_ids: Vec<u32>,
}

/// Special behavior attached to a boss projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileBehavior {
    Plain,
    /// Steers toward the player by `turn_rate` per reference frame
    Homing { turn_rate: f32 },
    /// Stationary piece of a laser beam
    LaserSegment,
    /// Stationary until armed, then explodes once
    Mine { arm_ms: f32, explosion_radius: f32 },
}

/// A boss projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub ttl_ms: f32,
    pub behavior: ProjectileBehavior,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Instant heal
    Health,
    Speed,
    Damage,
    FireRate,
    Shield,
    GoldMultiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Health,
        PowerUpKind::Speed,
        PowerUpKind::Damage,
        PowerUpKind::FireRate,
        PowerUpKind::Shield,
        PowerUpKind::GoldMultiplier,
    ];
}

/// A power-up lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub ttl_ms: f32,
    pub magnet_active: bool,
}

/// A gold coin lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldPickup {
    pub id: u32,
    pub value: u64,
    pub pos: Vec2,
    pub ttl_ms: f32,
    pub magnet_active: bool,
}

/// Particle palette hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Spark,
    Death,
    Gold,
    Explosion,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Everything the host may want to react to after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyHit { id: u32, damage: f32, position: Vec2 },
    EnemyKilled { kind: EnemyKind, gold: u64, position: Vec2 },
    BossHit { damage: f32 },
    GoldCollected { amount: u64 },
    PowerUpCollected { kind: PowerUpKind },
    PlayerDamaged { amount: f32 },
    BossSpawned { round: u32 },
    BossPhaseChanged { phase: BossPhase },
    BossDefeated { round: u32 },
    RoundAdvanced { round: u32 },
    PlayerDied { score: u64 },
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub ticks: u64,
    /// Simulated time in milliseconds
    pub elapsed_ms: f64,
    pub score: u64,
    /// Gold collected this session
    pub gold_collected: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub bullets: Vec<Bullet>,
    pub boss_projectiles: Vec<BossProjectile>,
    pub gold_pickups: Vec<GoldPickup>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub effects: ActiveEffects,
    pub progression: Progression,
    /// Milliseconds accumulated toward the next timed wave
    pub spawn_timer_ms: f32,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh session state
    pub fn new(seed: u64, config: &EngineConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            ticks: 0,
            elapsed_ms: 0.0,
            score: 0,
            gold_collected: 0,
            player: Player::new(config.player_max_health, config.player_speed),
            enemies: Vec::new(),
            boss: None,
            bullets: Vec::new(),
            boss_projectiles: Vec::new(),
            gold_pickups: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            effects: ActiveEffects::default(),
            progression: Progression::default(),
            spawn_timer_ms: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop a gold coin at `pos`
    pub fn spawn_gold(&mut self, pos: Vec2, value: u64) {
        if value == 0 {
            return;
        }
        let id = self.next_entity_id();
        self.gold_pickups.push(GoldPickup {
            id,
            value,
            pos: crate::clamp_to_world(pos, PICKUP_RADIUS),
            ttl_ms: GOLD_TTL_MS,
            magnet_active: false,
        });
    }

    /// Drop a power-up at `pos`
    pub fn spawn_power_up(&mut self, pos: Vec2, kind: PowerUpKind) {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp {
            id,
            kind,
            pos: crate::clamp_to_world(pos, PICKUP_RADIUS),
            ttl_ms: POWER_UP_TTL_MS,
            magnet_active: false,
        });
    }

    /// Burst of particles around `pos`; oldest particles make room at the cap
    pub fn burst(&mut self, pos: Vec2, count: usize, kind: ParticleKind, speed: f32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let magnitude = speed * self.rng.random_range(0.3..1.0);
            let size = self.rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos,
                vel: Vec2::from_angle(angle) * magnitude,
                kind,
                life: 1.0,
                size,
            });
        }
    }
}
