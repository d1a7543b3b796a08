//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, configuration and
//! sequence of inputs and frame deltas, a session plays out identically:
//! - Seeded RNG only
//! - Collections walked in a fixed order
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod combat;
pub mod effects;
pub mod movement;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use boss::{AttackPattern, BossPhase, MovementPattern};
pub use collision::{Contact, circle_contact, circles_overlap};
pub use effects::{ActiveEffects, BuffKind};
pub use progression::{Progression, combo_multiplier, difficulty_multiplier};
pub use state::{
    Boss, BossProjectile, Bullet, DashState, Enemy, EnemyKind, GameEvent, GamePhase, GameState,
    GoldPickup, Particle, ParticleKind, Player, PowerUp, PowerUpKind, ProjectileBehavior,
};
pub use tick::{TickInput, tick};
pub use weapon::CharacterClass;
