//! Host-facing engine
//!
//! Owns one [`GameState`] plus the [`EngineConfig`] that outlives it. Hosts
//! construct it with a class and seed, push configuration through the
//! setters, call [`Engine::tick`] once per rendered frame, poll the getters
//! for the HUD and drain events afterwards.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::loadout::Loadout;
use crate::sim::{BuffKind, CharacterClass, GameEvent, GamePhase, GameState, TickInput};

/// Receives the events the persistence layer cares about.
///
/// `on_event` sees every event in emission order before the typed callbacks.
pub trait GameObserver {
    /// Gold credited to the player.
    ///
    /// Fires when a coin is collected, not when the enemy dies, so coins that
    /// expire on the ground are never reported.
    fn on_enemy_kill(&mut self, gold: u64);
    /// Final score of a finished run
    fn on_player_death(&mut self, score: u64);
    fn on_event(&mut self, _event: &GameEvent) {}
}

/// Snapshot of running power-ups for HUD display
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffectsView {
    pub speed_ms: f32,
    pub damage_ms: f32,
    pub fire_rate_ms: f32,
    pub shield_ms: f32,
    pub gold_multiplier_ms: f32,
}

impl ActiveEffectsView {
    pub fn shield_active(&self) -> bool {
        self.shield_ms > 0.0
    }

    pub fn gold_multiplier_active(&self) -> bool {
        self.gold_multiplier_ms > 0.0
    }
}

pub struct Engine {
    state: GameState,
    config: EngineConfig,
    seed: u64,
    /// Sessions started so far; mixed into the seed on restart
    runs: u64,
}

impl Engine {
    /// New engine waiting in the menu
    pub fn new(class: CharacterClass, seed: u64) -> Self {
        Self::with_config(EngineConfig::for_class(class), seed)
    }

    pub fn with_config(config: EngineConfig, seed: u64) -> Self {
        log::info!("Engine created: class {}, seed {}", config.class.as_str(), seed);
        Self {
            state: GameState::new(seed, &config),
            config,
            seed,
            runs: 0,
        }
    }

    fn fresh_session(&mut self) {
        let seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;
        self.state = GameState::new(seed, &self.config);
        self.state.phase = GamePhase::Playing;
    }

    // === Lifecycle ===

    /// Begin a fresh game from the menu
    pub fn start(&mut self) {
        if self.state.phase != GamePhase::Menu {
            log::debug!("start() ignored in {:?}", self.state.phase);
            return;
        }
        self.fresh_session();
        log::info!("Game started");
    }

    /// Begin a fresh game from any state
    pub fn restart(&mut self) {
        self.fresh_session();
        log::info!("Game restarted (run {})", self.runs);
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            log::info!("Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    /// Advance one host frame
    pub fn tick(&mut self, delta_ms: f32, input: &TickInput) {
        crate::sim::tick(&mut self.state, &self.config, input, delta_ms);
    }

    // === Configuration ===

    pub fn set_weapon_damage(&mut self, damage: f32) {
        self.config.set_weapon_damage(damage);
    }

    pub fn set_weapon_fire_rate(&mut self, rate: f32) {
        self.config.set_weapon_fire_rate(rate);
    }

    /// Set max health. In the menu the player is topped up.
    pub fn set_player_health(&mut self, max_health: f32) {
        self.config.set_player_max_health(max_health);
        self.sync_player();
    }

    pub fn set_player_speed(&mut self, speed: f32) {
        self.config.set_player_speed(speed);
        self.sync_player();
    }

    pub fn set_power_up_spawn_rate_bonus(&mut self, bonus: f32) {
        self.config.set_power_up_spawn_rate_bonus(bonus);
    }

    pub fn set_pickup_range(&mut self, range: f32) {
        self.config.set_pickup_range(range);
    }

    /// Replace the whole config from upgrade levels, keeping the class
    pub fn apply_loadout(&mut self, loadout: &Loadout) {
        self.config = loadout.to_config(self.config.class);
        self.sync_player();
        log::info!("Applied loadout: {:?}", loadout);
    }

    fn sync_player(&mut self) {
        let in_menu = self.state.phase == GamePhase::Menu;
        let player = &mut self.state.player;
        player.base_speed = self.config.player_speed;
        player.set_max_health(self.config.player_max_health);
        if in_menu {
            player.health = player.max_health;
        }
    }

    // === Queries ===

    pub fn health(&self) -> f32 {
        self.state.player.health
    }

    pub fn max_health(&self) -> f32 {
        self.state.player.max_health
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn combo(&self) -> u32 {
        self.state.progression.combo
    }

    pub fn combo_multiplier(&self) -> u32 {
        self.state.progression.multiplier()
    }

    pub fn round(&self) -> u32 {
        self.state.progression.round
    }

    /// Kills toward this round's boss
    pub fn kills(&self) -> u32 {
        self.state.progression.kills
    }

    pub fn gold_collected(&self) -> u64 {
        self.state.gold_collected
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Current and max boss health, when a boss is alive
    pub fn boss_health(&self) -> Option<(f32, f32)> {
        self.state.boss.as_ref().map(|b| (b.health.max(0.0), b.max_health))
    }

    pub fn active_effects(&self) -> ActiveEffectsView {
        let effects = &self.state.effects;
        ActiveEffectsView {
            speed_ms: effects.remaining_ms(BuffKind::Speed),
            damage_ms: effects.remaining_ms(BuffKind::Damage),
            fire_rate_ms: effects.remaining_ms(BuffKind::FireRate),
            shield_ms: effects.remaining_ms(BuffKind::Shield),
            gold_multiplier_ms: effects.gold_multiplier_ms.max(0.0),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that stage scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    // === Events ===

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Drain events into an observer
    pub fn dispatch_events(&mut self, observer: &mut impl GameObserver) {
        for event in self.drain_events() {
            observer.on_event(&event);
            match event {
                GameEvent::GoldCollected { amount } => observer.on_enemy_kill(amount),
                GameEvent::PlayerDied { score } => observer.on_player_death(score),
                _ => {}
            }
        }
    }
}
