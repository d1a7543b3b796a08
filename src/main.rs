//! Arena Siege headless host
//!
//! Owns the frame loop and drives the engine with a simple autopilot so a run
//! can be watched through the log. Usage:
//!
//! ```text
//! arena-siege [gunner|shotgunner|sniper] [seed] [loadout.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use arena_siege::consts::*;
    use arena_siege::sim::{GameState, TickInput};

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);
    const DANGER_RADIUS: f32 = 180.0;
    const DASH_RADIUS: f32 = 70.0;

    /// Screen-space pointer that projects onto `target`
    fn pointer_for(player_pos: Vec2, target: Vec2) -> Vec2 {
        VIEWPORT * 0.5 + (target - player_pos) * CAMERA_ZOOM
    }

    /// Flee the closest threat, otherwise collect pickups; always aim at the
    /// closest target and keep the trigger held
    pub fn input(state: &GameState) -> TickInput {
        let me = state.player.pos;

        let mut threats: Vec<(Vec2, f32)> = state.enemies.iter().map(|e| (e.pos, e.radius)).collect();
        if let Some(boss) = &state.boss {
            threats.push((boss.pos, boss.radius));
        }
        let nearest = threats
            .iter()
            .map(|&(pos, radius)| (pos, pos.distance(me) - radius))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let projectile_close = state
            .boss_projectiles
            .iter()
            .any(|p| p.pos.distance(me) < DASH_RADIUS);

        let pickup = state
            .gold_pickups
            .iter()
            .map(|g| g.pos)
            .chain(state.power_ups.iter().map(|p| p.pos))
            .min_by(|a, b| a.distance(me).total_cmp(&b.distance(me)));

        let mut move_dir = Vec2::ZERO;
        let mut dash = projectile_close;
        match nearest {
            Some((pos, dist)) if dist < DANGER_RADIUS => {
                move_dir = (me - pos).normalize_or_zero();
                // Drift back toward the middle so we are not pinned to a wall
                move_dir += (Vec2::splat(WORLD_SIZE / 2.0) - me).normalize_or_zero() * 0.4;
                dash |= dist < DASH_RADIUS;
            }
            _ => {
                if let Some(pos) = pickup {
                    move_dir = pos - me;
                }
            }
        }

        TickInput {
            move_dir,
            pointer: nearest.map(|(pos, _)| pointer_for(me, pos)),
            viewport: VIEWPORT,
            zoom: CAMERA_ZOOM,
            firing: nearest.is_some(),
            dash,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::Path;

    use arena_siege::consts::FRAME_MS;
    use arena_siege::sim::{CharacterClass, GameEvent, GamePhase};
    use arena_siege::{Engine, GameObserver, Loadout};

    /// Simulated seconds before the demo stops on its own
    const RUN_SECONDS: f32 = 60.0;

    /// What the persistence layer would have been told
    #[derive(Default)]
    struct RunLedger {
        gold: u64,
        final_score: Option<u64>,
        bosses: u32,
    }

    impl GameObserver for RunLedger {
        fn on_enemy_kill(&mut self, gold: u64) {
            self.gold += gold;
        }

        fn on_player_death(&mut self, score: u64) {
            self.final_score = Some(score);
        }

        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::BossDefeated { round } => {
                    self.bosses += 1;
                    log::info!("Boss of round {} down", round);
                }
                GameEvent::BossPhaseChanged { phase } => log::debug!("Boss phase: {:?}", phase),
                _ => {}
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let class = match args.next() {
            Some(name) => CharacterClass::from_str(&name).unwrap_or_else(|| {
                log::warn!("Unknown class '{}', using Gunner", name);
                CharacterClass::Gunner
            }),
            None => CharacterClass::Gunner,
        };
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xA5E9_2024);

        let mut engine = Engine::new(class, seed);
        if let Some(path) = args.next() {
            match Loadout::load(Path::new(&path)) {
                Ok(loadout) => engine.apply_loadout(&loadout),
                Err(e) => log::warn!("Ignoring loadout {}: {}", path, e),
            }
        }

        engine.start();
        let mut ledger = RunLedger::default();
        let frames = (RUN_SECONDS * 1000.0 / FRAME_MS) as u32;
        for _ in 0..frames {
            let input = super::autopilot::input(engine.state());
            engine.tick(FRAME_MS, &input);
            engine.dispatch_events(&mut ledger);
            if engine.phase() == GamePhase::Dead {
                break;
            }
        }

        let state = engine.state();
        log::info!(
            "Run finished after {:.1}s ({} ticks)",
            state.elapsed_ms / 1000.0,
            state.ticks
        );
        println!("Class:   {}", class.as_str());
        println!("Seed:    {}", seed);
        println!("Score:   {}", engine.score());
        println!("Round:   {}", engine.round());
        println!("Kills:   {}", state.progression.total_kills);
        println!("Bosses:  {}", ledger.bosses);
        println!("Gold:    {}", ledger.gold);
        match ledger.final_score {
            Some(score) => println!("Died with {} points", score),
            None => println!("Survived with {:.0}/{:.0} health", engine.health(), engine.max_health()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arena Siege (headless) starting...");
    host::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Engine` directly
}
