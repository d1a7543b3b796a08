//! End-to-end runs through the public `Engine` surface

use arena_siege::consts::*;
use arena_siege::sim::spawn::spawn_enemy;
use arena_siege::sim::{Bullet, CharacterClass, DashState, EnemyKind, GameEvent, GamePhase, TickInput};
use arena_siege::{Engine, GameObserver};
use glam::Vec2;

#[derive(Default)]
struct Ledger {
    gold: Vec<u64>,
    deaths: Vec<u64>,
}

impl GameObserver for Ledger {
    fn on_enemy_kill(&mut self, gold: u64) {
        self.gold.push(gold);
    }

    fn on_player_death(&mut self, score: u64) {
        self.deaths.push(score);
    }
}

fn playing_engine() -> Engine {
    let mut engine = Engine::new(CharacterClass::Gunner, 42);
    engine.start();
    engine
}

/// Bullet placed just behind `target`, travelling +x
fn bullet_behind(engine: &mut Engine, target: Vec2, damage: f32) {
    let state = engine.state_mut();
    let id = state.next_entity_id();
    state.bullets.push(Bullet {
        id,
        pos: target - Vec2::new(BULLET_SPEED + 2.0, 0.0),
        vel: Vec2::new(BULLET_SPEED, 0.0),
        radius: BULLET_RADIUS,
        damage,
        pierce: 0,
        traveled: 0.0,
        hit_ids: Vec::new(),
    });
}

fn spawn_boss_now(engine: &mut Engine) {
    engine.state_mut().progression.kills = BOSS_KILL_THRESHOLD;
    engine.tick(FRAME_MS, &TickInput::default());
    assert!(engine.state().boss.is_some());
}

#[test]
fn scenario_a_single_kill() {
    let mut engine = playing_engine();
    let at = engine.state().player.pos + Vec2::new(200.0, 0.0);
    spawn_enemy(engine.state_mut(), EnemyKind::Normal, at);
    assert_eq!(engine.state().enemies[0].max_health, 10.0);
    bullet_behind(&mut engine, at, 10.0);

    engine.tick(FRAME_MS, &TickInput::default());

    let state = engine.state();
    assert_eq!(state.progression.kills, 1);
    assert_eq!(engine.kills(), 1);
    assert_eq!(engine.combo(), 1);
    assert_eq!(state.gold_pickups.len(), 1);
    assert_eq!(state.gold_pickups[0].value, 1);
    assert_eq!(state.enemies.len(), 2);
    assert!(state.enemies.iter().all(|e| e.pos.distance(at) > 100.0));
    assert!(state.bullets.is_empty());
    assert_eq!(engine.score(), 10);
}

#[test]
fn scenario_b_boss_spawns_once() {
    let mut engine = playing_engine();
    let far = engine.state().player.pos + Vec2::new(700.0, 0.0);
    for _ in 0..5 {
        spawn_enemy(engine.state_mut(), EnemyKind::Fast, far);
    }
    engine.state_mut().progression.kills = BOSS_KILL_THRESHOLD;

    engine.tick(FRAME_MS, &TickInput::default());
    assert!(engine.state().boss.is_some());
    assert!(engine.state().enemies.is_empty());
    assert!(engine.state().progression.boss_spawned);

    for _ in 0..30 {
        engine.tick(FRAME_MS, &TickInput::default());
    }
    let spawned = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::BossSpawned { .. }))
        .count();
    assert_eq!(spawned, 1);
    // No timed waves while the boss is up
    assert!(engine.state().enemies.is_empty());
}

#[test]
fn scenario_c_boss_defeat_advances_round() {
    let mut engine = playing_engine();
    spawn_boss_now(&mut engine);
    let boss_pos = engine.state().boss.as_ref().map(|b| b.pos).unwrap();
    assert!((boss_pos.distance(engine.state().player.pos) - BOSS_SPAWN_DISTANCE).abs() < 1.0);
    let score_before = engine.score();
    engine.state_mut().progression.combo = 7;
    engine.state_mut().progression.since_last_kill_ms = 0.0;
    assert_eq!(engine.combo(), 7);

    engine.state_mut().boss.as_mut().unwrap().health = 0.0;
    engine.tick(FRAME_MS, &TickInput::default());

    let state = engine.state();
    assert!(state.boss.is_none());
    assert_eq!(engine.round(), 2);
    assert_eq!(engine.kills(), 0);
    assert!(!state.progression.boss_spawned);
    assert!(state.gold_pickups.len() > 1);
    assert!(!state.power_ups.is_empty());
    assert!(state.boss_projectiles.is_empty());
    assert_eq!(engine.combo(), 0);
    assert_eq!(engine.score(), score_before + BOSS_SCORE);

    let events = engine.drain_events();
    assert!(events.contains(&GameEvent::BossDefeated { round: 1 }));
    assert!(events.contains(&GameEvent::RoundAdvanced { round: 2 }));
}

#[test]
fn boss_killed_by_bullet_same_tick() {
    let mut engine = playing_engine();
    spawn_boss_now(&mut engine);
    let boss_pos = engine.state().boss.as_ref().map(|b| b.pos).unwrap();
    engine.state_mut().boss.as_mut().unwrap().health = 1.0;
    bullet_behind(&mut engine, boss_pos, 50.0);

    engine.tick(FRAME_MS, &TickInput::default());
    assert!(engine.state().boss.is_none());
    assert_eq!(engine.round(), 2);
}

#[test]
fn collected_gold_reaches_observer() {
    let mut engine = playing_engine();
    let at = engine.state().player.pos + Vec2::new(60.0, 0.0);
    spawn_enemy(engine.state_mut(), EnemyKind::Normal, at);
    bullet_behind(&mut engine, at, 10.0);

    let mut ledger = Ledger::default();
    for _ in 0..30 {
        engine.tick(FRAME_MS, &TickInput::default());
        engine.dispatch_events(&mut ledger);
    }
    assert_eq!(ledger.gold.iter().sum::<u64>(), 1);
    assert_eq!(engine.gold_collected(), 1);
    assert!(engine.state().gold_pickups.is_empty());
}

#[test]
fn death_notifies_once_and_restart_recovers() {
    let mut engine = playing_engine();
    engine.state_mut().score = 250;
    engine.state_mut().player.health = 5.0;
    let pos = engine.state().player.pos;
    spawn_enemy(engine.state_mut(), EnemyKind::Big, pos);

    let mut ledger = Ledger::default();
    for _ in 0..5 {
        engine.tick(FRAME_MS, &TickInput::default());
        engine.dispatch_events(&mut ledger);
    }
    assert_eq!(engine.phase(), GamePhase::Dead);
    assert_eq!(engine.health(), 0.0);
    assert_eq!(ledger.deaths, vec![250]);

    engine.start();
    assert_eq!(engine.phase(), GamePhase::Dead);
    engine.restart();
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.health(), engine.max_health());
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.round(), 1);
}

#[test]
fn dashing_through_an_enemy_is_free() {
    let mut engine = playing_engine();
    engine.state_mut().player.dash = DashState::Dashing { remaining_ms: 150.0 };
    let pos = engine.state().player.pos;
    spawn_enemy(engine.state_mut(), EnemyKind::Big, pos);

    engine.tick(FRAME_MS, &TickInput::default());
    assert_eq!(engine.health(), engine.max_health());
    assert!(engine.state().enemies.is_empty());
}

#[test]
fn sniper_shot_pierces_a_line() {
    let mut engine = Engine::new(CharacterClass::Sniper, 7);
    engine.start();
    let me = engine.state().player.pos;
    for dx in [200.0, 260.0, 320.0, 380.0] {
        spawn_enemy(engine.state_mut(), EnemyKind::Big, me + Vec2::new(dx, 0.0));
    }
    let input = TickInput {
        pointer: Some(Vec2::new(900.0, 300.0)),
        viewport: Vec2::new(800.0, 600.0),
        firing: true,
        ..Default::default()
    };
    engine.tick(FRAME_MS, &input);
    let no_fire = TickInput {
        pointer: input.pointer,
        viewport: input.viewport,
        ..Default::default()
    };
    for _ in 0..30 {
        engine.tick(FRAME_MS, &no_fire);
    }
    // 25 damage kills nothing with 30 hp, but three enemies take the hit
    let hurt = engine
        .state()
        .enemies
        .iter()
        .filter(|e| e.health < e.max_health)
        .count();
    assert_eq!(hurt, 3);
}

#[test]
fn setters_reject_garbage_and_apply_live() {
    let mut engine = playing_engine();
    engine.set_weapon_damage(f32::NAN);
    assert_eq!(engine.config().weapon_damage, 10.0);
    engine.set_player_speed(8.0);
    assert_eq!(engine.state().player.base_speed, 8.0);
    engine.set_pickup_range(-1.0);
    assert_eq!(engine.config().pickup_range, PICKUP_RANGE);
    engine.set_power_up_spawn_rate_bonus(0.2);
    assert_eq!(engine.config().power_up_spawn_rate_bonus, 0.2);
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut engine = Engine::new(CharacterClass::Shotgunner, 99);
        engine.start();
        let input = TickInput {
            move_dir: Vec2::new(1.0, 0.5),
            pointer: Some(Vec2::new(100.0, 100.0)),
            viewport: Vec2::new(800.0, 600.0),
            firing: true,
            ..Default::default()
        };
        for i in 0..900 {
            engine.tick(if i % 3 == 0 { 20.0 } else { FRAME_MS }, &input);
        }
        (engine.score(), engine.health(), engine.kills(), engine.state().enemies.len())
    };
    assert_eq!(run(), run());
}
