#![allow(dead_code)]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use shadow_taxi::compute::init_state;
use shadow_taxi::config::*;
use shadow_taxi::entities::*;
use shadow_taxi::layout::SpawnRecord;

pub const TAXI_X: i32 = 300;
pub const TAXI_Y: i32 = 600;

/// Small, round numbers; traffic never spawns on its own.
pub fn make_config() -> GameConfig {
    let quiet = NpcConfig { min_speed_y: 3, max_speed_y: 3, spawn_rate: u32::MAX };
    GameConfig {
        window_width: 1000,
        window_height: 800,
        lanes: [300, 500, 700],
        taxi: TaxiConfig { radius: 30.0, damage: 1.0, health: 1.0, speed_x: 2, speed_y: 5 },
        driver: DriverConfig {
            radius: 20.0,
            health: 1.0,
            walk_speed_x: 2,
            walk_speed_y: 2,
            get_in_radius: 10.0,
        },
        passenger: PassengerConfig {
            radius: 10.0,
            health: 1.0,
            walk_speed_x: 10,
            walk_speed_y: 10,
            detect_radius: 100.0,
        },
        npc_radius: 50.0,
        npc_damage: 0.5,
        npc_health: 1.0,
        other_car: quiet.clone(),
        enemy_car: quiet,
        fireball: FireballConfig { radius: 10.0, damage: 0.2, speed_y: 10, shoot_rate: u32::MAX },
        coin: PowerUpConfig { radius: 30.0, max_frames: 100 },
        star: PowerUpConfig { radius: 30.0, max_frames: 50 },
        effects: EffectConfig { fire_ttl: 10, smoke_ttl: 5, blood_ttl: 4 },
        trip: TripConfig {
            rate_per_y: 0.1,
            rate_priority: [5.0, 3.0, 2.0],
            penalty_per_y: 0.05,
            flag_radius: 5.0,
        },
        target: 100.0,
        max_frames: 1000,
        files: FileConfig {
            layout: "layout.csv".into(),
            weather: "weather.csv".into(),
            scores: "scores.csv".into(),
        },
    }
}

pub fn make_ctx() -> GameContext {
    GameContext::new(make_config())
}

/// Taxi at (TAXI_X, TAXI_Y) with the driver aboard, plus `extra` records.
pub fn make_state_with(ctx: &GameContext, extra: &[SpawnRecord]) -> GameState {
    let mut records = vec![
        SpawnRecord::Taxi { x: TAXI_X, y: TAXI_Y },
        SpawnRecord::Driver { x: TAXI_X, y: TAXI_Y },
    ];
    records.extend_from_slice(extra);
    init_state(ctx, &records, WeatherSchedule::default()).unwrap()
}

pub fn make_state(ctx: &GameContext) -> GameState {
    make_state_with(ctx, &[])
}

pub fn passenger_at(x: i32, y: i32, priority: u32, distance_y: i32) -> SpawnRecord {
    SpawnRecord::Passenger {
        x,
        y,
        priority,
        destination_x: x,
        distance_y,
        has_umbrella: false,
    }
}

/// A neutral car parked at `(x, y)` with zero cruise speed.
pub fn other_car_at(ctx: &GameContext, x: i32, y: i32) -> NpcCar {
    npc_at(ctx, CarKind::OtherCar, x, y)
}

pub fn enemy_car_at(ctx: &GameContext, x: i32, y: i32) -> NpcCar {
    npc_at(ctx, CarKind::EnemyCar, x, y)
}

fn npc_at(ctx: &GameContext, kind: CarKind, x: i32, y: i32) -> NpcCar {
    let cfg = &ctx.config;
    NpcCar {
        car: Car::new(kind, Entity::new(x, y, cfg.npc_radius), cfg.npc_damage, cfg.npc_health),
        speed_y: 0,
        fireballs: Vec::new(),
    }
}

pub fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}
