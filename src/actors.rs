//! Taxi and driver state machines.
//!
//! A car or person is alive until its health first drops to zero, then it is
//! damaged (cars) or dead (persons) for good.  A damaged taxi is turned into
//! a wreck in the same tick: the driver and any passenger are thrown out, the
//! wreck keeps scrolling with the world, and a fresh taxi is placed on a
//! random lane for the driver to walk to.

use log::info;
use rand::Rng;

use crate::capabilities::Scrollable;
use crate::config::{GameContext, LANE_COUNT};
use crate::effects::update_attached;
use crate::entities::{
    Car, CarKind, Driver, Entity, GameState, HealthState, PassengerPhase, Person, PersonKind,
    ScrollLatch, Taxi, TaxiId,
};
use crate::input::InputSnapshot;
use crate::trip::eject_passenger;

/// How far the driver lands from a destroyed taxi.
pub const DRIVER_EJECTION_OFFSET: i32 = 50;

/// How far a riding passenger lands from a destroyed taxi.
pub const PASSENGER_EJECTION_OFFSET: i32 = 100;

/// Vertical band a replacement taxi appears in.
pub const TAXI_SPAWN_Y_MIN: i32 = 200;
pub const TAXI_SPAWN_Y_MAX: i32 = 400;

impl Car {
    pub fn new(kind: CarKind, body: Entity, inflicted_damage: f64, health: f64) -> Self {
        Car {
            kind,
            body,
            health: HealthState::new(health),
            inflicted_damage,
            scroll: ScrollLatch::default(),
            change_speed: false,
        }
    }
}

impl Taxi {
    pub fn new(id: TaxiId, x: i32, y: i32, ctx: &GameContext) -> Self {
        let cfg = &ctx.config.taxi;
        Taxi {
            id,
            car: Car::new(CarKind::Taxi, Entity::new(x, y, cfg.radius), cfg.damage, cfg.health),
            driver_on_board: false,
            moving_x: false,
            moving_y: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        !self.moving_x && !self.moving_y
    }
}

impl Driver {
    /// The driver starts the game sitting in `taxi`.
    pub fn new(x: i32, y: i32, taxi: TaxiId, ctx: &GameContext) -> Self {
        let cfg = &ctx.config.driver;
        Driver {
            person: Person {
                kind: PersonKind::Driver,
                body: Entity::new(x, y, cfg.radius),
                health: HealthState::new(cfg.health),
                scroll: ScrollLatch::default(),
            },
            taxi,
            in_taxi: true,
            passenger: None,
            trip: None,
            coin: None,
            star: None,
        }
    }
}

/// Place a new taxi on a random lane inside the spawn band.
pub fn spawn_taxi(id: TaxiId, ctx: &GameContext, rng: &mut impl Rng) -> Taxi {
    let x = ctx.lanes()[rng.gen_range(0..LANE_COUNT)];
    let y = rng.gen_range(TAXI_SPAWN_Y_MIN..=TAXI_SPAWN_Y_MAX);
    Taxi::new(id, x, y, ctx)
}

// ── Taxi ──────────────────────────────────────────────────────────────────────

/// With a driver aboard the taxi holds its row and steers; without one it is
/// carried along by the world like any other object.
pub fn update_taxi(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    let speed = ctx.scroll_speed();
    let taxi = &mut state.taxi;
    update_attached(&mut taxi.car.health, input, speed);

    if taxi.driver_on_board && !taxi.car.health.down {
        steer(taxi, input, ctx.config.taxi.speed_x);
    } else {
        taxi.moving_x = false;
        taxi.moving_y = false;
        taxi.car.scroll(input, speed);
    }
}

fn steer(taxi: &mut Taxi, input: &InputSnapshot, speed_x: i32) {
    taxi.moving_y = input.up.down;
    taxi.moving_x = true;
    if input.left.down {
        taxi.car.body.x -= speed_x;
    } else if input.right.down {
        taxi.car.body.x += speed_x;
    } else {
        taxi.moving_x = false;
    }
}

pub fn update_wrecks(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    let speed = ctx.scroll_speed();
    for wreck in &mut state.wrecks {
        update_attached(&mut wreck.car.health, input, speed);
        wreck.car.scroll(input, speed);
    }
}

/// Turn a damaged taxi into a wreck and hand the driver a replacement.
/// Returns true when a taxi was replaced.
pub fn resolve_destroyed_taxi(
    state: &mut GameState,
    ctx: &GameContext,
    rng: &mut impl Rng,
) -> bool {
    if !state.taxi.car.health.down {
        return false;
    }
    if state.taxi.driver_on_board {
        eject_driver(state);
    }

    let id = TaxiId(state.next_taxi_id);
    state.next_taxi_id += 1;
    let replacement = spawn_taxi(id, ctx, rng);
    let mut wreck = std::mem::replace(&mut state.taxi, replacement);
    wreck.driver_on_board = false;
    wreck.moving_x = false;
    wreck.moving_y = false;
    wreck.car.scroll = ScrollLatch::default();
    info!(
        "taxi {} destroyed at ({}, {}), taxi {} placed at ({}, {})",
        wreck.id.0, wreck.car.body.x, wreck.car.body.y, id.0, state.taxi.car.body.x, state.taxi.car.body.y
    );
    state.wrecks.push(wreck);
    state.driver.taxi = id;
    true
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Ride along, or walk with the arrow keys and climb back in when close.
pub fn update_driver(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    let speed = ctx.scroll_speed();
    update_attached(&mut state.driver.person.health, input, speed);
    if state.driver.person.health.down {
        return;
    }

    if state.driver.in_taxi {
        let taxi = state.taxi.car.body;
        state.driver.person.body.x = taxi.x;
        state.driver.person.body.y = taxi.y;
        return;
    }

    let cfg = &ctx.config.driver;
    let body = &mut state.driver.person.body;
    if input.up.down {
        body.y -= cfg.walk_speed_y;
    }
    if input.down.down {
        body.y += cfg.walk_speed_y;
    }
    if input.left.down {
        body.x -= cfg.walk_speed_x;
    }
    if input.right.down {
        body.x += cfg.walk_speed_x;
    }

    if can_enter_taxi(state, ctx) {
        enter_taxi(state);
    }
}

pub fn can_enter_taxi(state: &GameState, ctx: &GameContext) -> bool {
    let driver = &state.driver;
    let taxi = &state.taxi;
    !driver.in_taxi
        && driver.taxi == taxi.id
        && !taxi.car.health.down
        && driver.person.body.distance_to(&taxi.car.body) <= ctx.config.driver.get_in_radius
}

fn enter_taxi(state: &mut GameState) {
    state.driver.in_taxi = true;
    state.taxi.driver_on_board = true;
    state.driver.person.body.x = state.taxi.car.body.x;
    state.driver.person.body.y = state.taxi.car.body.y;
    info!("driver entered taxi {}", state.taxi.id.0);
}

/// Throw the driver (and a riding passenger) out of the taxi.
pub fn eject_driver(state: &mut GameState) {
    if state.driver.in_taxi {
        state.driver.person.body.x -= DRIVER_EJECTION_OFFSET;
    }
    state.driver.in_taxi = false;
    state.driver.person.health.invincible = false;
    state.taxi.driver_on_board = false;
    eject_passenger(state, PASSENGER_EJECTION_OFFSET);
}

/// Snap everyone riding the taxi onto its final position for this frame.
pub fn sync_riders(state: &mut GameState) {
    let taxi = state.taxi.car.body;
    if state.driver.in_taxi {
        state.driver.person.body.x = taxi.x;
        state.driver.person.body.y = taxi.y;
    }
    for passenger in &mut state.passengers {
        if passenger.phase == PassengerPhase::Aboard {
            passenger.person.body.x = taxi.x;
            passenger.person.body.y = taxi.y;
        }
    }
}
