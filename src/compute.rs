//! Pure game-logic functions.
//!
//! `init_state` builds frame 0 from a parsed layout, `tick` takes an
//! immutable reference to the current `GameState` and returns the next one.
//! Side effects are limited to the injected RNG.

use log::{info, trace};
use rand::Rng;

use crate::actors::{
    resolve_destroyed_taxi, sync_riders, update_driver, update_taxi, update_wrecks,
};
use crate::collision::resolve_collisions;
use crate::config::GameContext;
use crate::entities::{
    Driver, GameState, GameStatus, Passenger, PowerUp, PowerUpKind, Taxi, TaxiId,
    TerminalCause, TravelPlan, WeatherKind, WeatherSchedule,
};
use crate::error::LoadError;
use crate::input::InputSnapshot;
use crate::layout::SpawnRecord;
use crate::npc::update_npcs;
use crate::power_up::{apply_star, update_power_ups};
use crate::trip::{update_passengers, update_trips};
use crate::weather::update_weather;

/// A driverless taxi above this row has been left behind for good.
pub const TAXI_LOST_MIN_Y: i32 = -50;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state from layout records.  Exactly one taxi and
/// one driver are required; the driver starts inside the taxi.
pub fn init_state(
    ctx: &GameContext,
    records: &[SpawnRecord],
    schedule: WeatherSchedule,
) -> Result<GameState, LoadError> {
    let mut taxi: Option<Taxi> = None;
    let mut driver: Option<(i32, i32)> = None;
    let mut passengers = Vec::new();
    let mut power_ups = Vec::new();

    for record in records {
        match *record {
            SpawnRecord::Taxi { x, y } => {
                if taxi.is_some() {
                    return Err(LoadError::DuplicateActor("TAXI"));
                }
                taxi = Some(Taxi::new(TaxiId(0), x, y, ctx));
            }
            SpawnRecord::Driver { x, y } => {
                if driver.is_some() {
                    return Err(LoadError::DuplicateActor("DRIVER"));
                }
                driver = Some((x, y));
            }
            SpawnRecord::Passenger { x, y, priority, destination_x, distance_y, has_umbrella } => {
                if priority == 0 || ctx.config.trip.priority_rate(priority).is_none() {
                    return Err(LoadError::UnratedPriority(priority));
                }
                if distance_y < 0 {
                    return Err(LoadError::NegativeDistance(distance_y));
                }
                let plan = TravelPlan::new(destination_x, distance_y, priority);
                passengers.push(Passenger::new(x, y, plan, has_umbrella, ctx));
            }
            SpawnRecord::Coin { x, y } => power_ups.push(PowerUp::new(PowerUpKind::Coin, x, y, ctx)),
            SpawnRecord::Star { x, y } => power_ups.push(PowerUp::new(PowerUpKind::Star, x, y, ctx)),
        }
    }

    let mut taxi = taxi.ok_or(LoadError::MissingActor("TAXI"))?;
    let (driver_x, driver_y) = driver.ok_or(LoadError::MissingActor("DRIVER"))?;
    taxi.driver_on_board = true;
    let driver = Driver::new(driver_x, driver_y, taxi.id, ctx);

    let mut state = GameState {
        frame: 0,
        weather: WeatherKind::Sunny,
        schedule,
        taxi,
        wrecks: Vec::new(),
        next_taxi_id: 1,
        driver,
        passengers,
        power_ups,
        other_cars: Vec::new(),
        enemy_cars: Vec::new(),
        trips: Vec::new(),
        total_earnings: 0.0,
        status: GameStatus::Playing,
    };
    apply_star(&mut state);
    info!(
        "level loaded: {} passengers, {} power-ups, {} weather ranges",
        state.passengers.len(),
        state.power_ups.len(),
        state.schedule.conditions.len()
    );
    Ok(state)
}

// ── Per-frame tick ──────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// A finished game is returned unchanged.
pub fn tick(
    state: &GameState,
    ctx: &GameContext,
    input: &InputSnapshot,
    rng: &mut impl Rng,
) -> GameState {
    if state.status.is_over() {
        return state.clone();
    }
    let mut next = state.clone();

    // ── 1. Frame counter and weather ─────────────────────────────────────────
    next.frame += 1;
    update_weather(&mut next);

    // ── 2. Persons and trip progress ─────────────────────────────────────────
    update_driver(&mut next, ctx, input);
    update_passengers(&mut next, ctx, input);
    update_trips(&mut next, ctx, input);

    // ── 3. Vehicles, power-ups, traffic ──────────────────────────────────────
    update_taxi(&mut next, ctx, input);
    update_wrecks(&mut next, ctx, input);
    update_power_ups(&mut next, ctx, input);
    update_npcs(&mut next, ctx, input, rng);
    sync_riders(&mut next);

    // ── 4. Collisions, then taxi destruction ─────────────────────────────────
    resolve_collisions(&mut next, ctx);
    resolve_destroyed_taxi(&mut next, ctx, rng);

    // ── 5. Termination ───────────────────────────────────────────────────────
    next.status = advance_status(&next, ctx);

    trace!(
        "frame {}: taxi ({}, {}), {} npcs, earnings {:.2}",
        next.frame,
        next.taxi.car.body.x,
        next.taxi.car.body.y,
        next.other_cars.len() + next.enemy_cars.len(),
        next.total_earnings
    );
    next
}

// ── Termination ──────────────────────────────────────────────────────────────

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Over(_))
    }

    /// Why the game is ending or has ended.
    pub fn cause(&self) -> Option<TerminalCause> {
        match *self {
            GameStatus::Playing => None,
            GameStatus::Ending { cause, .. } | GameStatus::Over(cause) => Some(cause),
        }
    }
}

/// The first terminal condition that holds this frame, if any.  A death
/// takes precedence over the others.
pub fn evaluate_termination(state: &GameState, ctx: &GameContext) -> Option<TerminalCause> {
    if person_died(state) {
        Some(TerminalCause::PersonDied)
    } else if state.frame >= ctx.config.max_frames {
        Some(TerminalCause::TimeUp)
    } else if state.total_earnings >= ctx.config.target {
        Some(TerminalCause::TargetReached)
    } else if taxi_lost(state, ctx) {
        Some(TerminalCause::TaxiLost)
    } else {
        None
    }
}

/// A death lets the blood play out for its ttl before the game ends; every
/// other condition ends the game at once.
pub fn advance_status(state: &GameState, ctx: &GameContext) -> GameStatus {
    match state.status {
        GameStatus::Over(cause) => GameStatus::Over(cause),
        GameStatus::Ending { cause, frames_left } if frames_left > 1 => {
            GameStatus::Ending { cause, frames_left: frames_left - 1 }
        }
        GameStatus::Ending { cause, .. } => GameStatus::Over(cause),
        GameStatus::Playing => match evaluate_termination(state, ctx) {
            None => GameStatus::Playing,
            Some(cause) => {
                info!("frame {}: game ending ({:?}), earnings {:.2}", state.frame, cause, state.total_earnings);
                let grace = ctx.config.effects.blood_ttl;
                if cause == TerminalCause::PersonDied && grace > 0 {
                    GameStatus::Ending { cause, frames_left: grace }
                } else {
                    GameStatus::Over(cause)
                }
            }
        },
    }
}

pub fn person_died(state: &GameState) -> bool {
    state.driver.person.health.down || state.passengers.iter().any(|p| p.person.health.down)
}

/// The current taxi is driverless and off the top or bottom of the screen.
pub fn taxi_lost(state: &GameState, ctx: &GameContext) -> bool {
    let y = state.taxi.car.body.y;
    !state.taxi.driver_on_board && (y < TAXI_LOST_MIN_Y || y > ctx.config.window_height)
}
