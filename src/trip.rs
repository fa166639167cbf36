//! Trips: boarding, riding, drop-off and payout.
//!
//! A passenger waits at the roadside until a stopped taxi with its driver
//! aboard comes within detection range, walks over and boards.  The fare is
//! locked at that instant.  The trip completes once the end flag, scrolling
//! with the world, reaches the passenger's row; the fare minus any overshoot
//! penalty is paid exactly once and the passenger walks off to the flag.

use log::info;

use crate::capabilities::Scrollable;
use crate::config::{GameContext, TripConfig};
use crate::effects::update_attached;
use crate::entities::{
    Entity, GameState, HealthState, Passenger, PassengerId, PassengerPhase, Person, PersonKind,
    ScrollLatch, TravelPlan, Trip, TripEndFlag, TripId,
};
use crate::input::InputSnapshot;

/// Walking this close to the taxi counts as getting in.
pub const BOARDING_DISTANCE: f64 = 1.0;

impl TravelPlan {
    pub fn new(destination_x: i32, distance_y: i32, priority: u32) -> Self {
        TravelPlan {
            destination_x,
            distance_y,
            priority: priority.max(1),
            rain_pinned: false,
            coin_applied: false,
        }
    }

    /// Priority the fare is computed with right now.
    pub fn effective_priority(&self) -> u32 {
        if self.rain_pinned {
            1
        } else {
            self.priority.max(1)
        }
    }

    /// `distance * ratePerY + priority * ratePriority[priority]`.
    pub fn expected_fee(&self, rates: &TripConfig) -> f64 {
        let priority = self.effective_priority();
        let priority_rate = rates.priority_rate(priority).unwrap_or_default();
        f64::from(self.distance_y) * rates.rate_per_y + f64::from(priority) * priority_rate
    }
}

impl TripEndFlag {
    pub fn new(x: i32, y: i32, radius: f64) -> Self {
        TripEndFlag { body: Entity::new(x, y, radius), scroll: ScrollLatch::default() }
    }
}

impl Trip {
    /// What this trip adds to the earnings total.
    pub fn earned(&self) -> f64 {
        if self.complete {
            (self.fee - self.penalty).max(0.0)
        } else {
            0.0
        }
    }
}

impl Passenger {
    pub fn new(x: i32, y: i32, plan: TravelPlan, has_umbrella: bool, ctx: &GameContext) -> Self {
        let cfg = &ctx.config.passenger;
        Passenger {
            person: Person {
                kind: PersonKind::Passenger,
                body: Entity::new(x, y, cfg.radius),
                health: HealthState::new(cfg.health),
                scroll: ScrollLatch::default(),
            },
            plan,
            has_umbrella,
            phase: PassengerPhase::Waiting,
            trip: None,
        }
    }

    /// Still part of collisions and death checks.
    pub fn is_in_play(&self) -> bool {
        !matches!(self.phase, PassengerPhase::Delivered { .. })
    }
}

/// Sum of everything paid out so far; the running total is reset to this on
/// every completed trip.
pub fn total_earnings(trips: &[Trip]) -> f64 {
    trips.iter().map(Trip::earned).sum()
}

// ── Per-frame passenger update ────────────────────────────────────────────────

pub fn update_passengers(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    for index in 0..state.passengers.len() {
        update_passenger(state, ctx, input, PassengerId(index));
    }
}

fn update_passenger(
    state: &mut GameState,
    ctx: &GameContext,
    input: &InputSnapshot,
    id: PassengerId,
) {
    let speed = ctx.scroll_speed();
    let walk_x = ctx.config.passenger.walk_speed_x;
    let walk_y = ctx.config.passenger.walk_speed_y;

    update_attached(&mut state.passengers[id.0].person.health, input, speed);

    if state.passengers[id.0].person.health.down {
        state.passengers[id.0].person.scroll(input, speed);
        return;
    }

    match state.passengers[id.0].phase {
        PassengerPhase::Waiting => {
            let passenger = &mut state.passengers[id.0];
            passenger.person.health.invincible = false;
            passenger.person.scroll(input, speed);
            if can_board(state, ctx, id) && walk_to_taxi(state, ctx, id) {
                board(state, ctx, id);
            }
        }
        PassengerPhase::Aboard => {
            let taxi = state.taxi.car.body;
            let person = &mut state.passengers[id.0].person;
            person.health.invincible = true;
            person.body.x = taxi.x;
            person.body.y = taxi.y;
        }
        PassengerPhase::Ejected => {
            state.passengers[id.0].person.health.invincible = false;
            if can_reboard(state, ctx, id) {
                if walk_to_taxi(state, ctx, id) {
                    reboard(state, id);
                }
            } else {
                let target = state.driver.person.body;
                let body = &mut state.passengers[id.0].person.body;
                body.step_towards(target.x, target.y, walk_x, walk_y);
            }
        }
        PassengerPhase::Delivered { at_flag } => {
            let flag = state.passengers[id.0]
                .trip
                .and_then(|trip| state.trips.get(trip.0))
                .map(|trip| trip.flag.body);
            let passenger = &mut state.passengers[id.0];
            passenger.person.health.invincible = false;
            passenger.person.scroll(input, speed);
            if let (false, Some(flag)) = (at_flag, flag) {
                passenger.person.body.step_towards(flag.x, flag.y, walk_x, walk_y);
                if passenger.person.body.is_at(flag.x, flag.y) {
                    passenger.phase = PassengerPhase::Delivered { at_flag: true };
                }
            }
        }
    }
}

fn taxi_in_range(state: &GameState, ctx: &GameContext, id: PassengerId) -> bool {
    let taxi = &state.taxi;
    let distance = state.passengers[id.0].person.body.distance_to(&taxi.car.body);
    taxi.is_stopped() && taxi.driver_on_board && distance <= ctx.config.passenger.detect_radius
}

/// Boarding check for a waiting passenger.
pub fn can_board(state: &GameState, ctx: &GameContext, id: PassengerId) -> bool {
    let passenger = &state.passengers[id.0];
    passenger.phase == PassengerPhase::Waiting
        && passenger.trip.is_none()
        && state.driver.passenger.is_none()
        && taxi_in_range(state, ctx, id)
}

fn can_reboard(state: &GameState, ctx: &GameContext, id: PassengerId) -> bool {
    state.driver.passenger == Some(id) && taxi_in_range(state, ctx, id)
}

/// Take one walking step towards the taxi; true once close enough to get in.
fn walk_to_taxi(state: &mut GameState, ctx: &GameContext, id: PassengerId) -> bool {
    let taxi = state.taxi.car.body;
    let cfg = &ctx.config.passenger;
    let body = &mut state.passengers[id.0].person.body;
    if body.distance_to(&taxi) > BOARDING_DISTANCE {
        body.step_towards(taxi.x, taxi.y, cfg.walk_speed_x, cfg.walk_speed_y);
    }
    body.distance_to(&taxi) <= BOARDING_DISTANCE
}

/// Bind a passenger to the driver's taxi and open its trip.
pub fn board(state: &mut GameState, ctx: &GameContext, id: PassengerId) {
    let taxi = &state.taxi;
    let passenger = &mut state.passengers[id.0];
    let boarding_y = passenger.person.body.y;
    let fee = passenger.plan.expected_fee(&ctx.config.trip);
    let priority = passenger.plan.effective_priority();
    let flag = TripEndFlag::new(
        passenger.plan.destination_x,
        boarding_y - passenger.plan.distance_y,
        ctx.config.trip.flag_radius,
    );
    let trip_id = TripId(state.trips.len());
    state.trips.push(Trip {
        passenger: id,
        taxi: Some(taxi.id),
        boarding_y,
        fee,
        priority,
        flag,
        complete: false,
        penalty: 0.0,
    });

    passenger.phase = PassengerPhase::Aboard;
    passenger.trip = Some(trip_id);
    passenger.person.health.invincible = true;
    passenger.person.body.x = taxi.car.body.x;
    passenger.person.body.y = taxi.car.body.y;
    state.driver.passenger = Some(id);
    state.driver.trip = Some(trip_id);
    info!(
        "passenger {} boarded taxi {}: fee {:.2}, priority {}",
        id.0,
        taxi.id.0,
        fee,
        priority
    );
}

fn reboard(state: &mut GameState, id: PassengerId) {
    let taxi = &state.taxi;
    let passenger = &mut state.passengers[id.0];
    passenger.phase = PassengerPhase::Aboard;
    passenger.person.health.invincible = true;
    passenger.person.body.x = taxi.car.body.x;
    passenger.person.body.y = taxi.car.body.y;
    if let Some(trip) = passenger.trip.and_then(|trip| state.trips.get_mut(trip.0)) {
        trip.taxi = Some(taxi.id);
    }
    info!("passenger {} back in taxi {}", id.0, taxi.id.0);
}

/// Eject the current passenger from a destroyed taxi, clearing its trip's
/// taxi reference.
pub fn eject_passenger(state: &mut GameState, offset: i32) {
    let Some(id) = state.driver.passenger else {
        return;
    };
    let passenger = &mut state.passengers[id.0];
    if passenger.phase != PassengerPhase::Aboard {
        return;
    }
    passenger.phase = PassengerPhase::Ejected;
    passenger.person.body.x -= offset;
    if let Some(trip) = passenger.trip.and_then(|trip| state.trips.get_mut(trip.0)) {
        trip.taxi = None;
    }
}

// ── Trip progress ─────────────────────────────────────────────────────────────

/// Scroll every end flag, then complete the driver's trip if its flag has
/// reached the passenger.
pub fn update_trips(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    let speed = ctx.scroll_speed();
    for trip in &mut state.trips {
        trip.flag.scroll(input, speed);
    }

    let Some(trip_id) = state.driver.trip else {
        return;
    };
    let trip = &state.trips[trip_id.0];
    let passenger = &state.passengers[trip.passenger.0];
    if trip.complete || passenger.phase != PassengerPhase::Aboard {
        return;
    }
    let overshoot = trip.flag.body.y - passenger.person.body.y;
    if overshoot >= 0 {
        complete_trip(state, ctx, trip_id, overshoot);
    }
}

fn complete_trip(state: &mut GameState, ctx: &GameContext, id: TripId, overshoot: i32) {
    let trip = &mut state.trips[id.0];
    trip.complete = true;
    trip.penalty = f64::from(overshoot) * ctx.config.trip.penalty_per_y;
    let (fee, penalty, passenger) = (trip.fee, trip.penalty, trip.passenger);
    state.total_earnings = total_earnings(&state.trips);

    let passenger = &mut state.passengers[passenger.0];
    passenger.phase = PassengerPhase::Delivered { at_flag: false };
    passenger.person.health.invincible = false;
    state.driver.passenger = None;
    info!(
        "trip {} complete: fee {:.2}, penalty {:.2}, total {:.2}",
        id.0, fee, penalty, state.total_earnings
    );
}

/// Whether the delivered passenger of `trip` is still walking to its flag.
pub fn flag_visible(state: &GameState, trip: &Trip) -> bool {
    match state.passengers[trip.passenger.0].phase {
        PassengerPhase::Delivered { at_flag } => !at_flag,
        _ => true,
    }
}

/// Passenger shown on the HUD: the one riding, else the weakest one alive.
pub fn hud_passenger(state: &GameState) -> Option<&Passenger> {
    if let Some(id) = state.driver.passenger {
        return state.passengers.get(id.0);
    }
    state
        .passengers
        .iter()
        .filter(|p| !p.person.health.down)
        .min_by(|a, b| a.person.health.health.total_cmp(&b.person.health.health))
}

