//! Values the front-end shows around the road each frame.

use crate::config::GameContext;
use crate::entities::{GameState, PowerUpId, WeatherKind};
use crate::power_up::star_active;
use crate::trip::hud_passenger;

/// Shown as a percentage on screen.
const HEALTH_SCALE: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TripSummary {
    pub complete: bool,
    pub expected_fee: f64,
    /// Priority at boarding, matching `expected_fee`.
    pub priority: u32,
    /// Only known once the trip has completed.
    pub penalty: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HudSnapshot {
    pub earnings: f64,
    pub target: f64,
    pub remaining_frames: u32,
    pub taxi_health: f64,
    pub driver_health: f64,
    pub passenger_health: Option<f64>,
    pub coin_frames_remaining: Option<u32>,
    pub star_active: bool,
    pub weather: WeatherKind,
    pub last_trip: Option<TripSummary>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState, ctx: &GameContext) -> Self {
        let last_trip = state.driver.trip.and_then(|id| state.trips.get(id.0)).map(|trip| {
            TripSummary {
                complete: trip.complete,
                expected_fee: trip.fee,
                priority: trip.priority,
                penalty: trip.complete.then_some(trip.penalty),
            }
        });
        let coin_frames_remaining = state
            .driver
            .coin
            .and_then(|PowerUpId(index)| state.power_ups.get(index))
            .and_then(|coin| coin.frames_remaining());

        HudSnapshot {
            earnings: state.total_earnings,
            target: ctx.config.target,
            remaining_frames: ctx.config.max_frames.saturating_sub(state.frame),
            taxi_health: state.taxi.car.health.health * HEALTH_SCALE,
            driver_health: state.driver.person.health.health * HEALTH_SCALE,
            passenger_health: hud_passenger(state).map(|p| p.person.health.health * HEALTH_SCALE),
            coin_frames_remaining,
            star_active: star_active(state),
            weather: state.weather,
            last_trip,
        }
    }
}
