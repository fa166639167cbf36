//! Coin and Star power-ups.
//!
//! Lifecycle: uncollected (scrolls, can be picked up) → collected (counts
//! frames) → expired.  A power-up's modifier applies only while
//! `0 < frames_active <= max_frames`.

use log::debug;

use crate::capabilities::{Collidable, Scrollable};
use crate::config::GameContext;
use crate::entities::{
    Entity, GameState, PassengerId, PowerUp, PowerUpId, PowerUpKind, ScrollLatch,
};
use crate::input::InputSnapshot;

impl PowerUp {
    pub fn new(kind: PowerUpKind, x: i32, y: i32, ctx: &GameContext) -> Self {
        let cfg = match kind {
            PowerUpKind::Coin => &ctx.config.coin,
            PowerUpKind::Star => &ctx.config.star,
        };
        PowerUp {
            kind,
            body: Entity::new(x, y, cfg.radius),
            collected: false,
            frames_active: 0,
            max_frames: cfg.max_frames,
            scroll: ScrollLatch::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.collected && self.frames_active > 0 && self.frames_active <= self.max_frames
    }

    pub fn is_expired(&self) -> bool {
        self.collected && self.frames_active > self.max_frames
    }

    /// Frames of effect left, `None` unless active.
    pub fn frames_remaining(&self) -> Option<u32> {
        self.is_active().then(|| self.max_frames - self.frames_active)
    }

    /// Uncollected power-ups drift with the world; collected ones only count.
    pub fn update(&mut self, input: &InputSnapshot, scroll_speed: i32) {
        if self.collected {
            self.frames_active = self.frames_active.saturating_add(1);
        } else {
            self.scroll(input, scroll_speed);
        }
    }
}

/// Per-frame power-up step: advance, collect, then apply.
pub fn update_power_ups(state: &mut GameState, ctx: &GameContext, input: &InputSnapshot) {
    let speed = ctx.scroll_speed();
    for power_up in &mut state.power_ups {
        power_up.update(input, speed);
    }
    collect_power_ups(state);
    apply_star(state);
    apply_coin(state);
}

/// A taxi only picks things up with its driver aboard; a driver on foot
/// always can.
pub fn collect_power_ups(state: &mut GameState) {
    let taxi = &state.taxi;
    let driver = &mut state.driver;
    for (index, power_up) in state.power_ups.iter_mut().enumerate() {
        if power_up.collected {
            continue;
        }
        let by_taxi = taxi.driver_on_board && power_up.collides_with(&taxi.car);
        let by_driver = power_up.collides_with(&driver.person);
        if !(by_taxi || by_driver) {
            continue;
        }
        power_up.collected = true;
        let id = Some(PowerUpId(index));
        match power_up.kind {
            PowerUpKind::Coin => driver.coin = id,
            PowerUpKind::Star => driver.star = id,
        }
        debug!("{:?} collected at ({}, {})", power_up.kind, power_up.body.x, power_up.body.y);
    }
}

pub fn star_active(state: &GameState) -> bool {
    held_power_up(state, state.driver.star).is_some_and(PowerUp::is_active)
}

pub fn coin_active(state: &GameState) -> bool {
    held_power_up(state, state.driver.coin).is_some_and(PowerUp::is_active)
}

fn held_power_up(state: &GameState, id: Option<PowerUpId>) -> Option<&PowerUp> {
    id.and_then(|PowerUpId(index)| state.power_ups.get(index))
}

/// Re-evaluated every frame so invincibility lapses by itself.  Riding in a
/// taxi always shelters the driver.
pub fn apply_star(state: &mut GameState) {
    let star = star_active(state);
    state.taxi.car.health.invincible = star && state.taxi.driver_on_board;
    state.driver.person.health.invincible = star || state.driver.in_taxi;
}

/// Lower the current trip's priority by one, once, while a coin is active.
pub fn apply_coin(state: &mut GameState) {
    if !coin_active(state) {
        return;
    }
    let Some(passenger) = current_trip_passenger(state) else {
        return;
    };
    let plan = &mut state.passengers[passenger.0].plan;
    if !plan.coin_applied && plan.priority > 1 {
        plan.priority -= 1;
        plan.coin_applied = true;
        debug!("coin lowered trip priority to {}", plan.priority);
    }
}

fn current_trip_passenger(state: &GameState) -> Option<PassengerId> {
    let trip = state.trips.get(state.driver.trip?.0)?;
    (!trip.complete).then_some(trip.passenger)
}
