//! Pairwise collisions and damage, resolved once per frame after every actor
//! has moved.
//!
//! Groups run in a fixed order:
//!
//! 1. fireballs × {driver, taxi, passengers, other cars, enemy cars but the shooter}
//! 2. taxi × other cars, each other car × {driver, passengers}
//! 3. taxi × enemy cars, each enemy car × {driver, passengers}
//! 4. other car × other car, i < j
//! 5. enemy car × enemy car, i < j
//! 6. other car × enemy car
//!
//! After the groups, fireball drift is applied and every collision timeout
//! counts down exactly once.  Delivered passengers and wrecks sit out.

use log::debug;

use crate::capabilities::{Actor, Collidable, DamageOutcome, Damageable};
use crate::config::{EffectConfig, GameContext};
use crate::entities::{Car, Entity, Fireball, GameState, HealthState, NpcCar, Person};

pub fn resolve_collisions(state: &mut GameState, ctx: &GameContext) {
    let effects = &ctx.config.effects;

    fireball_pass(state, effects);

    for index in 0..state.other_cars.len() {
        traffic_pass(state, Traffic::Other, index, effects);
    }
    for index in 0..state.enemy_cars.len() {
        traffic_pass(state, Traffic::Enemy, index, effects);
    }

    among(&mut state.other_cars, effects);
    among(&mut state.enemy_cars, effects);
    for other in &mut state.other_cars {
        for enemy in &mut state.enemy_cars {
            car_collision(&mut other.car, &mut enemy.car, effects);
        }
    }

    settle_all(state);
}

// ── Pair rules ────────────────────────────────────────────────────────────────

/// Car against car: each side not in timeout takes the other's damage, then
/// both (re)enter timeout and will pick a new speed.
pub fn car_collision(a: &mut Car, b: &mut Car, effects: &EffectConfig) -> bool {
    let hit = a.collides_with(&*b);
    if hit {
        let (a_damage, b_damage) = (a.inflicted_damage, b.inflicted_damage);
        if !a.health.in_timeout() {
            let outcome = a.take_damage(b_damage, effects);
            report(&*a, outcome);
        }
        if !b.health.in_timeout() {
            let outcome = b.take_damage(a_damage, effects);
            report(&*b, outcome);
        }
        a.health.start_timeout();
        b.health.start_timeout();
        a.change_speed = true;
        b.change_speed = true;
    }
    separate_on_impact(a, b);
    hit
}

/// Car against person: only the person is hurt.
pub fn car_person_collision(car: &mut Car, person: &mut Person, effects: &EffectConfig) -> bool {
    let hit = car.collides_with(&*person);
    if hit {
        if !person.health.in_timeout() {
            let outcome = person.take_damage(car.inflicted_damage, effects);
            report(&*person, outcome);
        }
        car.health.start_timeout();
        person.health.start_timeout();
        car.change_speed = true;
    }
    separate_on_impact(car, person);
    hit
}

/// One-shot fireball hit.  Invincible targets are passed through without
/// consuming the fireball.
pub fn fireball_collision<D: Damageable>(
    fireball: &mut Fireball,
    target: &mut D,
    effects: &EffectConfig,
) -> bool {
    if !fireball.active || target.health().invincible || !fireball.collides_with(&*target) {
        return false;
    }
    let outcome = target.take_damage(fireball.damage, effects);
    report(&*target, outcome);
    let health = target.health_mut();
    health.start_timeout();
    health.hit_by_fireball = true;
    fireball.active = false;
    true
}

/// While both sides are in their impact window, push them one unit apart:
/// the upper one further up, the lower one further down.
fn separate_on_impact<A: Damageable, B: Damageable>(a: &mut A, b: &mut B) {
    if !(a.health().in_impact_window() && b.health().in_impact_window()) {
        return;
    }
    let dir = if a.body().y < b.body().y { -1 } else { 1 };
    a.body_mut().y += dir;
    b.body_mut().y -= dir;
}

fn report<D: Damageable>(actor: &D, outcome: DamageOutcome) {
    if outcome == DamageOutcome::Downed {
        let Entity { x, y, .. } = *actor.body();
        debug!("{:?} went down at ({}, {})", actor.kind(), x, y);
    }
}

// ── Groups ────────────────────────────────────────────────────────────────────

fn fireball_pass(state: &mut GameState, effects: &EffectConfig) {
    for owner in 0..state.enemy_cars.len() {
        let mut fireballs = std::mem::take(&mut state.enemy_cars[owner].fireballs);
        for fireball in &mut fireballs {
            fireball_sweep(state, owner, fireball, effects);
        }
        fireballs.retain(|f| f.active);
        state.enemy_cars[owner].fireballs = fireballs;
    }
}

fn fireball_sweep(state: &mut GameState, owner: usize, fireball: &mut Fireball, effects: &EffectConfig) {
    fireball_collision(fireball, &mut state.driver.person, effects);
    if fireball_collision(fireball, &mut state.taxi.car, effects) {
        state.taxi.car.change_speed = true;
    }
    for passenger in state.passengers.iter_mut().filter(|p| p.is_in_play()) {
        fireball_collision(fireball, &mut passenger.person, effects);
    }
    for npc in &mut state.other_cars {
        if fireball_collision(fireball, &mut npc.car, effects) {
            npc.car.change_speed = true;
        }
    }
    for (index, npc) in state.enemy_cars.iter_mut().enumerate() {
        if index != owner && fireball_collision(fireball, &mut npc.car, effects) {
            npc.car.change_speed = true;
        }
    }
}

#[derive(Clone, Copy)]
enum Traffic {
    Other,
    Enemy,
}

/// The taxi, the driver and every passenger in play against one NPC.
fn traffic_pass(state: &mut GameState, traffic: Traffic, index: usize, effects: &EffectConfig) {
    let npc = match traffic {
        Traffic::Other => &mut state.other_cars[index],
        Traffic::Enemy => &mut state.enemy_cars[index],
    };
    car_collision(&mut state.taxi.car, &mut npc.car, effects);
    car_person_collision(&mut npc.car, &mut state.driver.person, effects);
    for passenger in state.passengers.iter_mut().filter(|p| p.is_in_play()) {
        car_person_collision(&mut npc.car, &mut passenger.person, effects);
    }
}

/// Every unordered pair within one group once.
fn among(cars: &mut [NpcCar], effects: &EffectConfig) {
    for i in 0..cars.len() {
        let (head, tail) = cars.split_at_mut(i + 1);
        let first = &mut head[i];
        for second in tail {
            car_collision(&mut first.car, &mut second.car, effects);
        }
    }
}

// ── Settling ──────────────────────────────────────────────────────────────────

fn settle_all(state: &mut GameState) {
    settle(&mut state.taxi.car.health, &mut state.taxi.car.body);
    settle(&mut state.driver.person.health, &mut state.driver.person.body);
    for passenger in state.passengers.iter_mut().filter(|p| p.is_in_play()) {
        settle(&mut passenger.person.health, &mut passenger.person.body);
    }
    for npc in state.other_cars.iter_mut().chain(state.enemy_cars.iter_mut()) {
        settle(&mut npc.car.health, &mut npc.car.body);
    }
}

/// Fireball drift, then one frame of timeout.
fn settle(health: &mut HealthState, body: &mut Entity) {
    if health.hit_by_fireball && health.in_impact_window() {
        body.y -= 1;
    } else {
        health.hit_by_fireball = false;
    }
    health.count_down();
}
