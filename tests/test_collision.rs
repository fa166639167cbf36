mod common;

use shadow_taxi::collision::*;
use shadow_taxi::entities::*;

use common::*;

// ── Car against car ───────────────────────────────────────────────────────────

#[test]
fn colliding_cars_damage_each_other_and_enter_timeout() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let mut a = other_car_at(&ctx, 500, 300).car;
    let mut b = enemy_car_at(&ctx, 500, 399).car;

    assert!(car_collision(&mut a, &mut b, effects));

    for car in [&a, &b] {
        assert!((car.health.health - (0.5 - DAMAGE_EPSILON)).abs() < 1e-12);
        assert_eq!(car.health.timeout, COLLISION_TIMEOUT_FRAMES);
        assert!(car.change_speed);
        assert!(car.health.smoke.is_some());
    }
}

#[test]
fn cars_in_timeout_take_no_further_damage() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let mut a = other_car_at(&ctx, 500, 300).car;
    let mut b = other_car_at(&ctx, 500, 300).car;

    car_collision(&mut a, &mut b, effects);
    let after_first = a.health.health;
    a.health.count_down();
    b.health.count_down();

    assert!(car_collision(&mut a, &mut b, effects));
    assert_eq!(a.health.health, after_first);
    // Still overlapping: the timeout is re-armed
    assert_eq!(a.health.timeout, COLLISION_TIMEOUT_FRAMES);
}

#[test]
fn invincibility_blocks_damage_but_not_timeout() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let mut state = make_state(&ctx);
    state.taxi.car.health.invincible = true;
    let mut npc = other_car_at(&ctx, TAXI_X, TAXI_Y).car;

    assert!(car_collision(&mut state.taxi.car, &mut npc, effects));
    assert_eq!(state.taxi.car.health.health, 1.0);
    assert!(state.taxi.car.health.smoke.is_none());
    assert_eq!(state.taxi.car.health.timeout, COLLISION_TIMEOUT_FRAMES);
    assert!(npc.health.down);
}

#[test]
fn car_hitting_person_only_hurts_the_person() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let state = make_state_with(&ctx, &[passenger_at(100, 100, 1, 10)]);
    let mut person = state.passengers[0].person.clone();
    let mut car = other_car_at(&ctx, 100, 120).car;

    assert!(car_person_collision(&mut car, &mut person, effects));
    assert_eq!(car.health.health, 1.0);
    assert!(car.change_speed);
    assert_eq!(car.health.timeout, COLLISION_TIMEOUT_FRAMES);
    assert_eq!(person.health.timeout, COLLISION_TIMEOUT_FRAMES);
    assert!((person.health.health - (0.5 - DAMAGE_EPSILON)).abs() < 1e-12);
}

#[test]
fn npc_cars_are_pushed_apart_for_ten_frames() {
    let ctx = make_ctx();
    let mut state = make_state(&ctx);
    state.other_cars.push(other_car_at(&ctx, 500, 300));
    state.other_cars.push(other_car_at(&ctx, 500, 399));

    let mut gaps = Vec::new();
    for _ in 0..12 {
        resolve_collisions(&mut state, &ctx);
        gaps.push(state.other_cars[1].car.body.y - state.other_cars[0].car.body.y);
    }

    let expected: Vec<i32> = (1..=12).map(|f| 99 + 2 * f.min(10)).collect();
    assert_eq!(gaps, expected);
    assert_eq!(state.other_cars[0].car.body.y, 290);
    assert_eq!(state.other_cars[1].car.body.y, 409);
    // Only the first frame did damage
    assert!((state.other_cars[0].car.health.health - (0.5 - DAMAGE_EPSILON)).abs() < 1e-12);
}

#[test]
fn wrecks_and_delivered_passengers_sit_out() {
    let ctx = make_ctx();
    let mut state = make_state_with(&ctx, &[passenger_at(700, 100, 1, 10)]);
    state.passengers[0].phase = PassengerPhase::Delivered { at_flag: true };
    state.other_cars.push(other_car_at(&ctx, 700, 100));
    let mut wreck = state.taxi.clone();
    wreck.car.body.x = 700;
    wreck.car.body.y = 100;
    state.wrecks.push(wreck);

    resolve_collisions(&mut state, &ctx);

    assert_eq!(state.passengers[0].person.health.health, 1.0);
    assert_eq!(state.wrecks[0].car.health.health, 1.0);
    assert_eq!(state.other_cars[0].car.health.timeout, TIMEOUT_INACTIVE);
}

// ── Fireballs ─────────────────────────────────────────────────────────────────

#[test]
fn fireball_hits_once_and_is_spent() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let mut target = other_car_at(&ctx, 500, 300).car;
    let mut fireball = Fireball::new(500, 305, &ctx);

    assert!(fireball_collision(&mut fireball, &mut target, effects));
    assert!(!fireball.active);
    assert!(target.health.hit_by_fireball);
    assert_eq!(target.health.timeout, COLLISION_TIMEOUT_FRAMES);
    assert!((target.health.health - (0.8 - DAMAGE_EPSILON)).abs() < 1e-12);

    let before = target.health.health;
    assert!(!fireball_collision(&mut fireball, &mut target, effects));
    assert_eq!(target.health.health, before);
}

#[test]
fn fireball_passes_through_invincible_targets() {
    let ctx = make_ctx();
    let effects = &ctx.config.effects;
    let mut target = other_car_at(&ctx, 500, 300).car;
    target.health.invincible = true;
    let mut fireball = Fireball::new(500, 300, &ctx);

    assert!(!fireball_collision(&mut fireball, &mut target, effects));
    assert!(fireball.active);
    assert_eq!(target.health.health, 1.0);
    assert_eq!(target.health.timeout, TIMEOUT_INACTIVE);
}

#[test]
fn fireball_victim_drifts_up_during_impact_window() {
    let ctx = make_ctx();
    let mut state = make_state(&ctx);
    let mut shooter = enemy_car_at(&ctx, 900, 100);
    shooter.fireballs.push(Fireball::new(500, 300, &ctx));
    state.enemy_cars.push(shooter);
    state.other_cars.push(other_car_at(&ctx, 500, 300));

    resolve_collisions(&mut state, &ctx);
    assert!(state.enemy_cars[0].fireballs.is_empty());
    assert!(state.other_cars[0].car.change_speed);
    assert_eq!(state.other_cars[0].car.body.y, 299);

    for _ in 0..11 {
        resolve_collisions(&mut state, &ctx);
    }
    let victim = &state.other_cars[0].car;
    assert_eq!(victim.body.y, 290);
    assert!(!victim.health.hit_by_fireball);
}

#[test]
fn fireball_never_hits_its_shooter() {
    let ctx = make_ctx();
    let mut state = make_state(&ctx);
    let mut shooter = enemy_car_at(&ctx, 900, 100);
    shooter.fireballs.push(Fireball::new(900, 100, &ctx));
    state.enemy_cars.push(shooter);

    resolve_collisions(&mut state, &ctx);

    assert_eq!(state.enemy_cars[0].car.health.health, 1.0);
    assert_eq!(state.enemy_cars[0].fireballs.len(), 1);
    assert!(state.enemy_cars[0].fireballs[0].active);
}

#[test]
fn timeout_counts_down_once_per_frame() {
    let ctx = make_ctx();
    let mut state = make_state(&ctx);
    state.driver.person.health.start_timeout();
    state.taxi.car.health.start_timeout();
    for _ in 0..5 {
        resolve_collisions(&mut state, &ctx);
    }
    assert_eq!(state.driver.person.health.timeout, COLLISION_TIMEOUT_FRAMES - 5);
    assert_eq!(state.taxi.car.health.timeout, COLLISION_TIMEOUT_FRAMES - 5);
}
