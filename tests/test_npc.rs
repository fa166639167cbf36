mod common;

use shadow_taxi::entities::*;
use shadow_taxi::input::InputSnapshot;
use shadow_taxi::npc::{update_npcs, NPC_SPAWN_Y_TOP};

use common::*;

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

#[test]
fn spawned_traffic_starts_on_a_lane_off_screen() {
    let ctx = make_ctx();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let npc = NpcCar::spawn(CarKind::EnemyCar, &ctx, &mut rng);
        assert!(ctx.lanes().contains(&npc.car.body.x));
        assert!(npc.car.body.y == NPC_SPAWN_Y_TOP || npc.car.body.y == ctx.config.window_height);
        assert_eq!(npc.speed_y, 3);
        assert!(npc.is_hostile());
    }
}

#[test]
fn cruise_pauses_during_timeout_but_scroll_does_not() {
    let ctx = make_ctx();
    let mut npc = other_car_at(&ctx, 500, 300);
    npc.speed_y = 4;

    npc.advance(&idle(), ctx.scroll_speed());
    assert_eq!(npc.car.body.y, 296);

    npc.car.health.start_timeout();
    npc.advance(&idle(), ctx.scroll_speed());
    assert_eq!(npc.car.body.y, 296);

    npc.advance(&InputSnapshot::forward(), ctx.scroll_speed());
    assert_eq!(npc.car.body.y, 301);
}

#[test]
fn speed_is_rerolled_once_the_timeout_ends() {
    let ctx = make_ctx();
    let mut s = make_state(&ctx);
    let mut npc = other_car_at(&ctx, 500, 300);
    npc.car.change_speed = true;
    npc.car.health.timeout = 2;
    s.other_cars.push(npc);
    let mut rng = seeded_rng();

    update_npcs(&mut s, &ctx, &idle(), &mut rng);
    assert_eq!(s.other_cars[0].speed_y, 0);
    assert!(s.other_cars[0].car.change_speed);

    s.other_cars[0].car.health.timeout = 0;
    update_npcs(&mut s, &ctx, &idle(), &mut rng);
    assert_eq!(s.other_cars[0].speed_y, 3);
    assert!(!s.other_cars[0].car.change_speed);
    assert_eq!(s.other_cars[0].car.body.y, 297);
}

#[test]
fn only_hostile_cars_shoot() {
    let mut ctx = make_ctx();
    ctx.config.fireball.shoot_rate = 1;
    let mut s = make_state(&ctx);
    s.other_cars.push(other_car_at(&ctx, 300, 400));
    s.enemy_cars.push(enemy_car_at(&ctx, 500, 400));
    let mut rng = seeded_rng();

    update_npcs(&mut s, &ctx, &idle(), &mut rng);

    assert!(s.other_cars[0].fireballs.is_empty());
    let fireballs = &s.enemy_cars[0].fireballs;
    assert_eq!(fireballs.len(), 1);
    assert_eq!((fireballs[0].body.x, fireballs[0].body.y), (500, 390));
}

#[test]
fn fireball_burns_out_past_the_top_edge() {
    let ctx = make_ctx();
    let mut fireball = Fireball::new(0, 15, &ctx);
    fireball.update();
    assert!(fireball.active);
    assert_eq!(fireball.body.y, 5);
    fireball.update();
    assert!(!fireball.active);
    fireball.update();
    assert_eq!(fireball.body.y, -5);
}

#[test]
fn burned_out_and_distant_traffic_is_dropped() {
    let ctx = make_ctx();
    let mut s = make_state(&ctx);
    let mut wreck = other_car_at(&ctx, 300, 300);
    wreck.car.health.down = true;
    s.other_cars.push(wreck);
    s.other_cars.push(other_car_at(&ctx, 500, -800));
    s.other_cars.push(other_car_at(&ctx, 500, -801));
    s.enemy_cars.push(enemy_car_at(&ctx, 700, 1601));
    s.enemy_cars.push(enemy_car_at(&ctx, 700, 1600));

    update_npcs(&mut s, &ctx, &idle(), &mut seeded_rng());

    let ys: Vec<i32> = s.other_cars.iter().map(|n| n.car.body.y).collect();
    assert_eq!(ys, vec![-800]);
    let ys: Vec<i32> = s.enemy_cars.iter().map(|n| n.car.body.y).collect();
    assert_eq!(ys, vec![1600]);
}

#[test]
fn burning_car_stays_until_its_fire_is_out() {
    let ctx = make_ctx();
    let mut s = make_state(&ctx);
    let mut npc = other_car_at(&ctx, 300, 300);
    npc.car.health.down = true;
    npc.car.health.terminal = Some(Effect::new(EffectKind::Fire, 300, 300, &ctx.config.effects));
    s.other_cars.push(npc);
    let mut rng = seeded_rng();

    // fire_ttl is 10
    for _ in 0..9 {
        update_npcs(&mut s, &ctx, &idle(), &mut rng);
        assert_eq!(s.other_cars.len(), 1);
    }
    update_npcs(&mut s, &ctx, &idle(), &mut rng);
    assert!(s.other_cars.is_empty());
}
