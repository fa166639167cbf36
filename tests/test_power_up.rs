mod common;

use shadow_taxi::compute::tick;
use shadow_taxi::entities::*;
use shadow_taxi::input::InputSnapshot;
use shadow_taxi::layout::SpawnRecord;
use shadow_taxi::power_up::{coin_active, star_active};

use common::*;

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

#[test]
fn power_up_lifecycle() {
    let ctx = make_ctx();
    let mut coin = PowerUp::new(PowerUpKind::Coin, 0, 0, &ctx);
    assert!(!coin.is_active());
    assert_eq!(coin.frames_remaining(), None);

    coin.collected = true;
    assert!(!coin.is_active());
    assert!(!coin.is_expired());

    coin.update(&idle(), ctx.scroll_speed());
    assert!(coin.is_active());
    assert_eq!(coin.frames_remaining(), Some(99));

    coin.frames_active = 100;
    assert!(coin.is_active());
    assert_eq!(coin.frames_remaining(), Some(0));

    coin.update(&idle(), ctx.scroll_speed());
    assert!(!coin.is_active());
    assert!(coin.is_expired());
}

#[test]
fn collected_power_up_stops_scrolling() {
    let ctx = make_ctx();
    let mut star = PowerUp::new(PowerUpKind::Star, 10, 10, &ctx);
    star.update(&InputSnapshot::forward(), ctx.scroll_speed());
    assert_eq!(star.body.y, 15);

    star.collected = true;
    star.update(&InputSnapshot::forward(), ctx.scroll_speed());
    assert_eq!(star.body.y, 15);
    assert_eq!(star.frames_active, 1);
}

#[test]
fn star_makes_taxi_invincible_for_its_window() {
    let ctx = make_ctx();
    let mut s = make_state_with(&ctx, &[SpawnRecord::Star { x: TAXI_X, y: TAXI_Y }]);
    let mut rng = seeded_rng();

    s = tick(&s, &ctx, &idle(), &mut rng);
    assert!(s.power_ups[0].collected);
    assert_eq!(s.driver.star, Some(PowerUpId(0)));
    assert!(!star_active(&s));
    assert!(!s.taxi.car.health.invincible);

    // Active on frames_active 1..=50, i.e. ticks 2..=51
    for frame in 2..=51 {
        s = tick(&s, &ctx, &idle(), &mut rng);
        assert!(s.taxi.car.health.invincible, "tick {frame}");
    }
    s = tick(&s, &ctx, &idle(), &mut rng);
    assert!(!star_active(&s));
    assert!(!s.taxi.car.health.invincible);
    // Still sheltered by the taxi
    assert!(s.driver.person.health.invincible);
}

#[test]
fn star_protects_the_driver_on_foot() {
    let ctx = make_ctx();
    let mut s = make_state_with(&ctx, &[SpawnRecord::Star { x: 800, y: 100 }]);
    s.driver.in_taxi = false;
    s.taxi.driver_on_board = false;
    s.driver.person.body.x = 800;
    s.driver.person.body.y = 100;
    let mut rng = seeded_rng();

    s = tick(&s, &ctx, &idle(), &mut rng);
    assert!(s.power_ups[0].collected);
    assert!(!s.driver.person.health.invincible);

    s = tick(&s, &ctx, &idle(), &mut rng);
    assert!(s.driver.person.health.invincible);
    // No driver aboard: the taxi gets nothing
    assert!(!s.taxi.car.health.invincible);
}

#[test]
fn driverless_taxi_cannot_collect() {
    let ctx = make_ctx();
    let mut s = make_state_with(&ctx, &[SpawnRecord::Coin { x: TAXI_X, y: TAXI_Y }]);
    s.driver.in_taxi = false;
    s.taxi.driver_on_board = false;
    s.driver.person.body.x = 800;
    s.driver.person.body.y = 100;

    let s = tick(&s, &ctx, &idle(), &mut seeded_rng());
    assert!(!s.power_ups[0].collected);
    assert_eq!(s.driver.coin, None);
}

#[test]
fn coin_counts_down_on_the_hud() {
    let ctx = make_ctx();
    let mut s = make_state_with(&ctx, &[SpawnRecord::Coin { x: TAXI_X, y: TAXI_Y }]);
    let mut rng = seeded_rng();
    for _ in 0..11 {
        s = tick(&s, &ctx, &idle(), &mut rng);
    }
    assert!(coin_active(&s));
    let hud = shadow_taxi::hud::HudSnapshot::capture(&s, &ctx);
    assert_eq!(hud.coin_frames_remaining, Some(90));
    assert!(!hud.star_active);
}
