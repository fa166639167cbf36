mod common;

use std::io;

use shadow_taxi::config::{parse_properties, GameContext};
use shadow_taxi::entities::*;
use shadow_taxi::error::{LoadError, SimError};
use shadow_taxi::input::InputSnapshot;
use shadow_taxi::layout::{parse_layout, parse_weather};
use shadow_taxi::score::{MemoryScoreSink, ScoreRecord, ScoreSink};
use shadow_taxi::simulation::Simulation;

use common::*;

const LAYOUT: &str = "\
# one passenger right next to the taxi
TAXI,300,600
DRIVER,300,600
PASSENGER,300,600,1,300,100,0
COIN,500,-200
";

const WEATHER: &str = "SUNNY,0,50\nRAINING,51,100\n";

fn session(ctx: GameContext) -> Simulation<MemoryScoreSink> {
    Simulation::new(ctx.clone(), make_state(&ctx), 9, "ana", MemoryScoreSink::default())
}

/// Refuses every write and counts the attempts.
#[derive(Default)]
struct BrokenSink {
    attempts: usize,
}

impl ScoreSink for BrokenSink {
    fn record(&mut self, _score: &ScoreRecord) -> io::Result<()> {
        self.attempts += 1;
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

// ── Score ─────────────────────────────────────────────────────────────────────

#[test]
fn score_is_written_once_when_time_runs_out() {
    let mut ctx = make_ctx();
    ctx.config.max_frames = 3;
    let mut sim = session(ctx);

    for _ in 0..2 {
        assert_eq!(sim.advance(&InputSnapshot::default()).unwrap(), GameStatus::Playing);
        assert!(sim.sink().records.is_empty());
    }
    let status = sim.advance(&InputSnapshot::default()).unwrap();
    assert_eq!(status, GameStatus::Over(TerminalCause::TimeUp));
    assert!(sim.is_over());
    assert!(sim.score_saved());

    for _ in 0..3 {
        sim.advance(&InputSnapshot::default()).unwrap();
    }
    assert_eq!(
        sim.sink().records,
        vec![ScoreRecord { player_name: "ana".into(), total_earnings: 0.0 }]
    );
    assert_eq!(sim.state().frame, 3);
}

#[test]
fn score_is_written_as_soon_as_someone_dies() {
    let ctx = make_ctx();
    let mut state = make_state(&ctx);
    state.driver.person.health.down = true;
    state.total_earnings = 12.5;
    let mut sim = Simulation::new(ctx, state, 1, "bo", MemoryScoreSink::default());

    let status = sim.advance(&InputSnapshot::default()).unwrap();
    assert!(matches!(status, GameStatus::Ending { cause: TerminalCause::PersonDied, .. }));
    assert!(!sim.is_over());
    assert_eq!(sim.sink().records.len(), 1);
    assert_eq!(sim.sink().records[0].to_line(), "bo,12.50");

    while !sim.is_over() {
        sim.advance(&InputSnapshot::default()).unwrap();
    }
    assert_eq!(sim.sink().records.len(), 1);
}

#[test]
fn failed_score_write_is_reported_once() {
    let mut ctx = make_ctx();
    ctx.config.max_frames = 1;
    let state = make_state(&ctx);
    let mut sim = Simulation::new(ctx, state, 1, "cy", BrokenSink::default());

    let result = sim.advance(&InputSnapshot::default());
    assert!(matches!(result, Err(SimError::ScoreWrite(_))));
    assert!(sim.score_saved());

    assert!(sim.advance(&InputSnapshot::default()).is_ok());
    assert_eq!(sim.sink().attempts, 1);
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[test]
fn load_builds_a_session_from_csv_text() {
    let sim = Simulation::load(make_ctx(), LAYOUT, WEATHER, 3, "dee", MemoryScoreSink::default())
        .unwrap();
    let state = sim.state();
    assert_eq!(sim.player_name(), "dee");
    assert_eq!(state.passengers.len(), 1);
    assert_eq!(state.power_ups.len(), 1);
    assert_eq!(state.schedule.conditions.len(), 2);
    assert_eq!(state.schedule.conditions[1].kind, WeatherKind::Raining);
    assert!(!sim.score_saved());
}

#[test]
fn load_reports_broken_files() {
    let bad_layout = "TAXI,1,2\nDRIVER,1,2\nTRUCK,5,5\n";
    let err = Simulation::load(make_ctx(), bad_layout, WEATHER, 3, "x", MemoryScoreSink::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadError::Layout { line: 3, .. }));

    let bad_weather = "SUNNY,0,10\nHAIL,11,20\n";
    let err = Simulation::load(make_ctx(), LAYOUT, bad_weather, 3, "x", MemoryScoreSink::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadError::Weather { line: 2, .. }));

    let no_driver = "TAXI,1,2\n";
    let err = Simulation::load(make_ctx(), no_driver, WEATHER, 3, "x", MemoryScoreSink::default())
        .err()
        .unwrap();
    assert!(matches!(err, LoadError::MissingActor("DRIVER")));
}

#[test]
fn same_seed_gives_the_same_session() {
    let mut ctx = make_ctx();
    ctx.config.other_car.spawn_rate = 10;
    ctx.config.enemy_car.spawn_rate = 20;
    ctx.config.enemy_car.max_speed_y = 8;
    ctx.config.fireball.shoot_rate = 5;

    let run = || {
        let mut sim =
            Simulation::load(ctx.clone(), LAYOUT, WEATHER, 77, "eve", MemoryScoreSink::default())
                .unwrap();
        for i in 0..300 {
            let input = if i % 3 == 0 { InputSnapshot::forward() } else { InputSnapshot::default() };
            sim.advance(&input).unwrap();
        }
        sim.state().clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn hud_reflects_the_session() {
    let sim = Simulation::load(make_ctx(), LAYOUT, WEATHER, 3, "fay", MemoryScoreSink::default())
        .unwrap();
    let hud = sim.hud();
    assert_eq!(hud.target, 100.0);
    assert_eq!(hud.remaining_frames, 1000);
    assert_eq!(hud.taxi_health, 100.0);
    assert_eq!(hud.passenger_health, Some(100.0));
    assert_eq!(hud.last_trip, None);
}

// ── Shipped resources ─────────────────────────────────────────────────────────

#[test]
fn shipped_resources_load() {
    let root = env!("CARGO_MANIFEST_DIR");
    let read = |name: &str| std::fs::read_to_string(format!("{root}/res/{name}")).unwrap();

    let props = parse_properties(&read("app.properties"));
    let ctx = GameContext::from_properties(&props).unwrap();
    assert_eq!(ctx.config.files.layout, "res/gameObjects.csv");

    let records = parse_layout(&read("gameObjects.csv")).unwrap();
    let schedule = parse_weather(&read("weather.csv")).unwrap();
    let sim = Simulation::new(
        ctx.clone(),
        shadow_taxi::compute::init_state(&ctx, &records, schedule).unwrap(),
        0,
        "res",
        MemoryScoreSink::default(),
    );
    assert_eq!(sim.state().passengers.len(), 4);
    assert_eq!(sim.state().taxi.car.body.x, 480);
}
