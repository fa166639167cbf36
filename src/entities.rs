//! Game entity types: pure data, no logic.
//!
//! Cross references between actors (driver ↔ taxi ↔ trip ↔ passenger) are
//! integer handles into the tables owned by [`GameState`], resolved each tick.

/// Frames an actor stays out of new collisions after being hit.
pub const COLLISION_TIMEOUT_FRAMES: i32 = 200;

/// Trailing window of a timeout during which colliding actors are pushed apart.
pub const COLLISION_IMPACT_FRAMES: i32 = 10;

/// Subtracted on every damage application so health never sits exactly on 0.
pub const DAMAGE_EPSILON: f64 = 1e-6;

/// Timeout counter value of an actor that has never collided.
pub const TIMEOUT_INACTIVE: i32 = -1;

// ── Handles ───────────────────────────────────────────────────────────────────

/// Serial number of a taxi; a respawned taxi gets a fresh one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxiId(pub u32);

/// Index into `GameState::passengers`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerId(pub usize);

/// Index into `GameState::trips`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripId(pub usize);

/// Index into `GameState::power_ups`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PowerUpId(pub usize);

// ── Actor kinds ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarKind {
    Taxi,
    OtherCar,
    EnemyCar,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonKind {
    Driver,
    Passenger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Fire,
    Smoke,
    Blood,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Lowers the current trip's priority by one.
    Coin,
    /// Makes the driver and taxi invincible.
    Star,
}

/// Closed set of everything that lives in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorKind {
    Car(CarKind),
    Person(PersonKind),
    PowerUp(PowerUpKind),
    Effect(EffectKind),
    Fireball,
    TripEndFlag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherKind {
    Sunny,
    Raining,
}

// ── Shared records ────────────────────────────────────────────────────────────

/// Position and collision radius.  Positions are integer world units with y
/// growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
    pub radius: f64,
}

/// Input-driven vertical scroll direction: 1 while the world scrolls, else 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollLatch {
    pub dir: i32,
}

/// Fixed-lifetime visual overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub body: Entity,
    pub frames_left: u32,
    pub scroll: ScrollLatch,
}

/// Health bookkeeping embedded in every car and person.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthState {
    pub health: f64,
    /// Damaged (cars) or dead (persons).  Set once, never cleared.
    pub down: bool,
    pub invincible: bool,
    /// Collision timeout countdown, `TIMEOUT_INACTIVE` until the first hit.
    pub timeout: i32,
    pub hit_by_fireball: bool,
    /// Most recent hit.
    pub smoke: Option<Effect>,
    /// Fire or Blood, created the moment health first drops to 0.
    pub terminal: Option<Effect>,
}

// ── Cars ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub kind: CarKind,
    pub body: Entity,
    pub health: HealthState,
    pub inflicted_damage: f64,
    pub scroll: ScrollLatch,
    /// Raised by a collision; an NPC re-rolls its speed once out of timeout.
    pub change_speed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Taxi {
    pub id: TaxiId,
    pub car: Car,
    pub driver_on_board: bool,
    pub moving_x: bool,
    pub moving_y: bool,
}

/// Neutral (`OtherCar`) or hostile (`EnemyCar`) traffic.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcCar {
    pub car: Car,
    pub speed_y: i32,
    /// Live projectiles shot by this car (always empty for neutral cars).
    pub fireballs: Vec<Fireball>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fireball {
    pub body: Entity,
    pub active: bool,
    pub speed_y: i32,
    pub damage: f64,
}

// ── Persons ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub kind: PersonKind,
    pub body: Entity,
    pub health: HealthState,
    pub scroll: ScrollLatch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Driver {
    pub person: Person,
    /// The taxi this driver belongs to; rebound when a taxi is destroyed.
    pub taxi: TaxiId,
    pub in_taxi: bool,
    /// Passenger currently riding with (or being delivered by) this driver.
    pub passenger: Option<PassengerId>,
    /// Current trip, kept after completion until the next boarding.
    pub trip: Option<TripId>,
    pub coin: Option<PowerUpId>,
    pub star: Option<PowerUpId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassengerPhase {
    /// Standing at the roadside, showing priority and fare.
    Waiting,
    /// Riding in the driver's taxi.
    Aboard,
    /// Thrown out of a destroyed taxi, walking behind the driver.
    Ejected,
    /// Trip complete, walking to the end flag.
    Delivered { at_flag: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Passenger {
    pub person: Person,
    pub plan: TravelPlan,
    pub has_umbrella: bool,
    pub phase: PassengerPhase,
    pub trip: Option<TripId>,
}

// ── Trips ─────────────────────────────────────────────────────────────────────

/// Fare data of one passenger, independent of boarding.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelPlan {
    pub destination_x: i32,
    pub distance_y: i32,
    /// Priority after coin reductions, never below 1.
    pub priority: u32,
    /// Pinned to priority 1 by rain this frame.
    pub rain_pinned: bool,
    pub coin_applied: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripEndFlag {
    pub body: Entity,
    pub scroll: ScrollLatch,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub passenger: PassengerId,
    /// Cleared while the taxi carrying the passenger is destroyed.
    pub taxi: Option<TaxiId>,
    pub boarding_y: i32,
    /// Locked at boarding.
    pub fee: f64,
    /// Effective priority the fee was computed with.
    pub priority: u32,
    pub flag: TripEndFlag,
    pub complete: bool,
    pub penalty: f64,
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub body: Entity,
    pub collected: bool,
    pub frames_active: u32,
    pub max_frames: u32,
    pub scroll: ScrollLatch,
}

// ── Weather ───────────────────────────────────────────────────────────────────

/// Inclusive frame range during which a weather condition applies.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherCondition {
    pub kind: WeatherKind,
    pub start_frame: u32,
    pub end_frame: u32,
}

/// Conditions in file order; the first one containing a frame wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherSchedule {
    pub conditions: Vec<WeatherCondition>,
}

// ── Session status ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalCause {
    /// Frame budget used up.
    TimeUp,
    /// Total earnings reached the target.
    TargetReached,
    /// The driver or a passenger died.
    PersonDied,
    /// The current taxi left the screen with nobody driving it.
    TaxiLost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// A person died; the game ends once the grace frames run out.
    Ending { cause: TerminalCause, frames_left: u32 },
    Over(TerminalCause),
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the tick can return a new copy
/// without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub frame: u32,
    pub weather: WeatherKind,
    pub schedule: WeatherSchedule,
    pub taxi: Taxi,
    /// Destroyed taxis, still scrolling with the world.
    pub wrecks: Vec<Taxi>,
    pub next_taxi_id: u32,
    pub driver: Driver,
    pub passengers: Vec<Passenger>,
    pub power_ups: Vec<PowerUp>,
    pub other_cars: Vec<NpcCar>,
    pub enemy_cars: Vec<NpcCar>,
    /// Every trip ever started, kept for the earnings total.
    pub trips: Vec<Trip>,
    pub total_earnings: f64,
    pub status: GameStatus,
}
