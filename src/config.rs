//! Game configuration.
//!
//! The configuration arrives as a flat properties text (`key=value`). It is
//! parsed once into [`Properties`], then validated into the typed, read-only
//! [`GameConfig`].  Every key is required: a session never runs on guessed
//! numbers.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::LoadError;

/// Number of road lanes NPCs and respawned taxis are placed on.
pub const LANE_COUNT: usize = 3;

/// Highest passenger priority that carries a fare rate.
pub const MAX_PRIORITY: u32 = 3;

/// Raw key → value store, in key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, key: &str) -> Result<&str, LoadError> {
        self.get(key)
            .ok_or_else(|| LoadError::MissingKey(key.to_string()))
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<T, LoadError> {
        let raw = self.require(key)?;
        raw.trim().parse().map_err(|_| LoadError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })
    }

    fn positive<T: FromStr + PartialOrd + Default>(&self, key: &str) -> Result<T, LoadError> {
        let value: T = self.parse(key)?;
        if value <= T::default() {
            return Err(LoadError::InvalidValue {
                key: key.to_string(),
                value: self.require(key)?.to_string(),
            });
        }
        Ok(value)
    }

    fn non_negative<T: FromStr + PartialOrd + Default>(&self, key: &str) -> Result<T, LoadError> {
        let value: T = self.parse(key)?;
        if value < T::default() {
            return Err(LoadError::InvalidValue {
                key: key.to_string(),
                value: self.require(key)?.to_string(),
            });
        }
        Ok(value)
    }

    fn path(&self, key: &str) -> Result<String, LoadError> {
        Ok(self.require(key)?.trim().to_string())
    }
}

/// Parse properties text.  `#` and `!` start comment lines; a line without
/// `=` or `:` is ignored.
pub fn parse_properties(text: &str) -> Properties {
    let mut props = Properties::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
            continue;
        };
        let (key, value) = line.split_at(split);
        props.insert(key.trim(), value[1..].trim());
    }
    props
}

// ── Typed configuration ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TaxiConfig {
    pub radius: f64,
    pub damage: f64,
    pub health: f64,
    pub speed_x: i32,
    /// World scroll speed while the taxi drives forward.
    pub speed_y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    pub radius: f64,
    pub health: f64,
    pub walk_speed_x: i32,
    pub walk_speed_y: i32,
    pub get_in_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PassengerConfig {
    pub radius: f64,
    pub health: f64,
    pub walk_speed_x: i32,
    pub walk_speed_y: i32,
    pub detect_radius: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NpcConfig {
    pub min_speed_y: i32,
    pub max_speed_y: i32,
    /// One-in-N odds of spawning per frame.
    pub spawn_rate: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FireballConfig {
    pub radius: f64,
    pub damage: f64,
    pub speed_y: i32,
    /// One-in-N odds per frame that a hostile car shoots.
    pub shoot_rate: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUpConfig {
    pub radius: f64,
    pub max_frames: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EffectConfig {
    pub fire_ttl: u32,
    pub smoke_ttl: u32,
    pub blood_ttl: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripConfig {
    pub rate_per_y: f64,
    /// Fare rate for priorities 1..=MAX_PRIORITY, index 0 is priority 1.
    pub rate_priority: [f64; MAX_PRIORITY as usize],
    pub penalty_per_y: f64,
    pub flag_radius: f64,
}

impl TripConfig {
    pub fn priority_rate(&self, priority: u32) -> Option<f64> {
        let index = usize::try_from(priority.checked_sub(1)?).ok()?;
        self.rate_priority.get(index).copied()
    }
}

/// Input and output file locations, only used by the front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct FileConfig {
    pub layout: String,
    pub weather: String,
    pub scores: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub window_width: i32,
    pub window_height: i32,
    pub lanes: [i32; LANE_COUNT],
    pub taxi: TaxiConfig,
    pub driver: DriverConfig,
    pub passenger: PassengerConfig,
    /// Radius, damage and health shared by every NPC car.
    pub npc_radius: f64,
    pub npc_damage: f64,
    pub npc_health: f64,
    pub other_car: NpcConfig,
    pub enemy_car: NpcConfig,
    pub fireball: FireballConfig,
    pub coin: PowerUpConfig,
    pub star: PowerUpConfig,
    pub effects: EffectConfig,
    pub trip: TripConfig,
    pub target: f64,
    pub max_frames: u32,
    pub files: FileConfig,
}

impl GameConfig {
    pub fn from_properties(p: &Properties) -> Result<Self, LoadError> {
        let other_car = NpcConfig {
            min_speed_y: p.parse("gameObjects.otherCar.minSpeedY")?,
            max_speed_y: p.parse("gameObjects.otherCar.maxSpeedY")?,
            spawn_rate: p.positive("gameObjects.otherCar.spawnRate")?,
        };
        let enemy_car = NpcConfig {
            min_speed_y: p.parse("gameObjects.enemyCar.minSpeedY")?,
            max_speed_y: p.parse("gameObjects.enemyCar.maxSpeedY")?,
            spawn_rate: p.positive("gameObjects.enemyCar.spawnRate")?,
        };
        for (prefix, npc) in [("otherCar", &other_car), ("enemyCar", &enemy_car)] {
            if npc.min_speed_y > npc.max_speed_y {
                let key = format!("gameObjects.{prefix}.maxSpeedY");
                return Err(LoadError::InvalidValue {
                    value: npc.max_speed_y.to_string(),
                    key,
                });
            }
        }

        Ok(GameConfig {
            window_width: p.positive("window.width")?,
            window_height: p.positive("window.height")?,
            lanes: [
                p.parse("roadLaneCenter1")?,
                p.parse("roadLaneCenter2")?,
                p.parse("roadLaneCenter3")?,
            ],
            taxi: TaxiConfig {
                radius: p.non_negative("gameObjects.taxi.radius")?,
                damage: p.non_negative("gameObjects.taxi.damage")?,
                health: p.positive("gameObjects.taxi.health")?,
                speed_x: p.parse("gameObjects.taxi.speedX")?,
                speed_y: p.parse("gameObjects.taxi.speedY")?,
            },
            driver: DriverConfig {
                radius: p.non_negative("gameObjects.driver.radius")?,
                health: p.positive("gameObjects.driver.health")?,
                walk_speed_x: p.non_negative("gameObjects.driver.walkSpeedX")?,
                walk_speed_y: p.non_negative("gameObjects.driver.walkSpeedY")?,
                get_in_radius: p.non_negative("gameObjects.driver.taxiGetInRadius")?,
            },
            passenger: PassengerConfig {
                radius: p.non_negative("gameObjects.passenger.radius")?,
                health: p.positive("gameObjects.passenger.health")?,
                walk_speed_x: p.non_negative("gameObjects.passenger.walkSpeedX")?,
                walk_speed_y: p.non_negative("gameObjects.passenger.walkSpeedY")?,
                detect_radius: p.non_negative("gameObjects.passenger.taxiDetectRadius")?,
            },
            npc_radius: p.non_negative("gameObjects.otherCar.radius")?,
            npc_damage: p.non_negative("gameObjects.otherCar.damage")?,
            npc_health: p.positive("gameObjects.otherCar.health")?,
            other_car,
            enemy_car,
            fireball: FireballConfig {
                radius: p.non_negative("gameObjects.fireball.radius")?,
                damage: p.non_negative("gameObjects.fireball.damage")?,
                speed_y: p.parse("gameObjects.fireball.shootSpeedY")?,
                shoot_rate: p.positive("gameObjects.enemyCar.fireballRate")?,
            },
            coin: PowerUpConfig {
                radius: p.non_negative("gameObjects.coin.radius")?,
                max_frames: p.parse("gameObjects.coin.maxFrames")?,
            },
            star: PowerUpConfig {
                radius: p.non_negative("gameObjects.invinciblePower.radius")?,
                max_frames: p.parse("gameObjects.invinciblePower.maxFrames")?,
            },
            effects: EffectConfig {
                fire_ttl: p.parse("gameObjects.fire.ttl")?,
                smoke_ttl: p.parse("gameObjects.smoke.ttl")?,
                blood_ttl: p.parse("gameObjects.blood.ttl")?,
            },
            trip: TripConfig {
                rate_per_y: p.parse("trip.rate.perY")?,
                rate_priority: [
                    p.parse("trip.rate.priority1")?,
                    p.parse("trip.rate.priority2")?,
                    p.parse("trip.rate.priority3")?,
                ],
                penalty_per_y: p.parse("trip.penalty.perY")?,
                flag_radius: p.non_negative("gameObjects.tripEndFlag.radius")?,
            },
            target: p.parse("gamePlay.target")?,
            max_frames: p.positive("gamePlay.maxFrames")?,
            files: FileConfig {
                layout: p.path("gamePlay.objectsFile")?,
                weather: p.path("gamePlay.weatherFile")?,
                scores: p.path("gameEnd.scoresFile")?,
            },
        })
    }
}

/// Immutable context handed to every system that needs geometry or tuning.
/// Built once at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct GameContext {
    pub config: GameConfig,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        GameContext { config }
    }

    pub fn from_properties(props: &Properties) -> Result<Self, LoadError> {
        Ok(Self::new(GameConfig::from_properties(props)?))
    }

    pub fn lanes(&self) -> &[i32; LANE_COUNT] {
        &self.config.lanes
    }

    /// How far the world moves per frame while the taxi drives forward.
    pub fn scroll_speed(&self) -> i32 {
        self.config.taxi.speed_y
    }
}
