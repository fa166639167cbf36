//! Weather schedule lookup and its effect on fares.

use log::debug;

use crate::entities::{GameState, WeatherCondition, WeatherKind, WeatherSchedule};

impl WeatherKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SUNNY" => Some(WeatherKind::Sunny),
            "RAINING" => Some(WeatherKind::Raining),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeatherKind::Sunny => "SUNNY",
            WeatherKind::Raining => "RAINING",
        }
    }
}

impl WeatherCondition {
    pub fn contains(&self, frame: u32) -> bool {
        self.start_frame <= frame && frame <= self.end_frame
    }
}

impl WeatherSchedule {
    pub fn new(conditions: Vec<WeatherCondition>) -> Self {
        WeatherSchedule { conditions }
    }

    /// First condition containing `frame`, or `previous` when none does.
    pub fn resolve(&self, frame: u32, previous: WeatherKind) -> WeatherKind {
        self.conditions
            .iter()
            .find(|c| c.contains(frame))
            .map_or(previous, |c| c.kind)
    }
}

/// Resolve this frame's weather and refresh the rain pin on every umbrella
/// carrier.  The pin is recomputed each frame, so it lifts when the rain
/// stops.
pub fn update_weather(state: &mut GameState) {
    let weather = state.schedule.resolve(state.frame, state.weather);
    if weather != state.weather {
        debug!("frame {}: weather {} -> {}", state.frame, state.weather.name(), weather.name());
        state.weather = weather;
    }
    let raining = weather == WeatherKind::Raining;
    for passenger in &mut state.passengers {
        passenger.plan.rain_pinned = raining && passenger.has_umbrella;
    }
}
