//! Level layout and weather schedule parsing.
//!
//! Both files are plain CSV.  Layout lines:
//!
//! ```text
//! TAXI,x,y
//! DRIVER,x,y
//! PASSENGER,x,y,priority,endX,distanceY,umbrella
//! COIN,x,y
//! INVINCIBLE_POWER,x,y
//! ```
//!
//! Weather lines are `SUNNY|RAINING,startFrame,endFrame`.  Blank lines and
//! `#` comments are skipped; line numbers in errors are 1-based.

use std::str::FromStr;

use crate::entities::{WeatherCondition, WeatherKind, WeatherSchedule};
use crate::error::LoadError;

/// One placed object from the layout file.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnRecord {
    Taxi { x: i32, y: i32 },
    Driver { x: i32, y: i32 },
    Passenger {
        x: i32,
        y: i32,
        priority: u32,
        destination_x: i32,
        distance_y: i32,
        has_umbrella: bool,
    },
    Coin { x: i32, y: i32 },
    Star { x: i32, y: i32 },
}

pub fn parse_layout(text: &str) -> Result<Vec<SpawnRecord>, LoadError> {
    let mut records = Vec::new();
    for (line, fields) in csv_lines(text) {
        let err = |reason: String| LoadError::Layout { line, reason };
        let expect = |n: usize| {
            if fields.len() == n {
                Ok(())
            } else {
                Err(err(format!("{} expects {} fields, found {}", fields[0], n, fields.len())))
            }
        };
        let field = |i: usize| -> Result<i32, LoadError> { number(&fields, i).map_err(err) };

        let record = match fields[0] {
            "TAXI" => {
                expect(3)?;
                SpawnRecord::Taxi { x: field(1)?, y: field(2)? }
            }
            "DRIVER" => {
                expect(3)?;
                SpawnRecord::Driver { x: field(1)?, y: field(2)? }
            }
            "PASSENGER" => {
                expect(7)?;
                SpawnRecord::Passenger {
                    x: field(1)?,
                    y: field(2)?,
                    priority: number(&fields, 3).map_err(err)?,
                    destination_x: field(4)?,
                    distance_y: field(5)?,
                    has_umbrella: flag(fields[6]).ok_or_else(|| {
                        err(format!("umbrella must be 0 or 1, found `{}`", fields[6]))
                    })?,
                }
            }
            "COIN" => {
                expect(3)?;
                SpawnRecord::Coin { x: field(1)?, y: field(2)? }
            }
            "INVINCIBLE_POWER" => {
                expect(3)?;
                SpawnRecord::Star { x: field(1)?, y: field(2)? }
            }
            other => return Err(err(format!("unknown object `{other}`"))),
        };
        records.push(record);
    }
    Ok(records)
}

pub fn parse_weather(text: &str) -> Result<WeatherSchedule, LoadError> {
    let mut conditions = Vec::new();
    for (line, fields) in csv_lines(text) {
        let err = |reason: String| LoadError::Weather { line, reason };
        if fields.len() != 3 {
            return Err(err(format!("expected 3 fields, found {}", fields.len())));
        }
        let kind = WeatherKind::from_name(fields[0])
            .ok_or_else(|| err(format!("unknown weather `{}`", fields[0])))?;
        let start_frame: u32 = number(&fields, 1).map_err(err)?;
        let end_frame: u32 = number(&fields, 2).map_err(err)?;
        if start_frame > end_frame {
            return Err(err(format!("range {start_frame}..{end_frame} is reversed")));
        }
        conditions.push(WeatherCondition { kind, start_frame, end_frame });
    }
    Ok(WeatherSchedule::new(conditions))
}

/// Non-empty, non-comment lines with their 1-based number, split on commas.
fn csv_lines(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(index, raw)| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        Some((index + 1, line.split(',').map(str::trim).collect()))
    })
}

fn number<T: FromStr>(fields: &[&str], index: usize) -> Result<T, String> {
    fields[index]
        .parse()
        .map_err(|_| format!("field {} is not a number: `{}`", index + 1, fields[index]))
}

fn flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
