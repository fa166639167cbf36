//! Terminal renderer: the only module that writes to the screen.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! state into terminal commands.  World coordinates are scaled down onto
//! the terminal grid below the two HUD rows.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use shadow_taxi::capabilities::Actor;
use shadow_taxi::config::GameContext;
use shadow_taxi::entities::{
    CarKind, Effect, EffectKind, Entity, GameState, GameStatus, PassengerPhase, PowerUpKind,
    TerminalCause, WeatherKind,
};
use shadow_taxi::hud::HudSnapshot;
use shadow_taxi::trip::flag_visible;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LANE: Color = Color::DarkGrey;
const C_HUD: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_TAXI: Color = Color::Yellow;
const C_WRECK: Color = Color::DarkGrey;
const C_DRIVER: Color = Color::White;
const C_PASSENGER: Color = Color::Green;
const C_OTHER_CAR: Color = Color::Blue;
const C_ENEMY_CAR: Color = Color::Red;
const C_FIREBALL: Color = Color::Magenta;
const C_COIN: Color = Color::Yellow;
const C_STAR: Color = Color::Cyan;
const C_FLAG: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD at the top.
const HUD_ROWS: u16 = 2;

/// Maps world coordinates onto the terminal cells between the HUD and the
/// hint row.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_width: i32,
    world_height: i32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, ctx: &GameContext) -> Self {
        Viewport {
            cols,
            rows,
            world_width: ctx.config.window_width,
            world_height: ctx.config.window_height,
        }
    }

    fn road_rows(&self) -> i32 {
        i32::from(self.rows.saturating_sub(HUD_ROWS + 1)).max(1)
    }

    /// Terminal cell for a world position, `None` when off screen.
    fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= self.world_width || y >= self.world_height {
            return None;
        }
        let col = i64::from(x) * i64::from(self.cols) / i64::from(self.world_width);
        let row = i64::from(y) * i64::from(self.road_rows()) / i64::from(self.world_height);
        let col = u16::try_from(col).ok()?;
        let row = u16::try_from(row).ok()?;
        Some((col, row + HUD_ROWS))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &Viewport,
    ctx: &GameContext,
    state: &GameState,
    hud: &HudSnapshot,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_lanes(out, view, ctx)?;
    draw_hud(out, view, hud)?;

    for trip in state.trips.iter().filter(|t| flag_visible(state, t)) {
        put(out, view, &trip.flag.body, "⚑", C_FLAG)?;
    }
    for power_up in state.power_ups.iter().filter(|p| !p.collected) {
        let (glyph, color) = match power_up.kind {
            PowerUpKind::Coin => ("$", C_COIN),
            PowerUpKind::Star => ("★", C_STAR),
        };
        put(out, view, power_up.body(), glyph, color)?;
    }
    for wreck in &state.wrecks {
        put(out, view, &wreck.car.body, "▣", C_WRECK)?;
        draw_effects(out, view, wreck.car.health.effects())?;
    }
    for npc in state.other_cars.iter().chain(state.enemy_cars.iter()) {
        let color = match npc.car.kind {
            CarKind::EnemyCar => C_ENEMY_CAR,
            _ => C_OTHER_CAR,
        };
        put(out, view, &npc.car.body, "■", color)?;
        for fireball in &npc.fireballs {
            put(out, view, &fireball.body, "•", C_FIREBALL)?;
        }
        draw_effects(out, view, npc.car.health.effects())?;
    }

    put(out, view, &state.taxi.car.body, "▣", C_TAXI)?;
    draw_effects(out, view, state.taxi.car.health.effects())?;

    for passenger in &state.passengers {
        if passenger.phase != PassengerPhase::Aboard {
            let glyph = match passenger.phase {
                PassengerPhase::Waiting => passenger.plan.effective_priority().to_string(),
                _ => "p".to_string(),
            };
            put(out, view, &passenger.person.body, &glyph, C_PASSENGER)?;
        }
        draw_effects(out, view, passenger.person.health.effects())?;
    }
    if !state.driver.in_taxi {
        put(out, view, &state.driver.person.body, "☺", C_DRIVER)?;
    }
    draw_effects(out, view, state.driver.person.health.effects())?;

    draw_controls_hint(out, view)?;

    if let GameStatus::Over(cause) = state.status {
        draw_game_over(out, view, cause, hud)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn put<W: Write>(
    out: &mut W,
    view: &Viewport,
    body: &Entity,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if let Some((col, row)) = view.cell(body.x, body.y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_effects<'a, W: Write>(
    out: &mut W,
    view: &Viewport,
    effects: impl Iterator<Item = &'a Effect>,
) -> std::io::Result<()> {
    for effect in effects {
        let (glyph, color) = match effect.kind {
            EffectKind::Fire => ("✸", Color::Red),
            EffectKind::Smoke => ("░", Color::Grey),
            EffectKind::Blood => ("✖", Color::DarkRed),
        };
        put(out, view, &effect.body, glyph, color)?;
    }
    Ok(())
}

// ── Road ──────────────────────────────────────────────────────────────────────

fn draw_lanes<W: Write>(out: &mut W, view: &Viewport, ctx: &GameContext) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LANE))?;
    for &lane in ctx.lanes() {
        for y in (0..ctx.config.window_height).step_by(ctx.config.window_height as usize / 12 + 1) {
            if let Some((col, row)) = view.cell(lane, y) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("┆"))?;
            }
        }
    }
    Ok(())
}

// ── HUD (rows 0-1) ────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, hud: &HudSnapshot) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "PAY {:>8.2}  TARGET {:>8.2}  FRAMES LEFT {:>5}",
        hud.earnings, hud.target, hud.remaining_frames
    )))?;

    let weather = match hud.weather {
        WeatherKind::Sunny => "SUNNY",
        WeatherKind::Raining => "RAIN",
    };
    let wx = view.cols.saturating_sub(weather.len() as u16 + 1);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(Print(weather))?;

    let passenger = hud
        .passenger_health
        .map_or_else(|| "--".to_string(), |h| format!("{h:.0}"));
    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!(
        "TAXI {:>3.0}  DRIVER {:>3.0}  PASSENGER {:>3}",
        hud.taxi_health, hud.driver_health, passenger
    )))?;

    let mut tags = String::new();
    if let Some(frames) = hud.coin_frames_remaining {
        tags.push_str(&format!("[$ {frames:>4}] "));
    }
    if hud.star_active {
        tags.push_str("[★] ");
    }
    if let Some(trip) = &hud.last_trip {
        match trip.penalty {
            Some(penalty) => tags.push_str(&format!(
                "LAST TRIP {:.2} -{:.2}",
                trip.expected_fee, penalty
            )),
            None => tags.push_str(&format!(
                "TRIP P{} {:.2}",
                trip.priority, trip.expected_fee
            )),
        }
    }
    let tx = view.cols.saturating_sub(tags.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(tx, 1))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(&tags))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ : Drive   ← → : Steer   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &Viewport,
    cause: TerminalCause,
    hud: &HudSnapshot,
) -> std::io::Result<()> {
    let (title, color) = match cause {
        TerminalCause::TargetReached => ("║    YOU   WON       ║", Color::Green),
        _ => ("║    GAME  OVER      ║", Color::Red),
    };
    let reason = match cause {
        TerminalCause::TimeUp => "Out of time",
        TerminalCause::TargetReached => "Target reached",
        TerminalCause::PersonDied => "Somebody died",
        TerminalCause::TaxiLost => "Taxi lost",
    };
    let earnings = format!("Earnings: {:.2}", hud.earnings);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", color),
        (title, color),
        ("╚════════════════════╝", color),
        (reason, Color::White),
        (earnings.as_str(), Color::Yellow),
        ("Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
