//! Fire, Smoke and Blood overlays.
//!
//! An effect plays for a fixed number of frames, scrolling with the world,
//! and never collides with anything.

use crate::capabilities::Scrollable;
use crate::config::EffectConfig;
use crate::entities::{Effect, EffectKind, Entity, HealthState, ScrollLatch};
use crate::input::InputSnapshot;

impl Effect {
    pub fn new(kind: EffectKind, x: i32, y: i32, cfg: &EffectConfig) -> Self {
        let frames_left = match kind {
            EffectKind::Fire => cfg.fire_ttl,
            EffectKind::Smoke => cfg.smoke_ttl,
            EffectKind::Blood => cfg.blood_ttl,
        };
        Effect {
            kind,
            body: Entity::new(x, y, 0.0),
            frames_left,
            scroll: ScrollLatch::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.frames_left > 0
    }

    /// Play one frame: scroll, then count down.  Expired effects stay put.
    pub fn update(&mut self, input: &InputSnapshot, scroll_speed: i32) {
        if !self.is_active() {
            return;
        }
        self.scroll(input, scroll_speed);
        self.frames_left -= 1;
    }
}

/// Advance the smoke and terminal effect attached to one actor.
pub fn update_attached(health: &mut HealthState, input: &InputSnapshot, scroll_speed: i32) {
    for effect in health.smoke.iter_mut().chain(health.terminal.iter_mut()) {
        effect.update(input, scroll_speed);
    }
}
