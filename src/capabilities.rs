//! Capabilities shared across actor kinds.
//!
//! Actors are flat records; behaviour they have in common is expressed by the
//! small traits here and implemented per record type.

use crate::config::EffectConfig;
use crate::entities::{
    ActorKind, Car, Effect, EffectKind, Entity, Fireball, HealthState, Person, PowerUp,
    ScrollLatch, TripEndFlag, COLLISION_IMPACT_FRAMES, COLLISION_TIMEOUT_FRAMES, DAMAGE_EPSILON,
    TIMEOUT_INACTIVE,
};
use crate::input::InputSnapshot;

impl Entity {
    pub fn new(x: i32, y: i32, radius: f64) -> Self {
        Entity { x, y, radius }
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// Strict overlap: centre distance below the sum of radii.
    pub fn overlaps(&self, other: &Entity) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    /// Inclusive contact, used for pickups.
    pub fn touches(&self, other: &Entity) -> bool {
        self.distance_to(other) <= self.radius + other.radius
    }

    /// Move one walking step towards `(x, y)`, never past it.
    pub fn step_towards(&mut self, x: i32, y: i32, speed_x: i32, speed_y: i32) {
        self.x += (x - self.x).clamp(-speed_x.abs(), speed_x.abs());
        self.y += (y - self.y).clamp(-speed_y.abs(), speed_y.abs());
    }

    pub fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

impl ScrollLatch {
    /// Latch the scroll direction from UP and return it.
    pub fn adjust(&mut self, input: &InputSnapshot) -> i32 {
        if input.up.down || input.up.pressed {
            self.dir = 1;
        } else if input.up.released {
            self.dir = 0;
        }
        self.dir
    }
}

// ── Traits ────────────────────────────────────────────────────────────────────

pub trait Actor {
    fn kind(&self) -> ActorKind;
    fn body(&self) -> &Entity;
    fn body_mut(&mut self) -> &mut Entity;
}

pub trait Collidable: Actor {
    fn collides_with<C: Collidable + ?Sized>(&self, other: &C) -> bool {
        self.body().overlaps(other.body())
    }
}

/// Moves with the world while the taxi drives forward.
pub trait Scrollable: Actor {
    fn latch_mut(&mut self) -> &mut ScrollLatch;

    fn scroll(&mut self, input: &InputSnapshot, speed: i32) {
        let dir = self.latch_mut().adjust(input);
        self.body_mut().y += speed * dir;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible: nothing changed.
    Blocked,
    Hurt,
    /// This hit took health to 0 for the first time.
    Downed,
}

pub trait Damageable: Collidable {
    fn health(&self) -> &HealthState;
    fn health_mut(&mut self) -> &mut HealthState;

    /// Fire for cars, Blood for persons.
    fn terminal_effect(&self) -> EffectKind;

    fn take_damage(&mut self, points: f64, effects: &EffectConfig) -> DamageOutcome {
        if self.health().invincible {
            return DamageOutcome::Blocked;
        }
        let Entity { x, y, .. } = *self.body();
        let kind = self.terminal_effect();
        let state = self.health_mut();
        state.health -= points + DAMAGE_EPSILON;
        state.smoke = Some(Effect::new(EffectKind::Smoke, x, y, effects));
        if state.health <= 0.0 && !state.down {
            state.down = true;
            state.terminal = Some(Effect::new(kind, x, y, effects));
            return DamageOutcome::Downed;
        }
        DamageOutcome::Hurt
    }
}

// ── Health bookkeeping ────────────────────────────────────────────────────────

impl HealthState {
    pub fn new(health: f64) -> Self {
        HealthState {
            health,
            down: false,
            invincible: false,
            timeout: TIMEOUT_INACTIVE,
            hit_by_fireball: false,
            smoke: None,
            terminal: None,
        }
    }

    pub fn in_timeout(&self) -> bool {
        self.timeout > 0
    }

    pub fn start_timeout(&mut self) {
        self.timeout = COLLISION_TIMEOUT_FRAMES;
    }

    /// Inside the trailing impact window.  The same strict boundary is used
    /// for every actor pairing.
    pub fn in_impact_window(&self) -> bool {
        self.timeout > COLLISION_TIMEOUT_FRAMES - COLLISION_IMPACT_FRAMES
    }

    pub fn count_down(&mut self) {
        if self.timeout > 0 {
            self.timeout -= 1;
        }
    }

    /// Frames the attached effects still have to play.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.smoke.iter().chain(self.terminal.iter()).filter(|e| e.is_active())
    }
}

// ── Implementations ───────────────────────────────────────────────────────────

impl Actor for Car {
    fn kind(&self) -> ActorKind {
        ActorKind::Car(self.kind)
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Collidable for Car {}

impl Scrollable for Car {
    fn latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }
}

impl Damageable for Car {
    fn health(&self) -> &HealthState {
        &self.health
    }
    fn health_mut(&mut self) -> &mut HealthState {
        &mut self.health
    }
    fn terminal_effect(&self) -> EffectKind {
        EffectKind::Fire
    }
}

impl Actor for Person {
    fn kind(&self) -> ActorKind {
        ActorKind::Person(self.kind)
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Collidable for Person {}

impl Scrollable for Person {
    fn latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }
}

impl Damageable for Person {
    fn health(&self) -> &HealthState {
        &self.health
    }
    fn health_mut(&mut self) -> &mut HealthState {
        &mut self.health
    }
    fn terminal_effect(&self) -> EffectKind {
        EffectKind::Blood
    }
}

impl Actor for PowerUp {
    fn kind(&self) -> ActorKind {
        ActorKind::PowerUp(self.kind)
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Collidable for PowerUp {
    fn collides_with<C: Collidable + ?Sized>(&self, other: &C) -> bool {
        self.body.touches(other.body())
    }
}

impl Scrollable for PowerUp {
    fn latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }
}

impl Actor for Fireball {
    fn kind(&self) -> ActorKind {
        ActorKind::Fireball
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Collidable for Fireball {}

impl Actor for Effect {
    fn kind(&self) -> ActorKind {
        ActorKind::Effect(self.kind)
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Scrollable for Effect {
    fn latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }
}

impl Actor for TripEndFlag {
    fn kind(&self) -> ActorKind {
        ActorKind::TripEndFlag
    }
    fn body(&self) -> &Entity {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

impl Scrollable for TripEndFlag {
    fn latch_mut(&mut self) -> &mut ScrollLatch {
        &mut self.scroll
    }
}
