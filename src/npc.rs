//! Neutral and hostile traffic.
//!
//! NPC cars spawn at random on one of the lanes, drive up the road at their
//! own cruise speed and are carried down by the world while the taxi drives
//! forward.  Hostile cars also shoot fireballs up the road.

use log::debug;
use rand::Rng;

use crate::capabilities::Scrollable;
use crate::config::{GameContext, LANE_COUNT};
use crate::effects::update_attached;
use crate::entities::{Car, CarKind, Entity, Fireball, GameState, NpcCar};
use crate::input::InputSnapshot;

/// Spawn row just above the visible road.
pub const NPC_SPAWN_Y_TOP: i32 = -50;

impl NpcCar {
    /// Place a neutral (`OtherCar`) or hostile (`EnemyCar`) car on a random
    /// lane, either just above or just below the screen.
    pub fn spawn(kind: CarKind, ctx: &GameContext, rng: &mut impl Rng) -> Self {
        let cfg = &ctx.config;
        let x = ctx.lanes()[rng.gen_range(0..LANE_COUNT)];
        let y = if rng.gen_bool(0.5) { NPC_SPAWN_Y_TOP } else { cfg.window_height };
        let body = Entity::new(x, y, cfg.npc_radius);
        let mut npc = NpcCar {
            car: Car::new(kind, body, cfg.npc_damage, cfg.npc_health),
            speed_y: 0,
            fireballs: Vec::new(),
        };
        npc.reroll_speed(ctx, rng);
        npc
    }

    pub fn is_hostile(&self) -> bool {
        self.car.kind == CarKind::EnemyCar
    }

    pub fn reroll_speed(&mut self, ctx: &GameContext, rng: &mut impl Rng) {
        let cfg = match self.car.kind {
            CarKind::EnemyCar => &ctx.config.enemy_car,
            _ => &ctx.config.other_car,
        };
        self.speed_y = rng.gen_range(cfg.min_speed_y..=cfg.max_speed_y);
    }

    /// Own cruise motion, frozen during a collision timeout, plus the world
    /// scroll.
    pub fn advance(&mut self, input: &InputSnapshot, scroll_speed: i32) {
        if !self.car.health.in_timeout() {
            self.car.body.y -= self.speed_y;
        }
        self.car.scroll(input, scroll_speed);
    }

    /// Burned out: damaged and its fire has finished playing.
    pub fn is_spent(&self) -> bool {
        self.car.health.down && !self.car.health.terminal.as_ref().is_some_and(|f| f.is_active())
    }
}

impl Fireball {
    pub fn new(x: i32, y: i32, ctx: &GameContext) -> Self {
        let cfg = &ctx.config.fireball;
        Fireball {
            body: Entity::new(x, y, cfg.radius),
            active: true,
            speed_y: cfg.speed_y,
            damage: cfg.damage,
        }
    }

    /// Fly up the screen; gone once past the top edge.
    pub fn update(&mut self) {
        if !self.active {
            return;
        }
        self.body.y -= self.speed_y;
        if self.body.y < 0 {
            self.active = false;
        }
    }
}

// ── Per-frame traffic step ────────────────────────────────────────────────────

pub fn update_npcs(
    state: &mut GameState,
    ctx: &GameContext,
    input: &InputSnapshot,
    rng: &mut impl Rng,
) {
    spawn_npcs(state, ctx, rng);

    let speed = ctx.scroll_speed();
    for npc in state.other_cars.iter_mut().chain(state.enemy_cars.iter_mut()) {
        update_npc(npc, ctx, input, speed, rng);
    }

    let bottom = ctx.config.window_height;
    let keep = |npc: &NpcCar| !npc.is_spent() && !is_far_off_screen(npc, bottom);
    state.other_cars.retain(keep);
    state.enemy_cars.retain(keep);
}

/// Independent one-in-N rolls for each kind of traffic.
pub fn spawn_npcs(state: &mut GameState, ctx: &GameContext, rng: &mut impl Rng) {
    if rng.gen_ratio(1, ctx.config.other_car.spawn_rate) {
        let npc = NpcCar::spawn(CarKind::OtherCar, ctx, rng);
        debug!("other car spawned at ({}, {})", npc.car.body.x, npc.car.body.y);
        state.other_cars.push(npc);
    }
    if rng.gen_ratio(1, ctx.config.enemy_car.spawn_rate) {
        let npc = NpcCar::spawn(CarKind::EnemyCar, ctx, rng);
        debug!("enemy car spawned at ({}, {})", npc.car.body.x, npc.car.body.y);
        state.enemy_cars.push(npc);
    }
}

fn update_npc(
    npc: &mut NpcCar,
    ctx: &GameContext,
    input: &InputSnapshot,
    scroll_speed: i32,
    rng: &mut impl Rng,
) {
    if npc.car.change_speed && !npc.car.health.in_timeout() {
        npc.reroll_speed(ctx, rng);
        npc.car.change_speed = false;
    }
    npc.advance(input, scroll_speed);
    update_attached(&mut npc.car.health, input, scroll_speed);

    if npc.is_hostile() {
        if !npc.car.health.down && rng.gen_ratio(1, ctx.config.fireball.shoot_rate) {
            let Entity { x, y, .. } = npc.car.body;
            npc.fireballs.push(Fireball::new(x, y, ctx));
        }
        for fireball in &mut npc.fireballs {
            fireball.update();
        }
        npc.fireballs.retain(|f| f.active);
    }
}

/// More than a screen height beyond either edge.
fn is_far_off_screen(npc: &NpcCar, window_height: i32) -> bool {
    let y = npc.car.body.y;
    y < -window_height || y > 2 * window_height
}
