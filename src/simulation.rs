//! A running session: game state, seeded RNG and the one-time score write.

use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::compute::{init_state, tick};
use crate::config::GameContext;
use crate::entities::{GameState, GameStatus};
use crate::error::{LoadError, SimError};
use crate::hud::HudSnapshot;
use crate::input::InputSnapshot;
use crate::layout::{parse_layout, parse_weather};
use crate::score::{ScoreRecord, ScoreSink};

pub struct Simulation<S: ScoreSink> {
    ctx: GameContext,
    state: GameState,
    rng: ChaCha8Rng,
    player_name: String,
    sink: S,
    score_saved: bool,
}

impl<S: ScoreSink> Simulation<S> {
    pub fn new(
        ctx: GameContext,
        state: GameState,
        seed: u64,
        player_name: impl Into<String>,
        sink: S,
    ) -> Self {
        Simulation {
            ctx,
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            player_name: player_name.into(),
            sink,
            score_saved: false,
        }
    }

    /// Build a session from layout and weather CSV text.
    pub fn load(
        ctx: GameContext,
        layout: &str,
        weather: &str,
        seed: u64,
        player_name: impl Into<String>,
        sink: S,
    ) -> Result<Self, LoadError> {
        let records = parse_layout(layout)?;
        let schedule = parse_weather(weather)?;
        let state = init_state(&ctx, &records, schedule)?;
        Ok(Self::new(ctx, state, seed, player_name, sink))
    }

    /// Run one frame.  The score is written the first frame the game stops
    /// being `Playing`, and never again.
    pub fn advance(&mut self, input: &InputSnapshot) -> Result<GameStatus, SimError> {
        self.state = tick(&self.state, &self.ctx, input, &mut self.rng);
        if self.state.status != GameStatus::Playing && !self.score_saved {
            self.score_saved = true;
            let record = ScoreRecord {
                player_name: self.player_name.clone(),
                total_earnings: self.state.total_earnings,
            };
            if let Err(err) = self.sink.record(&record) {
                warn!("score for {} not saved: {}", record.player_name, err);
                return Err(err.into());
            }
            info!("score saved: {}", record.to_line());
        }
        Ok(self.state.status)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score_saved(&self) -> bool {
        self.score_saved
    }

    pub fn is_over(&self) -> bool {
        self.state.status.is_over()
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::capture(&self.state, &self.ctx)
    }
}
