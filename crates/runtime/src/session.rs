//! Round scheduler.
//!
//! A [`Session`] owns the dungeon and drives it one round at a time: the
//! player spends action points through a [`CommandProvider`], the script hook
//! runs once, every enemy exhausts its own action points, then the round
//! advances. Between actions the world is ticked frame by frame until no
//! animation or projectile holds the scheduler.
use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Dungeon, GameEvent, Outcome, PlayerCommand};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Phase};
use crate::script::{NoopScript, RoundState, ScriptError, ScriptHook, ScriptScope};

/// Source of player intent.
#[async_trait]
pub trait CommandProvider: Send {
    /// Next command for the player. `None` lets a frame pass without acting.
    async fn next_command(&mut self, dungeon: &Dungeon) -> Result<Option<PlayerCommand>>;
}

/// Passes every turn. Useful for tests and spectating.
pub struct EndTurnProvider;

#[async_trait]
impl CommandProvider for EndTurnProvider {
    async fn next_command(&mut self, _dungeon: &Dungeon) -> Result<Option<PlayerCommand>> {
        Ok(Some(PlayerCommand::EndTurn))
    }
}

/// Replays a fixed list of commands, then passes.
#[derive(Debug, Clone, Default)]
pub struct QueuedCommands {
    queue: VecDeque<PlayerCommand>,
}

impl QueuedCommands {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            queue: commands.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

#[async_trait]
impl CommandProvider for QueuedCommands {
    async fn next_command(&mut self, _dungeon: &Dungeon) -> Result<Option<PlayerCommand>> {
        Ok(Some(self.queue.pop_front().unwrap_or(PlayerCommand::EndTurn)))
    }
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Length of one world tick.
    pub frame: Duration,
    /// Rounds to play before giving up on an outcome.
    pub max_rounds: u32,
    /// Sleep for each frame instead of running as fast as possible.
    pub realtime: bool,
    /// Frames to wait for animations after an action before moving on.
    pub max_settle_frames: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(50),
            max_rounds: 200,
            realtime: false,
            max_settle_frames: 600,
        }
    }
}

/// Summary of a finished (or abandoned) session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub outcome: Option<Outcome>,
    pub rounds: u32,
    pub elapsed: f64,
    pub exp_gain: i32,
    pub gold_gain: i32,
    pub player_health: f64,
    pub enemies_left: usize,
    pub script_degraded: bool,
}

pub struct Session<P> {
    dungeon: Dungeon,
    provider: P,
    script: Box<dyn ScriptHook>,
    script_degraded: bool,
    bus: EventBus,
    config: SessionConfig,
    elapsed: f64,
    rounds_played: u32,
}

impl<P: CommandProvider> Session<P> {
    pub fn new(dungeon: Dungeon, provider: P) -> Result<Self> {
        if dungeon.player().is_none() {
            return Err(RuntimeError::MissingPlayer);
        }
        Ok(Self {
            dungeon,
            provider,
            script: Box::new(NoopScript),
            script_degraded: false,
            bus: EventBus::new(),
            config: SessionConfig::default(),
            elapsed: 0.0,
            rounds_played: 0,
        })
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_script(mut self, script: impl ScriptHook + 'static) -> Self {
        self.script = Box::new(script);
        self
    }

    /// Publishes on an existing bus instead of a private one.
    #[must_use]
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = bus;
        self
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn dungeon_mut(&mut self) -> &mut Dungeon {
        &mut self.dungeon
    }

    pub fn into_dungeon(self) -> Dungeon {
        self.dungeon
    }

    pub fn is_script_degraded(&self) -> bool {
        self.script_degraded
    }

    pub fn round_state(&self) -> RoundState {
        RoundState {
            elapsed: self.elapsed,
            round: self.dungeon.round(),
            waypoints: self.dungeon.waypoints().to_vec(),
        }
    }

    /// Plays rounds until the session ends or the round limit is reached.
    pub async fn run(&mut self) -> Result<SessionReport> {
        info!(
            round = self.dungeon.round(),
            enemies = self.dungeon.enemies().count(),
            "Session started"
        );
        while !self.dungeon.is_over() && self.rounds_played < self.config.max_rounds {
            self.play_round().await?;
        }
        if !self.dungeon.is_over() {
            info!(rounds = self.rounds_played, "Round limit reached without an outcome");
        }
        Ok(self.report())
    }

    /// Plays one full round. Does nothing once the session is over.
    pub async fn play_round(&mut self) -> Result<()> {
        if self.dungeon.is_over() {
            return Ok(());
        }
        let round = self.dungeon.round();
        debug!(round, "Round started");

        self.enter(round, Phase::Player);
        self.player_phase().await?;

        if !self.dungeon.is_over() {
            self.enter(round, Phase::Script);
            self.run_script();

            self.enter(round, Phase::Enemies);
            self.dungeon.run_enemy_phase();
            self.settle().await;
        }

        if !self.dungeon.is_over() {
            self.dungeon.advance_round();
        }
        self.flush();
        self.rounds_played += 1;
        Ok(())
    }

    pub fn report(&self) -> SessionReport {
        let end = self.dungeon.end_state();
        SessionReport {
            outcome: end.outcome,
            rounds: self.rounds_played,
            elapsed: self.elapsed,
            exp_gain: end.exp_gain,
            gold_gain: end.gold_gain,
            player_health: self.dungeon.player().map_or(0.0, |p| p.health()),
            enemies_left: self
                .dungeon
                .enemies()
                .filter(|e| e.is_alive() && !e.is_expired())
                .count(),
            script_degraded: self.script_degraded,
        }
    }

    async fn player_phase(&mut self) -> Result<()> {
        while !self.dungeon.is_over() {
            let command = self.provider.next_command(&self.dungeon).await?;
            let acted = command.is_some();
            let more = self.dungeon.player_turn(command);
            if acted {
                debug!(?command, "Player acted");
                self.settle().await;
            } else {
                self.frame().await;
            }
            if !more {
                break;
            }
        }
        Ok(())
    }

    fn run_script(&mut self) {
        let state = self.round_state();
        let mut scope = ScriptScope {
            dungeon: &mut self.dungeon,
            state: &state,
        };
        let script = &mut self.script;
        let outcome = catch_unwind(AssertUnwindSafe(|| script.run_round(&mut scope)))
            .unwrap_or_else(|payload| {
                Err(ScriptError::Panicked {
                    message: panic_message(&*payload),
                })
            });
        if let Err(err) = outcome {
            warn!(
                round = state.round,
                severity = err.severity().as_str(),
                code = err.error_code(),
                error = %err,
                "Script failed; continuing without it"
            );
            self.script = Box::new(NoopScript);
            self.script_degraded = true;
            self.bus.publish(Event::ScriptDegraded {
                reason: err.to_string(),
            });
        }
    }

    /// Ticks at least once, then until nothing requests a delay.
    async fn settle(&mut self) {
        self.frame().await;
        let mut frames = 1;
        while self.dungeon.requests_delay() && frames < self.config.max_settle_frames {
            self.frame().await;
            frames += 1;
        }
        self.flush();
    }

    async fn frame(&mut self) {
        let dt = self.config.frame.as_secs_f64();
        self.dungeon.update(dt);
        self.elapsed += dt;
        if self.config.realtime {
            tokio::time::sleep(self.config.frame).await;
        }
    }

    fn enter(&mut self, round: u32, phase: Phase) {
        self.flush();
        debug!(round, ?phase, "Phase started");
        self.bus.publish(Event::PhaseStarted { round, phase });
    }

    /// Moves the dungeon journal onto the bus.
    fn flush(&mut self) {
        for event in self.dungeon.drain_events() {
            match &event {
                GameEvent::SessionEnded(end) => info!(
                    outcome = ?end.outcome,
                    exp = end.exp_gain,
                    gold = end.gold_gain,
                    "Session ended"
                ),
                other => debug!(event = ?other, "Game event"),
            }
            self.bus.publish(Event::Game(event));
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}
