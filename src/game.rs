//! Game controller
//!
//! Owns the simulation state, the security session and the cached profile.
//! The host queues input, calls [`Game::frame`] once per simulation step and
//! hands the final score to [`Game::finish_run`] when a run ends.

use serde::Serialize;

use crate::persistence::{ProfileCache, ScoreService};
use crate::security::{GameSession, SessionInfo, TamperSignal};
use crate::settings::Settings;
use crate::sim::{
    Command, Field, GameEvent, GamePhase, GameState, Obstacle, Particle, PlayerBody, TickInput,
    tick,
};
use crate::submit::{SubmitOutcome, submit_score};
use crate::tuning::Tuning;
use crate::validator::RejectReason;

/// Summary handed to the host after a run is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverReport {
    pub final_score: u32,
    pub high_score: u32,
    pub is_new_record: bool,
    /// Stored by the score service (false when offline, rejected or signed out)
    pub synced: bool,
    pub rejection: Option<RejectReason>,
}

impl GameOverReport {
    fn new(final_score: u32, outcome: &SubmitOutcome) -> Self {
        Self {
            final_score,
            high_score: outcome.high_score(),
            is_new_record: outcome.is_new_record(),
            synced: outcome.synced(),
            rejection: outcome.rejection(),
        }
    }
}

/// Host-side listener for game notifications
pub trait GameObserver {
    fn score_changed(&mut self, score: u32);
    fn game_over(&mut self, report: &GameOverReport);
    fn paused(&mut self, _paused: bool) {}
}

/// Read-only view of one frame for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub score: u32,
    pub high_score: u32,
    pub frame: u64,
    pub phase: GamePhase,
    pub field: Field,
    pub player: &'a PlayerBody,
    pub obstacles: &'a [Obstacle],
    pub particles: &'a [Particle],
    pub dark_mode: bool,
}

pub struct Game {
    pub state: GameState,
    pub session: GameSession,
    pub cache: ProfileCache,
    /// Demo mode: the simulation steers the player
    pub autopilot: bool,
    pending: Vec<Command>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64, field: Field, tuning: Tuning, cache: ProfileCache) -> Self {
        Self {
            state: GameState::new(seed, field, tuning),
            session: GameSession::default(),
            cache,
            autopilot: false,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Start the security session. Called once at sign-in, not per run.
    pub fn begin_session(&mut self, now: f64) {
        self.session = GameSession::begin(now);
        log::info!("Game session started");
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.state.max_particles = settings.max_particles();
        self.state.particles.truncate(self.state.max_particles);
    }

    /// Begin a fresh run. Hosts call this for the first run and for
    /// "play again"; called mid-run it is a full reset that discards the
    /// current run without submitting it. The security session is kept.
    pub fn start(&mut self) {
        self.pending.clear();
        self.state.start();
    }

    pub fn jump(&mut self) {
        self.pending.push(Command::Jump);
    }

    pub fn duck(&mut self, engage: bool) {
        self.pending.push(Command::Duck(engage));
    }

    pub fn toggle_pause(&mut self) {
        self.pending.push(Command::TogglePause);
    }

    /// Pause without toggling, for focus loss where several events may fire
    pub fn pause(&mut self) {
        self.pending.push(Command::Pause);
    }

    /// Report a tamper signal from the host's detection
    pub fn observe_tamper(&mut self, signal: TamperSignal) {
        self.session.observe(signal);
    }

    pub fn session_info(&self, now: f64) -> SessionInfo {
        self.session.info(now)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn high_score(&self) -> u32 {
        self.cache.high_score()
    }

    /// Run one simulation step with the queued commands.
    /// Returns the final score if the run ended during this step.
    pub fn frame(&mut self, observer: &mut dyn GameObserver) -> Option<u32> {
        let input = TickInput {
            commands: std::mem::take(&mut self.pending),
            autopilot: self.autopilot,
        };
        self.events.clear();
        tick(&mut self.state, &input, &mut self.events);

        let mut finished = None;
        for event in self.events.drain(..) {
            match event {
                GameEvent::ScoreChanged(score) => observer.score_changed(score),
                GameEvent::Paused => observer.paused(true),
                GameEvent::Resumed => observer.paused(false),
                GameEvent::Collision { score } => finished = Some(score),
            }
        }
        finished
    }

    /// Submit a finished run and notify the observer
    pub fn finish_run(
        &mut self,
        final_score: u32,
        service: &mut dyn ScoreService,
        now: f64,
        observer: &mut dyn GameObserver,
    ) -> GameOverReport {
        let user_id = self
            .cache
            .user_id()
            .filter(|id| !id.is_empty())
            .map(str::to_owned);
        let outcome = submit_score(
            &mut self.session,
            service,
            &mut self.cache,
            user_id.as_deref(),
            final_score,
            now,
        );
        let report = GameOverReport::new(final_score, &outcome);
        log::info!("Game over: {report:?}");
        observer.game_over(&report);
        report
    }

    pub fn snapshot(&self, dark_mode: bool) -> FrameSnapshot<'_> {
        FrameSnapshot {
            score: self.state.score(),
            high_score: self.cache.high_score(),
            frame: self.state.difficulty.frame_count,
            phase: self.state.phase,
            field: self.state.field,
            player: &self.state.player,
            obstacles: &self.state.obstacles,
            particles: &self.state.particles,
            dark_mode,
        }
    }
}
