// session/controller.rs
//
// The composition root: owns the clock, the token manager, the motion
// timelines, input filtering, and the end-of-session computation. The
// host drives it by pushing pointer events and calling tick(dt) once per
// frame, then drains GameEvents and reads the render state back out.

use glam::Vec2;
use serde::Serialize;

use crate::api::tuning::SessionTuning;
use crate::api::types::{
    GameEvent, SoundEvent, TokenId, TokenIdAlloc, EVENT_LEVEL_UP, EVENT_SCORE_COMMITTED,
    EVENT_SESSION_ENDED,
};
use crate::core::rng::Rng;
use crate::effects::EffectsState;
use crate::input::queue::{InputEvent, InputQueue};
use crate::input::resolver::{resolve_tap, PositionOracle, TapFilter};
use crate::motion::timeline::MotionState;
use crate::progression::{level_for_xp, xp_progress, Level, LEVELS};
use crate::tokens::field::TokenField;
use crate::tokens::manager::TokenManager;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for host assets, bounded by a safety timeout.
    Loading,
    Running,
    Paused,
    /// Terminal for this session instance.
    Ended,
}

/// End-of-session outcome surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionSummary {
    pub final_score: u32,
    pub new_total_xp: u32,
    pub new_level: usize,
    pub did_level_up: bool,
}

pub struct SessionController {
    state: SessionState,
    player_level: usize,
    starting_xp: u32,
    tuning: SessionTuning,
    screen: Vec2,

    rng: Rng,
    ids: TokenIdAlloc,
    manager: TokenManager,
    motion: MotionState,
    effects: EffectsState,
    input: InputQueue,
    taps: TapFilter,

    /// Seconds left on the session clock.
    time_remaining: f32,
    /// Time spent waiting in Loading.
    load_elapsed: f32,
    /// Monotonic clock for input debouncing; advances even while paused.
    now: f64,
    /// Guards the terminal commit. Interim (pause) snapshots do not set it.
    score_committed: bool,

    events: Vec<GameEvent>,
    sounds: Vec<SoundEvent>,
    summary: Option<SessionSummary>,
}

impl SessionController {
    /// `player_level` must index the level table; screen dimensions must
    /// be positive. Both are caller contracts, not recoverable errors.
    pub fn new(
        player_level: usize,
        starting_xp: u32,
        screen_w: f32,
        screen_h: f32,
        tuning: SessionTuning,
        seed: u64,
    ) -> Self {
        assert!(
            player_level < LEVELS.len(),
            "player level out of bounds: {}",
            player_level
        );
        assert!(
            screen_w > 0.0 && screen_h > 0.0,
            "screen dimensions must be positive: {}x{}",
            screen_w,
            screen_h
        );
        let manager = TokenManager::new(player_level, tuning.clone());
        let taps = TapFilter::new(tuning.tap_debounce, tuning.tap_debounce_radius);
        let time_remaining = tuning.session_duration;
        Self {
            state: SessionState::Loading,
            player_level,
            starting_xp,
            tuning,
            screen: Vec2::new(screen_w, screen_h),
            rng: Rng::new(seed),
            ids: TokenIdAlloc::new(),
            manager,
            motion: MotionState::new(),
            effects: EffectsState::new(),
            input: InputQueue::new(),
            taps,
            time_remaining,
            load_elapsed: 0.0,
            now: 0.0,
            score_committed: false,
            events: Vec::new(),
            sounds: Vec::new(),
            summary: None,
        }
    }

    /// Host signal that images/sounds are ready. Ignored outside Loading.
    pub fn assets_ready(&mut self) {
        if self.state == SessionState::Loading {
            self.begin_running();
        }
    }

    fn begin_running(&mut self) {
        self.manager.initialize(self.screen.x, self.screen.y);
        self.motion.clear();
        self.state = SessionState::Running;
        log::info!(
            "session running: level {} ({}), {:.0}s on the clock",
            self.player_level,
            LEVELS[self.player_level].name,
            self.tuning.session_duration
        );
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32) {
        self.now += dt as f64;
        match self.state {
            SessionState::Loading => {
                self.input.drain();
                self.load_elapsed += dt;
                if self.load_elapsed >= self.tuning.load_timeout {
                    log::warn!(
                        "asset readiness timed out after {:.1}s; starting anyway",
                        self.load_elapsed
                    );
                    self.begin_running();
                }
            }
            SessionState::Running => {
                // Staged spawns come up before input so a brand-new token
                // is tappable the frame it appears.
                for token in self.manager.tick(dt, &mut self.rng, &mut self.ids) {
                    self.motion.attach(&token, &mut self.rng);
                }

                for event in self.input.drain() {
                    if let Some(p) = self.taps.accept(event, self.now) {
                        self.handle_tap(p);
                    }
                }

                for id in self.motion.tick(dt) {
                    // Timeline down before the token goes away, so the
                    // arrival can never fire against a recycled id.
                    self.motion.detach(id);
                    if let Some(fresh) = self.manager.recycle(id, &mut self.rng, &mut self.ids) {
                        self.motion.attach(&fresh, &mut self.rng);
                    }
                }

                self.effects.tick(dt);

                self.time_remaining -= dt;
                if self.time_remaining <= 0.0 {
                    self.time_remaining = 0.0;
                    self.finish();
                }
            }
            SessionState::Paused | SessionState::Ended => {
                // Taps are dropped, but contact-up events still retire
                // their identifiers so nothing is stuck after resume.
                for event in self.input.drain() {
                    if let InputEvent::PointerUp { .. } = event {
                        let _ = self.taps.accept(event, self.now);
                    }
                }
            }
        }
    }

    fn handle_tap(&mut self, p: Vec2) {
        let Some(id) = resolve_tap(p, self.manager.tokens(), &self.motion, self.tuning.hit_radius)
        else {
            // Wasted tap: too far from everything. Not an error.
            return;
        };
        if let Some(fresh) = self
            .manager
            .collect(id, p, &mut self.rng, &mut self.ids, &mut self.effects)
        {
            self.motion.detach(id);
            self.motion.attach(&fresh, &mut self.rng);
            // Chime step rises with each collection this session.
            self.sounds
                .push(SoundEvent(self.manager.collected_count() - 1));
        }
    }

    /// Freeze the clock and every timeline, committing an interim score
    /// snapshot for the host to display/persist. Score and tokens survive.
    pub fn pause(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        let score = self.manager.score();
        if !self.score_committed {
            self.events.push(GameEvent {
                kind: EVENT_SCORE_COMMITTED,
                a: score as f32,
                b: 1.0,
                c: 0.0,
            });
        }
        self.motion.pause_all();
        self.state = SessionState::Paused;
        log::debug!("paused with interim score {}", score);
    }

    /// Continue a paused session without resetting anything.
    pub fn resume(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        self.motion.resume_all();
        self.state = SessionState::Running;
    }

    /// Explicit quit: same commit path as clock expiry, from any state.
    pub fn end(&mut self) {
        if self.state != SessionState::Ended {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let score = self.manager.score();
        if !self.score_committed {
            self.score_committed = true;
            self.events.push(GameEvent {
                kind: EVENT_SCORE_COMMITTED,
                a: score as f32,
                b: 0.0,
                c: 0.0,
            });
        }
        let new_total_xp = self.starting_xp + score;
        let new_level = level_for_xp(new_total_xp);
        let did_level_up = new_level > self.player_level;
        if did_level_up {
            self.events.push(GameEvent {
                kind: EVENT_LEVEL_UP,
                a: self.player_level as f32,
                b: new_level as f32,
                c: 0.0,
            });
        }
        self.events.push(GameEvent {
            kind: EVENT_SESSION_ENDED,
            a: score as f32,
            b: new_total_xp as f32,
            c: new_level as f32,
        });
        self.summary = Some(SessionSummary {
            final_score: score,
            new_total_xp,
            new_level,
            did_level_up,
        });
        self.motion.pause_all();
        self.state = SessionState::Ended;
        log::info!(
            "session ended: score {}, total xp {}, level {}{}",
            score,
            new_total_xp,
            new_level,
            if did_level_up { " (level up!)" } else { "" }
        );
    }

    /// Discard all session state and go again from Loading with a zeroed
    /// score and a fresh token fill-in.
    pub fn restart(&mut self) {
        let seed = self.rng.next_u64();
        self.rng = Rng::new(seed);
        self.ids = TokenIdAlloc::new();
        self.manager = TokenManager::new(self.player_level, self.tuning.clone());
        self.motion.clear();
        self.effects.clear();
        self.taps.reset();
        self.input.drain();
        self.sounds.clear();
        self.time_remaining = self.tuning.session_duration;
        self.load_elapsed = 0.0;
        self.score_committed = false;
        self.summary = None;
        self.state = SessionState::Loading;
        log::info!("session restarted");
    }

    /// New screen dimensions. Future spawns use them; in-flight timelines
    /// are not repositioned.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.manager.set_screen(width, height);
        self.screen = Vec2::new(width, height);
    }

    /// Push a raw pointer event (called from the host's event handlers).
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Drain events accumulated since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain sound/haptic cues accumulated since the last call.
    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    // -- Read-side accessors for the host --

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.manager.score()
    }

    /// Whole seconds left, for the countdown display.
    pub fn seconds_left(&self) -> u32 {
        self.time_remaining.ceil() as u32
    }

    pub fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.summary
    }

    pub fn tokens(&self) -> &TokenField {
        self.manager.tokens()
    }

    pub fn effects(&self) -> &EffectsState {
        &self.effects
    }

    /// Live animated position of a token, if it has a timeline.
    pub fn token_pos(&self, id: TokenId) -> Option<Vec2> {
        self.motion.live_pos(id)
    }

    /// Live rotation of a token, degrees.
    pub fn token_rotation(&self, id: TokenId) -> Option<f32> {
        self.motion.rotation_of(id)
    }

    /// The level theme this session runs under.
    pub fn level(&self) -> &'static Level {
        &LEVELS[self.player_level]
    }

    pub fn player_level(&self) -> usize {
        self.player_level
    }

    /// Progress toward the next level if the session ended right now.
    pub fn xp_progress_live(&self) -> f32 {
        xp_progress(self.player_level, self.starting_xp + self.manager.score())
    }
}
