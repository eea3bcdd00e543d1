// motion/timeline.rs
//
// Travel timelines — each live token gets one, interpolating it from its
// off-screen origin to its off-screen destination over the travel
// duration, with an independent looping cross-axis sway and a looping
// rotation. This module owns live positions; nothing else caches them.
//
// Usage:
//   let mut motion = MotionState::new();
//   motion.attach(&token, &mut rng);   // creation happens-before attach
//   let arrived = motion.tick(dt);     // ids that reached the far edge
//   motion.detach(id);                 // teardown before token discard

use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::TokenId;
use crate::core::rng::Rng;
use crate::input::resolver::PositionOracle;
use crate::tokens::token::Token;

use super::easing::lerp_vec2;

/// Cross-axis sway amplitude in pixels.
const SWAY_AMPLITUDE: f32 = 6.0;
/// Sway frequency range, radians per second.
const SWAY_FREQ_MIN: f32 = 1.2;
const SWAY_FREQ_MAX: f32 = 2.4;

/// One token's animation timeline.
#[derive(Debug, Clone)]
pub struct TravelTimeline {
    origin: Vec2,
    destination: Vec2,
    duration: f32,
    elapsed: f32,
    sway_freq: f32,
    sway_phase: f32,
    rotation: f32,
    rotation_speed: f32,
}

impl TravelTimeline {
    fn new(token: &Token, rng: &mut Rng) -> Self {
        Self {
            origin: token.origin,
            destination: token.destination,
            duration: token.travel_duration.max(f32::EPSILON),
            elapsed: 0.0,
            sway_freq: rng.range_f32(SWAY_FREQ_MIN, SWAY_FREQ_MAX),
            sway_phase: rng.range_f32(0.0, std::f32::consts::TAU),
            rotation: token.rotation,
            rotation_speed: token.rotation_speed,
        }
    }

    /// Normalized travel progress in [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Live position: linear traversal plus a small perpendicular sway.
    pub fn pos(&self) -> Vec2 {
        let base = lerp_vec2(self.origin, self.destination, self.progress());
        let sway = (self.elapsed * self.sway_freq + self.sway_phase).sin() * SWAY_AMPLITUDE;
        let travel = self.destination - self.origin;
        if travel.x.abs() >= travel.y.abs() {
            Vec2::new(base.x, base.y + sway)
        } else {
            Vec2::new(base.x + sway, base.y)
        }
    }

    /// Live rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance by `dt` seconds. Returns true when the destination has
    /// been reached.
    fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.rotation = (self.rotation + self.rotation_speed * dt) % 360.0;
        self.elapsed >= self.duration
    }
}

/// Manages all live timelines, keyed by token id.
#[derive(Debug, Default)]
pub struct MotionState {
    timelines: HashMap<TokenId, TravelTimeline>,
    paused: bool,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a timeline to a freshly created token. The token must
    /// already exist; queries against its id are valid from here on.
    pub fn attach(&mut self, token: &Token, rng: &mut Rng) {
        self.timelines
            .insert(token.id, TravelTimeline::new(token, rng));
    }

    /// Tear down a token's timeline. Must happen before the token is
    /// discarded so no arrival can fire against a recycled id.
    pub fn detach(&mut self, id: TokenId) -> bool {
        self.timelines.remove(&id).is_some()
    }

    /// Freeze all timelines (session pause).
    pub fn pause_all(&mut self) {
        self.paused = true;
    }

    /// Unfreeze all timelines.
    pub fn resume_all(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance all timelines. Returns the ids that reached their
    /// destination this tick; the caller recycles them.
    pub fn tick(&mut self, dt: f32) -> Vec<TokenId> {
        if self.paused {
            return Vec::new();
        }
        let mut arrived = Vec::new();
        for (&id, timeline) in self.timelines.iter_mut() {
            if timeline.tick(dt) {
                arrived.push(id);
            }
        }
        arrived
    }

    /// Live rotation of a token, degrees.
    pub fn rotation_of(&self, id: TokenId) -> Option<f32> {
        self.timelines.get(&id).map(|t| t.rotation())
    }

    /// Travel progress of a token in [0, 1].
    pub fn progress_of(&self, id: TokenId) -> Option<f32> {
        self.timelines.get(&id).map(|t| t.progress())
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Drop every timeline (session teardown/restart).
    pub fn clear(&mut self) {
        self.timelines.clear();
        self.paused = false;
    }
}

impl PositionOracle for MotionState {
    fn live_pos(&self, id: TokenId) -> Option<Vec2> {
        self.timelines.get(&id).map(|t| t.pos())
    }
}
