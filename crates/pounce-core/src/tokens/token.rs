use glam::Vec2;

use crate::api::types::TokenId;
use crate::progression::{Color, TokenKind};

/// A single on-screen collectible. Positionally immutable after creation:
/// the motion timelines own where it *is*, the token only records where it
/// was told to go and how fast.
#[derive(Debug, Clone)]
pub struct Token {
    /// Unique identifier.
    pub id: TokenId,
    /// Shape/kind, fixes points and travel behavior.
    pub kind: TokenKind,
    /// Tint from the level palette.
    pub color: Color,
    /// Off-screen spawn point on the lane's entry edge.
    pub origin: Vec2,
    /// Off-screen exit point past the opposite edge.
    pub destination: Vec2,
    /// Seconds from origin to destination.
    pub travel_duration: f32,
    /// Render scale multiplier.
    pub scale: f32,
    /// Initial rotation, degrees.
    pub rotation: f32,
    /// Rotation rate, degrees per second. Zero for directional shapes.
    pub rotation_speed: f32,
    /// Which lane this token occupies; its replacement reuses it.
    pub lane: usize,
    /// True until the first manager tick after creation (fade-in hint for
    /// the host).
    pub spawning: bool,
}

impl Token {
    pub fn new(id: TokenId, kind: TokenKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            origin: Vec2::ZERO,
            destination: Vec2::ZERO,
            travel_duration: 1.0,
            scale: 1.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            lane: 0,
            spawning: true,
        }
    }

    // -- Builder pattern --

    pub fn with_travel(mut self, origin: Vec2, destination: Vec2, duration: f32) -> Self {
        self.origin = origin;
        self.destination = destination;
        self.travel_duration = duration;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32, speed: f32) -> Self {
        self.rotation = rotation;
        self.rotation_speed = speed;
        self
    }

    pub fn with_lane(mut self, lane: usize) -> Self {
        self.lane = lane;
        self
    }
}
