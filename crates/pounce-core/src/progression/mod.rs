// progression/mod.rs
//
// Pure data and lookups: XP thresholds, per-level visual theme, token
// palettes, point values. No state, no side effects.

use serde::{Deserialize, Serialize};

/// An sRGB color, formatted as `#rrggbb` for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Background particle style the host renders behind a level's theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientParticle {
    Sparkle,
    Glow,
    Star,
}

/// Which way a token travels across the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left edge to right edge.
    Horizontal,
    /// Top edge to bottom edge.
    Vertical,
}

/// The collectible shapes. Each kind has a fixed point value, a travel
/// axis, and a speed class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Fish,
    Star,
    Paw,
    Cloud,
    Sparkle,
    Bowl,
    Treat,
    Orb,
    Leaf,
    Butterfly,
    Flower,
    Moon,
    Comet,
    Nebula,
    Glowfish,
}

impl TokenKind {
    pub const ALL: [TokenKind; 15] = [
        TokenKind::Fish,
        TokenKind::Star,
        TokenKind::Paw,
        TokenKind::Cloud,
        TokenKind::Sparkle,
        TokenKind::Bowl,
        TokenKind::Treat,
        TokenKind::Orb,
        TokenKind::Leaf,
        TokenKind::Butterfly,
        TokenKind::Flower,
        TokenKind::Moon,
        TokenKind::Comet,
        TokenKind::Nebula,
        TokenKind::Glowfish,
    ];

    /// Points awarded for collecting a token of this kind.
    pub fn points(self) -> u32 {
        match self {
            TokenKind::Fish => 1,
            TokenKind::Star => 2,
            TokenKind::Paw => 3,
            _ => 1,
        }
    }

    /// Pre-classified travel axis. Shapes that read as "swimming/flying"
    /// cross the screen, everything else drifts down.
    pub fn axis(self) -> Axis {
        match self {
            TokenKind::Fish
            | TokenKind::Glowfish
            | TokenKind::Butterfly
            | TokenKind::Comet
            | TokenKind::Nebula => Axis::Horizontal,
            _ => Axis::Vertical,
        }
    }

    /// Directional silhouettes must not spin; an upside-down fish reads
    /// as a bug.
    pub fn is_directional(self) -> bool {
        matches!(self, TokenKind::Fish | TokenKind::Glowfish | TokenKind::Cloud)
    }

    /// Travel duration range in seconds: ambient shapes drift slowly,
    /// active shapes move.
    pub fn travel_duration_range(self) -> (f32, f32) {
        match self {
            TokenKind::Cloud => (10.0, 15.0),
            TokenKind::Leaf => (8.0, 12.0),
            _ => (6.0, 10.0),
        }
    }
}

/// One entry of the static level table.
#[derive(Debug, Clone)]
pub struct Level {
    pub name: &'static str,
    /// Total XP required to unlock this level.
    pub xp_required: u32,
    /// Background gradient stops.
    pub background: [Color; 3],
    /// Token kinds that may spawn at this level.
    pub token_kinds: &'static [TokenKind],
    /// Token tint palette.
    pub token_colors: &'static [Color],
    /// Background particle style.
    pub ambient: AmbientParticle,
    /// HUD accents.
    pub primary: Color,
    pub secondary: Color,
}

/// The level table. Invariant: thresholds strictly increasing, level 0
/// always unlocked.
pub static LEVELS: [Level; 5] = [
    Level {
        name: "Soft Sky",
        xp_required: 0,
        background: [
            Color::rgb(0x2d, 0x1b, 0x69),
            Color::rgb(0x1a, 0x10, 0x40),
            Color::rgb(0x3b, 0x2d, 0x80),
        ],
        token_kinds: &[TokenKind::Fish, TokenKind::Star, TokenKind::Paw],
        token_colors: &[
            Color::rgb(0xc4, 0xb5, 0xfd),
            Color::rgb(0xa7, 0x8b, 0xfa),
            Color::rgb(0x7d, 0xd3, 0xfc),
            Color::rgb(0xe0, 0xe7, 0xff),
        ],
        ambient: AmbientParticle::Sparkle,
        primary: Color::rgb(0xc4, 0xb5, 0xfd),
        secondary: Color::rgb(0x7d, 0xd3, 0xfc),
    },
    Level {
        name: "Cozy Bowl World",
        xp_required: 200,
        background: [
            Color::rgb(0x7c, 0x2d, 0x12),
            Color::rgb(0x45, 0x1a, 0x03),
            Color::rgb(0xc2, 0x41, 0x0c),
        ],
        token_kinds: &[
            TokenKind::Fish,
            TokenKind::Star,
            TokenKind::Paw,
            TokenKind::Bowl,
            TokenKind::Treat,
        ],
        token_colors: &[
            Color::rgb(0xfd, 0xba, 0x74),
            Color::rgb(0xfb, 0x92, 0x3c),
            Color::rgb(0xfb, 0xbf, 0x24),
            Color::rgb(0xfd, 0xe6, 0x8a),
        ],
        ambient: AmbientParticle::Glow,
        primary: Color::rgb(0xfd, 0xba, 0x74),
        secondary: Color::rgb(0xfb, 0xbf, 0x24),
    },
    Level {
        name: "Starry Dream",
        xp_required: 600,
        background: [
            Color::rgb(0x0f, 0x17, 0x2a),
            Color::rgb(0x02, 0x06, 0x17),
            Color::rgb(0x1e, 0x1b, 0x4b),
        ],
        token_kinds: &[
            TokenKind::Fish,
            TokenKind::Star,
            TokenKind::Paw,
            TokenKind::Moon,
            TokenKind::Comet,
            TokenKind::Sparkle,
        ],
        token_colors: &[
            Color::rgb(0xc4, 0xb5, 0xfd),
            Color::rgb(0x67, 0xe8, 0xf9),
            Color::rgb(0xfd, 0xe6, 0x8a),
            Color::rgb(0xa5, 0xf3, 0xfc),
        ],
        ambient: AmbientParticle::Star,
        primary: Color::rgb(0xc4, 0xb5, 0xfd),
        secondary: Color::rgb(0x67, 0xe8, 0xf9),
    },
    Level {
        name: "Garden Glow",
        xp_required: 1400,
        background: [
            Color::rgb(0x06, 0x4e, 0x3b),
            Color::rgb(0x02, 0x2c, 0x22),
            Color::rgb(0x06, 0x5f, 0x46),
        ],
        token_kinds: &[
            TokenKind::Fish,
            TokenKind::Star,
            TokenKind::Paw,
            TokenKind::Leaf,
            TokenKind::Flower,
            TokenKind::Butterfly,
        ],
        token_colors: &[
            Color::rgb(0x6e, 0xe7, 0xb7),
            Color::rgb(0xa7, 0xf3, 0xd0),
            Color::rgb(0xfd, 0xe6, 0x8a),
            Color::rgb(0xfb, 0xcf, 0xe8),
        ],
        ambient: AmbientParticle::Sparkle,
        primary: Color::rgb(0x6e, 0xe7, 0xb7),
        secondary: Color::rgb(0xa7, 0xf3, 0xd0),
    },
    Level {
        name: "Aurora Drift",
        xp_required: 2800,
        background: [
            Color::rgb(0x1e, 0x1b, 0x4b),
            Color::rgb(0x31, 0x2e, 0x81),
            Color::rgb(0x4c, 0x1d, 0x95),
        ],
        token_kinds: &[
            TokenKind::Fish,
            TokenKind::Star,
            TokenKind::Paw,
            TokenKind::Orb,
            TokenKind::Cloud,
            TokenKind::Nebula,
            TokenKind::Glowfish,
        ],
        token_colors: &[
            Color::rgb(0xc0, 0x84, 0xfc),
            Color::rgb(0xa7, 0x8b, 0xfa),
            Color::rgb(0x67, 0xe8, 0xf9),
            Color::rgb(0xf0, 0xab, 0xfc),
        ],
        ambient: AmbientParticle::Star,
        primary: Color::rgb(0xc0, 0x84, 0xfc),
        secondary: Color::rgb(0x67, 0xe8, 0xf9),
    },
];

/// Greatest level index whose threshold is at or below `xp`.
pub fn level_for_xp(xp: u32) -> usize {
    for i in (0..LEVELS.len()).rev() {
        if xp >= LEVELS[i].xp_required {
            return i;
        }
    }
    0
}

/// XP needed for the next level, or `None` at max level.
/// A `level` outside the table is a caller bug.
pub fn next_threshold(level: usize) -> Option<u32> {
    assert!(level < LEVELS.len(), "level index out of bounds: {}", level);
    if level + 1 >= LEVELS.len() {
        None
    } else {
        Some(LEVELS[level + 1].xp_required)
    }
}

/// Progress from this level's threshold toward the next, clamped to [0, 1].
/// 1.0 at max level.
pub fn xp_progress(level: usize, xp: u32) -> f32 {
    match next_threshold(level) {
        None => 1.0,
        Some(next) => {
            let base = LEVELS[level].xp_required;
            let span = (next - base) as f32;
            let gained = xp.saturating_sub(base) as f32;
            (gained / span).clamp(0.0, 1.0)
        }
    }
}
