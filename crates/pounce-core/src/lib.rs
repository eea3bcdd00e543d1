pub mod api;
pub mod core;
pub mod progression;
pub mod tokens;
pub mod motion;
pub mod input;
pub mod effects;
pub mod session;

// Re-export key types at crate root for convenience
pub use api::types::{TokenId, TokenIdAlloc, GameEvent, SoundEvent};
pub use api::types::{EVENT_SCORE_COMMITTED, EVENT_SESSION_ENDED, EVENT_LEVEL_UP};
pub use api::tuning::SessionTuning;
pub use crate::core::rng::Rng;
pub use progression::{AmbientParticle, Axis, Color, Level, TokenKind, LEVELS};
pub use progression::{level_for_xp, next_threshold, xp_progress};
pub use tokens::token::Token;
pub use tokens::field::TokenField;
pub use tokens::manager::TokenManager;
pub use motion::{Easing, ease, ease_vec2, lerp, lerp_vec2};
pub use motion::timeline::MotionState;
pub use input::queue::{InputEvent, InputQueue};
pub use input::resolver::{resolve_tap, PositionOracle, TapFilter};
pub use effects::{EffectId, EffectsState, PointPopup, Ripple};
pub use session::controller::{SessionController, SessionState, SessionSummary};
