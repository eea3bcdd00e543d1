// input/resolver.rs
//
// Turns raw pointer events into deduplicated collection attempts and
// resolves each attempt against the tokens' live animated positions.

use std::collections::HashSet;

use glam::Vec2;

use crate::api::types::TokenId;
use crate::tokens::field::TokenField;

use super::queue::InputEvent;

/// Live position query for a token's on-screen element. Positions are
/// owned by the animation timelines, so hit-testing must ask them rather
/// than trust any coordinate cached at spawn time.
pub trait PositionOracle {
    fn live_pos(&self, id: TokenId) -> Option<Vec2>;
}

/// Stateful duplicate-tap filter.
///
/// Two independent layers, matching the quirks of real touch hardware:
/// contact identifiers already dispatched within their down→up window are
/// ignored, and an attempt landing within a short time window *and* a
/// small radius of the previously accepted attempt is dropped even if it
/// carries a fresh identifier (some devices fan a single physical tap out
/// into several synthetic events).
#[derive(Debug)]
pub struct TapFilter {
    live_contacts: HashSet<u32>,
    last_accepted: Option<(Vec2, f64)>,
    debounce: f32,
    debounce_radius: f32,
}

impl TapFilter {
    pub fn new(debounce: f32, debounce_radius: f32) -> Self {
        Self {
            live_contacts: HashSet::new(),
            last_accepted: None,
            debounce,
            debounce_radius,
        }
    }

    /// Feed one raw event at clock time `now` (seconds). Returns the tap
    /// position when the event is an accepted collection attempt.
    pub fn accept(&mut self, event: InputEvent, now: f64) -> Option<Vec2> {
        match event {
            InputEvent::PointerDown { pointer_id, x, y } => {
                if !self.live_contacts.insert(pointer_id) {
                    // Repeat of a contact we already dispatched.
                    return None;
                }
                let p = Vec2::new(x, y);
                if let Some((last_p, last_t)) = self.last_accepted {
                    let close_in_time = now - last_t < self.debounce as f64;
                    let close_in_space = last_p.distance(p) < self.debounce_radius;
                    if close_in_time && close_in_space {
                        return None;
                    }
                }
                self.last_accepted = Some((p, now));
                Some(p)
            }
            InputEvent::PointerUp { pointer_id } => {
                self.live_contacts.remove(&pointer_id);
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.live_contacts.clear();
        self.last_accepted = None;
    }
}

/// Nearest token to `p` by live position, within `hit_radius`. Ties break
/// toward the earlier token in field order (stable, deterministic).
/// Returns `None` for a wasted tap.
pub fn resolve_tap(
    p: Vec2,
    tokens: &TokenField,
    oracle: &impl PositionOracle,
    hit_radius: f32,
) -> Option<TokenId> {
    let mut best: Option<(TokenId, f32)> = None;
    for token in tokens.iter() {
        let Some(pos) = oracle.live_pos(token.id) else {
            // Staged but not yet animated; not tappable.
            continue;
        };
        let d = pos.distance(p);
        if d <= hit_radius && best.map_or(true, |(_, bd)| d < bd) {
            best = Some((token.id, d));
        }
    }
    best.map(|(id, _)| id)
}
