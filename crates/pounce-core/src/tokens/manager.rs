// tokens/manager.rs
//
// Owns the live token set: staged session fill-in, spawn lane/type
// selection, recycling, and collection with its re-entrancy guards.
// Never moves a token after creation — that belongs to motion.

use glam::Vec2;

use crate::api::tuning::SessionTuning;
use crate::api::types::{TokenId, TokenIdAlloc};
use crate::core::rng::Rng;
use crate::effects::EffectsState;
use crate::progression::{Axis, TokenKind, LEVELS};

use super::field::TokenField;
use super::token::Token;

/// Rotation rate range for non-directional shapes, degrees per second.
const SPIN_MAX: f32 = 6.0;
/// Render scale range.
const SCALE_MIN: f32 = 1.0;
const SCALE_MAX: f32 = 1.3;

#[derive(Debug)]
struct StagedSpawn {
    lane: usize,
    delay: f32,
}

pub struct TokenManager {
    level: usize,
    tuning: SessionTuning,
    field: TokenField,
    staged: Vec<StagedSpawn>,
    score: u32,
    collected: u32,
    screen: Vec2,
    /// Collection-in-flight lock, decayed on the session clock so a stuck
    /// animation frame can never leave taps dead for longer than this.
    collect_lock: f32,
    last_collected: Option<TokenId>,
}

impl TokenManager {
    /// `level` must index the level table; `tuning.token_count` must be
    /// even and at least 2 so the lanes split across both axes. JSON-fed
    /// tuning is validated at parse time, so tripping this is a caller bug.
    pub fn new(level: usize, tuning: SessionTuning) -> Self {
        assert!(level < LEVELS.len(), "level index out of bounds: {}", level);
        assert!(
            tuning.token_count >= 2 && tuning.token_count % 2 == 0,
            "token_count must be an even number of at least 2, got {}",
            tuning.token_count
        );
        Self {
            level,
            tuning,
            field: TokenField::new(),
            staged: Vec::new(),
            score: 0,
            collected: 0,
            screen: Vec2::ZERO,
            collect_lock: 0.0,
            last_collected: None,
        }
    }

    /// Clear the field and stage the full token set, staggering each
    /// appearance so the scene fills in progressively instead of
    /// presenting a wall of targets.
    pub fn initialize(&mut self, width: f32, height: f32) {
        assert!(
            width > 0.0 && height > 0.0,
            "screen dimensions must be positive: {}x{}",
            width,
            height
        );
        self.screen = Vec2::new(width, height);
        self.field.clear();
        self.staged = (0..self.tuning.token_count)
            .map(|lane| StagedSpawn {
                lane,
                delay: lane as f32 * self.tuning.spawn_stagger,
            })
            .collect();
        self.collect_lock = 0.0;
        self.last_collected = None;
    }

    /// Latest known screen size, consulted by future spawns only;
    /// in-flight tokens are not repositioned.
    pub fn set_screen(&mut self, width: f32, height: f32) {
        assert!(
            width > 0.0 && height > 0.0,
            "screen dimensions must be positive: {}x{}",
            width,
            height
        );
        self.screen = Vec2::new(width, height);
    }

    /// Advance stagger timers and the collection lock. Returns tokens
    /// spawned this tick, for the caller to animate.
    pub fn tick(&mut self, dt: f32, rng: &mut Rng, ids: &mut TokenIdAlloc) -> Vec<Token> {
        // Anything that survived a full tick is no longer fading in.
        for token in self.field.iter_mut() {
            token.spawning = false;
        }

        if self.collect_lock > 0.0 {
            self.collect_lock -= dt;
            if self.collect_lock <= 0.0 {
                self.collect_lock = 0.0;
                self.last_collected = None;
            }
        }

        let mut spawned = Vec::new();
        for staged in self.staged.iter_mut() {
            staged.delay -= dt;
        }
        // Drain due entries, keeping the rest staged.
        let due: Vec<usize> = self
            .staged
            .iter()
            .filter(|s| s.delay <= 0.0)
            .map(|s| s.lane)
            .collect();
        self.staged.retain(|s| s.delay > 0.0);
        for lane in due {
            let token = self.spawn_token(lane, rng, ids);
            self.field.insert(token.clone());
            spawned.push(token);
        }
        spawned
    }

    /// Replace the token at `id`'s lane with a fresh spawn in the same
    /// lane. Called on untapped arrival and on collection. Unknown ids are
    /// an expected race (tap vs. arrival) and a silent no-op.
    pub fn recycle(
        &mut self,
        id: TokenId,
        rng: &mut Rng,
        ids: &mut TokenIdAlloc,
    ) -> Option<Token> {
        let lane = self.field.get(id)?.lane;
        let fresh = self.spawn_token(lane, rng, ids);
        self.field.replace(id, fresh.clone());
        Some(fresh)
    }

    /// Collect a token: award its points, enqueue feedback effects at the
    /// raw tap position, and recycle it. Guarded against duplicate
    /// delivery of a single physical tap; guarded calls return `None`.
    /// On success returns the replacement token, for the caller to animate.
    pub fn collect(
        &mut self,
        id: TokenId,
        tap: Vec2,
        rng: &mut Rng,
        ids: &mut TokenIdAlloc,
        effects: &mut EffectsState,
    ) -> Option<Token> {
        if self.collect_lock > 0.0 {
            return None;
        }
        if self.last_collected == Some(id) {
            return None;
        }
        let token = self.field.get(id)?;
        let points = token.kind.points();
        let color = token.color;
        let lane = token.lane;

        self.collect_lock = self.tuning.collect_lock;
        self.last_collected = Some(id);
        self.score += points;
        self.collected += 1;
        effects.ripple(tap, color);
        effects.popup(tap, points, color);
        log::debug!("collected {:?} for {} points (score {})", id, points, self.score);

        let fresh = self.spawn_token(lane, rng, ids);
        self.field.replace(id, fresh.clone());
        Some(fresh)
    }

    /// Create a token for `lane`. Kind selection: the level palette
    /// restricted to the lane's axis (fallback: full palette), minus the
    /// kinds currently visible (fallback: the axis pool), so concurrent
    /// tokens stay visually distinct whenever the palette allows it.
    fn spawn_token(&mut self, lane: usize, rng: &mut Rng, ids: &mut TokenIdAlloc) -> Token {
        let level = &LEVELS[self.level];
        let half = self.tuning.lanes_per_axis();
        let axis = if lane < half {
            Axis::Horizontal
        } else {
            Axis::Vertical
        };

        let axis_pool: Vec<TokenKind> = level
            .token_kinds
            .iter()
            .copied()
            .filter(|k| k.axis() == axis)
            .collect();
        let pool = if axis_pool.is_empty() {
            level.token_kinds.to_vec()
        } else {
            axis_pool
        };
        let visible = self.field.kinds_in_play();
        let unseen: Vec<TokenKind> = pool
            .iter()
            .copied()
            .filter(|k| !visible.contains(k))
            .collect();
        let kind = if unseen.is_empty() {
            *rng.pick(&pool)
        } else {
            *rng.pick(&unseen)
        };
        let color = *rng.pick(level.token_colors);

        let size = self.tuning.token_size;
        let pad = size * 0.15;
        let (origin, destination) = match axis {
            Axis::Horizontal => {
                let strip = self.screen.y / half as f32;
                let slot = lane % half;
                let y = Self::place_in_strip(slot as f32 * strip, strip, size, pad, rng);
                (
                    Vec2::new(-size, y),
                    Vec2::new(self.screen.x + size, y),
                )
            }
            Axis::Vertical => {
                let strip = self.screen.x / half as f32;
                let slot = (lane - half) % half;
                let x = Self::place_in_strip(slot as f32 * strip, strip, size, pad, rng);
                (
                    Vec2::new(x, -size),
                    Vec2::new(x, self.screen.y + size),
                )
            }
        };

        let (dur_min, dur_max) = kind.travel_duration_range();
        let (rotation, spin) = if kind.is_directional() {
            (0.0, 0.0)
        } else {
            (rng.range_f32(0.0, 360.0), rng.range_f32(-SPIN_MAX, SPIN_MAX))
        };

        Token::new(ids.next(), kind, color)
            .with_travel(origin, destination, rng.range_f32(dur_min, dur_max))
            .with_scale(rng.range_f32(SCALE_MIN, SCALE_MAX))
            .with_rotation(rotation, spin)
            .with_lane(lane)
    }

    /// Random center coordinate inside a lane strip, padded so two tokens
    /// in adjacent strips cannot overlap at spawn. Falls back to the strip
    /// center on screens too narrow for the padding.
    fn place_in_strip(start: f32, strip: f32, size: f32, pad: f32, rng: &mut Rng) -> f32 {
        let lo = start + pad + size / 2.0;
        let hi = start + strip - pad - size / 2.0;
        if hi <= lo {
            start + strip / 2.0
        } else {
            rng.range_f32(lo, hi)
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Successful collections this session; drives the rising chime.
    pub fn collected_count(&self) -> u32 {
        self.collected
    }

    pub fn tokens(&self) -> &TokenField {
        &self.field
    }

    /// Spawns still waiting on their stagger delay.
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    pub fn collect_locked(&self) -> bool {
        self.collect_lock > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_at(level: usize) -> (TokenManager, Rng, TokenIdAlloc) {
        let mut m = TokenManager::new(level, SessionTuning::default());
        m.initialize(800.0, 600.0);
        (m, Rng::new(42), TokenIdAlloc::new())
    }

    fn fill(m: &mut TokenManager, rng: &mut Rng, ids: &mut TokenIdAlloc) {
        // Past the last stagger delay in one step.
        m.tick(10.0, rng, ids);
    }

    #[test]
    fn staggered_fill_reaches_full_count() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        assert_eq!(m.tokens().len(), 0);
        let first = m.tick(0.0, &mut rng, &mut ids);
        assert_eq!(first.len(), 1, "only lane 0 is due at t=0");
        m.tick(0.4, &mut rng, &mut ids);
        assert_eq!(m.tokens().len(), 2);
        fill(&mut m, &mut rng, &mut ids);
        assert_eq!(m.tokens().len(), 6);
        assert_eq!(m.staged_count(), 0);
    }

    #[test]
    fn lanes_split_between_axes() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let horizontal = m.tokens().iter().filter(|t| t.origin.x < 0.0).count();
        let vertical = m.tokens().iter().filter(|t| t.origin.y < 0.0).count();
        assert_eq!(horizontal, 3);
        assert_eq!(vertical, 3);
    }

    #[test]
    fn spawns_start_off_screen_and_exit_off_screen() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        for t in m.tokens().iter() {
            let off_origin = t.origin.x < 0.0 || t.origin.y < 0.0;
            let off_dest = t.destination.x > 800.0 || t.destination.y > 600.0;
            assert!(off_origin && off_dest, "token travels on-screen only: {:?}", t);
        }
    }

    #[test]
    fn rich_palette_spawns_unique_kinds() {
        // Aurora Drift has at least three kinds per axis.
        let (mut m, mut rng, mut ids) = manager_at(4);
        fill(&mut m, &mut rng, &mut ids);
        let kinds = m.tokens().kinds_in_play();
        let mut unique = kinds.clone();
        unique.sort_by_key(|k| *k as usize);
        unique.dedup();
        assert_eq!(kinds.len(), unique.len(), "duplicate kinds: {:?}", kinds);
    }

    #[test]
    fn directional_kinds_do_not_spin() {
        let (mut m, mut rng, mut ids) = manager_at(4);
        fill(&mut m, &mut rng, &mut ids);
        for t in m.tokens().iter() {
            if t.kind.is_directional() {
                assert_eq!(t.rotation, 0.0);
                assert_eq!(t.rotation_speed, 0.0);
            }
        }
    }

    #[test]
    fn collect_awards_points_and_replaces_in_lane() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let mut effects = EffectsState::new();

        let target = m.tokens().iter().next().unwrap().clone();
        let fresh = m
            .collect(target.id, Vec2::new(100.0, 100.0), &mut rng, &mut ids, &mut effects)
            .expect("collect should succeed");
        assert_eq!(m.score(), target.kind.points());
        assert_eq!(fresh.lane, target.lane);
        assert!(!m.tokens().contains(target.id));
        assert!(m.tokens().contains(fresh.id));
        assert_eq!(m.tokens().len(), 6);
        assert_eq!(effects.ripples().len(), 1);
        assert_eq!(effects.popups().len(), 1);
        assert_eq!(effects.popups()[0].points, target.kind.points());
    }

    #[test]
    fn collect_is_guarded_within_lock_window() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let mut effects = EffectsState::new();

        let first = m.tokens().iter().next().unwrap().id;
        assert!(m.collect(first, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_some());
        let score = m.score();

        // Duplicate delivery of the same physical tap: old id and any
        // other id are both rejected while the lock is held.
        assert!(m.collect(first, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_none());
        let other = m.tokens().iter().next().unwrap().id;
        assert!(m.collect(other, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_none());
        assert_eq!(m.score(), score);

        // Lock decays on the clock.
        m.tick(0.3, &mut rng, &mut ids);
        assert!(!m.collect_locked());
        let next = m.tokens().iter().next().unwrap().id;
        assert!(m.collect(next, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_some());
        assert!(m.score() > score);
    }

    #[test]
    fn collected_count_skips_guarded_attempts() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let mut effects = EffectsState::new();

        let first = m.tokens().iter().next().unwrap().id;
        assert!(m.collect(first, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_some());
        assert_eq!(m.collected_count(), 1);
        // Guarded duplicate: counter unchanged.
        assert!(m.collect(first, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_none());
        assert_eq!(m.collected_count(), 1);

        m.tick(0.3, &mut rng, &mut ids);
        let next = m.tokens().iter().next().unwrap().id;
        assert!(m.collect(next, Vec2::ZERO, &mut rng, &mut ids, &mut effects).is_some());
        assert_eq!(m.collected_count(), 2);
    }

    #[test]
    fn collect_unknown_id_is_silent() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let mut effects = EffectsState::new();
        assert!(m
            .collect(TokenId(9999), Vec2::ZERO, &mut rng, &mut ids, &mut effects)
            .is_none());
        assert_eq!(m.score(), 0);
    }

    #[test]
    fn recycle_reuses_lane_and_keeps_count() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        fill(&mut m, &mut rng, &mut ids);
        let target = m.tokens().iter().next().unwrap().clone();
        let fresh = m.recycle(target.id, &mut rng, &mut ids).unwrap();
        assert_eq!(fresh.lane, target.lane);
        assert_eq!(m.tokens().len(), 6);
        assert!(m.recycle(target.id, &mut rng, &mut ids).is_none());
    }

    #[test]
    fn spawning_flag_clears_after_a_tick() {
        let (mut m, mut rng, mut ids) = manager_at(0);
        let first = m.tick(0.0, &mut rng, &mut ids);
        assert!(first[0].spawning);
        m.tick(0.1, &mut rng, &mut ids);
        assert!(!m.tokens().iter().next().unwrap().spawning);
    }

    #[test]
    #[should_panic]
    fn zero_screen_is_a_caller_bug() {
        let mut m = TokenManager::new(0, SessionTuning::default());
        m.initialize(0.0, 600.0);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_level_is_a_caller_bug() {
        let _ = TokenManager::new(99, SessionTuning::default());
    }

    #[test]
    #[should_panic]
    fn token_count_without_lane_split_is_a_caller_bug() {
        let mut tuning = SessionTuning::default();
        tuning.token_count = 1;
        let _ = TokenManager::new(0, tuning);
    }
}
