// effects/mod.rs
//
// Fire-and-forget tap feedback: ripples and point popups. Each effect
// carries its own age and expires on its own; none of this is game state.

use glam::Vec2;

use crate::progression::Color;

/// Unique identifier for a live effect (host-side keying).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId(pub u32);

/// An expanding ring at the tap point.
#[derive(Debug, Clone)]
pub struct Ripple {
    pub id: EffectId,
    pub pos: Vec2,
    pub color: Color,
    pub age: f32,
}

impl Ripple {
    pub const LIFETIME: f32 = 0.5;
    const RADIUS_START: f32 = 10.0;
    const RADIUS_END: f32 = 80.0;

    fn t(&self) -> f32 {
        (self.age / Self::LIFETIME).clamp(0.0, 1.0)
    }

    /// Current ring radius, eased outward.
    pub fn radius(&self) -> f32 {
        use crate::motion::{ease, Easing};
        ease(Self::RADIUS_START, Self::RADIUS_END, self.t(), Easing::QuadOut)
    }

    /// Current ring opacity, fading to zero.
    pub fn opacity(&self) -> f32 {
        0.7 * (1.0 - self.t())
    }
}

/// A "+N" readout that bounces in, rises, and fades.
#[derive(Debug, Clone)]
pub struct PointPopup {
    pub id: EffectId,
    pub pos: Vec2,
    pub points: u32,
    pub color: Color,
    pub age: f32,
}

impl PointPopup {
    pub const LIFETIME: f32 = 1.2;

    /// Presentation curve: (vertical offset, scale, opacity) at the
    /// current age. Three phases: bounce in, rise, fade out.
    pub fn presentation(&self) -> (f32, f32, f32) {
        let t = (self.age / Self::LIFETIME).clamp(0.0, 1.0);
        if t < 0.2 {
            let p = t / 0.2;
            (0.0, 0.5 + 0.7 * p, p)
        } else if t < 0.7 {
            let p = (t - 0.2) / 0.5;
            (-70.0 * p, 1.2 - 0.2 * p, 1.0 - 0.1 * p)
        } else {
            let p = (t - 0.7) / 0.3;
            (-70.0 - 30.0 * p, 1.0 - 0.3 * p, 0.9 * (1.0 - p))
        }
    }
}

/// All live effects. The host reads the sets each frame; `tick` retires
/// whatever has outlived its presentation.
#[derive(Debug, Default)]
pub struct EffectsState {
    ripples: Vec<Ripple>,
    popups: Vec<PointPopup>,
    next_id: u32,
}

impl EffectsState {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn ripple(&mut self, pos: Vec2, color: Color) {
        let id = self.next_id();
        self.ripples.push(Ripple {
            id,
            pos,
            color,
            age: 0.0,
        });
    }

    pub fn popup(&mut self, pos: Vec2, points: u32, color: Color) {
        let id = self.next_id();
        self.popups.push(PointPopup {
            id,
            pos,
            points,
            color,
            age: 0.0,
        });
    }

    /// Age everything and drop expired effects.
    pub fn tick(&mut self, dt: f32) {
        for r in self.ripples.iter_mut() {
            r.age += dt;
        }
        for p in self.popups.iter_mut() {
            p.age += dt;
        }
        self.ripples.retain(|r| r.age < Ripple::LIFETIME);
        self.popups.retain(|p| p.age < PointPopup::LIFETIME);
    }

    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    pub fn popups(&self) -> &[PointPopup] {
        &self.popups
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
        self.popups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Color;

    const WHITE: Color = Color::rgb(255, 255, 255);

    #[test]
    fn ripple_expires_after_lifetime() {
        let mut fx = EffectsState::new();
        fx.ripple(Vec2::ZERO, WHITE);
        fx.tick(0.3);
        assert_eq!(fx.ripples().len(), 1);
        fx.tick(0.3);
        assert!(fx.ripples().is_empty());
    }

    #[test]
    fn ripple_grows_and_fades() {
        let mut fx = EffectsState::new();
        fx.ripple(Vec2::ZERO, WHITE);
        let r0 = fx.ripples()[0].radius();
        let o0 = fx.ripples()[0].opacity();
        fx.tick(0.25);
        let r1 = fx.ripples()[0].radius();
        let o1 = fx.ripples()[0].opacity();
        assert!(r1 > r0);
        assert!(o1 < o0);
    }

    #[test]
    fn popup_outlives_ripple() {
        let mut fx = EffectsState::new();
        fx.ripple(Vec2::ZERO, WHITE);
        fx.popup(Vec2::ZERO, 3, WHITE);
        fx.tick(0.6);
        assert!(fx.ripples().is_empty());
        assert_eq!(fx.popups().len(), 1);
        fx.tick(0.7);
        assert!(fx.popups().is_empty());
    }

    #[test]
    fn popup_rises_then_fades() {
        let popup = PointPopup {
            id: EffectId(0),
            pos: Vec2::ZERO,
            points: 1,
            color: WHITE,
            age: 0.0,
        };
        let (dy0, _, op0) = PointPopup { age: 0.1, ..popup.clone() }.presentation();
        let (dy1, _, _) = PointPopup { age: 0.6, ..popup.clone() }.presentation();
        let (dy2, _, op2) = PointPopup { age: 1.19, ..popup }.presentation();
        assert_eq!(dy0, 0.0);
        assert!(op0 > 0.0);
        assert!(dy1 < dy0, "popup should rise (negative offset)");
        assert!(dy2 < dy1);
        assert!(op2 < 0.05, "popup should have faded, opacity {}", op2);
    }

    #[test]
    fn ids_are_unique_across_kinds() {
        let mut fx = EffectsState::new();
        fx.ripple(Vec2::ZERO, WHITE);
        fx.popup(Vec2::ZERO, 1, WHITE);
        assert_ne!(fx.ripples()[0].id, fx.popups()[0].id);
    }
}
