use bytemuck::{Pod, Zeroable};

/// Unique identifier for a live token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// Monotonic token id allocator. Owned by the session controller and
/// reset per session, never a global counter.
#[derive(Debug, Default)]
pub struct TokenIdAlloc {
    next: u32,
}

impl TokenIdAlloc {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&mut self) -> TokenId {
        let id = TokenId(self.next);
        self.next += 1;
        id
    }
}

/// A sound/haptic cue emitted by the core on each collection.
/// The value is the rising chime step since session start; the host maps
/// it into its scale and fires haptics alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event communicated from the core to the host via a flat float
/// buffer. Generic container: `kind` identifies the event, `a/b/c` carry
/// payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}

/// Score commit. `a` = cumulative session score, `b` = 1.0 for an interim
/// (pause) snapshot, 0.0 for the terminal commit. The host treats every
/// commit as "the session total so far", not an increment.
pub const EVENT_SCORE_COMMITTED: f32 = 1.0;
/// Session over. `a` = final score, `b` = new total XP, `c` = new level index.
pub const EVENT_SESSION_ENDED: f32 = 2.0;
/// Emitted alongside `EVENT_SESSION_ENDED` when the session crossed a level
/// threshold. `a` = previous level index, `b` = new level index.
pub const EVENT_LEVEL_UP: f32 = 3.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_alloc_monotonic() {
        let mut alloc = TokenIdAlloc::new();
        let a = alloc.next();
        let b = alloc.next();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }
}
