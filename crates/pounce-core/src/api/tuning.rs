use serde::{Deserialize, Serialize};

/// Session tuning knobs, loadable from a JSON blob supplied by the host.
/// Every field has a default so a partial (or empty) document is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTuning {
    /// Session length in seconds.
    #[serde(default = "default_session_duration")]
    pub session_duration: f32,
    /// Number of simultaneously live tokens. Half travel horizontally,
    /// half vertically, each in its own lane, so the count must be even
    /// and at least 2.
    #[serde(default = "default_token_count")]
    pub token_count: usize,
    /// Rendered token size in pixels; spawn geometry and lane padding
    /// derive from it.
    #[serde(default = "default_token_size")]
    pub token_size: f32,
    /// Maximum tap-to-token distance accepted as a collection. Generous
    /// on purpose: the player may be a cat.
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
    /// Re-entrancy lock after a successful collection, seconds.
    #[serde(default = "default_collect_lock")]
    pub collect_lock: f32,
    /// Window for rejecting duplicate synthetic taps, seconds.
    #[serde(default = "default_tap_debounce")]
    pub tap_debounce: f32,
    /// Radius for rejecting duplicate synthetic taps, pixels.
    #[serde(default = "default_tap_debounce_radius")]
    pub tap_debounce_radius: f32,
    /// Delay between staged spawns during session fill-in, seconds.
    #[serde(default = "default_spawn_stagger")]
    pub spawn_stagger: f32,
    /// Safety bound on the asset-loading state, seconds. A slow host
    /// degrades visuals, never gameplay.
    #[serde(default = "default_load_timeout")]
    pub load_timeout: f32,
}

fn default_session_duration() -> f32 {
    30.0
}
fn default_token_count() -> usize {
    6
}
fn default_token_size() -> f32 {
    140.0
}
fn default_hit_radius() -> f32 {
    250.0
}
fn default_collect_lock() -> f32 {
    0.25
}
fn default_tap_debounce() -> f32 {
    0.2
}
fn default_tap_debounce_radius() -> f32 {
    20.0
}
fn default_spawn_stagger() -> f32 {
    0.4
}
fn default_load_timeout() -> f32 {
    5.0
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            session_duration: default_session_duration(),
            token_count: default_token_count(),
            token_size: default_token_size(),
            hit_radius: default_hit_radius(),
            collect_lock: default_collect_lock(),
            tap_debounce: default_tap_debounce(),
            tap_debounce_radius: default_tap_debounce_radius(),
            spawn_stagger: default_spawn_stagger(),
            load_timeout: default_load_timeout(),
        }
    }
}

impl SessionTuning {
    /// Parse tuning from a JSON string. Documents that cannot support a
    /// session (token counts with no even lane split) are rejected here,
    /// at the boundary, rather than failing mid-session.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), serde_json::Error> {
        use serde::de::Error;
        if self.token_count < 2 || self.token_count % 2 != 0 {
            return Err(serde_json::Error::custom(format!(
                "token_count must be an even number of at least 2, got {}",
                self.token_count
            )));
        }
        Ok(())
    }

    /// Lanes per travel axis.
    pub fn lanes_per_axis(&self) -> usize {
        self.token_count / 2
    }
}
