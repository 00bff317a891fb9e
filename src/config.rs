use crate::input::CONVENTIONAL_KEYMAP;

/// a frame is processed once this many ms have passed since the last one
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 16.0;

/// how many cycles the core gets per processed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleBudget {
    /// one cycle per elapsed millisecond, so a stalled display catches up
    #[default]
    Elapsed,
    /// a fixed count per frame regardless of how late it is
    Fixed(u32),
}

/// Knobs for the harness and the terminal frontend.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub frame_interval_ms: f64,
    pub cycle_budget: CycleBudget,
    /// physical key to logical id, all 16 ids exactly once
    pub keymap: Vec<(char, u8)>,
    /// emit the core's debug values to the log
    pub diagnostics: bool,
    /// how often the frontend fires a refresh
    pub refresh_rate_hz: f64,
    /// frontend treats a key as released after this long without a repeat
    pub key_hold_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            cycle_budget: CycleBudget::Elapsed,
            keymap: CONVENTIONAL_KEYMAP.to_vec(),
            diagnostics: false,
            refresh_rate_hz: 60.0,
            key_hold_ms: 150,
        }
    }
}
