//! Pill Drop - two pills fall into the sea and dissolve
//!
//! Core modules:
//! - `seq`: Deterministic animation sequencer (timeline, plan, bubbles, state)
//! - `settings`: Timing and replay configuration, validation, query overrides
//! - `dom`: Browser stage that applies effects to the page (wasm32 only)
//! - `trigger`: Click/load trigger flags polled by the frame loop
//! - `error`: Page setup and settings errors

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod error;
pub mod seq;
pub mod settings;
pub mod trigger;

pub use error::{SettingsError, SetupError};
pub use seq::{Effect, RecordingStage, Sequencer, Stage};
pub use settings::{ReplayPolicy, Settings, Timings};
pub use trigger::Triggers;

/// Sequence timing constants (milliseconds)
pub mod consts {
    /// Delay between a run starting and the pills dropping
    pub const DROP_DELAY_MS: f64 = 600.0;
    /// Length of the CSS fall animation
    pub const DROP_DURATION_MS: f64 = 1200.0;
    /// Extra settle time after the fall before dissolving starts
    pub const DROP_SETTLE_MS: f64 = 80.0;
    /// Blue pill dissolves fast
    pub const BLUE_DISSOLVE_MS: f64 = 3000.0;
    /// Pink pill dissolves twice as slowly
    pub const PINK_DISSOLVE_MS: f64 = 6000.0;
    /// Pause after the slowest dissolve before stats show
    pub const STATS_PAUSE_MS: f64 = 800.0;
    /// Delay between bar fill and value labels appearing
    pub const STATS_VALUE_DELAY_MS: f64 = 420.0;
    /// Auto-start delay after page load
    pub const AUTOSTART_DELAY_MS: f64 = 600.0;

    /// Overlay fill kicks in this long after `dissolving` is applied
    pub const OVERLAY_KICK_MS: f64 = 30.0;
    /// Fraction of the dissolve after which the pill fades and shrinks
    pub const FADE_AT_FRACTION: f64 = 0.45;
    /// Minimum opacity transition length
    pub const MIN_OPACITY_TRANSITION_MS: f64 = 800.0;
    /// Final opacity of a dissolved pill
    pub const DISSOLVED_OPACITY: f64 = 0.06;
    /// Final scale of a dissolved pill
    pub const DISSOLVED_SCALE: f64 = 0.64;
    /// Landing offset used when none was computed
    pub const DEFAULT_LANDING_PX: i32 = 160;
    /// Landing offset as a fraction of the sea height
    pub const LANDING_FRACTION: f64 = 0.55;
    /// Pill start offset (above the stage)
    pub const PILL_START_TY: &str = "-260px";

    /// Base delay between bubble spawns
    pub const BUBBLE_INTERVAL_MIN_MS: f64 = 80.0;
    /// Random jitter added to the bubble spawn delay
    pub const BUBBLE_INTERVAL_JITTER_MS: f64 = 180.0;
    /// Bubble removal buffer after its animation ends
    pub const BUBBLE_REMOVE_BUFFER_MS: f64 = 80.0;
}

/// Landing offset for a pill given the sea height in pixels
#[inline]
pub fn landing_offset(sea_height: f64) -> i32 {
    (sea_height * consts::LANDING_FRACTION).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_offset() {
        assert_eq!(landing_offset(400.0), 220);
        assert_eq!(landing_offset(0.0), 0);
        // 0.55 * 301 = 165.55
        assert_eq!(landing_offset(301.0), 166);
    }
}
