//! Sequence settings and preferences
//!
//! Read from LocalStorage so timings can be tweaked without a rebuild, with
//! URL query overrides for the replay policy and reduced motion.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// What a replay does while a run is still playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReplayPolicy {
    /// Cancel the current run and start over
    #[default]
    Restart,
    /// Ignore replay requests until the current run finishes
    IgnoreWhilePlaying,
}

impl ReplayPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayPolicy::Restart => "Restart",
            ReplayPolicy::IgnoreWhilePlaying => "IgnoreWhilePlaying",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "restart" => Some(ReplayPolicy::Restart),
            "ignore" | "ignorewhileplaying" | "ignore-while-playing" => {
                Some(ReplayPolicy::IgnoreWhilePlaying)
            }
            _ => None,
        }
    }
}

/// Sequence timings (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timings {
    pub drop_delay: f64,
    /// Length of the CSS fall animation
    pub drop_duration: f64,
    pub drop_settle: f64,
    pub blue_dissolve: f64,
    pub pink_dissolve: f64,
    /// Pause after the slowest dissolve before the stats reveal
    pub stats_pause: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            drop_delay: DROP_DELAY_MS,
            drop_duration: DROP_DURATION_MS,
            drop_settle: DROP_SETTLE_MS,
            blue_dissolve: BLUE_DISSOLVE_MS,
            pink_dissolve: PINK_DISSOLVE_MS,
            stats_pause: STATS_PAUSE_MS,
        }
    }
}

impl Timings {
    /// Default timings with a custom blue dissolve; pink always takes twice as long
    pub fn scaled_dissolve(blue_ms: f64) -> Self {
        Self {
            blue_dissolve: blue_ms,
            pink_dissolve: blue_ms * 2.0,
            ..Self::default()
        }
    }

    /// Offset of the dissolve phase from the start of a run
    pub fn dissolve_start(&self) -> f64 {
        self.drop_delay + self.drop_duration + self.drop_settle
    }

    /// Offset of the stats reveal from the start of the dissolve phase
    pub fn stats_after_dissolve(&self) -> f64 {
        self.blue_dissolve.max(self.pink_dissolve) + self.stats_pause
    }
}

/// Bubble geometry and cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleSettings {
    /// Diameter range in px (min, max)
    pub size: (f64, f64),
    /// Horizontal position range in % of the sea width
    pub left_percent: (f64, f64),
    /// Lifetime range in seconds
    pub lifetime_secs: (f64, f64),
    pub interval_min_ms: f64,
    pub interval_jitter_ms: f64,
    pub remove_buffer_ms: f64,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            size: (6.0, 24.0),
            left_percent: (10.0, 90.0),
            lifetime_secs: (2.4, 4.2),
            interval_min_ms: BUBBLE_INTERVAL_MIN_MS,
            interval_jitter_ms: BUBBLE_INTERVAL_JITTER_MS,
            remove_buffer_ms: BUBBLE_REMOVE_BUFFER_MS,
        }
    }
}

/// Stats panel values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSettings {
    pub man_percent: f64,
    pub woman_percent: f64,
    /// Delay between bar fill and value labels
    pub value_delay_ms: f64,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            man_percent: 60.0,
            woman_percent: 35.0,
            value_delay_ms: STATS_VALUE_DELAY_MS,
        }
    }
}

/// Page settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub timings: Timings,
    #[serde(default)]
    pub bubbles: BubbleSettings,
    #[serde(default)]
    pub stats: StatsSettings,
    #[serde(default)]
    pub replay: ReplayPolicy,
    /// Skip bubbles entirely (pills still drop and dissolve)
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            bubbles: BubbleSettings::default(),
            stats: StatsSettings::default(),
            replay: ReplayPolicy::Restart,
            reduced_motion: false,
        }
    }
}

/// `value` must be finite and >= 0
fn non_negative(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::NotNonNegative { field, value })
    }
}

/// Both ends non-negative and `min <= max`
fn range(field: &'static str, (min, max): (f64, f64)) -> Result<(), SettingsError> {
    non_negative(field, min)?;
    non_negative(field, max)?;
    if min > max {
        return Err(SettingsError::ReversedRange { field, min, max });
    }
    Ok(())
}

fn percent(field: &'static str, value: f64) -> Result<(), SettingsError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::NotPercent { field, value })
    }
}

/// Truthy query flag values
fn flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pill_drop_settings";

    /// Whether bubbles should be spawned (respects reduced_motion)
    pub fn effective_bubbles(&self) -> bool {
        !self.reduced_motion
    }

    /// Check every timing, range and percentage
    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.timings;
        non_negative("timings.drop_delay", t.drop_delay)?;
        non_negative("timings.drop_duration", t.drop_duration)?;
        non_negative("timings.drop_settle", t.drop_settle)?;
        non_negative("timings.blue_dissolve", t.blue_dissolve)?;
        non_negative("timings.pink_dissolve", t.pink_dissolve)?;
        non_negative("timings.stats_pause", t.stats_pause)?;

        let b = &self.bubbles;
        range("bubbles.size", b.size)?;
        range("bubbles.left_percent", b.left_percent)?;
        range("bubbles.lifetime_secs", b.lifetime_secs)?;
        non_negative("bubbles.interval_min_ms", b.interval_min_ms)?;
        if b.interval_min_ms == 0.0 {
            // A zero gap would respawn at the same instant forever
            return Err(SettingsError::NotPositive {
                field: "bubbles.interval_min_ms",
                value: b.interval_min_ms,
            });
        }
        non_negative("bubbles.interval_jitter_ms", b.interval_jitter_ms)?;
        non_negative("bubbles.remove_buffer_ms", b.remove_buffer_ms)?;

        let s = &self.stats;
        percent("stats.man_percent", s.man_percent)?;
        percent("stats.woman_percent", s.woman_percent)?;
        non_negative("stats.value_delay_ms", s.value_delay_ms)?;
        Ok(())
    }

    /// These settings if they validate, defaults otherwise
    pub fn validated(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from JSON, falling back to defaults for missing fields.
    /// Returns `None` for malformed or out-of-range settings.
    pub fn from_json(json: &str) -> Option<Self> {
        let settings: Self = serde_json::from_str(json)
            .inspect_err(|e| log::warn!("Ignoring unreadable settings: {}", e))
            .ok()?;
        settings
            .validate()
            .inspect_err(|e| log::warn!("Ignoring settings: {}", e))
            .ok()?;
        Some(settings)
    }

    /// Apply `replay=` and `reduced-motion=` overrides from a URL query
    /// string (leading `?` optional). Unknown keys and values are ignored.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "replay" => match ReplayPolicy::from_str(value) {
                    Some(policy) => {
                        self.replay = policy;
                        log::info!("Replay policy: {}", policy.as_str());
                    }
                    None => log::warn!("Unknown replay policy `{}`", value),
                },
                "reduced-motion" | "reduced_motion" => match flag(value) {
                    Some(on) => self.reduced_motion = on,
                    None => log::warn!("Unknown reduced-motion value `{}`", value),
                },
                _ => {}
            }
        }
    }

    /// Raw settings JSON stored for this page, if any
    #[cfg(target_arch = "wasm32")]
    fn stored_json() -> Option<String> {
        let storage = web_sys::window()?.local_storage().ok()??;
        storage.get_item(Self::STORAGE_KEY).ok()?
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::stored_json().as_deref().and_then(Self::from_json) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Native builds have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_timings() {
        let t = Timings::default();
        assert_eq!(t.dissolve_start(), 1880.0);
        assert_eq!(t.stats_after_dissolve(), 6800.0);
        assert_eq!(t.blue_dissolve * 2.0, t.pink_dissolve);
    }

    #[test]
    fn test_replay_policy_from_str() {
        assert_eq!(ReplayPolicy::from_str("Restart"), Some(ReplayPolicy::Restart));
        assert_eq!(
            ReplayPolicy::from_str("ignore"),
            Some(ReplayPolicy::IgnoreWhilePlaying)
        );
        assert_eq!(ReplayPolicy::from_str("queue"), None);
        assert_eq!(
            ReplayPolicy::from_str(ReplayPolicy::IgnoreWhilePlaying.as_str()),
            Some(ReplayPolicy::IgnoreWhilePlaying)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"replay":"IgnoreWhilePlaying"}"#).unwrap();
        assert_eq!(settings.replay, ReplayPolicy::IgnoreWhilePlaying);
        assert_eq!(settings.timings, Timings::default());
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(Settings::from_json("{not json").is_none());
    }

    #[test]
    fn test_reduced_motion_disables_bubbles() {
        let mut settings = Settings::default();
        assert!(settings.effective_bubbles());
        settings.reduced_motion = true;
        assert!(!settings.effective_bubbles());
    }

    #[test]
    fn test_zero_bubble_interval_rejected() {
        let json = r#"{"bubbles":{"size":[6,24],"left_percent":[10,90],"lifetime_secs":[2.4,4.2],
            "interval_min_ms":0,"interval_jitter_ms":0,"remove_buffer_ms":80}}"#;
        assert!(Settings::from_json(json).is_none());

        let mut settings = Settings::default();
        settings.bubbles.interval_min_ms = 0.0;
        settings.bubbles.interval_jitter_ms = 0.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::NotPositive {
                field: "bubbles.interval_min_ms",
                value: 0.0
            })
        );
        assert_eq!(settings.validated(), Settings::default());
    }

    #[test]
    fn test_out_of_range_settings_rejected() {
        let mut reversed = Settings::default();
        reversed.bubbles.lifetime_secs = (4.2, 2.4);
        assert!(matches!(
            reversed.validate(),
            Err(SettingsError::ReversedRange { field: "bubbles.lifetime_secs", .. })
        ));

        let mut negative = Settings::default();
        negative.timings.pink_dissolve = -1.0;
        assert!(negative.validate().is_err());

        let mut infinite = Settings::default();
        infinite.timings.stats_pause = f64::INFINITY;
        assert!(infinite.validate().is_err());

        let mut nan = Settings::default();
        nan.bubbles.interval_jitter_ms = f64::NAN;
        assert!(nan.validate().is_err());

        let mut percent = Settings::default();
        percent.stats.man_percent = 140.0;
        assert!(percent.validate().is_err());

        let json = r#"{"timings":{"drop_delay":-5,"drop_duration":1200,"drop_settle":80,
            "blue_dissolve":3000,"pink_dissolve":6000,"stats_pause":800}}"#;
        assert!(Settings::from_json(json).is_none());
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_query_overrides() {
        let mut settings = Settings::default();
        settings.apply_query("?replay=ignore&reduced-motion=1");
        assert_eq!(settings.replay, ReplayPolicy::IgnoreWhilePlaying);
        assert!(settings.reduced_motion);

        settings.apply_query("replay=Restart&reduced_motion=off&lang=en");
        assert_eq!(settings.replay, ReplayPolicy::Restart);
        assert!(!settings.reduced_motion);

        // A bare flag turns it on; garbage leaves things alone
        settings.apply_query("reduced-motion&replay=queue");
        assert!(settings.reduced_motion);
        assert_eq!(settings.replay, ReplayPolicy::Restart);

        settings.apply_query("");
        assert!(settings.reduced_motion);
    }

    proptest! {
        #[test]
        fn scaled_dissolve_keeps_one_to_two_ratio(blue in 1.0f64..20_000.0) {
            let t = Timings::scaled_dissolve(blue);
            prop_assert_eq!(t.pink_dissolve, t.blue_dissolve * 2.0);
            prop_assert_eq!(t.stats_after_dissolve(), t.pink_dissolve + t.stats_pause);
        }
    }
}
