//! Visual effects and the stage they are applied to
//!
//! The sequencer only ever talks to the page through `Effect`s. The browser
//! shell maps them onto class toggles and inline styles; tests record them.

use serde::{Deserialize, Serialize};

use super::bubbles::Bubble;
use super::state::{PillColor, SeaSide, StatsBar};

/// Classes toggled on a pill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PillClass {
    Dropped,
    Dissolving,
}

impl PillClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PillClass::Dropped => "dropped",
            PillClass::Dissolving => "dissolving",
        }
    }
}

/// A single cosmetic mutation of the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Remove `dropped`/`dissolving`, restore `--ty`, drop `--land-y`,
    /// clear inline transform/opacity/transition, empty the overlay
    ResetPill { pill: PillColor },
    /// Remove every bubble element from a sea
    ClearBubbles { sea: SeaSide },
    /// Toggle the `hidden` class on the stats panel
    SetStatsHidden { hidden: bool },
    /// Set the `--land-y` custom property
    SetLandingOffset { pill: PillColor, px: i32 },
    AddPillClass { pill: PillColor, class: PillClass },
    /// `height {duration}ms linear` on the overlay
    SetOverlayTransition { pill: PillColor, duration_ms: f64 },
    SetOverlayFill { pill: PillColor, percent: f64 },
    /// `transform {transform_ms}ms ease, opacity {opacity_ms}ms ease`
    SetPillTransition {
        pill: PillColor,
        transform_ms: f64,
        opacity_ms: f64,
    },
    /// Fade and shrink the pill at its landing spot
    FadePill {
        pill: PillColor,
        opacity: f64,
        translate_y_px: i32,
        scale: f64,
    },
    SpawnBubble { sea: SeaSide, bubble: Bubble },
    RemoveBubble { sea: SeaSide, id: u32 },
    SetBarWidth { bar: StatsBar, percent: f64 },
    SetBarValueOpacity { bar: StatsBar, opacity: f64 },
}

impl Effect {
    /// Inline `transition` value for [`Effect::SetPillTransition`]
    pub fn pill_transition_css(transform_ms: f64, opacity_ms: f64) -> String {
        format!("transform {transform_ms}ms ease, opacity {opacity_ms}ms ease")
    }

    /// Inline `transition` value for [`Effect::SetOverlayTransition`]
    pub fn overlay_transition_css(duration_ms: f64) -> String {
        format!("height {duration_ms}ms linear")
    }

    /// Inline `transform` value for [`Effect::FadePill`]
    pub fn fade_transform_css(translate_y_px: i32, scale: f64) -> String {
        format!("translateX(-50%) translateY({translate_y_px}px) scale({scale})")
    }
}

/// Something effects can be applied to
pub trait Stage {
    /// Rendered height of a sea in px
    fn sea_height(&self, sea: SeaSide) -> f64;

    /// Apply one effect; `at` is the virtual time the effect belongs to
    fn apply(&mut self, at: f64, effect: &Effect);
}

/// A stage that remembers every effect with the time it was applied
#[derive(Debug, Clone, Default)]
pub struct RecordingStage {
    /// Height reported for both seas
    pub sea_height: f64,
    pub log: Vec<(f64, Effect)>,
}

impl RecordingStage {
    pub fn new(sea_height: f64) -> Self {
        Self {
            sea_height,
            ..Default::default()
        }
    }

    /// Effects matching a predicate, with their times
    pub fn find<F>(&self, mut pred: F) -> Vec<(f64, &Effect)>
    where
        F: FnMut(&Effect) -> bool,
    {
        self.log
            .iter()
            .filter(|(_, e)| pred(e))
            .map(|(t, e)| (*t, e))
            .collect()
    }

    /// Time of the first effect matching a predicate
    pub fn first_time<F>(&self, pred: F) -> Option<f64>
    where
        F: FnMut(&Effect) -> bool,
    {
        self.find(pred).first().map(|(t, _)| *t)
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Stage for RecordingStage {
    fn sea_height(&self, _sea: SeaSide) -> f64 {
        self.sea_height
    }

    fn apply(&mut self, at: f64, effect: &Effect) {
        self.log.push((at, effect.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_values() {
        assert_eq!(
            Effect::pill_transition_css(3000.0, 1000.0),
            "transform 3000ms ease, opacity 1000ms ease"
        );
        assert_eq!(Effect::overlay_transition_css(6000.0), "height 6000ms linear");
        assert_eq!(
            Effect::fade_transform_css(220, 0.64),
            "translateX(-50%) translateY(220px) scale(0.64)"
        );
    }

    #[test]
    fn test_recording_stage_find() {
        let mut stage = RecordingStage::new(400.0);
        stage.apply(10.0, &Effect::SetStatsHidden { hidden: true });
        stage.apply(20.0, &Effect::ClearBubbles { sea: SeaSide::Left });

        assert_eq!(stage.sea_height(SeaSide::Right), 400.0);
        assert_eq!(
            stage.first_time(|e| matches!(e, Effect::ClearBubbles { .. })),
            Some(20.0)
        );
        assert!(stage.first_time(|e| matches!(e, Effect::SpawnBubble { .. })).is_none());
    }
}
