//! The run pipeline as an ordered list of timed steps
//!
//! Every fixed delay of a run is laid out up front relative to the run start,
//! so ordering and total-duration properties can be checked without a clock.
//! Only bubble spawns and removals are scheduled dynamically.

use serde::{Deserialize, Serialize};

use super::bubbles::BubbleLoop;
use super::state::{PillColor, SeaSide};
use crate::consts::*;
use crate::settings::{StatsSettings, Timings};

/// One unit of work on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Compute the landing offset and mark both pills dropped
    Drop,
    /// Open a bubble loop for a sea
    StartBubbles { sea: SeaSide, duration: f64 },
    /// Set transitions and the `dissolving` class
    StartDissolve { pill: PillColor, duration: f64 },
    /// Fill the overlay to 100%, driving the height transition
    FillOverlay { pill: PillColor },
    /// Fade and shrink the pill at its landing spot
    FadePill { pill: PillColor },
    /// Dissolve transition is over
    FinishDissolve { pill: PillColor },
    /// Unhide stats and fill the bars
    RevealStats,
    /// Show the bar value labels
    RevealValues,
    /// One bubble spawn attempt
    SpawnBubble(BubbleLoop),
    /// Bubble animation ended
    RemoveBubble { sea: SeaSide, id: u32 },
}

/// A step and its offset from the start of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedStep {
    pub at: f64,
    pub step: Step,
}

/// Dissolve duration of a pill
pub fn dissolve_duration(timings: &Timings, pill: PillColor) -> f64 {
    match pill {
        PillColor::Blue => timings.blue_dissolve,
        PillColor::Pink => timings.pink_dissolve,
    }
}

/// Opacity transition length for a dissolve
pub fn opacity_transition(duration: f64) -> f64 {
    MIN_OPACITY_TRANSITION_MS.max((duration / 3.0).floor())
}

/// Delay from dissolve start to the fade/shrink
pub fn fade_delay(duration: f64) -> f64 {
    (duration * FADE_AT_FRACTION).floor()
}

/// Lay out every fixed step of one run, sorted by offset
///
/// Steps sharing an offset keep the order they are listed in here.
pub fn run_plan(timings: &Timings, stats: &StatsSettings) -> Vec<PlannedStep> {
    let mut plan = vec![PlannedStep {
        at: timings.drop_delay,
        step: Step::Drop,
    }];

    let dissolve_at = timings.dissolve_start();
    for pill in PillColor::ALL {
        plan.push(PlannedStep {
            at: dissolve_at,
            step: Step::StartBubbles {
                sea: pill.sea(),
                duration: dissolve_duration(timings, pill),
            },
        });
    }
    for pill in PillColor::ALL {
        let duration = dissolve_duration(timings, pill);
        plan.push(PlannedStep {
            at: dissolve_at,
            step: Step::StartDissolve { pill, duration },
        });
        plan.push(PlannedStep {
            at: dissolve_at + OVERLAY_KICK_MS,
            step: Step::FillOverlay { pill },
        });
        plan.push(PlannedStep {
            at: dissolve_at + fade_delay(duration),
            step: Step::FadePill { pill },
        });
        plan.push(PlannedStep {
            at: dissolve_at + duration,
            step: Step::FinishDissolve { pill },
        });
    }

    let stats_at = dissolve_at + timings.stats_after_dissolve();
    plan.push(PlannedStep {
        at: stats_at,
        step: Step::RevealStats,
    });
    plan.push(PlannedStep {
        at: stats_at + stats.value_delay_ms,
        step: Step::RevealValues,
    });

    // sort_by is stable
    plan.sort_by(|a, b| a.at.total_cmp(&b.at));
    plan
}

/// Offset of the last fixed step, i.e. the length of a run
pub fn run_length(plan: &[PlannedStep]) -> f64 {
    plan.iter().map(|p| p.at).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_plan() -> Vec<PlannedStep> {
        run_plan(&Timings::default(), &StatsSettings::default())
    }

    fn offset_of(plan: &[PlannedStep], step: Step) -> f64 {
        plan.iter().find(|p| p.step == step).map(|p| p.at).unwrap()
    }

    #[test]
    fn test_plan_offsets() {
        let plan = default_plan();
        assert_eq!(offset_of(&plan, Step::Drop), 600.0);
        let blue = Step::StartDissolve {
            pill: PillColor::Blue,
            duration: 3000.0,
        };
        let pink = Step::StartDissolve {
            pill: PillColor::Pink,
            duration: 6000.0,
        };
        assert_eq!(offset_of(&plan, blue), 1880.0);
        assert_eq!(offset_of(&plan, pink), 1880.0);

        let blue = PillColor::Blue;
        let pink = PillColor::Pink;
        assert_eq!(offset_of(&plan, Step::FillOverlay { pill: blue }), 1910.0);
        assert_eq!(offset_of(&plan, Step::FadePill { pill: blue }), 3230.0);
        assert_eq!(offset_of(&plan, Step::FadePill { pill: pink }), 4580.0);
        assert_eq!(offset_of(&plan, Step::FinishDissolve { pill: pink }), 7880.0);
        assert_eq!(offset_of(&plan, Step::RevealStats), 8680.0);
        assert_eq!(offset_of(&plan, Step::RevealValues), 9100.0);
        assert_eq!(run_length(&plan), 9100.0);
    }

    #[test]
    fn test_plan_is_sorted_and_drop_first() {
        let plan = default_plan();
        assert!(plan.windows(2).all(|w| w[0].at <= w[1].at));
        assert_eq!(plan[0].step, Step::Drop);
        assert_eq!(plan.last().unwrap().step, Step::RevealValues);
    }

    #[test]
    fn test_bubbles_start_with_dissolve() {
        let plan = default_plan();
        let left = Step::StartBubbles {
            sea: SeaSide::Left,
            duration: 3000.0,
        };
        let right = Step::StartBubbles {
            sea: SeaSide::Right,
            duration: 6000.0,
        };
        assert_eq!(offset_of(&plan, left), 1880.0);
        assert_eq!(offset_of(&plan, right), 1880.0);
    }

    #[test]
    fn test_stats_wait_for_slowest_dissolve() {
        // Swap the durations: stats still wait on the slower one
        let timings = Timings {
            blue_dissolve: 7000.0,
            pink_dissolve: 2000.0,
            ..Timings::default()
        };
        let plan = run_plan(&timings, &StatsSettings::default());
        assert_eq!(offset_of(&plan, Step::RevealStats), 1880.0 + 7800.0);
    }

    #[test]
    fn test_transition_helpers() {
        assert_eq!(opacity_transition(3000.0), 1000.0);
        assert_eq!(opacity_transition(6000.0), 2000.0);
        assert_eq!(opacity_transition(900.0), 800.0);
        assert_eq!(fade_delay(3000.0), 1350.0);
        assert_eq!(fade_delay(1001.0), 450.0);
    }
}
