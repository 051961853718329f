//! The animation sequencer
//!
//! Owns the run lifecycle: reset, drop, dissolve, bubbles, stats. Time only
//! moves when the caller says so via [`Sequencer::advance_to`].

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bubbles::{Bubble, BubbleLoop, next_spawn_delay};
use super::effect::{Effect, PillClass, Stage};
use super::plan::{Step, opacity_transition, run_plan};
use super::state::{PillColor, PillPhase, RunId, Scene, SeaSide, SequencePhase, StatsBar};
use super::timeline::Timeline;
use crate::consts::*;
use crate::landing_offset;
use crate::settings::{ReplayPolicy, Settings};

/// Drives one page's pills, seas and stats panel
#[derive(Debug, Clone)]
pub struct Sequencer {
    settings: Settings,
    timeline: Timeline,
    scene: Scene,
    phase: SequencePhase,
    run: RunId,
    rng: Pcg32,
    next_bubble_id: u32,
}

impl Sequencer {
    /// Create an idle sequencer with a seeded RNG
    /// Out-of-range settings are replaced by the defaults
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings: settings.validated(),
            timeline: Timeline::new(),
            scene: Scene::default(),
            phase: SequencePhase::Idle,
            run: RunId::default(),
            rng: Pcg32::seed_from_u64(seed),
            next_bubble_id: 1,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    pub fn run_id(&self) -> RunId {
        self.run
    }

    /// Number of steps still waiting on the timeline
    pub fn pending(&self) -> usize {
        self.timeline.len()
    }

    /// Start a run at `now`
    ///
    /// Resets the stage immediately and lays out the run on the timeline.
    /// Returns false if the replay policy refused the request.
    pub fn run<S: Stage + ?Sized>(&mut self, now: f64, stage: &mut S) -> bool {
        if self.phase == SequencePhase::Playing
            && self.settings.replay == ReplayPolicy::IgnoreWhilePlaying
        {
            log::info!("Replay ignored, run {} still playing", self.run.0);
            return false;
        }

        self.run = self.run.next();
        let dropped = self.timeline.retain_run(self.run);
        if dropped > 0 {
            log::info!("Cancelled {} pending steps from previous run", dropped);
        }

        self.reset(now, stage);

        for planned in run_plan(&self.settings.timings, &self.settings.stats) {
            self.timeline.schedule(now + planned.at, self.run, planned.step);
        }
        self.phase = SequencePhase::Playing;

        log::info!("Run {} started at {:.0}ms", self.run.0, now);
        true
    }

    /// Execute every step due at or before `now`; returns how many ran
    pub fn advance_to<S: Stage + ?Sized>(&mut self, now: f64, stage: &mut S) -> usize {
        let mut executed = 0;
        while let Some(scheduled) = self.timeline.pop_due(now) {
            if scheduled.run != self.run {
                log::trace!(
                    "Discarding stale step {:?} from run {}",
                    scheduled.step,
                    scheduled.run.0
                );
                continue;
            }
            self.execute(scheduled.at, scheduled.step, stage);
            executed += 1;
        }
        executed
    }

    /// Return pills, seas and stats to their initial state
    fn reset<S: Stage + ?Sized>(&mut self, now: f64, stage: &mut S) {
        self.scene.reset();
        for pill in PillColor::ALL {
            stage.apply(now, &Effect::ResetPill { pill });
        }
        for sea in SeaSide::ALL {
            stage.apply(now, &Effect::ClearBubbles { sea });
        }
        stage.apply(now, &Effect::SetStatsHidden { hidden: true });
        for bar in StatsBar::ALL {
            stage.apply(now, &Effect::SetBarWidth { bar, percent: 0.0 });
            stage.apply(now, &Effect::SetBarValueOpacity { bar, opacity: 0.0 });
        }
    }

    fn execute<S: Stage + ?Sized>(&mut self, at: f64, step: Step, stage: &mut S) {
        log::debug!("[{:.0}ms] {:?}", at, step);
        match step {
            Step::Drop => {
                // Left sea is the reference for both pills
                let land = landing_offset(stage.sea_height(SeaSide::Left));
                for pill in PillColor::ALL {
                    self.scene.pill_mut(pill).landing_offset = Some(land);
                    stage.apply(at, &Effect::SetLandingOffset { pill, px: land });
                }
                for pill in PillColor::ALL {
                    self.scene.pill_mut(pill).phase = PillPhase::Dropped;
                    stage.apply(
                        at,
                        &Effect::AddPillClass {
                            pill,
                            class: PillClass::Dropped,
                        },
                    );
                }
            }
            Step::StartBubbles { sea, duration } => {
                if !self.settings.effective_bubbles() {
                    log::debug!("Bubbles disabled (reduced motion)");
                    return;
                }
                let lp = BubbleLoop::new(sea, at, duration);
                self.timeline.schedule(at, self.run, Step::SpawnBubble(lp));
            }
            Step::SpawnBubble(lp) => {
                if !lp.is_active(at) {
                    log::debug!("Bubble loop for {} sea ended", lp.sea.as_str());
                    return;
                }
                let id = self.next_bubble_id;
                self.next_bubble_id += 1;
                let cfg = self.settings.bubbles;
                let bubble = Bubble::random(id, &mut self.rng, &cfg);

                self.scene.sea_mut(lp.sea).bubbles.push(bubble);
                stage.apply(at, &Effect::SpawnBubble { sea: lp.sea, bubble });

                self.timeline.schedule(
                    at + bubble.remove_after_ms(&cfg),
                    self.run,
                    Step::RemoveBubble { sea: lp.sea, id },
                );
                let delay = next_spawn_delay(&mut self.rng, &cfg);
                self.timeline.schedule(at + delay, self.run, Step::SpawnBubble(lp));
            }
            Step::RemoveBubble { sea, id } => {
                if self.scene.sea_mut(sea).remove_bubble(id) {
                    stage.apply(at, &Effect::RemoveBubble { sea, id });
                }
            }
            Step::StartDissolve { pill, duration } => {
                stage.apply(
                    at,
                    &Effect::SetOverlayTransition {
                        pill,
                        duration_ms: duration,
                    },
                );
                self.scene.pill_mut(pill).phase = PillPhase::Dissolving;
                stage.apply(
                    at,
                    &Effect::AddPillClass {
                        pill,
                        class: PillClass::Dissolving,
                    },
                );
                stage.apply(
                    at,
                    &Effect::SetPillTransition {
                        pill,
                        transform_ms: duration,
                        opacity_ms: opacity_transition(duration),
                    },
                );
            }
            Step::FillOverlay { pill } => {
                self.scene.pill_mut(pill).overlay_percent = 100.0;
                stage.apply(at, &Effect::SetOverlayFill { pill, percent: 100.0 });
            }
            Step::FadePill { pill } => {
                let translate_y_px = self
                    .scene
                    .pill(pill)
                    .landing_offset
                    .unwrap_or(DEFAULT_LANDING_PX);
                stage.apply(
                    at,
                    &Effect::FadePill {
                        pill,
                        opacity: DISSOLVED_OPACITY,
                        translate_y_px,
                        scale: DISSOLVED_SCALE,
                    },
                );
            }
            Step::FinishDissolve { pill } => {
                self.scene.pill_mut(pill).phase = PillPhase::Dissolved;
            }
            Step::RevealStats => {
                let stats = self.settings.stats;
                self.scene.stats.visible = true;
                stage.apply(at, &Effect::SetStatsHidden { hidden: false });
                for (bar, percent) in [
                    (StatsBar::Man, stats.man_percent),
                    (StatsBar::Woman, stats.woman_percent),
                ] {
                    self.scene.stats.set_width(bar, percent);
                    stage.apply(at, &Effect::SetBarWidth { bar, percent });
                }
            }
            Step::RevealValues => {
                self.scene.stats.values_visible = true;
                for bar in StatsBar::ALL {
                    stage.apply(at, &Effect::SetBarValueOpacity { bar, opacity: 1.0 });
                }
                self.phase = SequencePhase::Finished;
                log::info!("Run {} finished", self.run.0);
            }
        }
    }
}
