//! Animation sequencing module
//!
//! Everything that decides *what* happens *when* lives here. This module must
//! stay host-independent:
//! - Virtual time only (callers pass `now`)
//! - Seeded RNG only
//! - Visual output only through `Effect`s applied to a `Stage`

pub mod bubbles;
pub mod effect;
pub mod plan;
pub mod sequencer;
pub mod state;
pub mod timeline;

pub use bubbles::{Bubble, BubbleLoop};
pub use effect::{Effect, PillClass, RecordingStage, Stage};
pub use plan::{PlannedStep, Step, run_length, run_plan};
pub use sequencer::Sequencer;
pub use state::{
    Pill, PillColor, PillPhase, RunId, Scene, Sea, SeaSide, SequencePhase, StatsBar, StatsPanel,
};
pub use timeline::Timeline;
