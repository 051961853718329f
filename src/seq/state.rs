//! Sequence state and presentational entities
//!
//! Mirrors what is on screen so runs can be inspected without a DOM.

use serde::{Deserialize, Serialize};

use super::bubbles::Bubble;

/// Lifecycle of the whole sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SequencePhase {
    /// Nothing has run yet
    #[default]
    Idle,
    /// A run is in progress
    Playing,
    /// Stats are shown, waiting for a replay
    Finished,
}

/// Identifier of one run; bumped on every accepted `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> Self {
        RunId(self.0 + 1)
    }
}

/// The two pills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PillColor {
    Blue,
    Pink,
}

impl PillColor {
    pub const ALL: [PillColor; 2] = [PillColor::Blue, PillColor::Pink];

    /// The sea this pill drops into
    pub fn sea(&self) -> SeaSide {
        match self {
            PillColor::Blue => SeaSide::Left,
            PillColor::Pink => SeaSide::Right,
        }
    }

    fn index(&self) -> usize {
        match self {
            PillColor::Blue => 0,
            PillColor::Pink => 1,
        }
    }
}

/// The two seas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeaSide {
    Left,
    Right,
}

impl SeaSide {
    pub const ALL: [SeaSide; 2] = [SeaSide::Left, SeaSide::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeaSide::Left => "left",
            SeaSide::Right => "right",
        }
    }

    fn index(&self) -> usize {
        match self {
            SeaSide::Left => 0,
            SeaSide::Right => 1,
        }
    }
}

/// Visual state of a pill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PillPhase {
    #[default]
    Idle,
    /// Falling/landed (`dropped` class)
    Dropped,
    /// Overlay filling, fading and shrinking
    Dissolving,
    /// Dissolve transition complete
    Dissolved,
}

/// A pill entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pill {
    pub color: PillColor,
    pub phase: PillPhase,
    /// Landing offset in px, set when the pill drops
    pub landing_offset: Option<i32>,
    /// Overlay fill in percent (0 or 100)
    pub overlay_percent: f64,
}

impl Pill {
    pub fn new(color: PillColor) -> Self {
        Self {
            color,
            phase: PillPhase::Idle,
            landing_offset: None,
            overlay_percent: 0.0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.color);
    }
}

/// A sea and the bubbles currently rising in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sea {
    pub side: SeaSide,
    pub bubbles: Vec<Bubble>,
}

impl Sea {
    pub fn new(side: SeaSide) -> Self {
        Self {
            side,
            bubbles: Vec::new(),
        }
    }

    /// Remove a bubble by id; returns false if it was already gone
    pub fn remove_bubble(&mut self, id: u32) -> bool {
        let before = self.bubbles.len();
        self.bubbles.retain(|b| b.id != id);
        self.bubbles.len() != before
    }
}

/// Stats panel bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatsBar {
    Man,
    Woman,
}

impl StatsBar {
    pub const ALL: [StatsBar; 2] = [StatsBar::Man, StatsBar::Woman];

    /// CSS class distinguishing the bar
    pub fn class(&self) -> &'static str {
        match self {
            StatsBar::Man => "man",
            StatsBar::Woman => "woman",
        }
    }

    fn index(&self) -> usize {
        match self {
            StatsBar::Man => 0,
            StatsBar::Woman => 1,
        }
    }
}

/// The stats panel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsPanel {
    pub visible: bool,
    /// Bar widths in percent
    pub bar_widths: [f64; 2],
    pub values_visible: bool,
}

impl StatsPanel {
    pub fn width(&self, bar: StatsBar) -> f64 {
        self.bar_widths[bar.index()]
    }

    pub fn set_width(&mut self, bar: StatsBar, percent: f64) {
        self.bar_widths[bar.index()] = percent;
    }
}

/// Everything on the stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub pills: [Pill; 2],
    pub seas: [Sea; 2],
    pub stats: StatsPanel,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            pills: [Pill::new(PillColor::Blue), Pill::new(PillColor::Pink)],
            seas: [Sea::new(SeaSide::Left), Sea::new(SeaSide::Right)],
            stats: StatsPanel::default(),
        }
    }
}

impl Scene {
    pub fn pill(&self, color: PillColor) -> &Pill {
        &self.pills[color.index()]
    }

    pub fn pill_mut(&mut self, color: PillColor) -> &mut Pill {
        &mut self.pills[color.index()]
    }

    pub fn sea_mut(&mut self, side: SeaSide) -> &mut Sea {
        &mut self.seas[side.index()]
    }

    /// Total bubbles across both seas
    pub fn bubble_count(&self) -> usize {
        self.seas.iter().map(|s| s.bubbles.len()).sum()
    }

    /// Return every entity to its initial state
    pub fn reset(&mut self) {
        for pill in &mut self.pills {
            pill.reset();
        }
        for sea in &mut self.seas {
            sea.bubbles.clear();
        }
        self.stats = StatsPanel::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::bubbles::Bubble;

    fn bubble(id: u32) -> Bubble {
        Bubble {
            id,
            size: 10.0,
            left_percent: 50.0,
            lifetime_secs: 3.0,
        }
    }

    #[test]
    fn test_pill_sea_pairing() {
        assert_eq!(PillColor::Blue.sea(), SeaSide::Left);
        assert_eq!(PillColor::Pink.sea(), SeaSide::Right);
    }

    #[test]
    fn test_scene_reset() {
        let mut scene = Scene::default();
        scene.pill_mut(PillColor::Pink).phase = PillPhase::Dissolving;
        scene.pill_mut(PillColor::Pink).landing_offset = Some(220);
        scene.sea_mut(SeaSide::Left).bubbles.push(bubble(1));
        scene.sea_mut(SeaSide::Right).bubbles.push(bubble(2));
        scene.stats.visible = true;
        scene.stats.set_width(StatsBar::Man, 60.0);

        scene.reset();

        assert_eq!(scene.pill(PillColor::Pink).phase, PillPhase::Idle);
        assert_eq!(scene.pill(PillColor::Pink).landing_offset, None);
        assert_eq!(scene.bubble_count(), 0);
        assert!(!scene.stats.visible);
        assert_eq!(scene.stats.width(StatsBar::Man), 0.0);
    }

    #[test]
    fn test_remove_bubble() {
        let mut sea = Sea::new(SeaSide::Left);
        sea.bubbles.push(bubble(1));
        sea.bubbles.push(bubble(2));
        assert!(sea.remove_bubble(1));
        assert!(!sea.remove_bubble(1));
        assert_eq!(sea.bubbles.len(), 1);
        assert_eq!(sea.bubbles[0].id, 2);
    }

    #[test]
    fn test_run_id_next() {
        assert_eq!(RunId::default().next(), RunId(1));
    }
}
