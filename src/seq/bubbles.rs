//! Bubble geometry and spawn cadence
//!
//! All randomness comes from the sequencer's seeded RNG, so a run is
//! reproducible from its seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::SeaSide;
use crate::settings::BubbleSettings;

/// A bubble rising in a sea
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub id: u32,
    /// Diameter in px
    pub size: f64,
    /// Horizontal position in % of the sea width
    pub left_percent: f64,
    /// Rise animation length in seconds
    pub lifetime_secs: f64,
}

impl Bubble {
    /// Roll a bubble with randomized geometry
    pub fn random<R: Rng>(id: u32, rng: &mut R, cfg: &BubbleSettings) -> Self {
        Self {
            id,
            size: uniform(rng, cfg.size),
            left_percent: uniform(rng, cfg.left_percent),
            lifetime_secs: uniform(rng, cfg.lifetime_secs),
        }
    }

    /// Delay after spawn at which the bubble element is removed
    pub fn remove_after_ms(&self, cfg: &BubbleSettings) -> f64 {
        self.lifetime_secs * 1000.0 + cfg.remove_buffer_ms
    }
}

/// Delay before the next spawn attempt, in [min, min + jitter)
pub fn next_spawn_delay<R: Rng>(rng: &mut R, cfg: &BubbleSettings) -> f64 {
    rng.random::<f64>() * cfg.interval_jitter_ms + cfg.interval_min_ms
}

/// `min + random * (max - min)`
fn uniform<R: Rng>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    min + rng.random::<f64>() * (max - min)
}

/// A spawn loop for one sea
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleLoop {
    pub sea: SeaSide,
    /// Spawning stops once the clock passes this time
    pub end_at: f64,
}

impl BubbleLoop {
    pub fn new(sea: SeaSide, now: f64, duration: f64) -> Self {
        Self {
            sea,
            end_at: now + duration,
        }
    }

    /// Whether a spawn attempt at `now` should still produce a bubble
    pub fn is_active(&self, now: f64) -> bool {
        now <= self.end_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_loop_window_is_inclusive() {
        let lp = BubbleLoop::new(SeaSide::Left, 1000.0, 3000.0);
        assert!(lp.is_active(1000.0));
        assert!(lp.is_active(4000.0));
        assert!(!lp.is_active(4000.5));
    }

    #[test]
    fn test_remove_after_includes_buffer() {
        let cfg = BubbleSettings::default();
        let b = Bubble {
            id: 1,
            size: 10.0,
            left_percent: 50.0,
            lifetime_secs: 3.0,
        };
        assert_eq!(b.remove_after_ms(&cfg), 3080.0);
    }

    #[test]
    fn test_same_seed_same_bubbles() {
        let cfg = BubbleSettings::default();
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for id in 0..20 {
            assert_eq!(Bubble::random(id, &mut a, &cfg), Bubble::random(id, &mut b, &cfg));
        }
    }

    proptest! {
        #[test]
        fn bubble_geometry_in_range(seed in any::<u64>()) {
            let cfg = BubbleSettings::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let b = Bubble::random(1, &mut rng, &cfg);
            prop_assert!(b.size >= 6.0 && b.size <= 24.0);
            prop_assert!(b.left_percent >= 10.0 && b.left_percent <= 90.0);
            prop_assert!(b.lifetime_secs >= 2.4 && b.lifetime_secs <= 4.2);
        }

        #[test]
        fn spawn_delay_in_range(seed in any::<u64>()) {
            let cfg = BubbleSettings::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let d = next_spawn_delay(&mut rng, &cfg);
            prop_assert!((80.0..=260.0).contains(&d));
        }
    }
}
