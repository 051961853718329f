//! Virtual-clock timeline
//!
//! A min-heap of steps keyed by (due time, insertion order). Nothing here
//! reads a real clock; callers decide what "now" is.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::plan::Step;
use super::state::RunId;

/// A step waiting on the timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub at: f64,
    pub run: RunId,
    pub step: Step,
    order: u64,
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the earliest step first
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Pending steps ordered by due time
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    heap: BinaryHeap<Scheduled>,
    next_order: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a step at an absolute time
    pub fn schedule(&mut self, at: f64, run: RunId, step: Step) {
        let order = self.next_order;
        self.next_order += 1;
        self.heap.push(Scheduled {
            at,
            run,
            step,
            order,
        });
    }

    /// Pop the earliest step if it is due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Scheduled> {
        if self.next_due()? <= now {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Due time of the earliest pending step
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|s| s.at)
    }

    /// Drop every step not belonging to `run`; returns how many were dropped
    pub fn retain_run(&mut self, run: RunId) -> usize {
        let before = self.heap.len();
        self.heap.retain(|s| s.run == run);
        before - self.heap.len()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::state::PillColor;

    #[test]
    fn test_pops_in_time_then_insertion_order() {
        let mut tl = Timeline::new();
        let run = RunId(1);
        tl.schedule(500.0, run, Step::RevealStats);
        tl.schedule(100.0, run, Step::FillOverlay { pill: PillColor::Blue });
        tl.schedule(100.0, run, Step::FillOverlay { pill: PillColor::Pink });
        tl.schedule(300.0, run, Step::Drop);

        let order: Vec<Step> = std::iter::from_fn(|| tl.pop_due(1000.0))
            .map(|s| s.step)
            .collect();
        assert_eq!(
            order,
            vec![
                Step::FillOverlay { pill: PillColor::Blue },
                Step::FillOverlay { pill: PillColor::Pink },
                Step::Drop,
                Step::RevealStats,
            ]
        );
        assert!(tl.is_empty());
    }

    #[test]
    fn test_pop_due_respects_now() {
        let mut tl = Timeline::new();
        tl.schedule(200.0, RunId(1), Step::Drop);
        assert!(tl.pop_due(199.9).is_none());
        assert_eq!(tl.next_due(), Some(200.0));
        assert!(tl.pop_due(200.0).is_some());
        assert_eq!(tl.next_due(), None);
    }

    #[test]
    fn test_retain_run() {
        let mut tl = Timeline::new();
        tl.schedule(100.0, RunId(1), Step::Drop);
        tl.schedule(200.0, RunId(1), Step::RevealStats);
        tl.schedule(150.0, RunId(2), Step::Drop);
        assert_eq!(tl.retain_run(RunId(2)), 2);
        assert_eq!(tl.len(), 1);
        assert_eq!(tl.pop_due(f64::MAX).map(|s| s.run), Some(RunId(2)));
    }
}
