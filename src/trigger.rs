//! Run triggers
//!
//! Clicks and the window `load` event only set flags; the frame loop polls
//! them once per frame and starts at most one run.

use crate::consts::AUTOSTART_DELAY_MS;

/// Pending run requests, consumed by [`Triggers::poll`]
#[derive(Debug, Clone, PartialEq)]
pub struct Triggers {
    /// Replay requested (button/stage click)
    replay: bool,
    /// Window `load` fired, autostart not yet armed
    load_pending: bool,
    /// Frame time at which the load-triggered run starts
    autostart_at: Option<f64>,
    /// The user already started a run; the autostart never fires after that
    user_started: bool,
    autostart_delay: f64,
}

impl Default for Triggers {
    fn default() -> Self {
        Self::new(AUTOSTART_DELAY_MS)
    }
}

impl Triggers {
    pub fn new(autostart_delay: f64) -> Self {
        Self {
            replay: false,
            load_pending: false,
            autostart_at: None,
            user_started: false,
            autostart_delay,
        }
    }

    /// A click on the replay button or the stage
    pub fn request_replay(&mut self) {
        self.replay = true;
    }

    /// The window finished loading
    pub fn page_loaded(&mut self) {
        self.load_pending = true;
    }

    /// Frame time the autostart is armed for, if any
    pub fn autostart_at(&self) -> Option<f64> {
        self.autostart_at
    }

    /// Consume pending triggers at frame time `now`; true if a run should start
    pub fn poll(&mut self, now: f64) -> bool {
        if self.load_pending {
            self.load_pending = false;
            if !self.user_started {
                self.autostart_at = Some(now + self.autostart_delay);
            }
        }

        if self.replay {
            self.replay = false;
            self.user_started = true;
            self.autostart_at = None;
            return true;
        }

        match self.autostart_at {
            Some(at) if now >= at => {
                self.autostart_at = None;
                true
            }
            _ => false,
        }
    }
}
