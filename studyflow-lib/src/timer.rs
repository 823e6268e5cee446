//! Study timer state
//!
//! The timer only counts; something outside (a browser interval, a test)
//! calls [`Timer::tick`] once per elapsed second.

use shared::report::format_duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    running: bool,
    elapsed: i64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> i64 {
        self.elapsed
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pause without losing the count
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Advance one second if running
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed += 1;
        }
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed = 0;
    }

    /// Stop and hand over the count for saving, leaving the timer at zero.
    /// `None` when there is nothing to save.
    pub fn take_for_save(&mut self) -> Option<i64> {
        if self.elapsed < 1 {
            return None;
        }
        let seconds = self.elapsed;
        self.reset();
        Some(seconds)
    }

    /// Put back seconds whose save failed, on top of anything counted since
    pub fn restore_unsaved(&mut self, seconds: i64) {
        self.elapsed += seconds.max(0);
    }

    pub fn display(&self) -> String {
        format_duration(self.elapsed)
    }
}
