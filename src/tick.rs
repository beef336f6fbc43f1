/// Something driven by the periodic one-second tick.
pub trait Tickable {
    fn tick(&mut self);
}

/// Amount a running timer advances on every tick, in 1/256 second units.
pub const TICK_INCREMENT: u16 = 256;

/// A countdown timer polled once per tick.
///
/// The timer counts up from its start value in [`TICK_INCREMENT`] steps and expires once it reaches
/// the limit passed to [`StpTimer::expired`]. Stopping only clears the active flag, so there is
/// nothing to cancel between polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StpTimer {
    active: bool,
    value: u16,
}

impl StpTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the timer with an initial elapsed value.
    pub fn start(&mut self, value: u16) {
        self.value = value;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.value = 0;
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Elapsed time in 1/256 second units.
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Advances an active timer by one tick. Returns true, and stops the timer, once the elapsed
    /// value reaches `limit`.
    pub fn expired(&mut self, limit: u16) -> bool {
        if !self.active {
            return false;
        }

        self.value = self.value.saturating_add(TICK_INCREMENT);
        if self.value >= limit {
            self.stop();
            return true;
        }

        false
    }
}
