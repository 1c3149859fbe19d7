//! One-shot countdown timers over the monotonic uptime source.
//!
//! A [`Countdown`] is armed with a duration relative to "now" and reports
//! expired once the uptime reaches its deadline.  It stays expired until
//! rearmed; there is no cancel.  Callers pass the current uptime in, so the
//! same timer works against the ESP32 system timer and a test clock.

/// Countdown timer in whole seconds of uptime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    /// Uptime (s) at which the countdown reaches zero.  Zero when never
    /// armed, which reads as already expired.
    deadline_secs: u64,
}

impl Countdown {
    pub const fn new() -> Self {
        Self { deadline_secs: 0 }
    }

    /// (Re)start the countdown: it expires `duration_secs` after `now_secs`.
    pub fn arm(&mut self, now_secs: u64, duration_secs: u32) {
        self.deadline_secs = now_secs.saturating_add(duration_secs as u64);
    }

    /// True once `now_secs` has reached the deadline.
    pub fn expired(&self, now_secs: u64) -> bool {
        now_secs >= self.deadline_secs
    }

    /// Seconds left before expiry (0 once expired).
    pub fn remaining(&self, now_secs: u64) -> u64 {
        self.deadline_secs.saturating_sub(now_secs)
    }
}
