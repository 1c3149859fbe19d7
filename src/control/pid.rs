//! PID controller for the workshop air temperature
//!
//! Fixed-sample-period PID with derivative on measurement, output and
//! integral clamping, and bumpless manual→automatic transfer.  `compute`
//! may be called far more often than the sample period; it only updates
//! the output once a full period has elapsed.

use crate::app::ports::FeedbackController;

/// PID controller
pub struct PidController {
    // Gains as configured, per second.
    kp: f32,
    ki: f32,
    kd: f32,
    setpoint: f32,
    input: f32,
    output: f32,
    /// Accumulated integral contribution (already scaled by ki).
    integral: f32,
    prev_input: f32,
    output_min: f32,
    output_max: f32,
    sample_secs: u32,
    /// Uptime of the last output update.  `None` until the first sample.
    last_sample_secs: Option<u64>,
    automatic: bool,
}

impl PidController {
    pub fn new(kp: f32, ki: f32, kd: f32, setpoint: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            setpoint,
            input: 0.0,
            output: 0.0,
            integral: 0.0,
            prev_input: 0.0,
            output_min: 0.0,
            output_max: 100.0,
            sample_secs: 1,
            last_sample_secs: None,
            automatic: false,
        }
    }

    /// Integral gain scaled to one sample period.
    fn ki_per_sample(&self) -> f32 {
        self.ki * self.sample_secs as f32
    }

    /// Derivative gain scaled to one sample period.
    fn kd_per_sample(&self) -> f32 {
        self.kd / self.sample_secs as f32
    }

    /// Seed internal state from the current output/input so switching to
    /// automatic does not kick the output.
    fn initialize(&mut self) {
        self.integral = self.output.clamp(self.output_min, self.output_max);
        self.prev_input = self.input;
    }
}

impl FeedbackController for PidController {
    fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.automatic {
            self.initialize();
        }
        self.automatic = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.automatic
    }

    fn set_setpoint(&mut self, setpoint: f32) {
        self.setpoint = setpoint;
    }

    fn setpoint(&self) -> f32 {
        self.setpoint
    }

    fn set_input(&mut self, input: f32) {
        self.input = input;
    }

    fn compute(&mut self, now_secs: u64) -> f32 {
        if !self.automatic {
            return self.output;
        }
        let due = self
            .last_sample_secs
            .is_none_or(|last| now_secs.saturating_sub(last) >= self.sample_secs as u64);
        if !due {
            return self.output;
        }

        let error = self.setpoint - self.input;

        // Integral (clamped for anti-windup)
        self.integral = (self.integral + self.ki_per_sample() * error)
            .clamp(self.output_min, self.output_max);

        // Derivative on measurement — setpoint steps do not kick
        let d_input = self.input - self.prev_input;

        self.output = (self.kp * error + self.integral - self.kd_per_sample() * d_input)
            .clamp(self.output_min, self.output_max);

        self.prev_input = self.input;
        self.last_sample_secs = Some(now_secs);
        self.output
    }

    fn output(&self) -> f32 {
        self.output
    }

    fn set_output_limits(&mut self, min: f32, max: f32) {
        if min >= max {
            return;
        }
        self.output_min = min;
        self.output_max = max;
        if self.automatic {
            self.output = self.output.clamp(min, max);
            self.integral = self.integral.clamp(min, max);
        }
    }

    fn set_sample_time(&mut self, secs: u32) {
        if secs > 0 {
            self.sample_secs = secs;
        }
    }
}
