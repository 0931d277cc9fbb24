/// Every round runs on the same fixed clock.
pub const ROUND_SECONDS: u8 = 60;

/// The audio cue kicks in when this many seconds remain.
pub const LOW_TIME_SECONDS: u8 = 3;

/// Countdown clock for one round. It only moves when `tick` is called, so the
/// pacing (one tick per wall-clock second) is the caller's job.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    remaining: u8,
    active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTick {
    /// The clock is not running, nothing happened.
    Idle,
    /// One second elapsed. `low_time` is the audio-cue side channel for the
    /// closing seconds of the round.
    Running { remaining: u8, low_time: bool },
    /// The clock just reached zero. Reported exactly once per started round.
    Expired,
}

impl RoundTimer {
    pub fn start(&mut self) {
        self.remaining = ROUND_SECONDS;
        self.active = true;
    }

    pub fn tick(&mut self) -> TimerTick {
        if !self.active {
            return TimerTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            TimerTick::Expired
        } else {
            TimerTick::Running {
                remaining: self.remaining,
                low_time: self.remaining <= LOW_TIME_SECONDS,
            }
        }
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Default for RoundTimer {
    fn default() -> Self {
        RoundTimer {
            remaining: ROUND_SECONDS,
            active: false,
        }
    }
}

/// Color of the time progress bar, part of the presentation contract: the bar
/// fades linearly from green at 60 seconds to red at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBarColor {
    pub red: u8,
    pub green: u8,
}

impl TimeBarColor {
    pub fn for_remaining(remaining: u8) -> Self {
        let remaining = remaining.min(ROUND_SECONDS);
        let green = (remaining as u16 * 255 / ROUND_SECONDS as u16) as u8;
        TimeBarColor {
            red: 255 - green,
            green,
        }
    }
}
