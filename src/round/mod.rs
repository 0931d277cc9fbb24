pub mod timer;

use self::timer::{RoundTimer, TimerTick};

/// State of the round currently on the table: the word being described, the
/// guesses scored so far this round and the countdown driving it.
#[derive(Debug, Clone, Default)]
pub struct Round {
    timer: RoundTimer,
    current_word: Option<String>,
    score: u32,
}

impl Round {
    /// Begins a fresh round: zeroes the round score, restarts the clock and
    /// forgets the previous word. The first word is drawn by the caller.
    pub fn start(&mut self) {
        self.timer.start();
        self.current_word = None;
        self.score = 0;
    }

    pub fn set_current_word(&mut self, word: String) {
        self.current_word = Some(word);
    }

    pub fn clear_current_word(&mut self) {
        self.current_word = None;
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn record_guess(&mut self) {
        self.score += 1;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick(&mut self) -> TimerTick {
        self.timer.tick()
    }

    pub fn time_left(&self) -> u8 {
        self.timer.remaining()
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active()
    }

    /// Ends the round early: stops the clock and drops the in-flight word.
    /// Used when the pool runs dry mid-round.
    pub fn halt(&mut self) {
        self.timer.stop();
        self.current_word = None;
    }
}
