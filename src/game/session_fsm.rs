use std::fmt;

use rust_fsm::state_machine;

/*
 * Setup
 * Round (one player describes, their team guesses)
 *    Timer expiry or a guess/skip on the last second ends the round
 *    Skipping the last eligible word ends the whole game
 * Round summary, then the next team takes over
 * Game over once every word has been skipped
 */
state_machine! {
    derive(Debug, Clone, PartialEq)
    pub SessionFsm(Setup)

    Setup => {
        StartGame => RoundActive,
    },
    RoundActive => {
        TimerExpired => RoundEnded,
        LastWordHandled => RoundEnded,
        PoolExhausted => GameOver,
    },
    RoundEnded => {
        NextRound => RoundActive,
        PoolExhausted => GameOver,
    }
}

impl fmt::Display for SessionFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
