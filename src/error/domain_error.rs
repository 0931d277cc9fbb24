use thiserror::Error;

use crate::game::session_fsm::SessionFsmState;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("The team name cannot be blank. TeamIndex: '{0}'.")]
    BlankTeamName(usize),
    #[error("The word list cannot be empty.")]
    EmptyWordList,
    #[error("Invalid state for configuring the session. ActualState: '{0:?}', ExpectedState: '{1:?}'.")]
    InvalidStateForConfiguration(SessionFsmState, SessionFsmState),
    #[error(
        "Invalid state for advancing to the next team. ActualState: '{0:?}', ExpectedState: '{1:?}'."
    )]
    InvalidStateForNextRound(SessionFsmState, SessionFsmState),
}
