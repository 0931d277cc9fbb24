//! Engine for a timed word-guessing party game: three teams take turns
//! describing words against a sixty second clock, skipped words drain the
//! shared pool until the game is over.
//!
//! The rules live in [`game::GameSession`]; [`game::actor::SessionActor`]
//! wraps them in a command loop that paces the clock and persists the
//! session through a [`persistence::SessionStore`].

pub mod error;
pub mod game;
pub mod persistence;
pub mod round;
pub mod score_ledger;
pub mod team;
pub mod word_pool;
