pub mod actor;
pub mod actor_client;
pub mod session_fsm;

use rust_fsm::StateMachine;

use crate::error::domain_error::DomainError;
use crate::error::Error;
use crate::game::session_fsm::{SessionFsm, SessionFsmInput, SessionFsmState};
use crate::persistence::SavedSession;
use crate::round::timer::TimerTick;
use crate::round::Round;
use crate::score_ledger::ScoreLedger;
use crate::team::{Team, TEAM_COUNT};
use crate::word_pool::WordPool;

/// One complete game from setup to game over: the word pool, the cumulative
/// scores, the round on the table and the rotation across the three teams.
///
/// All operations are synchronous; the embedding layer (see `actor`) is in
/// charge of serializing them and of pacing the clock ticks.
pub struct GameSession {
    fsm: StateMachine<SessionFsm>,
    teams: Vec<Team>,
    word_pool: WordPool,
    scores: ScoreLedger,
    round: Round,
    current_team: usize,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            fsm: StateMachine::default(),
            teams: Vec::default(),
            word_pool: WordPool::default(),
            scores: ScoreLedger::default(),
            round: Round::default(),
            current_team: 0,
        }
    }

    /// Rebuilds a session from a saved snapshot: teams, words and cumulative
    /// scores are pre-filled, the session itself restarts at setup. A round
    /// that was in progress when the snapshot was taken is not part of it.
    pub fn restore(saved: SavedSession) -> Self {
        let mut session = GameSession::new();
        if let Err(error) = session.word_pool.load(saved.words) {
            log::warn!("The saved session has no usable words. They will have to be uploaded again. Error: '{error}'.");
        }
        session.teams = saved.teams.into_iter().map(Team::new).collect();
        session.scores = ScoreLedger::restore(saved.scores);
        session
    }

    pub fn state(&self) -> &SessionFsmState {
        self.fsm.state()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn current_team(&self) -> usize {
        self.current_team
    }

    pub fn words(&self) -> &[String] {
        self.word_pool.words()
    }

    pub fn skipped_count(&self) -> usize {
        self.word_pool.skipped_count()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.round.current_word()
    }

    pub fn time_left(&self) -> u8 {
        self.round.time_left()
    }

    pub fn is_round_active(&self) -> bool {
        self.round.is_active()
    }

    pub fn round_score(&self) -> u32 {
        self.round.score()
    }

    pub fn scores(&self) -> [u32; TEAM_COUNT] {
        self.scores.snapshot()
    }

    pub fn has_started(&self) -> bool {
        self.state() != &SessionFsmState::Setup
    }

    /// The durable slice of the session: teams, words and cumulative scores.
    /// Skipped words and the round in progress are not saved.
    pub fn to_saved(&self) -> SavedSession {
        SavedSession {
            teams: self
                .teams
                .iter()
                .map(|team| team.name.clone())
                .collect::<Vec<String>>()
                .try_into()
                .expect("The session has exactly three teams once the game has started."),
            words: self.word_pool.words().to_vec(),
            scores: self.scores.snapshot(),
        }
    }

    /// Validates the setup form and starts the first round for the first
    /// team. Cumulative scores are kept as they are so that a session
    /// restored from the store keeps the prior totals.
    pub fn configure(
        &mut self,
        team_names: [String; TEAM_COUNT],
        words: Vec<String>,
    ) -> Result<(), Error> {
        if self.state() != &SessionFsmState::Setup {
            return Err(Error::Domain(DomainError::InvalidStateForConfiguration(
                self.state().clone(),
                SessionFsmState::Setup,
            )));
        }
        for (index, name) in team_names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::Domain(DomainError::BlankTeamName(index)));
            }
        }
        self.word_pool.load(words)?;
        self.teams = team_names.into_iter().map(Team::new).collect();
        self.current_team = 0;
        self.process_event(&SessionFsmInput::StartGame)
    }

    /// The current team guessed the word: one point on the ledger, one on the
    /// round counter, and the next word goes on the table. A guess landing
    /// exactly when the clock shows zero still counts and closes the round.
    pub fn guess(&mut self) -> Result<(), Error> {
        if self.state() != &SessionFsmState::RoundActive {
            log::warn!(
                "Ignoring a guess outside of an active round. State: '{}'.",
                self.state()
            );
            return Ok(());
        }
        self.scores.increment(self.current_team);
        self.round.record_guess();
        self.resolve_current_word()
    }

    /// The current team gave up on the word: it leaves the pool for the rest
    /// of the session, no score changes. Skipping the last eligible word ends
    /// the game on the spot.
    pub fn skip(&mut self) -> Result<(), Error> {
        if self.state() != &SessionFsmState::RoundActive {
            log::warn!(
                "Ignoring a skip outside of an active round. State: '{}'.",
                self.state()
            );
            return Ok(());
        }
        if let Some(word) = self.round.current_word() {
            self.word_pool.mark_skipped(word);
        }
        self.resolve_current_word()
    }

    /// Advances the clock by one unit. The caller feeds `on_timer_expired`
    /// back in when `TimerTick::Expired` comes out; keeping the two steps
    /// separate is what allows a guess or skip to land in between.
    pub fn tick(&mut self) -> TimerTick {
        self.round.tick()
    }

    /// The expiry notification for the running round. Idempotent: once the
    /// round has ended through a zero-boundary guess or skip, or the game is
    /// over, the notification is ignored.
    pub fn on_timer_expired(&mut self) -> Result<(), Error> {
        if self.state() != &SessionFsmState::RoundActive {
            log::debug!(
                "Ignoring a timer expiry outside of an active round. State: '{}'.",
                self.state()
            );
            return Ok(());
        }
        self.process_event(&SessionFsmInput::TimerExpired)
    }

    /// Rotates to the next team and starts its round, or ends the game when
    /// no eligible word is left. Only valid from the round summary.
    pub fn advance_team(&mut self) -> Result<(), Error> {
        if self.state() != &SessionFsmState::RoundEnded {
            return Err(Error::Domain(DomainError::InvalidStateForNextRound(
                self.state().clone(),
                SessionFsmState::RoundEnded,
            )));
        }
        self.current_team = (self.current_team + 1) % TEAM_COUNT;
        if self.word_pool.is_exhausted() {
            self.process_event(&SessionFsmInput::PoolExhausted)
        } else {
            self.process_event(&SessionFsmInput::NextRound)
        }
    }

    fn process_event(&mut self, event: &SessionFsmInput) -> Result<(), Error> {
        match self.fsm.consume(event) {
            Ok(_) => match self.fsm.state() {
                SessionFsmState::RoundActive => self.start_round(),
                SessionFsmState::RoundEnded => {
                    self.round.clear_current_word();
                    Ok(())
                }
                SessionFsmState::GameOver => {
                    self.round.halt();
                    Ok(())
                }
                SessionFsmState::Setup => Ok(()),
            },
            Err(error) => Err(Error::log_and_create_internal(&format!(
                "The fsm in state {:?} can't transition with an event {:?}. Error: '{error}'.",
                self.fsm.state(),
                event
            ))),
        }
    }

    fn start_round(&mut self) -> Result<(), Error> {
        self.round.start();
        self.draw_next_word()
    }

    // Exhaustion is detected here, on the draw attempt, no matter whether the
    // round was just starting or already running. Both cases converge on the
    // same game-over transition.
    fn draw_next_word(&mut self) -> Result<(), Error> {
        match self.word_pool.draw() {
            Some(word) => {
                self.round.set_current_word(word);
                Ok(())
            }
            None => self.process_event(&SessionFsmInput::PoolExhausted),
        }
    }

    fn resolve_current_word(&mut self) -> Result<(), Error> {
        if self.round.time_left() > 0 {
            self.draw_next_word()
        } else {
            self.process_event(&SessionFsmInput::LastWordHandled)
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        GameSession::new()
    }
}
