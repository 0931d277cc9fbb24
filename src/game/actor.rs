use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::SendError;
use tokio::sync::oneshot::Sender as OneshotSender;
use tokio::sync::{
    broadcast, mpsc,
    mpsc::{Receiver, Sender, WeakSender},
};
use tokio::task::JoinHandle;
use tokio::time;

use crate::error::Error;
use crate::game::actor_client::SessionClient;
use crate::game::session_fsm::SessionFsmState;
use crate::game::GameSession;
use crate::persistence::SessionStore;
use crate::round::timer::{TimeBarColor, TimerTick};
use crate::team::{Team, TEAM_COUNT};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct SessionActor {
    session: GameSession,
    session_rx: Receiver<SessionCommand>,
    // Weak so that the clock task never keeps the command channel, and with
    // it the actor, alive after every client is gone.
    self_tx: WeakSender<SessionCommand>,
    broadcast_tx: broadcast::Sender<SessionWideEvent>,
    store: Arc<dyn SessionStore>,
    round_generation: u64,
    timer_task: Option<JoinHandle<()>>,
}

impl SessionActor {
    pub fn spawn(store: Arc<dyn SessionStore>) -> SessionClient {
        let session = match store.load() {
            Ok(Some(saved)) => {
                log::info!("Restoring the session found in the store.");
                GameSession::restore(saved)
            }
            Ok(None) => GameSession::new(),
            Err(error) => {
                log::error!("Could not read the session store, starting empty. Error: '{error}'.");
                GameSession::new()
            }
        };
        let (session_tx, session_rx): (Sender<SessionCommand>, Receiver<SessionCommand>) =
            mpsc::channel(128);
        let (broadcast_tx, _): (
            broadcast::Sender<SessionWideEvent>,
            broadcast::Receiver<SessionWideEvent>,
        ) = broadcast::channel(32);

        tokio::spawn(
            SessionActor {
                session,
                session_rx,
                self_tx: session_tx.downgrade(),
                broadcast_tx,
                store,
                round_generation: 0,
                timer_task: None,
            }
            .start(),
        );

        SessionClient { session_tx }
    }

    async fn start(mut self) {
        while let Some(command) = self.session_rx.recv().await {
            let (result, response_tx) = match command {
                SessionCommand::Subscribe { response_tx } => {
                    let broadcast_rx = self.broadcast_tx.subscribe();
                    if let Err(event) = response_tx.send(SessionEvent::Subscribed { broadcast_rx })
                    {
                        log::error!("Sent {event} to the client but the response channel is closed.");
                    }
                    // New subscribers get a snapshot right away; nothing
                    // changed, so there is nothing to save.
                    let _ = self.send_game_state();
                    continue;
                }
                SessionCommand::Configure {
                    team_names,
                    words,
                    response_tx,
                } => (
                    self.session
                        .configure(team_names, words)
                        .map(|_| SessionEvent::Ok),
                    response_tx,
                ),
                SessionCommand::Guess { response_tx } => {
                    (self.session.guess().map(|_| SessionEvent::Ok), response_tx)
                }
                SessionCommand::Skip { response_tx } => {
                    (self.session.skip().map(|_| SessionEvent::Ok), response_tx)
                }
                SessionCommand::AdvanceTeam { response_tx } => (
                    self.session.advance_team().map(|_| SessionEvent::Ok),
                    response_tx,
                ),
                SessionCommand::Tick { generation } => {
                    self.handle_tick(generation);
                    continue;
                }
                SessionCommand::TimerExpired { generation } => {
                    self.handle_timer_expired(generation);
                    continue;
                }
            };
            let event = match result {
                Ok(event) => event,
                Err(error) => SessionEvent::Error { error },
            };
            if let Err(event) = response_tx.send(event) {
                log::error!("Sent {event} to the client but the response channel is closed.");
            }
            let _ = self.send_game_state();
            self.persist();
            self.sync_timer();
        }

        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
        log::info!("Session channel has been dropped. Stopping session actor.");
    }

    fn handle_tick(&mut self, generation: u64) {
        if generation != self.round_generation {
            log::debug!("Ignoring a clock tick from a previous round. Generation: '{generation}'.");
            return;
        }
        match self.session.tick() {
            TimerTick::Idle => {}
            TimerTick::Running {
                remaining,
                low_time,
            } => {
                let _ = self.send_game_state();
                if low_time {
                    if let Err(error) = self
                        .broadcast_tx
                        .send(SessionWideEvent::LowTimeCue { remaining })
                    {
                        log::error!(
                            "Error when sending SessionWideEvent::LowTimeCue broadcast: {error}."
                        );
                    }
                }
            }
            TimerTick::Expired => {
                // The state goes out with the clock at zero before the expiry
                // is enqueued, so a guess or skip already in the queue still
                // lands inside the round.
                let _ = self.send_game_state();
                self.enqueue_timer_expired();
            }
        }
    }

    fn handle_timer_expired(&mut self, generation: u64) {
        if generation != self.round_generation {
            log::debug!(
                "Ignoring a timer expiry from a previous round. Generation: '{generation}'."
            );
            return;
        }
        if let Err(error) = self.session.on_timer_expired() {
            log::error!("Could not end the round on timer expiry. Error: '{error}'.");
        }
        let _ = self.send_game_state();
        self.persist();
        self.sync_timer();
    }

    fn enqueue_timer_expired(&self) {
        if let Some(session_tx) = self.self_tx.upgrade() {
            if let Err(error) = session_tx.try_send(SessionCommand::TimerExpired {
                generation: self.round_generation,
            }) {
                log::error!("Could not enqueue the timer expiry. Error: '{error}'.");
            }
        }
    }

    fn sync_timer(&mut self) {
        match (&self.timer_task, self.session.is_round_active()) {
            (None, true) => {
                self.round_generation += 1;
                self.timer_task = Some(self.spawn_timer());
            }
            (Some(_), false) => {
                if let Some(task) = self.timer_task.take() {
                    task.abort();
                }
            }
            _ => {}
        }
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let session_tx = self.self_tx.clone();
        let generation = self.round_generation;
        tokio::spawn(async move {
            let mut interval = time::interval(TICK_PERIOD);
            // A tokio interval fires immediately, consume that first tick so
            // the round gets its full first second.
            interval.tick().await;
            loop {
                interval.tick().await;
                match session_tx.upgrade() {
                    Some(session_tx) => {
                        if session_tx
                            .send(SessionCommand::Tick { generation })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    None => break,
                }
            }
        })
    }

    fn persist(&self) {
        if !self.session.has_started() {
            return;
        }
        if let Err(error) = self.store.save(&self.session.to_saved()) {
            log::error!("Could not save the session to the store. Error: '{error}'.");
        }
    }

    fn send_game_state(&self) -> Result<usize, SendError<SessionWideEvent>> {
        self.broadcast_tx.send(SessionWideEvent::GameState {
            state: self.session.state().clone(),
            teams: self.session.teams().to_vec(),
            current_team: self.session.current_team(),
            words: self.session.words().to_vec(),
            current_word: self.session.current_word().map(|word| word.to_string()),
            time_left: self.session.time_left(),
            time_bar: TimeBarColor::for_remaining(self.session.time_left()),
            round_active: self.session.is_round_active(),
            round_score: self.session.round_score(),
            scores: self.session.scores(),
        })
    }
}

pub(crate) enum SessionCommand {
    Subscribe {
        response_tx: OneshotSender<SessionEvent>,
    },
    Configure {
        team_names: [String; TEAM_COUNT],
        words: Vec<String>,
        response_tx: OneshotSender<SessionEvent>,
    },
    Guess {
        response_tx: OneshotSender<SessionEvent>,
    },
    Skip {
        response_tx: OneshotSender<SessionEvent>,
    },
    AdvanceTeam {
        response_tx: OneshotSender<SessionEvent>,
    },
    Tick {
        generation: u64,
    },
    TimerExpired {
        generation: u64,
    },
}

#[derive(Debug)]
pub(crate) enum SessionEvent {
    Subscribed {
        broadcast_rx: broadcast::Receiver<SessionWideEvent>,
    },
    Ok,
    Error {
        error: Error,
    },
}

impl Display for SessionEvent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                SessionEvent::Subscribed { .. } => "SessionEvent::Subscribed".to_string(),
                SessionEvent::Ok => "SessionEvent::Ok".to_string(),
                SessionEvent::Error { error } => format!("Error '{error}'").to_string(),
            }
        )
    }
}

#[derive(Clone, Debug)]
pub enum SessionWideEvent {
    GameState {
        state: SessionFsmState,
        teams: Vec<Team>,
        current_team: usize,
        words: Vec<String>,
        current_word: Option<String>,
        time_left: u8,
        time_bar: TimeBarColor,
        round_active: bool,
        round_score: u32,
        scores: [u32; TEAM_COUNT],
    },
    LowTimeCue {
        remaining: u8,
    },
}
