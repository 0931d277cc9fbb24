use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot::{self, Receiver as OneshotReceiver, Sender as OneshotSender};

use crate::error::Error;
use crate::game::actor::{SessionCommand, SessionEvent, SessionWideEvent};
use crate::team::TEAM_COUNT;

#[derive(Clone, Debug)]
pub struct SessionClient {
    pub(super) session_tx: Sender<SessionCommand>,
}

impl SessionClient {
    /// Opens a live feed of session-wide events. Every subscriber sees the
    /// same broadcasts, starting from the next one sent.
    pub async fn subscribe(&self) -> Result<SessionWideEventReceiver, Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::Subscribe { response_tx: tx })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "The session is not alive. Can't subscribe to it. Error: '{error}'."
                ))
            })?;

        match rx.await {
            Ok(SessionEvent::Subscribed { broadcast_rx }) => {
                Ok(SessionWideEventReceiver { broadcast_rx })
            }
            Ok(SessionEvent::Error { error }) => Err(error),
            _ => Err(Error::log_and_create_internal(
                "Sent a SessionCommand::Subscribe to the session, but the session channel died.",
            )),
        }
    }

    pub async fn configure(
        &self,
        team_names: [String; TEAM_COUNT],
        words: Vec<String>,
    ) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::Configure {
                team_names,
                words,
                response_tx: tx,
            })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Tried to send SessionCommand::Configure but the session actor is not listening. Error: '{error}'."
                ))
            })?;

        SessionClient::evaluate_response(rx, "SessionCommand::Configure").await
    }

    pub async fn guess(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::Guess { response_tx: tx })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Tried to send SessionCommand::Guess but the session actor is not listening. Error: '{error}'."
                ))
            })?;

        SessionClient::evaluate_response(rx, "SessionCommand::Guess").await
    }

    pub async fn skip(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::Skip { response_tx: tx })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Tried to send SessionCommand::Skip but the session actor is not listening. Error: '{error}'."
                ))
            })?;

        SessionClient::evaluate_response(rx, "SessionCommand::Skip").await
    }

    pub async fn advance_team(&self) -> Result<(), Error> {
        let (tx, rx): (OneshotSender<SessionEvent>, OneshotReceiver<SessionEvent>) =
            oneshot::channel();

        self.session_tx
            .send(SessionCommand::AdvanceTeam { response_tx: tx })
            .await
            .map_err(|error| {
                Error::log_and_create_internal(&format!(
                    "Tried to send SessionCommand::AdvanceTeam but the session actor is not listening. Error: '{error}'."
                ))
            })?;

        SessionClient::evaluate_response(rx, "SessionCommand::AdvanceTeam").await
    }

    async fn evaluate_response(
        rx: OneshotReceiver<SessionEvent>,
        command: &str,
    ) -> Result<(), Error> {
        match rx.await {
            Ok(SessionEvent::Ok) => Ok(()),
            Ok(SessionEvent::Error { error }) => Err(error),
            _ => Err(Error::log_and_create_internal(&format!(
                "Sent a {command} to the session, but the session channel died."
            ))),
        }
    }
}

pub struct SessionWideEventReceiver {
    broadcast_rx: broadcast::Receiver<SessionWideEvent>,
}

impl SessionWideEventReceiver {
    pub async fn next(&mut self) -> Result<SessionWideEvent, Error> {
        self.broadcast_rx.recv().await.map_err(|error| {
            Error::log_and_create_internal(&format!(
                "The broadcast channel with the session has been closed. Error: {error}."
            ))
        })
    }
}
