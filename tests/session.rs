use std::sync::Arc;

use ghici::error::domain_error::DomainError;
use ghici::error::Error;
use ghici::game::actor::{SessionActor, SessionWideEvent};
use ghici::game::actor_client::{SessionClient, SessionWideEventReceiver};
use ghici::game::session_fsm::SessionFsmState;
use ghici::persistence::{MemoryStore, SavedSession, SessionStore};
use ghici::round::timer::TimeBarColor;
use ghici::team::{Team, TEAM_COUNT};

#[tokio::test]
async fn configure_broadcasts_the_initial_game_state() {
    let (client, mut events) = spawn_session().await;
    let state = receive_game_state(&mut events).await;
    assert_eq!(state.state, SessionFsmState::Setup);
    assert!(state.teams.is_empty());
    assert!(!state.round_active);

    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");

    let state = wait_for_state(&mut events, |state| state.round_active).await;
    assert_eq!(state.state, SessionFsmState::RoundActive);
    assert_eq!(state.current_team, 0);
    assert_eq!(state.teams.len(), 3);
    assert_eq!(state.teams.first().unwrap().name, "Lions");
    assert_eq!(state.time_left, 60);
    assert_eq!(state.time_bar, TimeBarColor { red: 0, green: 255 });
    assert_eq!(state.round_score, 0);
    assert_eq!(state.scores, [0, 0, 0]);
    let word = state.current_word.expect("A word should be on the table.");
    assert!(words().iter().any(|entry| entry.to_uppercase() == word));
}

#[tokio::test]
async fn a_full_round_flows_through_guesses_and_skips() {
    let (client, mut events) = spawn_session().await;
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    let state = wait_for_state(&mut events, |state| state.round_active).await;
    let first_word = state.current_word.expect("A word should be on the table.");

    client.guess().await.expect("Could not send the guess.");
    let state = wait_for_state(&mut events, |state| state.scores == [1, 0, 0]).await;
    assert_eq!(state.round_score, 1);
    assert_eq!(state.state, SessionFsmState::RoundActive);
    let second_word = state.current_word.expect("A word should be on the table.");

    client.skip().await.expect("Could not send the skip.");
    // The skipped word cannot be drawn again, so the next state shows a
    // different one.
    let state = wait_for_state(&mut events, |state| {
        state.current_word.as_deref() != Some(second_word.as_str())
    })
    .await;
    assert_eq!(state.scores, [1, 0, 0]);
    assert_eq!(state.round_score, 1);
    assert!(state.current_word.is_some());

    // Guessed words stay in the pool for the rest of the game.
    assert!(words()
        .iter()
        .any(|entry| entry.to_uppercase() == first_word));
    assert_eq!(state.words, words());
}

#[tokio::test]
async fn skipping_every_word_ends_the_game() {
    let (client, mut events) = spawn_session().await;
    client
        .configure(teams(), vec!["sun".to_string(), "moon".to_string()])
        .await
        .expect("Could not configure the session.");

    client.skip().await.expect("Could not send the first skip.");
    client.skip().await.expect("Could not send the second skip.");

    let state =
        wait_for_state(&mut events, |state| state.state == SessionFsmState::GameOver).await;
    assert!(!state.round_active);
    assert_eq!(state.current_word, None);
    assert_eq!(state.scores, [0, 0, 0]);
    // The word list itself survives for the final screen.
    assert_eq!(state.words.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn the_round_times_out_after_sixty_ticks() {
    let (client, mut events) = spawn_session().await;
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    let state = wait_for_state(&mut events, |state| state.round_active).await;
    assert_eq!(state.time_left, 60);

    // The clock reaches zero first; the round is still open for one last
    // guess at that point.
    let state = wait_for_state(&mut events, |state| state.time_left == 0).await;
    assert_eq!(state.state, SessionFsmState::RoundActive);
    assert!(!state.round_active);
    assert_eq!(state.time_bar, TimeBarColor { red: 255, green: 0 });

    let state =
        wait_for_state(&mut events, |state| state.state == SessionFsmState::RoundEnded).await;
    assert!(!state.round_active);
    assert_eq!(state.current_word, None);
    assert_eq!(state.scores, [0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn low_time_cues_fire_in_the_final_seconds() {
    let (client, mut events) = spawn_session().await;
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");

    let mut cues = Vec::new();
    for _ in 0..200 {
        match events.next().await.expect("The broadcast channel closed.") {
            SessionWideEvent::LowTimeCue { remaining } => cues.push(remaining),
            SessionWideEvent::GameState {
                state: SessionFsmState::RoundEnded,
                ..
            } => break,
            SessionWideEvent::GameState { .. } => {}
        }
    }

    assert_eq!(cues, vec![3, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn a_new_round_starts_for_the_next_team() {
    let (client, mut events) = spawn_session().await;
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    client.guess().await.expect("Could not send the guess.");
    wait_for_state(&mut events, |state| state.state == SessionFsmState::RoundEnded).await;

    client
        .advance_team()
        .await
        .expect("Could not advance to the next team.");

    let state = wait_for_state(&mut events, |state| state.round_active).await;
    assert_eq!(state.current_team, 1);
    assert_eq!(state.time_left, 60);
    assert_eq!(state.round_score, 0);
    assert_eq!(state.scores, [1, 0, 0]);
    assert!(state.current_word.is_some());

    // The clock runs again for the new team.
    let state = wait_for_state(&mut events, |state| state.time_left == 59).await;
    assert_eq!(state.current_team, 1);
}

#[tokio::test]
async fn the_session_resumes_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    let (client, mut events) = spawn_session_with_store(store.clone()).await;
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    client.guess().await.expect("Could not send the guess.");
    wait_for_state(&mut events, |state| state.scores == [1, 0, 0]).await;

    assert_eq!(
        store.load().expect("Could not read the store."),
        Some(SavedSession {
            teams: teams(),
            words: words(),
            scores: [1, 0, 0],
        })
    );
    drop(client);

    let (_client, mut events) = spawn_session_with_store(store).await;
    let state = receive_game_state(&mut events).await;
    assert_eq!(state.state, SessionFsmState::Setup);
    assert!(!state.round_active);
    assert_eq!(
        state
            .teams
            .iter()
            .map(|team| team.name.clone())
            .collect::<Vec<String>>(),
        teams()
    );
    assert_eq!(state.words, words());
    assert_eq!(state.scores, [1, 0, 0]);
}

#[tokio::test]
async fn a_failing_store_does_not_stop_the_game() {
    let (client, mut events) = spawn_session_with_store(Arc::new(FailingStore)).await;

    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    client.guess().await.expect("Could not send the guess.");

    let state = wait_for_state(&mut events, |state| state.scores == [1, 0, 0]).await;
    assert_eq!(state.state, SessionFsmState::RoundActive);
    assert_eq!(state.round_score, 1);
}

#[tokio::test]
async fn configure_rejects_blank_team_names_through_the_client() {
    let (client, mut events) = spawn_session().await;

    let result = client
        .configure(
            ["Lions".to_string(), "  ".to_string(), "Bears".to_string()],
            words(),
        )
        .await;

    assert_eq!(result, Err(Error::Domain(DomainError::BlankTeamName(1))));

    // The session is still usable after the rejection.
    client
        .configure(teams(), words())
        .await
        .expect("Could not configure the session.");
    let state = wait_for_state(&mut events, |state| state.round_active).await;
    assert_eq!(state.current_team, 0);
}

async fn spawn_session() -> (SessionClient, SessionWideEventReceiver) {
    spawn_session_with_store(Arc::new(MemoryStore::new())).await
}

async fn spawn_session_with_store(
    store: Arc<dyn SessionStore>,
) -> (SessionClient, SessionWideEventReceiver) {
    let client = SessionActor::spawn(store);
    let events = client
        .subscribe()
        .await
        .expect("Could not subscribe to the session.");
    (client, events)
}

fn teams() -> [String; TEAM_COUNT] {
    ["Lions", "Tigers", "Bears"].map(|name| name.to_string())
}

fn words() -> Vec<String> {
    vec!["sun".to_string(), "moon".to_string(), "star".to_string()]
}

async fn receive_game_state(events: &mut SessionWideEventReceiver) -> State {
    match events.next().await {
        Ok(event) => as_state(event).expect("Expected a game state but got a low time cue."),
        Err(error) => panic!("The broadcast channel returned an error {error}."),
    }
}

async fn wait_for_state(
    events: &mut SessionWideEventReceiver,
    predicate: impl Fn(&State) -> bool,
) -> State {
    for _ in 0..200 {
        if let Some(state) = as_state(
            events
                .next()
                .await
                .expect("The broadcast channel closed while waiting for a game state."),
        ) {
            if predicate(&state) {
                return state;
            }
        }
    }
    panic!("No game state matched the predicate after 200 events.");
}

fn as_state(event: SessionWideEvent) -> Option<State> {
    match event {
        SessionWideEvent::GameState {
            state,
            teams,
            current_team,
            words,
            current_word,
            time_left,
            time_bar,
            round_active,
            round_score,
            scores,
        } => Some(State {
            state,
            teams,
            current_team,
            words,
            current_word,
            time_left,
            time_bar,
            round_active,
            round_score,
            scores,
        }),
        SessionWideEvent::LowTimeCue { .. } => None,
    }
}

struct State {
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
}

struct FailingStore;

impl SessionStore for FailingStore {
    fn save(&self, _session: &SavedSession) -> Result<(), Error> {
        Err(Error::Store("the backend is down".to_string()))
    }

    fn load(&self) -> Result<Option<SavedSession>, Error> {
        Ok(None)
    }
}
