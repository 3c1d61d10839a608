//! In-memory backends for testing the player.

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::backend::AudioSink;
use super::backend::Messenger;
use super::backend::TrackControl;
use super::backend::TrackOutcome;
use super::backend::VoiceGateway;
use crate::serenity::ChannelId;
use crate::serenity::GuildId;
use crate::ChillError;

/// Records joins and leaves.
/// Every join shares the script and counters of [FakeVoice::connection],
/// but gets its own disconnect signal.
#[derive(Default)]
pub struct FakeVoice {
    pub connection: FakeConnection,
    pub fail_join: AtomicBool,
    /// If set, each join waits for a permit.
    pub gate: Option<Arc<Semaphore>>,
    pub joins: AtomicUsize,
    pub leaves: AtomicUsize,
    /// Disconnect signal of the latest join.
    latest: Mutex<Option<CancellationToken>>,
}

impl FakeVoice {
    /// Joins block until a permit is added to [FakeVoice::gate].
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Default::default()
        }
    }

    /// Drop the latest connection as if the bot was kicked.
    pub fn kick(&self) {
        if let Some(lost) = self.latest.lock().unwrap().as_ref() {
            lost.cancel();
        }
    }
}

#[async_trait]
impl VoiceGateway for FakeVoice {
    type Connection = FakeConnection;

    async fn join(&self, _guild: GuildId, _channel: ChannelId) -> Result<FakeConnection, ChillError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(ChillError::MissingFromSetup {
                reason: "join refused".to_string(),
            });
        }
        self.joins.fetch_add(1, Ordering::SeqCst);
        let connection = FakeConnection {
            state: self.connection.state.clone(),
            lost: CancellationToken::new(),
        };
        *self.latest.lock().unwrap() = Some(connection.lost.clone());
        Ok(connection)
    }

    async fn leave(&self, _guild: GuildId) -> Result<(), ChillError> {
        self.leaves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// What the next call to [FakeConnection::play] does.
enum Step {
    Play(TrackOutcome),
    FailStart(String),
}

#[derive(Default)]
struct ConnectionState {
    script: Mutex<VecDeque<Step>>,
    sources: Mutex<Vec<String>>,
    volumes: Mutex<Vec<f32>>,
    plays: AtomicUsize,
    stops: AtomicUsize,
}

/// Plays scripted outcomes. Once the script runs out, tracks play forever.
#[derive(Clone, Default)]
pub struct FakeConnection {
    state: Arc<ConnectionState>,
    lost: CancellationToken,
}

impl FakeConnection {
    /// The next track ends with `outcome`.
    pub fn push(&self, outcome: TrackOutcome) {
        self.state.script.lock().unwrap().push_back(Step::Play(outcome));
    }

    /// The next track fails to start.
    pub fn fail_start(&self, reason: &str) {
        let step = Step::FailStart(reason.to_string());
        self.state.script.lock().unwrap().push_back(step);
    }

    pub fn plays(&self) -> usize {
        self.state.plays.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.state.stops.load(Ordering::SeqCst)
    }

    pub fn sources(&self) -> Vec<String> {
        self.state.sources.lock().unwrap().clone()
    }

    pub fn volumes(&self) -> Vec<f32> {
        self.state.volumes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSink for FakeConnection {
    type Track = FakeTrack;

    async fn play(&self, source: &str, volume: f32) -> Result<FakeTrack, ChillError> {
        self.state.plays.fetch_add(1, Ordering::SeqCst);
        self.state.sources.lock().unwrap().push(source.to_string());
        self.state.volumes.lock().unwrap().push(volume);

        let step = self.state.script.lock().unwrap().pop_front();
        match step {
            Some(Step::FailStart(reason)) => Err(ChillError::Stream { reason }),
            Some(Step::Play(outcome)) => Ok(FakeTrack {
                outcome: Some(outcome),
                state: self.state.clone(),
            }),
            None => Ok(FakeTrack {
                outcome: None,
                state: self.state.clone(),
            }),
        }
    }

    async fn disconnected(&self) {
        self.lost.cancelled().await
    }
}

pub struct FakeTrack {
    outcome: Option<TrackOutcome>,
    state: Arc<ConnectionState>,
}

#[async_trait]
impl TrackControl for FakeTrack {
    async fn outcome(&mut self) -> TrackOutcome {
        match self.outcome.take() {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }

    fn stop(&self) -> Result<(), ChillError> {
        self.state.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Keeps every message it was asked to send.
#[derive(Default)]
pub struct FakeMessenger {
    sent: Mutex<Vec<(ChannelId, String)>>,
    /// If set, each message waits for a permit before it counts as sent.
    pub gate: Option<Arc<Semaphore>>,
}

impl FakeMessenger {
    /// Messages block until a permit is added to [FakeMessenger::gate].
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn say(&self, channel: ChannelId, content: String) -> Result<(), ChillError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.sent.lock().unwrap().push((channel, content));
        Ok(())
    }
}
