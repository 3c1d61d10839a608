//! Voice calls through [songbird] and messages through [serenity].
//!
//! These are the production implementations of the traits in [crate::player::backend].

mod events;
mod source;

use std::sync::Arc;

use async_trait::async_trait;
use songbird::tracks::Track;
use songbird::tracks::TrackHandle;
use songbird::CoreEvent;
use songbird::Event;
use songbird::TrackEvent;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::player::backend::AudioSink;
use crate::player::backend::Messenger;
use crate::player::backend::TrackControl;
use crate::player::backend::TrackOutcome;
use crate::player::backend::VoiceGateway;
use crate::serenity;
use crate::serenity::ChannelId;
use crate::serenity::GuildId;
use crate::ChillError;
use events::DisconnectSignal;
use events::TrackSignal;

/// Convenience type alias for [songbird::Call].
pub type CallRef = Arc<Mutex<songbird::Call>>;
/// Convenience type alias for [songbird::Songbird].
type Manager = Arc<songbird::Songbird>;

/// Joins and leaves calls with the [songbird] manager.
pub struct SongbirdVoice {
    manager: Manager,
    /// Used by inputs to fetch audio. Uses an [Arc] internally.
    http: reqwest::Client,
}

impl SongbirdVoice {
    /// Constructor for [SongbirdVoice]
    pub fn new(manager: Manager, http: reqwest::Client) -> Self {
        Self { manager, http }
    }
}

#[async_trait]
impl VoiceGateway for SongbirdVoice {
    type Connection = SongbirdConnection;

    #[instrument(skip(self))]
    async fn join(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<SongbirdConnection, ChillError> {
        tracing::info!("Joining voice channel.");
        let call = self.manager.join(guild, channel).await?;

        let lost = CancellationToken::new();
        call.lock().await.add_global_event(
            Event::Core(CoreEvent::DriverDisconnect),
            DisconnectSignal::new(lost.clone()),
        );

        Ok(SongbirdConnection {
            call,
            http: self.http.clone(),
            lost,
        })
    }

    #[instrument(skip(self))]
    async fn leave(&self, guild: GuildId) -> Result<(), ChillError> {
        tracing::info!("Leaving voice channel.");
        self.manager.remove(guild).await?;
        Ok(())
    }
}

/// A joined call.
#[derive(Clone)]
pub struct SongbirdConnection {
    call: CallRef,
    http: reqwest::Client,
    /// Cancelled when the call's driver disconnects.
    lost: CancellationToken,
}

#[async_trait]
impl AudioSink for SongbirdConnection {
    type Track = SongbirdTrack;

    async fn play(&self, source: &str, volume: f32) -> Result<SongbirdTrack, ChillError> {
        tracing::debug!("Starting {source}");
        let input = source::input(self.http.clone(), source);
        let track = Track::new(input).volume(volume);

        let handle = {
            let mut call = self.call.lock().await;
            call.play_only(track)
        };

        // Fails if the track already ended, which only happens if it couldn't be played.
        let watch = |e: songbird::error::ControlError| ChillError::Stream {
            reason: format!("track ended before it could be watched ({e})"),
        };
        let (tx, outcomes) = mpsc::unbounded_channel();
        handle
            .add_event(Event::Track(TrackEvent::End), TrackSignal::new(tx.clone()))
            .map_err(watch)?;
        handle
            .add_event(Event::Track(TrackEvent::Error), TrackSignal::new(tx))
            .map_err(watch)?;

        Ok(SongbirdTrack { handle, outcomes })
    }

    async fn disconnected(&self) {
        self.lost.cancelled().await
    }
}

/// A playing track and the channel its end or error is reported on.
pub struct SongbirdTrack {
    handle: TrackHandle,
    outcomes: mpsc::UnboundedReceiver<TrackOutcome>,
}

#[async_trait]
impl TrackControl for SongbirdTrack {
    async fn outcome(&mut self) -> TrackOutcome {
        match self.outcomes.recv().await {
            Some(outcome) => outcome,
            // Both handlers were dropped without firing, the track is gone.
            None => TrackOutcome::Failed {
                reason: "track was dropped".to_string(),
            },
        }
    }

    fn stop(&self) -> Result<(), ChillError> {
        self.handle.stop()?;
        Ok(())
    }
}

/// Sends messages with the bot's [serenity::Http] client.
pub struct HttpMessenger {
    http: Arc<serenity::Http>,
}

impl HttpMessenger {
    /// Constructor for [HttpMessenger]
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    async fn say(&self, channel: ChannelId, content: String) -> Result<(), ChillError> {
        channel.say(self.http.as_ref(), content).await?;
        Ok(())
    }
}
