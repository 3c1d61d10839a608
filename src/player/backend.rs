//! Seams between the player and the outside world.
//!
//! Production implementations live in [crate::voice].

use async_trait::async_trait;

use crate::serenity::ChannelId;
use crate::serenity::GuildId;
use crate::ChillError;

/// Joins and leaves voice channels.
#[async_trait]
pub trait VoiceGateway: Send + Sync + 'static {
    /// The connection returned by a successful join.
    type Connection: AudioSink;

    async fn join(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Self::Connection, ChillError>;

    async fn leave(&self, guild: GuildId) -> Result<(), ChillError>;
}

/// A voice connection that audio can be streamed into.
#[async_trait]
pub trait AudioSink: Clone + Send + Sync + 'static {
    type Track: TrackControl;

    /// Start one pass of `source` at the given linear `volume`.
    async fn play(&self, source: &str, volume: f32) -> Result<Self::Track, ChillError>;

    /// Resolves once the voice connection drops, e.g. when the bot is kicked.
    async fn disconnected(&self);
}

/// A track that is currently playing.
#[async_trait]
pub trait TrackControl: Send + 'static {
    /// Wait until the track ends or breaks.
    async fn outcome(&mut self) -> TrackOutcome;

    /// Stop the track early.
    fn stop(&self) -> Result<(), ChillError>;
}

/// How a track stopped playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Reached the end of the input.
    Finished,
    /// The stream broke.
    Failed { reason: String },
}

/// Sends text to a channel outside of a command.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    async fn say(&self, channel: ChannelId, content: String) -> Result<(), ChillError>;
}
