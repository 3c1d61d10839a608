//! The music player behind the commands.
//!
//! [Jukebox] owns the [SessionRegistry] and implements what `play`, `stop` and `time` do.
//! It only talks to Discord through the traits in [backend], so it can be tested
//! without a connection.

pub mod backend;
mod driver;
#[cfg(test)]
mod fake;

use std::fmt::Debug;
use std::sync::Arc;

use backend::Messenger;
use backend::VoiceGateway;
use driver::PlaybackDriver;

use crate::error::UserError;
use crate::serenity::ChannelId;
use crate::serenity::GuildId;
use crate::serenity::Permissions;
use crate::session::Session;
use crate::session::SessionRegistry;
use crate::ChillError;

/// Exponent used to turn a logarithmic volume level into a linear gain.
const LOG_VOLUME_EXPONENT: f32 = 1.660964;

/// Fixed playback level, unity gain.
pub const VOLUME_LEVEL: f32 = 1.0;

/// The bot needs both of these in the voice channel.
const VOICE_PERMISSIONS: Permissions = Permissions::CONNECT.union(Permissions::SPEAK);

/// Convert a logarithmic volume level to the linear gain songbird expects.
pub fn logarithmic_volume(level: f32) -> f32 {
    level.powf(LOG_VOLUME_EXPONENT)
}

/// Settings shared by every session's playback loop.
#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    /// The audio that gets looped.
    pub source: String,
    /// Linear gain.
    pub volume: f32,
    /// Consecutive stream errors before giving up on a session.
    pub max_stream_errors: u32,
}

/// Everything `play` needs to know about who asked.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub guild: GuildId,
    /// Where the command came from.
    pub reply_channel: ChannelId,
    /// The author's voice channel, `None` if they aren't in one.
    pub voice: Option<VoiceTarget>,
}

/// A voice channel and what the bot is allowed to do there.
#[derive(Debug, Clone)]
pub struct VoiceTarget {
    pub channel: ChannelId,
    pub bot_permissions: Permissions,
}

/// Per-guild music sessions.
pub struct Jukebox<V: VoiceGateway, M> {
    registry: Arc<SessionRegistry<V::Connection>>,
    voice: Arc<V>,
    messenger: Arc<M>,
    settings: Arc<PlaybackSettings>,
}

impl<V: VoiceGateway, M> Clone for Jukebox<V, M> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            voice: self.voice.clone(),
            messenger: self.messenger.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<V: VoiceGateway, M> Debug for Jukebox<V, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jukebox")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<V: VoiceGateway, M: Messenger> Jukebox<V, M> {
    /// Constructor for [Jukebox] with an empty registry.
    pub fn new(voice: V, messenger: M, settings: PlaybackSettings) -> Self {
        Self {
            registry: Default::default(),
            voice: Arc::new(voice),
            messenger: Arc::new(messenger),
            settings: Arc::new(settings),
        }
    }

    /// Join the author's voice channel and start looping the source.
    #[tracing::instrument(skip(self), fields(guild = %request.guild))]
    pub async fn play(&self, request: PlayRequest) -> Result<String, ChillError> {
        let guild = request.guild;
        let target = request.voice.ok_or(UserError::NotInVoice)?;

        if !target.bot_permissions.contains(VOICE_PERMISSIONS) {
            Err(UserError::MissingVoicePermissions)?
        }

        // Claim the guild before the join so a second `play` can't slip in.
        self.registry.reserve(guild).await?;

        let connection = match self.voice.join(guild, target.channel).await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("Failed to join voice channel. {e}");
                self.registry.release(guild).await;
                if let Err(e) = self.voice.leave(guild).await {
                    tracing::debug!("Nothing to clean up after failed join. {e}");
                }
                Err(UserError::JoinFailed)?
            }
        };

        let session = Session::new(request.reply_channel, target.channel, connection);
        self.registry.put(guild, session.clone()).await?;

        PlaybackDriver {
            guild,
            session,
            registry: self.registry.clone(),
            voice: self.voice.clone(),
            messenger: self.messenger.clone(),
            settings: self.settings.clone(),
        }
        .spawn();

        tracing::info!(
            "Started playing music. {} guild(s) listening.",
            self.registry.len().await
        );
        Ok("Started playing music :DD".to_string())
    }

    /// Stop playing, leave the voice channel and report the listening time.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self, guild: GuildId) -> Result<String, ChillError> {
        let session = self.registry.remove(guild).await.ok_or(UserError::NotPlaying)?;

        session.end();
        if let Err(e) = self.voice.leave(guild).await {
            tracing::warn!("Failed to leave voice channel. {e}");
        }

        let elapsed = session.elapsed_string();
        tracing::info!(channel = %session.voice_channel(), "Stopped music after {elapsed}.");
        Ok(format!("Stopped music! Play time: {elapsed}"))
    }

    /// Report the listening time of the current session.
    #[tracing::instrument(skip(self))]
    pub async fn time(&self, guild: GuildId) -> Result<String, ChillError> {
        let session = self.registry.get(guild).await.ok_or(UserError::NotPlaying)?;
        let elapsed = session.elapsed_string();
        Ok(format!("You've been listening to music for: {elapsed}"))
    }
}
