//! Loops the configured audio source for one [Session].

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use super::backend::AudioSink;
use super::backend::Messenger;
use super::backend::TrackControl;
use super::backend::TrackOutcome;
use super::backend::VoiceGateway;
use super::PlaybackSettings;
use crate::serenity::GuildId;
use crate::session::Session;
use crate::session::SessionRegistry;

/// Plays the source into a session's connection until the session ends.
///
/// End of input restarts the source right away. Stream errors are retried
/// until [PlaybackSettings::max_stream_errors] happen in a row, then the
/// session is torn down and the reply channel is told once.
/// Losing the voice connection tears the session down quietly.
pub(super) struct PlaybackDriver<V: VoiceGateway, M> {
    pub guild: GuildId,
    pub session: Session<V::Connection>,
    pub registry: Arc<SessionRegistry<V::Connection>>,
    pub voice: Arc<V>,
    pub messenger: Arc<M>,
    pub settings: Arc<PlaybackSettings>,
}

impl<V: VoiceGateway, M: Messenger> PlaybackDriver<V, M> {
    /// Run the driver on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        let span = tracing::info_span!(
            "playback",
            guild = %self.guild,
            session = ?self.session.id()
        );
        tokio::spawn(self.run().instrument(span))
    }

    async fn run(self) {
        let token = self.session.token().clone();
        let connection = self.session.connection().clone();
        let source = self.settings.source.as_str();
        let volume = self.settings.volume;

        let mut failures = 0;
        loop {
            let started = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("Session ended before the track started.");
                    return;
                }
                _ = connection.disconnected() => {
                    self.lost_connection().await;
                    return;
                }
                started = connection.play(source, volume) => started,
            };

            let outcome = match started {
                Ok(mut track) => {
                    let event = tokio::select! {
                        biased;
                        _ = token.cancelled() => Event::Ended,
                        _ = connection.disconnected() => Event::Disconnected,
                        outcome = track.outcome() => Event::Outcome(outcome),
                    };
                    match event {
                        Event::Outcome(outcome) => outcome,
                        Event::Ended => {
                            tracing::debug!("Session ended, stopping track.");
                            stop_track(&track);
                            return;
                        }
                        Event::Disconnected => {
                            stop_track(&track);
                            self.lost_connection().await;
                            return;
                        }
                    }
                }
                Err(e) => TrackOutcome::Failed {
                    reason: e.to_string(),
                },
            };

            match outcome {
                TrackOutcome::Finished => {
                    tracing::debug!("Reached end of input, restarting.");
                    failures = 0;
                }
                TrackOutcome::Failed { reason } => {
                    failures += 1;
                    tracing::warn!(failures, "Stream error: {reason}");
                    if failures >= self.settings.max_stream_errors {
                        self.give_up(reason).await;
                        return;
                    }
                }
            }
        }
    }

    /// Leave the voice channel, then free the guild.
    /// The guild stays taken until the old connection is gone.
    /// Returns the session if it was still the registered one.
    async fn tear_down(&self) -> Option<Session<V::Connection>> {
        // Stopped by a command, which leaves by itself.
        if self.session.token().is_cancelled() {
            return None;
        }
        if let Err(e) = self.voice.leave(self.guild).await {
            tracing::warn!("Failed to leave voice channel. {e}");
        }
        let session = self.registry.remove_if(self.guild, self.session.id()).await?;
        session.end();
        Some(session)
    }

    /// Tear down the session after too many stream errors.
    /// Does nothing if the session was already replaced or stopped.
    async fn give_up(&self, reason: String) {
        let Some(session) = self.tear_down().await else {
            return;
        };
        tracing::error!("Giving up on playback after repeated stream errors.");

        let content = format!("Error playing: {reason}");
        if let Err(e) = self.messenger.say(session.reply_channel(), content).await {
            tracing::error!("Failed to report stream error. {e}");
        }
    }

    /// Tear down the session after the voice connection dropped.
    async fn lost_connection(&self) {
        if self.tear_down().await.is_some() {
            tracing::info!("Lost voice connection, session ended.");
        }
    }
}

/// What interrupted waiting on a track.
enum Event {
    Outcome(TrackOutcome),
    Ended,
    Disconnected,
}

/// Stop a track that may already be over.
fn stop_track<T: TrackControl>(track: &T) {
    if let Err(e) = track.stop() {
        tracing::debug!("Track already stopped. {e}");
    }
}
