//! Track and call event handling

use async_trait::async_trait;
use songbird::tracks::PlayMode;
use songbird::Event;
use songbird::EventContext;
use songbird::EventHandler;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::player::backend::TrackOutcome;

/// Forwards the end or failure of a track to whoever is waiting on it.
pub(super) struct TrackSignal {
    /// Where the outcome is sent.
    tx: UnboundedSender<TrackOutcome>,
}

impl TrackSignal {
    /// Constructor for [TrackSignal]
    pub fn new(tx: UnboundedSender<TrackOutcome>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventHandler for TrackSignal {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let outcome = match ctx {
            EventContext::Track(tracks) => tracks
                .iter()
                .find_map(|(state, _)| match &state.playing {
                    PlayMode::Errored(e) => Some(TrackOutcome::Failed {
                        reason: format!("{e:?}"),
                    }),
                    _ => None,
                })
                .unwrap_or(TrackOutcome::Finished),
            _ => TrackOutcome::Finished,
        };

        // Nobody listening means the track was already stopped.
        if self.tx.send(outcome).is_err() {
            tracing::trace!("Track outcome receiver already dropped.");
        }
        Some(Event::Cancel)
    }
}

/// Trips a token when the call's driver disconnects, e.g. when the bot is kicked
/// or its channel is deleted.
pub(super) struct DisconnectSignal {
    lost: CancellationToken,
}

impl DisconnectSignal {
    /// Constructor for [DisconnectSignal]
    pub fn new(lost: CancellationToken) -> Self {
        Self { lost }
    }
}

#[async_trait]
impl EventHandler for DisconnectSignal {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::DriverDisconnect(data) = ctx {
            tracing::info!(reason = ?data.reason, "Voice driver disconnected.");
        }
        self.lost.cancel();
        Some(Event::Cancel)
    }
}
