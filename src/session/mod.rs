//! Per-guild listening sessions.

mod registry;
pub mod time;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::serenity::ChannelId;

pub use registry::SessionRegistry;

/// Unique per process, used to tell a session apart from a newer one in the same guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SessionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One guild's active listening state.
///
/// Cloning is cheap and every clone refers to the same session,
/// the [CancellationToken] included.
#[derive(Debug, Clone)]
pub struct Session<C> {
    id: SessionId,
    /// Where replies for this session go.
    reply_channel: ChannelId,
    voice_channel: ChannelId,
    /// The voice connection audio is streamed into.
    connection: C,
    started_at: Instant,
    /// Cancelled when the session ends, which stops its playback loop.
    token: CancellationToken,
}

impl<C> Session<C> {
    /// Constructor for [Session], starting the clock now.
    pub fn new(reply_channel: ChannelId, voice_channel: ChannelId, connection: C) -> Self {
        Self {
            id: SessionId::next(),
            reply_channel,
            voice_channel,
            connection,
            started_at: Instant::now(),
            token: CancellationToken::new(),
        }
    }

    /// Identifies this session among every session of the process.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Text channel the session was started from.
    pub fn reply_channel(&self) -> ChannelId {
        self.reply_channel
    }

    /// Voice channel the bot joined.
    pub fn voice_channel(&self) -> ChannelId {
        self.voice_channel
    }

    /// The voice connection audio plays into.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Cancelled once the session has ended.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Listening time so far as `HH:MM:SS.mmm`.
    pub fn elapsed_string(&self) -> String {
        time::format_elapsed(self.started_at, Instant::now())
    }

    /// Signal the playback loop of this session to stop.
    pub fn end(&self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Session::new(ChannelId::new(1), ChannelId::new(2), ());
        let b = Session::new(ChannelId::new(1), ChannelId::new(2), ());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clones_share_the_token() {
        let session = Session::new(ChannelId::new(1), ChannelId::new(2), ());
        let clone = session.clone();
        session.end();
        assert!(clone.token().is_cancelled());
        assert_eq!(clone.id(), session.id());
    }
}
