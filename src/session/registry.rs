//! Guild to [Session] mapping.
//!
//! A guild is in one of three states:
//! - idle: no entry.
//! - joining: `play` was accepted and the voice join is in flight.
//! - active: a [Session] is registered.
//!
//! Each operation holds the lock for its whole check-and-write, so two commands
//! for the same guild can't both get past a check.

use std::collections::HashMap;

use tokio::sync::Mutex;

use super::Session;
use super::SessionId;
use crate::error::UserError;
use crate::serenity::GuildId;

#[derive(Debug)]
enum Slot<C> {
    Joining,
    Active(Session<C>),
}

/// Holds at most one slot per guild.
#[derive(Debug)]
pub struct SessionRegistry<C> {
    #[allow(clippy::missing_docs_in_private_items)]
    slots: Mutex<HashMap<GuildId, Slot<C>>>,
}

impl<C> Default for SessionRegistry<C> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<C: Clone> SessionRegistry<C> {
    /// The active session of a guild, if there is one.
    pub async fn get(&self, guild: GuildId) -> Option<Session<C>> {
        let slots = self.slots.lock().await;
        match slots.get(&guild) {
            Some(Slot::Active(session)) => Some(session.clone()),
            _ => None,
        }
    }

    /// Mark a join as in flight. Fails if the guild isn't idle.
    pub async fn reserve(&self, guild: GuildId) -> Result<(), UserError> {
        let mut slots = self.slots.lock().await;
        if slots.contains_key(&guild) {
            return Err(UserError::AlreadyPlaying);
        }
        slots.insert(guild, Slot::Joining);
        Ok(())
    }

    /// Register an active session, replacing a join marker.
    /// Fails without touching the existing session if one is already active.
    pub async fn put(&self, guild: GuildId, session: Session<C>) -> Result<(), UserError> {
        let mut slots = self.slots.lock().await;
        if let Some(Slot::Active(_)) = slots.get(&guild) {
            return Err(UserError::AlreadyPlaying);
        }
        slots.insert(guild, Slot::Active(session));
        Ok(())
    }

    /// Drop a join marker after a failed join. Active sessions are left alone.
    pub async fn release(&self, guild: GuildId) {
        let mut slots = self.slots.lock().await;
        if let Some(Slot::Joining) = slots.get(&guild) {
            slots.remove(&guild);
        }
    }

    /// Remove and return the active session. A join marker is left alone.
    pub async fn remove(&self, guild: GuildId) -> Option<Session<C>> {
        let mut slots = self.slots.lock().await;
        match slots.remove(&guild) {
            Some(Slot::Active(session)) => Some(session),
            Some(Slot::Joining) => {
                slots.insert(guild, Slot::Joining);
                None
            }
            None => None,
        }
    }

    /// Remove the active session only if it's the one with `id`.
    pub async fn remove_if(&self, guild: GuildId, id: SessionId) -> Option<Session<C>> {
        let mut slots = self.slots.lock().await;
        match slots.get(&guild) {
            Some(Slot::Active(session)) if session.id() == id => match slots.remove(&guild) {
                Some(Slot::Active(session)) => Some(session),
                _ => None,
            },
            _ => None,
        }
    }

    /// Is a join in flight for this guild.
    #[cfg(test)]
    pub async fn is_joining(&self, guild: GuildId) -> bool {
        let slots = self.slots.lock().await;
        matches!(slots.get(&guild), Some(Slot::Joining))
    }

    /// Number of guilds that are joining or active.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }
}
