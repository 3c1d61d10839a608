//! Error types.
//!
//! [UserError] is anything a user can cause and should be told about.
//! [ChillError] wraps everything else and is the error type used by [poise].

use thiserror::Error;

use crate::serenity;

/// Top level error type.
#[derive(Error, Debug)]
pub enum ChillError {
    /// Errors caused by users, shown to them as a reply.
    #[error(transparent)]
    UserError(#[from] UserError),

    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),

    #[error("Failed to join voice channel: {0}")]
    Join(#[from] songbird::error::JoinError),

    #[error("Failed to control track: {0}")]
    Control(#[from] songbird::error::ControlError),

    /// The audio stream could not be started or broke while playing.
    #[error("Stream error: {reason}")]
    Stream { reason: String },

    #[error("Command panicked: {}", payload.as_deref().unwrap_or("no payload"))]
    Panic { payload: Option<String> },

    /// Something that should have been initialized on startup was missing.
    #[error("Missing from setup: {reason}")]
    MissingFromSetup { reason: String },
}

/// Errors that are reported back to the user.
/// The [Display](std::fmt::Display) text is the reply.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("You must be in a VC to listen to music!")]
    NotInVoice,

    /// The bot can't connect or speak in the author's voice channel.
    #[error("You're not cool enough to get music >:))")]
    MissingVoicePermissions,

    #[error("Already playing music!")]
    AlreadyPlaying,

    #[error("Not currently playing music! Use the `play` command to start music.")]
    NotPlaying,

    #[error("Error playing song!")]
    JoinFailed,

    #[error("{name} is not a command. Type help for more info!")]
    UnknownCommand { name: String },

    #[error("This command only works in a server.")]
    GuildOnly,
}

/// Errors while reading `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file missing. {action_msg}")]
    MissingConfig { action_msg: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
