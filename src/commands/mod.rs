//! Bot commands.
//!
//! All commands are prefix commands, e.g. `!play` with the default prefix.
//! Only the first word picks the command, anything after it is ignored.
//! Unknown commands are answered in [crate::log::handle_framework_error].

mod help;
mod play;
mod stop;
mod time;

use crate::{ChillError, Data};

/// Convenient type alias for [poise::Command].
pub type Command = poise::Command<Data, ChillError>;

/// Lists all the implemented commands
pub fn list() -> Vec<Command> {
    vec![help::help(), play::play(), stop::stop(), time::time()]
}
