//! Implements the `stop` command.
//!
//! This stops the music, disconnects the bot from the voice channel
//! and tells the user how long they listened.

use tracing::instrument;

use crate::error::UserError;
use crate::ChillError;
use crate::Context;

/// Stops the song and leaves
#[instrument(skip(ctx, _rest), fields(guild = ?ctx.guild_id()))]
#[poise::command(prefix_command, guild_only)]
pub async fn stop(
    ctx: Context<'_>,
    #[description = "Ignored"]
    #[rest]
    _rest: Option<String>,
) -> Result<(), ChillError> {
    let guild = ctx.guild_id().ok_or(UserError::GuildOnly)?;
    let reply = ctx.data().jukebox.stop(guild).await?;
    ctx.say(reply).await?;
    Ok(())
}
