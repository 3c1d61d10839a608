//! Implements the `time` command.

use tracing::instrument;

use crate::error::UserError;
use crate::ChillError;
use crate::Context;

/// Displays listening time
#[instrument(skip(ctx, _rest), fields(guild = ?ctx.guild_id()))]
#[poise::command(prefix_command, guild_only)]
pub async fn time(
    ctx: Context<'_>,
    #[description = "Ignored"]
    #[rest]
    _rest: Option<String>,
) -> Result<(), ChillError> {
    let guild = ctx.guild_id().ok_or(UserError::GuildOnly)?;
    let reply = ctx.data().jukebox.time(guild).await?;
    ctx.say(reply).await?;
    Ok(())
}
