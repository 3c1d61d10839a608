//! Implements the `play` command.
//!
//! The bot joins the author's voice channel and loops the configured song
//! until someone uses `stop`.

use serenity::ChannelId;
use serenity::GuildId;
use serenity::Permissions;
use tracing::instrument;

use crate::error::UserError;
use crate::player::PlayRequest;
use crate::player::VoiceTarget;
use crate::serenity;
use crate::ChillError;
use crate::Context;

/// Plays the song
#[instrument(skip(ctx, _rest), fields(author = %ctx.author().name, guild = ?ctx.guild_id()))]
#[poise::command(prefix_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Ignored"]
    #[rest]
    _rest: Option<String>,
) -> Result<(), ChillError> {
    let request = play_request(&ctx).await?;
    let reply = ctx.data().jukebox.play(request).await?;
    ctx.say(reply).await?;
    Ok(())
}

/// Collect the author's voice channel and the bot's permissions there.
async fn play_request(ctx: &Context<'_>) -> Result<PlayRequest, ChillError> {
    let guild = ctx.guild_id().ok_or(UserError::GuildOnly)?;
    let author = ctx.author().id;

    let channel = {
        let cached = ctx.guild().ok_or(UserError::GuildOnly)?;
        cached
            .voice_states
            .get(&author)
            .and_then(|vs| vs.channel_id)
    };

    let voice = match channel {
        Some(channel) => Some(VoiceTarget {
            channel,
            bot_permissions: bot_permissions_in(ctx, guild, channel).await?,
        }),
        None => None,
    };

    Ok(PlayRequest {
        guild,
        reply_channel: ctx.channel_id(),
        voice,
    })
}

/// The bot's permissions in a channel of the guild.
async fn bot_permissions_in(
    ctx: &Context<'_>,
    guild: GuildId,
    channel: ChannelId,
) -> Result<Permissions, ChillError> {
    let bot_id = ctx.cache().current_user().id;

    let cached_member = {
        let cached = ctx.guild().ok_or(UserError::GuildOnly)?;
        cached.members.get(&bot_id).cloned()
    };
    // The bot's own member is usually cached, but not always.
    let member = match cached_member {
        Some(member) => member,
        None => guild.member(ctx, bot_id).await?,
    };

    let cached = ctx.guild().ok_or(UserError::GuildOnly)?;
    let channel = cached.channels.get(&channel).ok_or(UserError::NotInVoice)?;
    Ok(cached.user_permissions_in(channel, &member))
}
