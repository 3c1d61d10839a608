//! Implements the `help` command.
//!
//! The bot responds with an embed describing every command.

use itertools::Itertools;
use poise::CreateReply;
use serenity::CreateEmbed;
use tracing::instrument;

use crate::serenity;
use crate::ChillError;
use crate::Context;

/// Colour of the help embed.
const HELP_COLOUR: u32 = 0x65cdf1;

/// Every command and what it does, in display order.
const COMMANDS: [(&str, &str); 4] = [
    ("help", "Prints this message"),
    ("play", "Plays the song"),
    ("stop", "Stops the song and leaves"),
    ("time", "Displays listening time"),
];

/// Prints out the commands
#[instrument(skip(ctx, _rest))]
#[poise::command(prefix_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Ignored"]
    #[rest]
    _rest: Option<String>,
) -> Result<(), ChillError> {
    let embed = CreateEmbed::default()
        .colour(HELP_COLOUR)
        .title("Chill Music Commands")
        .description(description());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// One `name - description` line per command.
fn description() -> String {
    COMMANDS
        .iter()
        .map(|(name, about)| format!("{name} - {about}"))
        .join("\n")
}
