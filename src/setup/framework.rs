//! Setup for [poise::Framework]

use crate::commands;
use crate::data::HttpKey;
use crate::player::Jukebox;
use crate::serenity;
use crate::voice::HttpMessenger;
use crate::voice::SongbirdVoice;
use crate::ChillError;
use crate::Config;
use crate::Data;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, ChillError>;

/// Construct a [poise::Framework]
pub(super) fn framework(config: Config) -> Framework {
    poise::Framework::builder()
        .options(framework_options(&config))
        .setup(|ctx, rdy, fw| framework_setup(ctx, rdy, fw, config))
        .build()
}

/// Configure options for the [Framework]
fn framework_options(config: &Config) -> poise::FrameworkOptions<Data, ChillError> {
    poise::FrameworkOptions {
        // Add commands to the framework
        commands: commands::list(),
        // Only `<prefix><command>` triggers a command, matched exactly.
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.prefix().to_string()),
            mention_as_prefix: false,
            case_insensitive_commands: false,
            ignore_bots: true,
            ..Default::default()
        },
        // Handle framework errors
        on_error: |e| crate::log::handle_framework_error(e),
        // Log when commands start
        pre_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Started '{cmd_name}' command from {user}.")
            })
        },
        // Log when finishing commands
        post_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Finished '{cmd_name}' command from {user}.")
            })
        },
        ..Default::default()
    }
}

/// Construct future that runs on startup
fn framework_setup<'a>(
    ctx: &'a serenity::Context,
    rdy: &'a serenity::Ready,
    fw: &'a Framework,
    config: Config,
) -> poise::BoxFuture<'a, Result<Data, ChillError>> {
    Box::pin(async move {
        let manager = songbird::get(ctx)
            .await
            .ok_or(ChillError::MissingFromSetup {
                reason: "Expecting songbird manager.".to_string(),
            })?;

        let http_client = ctx
            .data
            .read()
            .await
            .get::<HttpKey>()
            // Client internally uses an Arc, so this is cheap to clone
            .cloned()
            .ok_or(ChillError::MissingFromSetup {
                reason: "Expecting http client.".to_string(),
            })?;

        let jukebox = Jukebox::new(
            SongbirdVoice::new(manager, http_client),
            HttpMessenger::new(ctx.http.clone()),
            config.playback_settings(),
        );

        // Simple message that logs when the bot has initialized
        let bot_name = &rdy.user.name;
        let prefix = config.prefix();
        tracing::info!("{bot_name} is ready! Listening for '{prefix}' commands.");

        let notify_list = config.notify_list(fw);

        Ok(Data {
            notify_list,
            jukebox,
        })
    })
}
