//! Builds the client from a [Config].

mod config;
mod framework;

use songbird::SerenityInit;

use crate::data::HttpKey;
use crate::serenity;
use crate::ChillError;

pub use config::Config;

/// Constructs a [serenity::Client] with initialized [songbird] and [reqwest::Client].
pub(super) async fn client(config: Config) -> Result<serenity::Client, ChillError> {
    // Get discord token from config file
    let token = config.token()?.clone();

    // Prefix commands need to read message content.
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework::framework(config))
        .register_songbird()
        .type_map_insert::<HttpKey>(reqwest::Client::new())
        .await?;

    Ok(client)
}
