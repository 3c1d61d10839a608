//! A discord bot that joins your voice channel and loops one chill song.

mod commands;
mod data;
mod error;
mod log;
mod player;
mod session;
mod setup;
mod voice;

use std::process::ExitCode;

use poise::serenity_prelude as serenity;

pub use data::Data;
pub use error::ChillError;
pub use setup::Config;

/// Convenient type alias, the only [poise::Context] used.
type Context<'a> = poise::Context<'a, Data, ChillError>;

#[tokio::main]
async fn main() -> ExitCode {
    // Tracing isn't installed until the config is read.
    let config = match Config::read() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Dropping the guard flushes file logs, keep it until exit.
    let _guard = log::install_tracing(&config);

    let mut client = match setup::client(config).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create client. {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = client.start().await {
        tracing::error!("Client stopped. {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
