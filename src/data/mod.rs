//! This module contains everything relating to [Data].

use std::collections::HashSet;

use reqwest::Client;
use serenity::UserId;

use crate::player::Jukebox;
use crate::serenity;
use crate::voice::HttpMessenger;
use crate::voice::SongbirdVoice;

/// The [Jukebox] used by the running bot.
pub type Player = Jukebox<SongbirdVoice, HttpMessenger>;

/// The data kept between shards
#[derive(Debug)]
pub struct Data {
    /// List of users to send bug notifications
    pub notify_list: HashSet<UserId>,
    /// Per-guild music sessions
    pub jukebox: Player,
}

/// Key to store a [Client] in a [TypeMapKey](serenity::prelude::TypeMapKey)
pub struct HttpKey;
impl serenity::prelude::TypeMapKey for HttpKey {
    type Value = Client;
}
