//! Configuration for running this bot.

use std::collections::HashSet;

use poise::Framework;
use serde::Deserialize;
use serde::Serialize;
use serenity::UserId;
use url::Url;

use crate::error::ConfigError;
use crate::player::logarithmic_volume;
use crate::player::PlaybackSettings;
use crate::player::VOLUME_LEVEL;
use crate::serenity;

/// The path to the config file
const CONFIG_PATH: &str = "config.toml";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Token needed to use a bot account.
    discord_token: String,

    /// See [MusicConfig]
    music: MusicConfig,

    /// See [LoggingConfig]
    logging: LoggingConfig,

    /// See [NotifyConfig]
    notifications: NotifyConfig,
}

impl Config {
    /// Tries to read [CONFIG_PATH] to extract a [Config].
    /// If a file doesn't exists, create the default config file and returns error.
    /// If a file exists but is empty, re-write the default values and return error.
    /// If a file exists but is incomplete or invalid, show error and don't change files.
    /// If file existance is indeterminent (e.g. missing permissions), return error.
    pub fn read() -> Result<Config, ConfigError> {
        let file = std::fs::read_to_string(CONFIG_PATH);

        match file {
            Ok(content) => {
                // Write default values to file if it's empty.
                if content.trim().is_empty() {
                    write_file(&Config::default())?;
                    Err(ConfigError::InvalidConfig {
                        reason: format!("Empty config file! Rewriting {CONFIG_PATH} ..."),
                    })
                } else {
                    Config::from_toml(&content)
                }
            }
            Err(file_error) => match file_error.kind() {
                std::io::ErrorKind::NotFound => {
                    let action = format!("Creating {CONFIG_PATH}, fill it in and restart.");
                    write_file(&Config::default())?;
                    Err(ConfigError::MissingConfig { action_msg: action })
                }
                _ => Err(ConfigError::IoError(file_error)),
            },
        }
    }

    /// Parse and validate the contents of a config file.
    /// Deserialization errors name the offending key.
    pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
        let to_toml = toml::Deserializer::new(content);
        let config: Config =
            serde_path_to_error::deserialize(to_toml).map_err(|error| {
                ConfigError::InvalidConfig {
                    reason: error.to_string(),
                }
            })?;
        config.music.validate()?;
        Ok(config)
    }

    /// Basic sanity check for if a token was given.
    pub fn token(&self) -> Result<&String, ConfigError> {
        let default_token = Config::default().discord_token;
        let given_token = &self.discord_token;

        let is_empty = given_token.trim().is_empty();
        let contains_default = given_token.contains(&default_token);

        if !is_empty && !contains_default {
            Ok(&self.discord_token)
        } else {
            Err(ConfigError::InvalidConfig {
                reason: "Missing discord token".to_string(),
            })
        }
    }

    /// The string commands must start with.
    pub fn prefix(&self) -> &str {
        &self.music.prefix
    }

    /// Settings for every playback loop.
    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            source: self.music.audio_url.clone(),
            volume: logarithmic_volume(VOLUME_LEVEL),
            max_stream_errors: self.music.max_stream_errors,
        }
    }

    /// Construct a bug notification notify list based on the config.
    /// Wrapper for [NotifyConfig::notify_list]
    pub fn notify_list<U, E>(&self, fw: &Framework<U, E>) -> HashSet<UserId> {
        self.notifications.notify_list(fw.options().owners.iter().copied())
    }

    /// Getter for log_dir.
    pub fn log_dir(&self) -> &str {
        &self.logging.log_dir
    }

    /// Is debug mode enabled for console logs
    pub fn console_debug(&self) -> bool {
        self.logging.console_debug
    }

    /// Is file logging enabled.
    pub fn logs_enabled(&self) -> bool {
        self.logging.logs_enabled
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: "put_token_here".to_string(),

            music: MusicConfig {
                prefix: "!".to_string(),
                audio_url: "https://www.youtube.com/watch?v=jfKfPfyJRdk".to_string(),
                max_stream_errors: 3,
            },

            logging: LoggingConfig {
                console_debug: false,
                logs_enabled: true,
                log_dir: "logs".to_string(),
            },

            notifications: NotifyConfig {
                enabled: false,
                add_owners: true,
                userids: vec![],
            },
        }
    }
}

/// What gets played and how commands are recognized.
#[derive(Debug, Serialize, Deserialize)]
struct MusicConfig {
    /// Messages starting with this are commands.
    prefix: String,
    /// The one song the bot plays. A youtube page or a direct audio stream.
    audio_url: String,
    /// Stream errors in a row before the bot gives up and leaves.
    max_stream_errors: u32,
}

impl MusicConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidConfig {
            reason: format!("music: {reason}"),
        };

        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(invalid("prefix must be non-empty and contain no whitespace"));
        }

        match Url::parse(&self.audio_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("audio_url must be an http(s) url")),
            Err(e) => return Err(invalid(&format!("audio_url is not a url ({e})"))),
        }

        if self.max_stream_errors == 0 {
            return Err(invalid("max_stream_errors must be at least 1"));
        }

        Ok(())
    }
}

/// Configs for logging
#[derive(Debug, Serialize, Deserialize)]
struct LoggingConfig {
    /// Print debug traces to console?
    console_debug: bool,
    /// Enable writing to log file?
    logs_enabled: bool,
    /// Directory to store log files
    log_dir: String,
}

/// Configs for notification behavior when encountering unexpected errors.
#[derive(Debug, Serialize, Deserialize)]
struct NotifyConfig {
    /// Enable this behavior or not. (bot sends a private message)
    enabled: bool,
    /// Whether to automatically add owners to the notify list.
    add_owners: bool,
    /// Additional users to add to the notify list.
    userids: Vec<UserId>,
}

impl NotifyConfig {
    /// Construct a bug notification notify list from the config and the bot owners.
    fn notify_list(&self, owners: impl IntoIterator<Item = UserId>) -> HashSet<UserId> {
        let mut notify_list = HashSet::new();

        // If disabled, don't add anyone to the list.
        if !self.enabled {
            return notify_list;
        }

        if self.add_owners {
            notify_list.extend(owners);
        }

        notify_list.extend(self.userids.iter().copied());

        notify_list
    }
}

/// Write the given config to [CONFIG_PATH].
fn write_file(config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidConfig {
        reason: e.to_string(),
    })?;
    std::fs::write(CONFIG_PATH, content).map_err(ConfigError::IoError)
}

#[cfg(test)]
mod test {
    use super::*;

    const VALID: &str = r#"
discord_token = "abc.def.ghi"

[music]
prefix = "~"
audio_url = "https://stream.example.com/lofi.mp3"
max_stream_errors = 5

[logging]
console_debug = true
logs_enabled = false
log_dir = "var/logs"

[notifications]
enabled = true
add_owners = false
userids = [1234]
"#;

    fn reason(result: Result<Config, ConfigError>) -> String {
        match result {
            Err(ConfigError::InvalidConfig { reason }) => reason,
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn parses_valid_config() {
        let config = Config::from_toml(VALID).unwrap();
        assert_eq!(config.token().unwrap(), "abc.def.ghi");
        assert_eq!(config.prefix(), "~");
        assert!(config.console_debug());
        assert!(!config.logs_enabled());
        assert_eq!(config.log_dir(), "var/logs");

        let settings = config.playback_settings();
        assert_eq!(settings.source, "https://stream.example.com/lofi.mp3");
        assert_eq!(settings.max_stream_errors, 5);
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn default_round_trips_but_has_no_token() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        let config = Config::from_toml(&content).unwrap();
        assert_eq!(config.prefix(), "!");
        assert!(config.token().is_err());
    }

    #[test]
    fn missing_key_is_named() {
        let content = VALID.replace("prefix = \"~\"\n", "");
        let reason = reason(Config::from_toml(&content));
        assert!(reason.contains("music"), "{reason}");
        assert!(reason.contains("prefix"), "{reason}");
    }

    #[test]
    fn rejects_bad_prefix() {
        let content = VALID.replace("prefix = \"~\"", "prefix = \"\"");
        assert!(reason(Config::from_toml(&content)).contains("prefix"));

        let content = VALID.replace("prefix = \"~\"", "prefix = \"m \"");
        assert!(reason(Config::from_toml(&content)).contains("prefix"));
    }

    #[test]
    fn rejects_bad_url() {
        let content = VALID.replace("https://stream.example.com/lofi.mp3", "lofi.mp3");
        assert!(reason(Config::from_toml(&content)).contains("audio_url"));

        let content = VALID.replace("https://stream.example.com/lofi.mp3", "ftp://example.com/a");
        assert!(reason(Config::from_toml(&content)).contains("audio_url"));
    }

    #[test]
    fn rejects_zero_error_cap() {
        let content = VALID.replace("max_stream_errors = 5", "max_stream_errors = 0");
        assert!(reason(Config::from_toml(&content)).contains("max_stream_errors"));
    }

    #[test]
    fn notify_list() {
        let owner = UserId::new(42);
        let config = Config::from_toml(VALID).unwrap();
        let list = config.notifications.notify_list([owner]);
        assert_eq!(list, HashSet::from([UserId::new(1234)]));

        let mut notifications = Config::default().notifications;
        assert!(notifications.notify_list([owner]).is_empty());
        notifications.enabled = true;
        assert_eq!(notifications.notify_list([owner]), HashSet::from([owner]));
    }
}
