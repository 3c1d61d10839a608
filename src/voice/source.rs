//! Picks how the configured url is streamed.

use songbird::input::HttpRequest;
use songbird::input::Input;
use songbird::input::YoutubeDl;
use url::Url;

/// Youtube pages go through yt-dlp, anything else is streamed as is.
pub fn input(client: reqwest::Client, source: &str) -> Input {
    if is_youtube(source) {
        YoutubeDl::new(client, source.to_string()).into()
    } else {
        HttpRequest::new(client, source.to_string()).into()
    }
}

/// Does the url point at a youtube page.
fn is_youtube(source: &str) -> bool {
    let Ok(url) = Url::parse(source) else {
        return false;
    };
    match url.host_str() {
        Some(host) => {
            host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com")
        }
        None => false,
    }
}
