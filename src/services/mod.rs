//! Maps arbitrary media URLs onto the backend able to play them.

use std::sync::LazyLock;

use regex::Regex;

use crate::controllers::PlayerKind;

// Extension and URL patterns for the recognized backends. The file-extension
// sets mirror the ones react-player uses for its file player.
static AUDIO_EXTENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(m4a|m4b|mp4a|mpga|mp2|mp2a|mp3|m2a|m3a|wav|weba|aac|oga|spx)($|\?)")
        .unwrap()
});
static VIDEO_EXTENSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp4|og[gv]|webm|mov|m4v)(\#t=[,\d+]+)?($|\?)").unwrap());
static MATCH_URL_DAILYMOTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:https?):)?(?://)?(?:www\.)?(?:(?:dailymotion\.com(?:/embed)?/video)|dai\.ly)/([a-zA-Z0-9]+)(?:_[\w_-]+)?(?:[\w.\#_-]+)?",
    )
    .unwrap()
});
static MATCH_URL_NICONICO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:www\.|)?nicovideo\.jp/watch/(\w+)$").unwrap());
static MATCH_URL_SOUNDCLOUD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:soundcloud\.com|snd\.sc)/[^.]+$").unwrap());
static MATCH_URL_SPOTIFY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:open\.|)?spotify\.com/episode/(\w+)$").unwrap());
static MATCH_URL_TWITCH_VIDEO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:www\.|go\.)?twitch\.tv/videos/(\d+)($|\?)").unwrap());
static MATCH_URL_VIMEO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vimeo\.com/(\d+)$").unwrap());
static MATCH_URL_YOUTUBE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtu\.be/|youtube(?:-nocookie|education)?\.com/(?:embed/|v/|watch/|watch\?v=|watch\?.+&v=|shorts/|live/))((\w|-){11})|youtube\.com/playlist\?list=|youtube\.com/user/",
    )
    .unwrap()
});

/// A recognized media URL: which backend plays it and the id that backend
/// expects. For Audio, SoundCloud and Spotify the id is the URL itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoRef {
    pub kind: PlayerKind,
    pub video_id: String,
}

/// How one backend recognizes its URLs.
enum Matcher<'a> {
    /// The URL itself is the id when any of the patterns matches.
    RawUrl(&'a [&'a Regex]),
    /// The id is capture group 1. A match without that group (YouTube
    /// playlist and user URLs) recognizes the service but yields no id.
    Capture(&'a Regex),
}

/// Find the backend for `url`, if any. Probe order is fixed; the first match
/// wins.
///
/// Returns `None` both for URLs no service recognizes and for URLs a service
/// recognizes without being able to extract an id from.
pub fn resolve(url: &str) -> Option<VideoRef> {
    let services: [(PlayerKind, Matcher); 8] = [
        (
            PlayerKind::Audio,
            Matcher::RawUrl(&[&AUDIO_EXTENSIONS, &VIDEO_EXTENSIONS]),
        ),
        (PlayerKind::Dailymotion, Matcher::Capture(&MATCH_URL_DAILYMOTION)),
        (PlayerKind::Niconico, Matcher::Capture(&MATCH_URL_NICONICO)),
        (PlayerKind::SoundCloud, Matcher::RawUrl(&[&MATCH_URL_SOUNDCLOUD])),
        (PlayerKind::Spotify, Matcher::RawUrl(&[&MATCH_URL_SPOTIFY])),
        (PlayerKind::Twitch, Matcher::Capture(&MATCH_URL_TWITCH_VIDEO)),
        (PlayerKind::Vimeo, Matcher::Capture(&MATCH_URL_VIMEO)),
        (PlayerKind::YouTube, Matcher::Capture(&MATCH_URL_YOUTUBE)),
    ];

    for (kind, matcher) in &services {
        match matcher {
            Matcher::RawUrl(patterns) => {
                if patterns.iter().any(|pattern| pattern.is_match(url)) {
                    return Some(VideoRef {
                        kind: *kind,
                        video_id: url.to_string(),
                    });
                }
            }
            Matcher::Capture(pattern) => {
                if let Some(captures) = pattern.captures(url) {
                    return captures.get(1).map(|id| VideoRef {
                        kind: *kind,
                        video_id: id.as_str().to_string(),
                    });
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(url: &str) -> Option<PlayerKind> {
        resolve(url).map(|video| video.kind)
    }

    #[test]
    fn audio_matches_media_file_extensions() {
        let video = resolve("https://example.com/track.mp3").unwrap();
        assert_eq!(video.kind, PlayerKind::Audio);
        assert_eq!(video.video_id, "https://example.com/track.mp3");
        assert_eq!(kind_of("https://example.com/clip.mp4?x=1"), Some(PlayerKind::Audio));
        assert_eq!(kind_of("https://example.com/CLIP.MP3"), Some(PlayerKind::Audio));
    }

    #[test]
    fn dailymotion_extracts_the_video_id() {
        let video = resolve("https://www.dailymotion.com/video/x8v5kvp").unwrap();
        assert_eq!(video.kind, PlayerKind::Dailymotion);
        assert_eq!(video.video_id, "x8v5kvp");
        assert_eq!(kind_of("https://dai.ly/x8v5kvp"), Some(PlayerKind::Dailymotion));
    }

    #[test]
    fn niconico_extracts_the_watch_id() {
        let video = resolve("https://www.nicovideo.jp/watch/sm9").unwrap();
        assert_eq!(video.kind, PlayerKind::Niconico);
        assert_eq!(video.video_id, "sm9");
    }

    #[test]
    fn soundcloud_and_spotify_keep_the_raw_url() {
        let url = "https://soundcloud.com/artist/track";
        let video = resolve(url).unwrap();
        assert_eq!(video.kind, PlayerKind::SoundCloud);
        assert_eq!(video.video_id, url);

        let url = "https://open.spotify.com/episode/7makk4oTQel546B0PZlDM5";
        let video = resolve(url).unwrap();
        assert_eq!(video.kind, PlayerKind::Spotify);
        assert_eq!(video.video_id, url);
    }

    #[test]
    fn twitch_matches_video_pages_only() {
        let video = resolve("https://www.twitch.tv/videos/1948561196").unwrap();
        assert_eq!(video.kind, PlayerKind::Twitch);
        assert_eq!(video.video_id, "1948561196");
        assert_eq!(kind_of("https://www.twitch.tv/somechannel"), None);
    }

    #[test]
    fn vimeo_extracts_the_numeric_id() {
        let video = resolve("https://vimeo.com/76979871").unwrap();
        assert_eq!(video.kind, PlayerKind::Vimeo);
        assert_eq!(video.video_id, "76979871");
        assert_eq!(kind_of("https://vimeo.com/76979871/settings"), None);
    }

    #[test]
    fn youtube_extracts_the_eleven_character_id() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            let video = resolve(url).unwrap();
            assert_eq!(video.kind, PlayerKind::YouTube, "{}", url);
            assert_eq!(video.video_id, "dQw4w9WgXcQ", "{}", url);
        }
    }

    #[test]
    fn youtube_playlists_are_recognized_without_an_id() {
        // The service matches but no id can be extracted, so the URL
        // resolves to nothing and the caller shows the blank state.
        assert_eq!(
            resolve("https://www.youtube.com/playlist?list=PL0123456789"),
            None
        );
        assert_eq!(resolve("https://youtube.com/user/someone"), None);
    }

    #[test]
    fn unrecognized_urls_resolve_to_nothing() {
        assert_eq!(resolve("https://example.com/page.html"), None);
        assert_eq!(resolve("not a url"), None);
    }
}
