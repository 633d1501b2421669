use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::bindings::{NativeEvent, PlayerId};
use crate::wasm_bindgen;
use crate::Logger;

mod audio;
mod dailymotion;
pub(crate) mod dispatcher;
mod niconico;
mod null;
mod soundcloud;
mod spotify;
mod twitch;
mod vimeo;
mod youtube;

pub(crate) use dispatcher::{AdapterFactory, PlayerController};
pub(crate) use null::NullController;

/// One concrete third-party embedding technology.
///
/// Closed set: it selects both the adapter family and the native widget
/// constructor used by the JavaScript glue.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerKind {
    Audio = 0,
    Dailymotion = 1,
    Niconico = 2,
    SoundCloud = 3,
    Spotify = 4,
    Twitch = 5,
    Vimeo = 6,
    YouTube = 7,
}

impl PlayerKind {
    /// The vendor script that must have executed before the widget for this
    /// backend can be constructed. `None` for backends driven purely through
    /// an element (`<audio>`) or an iframe (Niconico).
    pub(crate) fn script_url(self) -> Option<&'static str> {
        match self {
            PlayerKind::Audio | PlayerKind::Niconico => None,
            PlayerKind::Dailymotion => Some("https://api.dmcdn.net/all.js"),
            PlayerKind::SoundCloud => Some("https://w.soundcloud.com/player/api.js"),
            PlayerKind::Spotify => Some("https://open.spotify.com/embed/iframe-api/v1"),
            PlayerKind::Twitch => Some("https://embed.twitch.tv/embed/v1.js"),
            PlayerKind::Vimeo => Some("https://player.vimeo.com/api/player.js"),
            PlayerKind::YouTube => Some("https://www.youtube.com/iframe_api"),
        }
    }

    /// Whether this backend's adapter implements `command`.
    ///
    /// Omissions are structural: the native APIs simply have no equivalent
    /// call (no playback-rate control on Dailymotion/Niconico/SoundCloud/
    /// Spotify, no volume or mute on Spotify's iframe API, no mute read-back
    /// on SoundCloud).
    pub(crate) fn supports(self, command: Command) -> bool {
        match command {
            Command::LoadVideo
            | Command::Play
            | Command::Pause
            | Command::SetCurrentTime
            | Command::GetDuration
            | Command::GetCurrentTime => true,
            Command::SetVolume | Command::SetMuted | Command::GetVolume => {
                self != PlayerKind::Spotify
            }
            Command::GetMuted => !matches!(self, PlayerKind::Spotify | PlayerKind::SoundCloud),
            Command::SetPlaybackRate | Command::GetPlaybackRate => matches!(
                self,
                PlayerKind::Audio | PlayerKind::Vimeo | PlayerKind::YouTube
            ),
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PlayerKind::Audio => "Audio",
            PlayerKind::Dailymotion => "Dailymotion",
            PlayerKind::Niconico => "Niconico",
            PlayerKind::SoundCloud => "SoundCloud",
            PlayerKind::Spotify => "Spotify",
            PlayerKind::Twitch => "Twitch",
            PlayerKind::Vimeo => "Vimeo",
            PlayerKind::YouTube => "YouTube",
        };
        write!(f, "{}", name)
    }
}

/// One operation of the uniform command set. Each backend supports a subset
/// (see `PlayerKind::supports`).
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    LoadVideo = 0,
    Play = 1,
    Pause = 2,
    SetCurrentTime = 3,
    SetVolume = 4,
    SetMuted = 5,
    SetPlaybackRate = 6,
    GetDuration = 7,
    GetCurrentTime = 8,
    GetVolume = 9,
    GetMuted = 10,
    GetPlaybackRate = 11,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Command::LoadVideo => "loadVideo",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::SetCurrentTime => "setCurrentTime",
            Command::SetVolume => "setVolume",
            Command::SetMuted => "setMuted",
            Command::SetPlaybackRate => "setPlaybackRate",
            Command::GetDuration => "getDuration",
            Command::GetCurrentTime => "getCurrentTime",
            Command::GetVolume => "getVolume",
            Command::GetMuted => "getMuted",
            Command::GetPlaybackRate => "getPlaybackRate",
        };
        write!(f, "{}", name)
    }
}

/// Contract violations surfaced by the dispatcher. These indicate a bug on
/// the calling side and are reported as hard failures, never absorbed.
#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ControllerError {
    #[error("player is not attached")]
    NotAttached,
    #[error("`{command}` is not supported by the {kind} player")]
    NotSupported { kind: PlayerKind, command: Command },
}

/// Payload of the `onLoaded` callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedEvent {
    pub id: String,
}

/// Playback progress, normalized to seconds and a [0, 1] fraction whatever
/// the backend's native unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeEvent {
    pub duration: f64,
    pub percent: f64,
    pub seconds: f64,
}

impl TimeEvent {
    pub(crate) const ZERO: TimeEvent = TimeEvent {
        duration: 0.,
        percent: 0.,
        seconds: 0.,
    };

    /// Builds a `TimeEvent` from already-normalized seconds, guarding the
    /// percent computation against a zero duration.
    pub(crate) fn from_position(duration: f64, seconds: f64) -> Self {
        TimeEvent {
            duration,
            percent: if duration == 0. { 0. } else { seconds / duration },
            seconds,
        }
    }
}

/// Callbacks through which translated widget events reach the embedding
/// application.
///
/// Contract: the same `PlayerOptions` value stays in place for the whole
/// attached lifetime of a controller; swapping it mid-flight would
/// invalidate the event wiring done at attach time.
#[derive(Default)]
pub struct PlayerOptions {
    pub on_error: Option<Box<dyn Fn(&str)>>,
    pub on_loaded: Option<Box<dyn Fn(&LoadedEvent)>>,
    pub on_play: Option<Box<dyn Fn()>>,
    pub on_pause: Option<Box<dyn Fn()>>,
    pub on_ended: Option<Box<dyn Fn()>>,
    pub on_time_update: Option<Box<dyn Fn(&TimeEvent)>>,
}

impl PlayerOptions {
    pub(crate) fn error(&self, payload: &str) {
        if let Some(cb) = &self.on_error {
            cb(payload);
        }
    }

    pub(crate) fn loaded(&self, id: &str) {
        if let Some(cb) = &self.on_loaded {
            cb(&LoadedEvent { id: id.to_string() });
        }
    }

    pub(crate) fn play(&self) {
        if let Some(cb) = &self.on_play {
            cb();
        }
    }

    pub(crate) fn pause(&self) {
        if let Some(cb) = &self.on_pause {
            cb();
        }
    }

    pub(crate) fn ended(&self) {
        if let Some(cb) = &self.on_ended {
            cb();
        }
    }

    pub(crate) fn time_update(&self, event: &TimeEvent) {
        if let Some(cb) = &self.on_time_update {
            cb(event);
        }
    }
}

/// How an adapter's `attach` resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttachOutcome {
    /// The widget accepts commands right away.
    Ready,
    /// The adapter waits for a backend-specific readiness signal; it will
    /// report it by returning `true` from `handle_event`.
    Pending,
}

/// Uniform adapter contract implemented once per backend.
///
/// A command reaching an adapter implies the backing widget exists and its
/// readiness signal has fired; the dispatcher enforces both, as well as the
/// capability check, so the default implementations for structurally-omitted
/// commands below are never reached through it.
pub(crate) trait PlayerApi {
    /// Register the native listeners translating widget events into the
    /// uniform callbacks. Called at most once per adapter instance.
    fn attach(&mut self, id: &str) -> AttachOutcome;

    /// Unregister everything `attach` installed. Must not fail when only
    /// partially attached.
    fn detach(&mut self);

    /// Translate one forwarded widget event. Returns `true` when the event
    /// completed a pending attach.
    fn handle_event(&mut self, event: &NativeEvent) -> bool;

    /// Translate one raw cross-window message (Niconico). Other backends
    /// never receive these.
    fn handle_message(&mut self, _origin: &str, _data: &str) -> bool {
        Logger::debug("unexpected cross-window message, ignoring");
        false
    }

    fn load_video(&mut self, id: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);

    fn set_volume(&mut self, _volume: f64) {}
    fn set_muted(&mut self, _muted: bool) {}
    fn set_playback_rate(&mut self, _rate: f64) {}

    fn duration(&self) -> Option<f64>;
    fn current_time(&self) -> Option<f64>;

    fn volume(&self) -> Option<f64> {
        None
    }
    fn muted(&self) -> Option<bool> {
        None
    }
    fn playback_rate(&self) -> Option<f64> {
        None
    }
}

/// Uniform surface the facade holds: either a live dispatcher or the null
/// controller stand-in.
pub(crate) trait ControllerHandle {
    fn load_video(&mut self, id: &str) -> Result<(), ControllerError>;
    fn play(&mut self) -> Result<(), ControllerError>;
    fn pause(&mut self) -> Result<(), ControllerError>;
    fn set_current_time(&mut self, seconds: f64) -> Result<(), ControllerError>;
    fn set_volume(&mut self, volume: f64) -> Result<(), ControllerError>;
    fn set_muted(&mut self, muted: bool) -> Result<(), ControllerError>;
    fn set_playback_rate(&mut self, rate: f64) -> Result<(), ControllerError>;
    fn duration(&self) -> Result<Option<f64>, ControllerError>;
    fn current_time(&self) -> Result<Option<f64>, ControllerError>;
    fn volume(&self) -> Result<Option<f64>, ControllerError>;
    fn muted(&self) -> Result<Option<bool>, ControllerError>;
    fn playback_rate(&self) -> Result<Option<f64>, ControllerError>;
    fn supports(&self, command: Command) -> bool;
}

/// Instantiate the adapter for `kind` around an already-constructed widget.
pub(crate) fn create_controller(
    kind: PlayerKind,
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
) -> Box<dyn PlayerApi> {
    match kind {
        PlayerKind::Audio => Box::new(audio::AudioController::new(player_id, options)),
        PlayerKind::Dailymotion => {
            Box::new(dailymotion::DailymotionController::new(player_id, options))
        }
        PlayerKind::Niconico => Box::new(niconico::NiconicoController::new(player_id, options)),
        PlayerKind::SoundCloud => {
            Box::new(soundcloud::SoundCloudController::new(player_id, options))
        }
        PlayerKind::Spotify => Box::new(spotify::SpotifyController::new(player_id, options)),
        PlayerKind::Twitch => Box::new(twitch::TwitchController::new(player_id, options)),
        PlayerKind::Vimeo => Box::new(vimeo::VimeoController::new(player_id, options)),
        PlayerKind::YouTube => Box::new(youtube::YouTubeController::new(player_id, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_rate_capability_matches_backend() {
        for kind in [PlayerKind::Audio, PlayerKind::Vimeo, PlayerKind::YouTube] {
            assert!(kind.supports(Command::SetPlaybackRate), "{}", kind);
            assert!(kind.supports(Command::GetPlaybackRate), "{}", kind);
        }
        for kind in [
            PlayerKind::Dailymotion,
            PlayerKind::Niconico,
            PlayerKind::SoundCloud,
            PlayerKind::Spotify,
        ] {
            assert!(!kind.supports(Command::SetPlaybackRate), "{}", kind);
            assert!(!kind.supports(Command::GetPlaybackRate), "{}", kind);
        }
    }

    #[test]
    fn spotify_has_no_volume_control() {
        assert!(!PlayerKind::Spotify.supports(Command::SetVolume));
        assert!(!PlayerKind::Spotify.supports(Command::SetMuted));
        assert!(!PlayerKind::Spotify.supports(Command::GetVolume));
        assert!(!PlayerKind::Spotify.supports(Command::GetMuted));
        assert!(PlayerKind::Spotify.supports(Command::Play));
        assert!(PlayerKind::Spotify.supports(Command::SetCurrentTime));
    }

    #[test]
    fn soundcloud_cannot_read_mute_back() {
        assert!(PlayerKind::SoundCloud.supports(Command::SetMuted));
        assert!(!PlayerKind::SoundCloud.supports(Command::GetMuted));
    }

    #[test]
    fn core_commands_supported_everywhere() {
        for kind in [
            PlayerKind::Audio,
            PlayerKind::Dailymotion,
            PlayerKind::Niconico,
            PlayerKind::SoundCloud,
            PlayerKind::Spotify,
            PlayerKind::Twitch,
            PlayerKind::Vimeo,
            PlayerKind::YouTube,
        ] {
            for command in [
                Command::LoadVideo,
                Command::Play,
                Command::Pause,
                Command::SetCurrentTime,
                Command::GetDuration,
                Command::GetCurrentTime,
            ] {
                assert!(kind.supports(command), "{} {}", kind, command);
            }
        }
    }

    #[test]
    fn percent_is_guarded_against_zero_duration() {
        let event = TimeEvent::from_position(0., 12.);
        assert_eq!(event.percent, 0.);
        let event = TimeEvent::from_position(200., 50.);
        assert_eq!(event.percent, 0.25);
    }
}
