use std::rc::Rc;

use serde::Deserialize;

use crate::bindings::{
    jsBindPlayerEvents, jsPostPlayerMessage, jsSetPlayerSource, jsUnbindPlayerEvents, NativeEvent,
    PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Origin of the embedded Niconico player; inbound messages from any other
/// origin are dropped and outbound messages are targeted at it.
const EMBED_ORIGIN: &str = "https://embed.nicovideo.jp";

const STATUS_PLAY: u32 = 2;
const STATUS_PAUSE: u32 = 3;
const STATUS_END: u32 = 4;

/// Inbound message kinds of the Niconico jsapi, tagged by `eventName`.
#[derive(Deserialize)]
#[serde(tag = "eventName")]
enum EmbedMessage {
    #[serde(rename = "playerStatusChange")]
    PlayerStatusChange { data: StatusData },
    #[serde(rename = "statusChange")]
    StatusChange { data: StatusData },
    #[serde(rename = "playerMetadataChange")]
    PlayerMetadataChange { data: MetadataData },
    #[serde(rename = "loadComplete")]
    LoadComplete { data: LoadCompleteData },
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "player-error:video:play")]
    PlayError,
    #[serde(rename = "player-error:video:seek")]
    SeekError,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct StatusData {
    #[serde(rename = "playerStatus")]
    player_status: u32,
}

/// Metadata ticks carry milliseconds; they feed the query mirror below.
#[derive(Deserialize)]
struct MetadataData {
    duration: Option<f64>,
    #[serde(rename = "currentTime")]
    current_time: Option<f64>,
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    muted: bool,
}

#[derive(Deserialize)]
struct LoadCompleteData {
    #[serde(rename = "videoInfo")]
    video_info: VideoInfo,
}

#[derive(Deserialize)]
struct VideoInfo {
    #[serde(rename = "watchId")]
    watch_id: String,
    #[serde(rename = "lengthInSeconds")]
    length_in_seconds: f64,
}

/// Builds one outbound jsapi message. The wire shape is fixed: `playerId`
/// must be the string `"1"`, not a number, and `sourceConnectorType` is 1.
fn command_message(event_name: &str, data: Option<serde_json::Value>) -> String {
    let mut message = serde_json::json!({
        "eventName": event_name,
        "playerId": "1",
        "sourceConnectorType": 1,
    });
    if let Some(data) = data {
        message["data"] = data;
    }
    message.to_string()
}

/// Payload of the outbound `seek` message. The jsapi expects milliseconds.
fn seek_data(seconds: f64) -> serde_json::Value {
    serde_json::json!({ "time": seconds * 1000. })
}

/// Adapter over the Niconico embedded iframe, driven entirely through the
/// cross-window message protocol of `embed.nicovideo.jp`.
///
/// The iframe never answers queries synchronously, so duration, position,
/// volume and mute are mirrored from `playerMetadataChange` ticks.
pub(crate) struct NiconicoController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
    duration: f64,
    current_time: f64,
    volume: f64,
    muted: bool,
}

impl NiconicoController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self {
            player_id,
            options,
            duration: 0.,
            current_time: 0.,
            volume: 0.,
            muted: false,
        }
    }

    fn post(&self, event_name: &str, data: Option<serde_json::Value>) {
        jsPostPlayerMessage(
            self.player_id,
            &command_message(event_name, data),
            EMBED_ORIGIN,
        );
    }

    fn reset_metadata(&mut self) {
        self.duration = 0.;
        self.current_time = 0.;
        self.volume = 0.;
        self.muted = false;
    }
}

impl PlayerApi for NiconicoController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        // The iframe src was set at construction; readiness is its load
        // signal, forwarded as a "load" event.
        jsBindPlayerEvents(self.player_id, PlayerKind::Niconico);
        AttachOutcome::Pending
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Niconico);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "load" => true,
            other => {
                Logger::lazy_debug(&|| format!("Niconico: unhandled event {}", other));
                false
            }
        }
    }

    fn handle_message(&mut self, origin: &str, data: &str) -> bool {
        if origin != EMBED_ORIGIN {
            return false;
        }

        let message: EmbedMessage = match serde_json::from_str(data) {
            Ok(message) => message,
            Err(err) => {
                Logger::lazy_debug(&|| format!("Niconico: unparsable message: {}", err));
                return false;
            }
        };

        match message {
            EmbedMessage::PlayerStatusChange { data } => {
                Logger::lazy_debug(&|| {
                    format!("Niconico: player status changed: {}", data.player_status)
                });
            }
            EmbedMessage::StatusChange { data } => {
                Logger::lazy_debug(&|| format!("Niconico: status changed: {}", data.player_status));
                match data.player_status {
                    STATUS_PLAY => self.options.play(),
                    STATUS_PAUSE => self.options.pause(),
                    STATUS_END => self.options.ended(),
                    _ => {}
                }
            }
            EmbedMessage::PlayerMetadataChange { data } => {
                if let Some(duration) = data.duration {
                    self.duration = duration / 1000.;
                }
                self.current_time = data.current_time.map_or(0., |ms| ms / 1000.);
                self.volume = data.volume;
                self.muted = data.muted;

                self.options.time_update(&TimeEvent {
                    duration: self.duration,
                    percent: if self.current_time != 0. && self.duration != 0. {
                        self.current_time / self.duration
                    } else {
                        0.
                    },
                    seconds: self.current_time,
                });
            }
            EmbedMessage::LoadComplete { data } => {
                Logger::debug("Niconico: load completed");
                self.duration = data.video_info.length_in_seconds;
                self.options.loaded(&data.video_info.watch_id);
            }
            EmbedMessage::Error | EmbedMessage::PlayError | EmbedMessage::SeekError => {
                self.options.error(data);
            }
            EmbedMessage::Other => {
                Logger::lazy_debug(&|| format!("Niconico: unhandled message: {}", data));
            }
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        self.reset_metadata();
        jsSetPlayerSource(
            self.player_id,
            &format!("{}/watch/{}?jsapi=1&playerId=1", EMBED_ORIGIN, id),
        );
    }

    fn play(&mut self) {
        self.post("play", None);
    }

    fn pause(&mut self) {
        self.post("pause", None);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.post("seek", Some(seek_data(seconds)));
    }

    fn set_volume(&mut self, volume: f64) {
        self.post("volumeChange", Some(serde_json::json!({ "volume": volume })));
    }

    fn set_muted(&mut self, muted: bool) {
        self.post("mute", Some(serde_json::json!({ "mute": muted })));
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.current_time)
    }

    fn volume(&self) -> Option<f64> {
        Some(self.volume)
    }

    fn muted(&self) -> Option<bool> {
        Some(self.muted)
    }
}
