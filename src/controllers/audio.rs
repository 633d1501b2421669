use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsGetPlayerBool, jsGetPlayerNumber,
    jsSetPlayerProperty, jsSetPlayerPropertyBool, jsSetPlayerSource, jsUnbindPlayerEvents,
    NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over a native `<audio>` element. The element's media API already
/// matches the uniform contract almost one-to-one, so this is mostly
/// property plumbing; the video id is the media URL itself.
pub(crate) struct AudioController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
}

impl AudioController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self { player_id, options }
    }
}

impl PlayerApi for AudioController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        // The element plays whatever its src attribute already points at.
        jsBindPlayerEvents(self.player_id, PlayerKind::Audio);
        AttachOutcome::Ready
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Audio);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "play" => self.options.play(),
            "pause" => self.options.pause(),
            "ended" => self.options.ended(),
            "error" => self.options.error(event.message().unwrap_or("media error")),
            "timeupdate" => {
                let duration = event.duration().unwrap_or(0.);
                let seconds = event.seconds().unwrap_or(0.);
                self.options
                    .time_update(&TimeEvent::from_position(duration, seconds));
            }
            other => Logger::lazy_debug(&|| format!("Audio: unhandled event {}", other)),
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        jsSetPlayerSource(self.player_id, id);
    }

    fn play(&mut self) {
        jsCallPlayerMethod(self.player_id, "play");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pause");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsSetPlayerProperty(self.player_id, "currentTime", seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        jsSetPlayerProperty(self.player_id, "volume", volume);
    }

    fn set_muted(&mut self, muted: bool) {
        jsSetPlayerPropertyBool(self.player_id, "muted", muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        jsSetPlayerProperty(self.player_id, "playbackRate", rate);
    }

    fn duration(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "duration")
    }

    fn current_time(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "currentTime")
    }

    fn volume(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "volume")
    }

    fn muted(&self) -> Option<bool> {
        jsGetPlayerBool(self.player_id, "muted")
    }

    fn playback_rate(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "playbackRate")
    }
}
