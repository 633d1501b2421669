use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodBool, jsCallPlayerMethodNumber,
    jsCallPlayerMethodString, jsGetPlayerBool, jsGetPlayerNumber, jsUnbindPlayerEvents,
    NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over the Twitch embed player. Getters are synchronous on that
/// widget, so queries go straight through instead of being mirrored.
pub(crate) struct TwitchController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
}

impl TwitchController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self { player_id, options }
    }
}

impl PlayerApi for TwitchController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        jsBindPlayerEvents(self.player_id, PlayerKind::Twitch);
        AttachOutcome::Ready
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Twitch);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            // The glue attaches `getVideo()` to the READY event.
            "ready" => {
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
            }
            "playing" => self.options.play(),
            "pause" => self.options.pause(),
            "ended" => self.options.ended(),
            // The native SEEK event carries no position; a zero time event
            // is emitted so listeners still observe that a seek happened.
            "seek" => self.options.time_update(&TimeEvent::ZERO),
            other => Logger::lazy_debug(&|| format!("Twitch: unhandled event {}", other)),
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        // setVideo also takes a start timestamp; the glue passes 0.
        jsCallPlayerMethodString(self.player_id, "setVideo", id);
    }

    fn play(&mut self) {
        jsCallPlayerMethod(self.player_id, "play");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pause");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsCallPlayerMethodNumber(self.player_id, "seek", seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        jsCallPlayerMethodNumber(self.player_id, "setVolume", volume);
    }

    fn set_muted(&mut self, muted: bool) {
        jsCallPlayerMethodBool(self.player_id, "setMuted", muted);
    }

    fn duration(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getDuration")
    }

    fn current_time(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getCurrentTime")
    }

    fn volume(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getVolume")
    }

    fn muted(&self) -> Option<bool> {
        jsGetPlayerBool(self.player_id, "getMuted")
    }
}
