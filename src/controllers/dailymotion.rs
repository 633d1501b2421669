use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodBool, jsCallPlayerMethodNumber,
    jsCallPlayerMethodString, jsGetPlayerBool, jsGetPlayerNumber, jsUnbindPlayerEvents,
    NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over the Dailymotion `DM.player` widget.
///
/// The constructor is synchronous enough that attach resolves immediately;
/// `apiready` then announces the loaded video. No playback-rate control in
/// the native API.
pub(crate) struct DailymotionController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
}

impl DailymotionController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self { player_id, options }
    }
}

impl PlayerApi for DailymotionController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        jsBindPlayerEvents(self.player_id, PlayerKind::Dailymotion);
        AttachOutcome::Ready
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Dailymotion);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "apiready" => {
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
            }
            // Known quirk carried over from the surveyed behavior: a seek
            // reports a dummy zero-valued time event, not the real position.
            "seeked" => self.options.time_update(&TimeEvent::ZERO),
            "video_end" => self.options.ended(),
            "durationchange" => {}
            "pause" => self.options.pause(),
            "playing" => self.options.play(),
            "error" => self.options.error(event.message().unwrap_or("error")),
            other => Logger::lazy_debug(&|| format!("Dailymotion: unhandled event {}", other)),
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        jsCallPlayerMethodString(self.player_id, "load", id);
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
}
