use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodBool, jsCallPlayerMethodNumber,
    jsCallPlayerMethodString, jsUnbindPlayerEvents, NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over the Vimeo player SDK.
///
/// The only backend whose native `timeupdate` already carries seconds, a
/// duration and a percent fraction, so no unit work is needed. All native
/// getters are promise-based; queries answer from mirrors instead, fed by
/// `timeupdate` for time values and by the last accepted set for the rest.
pub(crate) struct VimeoController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
    duration: f64,
    current_time: f64,
    volume: f64,
    muted: bool,
    playback_rate: f64,
}

impl VimeoController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self {
            player_id,
            options,
            duration: 0.,
            current_time: 0.,
            volume: 1.,
            muted: false,
            playback_rate: 1.,
        }
    }
}

impl PlayerApi for VimeoController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        jsBindPlayerEvents(self.player_id, PlayerKind::Vimeo);
        AttachOutcome::Ready
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Vimeo);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "loaded" => {
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
            }
            "play" => self.options.play(),
            "pause" => self.options.pause(),
            "ended" => self.options.ended(),
            "timeupdate" => {
                self.duration = event.duration().unwrap_or(0.);
                self.current_time = event.seconds().unwrap_or(0.);
                self.options
                    .time_update(&TimeEvent::from_position(self.duration, self.current_time));
            }
            "error" => self.options.error(event.message().unwrap_or("error")),
            other => Logger::lazy_debug(&|| format!("Vimeo: unhandled event {}", other)),
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        self.duration = 0.;
        self.current_time = 0.;
        jsCallPlayerMethodString(self.player_id, "loadVideo", id);
    }

    fn play(&mut self) {
        jsCallPlayerMethod(self.player_id, "play");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pause");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsCallPlayerMethodNumber(self.player_id, "setCurrentTime", seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        jsCallPlayerMethodNumber(self.player_id, "setVolume", volume);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        jsCallPlayerMethodBool(self.player_id, "setMuted", muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
        jsCallPlayerMethodNumber(self.player_id, "setPlaybackRate", rate);
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

    fn playback_rate(&self) -> Option<f64> {
        Some(self.playback_rate)
    }
}
