use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodNumber, jsCallPlayerMethodString,
    jsUnbindPlayerEvents, NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over the Spotify iframe API embed controller.
///
/// The smallest surface of the set: the embed has no volume, mute or
/// playback-rate control and emits no play/pause/ended events, only `ready`
/// and `playback_update` ticks. Duration and position are mirrored from
/// those ticks, millisecond-to-second normalized.
pub(crate) struct SpotifyController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
    duration: f64,
    current_time: f64,
}

impl SpotifyController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self {
            player_id,
            options,
            duration: 0.,
            current_time: 0.,
        }
    }
}

impl PlayerApi for SpotifyController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        // `ready` fires once per embed controller; the glue removes its own
        // listener after forwarding it.
        jsBindPlayerEvents(self.player_id, PlayerKind::Spotify);
        AttachOutcome::Pending
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::Spotify);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "ready" => true,
            "playback_update" => {
                // `position` and `duration` arrive in milliseconds.
                self.duration = event.duration().unwrap_or(0.) / 1000.;
                self.current_time = event.seconds().unwrap_or(0.) / 1000.;
                self.options
                    .time_update(&TimeEvent::from_position(self.duration, self.current_time));
                false
            }
            other => {
                Logger::lazy_debug(&|| format!("Spotify: unhandled event {}", other));
                false
            }
        }
    }

    fn load_video(&mut self, id: &str) {
        self.duration = 0.;
        self.current_time = 0.;
        jsCallPlayerMethodString(self.player_id, "loadUri", id);
    }

    fn play(&mut self) {
        // `play` restarts from the beginning; `resume` is the play that
        // respects the current position and also starts initial playback.
        jsCallPlayerMethod(self.player_id, "resume");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pause");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsCallPlayerMethodNumber(self.player_id, "seek", seconds);
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.current_time)
    }
}
