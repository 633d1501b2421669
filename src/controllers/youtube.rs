use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodNumber, jsCallPlayerMethodString,
    jsGetPlayerBool, jsGetPlayerNumber, jsUnbindPlayerEvents, NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

// YT.PlayerState values.
const STATE_ENDED: f64 = 0.;
const STATE_PLAYING: f64 = 1.;
const STATE_PAUSED: f64 = 2.;

/// Adapter over the YouTube iframe API player.
///
/// The widget's getters are synchronous, so queries go straight through; the
/// native volume scale is 0..100 and mute is a method pair rather than a
/// setter. The iframe API has no native time tick, so the glue emits a
/// polled `timeupdate` while playback is running.
pub(crate) struct YouTubeController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
}

impl YouTubeController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self { player_id, options }
    }
}

impl PlayerApi for YouTubeController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        // Widget construction already waited for onReady, commands are safe.
        jsBindPlayerEvents(self.player_id, PlayerKind::YouTube);
        AttachOutcome::Ready
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::YouTube);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            // The glue attaches `getVideoData().video_id` to the ready event.
            "ready" => {
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
            }
            "statechange" => match event.code() {
                Some(code) if code == STATE_PLAYING => self.options.play(),
                Some(code) if code == STATE_PAUSED => self.options.pause(),
                Some(code) if code == STATE_ENDED => self.options.ended(),
                // Buffering, cued and unstarted have no uniform counterpart.
                code => {
                    Logger::lazy_debug(&|| format!("YouTube: ignored state {:?}", code));
                }
            },
            "timeupdate" => {
                self.options.time_update(&TimeEvent::from_position(
                    event.duration().unwrap_or(0.),
                    event.seconds().unwrap_or(0.),
                ));
            }
            "error" => self.options.error(event.message().unwrap_or("error")),
            other => Logger::lazy_debug(&|| format!("YouTube: unhandled event {}", other)),
        }
        false
    }

    fn load_video(&mut self, id: &str) {
        jsCallPlayerMethodString(self.player_id, "loadVideoById", id);
    }

    fn play(&mut self) {
        jsCallPlayerMethod(self.player_id, "playVideo");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pauseVideo");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsCallPlayerMethodNumber(self.player_id, "seekTo", seconds);
    }

    fn set_volume(&mut self, volume: f64) {
        jsCallPlayerMethodNumber(self.player_id, "setVolume", volume * 100.);
    }

    fn set_muted(&mut self, muted: bool) {
        jsCallPlayerMethod(self.player_id, if muted { "mute" } else { "unMute" });
    }

    fn set_playback_rate(&mut self, rate: f64) {
        jsCallPlayerMethodNumber(self.player_id, "setPlaybackRate", rate);
    }

    fn duration(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getDuration")
    }

    fn current_time(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getCurrentTime")
    }

    fn volume(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getVolume").map(|volume| volume / 100.)
    }

    fn muted(&self) -> Option<bool> {
        jsGetPlayerBool(self.player_id, "isMuted")
    }

    fn playback_rate(&self) -> Option<f64> {
        jsGetPlayerNumber(self.player_id, "getPlaybackRate")
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recording_options() -> (Rc<PlayerOptions>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let loaded = Rc::clone(&seen);
        let play = Rc::clone(&seen);
        let pause = Rc::clone(&seen);
        let ended = Rc::clone(&seen);
        let time = Rc::clone(&seen);
        let options = Rc::new(PlayerOptions {
            on_loaded: Some(Box::new(move |event| {
                loaded.borrow_mut().push(format!("loaded {}", event.id));
            })),
            on_play: Some(Box::new(move || play.borrow_mut().push("play".into()))),
            on_pause: Some(Box::new(move || pause.borrow_mut().push("pause".into()))),
            on_ended: Some(Box::new(move || ended.borrow_mut().push("ended".into()))),
            on_time_update: Some(Box::new(move |event: &TimeEvent| {
                time.borrow_mut().push(format!(
                    "time {} {} {}",
                    event.duration, event.percent, event.seconds
                ));
            })),
            ..PlayerOptions::default()
        });
        (options, seen)
    }

    fn state_event(code: f64) -> NativeEvent {
        NativeEvent::new("statechange".to_string(), None, None, None, Some(code), None)
    }

    #[test]
    fn state_changes_map_to_play_pause_ended() {
        let (options, seen) = recording_options();
        let mut controller = YouTubeController::new(1, options);
        for code in [1., 2., 0.] {
            controller.handle_event(&state_event(code));
        }
        assert_eq!(
            *seen.borrow(),
            vec!["play".to_string(), "pause".to_string(), "ended".to_string()]
        );
    }

    #[test]
    fn buffering_and_cued_states_are_ignored() {
        let (options, seen) = recording_options();
        let mut controller = YouTubeController::new(1, options);
        for code in [-1., 3., 5.] {
            controller.handle_event(&state_event(code));
        }
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn ready_reports_the_loaded_video() {
        let (options, seen) = recording_options();
        let mut controller = YouTubeController::new(1, options);
        let event = NativeEvent::new(
            "ready".to_string(),
            Some("dQw4w9WgXcQ".to_string()),
            None,
            None,
            None,
            None,
        );
        assert!(!controller.handle_event(&event));
        assert_eq!(*seen.borrow(), vec!["loaded dQw4w9WgXcQ".to_string()]);
    }

    #[test]
    fn polled_timeupdate_is_forwarded() {
        let (options, seen) = recording_options();
        let mut controller = YouTubeController::new(1, options);
        let event = NativeEvent::new(
            "timeupdate".to_string(),
            None,
            Some(30.),
            Some(120.),
            None,
            None,
        );
        controller.handle_event(&event);
        assert_eq!(*seen.borrow(), vec!["time 120 0.25 30".to_string()]);
    }
}
