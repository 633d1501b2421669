use std::rc::Rc;

use wasm_bindgen::JsError;

use crate::bindings::{jsShowEmptyState, LogLevel};
use crate::controllers::{Command, ControllerHandle, NullController};
use crate::mount::{MountState, PlayerMount};
use crate::services;
use crate::utils::logger::LoggerLevel;
use crate::{wasm_bindgen, Logger};

use super::PolyPlayer;

/// Methods exposed to the JavaScript-side.
///
/// These are not the only entry points callable from JavaScript: the glue
/// also reports asynchronous outcomes (script loads, widget construction,
/// widget events) through the "event_listeners" methods defined in their own
/// file.
#[wasm_bindgen]
impl PolyPlayer {
    /// Create a new `PolyPlayer` bound to the embedding element linked to it
    /// on the JavaScript-side.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        PolyPlayer {
            mount: None,
            null_controller: NullController,
            options: Self::callback_options(),
        }
    }

    /// Point the player at a new source URL.
    ///
    /// Resolution picks the backend: a URL of the backend already playing
    /// flows through `loadVideo` on the live controller, a different backend
    /// tears the current widget down and builds a new one, and an
    /// unrecognized URL shows the blank state.
    pub fn load(&mut self, src: String) {
        Logger::lazy_info(&|| format!("Loading {}", src));
        match services::resolve(&src) {
            Some(video) => {
                if let Some(mount) = &mut self.mount {
                    let live = !matches!(mount.state(), MountState::Failed | MountState::Unmounted);
                    if live && mount.kind() == video.kind {
                        mount.set_video_id(&video.video_id);
                        return;
                    }
                }
                self.unmount_current();
                let mut mount = PlayerMount::new(video.kind, &video.video_id, Rc::clone(&self.options));
                mount.start();
                self.mount = Some(mount);
            }
            None => {
                Logger::warn("No player can handle this source");
                self.unmount_current();
                jsShowEmptyState();
            }
        }
    }

    /// Tear the current widget down, leaving the player blank.
    pub fn stop(&mut self) {
        Logger::info("stop called");
        self.unmount_current();
    }

    /// Whether the attached backend implements `command`. `false` while no
    /// controller is attached.
    pub fn supports(&self, command: Command) -> bool {
        self.controller_ref().supports(command)
    }

    pub fn load_video(&mut self, id: String) -> Result<(), JsError> {
        self.controller_mut()
            .load_video(&id)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn play(&mut self) -> Result<(), JsError> {
        self.controller_mut()
            .play()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn pause(&mut self) -> Result<(), JsError> {
        self.controller_mut()
            .pause()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn set_current_time(&mut self, seconds: f64) -> Result<(), JsError> {
        self.controller_mut()
            .set_current_time(seconds)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<(), JsError> {
        self.controller_mut()
            .set_volume(volume)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn set_muted(&mut self, muted: bool) -> Result<(), JsError> {
        self.controller_mut()
            .set_muted(muted)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), JsError> {
        self.controller_mut()
            .set_playback_rate(rate)
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn get_duration(&self) -> Result<Option<f64>, JsError> {
        self.controller_ref()
            .duration()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn get_current_time(&self) -> Result<Option<f64>, JsError> {
        self.controller_ref()
            .current_time()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn get_volume(&self) -> Result<Option<f64>, JsError> {
        self.controller_ref()
            .volume()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn get_muted(&self) -> Result<Option<bool>, JsError> {
        self.controller_ref()
            .muted()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    pub fn get_playback_rate(&self) -> Result<Option<f64>, JsError> {
        self.controller_ref()
            .playback_rate()
            .map_err(|err| JsError::new(&err.to_string()))
    }

    /// Update the minimum level below which log messages are discarded.
    pub fn set_minimum_log_level(&self, level: LogLevel) {
        Logger::set_minimum_level(match level {
            LogLevel::Trace => LoggerLevel::Trace,
            LogLevel::Debug => LoggerLevel::Debug,
            LogLevel::Information => LoggerLevel::Information,
            LogLevel::Warning => LoggerLevel::Warning,
            LogLevel::Error => LoggerLevel::Error,
            LogLevel::Critical => LoggerLevel::Critical,
            LogLevel::None => LoggerLevel::None,
        });
    }
}

impl PolyPlayer {
    fn unmount_current(&mut self) {
        if let Some(mut mount) = self.mount.take() {
            mount.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_none_disables_logging() {
        let player = PolyPlayer::new();
        player.set_minimum_log_level(LogLevel::None);
        assert!(!Logger::enabled(LoggerLevel::Critical));
        assert!(!Logger::enabled(LoggerLevel::Trace));
        // Restore the default so concurrently running tests keep logging.
        player.set_minimum_log_level(LogLevel::Information);
        assert!(Logger::enabled(LoggerLevel::Warning));
        assert!(!Logger::enabled(LoggerLevel::Debug));
    }
}
