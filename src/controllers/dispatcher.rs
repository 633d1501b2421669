use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::bindings::NativeEvent;
use crate::Logger;

use super::{
    AttachOutcome, Command, ControllerError, ControllerHandle, PlayerApi, PlayerKind, PlayerOptions,
};

/// Process-wide counter backing the per-dispatcher instance id; no two live
/// dispatchers ever share one.
static NEXT_CONTROLLER_ID: AtomicU32 = AtomicU32::new(1);

/// Creates the adapter once the dispatcher decides to attach. Injected so
/// tests can substitute a recording fake.
pub(crate) type AdapterFactory = Box<dyn Fn(Rc<PlayerOptions>) -> Box<dyn PlayerApi>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttachState {
    Unattached,
    Attaching,
    Attached,
    Detaching,
}

/// Capability-checking, state-tracking wrapper around one live adapter.
///
/// Owns exactly one adapter for its attached lifetime. Calls made while no
/// adapter is attached fail loudly instead of silently no-oping, so that
/// UI-layer bugs stay observable.
pub(crate) struct PlayerController {
    id: u32,
    kind: PlayerKind,
    options: Rc<PlayerOptions>,
    factory: AdapterFactory,
    state: AttachState,
    imp: Option<Box<dyn PlayerApi>>,
}

impl PlayerController {
    pub(crate) fn new(kind: PlayerKind, options: Rc<PlayerOptions>, factory: AdapterFactory) -> Self {
        let id = NEXT_CONTROLLER_ID.fetch_add(1, Ordering::Relaxed);
        Logger::lazy_debug(&|| format!("{}#{} ctor", kind, id));
        Self {
            id,
            kind,
            options,
            factory,
            state: AttachState::Unattached,
            imp: None,
        }
    }

    fn debug(&self, message: &str) {
        Logger::lazy_debug(&|| format!("{}#{} {}", self.kind, self.id, message));
    }

    /// Create the adapter and register its native listeners. A second call
    /// on a live controller is a debug-logged no-op: no duplicate listener
    /// registration may ever happen.
    pub(crate) fn attach(&mut self, id: &str) -> AttachOutcome {
        self.debug(&format!("attach {}", id));

        match self.state {
            AttachState::Attached => {
                self.debug("player is already attached");
                AttachOutcome::Ready
            }
            AttachState::Attaching => {
                self.debug("attach is already pending");
                AttachOutcome::Pending
            }
            AttachState::Unattached | AttachState::Detaching => {
                self.debug("Attaching player...");
                self.state = AttachState::Attaching;
                let mut imp = (self.factory)(Rc::clone(&self.options));
                let outcome = imp.attach(id);
                self.imp = Some(imp);
                if outcome == AttachOutcome::Ready {
                    self.state = AttachState::Attached;
                    self.debug("player attached");
                }
                outcome
            }
        }
    }

    pub(crate) fn detach(&mut self) -> Result<(), ControllerError> {
        self.debug("detach");

        let mut imp = self.imp.take().ok_or(ControllerError::NotAttached)?;
        self.state = AttachState::Detaching;
        imp.detach();
        self.state = AttachState::Unattached;
        Ok(())
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.state == AttachState::Attached
    }

    /// Route a forwarded widget event into the adapter. Returns `true` when
    /// the event completed a pending attach.
    pub(crate) fn handle_event(&mut self, event: &NativeEvent) -> bool {
        match self.state {
            AttachState::Attaching | AttachState::Attached => {
                let was_attaching = self.state == AttachState::Attaching;
                let ready = match self.imp.as_mut() {
                    Some(imp) => imp.handle_event(event),
                    None => false,
                };
                if ready && was_attaching {
                    self.state = AttachState::Attached;
                    self.debug("player attached");
                    return true;
                }
                false
            }
            _ => {
                self.debug("event received while unattached, ignoring");
                false
            }
        }
    }

    /// Route a raw cross-window message (Niconico) into the adapter.
    pub(crate) fn handle_message(&mut self, origin: &str, data: &str) -> bool {
        match self.state {
            AttachState::Attaching | AttachState::Attached => {
                let was_attaching = self.state == AttachState::Attaching;
                let ready = match self.imp.as_mut() {
                    Some(imp) => imp.handle_message(origin, data),
                    None => false,
                };
                if ready && was_attaching {
                    self.state = AttachState::Attached;
                    self.debug("player attached");
                    return true;
                }
                false
            }
            _ => {
                self.debug("message received while unattached, ignoring");
                false
            }
        }
    }

    fn checked(&mut self, command: Command) -> Result<&mut Box<dyn PlayerApi>, ControllerError> {
        if self.state != AttachState::Attached {
            return Err(ControllerError::NotAttached);
        }
        if !self.kind.supports(command) {
            return Err(ControllerError::NotSupported {
                kind: self.kind,
                command,
            });
        }
        self.imp.as_mut().ok_or(ControllerError::NotAttached)
    }

    fn checked_ref(&self, command: Command) -> Result<&dyn PlayerApi, ControllerError> {
        if self.state != AttachState::Attached {
            return Err(ControllerError::NotAttached);
        }
        if !self.kind.supports(command) {
            return Err(ControllerError::NotSupported {
                kind: self.kind,
                command,
            });
        }
        self.imp
            .as_deref()
            .ok_or(ControllerError::NotAttached)
    }
}

impl ControllerHandle for PlayerController {
    fn load_video(&mut self, id: &str) -> Result<(), ControllerError> {
        self.debug(&format!("loadVideo {}", id));
        self.checked(Command::LoadVideo)?.load_video(id);
        Ok(())
    }

    fn play(&mut self) -> Result<(), ControllerError> {
        self.debug("play");
        self.checked(Command::Play)?.play();
        Ok(())
    }

    fn pause(&mut self) -> Result<(), ControllerError> {
        self.debug("pause");
        self.checked(Command::Pause)?.pause();
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f64) -> Result<(), ControllerError> {
        self.debug(&format!("setCurrentTime {}", seconds));
        self.checked(Command::SetCurrentTime)?.set_current_time(seconds);
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), ControllerError> {
        self.debug(&format!("setVolume {}", volume));
        self.checked(Command::SetVolume)?.set_volume(volume);
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), ControllerError> {
        self.debug(&format!("setMuted {}", muted));
        self.checked(Command::SetMuted)?.set_muted(muted);
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<(), ControllerError> {
        self.debug(&format!("setPlaybackRate {}", rate));
        self.checked(Command::SetPlaybackRate)?.set_playback_rate(rate);
        Ok(())
    }

    fn duration(&self) -> Result<Option<f64>, ControllerError> {
        self.debug("getDuration");
        Ok(self.checked_ref(Command::GetDuration)?.duration())
    }

    fn current_time(&self) -> Result<Option<f64>, ControllerError> {
        self.debug("getCurrentTime");
        Ok(self.checked_ref(Command::GetCurrentTime)?.current_time())
    }

    fn volume(&self) -> Result<Option<f64>, ControllerError> {
        self.debug("getVolume");
        Ok(self.checked_ref(Command::GetVolume)?.volume())
    }

    fn muted(&self) -> Result<Option<bool>, ControllerError> {
        self.debug("getMuted");
        Ok(self.checked_ref(Command::GetMuted)?.muted())
    }

    fn playback_rate(&self) -> Result<Option<f64>, ControllerError> {
        self.debug("getPlaybackRate");
        Ok(self.checked_ref(Command::GetPlaybackRate)?.playback_rate())
    }

    fn supports(&self, command: Command) -> bool {
        self.kind.supports(command)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct FakeState {
        attach_calls: u32,
        detach_calls: u32,
        commands: Vec<String>,
    }

    struct FakeAdapter {
        state: Rc<RefCell<FakeState>>,
        attach_outcome: AttachOutcome,
    }

    impl PlayerApi for FakeAdapter {
        fn attach(&mut self, _id: &str) -> AttachOutcome {
            self.state.borrow_mut().attach_calls += 1;
            self.attach_outcome
        }

        fn detach(&mut self) {
            self.state.borrow_mut().detach_calls += 1;
        }

        fn handle_event(&mut self, event: &NativeEvent) -> bool {
            event.name() == "ready"
        }

        fn load_video(&mut self, id: &str) {
            self.state.borrow_mut().commands.push(format!("loadVideo {}", id));
        }

        fn play(&mut self) {
            self.state.borrow_mut().commands.push("play".to_string());
        }

        fn pause(&mut self) {
            self.state.borrow_mut().commands.push("pause".to_string());
        }

        fn set_current_time(&mut self, seconds: f64) {
            self.state
                .borrow_mut()
                .commands
                .push(format!("setCurrentTime {}", seconds));
        }

        fn duration(&self) -> Option<f64> {
            Some(120.)
        }

        fn current_time(&self) -> Option<f64> {
            Some(30.)
        }
    }

    fn controller_with_fake(
        kind: PlayerKind,
        outcome: AttachOutcome,
    ) -> (PlayerController, Rc<RefCell<FakeState>>) {
        let state = Rc::new(RefCell::new(FakeState::default()));
        let factory_state = Rc::clone(&state);
        let controller = PlayerController::new(
            kind,
            Rc::new(PlayerOptions::default()),
            Box::new(move |_options| {
                Box::new(FakeAdapter {
                    state: Rc::clone(&factory_state),
                    attach_outcome: outcome,
                })
            }),
        );
        (controller, state)
    }

    #[test]
    fn commands_before_attach_fail_not_attached() {
        let (mut controller, _state) = controller_with_fake(PlayerKind::Vimeo, AttachOutcome::Ready);
        assert_eq!(controller.play(), Err(ControllerError::NotAttached));
        assert_eq!(controller.duration(), Err(ControllerError::NotAttached));
    }

    #[test]
    fn commands_forward_once_attached() {
        let (mut controller, state) = controller_with_fake(PlayerKind::Vimeo, AttachOutcome::Ready);
        assert_eq!(controller.attach("76979871"), AttachOutcome::Ready);
        controller.play().unwrap();
        controller.set_current_time(12.).unwrap();
        assert_eq!(controller.duration().unwrap(), Some(120.));
        assert_eq!(
            state.borrow().commands,
            vec!["play".to_string(), "setCurrentTime 12".to_string()]
        );
    }

    #[test]
    fn second_attach_is_a_no_op() {
        let (mut controller, state) = controller_with_fake(PlayerKind::Vimeo, AttachOutcome::Ready);
        controller.attach("1");
        controller.attach("1");
        assert_eq!(state.borrow().attach_calls, 1);
    }

    #[test]
    fn pending_attach_rejects_commands_until_ready() {
        let (mut controller, _state) =
            controller_with_fake(PlayerKind::SoundCloud, AttachOutcome::Pending);
        assert_eq!(controller.attach("url"), AttachOutcome::Pending);
        assert_eq!(controller.play(), Err(ControllerError::NotAttached));

        assert!(controller.handle_event(&NativeEvent::named("ready")));
        assert!(controller.is_attached());
        controller.play().unwrap();
    }

    #[test]
    fn unsupported_command_fails_naming_the_command() {
        let (mut controller, _state) =
            controller_with_fake(PlayerKind::SoundCloud, AttachOutcome::Ready);
        controller.attach("url");
        assert!(!controller.supports(Command::SetPlaybackRate));
        assert_eq!(
            controller.set_playback_rate(2.),
            Err(ControllerError::NotSupported {
                kind: PlayerKind::SoundCloud,
                command: Command::SetPlaybackRate,
            })
        );
        let err = controller.set_playback_rate(2.).unwrap_err();
        assert!(err.to_string().contains("setPlaybackRate"));
    }

    #[test]
    fn detach_unattaches_and_rejects_further_commands() {
        let (mut controller, state) = controller_with_fake(PlayerKind::Vimeo, AttachOutcome::Ready);
        controller.attach("1");
        controller.detach().unwrap();
        assert_eq!(state.borrow().detach_calls, 1);
        assert_eq!(controller.play(), Err(ControllerError::NotAttached));
        assert_eq!(controller.detach(), Err(ControllerError::NotAttached));
    }

    #[test]
    fn events_while_unattached_are_dropped() {
        let (mut controller, _state) = controller_with_fake(PlayerKind::Vimeo, AttachOutcome::Ready);
        assert!(!controller.handle_event(&NativeEvent::named("ready")));
    }
}
