//! Lifecycle of one native widget, from script load to teardown.

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::bindings::{
    jsCreatePlayer, jsDestroyPlayer, jsLoadScript, JsResult, NativeEvent, PlayerId,
};
use crate::controllers::{
    create_controller, AdapterFactory, AttachOutcome, ControllerHandle, PlayerController,
    PlayerKind, PlayerOptions,
};
use crate::script_loader::{ScriptRegistry, ScriptRequest};
use crate::Logger;

/// Process-wide `PlayerId` allocator. One id per widget life; callbacks
/// arriving for a stale id are dropped by the facade.
static NEXT_PLAYER_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MountState {
    Idle,
    LoadingScript,
    CreatingPlayer,
    Attaching,
    Attached,
    Failed,
    Unmounted,
}

/// Drives one widget through script load, construction, attach and
/// teardown, in that strict order.
///
/// The video id captured at construction stays authoritative for the first
/// attach. Later id changes only ever flow through `loadVideo` on the live
/// controller: the widget is never recreated for an id change, and when ids
/// churn while the attach is still in flight only the most recent one is
/// loaded once it completes.
pub(crate) struct PlayerMount {
    player_id: PlayerId,
    kind: PlayerKind,
    initial_id: String,
    latest_id: String,
    loaded_id: Option<String>,
    options: Rc<PlayerOptions>,
    controller: PlayerController,
    state: MountState,
    widget_requested: bool,
}

/// Whether an id change must reach the live controller. Re-renders with the
/// id already loaded are suppressed.
fn should_reload(loaded_id: Option<&str>, next_id: &str) -> bool {
    loaded_id != Some(next_id)
}

// The announcement has no JavaScript sink on the host; unit tests still
// drive attach completion and teardown.
#[cfg(target_arch = "wasm32")]
fn announce_controller_change(attached: bool) {
    crate::bindings::jsOnControllerChange(attached);
}

#[cfg(not(target_arch = "wasm32"))]
fn announce_controller_change(_attached: bool) {}

impl PlayerMount {
    pub(crate) fn new(kind: PlayerKind, video_id: &str, options: Rc<PlayerOptions>) -> Self {
        let player_id = NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed);
        Self::with_adapter(
            player_id,
            kind,
            video_id,
            options,
            Box::new(move |options| create_controller(kind, player_id, options)),
        )
    }

    /// Adapter-injecting constructor, mirroring `PlayerController::new`.
    fn with_adapter(
        player_id: PlayerId,
        kind: PlayerKind,
        video_id: &str,
        options: Rc<PlayerOptions>,
        adapter: AdapterFactory,
    ) -> Self {
        let controller = PlayerController::new(kind, Rc::clone(&options), adapter);
        Self {
            player_id,
            kind,
            initial_id: video_id.to_string(),
            latest_id: video_id.to_string(),
            loaded_id: None,
            options,
            controller,
            state: MountState::Idle,
            widget_requested: false,
        }
    }

    pub(crate) fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub(crate) fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub(crate) fn state(&self) -> MountState {
        self.state
    }

    pub(crate) fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub(crate) fn controller_mut(&mut self) -> &mut PlayerController {
        &mut self.controller
    }

    /// Begin the mount: resolve the vendor script situation, then construct
    /// the widget. Construction is deferred while a script fetch is open.
    pub(crate) fn start(&mut self) {
        match self.kind.script_url() {
            None => self.create_player(),
            Some(url) => match ScriptRegistry::request(url) {
                ScriptRequest::AlreadyLoaded => self.create_player(),
                ScriptRequest::FetchNeeded => {
                    self.state = MountState::LoadingScript;
                    jsLoadScript(url);
                }
                ScriptRequest::Pending => {
                    self.state = MountState::LoadingScript;
                }
            },
        }
    }

    /// Broadcast hook: some facade's script fetch for `url` completed. The
    /// registry record was already written by the facade before routing
    /// here; this only advances mounts that were waiting on it.
    pub(crate) fn on_script_loaded(&mut self, url: &str) {
        if self.kind.script_url() != Some(url) {
            return;
        }
        if self.state == MountState::LoadingScript {
            self.create_player();
        }
    }

    /// Broadcast hook: the script fetch for `url` failed. The facade already
    /// cleared the registry entry so a later mount can retry.
    pub(crate) fn on_script_load_failed(&mut self, url: &str) {
        if self.kind.script_url() != Some(url) {
            return;
        }
        if self.state == MountState::LoadingScript {
            Logger::lazy_error(&|| format!("{}: failed to load script", url));
            self.state = MountState::Failed;
            self.options.error(&format!("failed to load script {}", url));
        }
    }

    fn create_player(&mut self) {
        self.state = MountState::CreatingPlayer;
        match jsCreatePlayer(self.player_id, self.kind, &self.initial_id).result() {
            Ok(()) => {
                self.widget_requested = true;
            }
            Err((code, desc)) => {
                Logger::lazy_error(&|| {
                    format!("{}: could not create the player: {:?}", self.kind, code)
                });
                self.state = MountState::Failed;
                self.options
                    .error(&desc.unwrap_or_else(|| format!("{:?}", code)));
            }
        }
    }

    /// The widget object behind this mount's `PlayerId` now exists.
    pub(crate) fn on_player_created(&mut self) {
        if self.state != MountState::CreatingPlayer {
            Logger::debug("player created in an unexpected state, ignoring");
            return;
        }
        match self.controller.attach(&self.initial_id) {
            AttachOutcome::Ready => self.finish_attach(),
            AttachOutcome::Pending => {
                self.state = MountState::Attaching;
            }
        }
    }

    pub(crate) fn on_player_event(&mut self, event: &NativeEvent) {
        if self.controller.handle_event(event) && self.state == MountState::Attaching {
            self.finish_attach();
        }
    }

    pub(crate) fn on_player_message(&mut self, origin: &str, data: &str) {
        if self.controller.handle_message(origin, data) && self.state == MountState::Attaching {
            self.finish_attach();
        }
    }

    fn finish_attach(&mut self) {
        self.state = MountState::Attached;
        self.loaded_id = Some(self.initial_id.clone());
        announce_controller_change(true);
        if self.latest_id != self.initial_id {
            // Ids churned during the attach; only the latest one matters.
            let id = self.latest_id.clone();
            self.load(&id);
        }
    }

    fn load(&mut self, id: &str) {
        match self.controller.load_video(id) {
            Ok(()) => self.loaded_id = Some(id.to_string()),
            Err(err) => Logger::lazy_error(&|| format!("loadVideo failed: {}", err)),
        }
    }

    /// Point the mount at another id of the same backend.
    pub(crate) fn set_video_id(&mut self, id: &str) {
        self.latest_id = id.to_string();
        if self.state != MountState::Attached {
            // Captured; the latest id flows once the attach completes.
            return;
        }
        if !should_reload(self.loaded_id.as_deref(), id) {
            Logger::debug("video id unchanged, ignoring");
            return;
        }
        let id = id.to_string();
        self.load(&id);
    }

    /// Tear the mount down. Safe in every state; continuations arriving
    /// afterwards are dropped by the facade's `PlayerId` check.
    pub(crate) fn unmount(&mut self) {
        let was_attached = self.state == MountState::Attached;
        if matches!(self.state, MountState::Attaching | MountState::Attached) {
            if let Err(err) = self.controller.detach() {
                Logger::lazy_debug(&|| format!("detach failed: {}", err));
            }
        }
        if was_attached {
            announce_controller_change(false);
        }
        if self.widget_requested {
            jsDestroyPlayer(self.player_id);
        }
        self.state = MountState::Unmounted;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::controllers::PlayerApi;

    // Paths that reach the JavaScript boundary are exercised in a browser;
    // these cover the host-safe decision logic.

    struct RecordingAdapter {
        commands: Rc<RefCell<Vec<String>>>,
    }

    impl PlayerApi for RecordingAdapter {
        fn attach(&mut self, _id: &str) -> AttachOutcome {
            AttachOutcome::Pending
        }

        fn detach(&mut self) {}

        fn handle_event(&mut self, event: &NativeEvent) -> bool {
            event.name() == "ready"
        }

        fn load_video(&mut self, id: &str) {
            self.commands.borrow_mut().push(format!("loadVideo {}", id));
        }

        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_current_time(&mut self, _seconds: f64) {}

        fn duration(&self) -> Option<f64> {
            None
        }

        fn current_time(&self) -> Option<f64> {
            None
        }
    }

    fn mount_with_fake(video_id: &str) -> (PlayerMount, Rc<RefCell<Vec<String>>>) {
        let commands = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&commands);
        let mount = PlayerMount::with_adapter(
            900,
            PlayerKind::SoundCloud,
            video_id,
            Rc::new(PlayerOptions::default()),
            Box::new(move |_options| {
                Box::new(RecordingAdapter {
                    commands: Rc::clone(&recorded),
                })
            }),
        );
        (mount, commands)
    }

    #[test]
    fn id_changes_before_attach_only_update_the_capture() {
        let mut mount = PlayerMount::new(
            PlayerKind::Vimeo,
            "76979871",
            Rc::new(PlayerOptions::default()),
        );
        assert_eq!(mount.state(), MountState::Idle);
        mount.set_video_id("152158728");
        assert_eq!(mount.latest_id, "152158728");
        // The controller never saw the change.
        assert!(!mount.controller().is_attached());
        // The initial id stays authoritative for the first attach.
        assert_eq!(mount.initial_id, "76979871");
    }

    #[test]
    fn reload_is_suppressed_for_the_loaded_id() {
        assert!(!should_reload(Some("sm9"), "sm9"));
        assert!(should_reload(Some("sm9"), "sm10"));
        assert!(should_reload(None, "sm9"));
    }

    #[test]
    fn only_the_latest_churned_id_loads_once_attach_completes() {
        let (mut mount, commands) = mount_with_fake("first");
        mount.state = MountState::CreatingPlayer;
        mount.on_player_created();
        assert_eq!(mount.state(), MountState::Attaching);

        mount.set_video_id("second");
        mount.set_video_id("third");
        assert!(commands.borrow().is_empty());

        mount.on_player_event(&NativeEvent::named("ready"));
        assert_eq!(mount.state(), MountState::Attached);
        assert_eq!(*commands.borrow(), vec!["loadVideo third".to_string()]);
        assert_eq!(mount.loaded_id.as_deref(), Some("third"));

        // Re-pointing at the id just loaded is suppressed.
        mount.set_video_id("third");
        assert_eq!(commands.borrow().len(), 1);
    }

    #[test]
    fn attach_without_churn_loads_nothing() {
        let (mut mount, commands) = mount_with_fake("only");
        mount.state = MountState::CreatingPlayer;
        mount.on_player_created();
        mount.on_player_event(&NativeEvent::named("ready"));
        assert_eq!(mount.state(), MountState::Attached);
        assert!(commands.borrow().is_empty());
        assert_eq!(mount.loaded_id.as_deref(), Some("only"));
    }

    #[test]
    fn mounts_get_distinct_player_ids() {
        let options = Rc::new(PlayerOptions::default());
        let first = PlayerMount::new(PlayerKind::Audio, "a.mp3", Rc::clone(&options));
        let second = PlayerMount::new(PlayerKind::Audio, "b.mp3", options);
        assert_ne!(first.player_id(), second.player_id());
    }
}
