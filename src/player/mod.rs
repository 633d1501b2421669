use std::rc::Rc;

use crate::bindings::{
    jsOnEnded, jsOnError, jsOnLoaded, jsOnPause, jsOnPlay, jsOnTimeUpdate,
};
use crate::controllers::{ControllerHandle, NullController, PlayerOptions};
use crate::mount::PlayerMount;
use crate::wasm_bindgen;

mod api;
mod event_listeners;

/// The `PolyPlayer` is the player interface exported to the JavaScript-side,
/// presenting one uniform command, query and event surface whatever embedded
/// widget currently plays.
///
/// One instance per embedding element. The JavaScript-side owns the DOM and
/// the vendor widget objects; every decision (URL resolution, capability
/// dispatch, lifecycle, unit normalization) is taken here.
#[wasm_bindgen]
pub struct PolyPlayer {
    /// Lifecycle of the currently embedded widget. `None` while no source is
    /// loaded or after the last one was torn down.
    mount: Option<PlayerMount>,

    /// Stand-in answering commands and queries while no controller is
    /// attached.
    null_controller: NullController,

    /// Callbacks shared by every controller this player ever creates; they
    /// re-dispatch translated widget events to the embedding application.
    options: Rc<PlayerOptions>,
}

impl PolyPlayer {
    /// The handle commands should currently go to: the live dispatcher once
    /// a controller attached, the null controller otherwise.
    fn controller_mut(&mut self) -> &mut dyn ControllerHandle {
        match &mut self.mount {
            Some(mount) if mount.controller().is_attached() => mount.controller_mut(),
            _ => &mut self.null_controller,
        }
    }

    fn controller_ref(&self) -> &dyn ControllerHandle {
        match &self.mount {
            Some(mount) if mount.controller().is_attached() => mount.controller(),
            _ => &self.null_controller,
        }
    }

    fn callback_options() -> Rc<PlayerOptions> {
        Rc::new(PlayerOptions {
            on_error: Some(Box::new(|payload| jsOnError(payload))),
            on_loaded: Some(Box::new(|event| jsOnLoaded(&event.id))),
            on_play: Some(Box::new(jsOnPlay)),
            on_pause: Some(Box::new(jsOnPause)),
            on_ended: Some(Box::new(jsOnEnded)),
            on_time_update: Some(Box::new(|event| {
                jsOnTimeUpdate(event.duration, event.percent, event.seconds)
            })),
        })
    }
}
