use crate::bindings::{NativeEvent, PlayerId};
use crate::script_loader::ScriptRegistry;
use crate::{wasm_bindgen, Logger};

use super::PolyPlayer;

/// Methods the JavaScript glue calls to report asynchronous outcomes.
///
/// Script notifications are broadcast to every live `PolyPlayer`; widget
/// notifications carry the `PlayerId` allocated at widget construction, and
/// any notification for a stale id is dropped here.
#[wasm_bindgen]
impl PolyPlayer {
    /// The script at `url` has executed (including, where applicable, its
    /// global ready-callback handshake).
    ///
    /// The registry is updated before routing: the completion record must
    /// survive even when every mount that asked for the script is gone by
    /// the time the fetch resolves, so that later mounts for the same url
    /// get an immediate answer instead of waiting for a broadcast that will
    /// never recur.
    pub fn on_script_loaded(&mut self, url: String) {
        ScriptRegistry::mark_loaded(&url);
        if let Some(mount) = &mut self.mount {
            mount.on_script_loaded(&url);
        }
    }

    /// Fetching the script at `url` failed. The registry entry is cleared
    /// first so a later mount can retry, mount or no mount.
    pub fn on_script_load_failed(&mut self, url: String) {
        ScriptRegistry::mark_failed(&url);
        if let Some(mount) = &mut self.mount {
            mount.on_script_load_failed(&url);
        }
    }

    /// The widget behind `player_id` now exists and can be attached to.
    pub fn on_player_created(&mut self, player_id: PlayerId) {
        match &mut self.mount {
            Some(mount) if mount.player_id() == player_id => mount.on_player_created(),
            _ => {
                Logger::lazy_debug(&|| {
                    format!("player {} creation resolved after teardown, ignoring", player_id)
                });
            }
        }
    }

    /// A native widget event, pre-flattened by the glue.
    pub fn on_player_event(&mut self, player_id: PlayerId, event: NativeEvent) {
        match &mut self.mount {
            Some(mount) if mount.player_id() == player_id => mount.on_player_event(&event),
            _ => {
                Logger::lazy_debug(&|| {
                    format!("event for stale player {}, ignoring", player_id)
                });
            }
        }
    }

    /// A raw cross-window message observed for the widget behind
    /// `player_id`. Origin filtering happens in the adapter.
    pub fn on_player_message(&mut self, player_id: PlayerId, origin: String, data: String) {
        match &mut self.mount {
            Some(mount) if mount.player_id() == player_id => {
                mount.on_player_message(&origin, &data)
            }
            _ => {
                Logger::lazy_debug(&|| {
                    format!("message for stale player {}, ignoring", player_id)
                });
            }
        }
    }
}
