use crate::controllers::PlayerKind;
use crate::wasm_bindgen;

/// # js_functions
///
/// This file lists all JavaScript functions that are callable from Rust as
/// well as the structs and enumerations used by those functions.
///
/// The JavaScript side owns everything DOM-related: the embedding element,
/// the vendor widget objects, script tag injection and the blank-state
/// iframe. It must keep a table from `PlayerId` to the live widget so the
/// generic accessors below can be resolved. All vendor-specific knowledge
/// (method names, units, message shapes) stays on the Rust side.

#[wasm_bindgen]
extern "C" {
    // Log the given text in the JavaScript console, with the log level given.
    pub fn jsLog(log_level: LogLevel, log: &str);

    // Inject a script tag for `url` and start fetching it.
    //
    // The Rust side guarantees this is called at most once per url for the
    // lifetime of the process (see `ScriptRegistry`); the JavaScript side
    // must, once the script has executed, call `on_script_loaded` with the
    // same url on EVERY live `PolyPlayer` instance, so that concurrent
    // mounts waiting on the same script all observe readiness. On failure it
    // must call `on_script_load_failed` the same way.
    //
    // For scripts with a global ready-callback handshake (YouTube's
    // `onYouTubeIframeAPIReady`, Spotify's `onSpotifyIframeApiReady`), the
    // JavaScript side must install that callback before injection and delay
    // the `on_script_loaded` broadcast until it has fired.
    pub fn jsLoadScript(url: &str);

    // Construct the native widget for `kind` against the embedding element,
    // bound to the given initial video id (iframe-src based widgets encode
    // the id in their src attribute; others receive it at construction).
    //
    // Construction may be asynchronous; the JavaScript side must call
    // `on_player_created` with the same `player_id` once the widget object
    // exists. Errors detectable synchronously are reported through the
    // returned `CreatePlayerResult`.
    pub fn jsCreatePlayer(player_id: PlayerId, kind: PlayerKind, video_id: &str)
        -> CreatePlayerResult;

    // Drop the widget behind `player_id` and release its element. After this
    // call the `PlayerId` must not be used again.
    pub fn jsDestroyPlayer(player_id: PlayerId);

    // Register the native event listeners appropriate for `kind` on the
    // widget behind `player_id`. Translated events come back through
    // `on_player_event` as `NativeEvent`s; for Niconico, raw window
    // `message` events come back through `on_player_message` with their
    // origin and JSON payload untouched (origin filtering happens in Rust).
    //
    // SoundCloud notes: the native PLAY_PROGRESS callback does not carry the
    // duration, and the widget only exposes it through an asynchronous
    // getter. The glue must re-query it and attach the millisecond value to
    // the forwarded event before calling `on_player_event`. The widget's
    // `load` method takes a completion callback; the glue must pass one and
    // forward a "loaded" event carrying the url once it fires, so that track
    // swaps are re-announced.
    pub fn jsBindPlayerEvents(player_id: PlayerId, kind: PlayerKind);

    // Unregister every listener installed by `jsBindPlayerEvents`. Must be
    // tolerant of a partially bound widget.
    pub fn jsUnbindPlayerEvents(player_id: PlayerId, kind: PlayerKind);

    // Invoke a zero-argument method on the widget (`play`, `pause`, ...).
    pub fn jsCallPlayerMethod(player_id: PlayerId, method: &str);

    // Invoke a single-number-argument method on the widget (`seekTo`, ...).
    pub fn jsCallPlayerMethodNumber(player_id: PlayerId, method: &str, arg: f64);

    // Invoke a single-boolean-argument method on the widget (`setMuted`, ...).
    pub fn jsCallPlayerMethodBool(player_id: PlayerId, method: &str, arg: bool);

    // Invoke a single-string-argument method on the widget (`load`, ...).
    pub fn jsCallPlayerMethodString(player_id: PlayerId, method: &str, arg: &str);

    // Assign a numeric property on the widget (`currentTime`, `volume`, ...).
    pub fn jsSetPlayerProperty(player_id: PlayerId, property: &str, value: f64);

    // Assign a boolean property on the widget (`muted`, ...).
    pub fn jsSetPlayerPropertyBool(player_id: PlayerId, property: &str, value: bool);

    // Assign the `src` attribute of an element-backed widget (`<audio>`,
    // Niconico's iframe).
    pub fn jsSetPlayerSource(player_id: PlayerId, src: &str);

    // Read a numeric value from the widget. `name` is either a property name
    // or a zero-argument getter; the glue resolves whichever the vendor API
    // exposes (`duration` on an `<audio>` element, `getDuration()` on the
    // Twitch player). Returns `None` if the widget is gone or the value is
    // not a number.
    pub fn jsGetPlayerNumber(player_id: PlayerId, name: &str) -> Option<f64>;

    // Boolean counterpart of `jsGetPlayerNumber` (`muted`, `isMuted`).
    pub fn jsGetPlayerBool(player_id: PlayerId, name: &str) -> Option<bool>;

    // Post `message` (a JSON document) to the widget's content window with
    // the given target origin. Used by the Niconico adapter, which builds
    // the exact wire shape itself.
    pub fn jsPostPlayerMessage(player_id: PlayerId, message: &str, target_origin: &str);

    // Replace whatever is displayed with an inert blank state. Called when a
    // source URL matches no backend.
    pub fn jsShowEmptyState();

    // Announce that the exposed controller changed: `true` right after a
    // controller attached, `false` right after it detached. Fired exactly
    // once per transition.
    pub fn jsOnControllerChange(attached: bool);

    // Playback events re-dispatched to the embedding application.
    pub fn jsOnLoaded(video_id: &str);
    pub fn jsOnPlay();
    pub fn jsOnPause();
    pub fn jsOnEnded();
    pub fn jsOnTimeUpdate(duration: f64, percent: f64, seconds: f64);

    // An error payload emitted by the underlying vendor widget or by a
    // failed script load, forwarded verbatim and never retried.
    pub fn jsOnError(payload: &str);
}

/// Identify one constructed native widget. Allocated once per widget life;
/// continuations arriving for a stale `PlayerId` are dropped.
pub type PlayerId = u32;

/// Levels with which a log can be emitted.
///
/// Same ordering as the Microsoft.Extensions.Logging levels: a message is
/// written when its level is at or above the configured minimum, and `None`
/// as the minimum disables logging entirely. `None` is only ever a minimum;
/// no message is emitted with it.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Information = 2,
    Warning = 3,
    Error = 4,
    Critical = 5,
    None = 6,
}

/// Trait allowing to convert "JavaScript Results" as exposed by the
/// JavaScript functions into `Result` structs more idiomatic to Rust.
pub(crate) trait JsResult<T, E> {
    fn result(self) -> Result<T, (E, Option<String>)>;
}

/// Errors that can arise when asking the JavaScript-side to construct a
/// native widget.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatePlayerErrorCode {
    /// No embedding element is currently linked to this `PolyPlayer`.
    NoElement,

    /// The vendor script for that backend has not executed yet.
    ScriptNotLoaded,

    /// The widget constructor threw or is missing from the global scope.
    UnknownError,
}

/// Result of calling the `jsCreatePlayer` JavaScript function.
///
/// Creation of a `CreatePlayerResult` should only be performed by the
/// JavaScript side through the exposed static constructors.
#[wasm_bindgen]
pub struct CreatePlayerResult {
    error: Option<(CreatePlayerErrorCode, Option<String>)>,
}

#[wasm_bindgen]
impl CreatePlayerResult {
    /// Creates a `CreatePlayerResult` indicating success.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn success() -> Self {
        Self { error: None }
    }

    /// Creates a `CreatePlayerResult` indicating failure, with the
    /// corresponding error.
    ///
    /// This function should only be called by the JavaScript-side.
    pub fn error(err: CreatePlayerErrorCode, desc: Option<String>) -> Self {
        Self {
            error: Some((err, desc)),
        }
    }
}

impl JsResult<(), CreatePlayerErrorCode> for CreatePlayerResult {
    /// Basically unwrap and consume the `CreatePlayerResult`, converting it
    /// into a Result enum.
    fn result(self) -> Result<(), (CreatePlayerErrorCode, Option<String>)> {
        if let Some(err) = self.error {
            Err(err)
        } else {
            Ok(())
        }
    }
}
