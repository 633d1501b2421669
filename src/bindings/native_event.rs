use crate::wasm_bindgen;

/// A vendor widget event as forwarded by the JavaScript glue.
///
/// Only `name` is always set; the other fields are filled when the native
/// event carries them (the Rust adapters know which fields to expect for
/// which backend). Numeric fields keep the vendor's native unit — the
/// adapters normalize.
#[wasm_bindgen]
pub struct NativeEvent {
    name: String,
    video_id: Option<String>,
    seconds: Option<f64>,
    duration: Option<f64>,
    code: Option<f64>,
    message: Option<String>,
}

#[wasm_bindgen]
impl NativeEvent {
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(constructor)]
    pub fn new(
        name: String,
        video_id: Option<String>,
        seconds: Option<f64>,
        duration: Option<f64>,
        code: Option<f64>,
        message: Option<String>,
    ) -> Self {
        Self {
            name,
            video_id,
            seconds,
            duration,
            code,
            message,
        }
    }
}

impl NativeEvent {
    /// Shorthand used by unit tests and internal senders.
    pub(crate) fn named(name: &str) -> Self {
        Self::new(name.to_string(), None, None, None, None, None)
    }

    #[inline(always)]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub(crate) fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    #[inline(always)]
    pub(crate) fn seconds(&self) -> Option<f64> {
        self.seconds
    }

    #[inline(always)]
    pub(crate) fn duration(&self) -> Option<f64> {
        self.duration
    }

    #[inline(always)]
    pub(crate) fn code(&self) -> Option<f64> {
        self.code
    }

    #[inline(always)]
    pub(crate) fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
