mod js_functions;
mod native_event;

pub use js_functions::*;
pub use native_event::NativeEvent;
