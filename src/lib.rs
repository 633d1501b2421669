#![allow(dead_code)]

use wasm_bindgen::prelude::*;

mod bindings;
mod controllers;
mod mount;
pub mod player;
mod script_loader;
mod services;
mod utils;

pub use bindings::{CreatePlayerErrorCode, CreatePlayerResult, LogLevel, NativeEvent};
pub use controllers::{Command, PlayerKind};
pub use utils::logger::Logger;
