//! Host console logging.
//!
//! On wasm32 this goes to the browser console like the rest of the web
//! build; native builds write to stderr.

#[cfg(target_arch = "wasm32")]
pub fn log(message: &str) {
    web_sys::console::log_1(&format!("Streamer Clicker: {message}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(message: &str) {
    web_sys::console::warn_1(&format!("Streamer Clicker: {message}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(message: &str) {
    eprintln!("Streamer Clicker: {message}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(message: &str) {
    eprintln!("Streamer Clicker [warn]: {message}");
}
