//! Streamer Clicker: the economy core of an idle clicker game.
//!
//! The presentation layer drives an [`economy::Economy`] through its command
//! methods (click, purchase, tick, suspend/resume) and renders
//! [`economy::EconomyView`]. Rendering and input handling live elsewhere.

pub mod console;
pub mod economy;
pub mod time;

pub use economy::{Economy, EconomyView};
