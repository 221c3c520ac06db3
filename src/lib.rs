//! Keystroke-level typing drills in a raw-mode terminal.
//!
//! A background [`event::KeystrokeSource`] reads standard input, and a
//! [`session::trainer::Trainer`] has the user copy each line, stopping an
//! attempt at the first wrong key.

pub mod config;
pub mod error;
pub mod event;
pub mod generator;
pub mod logging;
pub mod session;
pub mod terminal;
pub mod ui;
