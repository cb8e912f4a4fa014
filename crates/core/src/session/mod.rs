//! Session lifecycle ports.

pub mod ports;

pub use ports::{Notice, NoopSessionObserver, SessionObserver, SessionState};
