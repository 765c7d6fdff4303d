//! inactivity-guard - lifecycle-driven lock screen and privacy overlay.
//!
//! Watches application lifecycle transitions and decides when to cover the
//! screen with an overlay and when to require re-authentication.

pub mod clock;
pub mod config;
pub mod daemon;
pub mod lifecycle;
pub mod monitor;
pub mod navigation;
pub mod source;
pub mod store;

pub use crate::monitor::InactivityMonitor;
pub use crate::monitor::LockDecision;
