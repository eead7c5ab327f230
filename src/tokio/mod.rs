//! Non-blocking client for callers already running a tokio runtime
//!
pub mod devices;

pub use devices::Shelly1;
