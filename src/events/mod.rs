//! Delivery of receiver-pushed events to the application

mod bridge;


pub use bridge::{AppMessageHandler, PlaybackStoppedHandler, StatusBridge, StatusHandler};
