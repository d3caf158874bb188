//! Master/slave playback groups

mod coordinator;

#[cfg(test)]
mod tests;

pub use coordinator::{GroupCoordinator, PlaybackGroup, ShareResult, encode_receivers};
