//! Remote control commands

pub mod playback;
pub mod volume;


pub use playback::{PlaybackCommand, SeekRequest, StreamCycle};
pub use volume::Volume;
