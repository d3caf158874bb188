//! Pull-based streaming of a local source to a receiver

mod session;
mod source;


pub use session::{DEFAULT_MAX_BLOCK_SIZE, SessionState, StreamingSession};
pub use source::{DataBlock, MediaSource, OpenSource};
