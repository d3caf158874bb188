//! Core types module

mod config;
mod media;
mod remote;
mod status;


pub use config::{ClientConfig, ClientConfigBuilder};
pub use media::{MediaFile, MediaFileType};
pub use remote::Remote;
pub use status::{PlaybackStatus, RemoteStatus};
