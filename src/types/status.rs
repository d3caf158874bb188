use serde::{Deserialize, Serialize};

use crate::rpc::RpcValue;

/// Playback state reported by a receiver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteStatus {
    /// Nothing is playing
    #[default]
    Stopped,
    /// Media is playing
    Playing,
    /// Playback is paused
    Paused,
}

impl RemoteStatus {
    /// Decode the wire code (1 = stopped, 2 = playing, 3 = paused)
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Stopped),
            2 => Some(Self::Playing),
            3 => Some(Self::Paused),
            _ => None,
        }
    }
}

/// Snapshot of a receiver's playback status
///
/// A fresh value is built for every query or push; it is never updated in
/// place. When `error` is set the remaining fields carry no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PlaybackStatus {
    /// Reported state
    pub status: RemoteStatus,

    /// The status could not be obtained or decoded
    pub error: bool,

    /// Playback has stopped
    pub stopped: bool,

    /// Media is playing
    pub playing: bool,

    /// Duration of the current media (ms)
    pub duration: u64,

    /// Current position
    pub position: f64,

    /// Volume (0 - 128)
    pub volume: u8,

    /// Subtitles are disabled
    pub subtitles_off: bool,

    /// Title of the current media
    pub title: String,

    /// Artist of the current media
    pub artist: String,
}

impl PlaybackStatus {
    /// An error-flagged status
    #[must_use]
    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    /// Decode a `playback_status` record
    ///
    /// Every field must be present; a partial record is rejected as a
    /// whole. An unknown status code reads as [`RemoteStatus::Stopped`].
    ///
    /// # Errors
    ///
    /// Returns the name of the first missing or mistyped field.
    pub fn from_rpc(record: &RpcValue) -> Result<Self, &'static str> {
        let playing = record
            .field("playing")
            .and_then(RpcValue::as_bool)
            .ok_or("playing")?;
        let code = record
            .field("status")
            .and_then(RpcValue::as_u32)
            .ok_or("status")?;
        let status = RemoteStatus::from_code(code).unwrap_or_else(|| {
            tracing::warn!("Unknown remote status code {}, treating as stopped", code);
            RemoteStatus::Stopped
        });
        let duration = record
            .field("duration")
            .and_then(RpcValue::as_u64)
            .ok_or("duration")?;
        let position = record
            .field("position")
            .and_then(RpcValue::as_f64)
            .ok_or("position")?;
        let volume = record
            .field("volume")
            .and_then(RpcValue::as_u8)
            .ok_or("volume")?;
        let artist = record
            .field("artist")
            .and_then(RpcValue::as_str)
            .ok_or("artist")?;
        let title = record
            .field("title")
            .and_then(RpcValue::as_str)
            .ok_or("title")?;
        let stopped = record
            .field("stopped")
            .and_then(RpcValue::as_bool)
            .ok_or("stopped")?;
        let subtitles_off = record
            .field("subtitle_disable")
            .and_then(RpcValue::as_bool)
            .ok_or("subtitle_disable")?;

        Ok(Self {
            status,
            error: false,
            stopped,
            playing,
            duration,
            position,
            volume,
            subtitles_off,
            title: title.to_string(),
            artist: artist.to_string(),
        })
    }
}
