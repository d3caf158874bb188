//! Playback transport commands

use crate::rpc::RpcValue;

/// Wire code for byte-offset seeks
pub const SEEK_TYPE_BYTES: u8 = 1;

/// Wire code for percentage seeks
pub const SEEK_TYPE_PERCENTAGE: u8 = 2;

/// Transport controls without arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Start or resume
    Start,
    /// Stop
    Stop,
    /// Pause
    Pause,
    /// Rewind
    Rewind,
    /// Fast forward
    Forward,
}

impl PlaybackCommand {
    /// Remote method implementing the command
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Start => "playback_start",
            Self::Stop => "playback_stop",
            Self::Pause => "playback_pause",
            Self::Rewind => "playback_rewind",
            Self::Forward => "playback_forward",
        }
    }
}

/// Streams a receiver can cycle through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamCycle {
    /// Next subtitle track, enabling subtitles if off
    Subtitle,
    /// Next audio stream
    Audio,
    /// Next video stream
    Video,
}

impl StreamCycle {
    /// Remote method implementing the cycle
    #[must_use]
    pub fn method(self) -> &'static str {
        match self {
            Self::Subtitle => "cycle_subtitle",
            Self::Audio => "cycle_audio",
            Self::Video => "cycle_video",
        }
    }
}

/// Target of a `playback_seek`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekRequest {
    /// Absolute byte offset into the media
    ByteOffset(u64),
    /// Percentage of the duration (0 - 100)
    Percentage(u8),
}

impl SeekRequest {
    /// Percentage seek, clamped to 100
    #[must_use]
    pub fn percentage(value: u8) -> Self {
        Self::Percentage(value.min(100))
    }

    /// Encode as the `[seekType, value]` array `playback_seek` expects
    #[must_use]
    pub fn to_rpc(self) -> RpcValue {
        let items = match self {
            Self::ByteOffset(offset) => vec![
                RpcValue::U8(SEEK_TYPE_BYTES),
                RpcValue::U64(offset),
            ],
            Self::Percentage(pct) => vec![
                RpcValue::U8(SEEK_TYPE_PERCENTAGE),
                RpcValue::U8(pct),
            ],
        };
        RpcValue::Array(items)
    }
}
