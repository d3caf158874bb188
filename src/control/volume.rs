//! Receiver volume level

use crate::rpc::RpcValue;

/// Volume level on the receiver scale (0 = silent, 128 = max)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    /// Minimum volume (silent)
    pub const MIN: Self = Self(0);
    /// Maximum volume
    pub const MAX: Self = Self(128);

    /// Create a new volume level, clamped to the receiver range
    #[must_use]
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    /// Raw level (0 - 128)
    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    /// Get as percentage (0 - 100)
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Volume percentage fits in u8"
    )]
    pub fn as_percent(self) -> u8 {
        (f32::from(self.0) * 100.0 / f32::from(Self::MAX.0)).round() as u8
    }

    /// Create from percentage
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Result is at most 128"
    )]
    pub fn from_percent(percent: u8) -> Self {
        let percent = f32::from(percent.min(100));
        Self::new((percent * f32::from(Self::MAX.0) / 100.0).round() as u8)
    }

    /// Check if silent
    #[must_use]
    pub fn is_silent(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Volume {
    fn from(v: u8) -> Self {
        Self::new(v)
    }
}

impl From<Volume> for RpcValue {
    fn from(v: Volume) -> Self {
        RpcValue::U8(v.0)
    }
}
