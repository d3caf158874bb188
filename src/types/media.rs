use serde::{Deserialize, Serialize};

use super::Remote;
use crate::rpc::RpcValue;

/// Kind of media a shared file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaFileType {
    /// Audio track
    Audio,
    /// Video
    Video,
    /// Still image
    Image,
    /// Playlist
    Playlist,
}

impl MediaFileType {
    /// Decode the wire code (0 = audio, 1 = video, 2 = image, 3 = playlist)
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Audio),
            1 => Some(Self::Video),
            2 => Some(Self::Image),
            3 => Some(Self::Playlist),
            _ => None,
        }
    }

    /// Wire code
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Audio => 0,
            Self::Video => 1,
            Self::Image => 2,
            Self::Playlist => 3,
        }
    }
}

/// A file shared by a media server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    /// The server that owns the file
    pub media_server: Remote,

    /// Server-assigned file id
    pub id: u32,

    /// File name
    pub name: String,

    /// Catalog section
    pub section: String,

    /// Path relative to the share root, empty if not reported
    pub rel_path: String,

    /// Media type
    pub file_type: MediaFileType,
}

impl MediaFile {
    /// Parse one entry of a `getFileList` response
    ///
    /// Returns the name of the first missing or mistyped field on failure.
    /// `rel_path` is optional since older servers do not send it.
    ///
    /// # Errors
    ///
    /// Returns the offending field name if a required field is absent.
    pub fn from_rpc(media_server: &Remote, entry: &RpcValue) -> Result<Self, &'static str> {
        let id = entry.field("id").and_then(RpcValue::as_u32).ok_or("id")?;
        let name = entry
            .field("filename")
            .and_then(RpcValue::as_str)
            .ok_or("filename")?;
        let section = entry
            .field("section")
            .and_then(RpcValue::as_str)
            .ok_or("section")?;
        let file_type = entry
            .field("type")
            .and_then(RpcValue::as_u8)
            .and_then(MediaFileType::from_code)
            .ok_or("type")?;
        let rel_path = entry
            .field("rel_path")
            .and_then(RpcValue::as_str)
            .unwrap_or_default();

        Ok(Self {
            media_server: media_server.clone(),
            id,
            name: name.to_string(),
            section: section.to_string(),
            rel_path: rel_path.to_string(),
            file_type,
        })
    }
}
