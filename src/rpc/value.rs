//! Typed values exchanged with the RPC transport

use std::collections::BTreeMap;

use bytes::Bytes;

/// A typed RPC value
#[derive(Debug, Clone, PartialEq)]
pub enum RpcValue {
    /// Boolean
    Bool(bool),
    /// Unsigned 8-bit integer
    U8(u8),
    /// Unsigned 32-bit integer
    U32(u32),
    /// Unsigned 64-bit integer
    U64(u64),
    /// Double precision float
    F64(f64),
    /// UTF-8 string
    String(String),
    /// Opaque binary data
    Blob(Bytes),
    /// Ordered list of values
    Array(Vec<RpcValue>),
    /// Named fields
    Struct(BTreeMap<String, RpcValue>),
}

impl RpcValue {
    /// Build a struct value from `(key, value)` pairs
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RpcValue)>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Get as bool
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as u8
    #[must_use]
    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Self::U8(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as u32, widening smaller integers
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U8(v) => Some(u32::from(*v)),
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as u64, widening smaller integers
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(u64::from(*v)),
            Self::U32(v) => Some(u64::from(*v)),
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as f64
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as blob
    #[must_use]
    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Get as array
    #[must_use]
    pub fn as_array(&self) -> Option<&[RpcValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a struct field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&RpcValue> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }
}

impl From<bool> for RpcValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for RpcValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u32> for RpcValue {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for RpcValue {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<f64> for RpcValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for RpcValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for RpcValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Bytes> for RpcValue {
    fn from(v: Bytes) -> Self {
        Self::Blob(v)
    }
}

impl From<Vec<RpcValue>> for RpcValue {
    fn from(v: Vec<RpcValue>) -> Self {
        Self::Array(v)
    }
}
