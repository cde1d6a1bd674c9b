//! Shared option types that replace boolean flag parameters in the Rust API.

use serde::{Deserialize, Serialize};

/// Controls whether the protocol mapper lets mutating requests reach the network.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// Every verb is dispatched to the transport.
    #[default]
    ReadWrite,
    /// COPY, DELETE, MOVE, PATCH, POST and PUT are rejected before dispatch.
    ReadOnly,
}

impl AccessMode {
    pub fn is_read_only(self) -> bool {
        matches!(self, AccessMode::ReadOnly)
    }
}

impl From<bool> for AccessMode {
    /// `true` means read-only.
    fn from(value: bool) -> Self {
        if value {
            AccessMode::ReadOnly
        } else {
            AccessMode::ReadWrite
        }
    }
}

/// Says what a 409 Conflict means for the operation that received it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OnConflict {
    /// The target was already there (create operations).
    AlreadyExists,
    /// The server rejected the supplied checksum.
    FixityMismatch,
    /// Anything else: a lock, a constraint, an unsupported change.
    Conflict,
}
