//! Type-safe player identity wrapper around [`Uuid`].
//!
//! Every ledger row is keyed by a stable player UUID handed to us by the
//! front-end. The newtype keeps player identities from being confused with
//! any other UUID floating through the system, and owns the canonical
//! 36-character string form used as the storage primary key.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable unique identity for a player ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Create a fresh random identity (v4).
    ///
    /// Production identities arrive from the session layer; this exists for
    /// tests and seed data.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }

    /// The hyphenated 36-character form stored in the `identity` column.
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PlayerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<PlayerId> for Uuid {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_hyphenated_uuid() {
        let id = PlayerId::new();
        let key = id.storage_key();
        assert_eq!(key.len(), 36);
        assert_eq!(key, id.into_inner().to_string());
    }

    #[test]
    fn roundtrip_through_str() {
        let id = PlayerId::new();
        let parsed: Result<PlayerId, _> = id.storage_key().parse();
        assert_eq!(parsed.ok(), Some(id));
    }

    #[test]
    fn roundtrip_through_serde() {
        let id = PlayerId::new();
        let json = serde_json::to_string(&id).ok();
        let restored: Option<PlayerId> =
            json.as_deref().and_then(|j| serde_json::from_str(j).ok());
        assert_eq!(restored, Some(id));
    }
}
