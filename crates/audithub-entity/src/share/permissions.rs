//! Share permission set.

use serde::{Deserialize, Serialize};

/// The set of permissions a share token can carry.
///
/// The system only ever reasons about these three flags, so the set is a
/// fixed struct over the closed vocabulary rather than an open map.
/// Unknown flags in incoming JSON are rejected at deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SharePermissions {
    /// Read the session and its audit trail.
    #[serde(default)]
    pub read: bool,
    /// Leave comments on the session.
    #[serde(default)]
    pub comment: bool,
    /// Edit the session content.
    #[serde(default)]
    pub edit: bool,
}

impl SharePermissions {
    /// A read-only permission set.
    pub fn read_only() -> Self {
        Self {
            read: true,
            comment: false,
            edit: false,
        }
    }

    /// Whether no permission flag is set.
    pub fn is_empty(&self) -> bool {
        !self.read && !self.comment && !self.edit
    }

    /// Whether this set grants at least read-equivalent access.
    ///
    /// Every valid share grants read access: a token scoped to comment or
    /// edit could not be exercised without seeing the session, so read is
    /// the floor rather than an independent gate.
    pub fn allows_read(&self) -> bool {
        true
    }
}
