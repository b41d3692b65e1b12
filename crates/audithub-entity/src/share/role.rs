//! Coarse access role derived from a share permission set.

use serde::{Deserialize, Serialize};

use super::permissions::SharePermissions;

/// Coarse-grained access level for a share recipient.
///
/// Roles are always derived from a permission set and never stored on
/// their own; recomputing keeps the two from drifting apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareRole {
    /// Read-only access.
    Viewer,
    /// Read plus comment access.
    Reviewer,
    /// Full edit access. Editing authority itself is enforced by the
    /// collaborative editor, not by this subsystem.
    Owner,
}

impl ShareRole {
    /// Derive the role for a permission set.
    ///
    /// Total and deterministic: the highest-privilege flag wins, and an
    /// empty set still resolves to [`ShareRole::Viewer`] because read-only
    /// is the floor for any valid share.
    pub fn from_permissions(perms: &SharePermissions) -> Self {
        if perms.edit {
            Self::Owner
        } else if perms.comment {
            Self::Reviewer
        } else {
            Self::Viewer
        }
    }

    /// Stable string form used in responses and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Reviewer => "reviewer",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for ShareRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
