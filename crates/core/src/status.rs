//! Asset status state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the store and the API layer. The transition table is the single
//! source of truth for which status changes an asset may undergo.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Available,
    Assigned,
    InUse,
    UnderRepair,
    Maintenance,
    Disposed,
    InTransit,
    Lost,
    Damaged,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::Assigned => "assigned",
            AssetStatus::InUse => "in_use",
            AssetStatus::UnderRepair => "under_repair",
            AssetStatus::Maintenance => "maintenance",
            AssetStatus::Disposed => "disposed",
            AssetStatus::InTransit => "in_transit",
            AssetStatus::Lost => "lost",
            AssetStatus::Damaged => "damaged",
        }
    }

    /// Terminal states accept no further transitions (administrative
    /// override is out of scope).
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetStatus::Disposed | AssetStatus::Lost)
    }

    /// States that are incompatible with an active assignment. Any
    /// transition into one of these must clear `assigned_to` in the same
    /// commit, even if the caller forgot to unassign first.
    pub fn clears_assignment(&self) -> bool {
        matches!(
            self,
            AssetStatus::Disposed | AssetStatus::Lost | AssetStatus::Damaged
        )
    }

    /// States an asset may hold while assigned to a user.
    pub fn is_active_use(&self) -> bool {
        matches!(self, AssetStatus::Assigned | AssetStatus::InUse)
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for AssetStatus {
    fn default() -> Self {
        AssetStatus::Available
    }
}

/// Returns the set of valid target statuses reachable from `from`.
///
/// Terminal states (`disposed`, `lost`) return an empty slice. `assigned`
/// and `in_use` appear as targets only from states where an assignment
/// can exist; entering them is additionally guarded by the assign
/// operation itself.
pub fn valid_transitions(from: AssetStatus) -> &'static [AssetStatus] {
    use AssetStatus::*;
    match from {
        Available => &[
            Assigned, InUse, InTransit, UnderRepair, Maintenance, Disposed, Lost, Damaged,
        ],
        Assigned => &[InUse, Available, UnderRepair, Maintenance, Disposed, Lost, Damaged],
        InUse => &[Assigned, Available, UnderRepair, Maintenance, Disposed, Lost, Damaged],
        UnderRepair | Maintenance | InTransit | Damaged => &[
            Available, UnderRepair, Maintenance, InTransit, Disposed, Lost, Damaged,
        ],
        // Terminal
        Disposed | Lost => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
///
/// Staying in the same status is always allowed (a no-op, not a
/// transition).
pub fn can_transition(from: AssetStatus, to: AssetStatus) -> bool {
    from == to || valid_transitions(from).contains(&to)
}

/// Validate a status transition, returning a descriptive error for
/// invalid ones.
pub fn validate_transition(from: AssetStatus, to: AssetStatus) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status transition: {from} -> {to}"
        )))
    }
}
