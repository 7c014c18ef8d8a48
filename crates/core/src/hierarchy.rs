//! Structural rules for the asset hierarchy.
//!
//! Standalone assets can be assigned to users and can parent components;
//! component assets are either spare stock or installed into a standalone
//! parent and are never directly assigned. The checks here are pure: the
//! store resolves the referenced entities and passes in the facts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Whether `unassign` clears the asset's location.
///
/// Policy decision: the last known location is retained until explicitly
/// changed, so an unassigned laptop still shows where it physically is.
pub const CLEAR_LOCATION_ON_UNASSIGN: bool = false;

/// Structural kind of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Standalone,
    Component,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Standalone => "standalone",
            AssetType::Component => "component",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business criticality of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

/// Physical condition of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Reject assignment of component assets.
pub fn ensure_assignable(asset_type: AssetType) -> Result<(), CoreError> {
    match asset_type {
        AssetType::Standalone => Ok(()),
        AssetType::Component => Err(CoreError::StructuralViolation(
            "Component assets cannot be assigned to a user".to_string(),
        )),
    }
}

/// Components must never carry an assignment.
pub fn ensure_component_unassigned(
    asset_type: AssetType,
    assigned_to: Option<DbId>,
) -> Result<(), CoreError> {
    if asset_type == AssetType::Component && assigned_to.is_some() {
        return Err(CoreError::StructuralViolation(
            "Component assets cannot carry an assignment".to_string(),
        ));
    }
    Ok(())
}

/// Only component assets may reference a parent.
pub fn ensure_parent_link_allowed(
    asset_type: AssetType,
    parent_asset_id: Option<DbId>,
) -> Result<(), CoreError> {
    if asset_type == AssetType::Standalone && parent_asset_id.is_some() {
        return Err(CoreError::StructuralViolation(
            "Standalone assets cannot reference a parent asset".to_string(),
        ));
    }
    Ok(())
}

/// A parent must exist, be live, and be standalone.
///
/// The store resolves the parent and passes its type and deleted flag;
/// a missing parent is reported by the store as `NotFound` before this
/// check runs.
pub fn ensure_parent_eligible(
    parent_id: DbId,
    parent_type: AssetType,
    parent_deleted: bool,
) -> Result<(), CoreError> {
    if parent_deleted {
        return Err(CoreError::StructuralViolation(format!(
            "Parent asset {parent_id} is deleted and cannot accept components"
        )));
    }
    if parent_type != AssetType::Standalone {
        return Err(CoreError::StructuralViolation(format!(
            "Parent asset {parent_id} is a component; only standalone assets can parent components"
        )));
    }
    Ok(())
}

/// Warranty window must be ordered when both ends are present.
pub fn validate_warranty_window(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(CoreError::Validation(format!(
                "warranty_start_date {start} is after warranty_end_date {end}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standalone_is_assignable() {
        assert!(ensure_assignable(AssetType::Standalone).is_ok());
    }

    #[test]
    fn component_is_not_assignable() {
        let err = ensure_assignable(AssetType::Component).unwrap_err();
        assert!(matches!(err, CoreError::StructuralViolation(_)));
    }

    #[test]
    fn component_with_assignment_rejected() {
        let err = ensure_component_unassigned(AssetType::Component, Some(7)).unwrap_err();
        assert!(matches!(err, CoreError::StructuralViolation(_)));
    }

    #[test]
    fn standalone_with_assignment_ok() {
        assert!(ensure_component_unassigned(AssetType::Standalone, Some(7)).is_ok());
    }

    #[test]
    fn standalone_with_parent_rejected() {
        let err = ensure_parent_link_allowed(AssetType::Standalone, Some(3)).unwrap_err();
        assert!(matches!(err, CoreError::StructuralViolation(_)));
    }

    #[test]
    fn component_without_parent_ok() {
        // Spare stock: a component not installed anywhere.
        assert!(ensure_parent_link_allowed(AssetType::Component, None).is_ok());
    }

    #[test]
    fn deleted_parent_rejected() {
        let err = ensure_parent_eligible(4, AssetType::Standalone, true).unwrap_err();
        assert!(matches!(err, CoreError::StructuralViolation(_)));
    }

    #[test]
    fn component_parent_rejected() {
        let err = ensure_parent_eligible(4, AssetType::Component, false).unwrap_err();
        assert!(matches!(err, CoreError::StructuralViolation(_)));
    }

    #[test]
    fn live_standalone_parent_ok() {
        assert!(ensure_parent_eligible(4, AssetType::Standalone, false).is_ok());
    }

    #[test]
    fn warranty_window_ordered() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(validate_warranty_window(Some(start), Some(end)).is_ok());
        assert!(validate_warranty_window(Some(end), Some(start)).is_err());
        assert!(validate_warranty_window(None, Some(end)).is_ok());
    }
}
