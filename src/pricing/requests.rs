//! Request DTOs for costing API endpoints.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::models::{BangladeshFixedField, PackageCostProfile, PackageType, SaudiFixedField};

/// Request to open a costing draft.
///
/// Without a profile the draft starts empty (new package); with one it
/// continues editing a persisted package.
#[derive(Debug, Default, Deserialize)]
pub struct OpenDraftRequest {
    #[serde(default)]
    pub profile: Option<PackageCostProfile>,
}

/// Request to edit profile-level settings of a draft.
///
/// Numeric values are raw form input and are normalized on the way in.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraftRequest {
    #[serde(default)]
    pub package_type: Option<PackageType>,
    #[serde(default)]
    pub toggle_package_type: bool,
    #[serde(default)]
    pub exchange_rate: Option<Value>,
    #[serde(default)]
    pub discount: Option<Value>,
    #[serde(default)]
    pub bangladesh_fixed: BTreeMap<BangladeshFixedField, Value>,
    #[serde(default)]
    pub saudi_fixed: BTreeMap<SaudiFixedField, Value>,
}
