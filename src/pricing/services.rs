//! Costing sessions shared by the package creation and edit flows.
//!
//! Both flows hold a [`CostingSession`]: the profile being edited plus the
//! totals of its latest recomputation. Every edit goes through the session, so
//! creation-time and edit-time totals are always derived by the same engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::models::{
    BangladeshFixedField, CategoryId, PackageCostProfile, PackageType, PricingShape,
    SaudiFixedField,
};
use super::calculators::{select_bangladesh_source, select_saudi_source, CostSource};
use super::normalizer::normalize;
use super::store::{LineItemDraft, LineItemPatch};
use super::totals::{compute_totals, Totals};

/// Costing error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CostingError {
    #[error("Category {category} expects {expected} line items, got {found}")]
    ShapeMismatch {
        category: CategoryId,
        expected: PricingShape,
        found: PricingShape,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("Draft {0} not found")]
    DraftNotFound(Uuid),

    #[error("Unknown cost category '{0}'")]
    UnknownCategory(String),
}

/// Save-time policy checks layered on top of the engine's output.
///
/// The engine itself never fails; these rules only gate the hand-off to
/// persistence.
pub fn validate_for_save(
    profile: &PackageCostProfile,
    totals: &Totals,
) -> Result<(), CostingError> {
    let mut errors = Vec::new();

    if totals.grand_total.is_zero() {
        errors.push("Grand total must be greater than zero".to_string());
    }
    if !has_populated_source(profile) {
        errors.push("At least one cost category must be populated".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CostingError::Validation {
            message: errors.join("; "),
            errors,
        })
    }
}

/// True when an active side has at least one line item or non-zero fixed fee.
fn has_populated_source(profile: &PackageCostProfile) -> bool {
    let bangladesh_items = CategoryId::BANGLADESH
        .into_iter()
        .any(|c| !profile.categories.list(c).is_empty());
    let bangladesh_fixed = select_bangladesh_source(profile) == CostSource::Fixed
        && profile.fixed_fields.bangladesh.iter().any(|(_, v)| !v.is_zero());

    let saudi = match select_saudi_source(profile) {
        CostSource::Categories => CategoryId::SAUDI
            .into_iter()
            .any(|c| !profile.categories.list(c).is_empty()),
        CostSource::Fixed => profile.fixed_fields.saudi.iter().any(|(_, v)| !v.is_zero()),
    };

    bangladesh_items || bangladesh_fixed || saudi
}

/// How a session was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOrigin {
    /// Creation flow, starting from an empty profile
    NewPackage,
    /// Edit flow, starting from a persisted package
    ExistingPackage,
}

/// What the persistence collaborator receives on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSubmission {
    pub profile: PackageCostProfile,
    pub totals: Totals,
}

/// A profile under edit together with its current totals.
#[derive(Debug, Clone)]
pub struct CostingSession {
    id: Uuid,
    origin: SessionOrigin,
    profile: PackageCostProfile,
    totals: Totals,
    opened_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CostingSession {
    fn open(origin: SessionOrigin, profile: PackageCostProfile) -> Self {
        let now = Utc::now();
        let totals = compute_totals(&profile);
        Self {
            id: Uuid::new_v4(),
            origin,
            profile,
            totals,
            opened_at: now,
            updated_at: now,
        }
    }

    /// Creation flow: empty profile.
    pub fn for_new_package() -> Self {
        Self::open(SessionOrigin::NewPackage, PackageCostProfile::default())
    }

    /// Edit flow: profile loaded from a persisted package.
    pub fn from_profile(profile: PackageCostProfile) -> Self {
        Self::open(SessionOrigin::ExistingPackage, profile)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    pub fn profile(&self) -> &PackageCostProfile {
        &self.profile
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn recompute(&mut self) {
        self.totals = compute_totals(&self.profile);
        self.updated_at = Utc::now();
        tracing::debug!(
            draft_id = %self.id,
            grand_total = %self.totals.grand_total,
            "Recomputed package totals"
        );
    }

    pub fn add_item(
        &mut self,
        category: CategoryId,
        draft: LineItemDraft,
    ) -> Result<Uuid, CostingError> {
        let id = self.profile.categories.add(category, draft)?;
        self.recompute();
        Ok(id)
    }

    /// Returns `false` when the item no longer exists (a no-op).
    pub fn update_item(&mut self, category: CategoryId, id: Uuid, patch: &LineItemPatch) -> bool {
        let found = self.profile.categories.update(category, id, patch);
        self.recompute();
        found
    }

    /// Returns `false` when the item no longer exists (a no-op).
    pub fn remove_item(&mut self, category: CategoryId, id: Uuid) -> bool {
        let found = self.profile.categories.remove(category, id);
        self.recompute();
        found
    }

    pub fn set_bangladesh_fixed(&mut self, field: BangladeshFixedField, raw: &Value) {
        self.profile.fixed_fields.bangladesh.set(field, raw);
        self.recompute();
    }

    pub fn set_saudi_fixed(&mut self, field: SaudiFixedField, raw: &Value) {
        self.profile.fixed_fields.saudi.set(field, raw);
        self.recompute();
    }

    /// Changes which data is read; stored items and fields are untouched.
    pub fn set_package_type(&mut self, package_type: PackageType) {
        self.profile.package_type = package_type;
        self.recompute();
    }

    pub fn toggle_package_type(&mut self) {
        self.set_package_type(self.profile.package_type.toggled());
    }

    pub fn set_exchange_rate(&mut self, raw: &Value) {
        self.profile.exchange_rate = normalize(raw);
        self.recompute();
    }

    pub fn set_discount(&mut self, raw: &Value) {
        self.profile.discount = normalize(raw);
        self.recompute();
    }

    /// Validate and package the profile for the persistence collaborator.
    pub fn submission(&self) -> Result<PackageSubmission, CostingError> {
        validate_for_save(&self.profile, &self.totals)?;
        Ok(PackageSubmission {
            profile: self.profile.clone(),
            totals: self.totals.clone(),
        })
    }
}
