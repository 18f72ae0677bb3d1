//! Response DTOs for costing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculators::round_money;
use super::models::{LineItem, PackageCostProfile, Side, HOME_CURRENCY};
use super::services::{CostingSession, PackageSubmission, SessionOrigin};
use super::totals::Totals;

/// Money value for JSON responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// Amount rounded to two places for display, e.g. "13725.00"
    pub display: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            display: format!("{:.2}", round_money(amount, 2)),
        }
    }

    /// Amount in the home currency
    pub fn home(amount: Decimal) -> Self {
        Self::new(amount, HOME_CURRENCY)
    }

    /// Amount in the currency `side` is entered in
    pub fn on(side: Side, amount: Decimal) -> Self {
        Self::new(amount, side.currency())
    }
}

/// Response for a stateless totals computation
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub totals: Totals,
}

/// Response for save-time validation
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub totals: Totals,
}

/// Full state of an open costing draft
#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub draft_id: Uuid,
    pub origin: SessionOrigin,
    pub package_type_label: &'static str,
    pub opened_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: PackageCostProfile,
    pub totals: Totals,
}

impl From<&CostingSession> for DraftResponse {
    fn from(session: &CostingSession) -> Self {
        Self {
            draft_id: session.id(),
            origin: session.origin(),
            package_type_label: session.profile().package_type.label(),
            opened_at: session.opened_at(),
            updated_at: session.updated_at(),
            profile: session.profile().clone(),
            totals: session.totals().clone(),
        }
    }
}

/// Response for line-item edits
#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub draft_id: Uuid,
    /// `None` when the item was removed or no longer exists
    pub item: Option<LineItem>,
    /// Whether the targeted item existed
    pub applied: bool,
    pub totals: Totals,
}

/// Response for a submitted draft
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub draft_id: Uuid,
    pub submission: PackageSubmission,
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub open_drafts: u64,
}

/// Generic costing error response
#[derive(Debug, Serialize)]
pub struct CostingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
