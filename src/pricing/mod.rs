//! Package costing engine.
//!
//! Turns Bangladesh-side and Saudi-side cost inputs, an exchange rate and a
//! discount into one deterministic price breakdown. The calculators,
//! normalizer and aggregator are pure; `services` and `routes` host them for
//! the package creation and edit screens.

pub mod calculators;
pub mod models;
pub mod normalizer;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod store;
pub mod totals;

// Re-export commonly used items
pub use calculators::{
    category_subtotal, lodging_subtotal, per_diem_subtotal, round_money, select_bangladesh_source,
    select_saudi_source, standard_subtotal, to_home, CostSource,
};
pub use models::{
    BangladeshFixedField, CategoryId, LineItem, PackageCostProfile, PackageType, PackageTypeFlag,
    PassengerType, PricingShape, SaudiFixedField, Side,
};
pub use normalizer::normalize;
pub use routes::router;
pub use services::{validate_for_save, CostingError, CostingSession, PackageSubmission};
pub use store::{CategoryStore, LineItemDraft, LineItemPatch};
pub use totals::{compute_totals, BreakdownLine, Totals};
