//! Totals aggregation.
//!
//! [`compute_totals`] composes the calculators, the currency conversion and
//! the source selectors into one immutable [`Totals`] snapshot. It is pure and
//! total: any profile, however malformed, yields finite non-negative totals.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::calculators::{
    category_subtotal, effective_exchange_rate, select_bangladesh_source, select_saudi_source,
    sum, to_home, CostSource,
};
use super::models::{CategoryId, PackageCostProfile, PackageType, Side};
use super::normalizer::normalize_decimal;
use super::responses::MoneyResponse;

/// One row of the display/export breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub amount: MoneyResponse,
}

impl BreakdownLine {
    /// Row entered on one side, in that side's currency
    fn entered(key: impl Into<String>, label: &str, side: Side, amount: Decimal) -> Self {
        Self {
            key: key.into(),
            label: label.to_string(),
            side: Some(side),
            amount: MoneyResponse::on(side, amount),
        }
    }

    /// Row in the home currency
    fn home(key: &str, label: &str, side: Option<Side>, amount: Decimal) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            side,
            amount: MoneyResponse::home(amount),
        }
    }
}

/// Derived price quotation for a profile. Recomputed wholesale, never edited.
///
/// `bangladesh_fixed_total` and `saudi_fixed_foreign` are the raw sums of the
/// fixed fields; whether they reach the totals depends on the selected source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub package_type: PackageType,
    pub bangladesh_source: CostSource,
    pub saudi_source: CostSource,
    #[serde(with = "rust_decimal::serde::str")]
    pub exchange_rate: Decimal,
    pub per_category_subtotal: BTreeMap<CategoryId, Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub bangladesh_categories_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bangladesh_fixed_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub bangladesh_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub saudi_categories_foreign: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub saudi_fixed_foreign: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub saudi_total_foreign: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub saudi_total_home: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
    pub breakdown: Vec<BreakdownLine>,
}

impl Totals {
    pub fn category(&self, category: CategoryId) -> Decimal {
        self.per_category_subtotal
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

/// Compute the full quotation for a profile.
///
/// 1. Bangladesh categories are summed (standard formula).
/// 2. Bangladesh fixed fields are added on top when the fixed source is selected.
/// 3. Saudi categories are summed with their shape's formula.
/// 4. The Saudi foreign total is either the category sum or the fixed-field sum.
/// 5. The Saudi total is converted once.
/// 6. subtotal = Bangladesh + converted Saudi
/// 7. grand total = max(0, subtotal - discount)
pub fn compute_totals(profile: &PackageCostProfile) -> Totals {
    let bangladesh_source = select_bangladesh_source(profile);
    let saudi_source = select_saudi_source(profile);
    let exchange_rate = effective_exchange_rate(normalize_decimal(profile.exchange_rate));

    let per_category_subtotal: BTreeMap<CategoryId, Decimal> = CategoryId::ALL
        .into_iter()
        .map(|c| (c, category_subtotal(c, profile.categories.list(c))))
        .collect();
    let subtotal_of = |c: CategoryId| {
        per_category_subtotal
            .get(&c)
            .copied()
            .unwrap_or(Decimal::ZERO)
    };

    let bangladesh_categories_total = sum(CategoryId::BANGLADESH.into_iter().map(subtotal_of));
    let bangladesh_fixed_total = sum(profile.fixed_fields.bangladesh.iter().map(|(_, v)| v));
    let bangladesh_total = match bangladesh_source {
        // Additive, not exclusive: the fixed Hajj fees stack on the categories.
        CostSource::Fixed => sum([bangladesh_categories_total, bangladesh_fixed_total]),
        CostSource::Categories => bangladesh_categories_total,
    };

    let saudi_categories_foreign = sum(CategoryId::SAUDI.into_iter().map(subtotal_of));
    let saudi_fixed_foreign = sum(profile.fixed_fields.saudi.iter().map(|(_, v)| v));
    let saudi_total_foreign = match saudi_source {
        CostSource::Categories => saudi_categories_foreign,
        CostSource::Fixed => saudi_fixed_foreign,
    };
    let saudi_total_home = to_home(saudi_total_foreign, exchange_rate);

    let subtotal = sum([bangladesh_total, saudi_total_home]);
    let discount = normalize_decimal(profile.discount);
    let grand_total = if discount >= subtotal {
        Decimal::ZERO
    } else {
        (subtotal - discount).normalize()
    };

    let mut breakdown = Vec::new();
    for category in CategoryId::BANGLADESH {
        if !profile.categories.list(category).is_empty() {
            breakdown.push(BreakdownLine::entered(
                category.as_str(),
                category.label(),
                Side::Bangladesh,
                subtotal_of(category),
            ));
        }
    }
    if bangladesh_source == CostSource::Fixed {
        for (field, amount) in profile.fixed_fields.bangladesh.iter() {
            if !amount.is_zero() {
                breakdown.push(BreakdownLine::entered(
                    format!("bd_fixed.{}", field_key(&field)),
                    field.label(),
                    Side::Bangladesh,
                    normalize_decimal(amount),
                ));
            }
        }
    }
    match saudi_source {
        CostSource::Categories => {
            for category in CategoryId::SAUDI {
                if !profile.categories.list(category).is_empty() {
                    breakdown.push(BreakdownLine::entered(
                        category.as_str(),
                        category.label(),
                        Side::Saudi,
                        subtotal_of(category),
                    ));
                }
            }
        }
        CostSource::Fixed => {
            for (field, amount) in profile.fixed_fields.saudi.iter() {
                if !amount.is_zero() {
                    breakdown.push(BreakdownLine::entered(
                        format!("sa_fixed.{}", field_key(&field)),
                        field.label(),
                        Side::Saudi,
                        normalize_decimal(amount),
                    ));
                }
            }
        }
    }
    let saudi = Some(Side::Saudi);
    breakdown.extend([
        BreakdownLine::entered(
            "bangladesh_total",
            "Bangladesh total",
            Side::Bangladesh,
            bangladesh_total,
        ),
        BreakdownLine::entered(
            "saudi_total_foreign",
            "Saudi total",
            Side::Saudi,
            saudi_total_foreign,
        ),
        BreakdownLine::home("saudi_total_home", "Saudi total (converted)", saudi, saudi_total_home),
        BreakdownLine::home("subtotal", "Subtotal", None, subtotal),
        BreakdownLine::home("discount", "Discount", None, discount),
        BreakdownLine::home("grand_total", "Grand total", None, grand_total),
    ]);

    Totals {
        package_type: profile.package_type,
        bangladesh_source,
        saudi_source,
        exchange_rate,
        per_category_subtotal,
        bangladesh_categories_total,
        bangladesh_fixed_total,
        bangladesh_total,
        saudi_categories_foreign,
        saudi_fixed_foreign,
        saudi_total_foreign,
        saudi_total_home,
        subtotal,
        discount,
        grand_total,
        breakdown,
    }
}

/// Wire name of a fixed-field enum value.
fn field_key<T: Serialize>(field: &T) -> String {
    match serde_json::to_value(field) {
        Ok(serde_json::Value::String(key)) => key,
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{BangladeshFixedField, PassengerType, SaudiFixedField};
    use crate::pricing::store::{LineItemDraft, LodgingDraft, PerDiemDraft, StandardDraft};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn add_standard(
        profile: &mut PackageCostProfile,
        category: CategoryId,
        quantity: i64,
        price: i64,
    ) {
        profile
            .categories
            .add(
                category,
                LineItemDraft::Standard(StandardDraft {
                    passenger_type: PassengerType::Adult,
                    quantity: json!(quantity),
                    unit_price: json!(price),
                }),
            )
            .unwrap();
    }

    fn add_hotel(profile: &mut PackageCostProfile, rooms: i64, nightly: i64, nights: i64) {
        profile
            .categories
            .add(
                CategoryId::SaMakkahHotel,
                LineItemDraft::Lodging(LodgingDraft {
                    hotel_name: "Swissotel Makkah".to_string(),
                    room_count: json!(rooms),
                    nightly_rate: json!(nightly),
                    nights: json!(nights),
                    person_count: json!(4),
                    ..Default::default()
                }),
            )
            .unwrap();
    }

    fn add_food(profile: &mut PackageCostProfile, quantity: i64, days: i64, rate: i64) {
        profile
            .categories
            .add(
                CategoryId::SaMakkahFood,
                LineItemDraft::PerDiem(PerDiemDraft {
                    quantity: json!(quantity),
                    days: json!(days),
                    per_day_rate: json!(rate),
                    ..Default::default()
                }),
            )
            .unwrap();
    }

    #[test]
    fn test_bangladesh_visa_only() {
        let mut profile = PackageCostProfile::new(PackageType::CustomUmrah);
        add_standard(&mut profile, CategoryId::BdVisa, 2, 500);

        let totals = compute_totals(&profile);
        assert_eq!(totals.category(CategoryId::BdVisa), dec!(1000));
        assert_eq!(totals.bangladesh_total, dec!(1000));
        assert_eq!(totals.subtotal, dec!(1000));
        assert_eq!(totals.grand_total, dec!(1000));
    }

    #[test]
    fn test_custom_package_with_hotel_and_discount() {
        let mut profile = PackageCostProfile::new(PackageType::CustomHajj);
        profile.exchange_rate = dec!(30);
        profile.discount = dec!(5000);
        add_standard(&mut profile, CategoryId::BdVisa, 2, 500);
        add_hotel(&mut profile, 2, 300, 3);

        let totals = compute_totals(&profile);
        assert_eq!(totals.saudi_total_foreign, dec!(1800));
        assert_eq!(totals.saudi_total_home, dec!(54000));
        assert_eq!(totals.subtotal, dec!(55000));
        assert_eq!(totals.grand_total, dec!(50000));
    }

    #[test]
    fn test_empty_profile_is_zero() {
        let totals = compute_totals(&PackageCostProfile::default());
        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.grand_total, dec!(0));
        assert!(totals.per_category_subtotal.values().all(|v| v.is_zero()));
    }

    #[test]
    fn test_discount_never_drives_total_negative() {
        let mut profile = PackageCostProfile::new(PackageType::Umrah);
        add_standard(&mut profile, CategoryId::BdAirfare, 1, 8000);
        profile.discount = dec!(10000);

        let totals = compute_totals(&profile);
        assert_eq!(totals.subtotal, dec!(8000));
        assert_eq!(totals.grand_total, dec!(0));
    }

    #[test]
    fn test_negative_discount_is_ignored() {
        let mut profile = PackageCostProfile::new(PackageType::Umrah);
        add_standard(&mut profile, CategoryId::BdAirfare, 1, 8000);
        profile.discount = dec!(-500);

        let totals = compute_totals(&profile);
        assert_eq!(totals.discount, dec!(0));
        assert_eq!(totals.grand_total, dec!(8000));
    }

    #[test]
    fn test_food_is_converted_at_aggregate() {
        let mut profile = PackageCostProfile::new(PackageType::CustomUmrah);
        profile.exchange_rate = dec!(30);
        add_food(&mut profile, 3, 5, 40);

        let totals = compute_totals(&profile);
        assert_eq!(totals.category(CategoryId::SaMakkahFood), dec!(600));
        assert_eq!(totals.saudi_total_home, dec!(18000));
    }

    #[test]
    fn test_exchange_rate_scaling_only_touches_saudi_side() {
        let mut profile = PackageCostProfile::new(PackageType::CustomHajj);
        profile.exchange_rate = dec!(29.5);
        add_standard(&mut profile, CategoryId::BdBus, 4, 1500);
        add_hotel(&mut profile, 1, 420, 7);
        add_food(&mut profile, 2, 10, 35);
        let base = compute_totals(&profile);

        let k = dec!(1.75);
        profile.exchange_rate *= k;
        let scaled = compute_totals(&profile);

        assert_eq!(scaled.saudi_total_home, base.saudi_total_home * k);
        assert_eq!(scaled.bangladesh_total, base.bangladesh_total);
        assert_eq!(scaled.saudi_total_foreign, base.saudi_total_foreign);
    }

    #[test]
    fn test_non_positive_exchange_rate_treated_as_one() {
        let mut profile = PackageCostProfile::new(PackageType::CustomUmrah);
        add_hotel(&mut profile, 1, 100, 2);
        profile.exchange_rate = dec!(0);

        let totals = compute_totals(&profile);
        assert_eq!(totals.exchange_rate, dec!(1));
        assert_eq!(totals.saudi_total_home, dec!(200));
    }

    #[test]
    fn test_saudi_sources_are_exclusive() {
        let mut profile = PackageCostProfile::new(PackageType::Umrah);
        add_hotel(&mut profile, 2, 300, 3);
        profile.fixed_fields.saudi.set(SaudiFixedField::Maktab, &json!(700));
        profile.fixed_fields.saudi.set(SaudiFixedField::ZamzamWater, &json!(50));

        let fixed = compute_totals(&profile);
        assert_eq!(fixed.saudi_source, CostSource::Fixed);
        assert_eq!(fixed.saudi_total_foreign, dec!(750));
        // Category subtotals are still reported even when not the active source
        assert_eq!(fixed.saudi_categories_foreign, dec!(1800));

        profile.package_type = PackageType::CustomUmrah;
        let custom = compute_totals(&profile);
        assert_eq!(custom.saudi_total_foreign, dec!(1800));
        assert_eq!(custom.saudi_fixed_foreign, dec!(750));
    }

    #[test]
    fn test_bangladesh_fixed_fields_are_additive_for_hajj() {
        let mut profile = PackageCostProfile::new(PackageType::Hajj);
        add_standard(&mut profile, CategoryId::BdVisa, 1, 1000);
        profile
            .fixed_fields
            .bangladesh
            .set(BangladeshFixedField::IdCardFee, &json!(400));
        profile
            .fixed_fields
            .bangladesh
            .set(BangladeshFixedField::LicenseFee, &json!("2500"));

        let totals = compute_totals(&profile);
        assert_eq!(totals.bangladesh_source, CostSource::Fixed);
        assert_eq!(totals.bangladesh_categories_total, dec!(1000));
        assert_eq!(totals.bangladesh_fixed_total, dec!(2900));
        assert_eq!(totals.bangladesh_total, dec!(3900));

        // Other package types ignore the Bangladesh fixed fields
        profile.package_type = PackageType::Umrah;
        let totals = compute_totals(&profile);
        assert_eq!(totals.bangladesh_total, dec!(1000));
    }

    #[test]
    fn test_compute_totals_is_idempotent() {
        let mut profile = PackageCostProfile::new(PackageType::CustomHajj);
        profile.exchange_rate = dec!(31.25);
        profile.discount = dec!(1999.99);
        add_standard(&mut profile, CategoryId::BdTrainingOther, 3, 750);
        add_hotel(&mut profile, 2, 310, 5);
        add_food(&mut profile, 4, 12, 45);

        assert_eq!(compute_totals(&profile), compute_totals(&profile));
    }

    #[test]
    fn test_malformed_snapshot_degrades_to_zero() {
        let profile: PackageCostProfile = serde_json::from_value(json!({
            "package_type": "custom_umrah",
            "exchange_rate": "not a rate",
            "discount": -20,
            "fixed_fields": {"saudi": {"maktab": "n/a"}},
            "categories": {
                "sa_makkah_hotel": [
                    {"shape": "lodging", "room_count": null, "nightly_rate": "300", "nights": 3},
                    {"shape": "standard", "quantity": 2, "unit_price": 10}
                ],
                "bd_visa": [{"shape": "standard", "quantity": "", "unit_price": 500}]
            }
        }))
        .unwrap();

        let totals = compute_totals(&profile);
        assert_eq!(totals.exchange_rate, dec!(1));
        assert_eq!(totals.discount, dec!(0));
        assert_eq!(totals.subtotal, dec!(0));
        assert_eq!(totals.grand_total, dec!(0));
    }

    #[test]
    fn test_breakdown_lists_active_sources() {
        let mut profile = PackageCostProfile::new(PackageType::Umrah);
        add_standard(&mut profile, CategoryId::BdVisa, 2, 500);
        add_hotel(&mut profile, 2, 300, 3);
        profile.fixed_fields.saudi.set(SaudiFixedField::MakkahHotel1, &json!(900));

        let totals = compute_totals(&profile);
        let keys: Vec<&str> = totals.breakdown.iter().map(|l| l.key.as_str()).collect();
        assert!(keys.contains(&"bd_visa"));
        assert!(keys.contains(&"sa_fixed.makkah_hotel_1"));
        // Inactive Saudi categories are not listed
        assert!(!keys.contains(&"sa_makkah_hotel"));
        assert_eq!(keys.last(), Some(&"grand_total"));

        let hotel = totals
            .breakdown
            .iter()
            .find(|l| l.key == "sa_fixed.makkah_hotel_1")
            .unwrap();
        assert_eq!(hotel.amount.currency, "SAR");
        assert_eq!(hotel.amount.amount, dec!(900));
    }
}
