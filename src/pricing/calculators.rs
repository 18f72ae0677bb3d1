//! Core pricing calculation functions.
//!
//! Pure functions for costing math - no storage, no I/O. Each calculator
//! reduces a category's line items to a subtotal; items of a foreign shape or
//! with negative fields contribute zero, so a snapshot that skipped
//! normalization still prices safely.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pricing::models::{CategoryId, LineItem, PackageCostProfile, PackageType, PricingShape};

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. The engine never rounds intermediate
/// values; this is for presenting a finished figure.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use hajj_costing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Multiply non-negative factors, saturating at `Decimal::MAX`.
fn product(factors: &[Decimal]) -> Decimal {
    let mut acc = Decimal::ONE;
    for factor in factors {
        if factor.is_sign_negative() || factor.is_zero() {
            return Decimal::ZERO;
        }
        acc = acc.checked_mul(*factor).unwrap_or(Decimal::MAX);
    }
    acc
}

/// Sum non-negative amounts, saturating at `Decimal::MAX`.
///
/// The result has trailing fractional zeros stripped (`13725.0` -> `13725`).
pub(crate) fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| {
            if amount.is_sign_negative() {
                acc
            } else {
                acc.checked_add(amount).unwrap_or(Decimal::MAX)
            }
        })
        .normalize()
}

/// Σ quantity × unit price
pub fn standard_subtotal(items: &[LineItem]) -> Decimal {
    sum(items.iter().map(|item| match item {
        LineItem::Standard(i) => product(&[i.quantity, i.unit_price]),
        _ => Decimal::ZERO,
    }))
}

/// Σ rooms × nightly rate × nights
///
/// Person count is not a factor: hotels bill per room-night, not per head.
pub fn lodging_subtotal(items: &[LineItem]) -> Decimal {
    sum(items.iter().map(|item| match item {
        LineItem::Lodging(i) => product(&[i.room_count, i.nightly_rate, i.nights]),
        _ => Decimal::ZERO,
    }))
}

/// Σ quantity × days × per-day rate
pub fn per_diem_subtotal(items: &[LineItem]) -> Decimal {
    sum(items.iter().map(|item| match item {
        LineItem::PerDiem(i) => product(&[i.quantity, i.days, i.per_day_rate]),
        _ => Decimal::ZERO,
    }))
}

/// Subtotal of one category using the formula its shape calls for.
pub fn category_subtotal(category: CategoryId, items: &[LineItem]) -> Decimal {
    match category.shape() {
        PricingShape::Standard => standard_subtotal(items),
        PricingShape::Lodging => lodging_subtotal(items),
        PricingShape::PerDiem => per_diem_subtotal(items),
    }
}

/// Rate actually applied: non-positive rates fall back to 1.
pub fn effective_exchange_rate(exchange_rate: Decimal) -> Decimal {
    if exchange_rate > Decimal::ZERO {
        exchange_rate
    } else {
        Decimal::ONE
    }
}

/// Convert a foreign-currency aggregate into home currency.
///
/// Call this once on the summed Saudi total, never per line item.
pub fn to_home(amount_foreign: Decimal, exchange_rate: Decimal) -> Decimal {
    if amount_foreign.is_sign_negative() {
        return Decimal::ZERO;
    }
    amount_foreign
        .checked_mul(effective_exchange_rate(exchange_rate))
        .unwrap_or(Decimal::MAX)
        .normalize()
}

/// Where a side's subtotal is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostSource {
    Categories,
    Fixed,
}

/// Bangladesh side: per-passenger categories, except the fixed Hajj package
/// which reads the Bangladesh fixed fields.
pub fn select_bangladesh_source(profile: &PackageCostProfile) -> CostSource {
    match profile.package_type {
        PackageType::Hajj => CostSource::Fixed,
        PackageType::Umrah | PackageType::CustomHajj | PackageType::CustomUmrah => {
            CostSource::Categories
        }
    }
}

/// Saudi side: per-passenger categories for custom packages, fixed fields otherwise.
pub fn select_saudi_source(profile: &PackageCostProfile) -> CostSource {
    if profile.package_type.is_custom() {
        CostSource::Categories
    } else {
        CostSource::Fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{
        LodgingLineItem, PassengerType, PerDiemLineItem, StandardLineItem,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn standard(quantity: Decimal, unit_price: Decimal) -> LineItem {
        LineItem::Standard(StandardLineItem {
            id: Uuid::new_v4(),
            passenger_type: PassengerType::Adult,
            quantity,
            unit_price,
        })
    }

    fn lodging(rooms: Decimal, nightly: Decimal, nights: Decimal, persons: Decimal) -> LineItem {
        LineItem::Lodging(LodgingLineItem {
            id: Uuid::new_v4(),
            passenger_type: PassengerType::Adult,
            hotel_name: "Dar Al Tawhid".to_string(),
            room_count: rooms,
            nightly_rate: nightly,
            nights,
            person_count: persons,
        })
    }

    fn per_diem(quantity: Decimal, days: Decimal, rate: Decimal) -> LineItem {
        LineItem::PerDiem(PerDiemLineItem {
            id: Uuid::new_v4(),
            passenger_type: PassengerType::Child,
            quantity,
            days,
            per_day_rate: rate,
        })
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(999999.995), 2), dec!(1000000.00));
    }

    // ==================== calculator tests ====================

    #[test]
    fn test_empty_lists_are_zero() {
        assert_eq!(standard_subtotal(&[]), dec!(0));
        assert_eq!(lodging_subtotal(&[]), dec!(0));
        assert_eq!(per_diem_subtotal(&[]), dec!(0));
    }

    #[test]
    fn test_standard_subtotal() {
        let items = vec![standard(dec!(2), dec!(500)), standard(dec!(1), dec!(250.50))];
        assert_eq!(standard_subtotal(&items), dec!(1250.50));
    }

    #[test]
    fn test_lodging_subtotal_ignores_person_count() {
        let items = vec![lodging(dec!(2), dec!(300), dec!(3), dec!(8))];
        assert_eq!(lodging_subtotal(&items), dec!(1800));

        let more_people = vec![lodging(dec!(2), dec!(300), dec!(3), dec!(1))];
        assert_eq!(lodging_subtotal(&more_people), dec!(1800));
    }

    #[test]
    fn test_per_diem_subtotal() {
        let items = vec![per_diem(dec!(3), dec!(5), dec!(40))];
        assert_eq!(per_diem_subtotal(&items), dec!(600));
    }

    #[test]
    fn test_mismatched_shapes_contribute_zero() {
        let items = vec![
            standard(dec!(2), dec!(100)),
            lodging(dec!(1), dec!(100), dec!(1), dec!(1)),
            per_diem(dec!(1), dec!(1), dec!(100)),
        ];
        assert_eq!(standard_subtotal(&items), dec!(200));
        assert_eq!(lodging_subtotal(&items), dec!(100));
        assert_eq!(per_diem_subtotal(&items), dec!(100));
    }

    #[test]
    fn test_negative_fields_contribute_zero() {
        // Bypasses the normalizer on purpose
        let items = vec![standard(dec!(-2), dec!(-500)), standard(dec!(1), dec!(10))];
        assert_eq!(standard_subtotal(&items), dec!(10));

        let items = vec![lodging(dec!(2), dec!(-300), dec!(3), dec!(0))];
        assert_eq!(lodging_subtotal(&items), dec!(0));
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let mut items = vec![
            standard(dec!(3), dec!(19.99)),
            standard(dec!(1), dec!(1200)),
            standard(dec!(7), dec!(0.35)),
            standard(dec!(2), dec!(500)),
        ];
        let forward = standard_subtotal(&items);
        items.reverse();
        assert_eq!(standard_subtotal(&items), forward);
        items.rotate_left(1);
        assert_eq!(standard_subtotal(&items), forward);

        let mut rooms = vec![
            lodging(dec!(1), dec!(450), dec!(4), dec!(2)),
            lodging(dec!(3), dec!(210.5), dec!(6), dec!(9)),
        ];
        let forward = lodging_subtotal(&rooms);
        rooms.swap(0, 1);
        assert_eq!(lodging_subtotal(&rooms), forward);

        let mut meals = vec![
            per_diem(dec!(2), dec!(10), dec!(15)),
            per_diem(dec!(1), dec!(12), dec!(22.75)),
            per_diem(dec!(4), dec!(3), dec!(0.5)),
        ];
        let forward = per_diem_subtotal(&meals);
        assert_eq!(forward, dec!(579));
        meals.reverse();
        assert_eq!(per_diem_subtotal(&meals), forward);
        meals.rotate_left(1);
        assert_eq!(per_diem_subtotal(&meals), forward);
    }

    #[test]
    fn test_overflow_saturates() {
        let items = vec![standard(Decimal::MAX, dec!(10)), standard(dec!(1), dec!(1))];
        assert_eq!(standard_subtotal(&items), Decimal::MAX);
    }

    #[test]
    fn test_category_subtotal_dispatches_on_shape() {
        let hotel = vec![lodging(dec!(2), dec!(300), dec!(3), dec!(4))];
        assert_eq!(category_subtotal(CategoryId::SaMakkahHotel, &hotel), dec!(1800));
        // A hotel item filed under a standard category prices as zero
        assert_eq!(category_subtotal(CategoryId::SaTransport, &hotel), dec!(0));

        let food = vec![per_diem(dec!(3), dec!(5), dec!(40))];
        assert_eq!(category_subtotal(CategoryId::SaMadinaFood, &food), dec!(600));
    }

    // ==================== currency tests ====================

    #[test]
    fn test_to_home_multiplies_by_rate() {
        assert_eq!(to_home(dec!(1800), dec!(30)), dec!(54000));
        assert_eq!(to_home(dec!(600), dec!(30)), dec!(18000));
    }

    #[test]
    fn test_to_home_non_positive_rate_defaults_to_one() {
        assert_eq!(to_home(dec!(1800), dec!(0)), dec!(1800));
        assert_eq!(to_home(dec!(1800), dec!(-5)), dec!(1800));
    }

    #[test]
    fn test_to_home_scales_linearly() {
        let base = to_home(dec!(1234.5), dec!(29.75));
        assert_eq!(to_home(dec!(1234.5), dec!(29.75) * dec!(3)), base * dec!(3));
    }

    // ==================== selector tests ====================

    #[test]
    fn test_bangladesh_source_fixed_only_for_hajj() {
        let mut profile = PackageCostProfile::new(PackageType::Hajj);
        assert_eq!(select_bangladesh_source(&profile), CostSource::Fixed);

        for package_type in [
            PackageType::Umrah,
            PackageType::CustomHajj,
            PackageType::CustomUmrah,
        ] {
            profile.package_type = package_type;
            assert_eq!(select_bangladesh_source(&profile), CostSource::Categories);
        }
    }

    #[test]
    fn test_saudi_source_follows_custom_flag() {
        let profile = PackageCostProfile::new(PackageType::CustomUmrah);
        assert_eq!(select_saudi_source(&profile), CostSource::Categories);

        let profile = PackageCostProfile::new(PackageType::Umrah);
        assert_eq!(select_saudi_source(&profile), CostSource::Fixed);
    }
}
