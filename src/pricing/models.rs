//! Domain models for package costing.
//!
//! A [`PackageCostProfile`] is the aggregate handed to the engine. It carries
//! every category and both fixed-field groups at all times; the package type
//! only decides which of them are read.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::normalizer::{lenient, normalize};
use super::store::CategoryStore;

/// Home currency (Bangladesh side)
pub const HOME_CURRENCY: &str = "BDT";

/// Foreign currency (Saudi side)
pub const FOREIGN_CURRENCY: &str = "SAR";

/// Passenger type of a line item. Informational only, never priced differently.
///
/// Deserializes leniently: unknown, empty or non-string values load as `Adult`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerType {
    #[default]
    Adult,
    Child,
    Infant,
}

impl PassengerType {
    pub const ALL: [PassengerType; 3] =
        [PassengerType::Adult, PassengerType::Child, PassengerType::Infant];

    /// Match a wire key or display label, ignoring case.
    pub fn parse_lenient(raw: &str) -> PassengerType {
        let key = raw.trim();
        PassengerType::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(key))
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            PassengerType::Adult => "Adult",
            PassengerType::Child => "Child",
            PassengerType::Infant => "Infant",
        }
    }
}

impl<'de> Deserialize<'de> for PassengerType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(raw)) => PassengerType::parse_lenient(&raw),
            _ => PassengerType::default(),
        })
    }
}

/// Which side of the quotation a category or fixed field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Home currency, always active
    Bangladesh,
    /// Foreign currency, converted once at the aggregate level
    Saudi,
}

impl Side {
    pub fn currency(self) -> &'static str {
        match self {
            Side::Bangladesh => HOME_CURRENCY,
            Side::Saudi => FOREIGN_CURRENCY,
        }
    }
}

/// Pricing formula used by a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingShape {
    /// quantity x unit price
    Standard,
    /// rooms x nightly rate x nights
    Lodging,
    /// quantity x days x per-day rate
    PerDiem,
}

impl fmt::Display for PricingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PricingShape::Standard => "standard",
            PricingShape::Lodging => "lodging",
            PricingShape::PerDiem => "per_diem",
        };
        f.write_str(name)
    }
}

/// Closed set of cost categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    BdVisa,
    BdAirfare,
    BdBus,
    BdTrainingOther,
    SaVisa,
    SaMakkahHotel,
    SaMadinaHotel,
    SaMakkahFood,
    SaMadinaFood,
    SaMakkahZiyara,
    SaMadinaZiyara,
    SaTransport,
    SaCampFee,
    SaAlMashayer,
    SaOthers,
}

impl CategoryId {
    pub const BANGLADESH: [CategoryId; 4] = [
        CategoryId::BdVisa,
        CategoryId::BdAirfare,
        CategoryId::BdBus,
        CategoryId::BdTrainingOther,
    ];

    pub const SAUDI: [CategoryId; 11] = [
        CategoryId::SaVisa,
        CategoryId::SaMakkahHotel,
        CategoryId::SaMadinaHotel,
        CategoryId::SaMakkahFood,
        CategoryId::SaMadinaFood,
        CategoryId::SaMakkahZiyara,
        CategoryId::SaMadinaZiyara,
        CategoryId::SaTransport,
        CategoryId::SaCampFee,
        CategoryId::SaAlMashayer,
        CategoryId::SaOthers,
    ];

    pub const ALL: [CategoryId; 15] = [
        CategoryId::BdVisa,
        CategoryId::BdAirfare,
        CategoryId::BdBus,
        CategoryId::BdTrainingOther,
        CategoryId::SaVisa,
        CategoryId::SaMakkahHotel,
        CategoryId::SaMadinaHotel,
        CategoryId::SaMakkahFood,
        CategoryId::SaMadinaFood,
        CategoryId::SaMakkahZiyara,
        CategoryId::SaMadinaZiyara,
        CategoryId::SaTransport,
        CategoryId::SaCampFee,
        CategoryId::SaAlMashayer,
        CategoryId::SaOthers,
    ];

    pub fn side(self) -> Side {
        match self {
            CategoryId::BdVisa
            | CategoryId::BdAirfare
            | CategoryId::BdBus
            | CategoryId::BdTrainingOther => Side::Bangladesh,
            CategoryId::SaVisa
            | CategoryId::SaMakkahHotel
            | CategoryId::SaMadinaHotel
            | CategoryId::SaMakkahFood
            | CategoryId::SaMadinaFood
            | CategoryId::SaMakkahZiyara
            | CategoryId::SaMadinaZiyara
            | CategoryId::SaTransport
            | CategoryId::SaCampFee
            | CategoryId::SaAlMashayer
            | CategoryId::SaOthers => Side::Saudi,
        }
    }

    pub fn shape(self) -> PricingShape {
        match self {
            CategoryId::SaMakkahHotel | CategoryId::SaMadinaHotel => PricingShape::Lodging,
            CategoryId::SaMakkahFood | CategoryId::SaMadinaFood => PricingShape::PerDiem,
            CategoryId::BdVisa
            | CategoryId::BdAirfare
            | CategoryId::BdBus
            | CategoryId::BdTrainingOther
            | CategoryId::SaVisa
            | CategoryId::SaMakkahZiyara
            | CategoryId::SaMadinaZiyara
            | CategoryId::SaTransport
            | CategoryId::SaCampFee
            | CategoryId::SaAlMashayer
            | CategoryId::SaOthers => PricingShape::Standard,
        }
    }

    /// Wire key, as used in JSON and URL paths
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryId::BdVisa => "bd_visa",
            CategoryId::BdAirfare => "bd_airfare",
            CategoryId::BdBus => "bd_bus",
            CategoryId::BdTrainingOther => "bd_training_other",
            CategoryId::SaVisa => "sa_visa",
            CategoryId::SaMakkahHotel => "sa_makkah_hotel",
            CategoryId::SaMadinaHotel => "sa_madina_hotel",
            CategoryId::SaMakkahFood => "sa_makkah_food",
            CategoryId::SaMadinaFood => "sa_madina_food",
            CategoryId::SaMakkahZiyara => "sa_makkah_ziyara",
            CategoryId::SaMadinaZiyara => "sa_madina_ziyara",
            CategoryId::SaTransport => "sa_transport",
            CategoryId::SaCampFee => "sa_camp_fee",
            CategoryId::SaAlMashayer => "sa_al_mashayer",
            CategoryId::SaOthers => "sa_others",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryId::BdVisa => "Visa (Bangladesh)",
            CategoryId::BdAirfare => "Air fare",
            CategoryId::BdBus => "Bus",
            CategoryId::BdTrainingOther => "Training / other",
            CategoryId::SaVisa => "Visa (Saudi)",
            CategoryId::SaMakkahHotel => "Makkah hotel",
            CategoryId::SaMadinaHotel => "Madina hotel",
            CategoryId::SaMakkahFood => "Makkah food",
            CategoryId::SaMadinaFood => "Madina food",
            CategoryId::SaMakkahZiyara => "Makkah ziyara",
            CategoryId::SaMadinaZiyara => "Madina ziyara",
            CategoryId::SaTransport => "Transport",
            CategoryId::SaCampFee => "Camp fee",
            CategoryId::SaAlMashayer => "Al-Mashayer",
            CategoryId::SaOthers => "Others (Saudi)",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        CategoryId::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| key.to_string())
    }
}

/// quantity x unit price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardLineItem {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: Uuid,
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub unit_price: Decimal,
}

/// Hotel stay billed per room-night. `person_count` is shown but not priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodgingLineItem {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: Uuid,
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hotel_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub room_count: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub nightly_rate: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub nights: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub person_count: Decimal,
}

/// quantity x days x per-day rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerDiemLineItem {
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: Uuid,
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub days: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub per_day_rate: Decimal,
}

/// Item id from a snapshot. A missing or malformed id gets a fresh one.
fn lenient_id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .unwrap_or_else(Uuid::new_v4))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// One priced entry within a category.
///
/// Serialized with a `shape` tag for readers. Snapshots are read per category
/// (see [`LineItem::from_snapshot`]), where the category decides the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum LineItem {
    Standard(StandardLineItem),
    Lodging(LodgingLineItem),
    PerDiem(PerDiemLineItem),
}

impl LineItem {
    /// Read one stored item of `category`.
    ///
    /// Any `shape` tag on the value is ignored. Bad fields load as zero or
    /// empty; only a value that is not an object at all yields `None`.
    pub fn from_snapshot(category: CategoryId, raw: Value) -> Option<LineItem> {
        let item = match category.shape() {
            PricingShape::Standard => serde_json::from_value(raw).map(LineItem::Standard),
            PricingShape::Lodging => serde_json::from_value(raw).map(LineItem::Lodging),
            PricingShape::PerDiem => serde_json::from_value(raw).map(LineItem::PerDiem),
        };
        item.ok()
    }

    pub fn id(&self) -> Uuid {
        match self {
            LineItem::Standard(item) => item.id,
            LineItem::Lodging(item) => item.id,
            LineItem::PerDiem(item) => item.id,
        }
    }

    pub fn passenger_type(&self) -> PassengerType {
        match self {
            LineItem::Standard(item) => item.passenger_type,
            LineItem::Lodging(item) => item.passenger_type,
            LineItem::PerDiem(item) => item.passenger_type,
        }
    }

    pub fn shape(&self) -> PricingShape {
        match self {
            LineItem::Standard(_) => PricingShape::Standard,
            LineItem::Lodging(_) => PricingShape::Lodging,
            LineItem::PerDiem(_) => PricingShape::PerDiem,
        }
    }
}

/// Package type offered by the agency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    #[default]
    #[serde(alias = "Hajj")]
    Hajj,
    #[serde(alias = "Umrah")]
    Umrah,
    #[serde(alias = "Custom Hajj")]
    CustomHajj,
    #[serde(alias = "Custom Umrah")]
    CustomUmrah,
}

/// Whether a package type is priced from per-passenger categories or flat fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageTypeFlag {
    Custom,
    Fixed,
}

impl PackageType {
    pub fn flag(self) -> PackageTypeFlag {
        match self {
            PackageType::CustomHajj | PackageType::CustomUmrah => PackageTypeFlag::Custom,
            PackageType::Hajj | PackageType::Umrah => PackageTypeFlag::Fixed,
        }
    }

    pub fn is_custom(self) -> bool {
        self.flag() == PackageTypeFlag::Custom
    }

    /// The same pilgrimage with the opposite custom/fixed flag.
    pub fn toggled(self) -> PackageType {
        match self {
            PackageType::Hajj => PackageType::CustomHajj,
            PackageType::CustomHajj => PackageType::Hajj,
            PackageType::Umrah => PackageType::CustomUmrah,
            PackageType::CustomUmrah => PackageType::Umrah,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageType::Hajj => "Hajj",
            PackageType::Umrah => "Umrah",
            PackageType::CustomHajj => "Custom Hajj",
            PackageType::CustomUmrah => "Custom Umrah",
        }
    }
}

/// Named Bangladesh-side flat fees (home currency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BangladeshFixedField {
    IdCardFee,
    WelfareFee,
    GuideFee,
    GovernmentServiceCharge,
    LicenseFee,
    Other,
}

impl BangladeshFixedField {
    pub const ALL: [BangladeshFixedField; 6] = [
        BangladeshFixedField::IdCardFee,
        BangladeshFixedField::WelfareFee,
        BangladeshFixedField::GuideFee,
        BangladeshFixedField::GovernmentServiceCharge,
        BangladeshFixedField::LicenseFee,
        BangladeshFixedField::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BangladeshFixedField::IdCardFee => "ID card fee",
            BangladeshFixedField::WelfareFee => "Welfare fee",
            BangladeshFixedField::GuideFee => "Guide fee",
            BangladeshFixedField::GovernmentServiceCharge => "Government service charge",
            BangladeshFixedField::LicenseFee => "License fee",
            BangladeshFixedField::Other => "Other (Bangladesh)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BangladeshFixedFields {
    #[serde(default, deserialize_with = "lenient")]
    pub id_card_fee: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub welfare_fee: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub guide_fee: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub government_service_charge: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub license_fee: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub other: Decimal,
}

impl BangladeshFixedFields {
    pub fn get(&self, field: BangladeshFixedField) -> Decimal {
        match field {
            BangladeshFixedField::IdCardFee => self.id_card_fee,
            BangladeshFixedField::WelfareFee => self.welfare_fee,
            BangladeshFixedField::GuideFee => self.guide_fee,
            BangladeshFixedField::GovernmentServiceCharge => self.government_service_charge,
            BangladeshFixedField::LicenseFee => self.license_fee,
            BangladeshFixedField::Other => self.other,
        }
    }

    /// Store a raw form value, normalized.
    pub fn set(&mut self, field: BangladeshFixedField, raw: &serde_json::Value) {
        let slot = match field {
            BangladeshFixedField::IdCardFee => &mut self.id_card_fee,
            BangladeshFixedField::WelfareFee => &mut self.welfare_fee,
            BangladeshFixedField::GuideFee => &mut self.guide_fee,
            BangladeshFixedField::GovernmentServiceCharge => &mut self.government_service_charge,
            BangladeshFixedField::LicenseFee => &mut self.license_fee,
            BangladeshFixedField::Other => &mut self.other,
        };
        *slot = normalize(raw);
    }

    pub fn iter(&self) -> impl Iterator<Item = (BangladeshFixedField, Decimal)> + '_ {
        BangladeshFixedField::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

/// Named Saudi-side flat fees (foreign currency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaudiFixedField {
    #[serde(rename = "makkah_hotel_1")]
    MakkahHotel1,
    #[serde(rename = "makkah_hotel_2")]
    MakkahHotel2,
    #[serde(rename = "makkah_hotel_3")]
    MakkahHotel3,
    #[serde(rename = "madina_hotel_1")]
    MadinaHotel1,
    #[serde(rename = "madina_hotel_2")]
    MadinaHotel2,
    ZamzamWater,
    Maktab,
    VisaFee,
    Insurance,
    Electronics,
    GroundService,
    MakkahRoute,
    Baggage,
    ServiceCharge,
    Monazzem,
    Food,
    Ziyara,
}

impl SaudiFixedField {
    pub const ALL: [SaudiFixedField; 17] = [
        SaudiFixedField::MakkahHotel1,
        SaudiFixedField::MakkahHotel2,
        SaudiFixedField::MakkahHotel3,
        SaudiFixedField::MadinaHotel1,
        SaudiFixedField::MadinaHotel2,
        SaudiFixedField::ZamzamWater,
        SaudiFixedField::Maktab,
        SaudiFixedField::VisaFee,
        SaudiFixedField::Insurance,
        SaudiFixedField::Electronics,
        SaudiFixedField::GroundService,
        SaudiFixedField::MakkahRoute,
        SaudiFixedField::Baggage,
        SaudiFixedField::ServiceCharge,
        SaudiFixedField::Monazzem,
        SaudiFixedField::Food,
        SaudiFixedField::Ziyara,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SaudiFixedField::MakkahHotel1 => "Makkah hotel 1",
            SaudiFixedField::MakkahHotel2 => "Makkah hotel 2",
            SaudiFixedField::MakkahHotel3 => "Makkah hotel 3",
            SaudiFixedField::MadinaHotel1 => "Madina hotel 1",
            SaudiFixedField::MadinaHotel2 => "Madina hotel 2",
            SaudiFixedField::ZamzamWater => "Zamzam water",
            SaudiFixedField::Maktab => "Maktab",
            SaudiFixedField::VisaFee => "Visa fee",
            SaudiFixedField::Insurance => "Insurance",
            SaudiFixedField::Electronics => "Electronics",
            SaudiFixedField::GroundService => "Ground service",
            SaudiFixedField::MakkahRoute => "Makkah route",
            SaudiFixedField::Baggage => "Baggage",
            SaudiFixedField::ServiceCharge => "Service charge",
            SaudiFixedField::Monazzem => "Monazzem",
            SaudiFixedField::Food => "Food",
            SaudiFixedField::Ziyara => "Ziyara",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaudiFixedFields {
    #[serde(default, deserialize_with = "lenient")]
    pub makkah_hotel_1: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub makkah_hotel_2: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub makkah_hotel_3: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub madina_hotel_1: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub madina_hotel_2: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub zamzam_water: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub maktab: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub visa_fee: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub insurance: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub electronics: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub ground_service: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub makkah_route: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub baggage: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub service_charge: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub monazzem: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub food: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub ziyara: Decimal,
}

impl SaudiFixedFields {
    pub fn get(&self, field: SaudiFixedField) -> Decimal {
        match field {
            SaudiFixedField::MakkahHotel1 => self.makkah_hotel_1,
            SaudiFixedField::MakkahHotel2 => self.makkah_hotel_2,
            SaudiFixedField::MakkahHotel3 => self.makkah_hotel_3,
            SaudiFixedField::MadinaHotel1 => self.madina_hotel_1,
            SaudiFixedField::MadinaHotel2 => self.madina_hotel_2,
            SaudiFixedField::ZamzamWater => self.zamzam_water,
            SaudiFixedField::Maktab => self.maktab,
            SaudiFixedField::VisaFee => self.visa_fee,
            SaudiFixedField::Insurance => self.insurance,
            SaudiFixedField::Electronics => self.electronics,
            SaudiFixedField::GroundService => self.ground_service,
            SaudiFixedField::MakkahRoute => self.makkah_route,
            SaudiFixedField::Baggage => self.baggage,
            SaudiFixedField::ServiceCharge => self.service_charge,
            SaudiFixedField::Monazzem => self.monazzem,
            SaudiFixedField::Food => self.food,
            SaudiFixedField::Ziyara => self.ziyara,
        }
    }

    /// Store a raw form value, normalized.
    pub fn set(&mut self, field: SaudiFixedField, raw: &serde_json::Value) {
        let slot = match field {
            SaudiFixedField::MakkahHotel1 => &mut self.makkah_hotel_1,
            SaudiFixedField::MakkahHotel2 => &mut self.makkah_hotel_2,
            SaudiFixedField::MakkahHotel3 => &mut self.makkah_hotel_3,
            SaudiFixedField::MadinaHotel1 => &mut self.madina_hotel_1,
            SaudiFixedField::MadinaHotel2 => &mut self.madina_hotel_2,
            SaudiFixedField::ZamzamWater => &mut self.zamzam_water,
            SaudiFixedField::Maktab => &mut self.maktab,
            SaudiFixedField::VisaFee => &mut self.visa_fee,
            SaudiFixedField::Insurance => &mut self.insurance,
            SaudiFixedField::Electronics => &mut self.electronics,
            SaudiFixedField::GroundService => &mut self.ground_service,
            SaudiFixedField::MakkahRoute => &mut self.makkah_route,
            SaudiFixedField::Baggage => &mut self.baggage,
            SaudiFixedField::ServiceCharge => &mut self.service_charge,
            SaudiFixedField::Monazzem => &mut self.monazzem,
            SaudiFixedField::Food => &mut self.food,
            SaudiFixedField::Ziyara => &mut self.ziyara,
        };
        *slot = normalize(raw);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SaudiFixedField, Decimal)> + '_ {
        SaudiFixedField::ALL.into_iter().map(|f| (f, self.get(f)))
    }
}

/// Both fixed-field groups. They are maintained independently of each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedCostFields {
    #[serde(default)]
    pub bangladesh: BangladeshFixedFields,
    #[serde(default)]
    pub saudi: SaudiFixedFields,
}

fn default_exchange_rate() -> Decimal {
    Decimal::ONE
}

/// Aggregate root handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageCostProfile {
    #[serde(default)]
    pub package_type: PackageType,
    /// Foreign-to-home rate. Non-positive values are treated as 1.
    #[serde(default = "default_exchange_rate", deserialize_with = "lenient")]
    pub exchange_rate: Decimal,
    #[serde(default, deserialize_with = "lenient")]
    pub discount: Decimal,
    #[serde(default)]
    pub fixed_fields: FixedCostFields,
    #[serde(default)]
    pub categories: CategoryStore,
}

impl Default for PackageCostProfile {
    fn default() -> Self {
        Self {
            package_type: PackageType::default(),
            exchange_rate: Decimal::ONE,
            discount: Decimal::ZERO,
            fixed_fields: FixedCostFields::default(),
            categories: CategoryStore::default(),
        }
    }
}

impl PackageCostProfile {
    pub fn new(package_type: PackageType) -> Self {
        Self {
            package_type,
            ..Self::default()
        }
    }
}
