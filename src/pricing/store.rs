//! Per-category line-item storage.
//!
//! One keyed collection replaces a hand-written slot per category. Every
//! [`CategoryId`] always has an entry, even when the active package type does
//! not read it, so switching type never loses items.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::models::{
    CategoryId, LineItem, LodgingLineItem, PassengerType, PerDiemLineItem, PricingShape,
    StandardLineItem,
};
use super::normalizer::normalize;
use super::services::CostingError;

/// Ordered line items for every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "BTreeMap<CategoryId, Vec<LineItem>>")]
pub struct CategoryStore {
    items: BTreeMap<CategoryId, Vec<LineItem>>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self {
            items: CategoryId::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
        }
    }
}

impl From<CategoryStore> for BTreeMap<CategoryId, Vec<LineItem>> {
    fn from(store: CategoryStore) -> Self {
        store.items
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(CategoryStore::from_snapshot(Value::deserialize(deserializer)?))
    }
}

impl CategoryStore {
    /// Load stored categories, keyed by category wire name.
    ///
    /// Each item takes the shape of the category it is filed under. Unknown
    /// categories and entries that are not items are skipped, never fatal.
    pub fn from_snapshot(raw: Value) -> Self {
        let mut store = CategoryStore::default();
        let entries = match raw {
            Value::Object(entries) => entries,
            Value::Null => return store,
            other => {
                warn!(snapshot = %other, "Ignoring malformed category snapshot");
                return store;
            }
        };

        for (key, items) in entries {
            let Ok(category) = key.parse::<CategoryId>() else {
                warn!(category = %key, "Ignoring unknown category in snapshot");
                continue;
            };
            let items = match items {
                Value::Array(items) => items,
                Value::Null => continue,
                _ => {
                    warn!(category = %category, "Ignoring non-list category in snapshot");
                    continue;
                }
            };
            let slot = store.items.entry(category).or_default();
            for raw in items {
                match LineItem::from_snapshot(category, raw) {
                    Some(item) => slot.push(item),
                    None => warn!(category = %category, "Skipping malformed line item"),
                }
            }
        }
        store
    }

    /// Normalize a draft into a new line item and append it to `category`.
    ///
    /// Returns the id assigned to the new item.
    pub fn add(
        &mut self,
        category: CategoryId,
        draft: LineItemDraft,
    ) -> Result<Uuid, CostingError> {
        if draft.shape() != category.shape() {
            return Err(CostingError::ShapeMismatch {
                category,
                expected: category.shape(),
                found: draft.shape(),
            });
        }

        let item = draft.into_line_item(Uuid::new_v4());
        let id = item.id();
        self.items.entry(category).or_default().push(item);
        Ok(id)
    }

    /// Apply a patch to one item. Unknown ids are ignored.
    ///
    /// Returns `true` when an item was found.
    pub fn update(&mut self, category: CategoryId, id: Uuid, patch: &LineItemPatch) -> bool {
        let Some(items) = self.items.get_mut(&category) else {
            return false;
        };
        match items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }

    /// Remove one item. Unknown ids are ignored.
    ///
    /// Returns `true` when an item was removed.
    pub fn remove(&mut self, category: CategoryId, id: Uuid) -> bool {
        let Some(items) = self.items.get_mut(&category) else {
            return false;
        };
        let before = items.len();
        items.retain(|item| item.id() != id);
        items.len() != before
    }

    pub fn list(&self, category: CategoryId) -> &[LineItem] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, category: CategoryId, id: Uuid) -> Option<&LineItem> {
        self.list(category).iter().find(|item| item.id() == id)
    }

    pub fn item_count(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &[LineItem])> {
        self.items.iter().map(|(c, items)| (*c, items.as_slice()))
    }
}

/// Raw form values for a new standard item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardDraft {
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit_price: Value,
}

/// Raw form values for a new hotel item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LodgingDraft {
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default)]
    pub hotel_name: String,
    #[serde(default)]
    pub room_count: Value,
    #[serde(default)]
    pub nightly_rate: Value,
    #[serde(default)]
    pub nights: Value,
    #[serde(default)]
    pub person_count: Value,
}

/// Raw form values for a new food item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDiemDraft {
    #[serde(default)]
    pub passenger_type: PassengerType,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub days: Value,
    #[serde(default)]
    pub per_day_rate: Value,
}

/// Values typed into the "add line item" dialog.
///
/// A fresh draft is built for every dialog opening, so fields of one category
/// shape never leak into another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum LineItemDraft {
    Standard(StandardDraft),
    Lodging(LodgingDraft),
    PerDiem(PerDiemDraft),
}

impl LineItemDraft {
    /// Blank draft of the shape `category` expects.
    pub fn for_category(category: CategoryId) -> Self {
        match category.shape() {
            PricingShape::Standard => LineItemDraft::Standard(StandardDraft::default()),
            PricingShape::Lodging => LineItemDraft::Lodging(LodgingDraft::default()),
            PricingShape::PerDiem => LineItemDraft::PerDiem(PerDiemDraft::default()),
        }
    }

    pub fn shape(&self) -> PricingShape {
        match self {
            LineItemDraft::Standard(_) => PricingShape::Standard,
            LineItemDraft::Lodging(_) => PricingShape::Lodging,
            LineItemDraft::PerDiem(_) => PricingShape::PerDiem,
        }
    }

    fn into_line_item(self, id: Uuid) -> LineItem {
        match self {
            LineItemDraft::Standard(d) => LineItem::Standard(StandardLineItem {
                id,
                passenger_type: d.passenger_type,
                quantity: normalize(&d.quantity),
                unit_price: normalize(&d.unit_price),
            }),
            LineItemDraft::Lodging(d) => LineItem::Lodging(LodgingLineItem {
                id,
                passenger_type: d.passenger_type,
                hotel_name: d.hotel_name.trim().to_string(),
                room_count: normalize(&d.room_count),
                nightly_rate: normalize(&d.nightly_rate),
                nights: normalize(&d.nights),
                person_count: normalize(&d.person_count),
            }),
            LineItemDraft::PerDiem(d) => LineItem::PerDiem(PerDiemLineItem {
                id,
                passenger_type: d.passenger_type,
                quantity: normalize(&d.quantity),
                days: normalize(&d.days),
                per_day_rate: normalize(&d.per_day_rate),
            }),
        }
    }
}

/// Partial edit of a line item. Fields absent on the item's shape are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passenger_type: Option<PassengerType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nightly_rate: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nights: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_count: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_day_rate: Option<Value>,
}

impl LineItemPatch {
    fn apply(&self, item: &mut LineItem) {
        match item {
            LineItem::Standard(i) => {
                set_passenger(&mut i.passenger_type, self.passenger_type);
                set_amount(&mut i.quantity, &self.quantity);
                set_amount(&mut i.unit_price, &self.unit_price);
            }
            LineItem::Lodging(i) => {
                set_passenger(&mut i.passenger_type, self.passenger_type);
                if let Some(name) = &self.hotel_name {
                    i.hotel_name = name.trim().to_string();
                }
                set_amount(&mut i.room_count, &self.room_count);
                set_amount(&mut i.nightly_rate, &self.nightly_rate);
                set_amount(&mut i.nights, &self.nights);
                set_amount(&mut i.person_count, &self.person_count);
            }
            LineItem::PerDiem(i) => {
                set_passenger(&mut i.passenger_type, self.passenger_type);
                set_amount(&mut i.quantity, &self.quantity);
                set_amount(&mut i.days, &self.days);
                set_amount(&mut i.per_day_rate, &self.per_day_rate);
            }
        }
    }
}

fn set_passenger(slot: &mut PassengerType, value: Option<PassengerType>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn set_amount(slot: &mut rust_decimal::Decimal, raw: &Option<Value>) {
    if let Some(raw) = raw {
        *slot = normalize(raw);
    }
}
