use std::collections::HashMap;
use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

/// Activation state shared by offers and coupons.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Active,
    Inactive,
}

impl ActivityStatus {
    /// Return the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl From<&str> for ActivityStatus {
    fn from(value: &str) -> Self {
        match value {
            "inactive" => Self::Inactive,
            _ => Self::Active,
        }
    }
}

impl From<ActivityStatus> for &'static str {
    fn from(value: ActivityStatus) -> Self {
        value.as_str()
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of references an offer targets.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Product,
    Category,
}

impl OfferType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
        }
    }

    /// Parse the value submitted by the offer form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "product" => Some(Self::Product),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// Products an offer applies to: either listed directly or through their category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "ids", rename_all = "snake_case")]
pub enum OfferScope {
    Products(Vec<i32>),
    Categories(Vec<i32>),
}

impl OfferScope {
    /// Build a scope of the given type over `ids`.
    pub fn new(offer_type: OfferType, ids: Vec<i32>) -> Self {
        match offer_type {
            OfferType::Product => Self::Products(ids),
            OfferType::Category => Self::Categories(ids),
        }
    }

    pub fn offer_type(&self) -> OfferType {
        match self {
            Self::Products(_) => OfferType::Product,
            Self::Categories(_) => OfferType::Category,
        }
    }

    /// Referenced product or category identifiers.
    pub fn ids(&self) -> &[i32] {
        match self {
            Self::Products(ids) | Self::Categories(ids) => ids,
        }
    }

    /// Referenced product ids; empty for category offers.
    pub fn product_ids(&self) -> &[i32] {
        match self {
            Self::Products(ids) => ids,
            Self::Categories(_) => &[],
        }
    }

    /// Referenced category ids; empty for product offers.
    pub fn category_ids(&self) -> &[i32] {
        match self {
            Self::Categories(ids) => ids,
            Self::Products(_) => &[],
        }
    }

    /// Whether a product with the given id and category falls under this scope.
    pub fn covers(&self, product_id: i32, category_id: i32) -> bool {
        match self {
            Self::Products(ids) => ids.contains(&product_id),
            Self::Categories(ids) => ids.contains(&category_id),
        }
    }
}

/// Percentage discount scoped to products or categories.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Offer {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    /// Discount percentage in `0..=100`.
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub status: ActivityStatus,
    pub scope: OfferScope,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Offer {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Payload required to insert a new offer. Offers are created active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOffer {
    pub hub_id: i32,
    pub name: String,
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub scope: OfferScope,
}

impl NewOffer {
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        discount: f64,
        expire_date: NaiveDate,
        scope: OfferScope,
    ) -> Self {
        Self {
            hub_id,
            name: name.into(),
            discount,
            expire_date,
            scope,
        }
    }
}

/// Replacement of the editable offer fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOffer {
    pub name: String,
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub scope: OfferScope,
    pub updated_at: NaiveDateTime,
}

impl UpdateOffer {
    pub fn new(name: String, discount: f64, expire_date: NaiveDate, scope: OfferScope) -> Self {
        Self {
            name,
            discount,
            expire_date,
            scope,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list offers for a hub.
#[derive(Debug, Clone)]
pub struct OfferListQuery {
    pub hub_id: i32,
    /// Substring matched against the offer name.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl OfferListQuery {
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, value: impl Into<String>) -> Self {
        self.search = Some(value.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Reference resolved to a display name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: i32,
    pub name: String,
}

/// Offer with its references resolved to product or category names.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OfferDetails {
    #[serde(flatten)]
    pub offer: Offer,
    pub offer_type: OfferType,
    pub products: Vec<NamedRef>,
    pub categories: Vec<NamedRef>,
}

impl OfferDetails {
    /// Resolve the offer references through the given id to name lookups.
    /// References that no longer resolve are left out.
    pub fn resolve(
        offer: Offer,
        product_names: &HashMap<i32, String>,
        category_names: &HashMap<i32, String>,
    ) -> Self {
        let named = |ids: &[i32], names: &HashMap<i32, String>| -> Vec<NamedRef> {
            ids.iter()
                .filter_map(|id| {
                    names.get(id).map(|name| NamedRef {
                        id: *id,
                        name: name.clone(),
                    })
                })
                .collect()
        };

        let products = named(offer.scope.product_ids(), product_names);
        let categories = named(offer.scope.category_ids(), category_names);

        Self {
            offer_type: offer.scope.offer_type(),
            offer,
            products,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_resolve_only_known_references() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let offer = Offer {
            id: 1,
            hub_id: 1,
            name: "Spring".to_string(),
            discount: 10.0,
            expire_date: at.date(),
            status: ActivityStatus::Active,
            scope: OfferScope::Products(vec![4, 5]),
            created_at: at,
            updated_at: at,
        };
        let products = HashMap::from([(4, "Diver".to_string())]);

        let details = OfferDetails::resolve(offer, &products, &HashMap::new());

        assert_eq!(details.offer_type, OfferType::Product);
        assert_eq!(
            details.products,
            vec![NamedRef {
                id: 4,
                name: "Diver".to_string()
            }]
        );
        assert!(details.categories.is_empty());
    }

    #[test]
    fn scope_exposes_exactly_one_reference_list() {
        let scope = OfferScope::new(OfferType::Category, vec![3, 4]);

        assert_eq!(scope.offer_type(), OfferType::Category);
        assert_eq!(scope.category_ids(), &[3, 4]);
        assert!(scope.product_ids().is_empty());
    }

    #[test]
    fn scope_covers_by_product_or_category() {
        let by_product = OfferScope::Products(vec![10]);
        let by_category = OfferScope::Categories(vec![2]);

        assert!(by_product.covers(10, 99));
        assert!(!by_product.covers(11, 2));
        assert!(by_category.covers(11, 2));
        assert!(!by_category.covers(10, 3));
    }

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(ActivityStatus::Active.toggled(), ActivityStatus::Inactive);
        assert_eq!(ActivityStatus::Inactive.toggled(), ActivityStatus::Active);
        assert_eq!(ActivityStatus::from("inactive"), ActivityStatus::Inactive);
    }

    #[test]
    fn offer_type_parses_form_values() {
        assert_eq!(OfferType::parse(" product "), Some(OfferType::Product));
        assert_eq!(OfferType::parse("category"), Some(OfferType::Category));
        assert_eq!(OfferType::parse("brand"), None);
    }
}
