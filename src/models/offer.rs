use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::offer::{
    NewOffer as DomainNewOffer, Offer as DomainOffer, OfferScope, OfferType,
    UpdateOffer as DomainUpdateOffer,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::offers)]
pub struct Offer {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub status: String,
    pub offer_type: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Product or category referenced by an offer, depending on `offers.offer_type`.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::offer_targets)]
#[diesel(belongs_to(Offer, foreign_key = offer_id))]
pub struct OfferTarget {
    pub id: i32,
    pub offer_id: i32,
    pub target_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::offers)]
pub struct NewOffer<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub offer_type: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::offer_targets)]
pub struct NewOfferTarget {
    pub offer_id: i32,
    pub target_id: i32,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::offers)]
pub struct UpdateOffer<'a> {
    pub name: &'a str,
    pub discount: f64,
    pub expire_date: NaiveDate,
    pub offer_type: &'a str,
    pub updated_at: NaiveDateTime,
}

impl Offer {
    pub fn into_domain(self, targets: Vec<OfferTarget>) -> DomainOffer {
        let offer_type = OfferType::parse(&self.offer_type).unwrap_or(OfferType::Product);
        let ids = targets.into_iter().map(|target| target.target_id).collect();

        DomainOffer {
            id: self.id,
            hub_id: self.hub_id,
            name: self.name,
            discount: self.discount,
            expire_date: self.expire_date,
            status: self.status.as_str().into(),
            scope: OfferScope::new(offer_type, ids),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<(Offer, Vec<OfferTarget>)> for DomainOffer {
    fn from(value: (Offer, Vec<OfferTarget>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> From<&'a DomainNewOffer> for NewOffer<'a> {
    fn from(value: &'a DomainNewOffer) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            discount: value.discount,
            expire_date: value.expire_date,
            offer_type: value.scope.offer_type().as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateOffer> for UpdateOffer<'a> {
    fn from(value: &'a DomainUpdateOffer) -> Self {
        Self {
            name: value.name.as_str(),
            discount: value.discount,
            expire_date: value.expire_date,
            offer_type: value.scope.offer_type().as_str(),
            updated_at: value.updated_at,
        }
    }
}

/// Target rows for `offer_id` covering every id of `scope`.
pub fn targets_for(offer_id: i32, scope: &OfferScope) -> Vec<NewOfferTarget> {
    let mut ids = scope.ids().to_vec();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .map(|target_id| NewOfferTarget {
            offer_id,
            target_id,
        })
        .collect()
}
