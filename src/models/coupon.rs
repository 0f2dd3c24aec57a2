use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::coupon::{
    Coupon as DomainCoupon, NewCoupon as DomainNewCoupon, UpdateCoupon as DomainUpdateCoupon,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct Coupon {
    pub id: i32,
    pub hub_id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount: f64,
    pub min_amount: i64,
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::coupons)]
pub struct NewCoupon<'a> {
    pub hub_id: i32,
    pub code: &'a str,
    pub description: Option<&'a str>,
    pub discount: f64,
    pub min_amount: i64,
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::coupons)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCoupon<'a> {
    pub code: &'a str,
    pub description: Option<&'a str>,
    pub discount: f64,
    pub min_amount: i64,
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl From<Coupon> for DomainCoupon {
    fn from(value: Coupon) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            code: value.code,
            description: value.description,
            discount: value.discount,
            min_amount: value.min_amount,
            max_discount: value.max_discount,
            expiry_date: value.expiry_date,
            status: value.status.as_str().into(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCoupon> for NewCoupon<'a> {
    fn from(value: &'a DomainNewCoupon) -> Self {
        Self {
            hub_id: value.hub_id,
            code: value.code.as_str(),
            description: value.description.as_deref(),
            discount: value.discount,
            min_amount: value.min_amount,
            max_discount: value.max_discount,
            expiry_date: value.expiry_date,
        }
    }
}

impl<'a> From<&'a DomainUpdateCoupon> for UpdateCoupon<'a> {
    fn from(value: &'a DomainUpdateCoupon) -> Self {
        Self {
            code: value.code.as_str(),
            description: value.description.as_deref(),
            discount: value.discount,
            min_amount: value.min_amount,
            max_discount: value.max_discount,
            expiry_date: value.expiry_date,
            updated_at: value.updated_at,
        }
    }
}
