use chrono::{Local, NaiveDate, NaiveDateTime};
use pushkind_common::pagination::Pagination;
use serde::{Deserialize, Serialize};

use crate::domain::offer::ActivityStatus;

/// Checkout coupon redeemable by storefront customers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Coupon {
    pub id: i32,
    pub hub_id: i32,
    /// Redemption code, unique within the hub regardless of case.
    pub code: String,
    pub description: Option<String>,
    /// Percentage taken off the order total.
    pub discount: f64,
    /// Minimum order amount required to redeem the coupon.
    pub min_amount: i64,
    /// Upper bound for the discount granted by one redemption.
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
    pub status: ActivityStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new coupon.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub hub_id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount: f64,
    pub min_amount: i64,
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
}

impl NewCoupon {
    /// Build a coupon payload. Codes are stored upper-cased.
    pub fn new(
        hub_id: i32,
        code: impl Into<String>,
        discount: f64,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            hub_id,
            code: code.into().to_uppercase(),
            description: None,
            discount,
            min_amount: 0,
            max_discount: 0,
            expiry_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_limits(mut self, min_amount: i64, max_discount: i64) -> Self {
        self.min_amount = min_amount;
        self.max_discount = max_discount;
        self
    }
}

/// Full replacement of a coupon's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateCoupon {
    pub code: String,
    pub description: Option<String>,
    pub discount: f64,
    pub min_amount: i64,
    pub max_discount: i64,
    pub expiry_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl UpdateCoupon {
    pub fn from_new(coupon: NewCoupon) -> Self {
        Self {
            code: coupon.code,
            description: coupon.description,
            discount: coupon.discount,
            min_amount: coupon.min_amount,
            max_discount: coupon.max_discount,
            expiry_date: coupon.expiry_date,
            updated_at: Local::now().naive_utc(),
        }
    }
}

/// Query definition used to list coupons for a hub.
#[derive(Debug, Clone)]
pub struct CouponListQuery {
    pub hub_id: i32,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CouponListQuery {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_codes_are_normalised() {
        let expiry = NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid date");
        let coupon = NewCoupon::new(1, "summer10", 10.0, expiry).with_limits(500, 100);

        assert_eq!(coupon.code, "SUMMER10");
        assert_eq!(coupon.min_amount, 500);
        assert_eq!(coupon.max_discount, 100);

        let update = UpdateCoupon::from_new(coupon);
        assert_eq!(update.code, "SUMMER10");
    }
}
