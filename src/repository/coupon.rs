use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        coupon::{
            Coupon as DomainCoupon, CouponListQuery, NewCoupon as DomainNewCoupon,
            UpdateCoupon as DomainUpdateCoupon,
        },
        offer::ActivityStatus,
    },
    models::coupon::{
        Coupon as DbCoupon, NewCoupon as DbNewCoupon, UpdateCoupon as DbUpdateCoupon,
    },
    repository::{CouponReader, CouponWriter, DieselRepository, lower},
};

impl CouponReader for DieselRepository {
    fn get_coupon_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(coupons::id.eq(id))
            .filter(coupons::hub_id.eq(hub_id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(Into::into))
    }

    fn get_coupon_by_code(
        &self,
        code: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCoupon>> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;
        let coupon = coupons::table
            .filter(lower(coupons::code).eq(code.trim().to_lowercase()))
            .filter(coupons::hub_id.eq(hub_id))
            .first::<DbCoupon>(&mut conn)
            .optional()?;

        Ok(coupon.map(Into::into))
    }

    fn list_coupons(
        &self,
        query: CouponListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCoupon>)> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let mut count_query = coupons::table
            .filter(coupons::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                coupons::code
                    .like(pattern.clone())
                    .or(coupons::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = coupons::table
            .filter(coupons::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                coupons::code
                    .like(pattern.clone())
                    .or(coupons::description.like(pattern)),
            );
        }

        items = items.order((coupons::created_at.desc(), coupons::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_coupons = items.load::<DbCoupon>(&mut conn)?;

        Ok((total, db_coupons.into_iter().map(Into::into).collect()))
    }
}

impl CouponWriter for DieselRepository {
    fn create_coupon(&self, new_coupon: &DomainNewCoupon) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let db_new = DbNewCoupon::from(new_coupon);

        let created = diesel::insert_into(coupons::table)
            .values(&db_new)
            .get_result::<DbCoupon>(&mut conn)?;

        Ok(created.into())
    }

    fn update_coupon(
        &self,
        coupon_id: i32,
        hub_id: i32,
        updates: &DomainUpdateCoupon,
    ) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let db_updates = DbUpdateCoupon::from(updates);

        let target = coupons::table
            .filter(coupons::id.eq(coupon_id))
            .filter(coupons::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCoupon>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    fn set_coupon_status(
        &self,
        coupon_id: i32,
        hub_id: i32,
        status: ActivityStatus,
    ) -> RepositoryResult<DomainCoupon> {
        use crate::schema::coupons;

        let mut conn = self.conn()?;

        let target = coupons::table
            .filter(coupons::id.eq(coupon_id))
            .filter(coupons::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                coupons::status.eq(status.as_str()),
                coupons::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbCoupon>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
