use std::collections::HashMap;

use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::offer::{
        ActivityStatus, NewOffer as DomainNewOffer, Offer as DomainOffer, OfferListQuery,
        OfferType, UpdateOffer as DomainUpdateOffer,
    },
    models::offer::{
        NewOffer as DbNewOffer, Offer as DbOffer, OfferTarget as DbOfferTarget,
        UpdateOffer as DbUpdateOffer, targets_for,
    },
    repository::{DieselRepository, OfferReader, OfferWriter},
};

fn attach_targets(
    conn: &mut SqliteConnection,
    db_offers: Vec<DbOffer>,
) -> RepositoryResult<Vec<DomainOffer>> {
    use crate::schema::offer_targets;

    if db_offers.is_empty() {
        return Ok(Vec::new());
    }

    let offer_ids: Vec<i32> = db_offers.iter().map(|offer| offer.id).collect();

    let mut targets_by_offer: HashMap<i32, Vec<DbOfferTarget>> = HashMap::new();
    let rows = offer_targets::table
        .filter(offer_targets::offer_id.eq_any(&offer_ids))
        .order(offer_targets::id.asc())
        .load::<DbOfferTarget>(conn)?;

    for target in rows {
        targets_by_offer
            .entry(target.offer_id)
            .or_default()
            .push(target);
    }

    Ok(db_offers
        .into_iter()
        .map(|offer| {
            let targets = targets_by_offer.remove(&offer.id).unwrap_or_default();
            DomainOffer::from((offer, targets))
        })
        .collect())
}

fn load_offer(
    conn: &mut SqliteConnection,
    offer_id: i32,
    hub_id: i32,
) -> RepositoryResult<Option<DomainOffer>> {
    use crate::schema::offers;

    let offer = offers::table
        .filter(offers::id.eq(offer_id))
        .filter(offers::hub_id.eq(hub_id))
        .first::<DbOffer>(conn)
        .optional()?;

    let Some(offer) = offer else {
        return Ok(None);
    };

    Ok(attach_targets(conn, vec![offer])?.pop())
}

impl OfferReader for DieselRepository {
    fn get_offer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainOffer>> {
        let mut conn = self.conn()?;
        load_offer(&mut conn, id, hub_id)
    }

    fn get_offers_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<DomainOffer>> {
        use crate::schema::offers;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let db_offers = offers::table
            .filter(offers::hub_id.eq(hub_id))
            .filter(offers::id.eq_any(ids))
            .load::<DbOffer>(&mut conn)?;

        attach_targets(&mut conn, db_offers)
    }

    fn list_active_category_offers(
        &self,
        hub_id: i32,
        category_id: i32,
    ) -> RepositoryResult<Vec<DomainOffer>> {
        use crate::schema::{offer_targets, offers};

        let mut conn = self.conn()?;

        let targeting = offer_targets::table
            .filter(offer_targets::target_id.eq(category_id))
            .select(offer_targets::offer_id);

        let db_offers = offers::table
            .filter(offers::hub_id.eq(hub_id))
            .filter(offers::status.eq(ActivityStatus::Active.as_str()))
            .filter(offers::offer_type.eq(OfferType::Category.as_str()))
            .filter(offers::id.eq_any(targeting))
            .order(offers::id.asc())
            .load::<DbOffer>(&mut conn)?;

        attach_targets(&mut conn, db_offers)
    }

    fn list_offers(&self, query: OfferListQuery) -> RepositoryResult<(usize, Vec<DomainOffer>)> {
        use crate::schema::offers;

        let mut conn = self.conn()?;

        let search_pattern = query.search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = offers::table
            .filter(offers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(offers::name.like(pattern.clone()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = offers::table
            .filter(offers::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            items = items.filter(offers::name.like(pattern.clone()));
        }

        items = items.order((offers::created_at.desc(), offers::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_offers = items.load::<DbOffer>(&mut conn)?;

        Ok((total, attach_targets(&mut conn, db_offers)?))
    }
}

impl OfferWriter for DieselRepository {
    fn create_offer(&self, new_offer: &DomainNewOffer) -> RepositoryResult<DomainOffer> {
        use crate::schema::{offer_targets, offers};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOffer, RepositoryError, _>(|conn| {
            let db_new = DbNewOffer::from(new_offer);

            let created = diesel::insert_into(offers::table)
                .values(&db_new)
                .get_result::<DbOffer>(conn)?;

            let targets = targets_for(created.id, &new_offer.scope);
            if !targets.is_empty() {
                diesel::insert_into(offer_targets::table)
                    .values(&targets)
                    .execute(conn)?;
            }

            load_offer(conn, created.id, created.hub_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_offer(
        &self,
        offer_id: i32,
        hub_id: i32,
        updates: &DomainUpdateOffer,
    ) -> RepositoryResult<DomainOffer> {
        use crate::schema::{offer_targets, offers};

        let mut conn = self.conn()?;

        conn.transaction::<DomainOffer, RepositoryError, _>(|conn| {
            let db_updates = DbUpdateOffer::from(updates);

            let target = offers::table
                .filter(offers::id.eq(offer_id))
                .filter(offers::hub_id.eq(hub_id));

            let updated = diesel::update(target)
                .set(&db_updates)
                .execute(conn)?;

            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(offer_targets::table.filter(offer_targets::offer_id.eq(offer_id)))
                .execute(conn)?;

            let targets = targets_for(offer_id, &updates.scope);
            if !targets.is_empty() {
                diesel::insert_into(offer_targets::table)
                    .values(&targets)
                    .execute(conn)?;
            }

            load_offer(conn, offer_id, hub_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn set_offer_status(
        &self,
        offer_id: i32,
        hub_id: i32,
        status: ActivityStatus,
    ) -> RepositoryResult<DomainOffer> {
        use crate::schema::offers;

        let mut conn = self.conn()?;

        let target = offers::table
            .filter(offers::id.eq(offer_id))
            .filter(offers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                offers::status.eq(status.as_str()),
                offers::updated_at.eq(Local::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        load_offer(&mut conn, offer_id, hub_id)?.ok_or(RepositoryError::NotFound)
    }
}
