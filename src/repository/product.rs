use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        offer::OfferScope,
        pricing::PriceChange,
        product::{
            NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
            UpdateProduct as DomainUpdateProduct,
        },
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, ProductPricing,
        UpdateProduct as DbUpdateProduct,
    },
    repository::{DieselRepository, ProductReader, ProductWriter},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::hub_id.eq(hub_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let mut count_query = products::table
            .filter(products::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            count_query = count_query.filter(products::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table
            .filter(products::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            items = items.filter(products::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items = items.filter(
                products::name
                    .like(pattern.clone())
                    .or(products::description.like(pattern)),
            );
        }

        items = items.order((products::created_at.desc(), products::id.desc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        Ok((total, db_products.into_iter().map(Into::into).collect()))
    }

    fn list_products_in_scope(
        &self,
        hub_id: i32,
        scope: &OfferScope,
    ) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        if scope.ids().is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;

        let query = products::table
            .filter(products::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        let query = match scope {
            OfferScope::Products(ids) => query.filter(products::id.eq_any(ids)),
            OfferScope::Categories(ids) => query.filter(products::category_id.eq_any(ids)),
        };

        let db_products = query
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(db_products.into_iter().map(Into::into).collect())
    }

    fn list_products_by_offer(
        &self,
        hub_id: i32,
        offer_id: i32,
    ) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let db_products = products::table
            .filter(products::hub_id.eq(hub_id))
            .filter(products::offer_id.eq(offer_id))
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok(db_products.into_iter().map(Into::into).collect())
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn update_product(
        &self,
        product_id: i32,
        hub_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let db_updates = DbUpdateProduct::from(updates);

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_product_deleted(
        &self,
        product_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                products::is_deleted.eq(is_deleted),
                products::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn apply_price_changes(&self, hub_id: i32, changes: &[PriceChange]) -> RepositoryResult<usize> {
        use crate::schema::products;

        if changes.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let written = conn.transaction::<usize, RepositoryError, _>(|conn| {
            let now = Local::now().naive_utc();
            let mut written = 0;

            for change in changes {
                let pricing = match *change {
                    PriceChange::Apply {
                        offer_id,
                        discounted_price,
                        ..
                    } => ProductPricing {
                        offer_id: Some(offer_id),
                        discounted_price: Some(discounted_price),
                        updated_at: now,
                    },
                    PriceChange::Clear { .. } => ProductPricing {
                        offer_id: None,
                        discounted_price: None,
                        updated_at: now,
                    },
                };

                let target = products::table
                    .filter(products::id.eq(change.product_id()))
                    .filter(products::hub_id.eq(hub_id));

                let updated = diesel::update(target).set(&pricing).execute(conn)?;
                if updated == 0 {
                    return Err(RepositoryError::NotFound);
                }
                written += updated;
            }

            Ok(written)
        })?;

        log::debug!("Applied {written} price changes for hub {hub_id}");

        Ok(written)
    }
}
