use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::brand::{
    Brand as DomainBrand, BrandListQuery, NewBrand as DomainNewBrand,
    UpdateBrand as DomainUpdateBrand,
};
use crate::models::brand::{
    Brand as DbBrand, NewBrand as DbNewBrand, UpdateBrand,
};
use crate::repository::{BrandReader, BrandWriter, DieselRepository, lower};

impl BrandReader for DieselRepository {
    fn get_brand_by_id(
        &self,
        brand_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainBrand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let brand = brands::table
            .filter(brands::id.eq(brand_id))
            .filter(brands::hub_id.eq(hub_id))
            .first::<DbBrand>(&mut conn)
            .optional()?;

        Ok(brand.map(DomainBrand::from))
    }

    fn get_brand_by_name(
        &self,
        name: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainBrand>> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let brand = brands::table
            .filter(lower(brands::name).eq(name.trim().to_lowercase()))
            .filter(brands::hub_id.eq(hub_id))
            .first::<DbBrand>(&mut conn)
            .optional()?;

        Ok(brand.map(DomainBrand::from))
    }

    fn list_brands(
        &self,
        query: BrandListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainBrand>)> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let mut count_query = brands::table
            .filter(brands::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            count_query = count_query.filter(brands::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            count_query = count_query.filter(
                brands::name
                    .like(pattern.clone())
                    .or(brands::description.like(pattern)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items_query = brands::table
            .filter(brands::hub_id.eq(query.hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if !query.include_deleted {
            items_query = items_query.filter(brands::is_deleted.eq(false));
        }

        if let Some(term) = query.search.as_ref() {
            let pattern = format!("%{}%", term);
            items_query = items_query.filter(
                brands::name
                    .like(pattern.clone())
                    .or(brands::description.like(pattern)),
            );
        }

        items_query = items_query.order(brands::name.asc());

        if let Some(pagination) = &query.pagination {
            let page = pagination.page.max(1);
            let per_page = pagination.per_page as i64;
            let offset = ((page - 1) * pagination.per_page) as i64;
            items_query = items_query.offset(offset).limit(per_page);
        }

        let brands = items_query.load::<DbBrand>(&mut conn)?;
        let brands = brands.into_iter().map(DomainBrand::from).collect();

        Ok((total, brands))
    }
}

impl BrandWriter for DieselRepository {
    fn create_brand(
        &self,
        new_brand: &DomainNewBrand,
    ) -> RepositoryResult<DomainBrand> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let insertable = DbNewBrand::from(new_brand);

        let created = diesel::insert_into(brands::table)
            .values(&insertable)
            .get_result::<DbBrand>(&mut conn)?;

        Ok(created.into())
    }

    fn update_brand(
        &self,
        brand_id: i32,
        hub_id: i32,
        updates: &DomainUpdateBrand,
    ) -> RepositoryResult<DomainBrand> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let db_updates = UpdateBrand::from(updates);

        let target = brands::table
            .filter(brands::id.eq(brand_id))
            .filter(brands::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbBrand>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_brand_deleted(
        &self,
        brand_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<DomainBrand> {
        use crate::schema::brands;

        let mut conn = self.conn()?;

        let target = brands::table
            .filter(brands::id.eq(brand_id))
            .filter(brands::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                brands::is_deleted.eq(is_deleted),
                brands::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbBrand>(&mut conn)?;

        Ok(updated.into())
    }
}
