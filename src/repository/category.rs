use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::category::{
    Category as DomainCategory, CategoryListQuery, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory,
};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository, lower};

impl CategoryReader for DieselRepository {
    fn get_category_by_id(
        &self,
        category_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn get_category_by_name(
        &self,
        name: &str,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainCategory>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .filter(lower(categories::name).eq(name.trim().to_lowercase()))
            .filter(categories::hub_id.eq(hub_id))
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(DomainCategory::from))
    }

    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCategory>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let total = filtered_categories(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_categories(&query).order(categories::name.asc());

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let categories = items.load::<DbCategory>(&mut conn)?;

        Ok((total, categories.into_iter().map(DomainCategory::from).collect()))
    }
}

type BoxedCategories<'a> = crate::schema::categories::BoxedQuery<'a, diesel::sqlite::Sqlite>;

/// Categories of the hub, optionally with soft-deleted ones, matching the search term.
fn filtered_categories(query: &CategoryListQuery) -> BoxedCategories<'_> {
    use crate::schema::categories;

    let mut filtered = categories::table
        .filter(categories::hub_id.eq(query.hub_id))
        .into_boxed::<diesel::sqlite::Sqlite>();

    if !query.include_deleted {
        filtered = filtered.filter(categories::is_deleted.eq(false));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{term}%");
        filtered = filtered.filter(
            categories::name
                .like(pattern.clone())
                .or(categories::description.like(pattern)),
        );
    }

    filtered
}

impl CategoryWriter for DieselRepository {
    fn create_category(
        &self,
        new_category: &DomainNewCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let insertable = DbNewCategory::from(new_category);

        let created = diesel::insert_into(categories::table)
            .values(&insertable)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.into())
    }

    fn update_category(
        &self,
        category_id: i32,
        hub_id: i32,
        updates: &DomainUpdateCategory,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let db_updates = UpdateCategory::from(updates);

        let target = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set(&db_updates)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.into())
    }

    fn set_category_deleted(
        &self,
        category_id: i32,
        hub_id: i32,
        is_deleted: bool,
    ) -> RepositoryResult<DomainCategory> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let target = categories::table
            .filter(categories::id.eq(category_id))
            .filter(categories::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                categories::is_deleted.eq(is_deleted),
                categories::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbCategory>(&mut conn)?;

        Ok(updated.into())
    }
}
