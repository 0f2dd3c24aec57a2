use chrono::Local;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::customer::{
        Customer as DomainCustomer, CustomerListQuery, NewCustomer as DomainNewCustomer,
    },
    models::customer::{Customer as DbCustomer, NewCustomer as DbNewCustomer},
    repository::{CustomerReader, CustomerWriter, DieselRepository},
};

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id))
            .filter(customers::hub_id.eq(hub_id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let total = filtered_customers(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_customers(&query).order(customers::created_at.desc());

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            items = items.offset(offset).limit(pagination.per_page as i64);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;

        Ok((total, db_customers.into_iter().map(Into::into).collect()))
    }
}

type BoxedCustomers<'a> = crate::schema::customers::BoxedQuery<'a, diesel::sqlite::Sqlite>;

/// Customers of the hub whose name, email or phone contains the search term.
fn filtered_customers(query: &CustomerListQuery) -> BoxedCustomers<'_> {
    use crate::schema::customers;

    let mut filtered = customers::table
        .filter(customers::hub_id.eq(query.hub_id))
        .into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{term}%");
        filtered = filtered.filter(
            customers::name
                .like(pattern.clone())
                .or(customers::email.like(pattern.clone()))
                .or(customers::phone.like(pattern)),
        );
    }

    filtered
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let db_new = DbNewCustomer::from(new_customer);

        let created = diesel::insert_into(customers::table)
            .values(&db_new)
            .get_result::<DbCustomer>(&mut conn)?;

        Ok(created.into())
    }

    fn set_customer_blocked(
        &self,
        customer_id: i32,
        hub_id: i32,
        is_blocked: bool,
    ) -> RepositoryResult<DomainCustomer> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let target = customers::table
            .filter(customers::id.eq(customer_id))
            .filter(customers::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                customers::is_blocked.eq(is_blocked),
                customers::updated_at.eq(Local::now().naive_utc()),
            ))
            .get_result::<DbCustomer>(&mut conn)
            .optional()?;

        updated.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
