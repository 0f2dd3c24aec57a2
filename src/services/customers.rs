use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;
use serde::Deserialize;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::customer::{Customer, CustomerListQuery};
use crate::repository::{CustomerReader, CustomerWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the customers index page.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    /// Matched against name, email and phone.
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct CustomersPageData {
    pub customers: Paginated<Customer>,
    pub search: Option<String>,
}

pub fn load_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<CustomersPageData>
where
    R: CustomerReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let page = query.page.unwrap_or(1);
    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let mut list_query =
        CustomerListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, customers) = repo.list_customers(list_query)?;

    Ok(CustomersPageData {
        customers: Paginated::new(customers, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search,
    })
}

fn set_blocked<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    is_blocked: bool,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_customer_by_id(customer_id, user.hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let customer = repo.set_customer_blocked(customer_id, user.hub_id, is_blocked)?;
    log::info!(
        "customer {} {}",
        customer.id,
        if is_blocked { "blocked" } else { "unblocked" }
    );
    Ok(customer)
}

/// Prevents the customer from signing in to the storefront.
pub fn block_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    set_blocked(repo, user, customer_id, true)
}

pub fn unblock_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    set_blocked(repo, user, customer_id, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockCustomerRepo;
    use crate::services::test_support::{admin, fixed_datetime, user_with_roles};

    fn customer(id: i32, is_blocked: bool) -> Customer {
        Customer {
            id,
            hub_id: 1,
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: None,
            is_blocked,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    #[test]
    fn block_customer_sets_flag() {
        let mut repo = MockCustomerRepo::new();
        repo.expect_get_customer_by_id()
            .returning(|id, _| Ok(Some(customer(id, false))));
        repo.expect_set_customer_blocked()
            .withf(|id, hub_id, is_blocked| *id == 3 && *hub_id == 1 && *is_blocked)
            .returning(|id, _, is_blocked| Ok(customer(id, is_blocked)));

        let blocked = block_customer(&repo, &admin(), 3).expect("blocked");

        assert!(blocked.is_blocked);
    }

    #[test]
    fn unblock_customer_clears_flag() {
        let mut repo = MockCustomerRepo::new();
        repo.expect_get_customer_by_id()
            .returning(|id, _| Ok(Some(customer(id, true))));
        repo.expect_set_customer_blocked()
            .returning(|id, _, is_blocked| Ok(customer(id, is_blocked)));

        let unblocked = unblock_customer(&repo, &admin(), 3).expect("unblocked");

        assert!(!unblocked.is_blocked);
    }

    #[test]
    fn block_missing_customer_is_not_found() {
        let mut repo = MockCustomerRepo::new();
        repo.expect_get_customer_by_id().returning(|_, _| Ok(None));
        repo.expect_set_customer_blocked().never();

        assert!(matches!(
            block_customer(&repo, &admin(), 3),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn load_customers_requires_role() {
        let repo = MockCustomerRepo::new();

        assert!(matches!(
            load_customers(&repo, &user_with_roles(&["viewer"]), CustomersQuery::default()),
            Err(ServiceError::Unauthorized)
        ));
    }
}
